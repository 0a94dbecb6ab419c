//! In-memory content store

use super::{ContentStore, ModuleQuery, ModuleRecord, StoreResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<ModuleRecord>,
}

impl MemoryStore {
    pub fn new(records: Vec<ModuleRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: ModuleRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ContentStore for MemoryStore {
    fn course_modules(&self, org: &str, course: &str) -> StoreResult<Vec<ModuleRecord>> {
        let query = ModuleQuery::course(org, course);
        Ok(self
            .records
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect())
    }
}
