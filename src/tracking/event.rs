//! Decoded tracking-log records

use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;

/// One tracking-log line
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogEvent {
    pub event_type: Option<String>,
    pub username: Option<String>,
    /// Usually a JSON document encoded as a string, sometimes truncated
    pub event: Option<Value>,
    pub host: Option<String>,
    pub event_source: Option<String>,
    pub time: Option<String>,
    pub ip: Option<String>,
    pub agent: Option<String>,
    pub page: Option<Value>,
}

impl LogEvent {
    /// Decode one line; `None` for anything that is not a JSON object of the
    /// expected shape.
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        serde_json::from_str(line).ok()
    }

    /// Raw text of the `event` field.
    pub fn raw_payload(&self) -> Option<Cow<'_, str>> {
        match self.event.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    /// The `POST` object of a fully decodable payload.
    pub fn post(&self) -> Option<Value> {
        let payload = match self.event.as_ref()? {
            Value::String(s) => serde_json::from_str::<Value>(s).ok()?,
            Value::Object(_) => self.event.clone()?,
            _ => return None,
        };
        payload.get("POST").cloned()
    }

    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }
}

/// First value of a form field; form posts log every field as a list.
pub fn post_value<'a>(post: &'a Value, key: &str) -> Option<&'a str> {
    match post.get(key)? {
        Value::Array(values) => values.first()?.as_str(),
        Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Edit actions the reconciler understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EditAction {
    CreateCourse,
    CloneItem,
    SaveItem,
    PublishDraft,
    CreateDraft,
    DeleteItem,
    Edit,
}

impl EditAction {
    /// Map an `event_type` to an action; unrecognized types yield `None`.
    pub fn classify(event_type: &str) -> Option<Self> {
        match event_type {
            "/create_new_course" => Some(Self::CreateCourse),
            "/clone_item" => Some(Self::CloneItem),
            "/save_item" => Some(Self::SaveItem),
            "/publish_draft" => Some(Self::PublishDraft),
            "/create_draft" => Some(Self::CreateDraft),
            "/delete_item" => Some(Self::DeleteItem),
            t if t.starts_with("/edit/") => Some(Self::Edit),
            _ => None,
        }
    }

    /// Label written in the event column of the report
    pub fn label(self) -> &'static str {
        match self {
            Self::CreateCourse => "create_new_course",
            Self::CloneItem => "clone_item",
            Self::SaveItem => "save_item",
            Self::PublishDraft => "publish_draft",
            Self::CreateDraft => "create_draft",
            Self::DeleteItem => "delete_item",
            Self::Edit => "edit",
        }
    }

    /// Whether the target is read from an embedded location in the payload
    pub fn uses_embedded_location(self) -> bool {
        !matches!(self, Self::CreateCourse | Self::CloneItem)
    }
}
