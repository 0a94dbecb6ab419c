//! Template locations
//!
//! Clone events reference their source as
//! `{tag}://{org}/{template}/{category}/{display_name}`. The display name is
//! optional and, for templates, often carries `_` where the rendered name has
//! spaces.

use super::clean;
use super::error::{LocationError, LocationResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<tag>[^:]+)://(?P<org>[^/]+)/(?P<template>[^/]+)/(?P<category>[^/]+)/(?P<display_name>[^@]+)?$",
    )
    .expect("valid template pattern")
});

static MISSING_SLASH_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<tag>[^:]+):/(?P<org>[^/]+)/(?P<template>[^/]+)/(?P<category>[^/]+)/(?P<display_name>[^@]+)?$",
    )
    .expect("valid missing-slash template pattern")
});

const FIELDS: [&str; 5] = ["tag", "org", "template", "category", "display_name"];

/// Address of a clone source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateLocation {
    tag: String,
    org: String,
    template: String,
    category: String,
    display_name: Option<String>,
}

impl TemplateLocation {
    pub fn new(
        tag: &str,
        org: &str,
        template: &str,
        category: &str,
        display_name: Option<&str>,
    ) -> LocationResult<Self> {
        let location = Self {
            tag: tag.to_string(),
            org: org.to_string(),
            template: template.to_string(),
            category: category.to_string(),
            display_name: display_name.filter(|d| !d.is_empty()).map(str::to_string),
        };
        location.validate()?;
        Ok(location)
    }

    /// Parse a template URL, recovering the missing-slash variant.
    pub fn parse(text: &str) -> LocationResult<Self> {
        let caps = URL_RE
            .captures(text)
            .or_else(|| MISSING_SLASH_URL_RE.captures(text))
            .ok_or_else(|| LocationError::Invalid(text.to_string()))?;

        let group = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();

        Self::new(
            group("tag"),
            group("org"),
            group("template"),
            group("category"),
            caps.name("display_name").map(|m| m.as_str()),
        )
    }

    /// Build from `[tag, org, template, category, display_name?]`.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> LocationResult<Self> {
        if parts.len() != 4 && parts.len() != 5 {
            return Err(LocationError::WrongLength {
                expected: "4 or 5",
                actual: parts.len(),
            });
        }
        let part = |i: usize| parts[i].as_ref();
        let display_name = parts.get(4).map(|d| d.as_ref());
        Self::new(part(0), part(1), part(2), part(3), display_name)
    }

    /// Build from named fields; `display_name` may be omitted.
    pub fn from_fields<I, K, V>(fields: I) -> LocationResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut values: [Option<String>; 5] = Default::default();
        for (key, value) in fields {
            let key = key.as_ref();
            let idx = FIELDS
                .iter()
                .position(|f| *f == key)
                .ok_or_else(|| LocationError::UnknownField(key.to_string()))?;
            values[idx] = Some(value.as_ref().to_string());
        }

        if let Some(missing) = FIELDS.iter().take(4).zip(&values).find(|(_, v)| v.is_none()) {
            return Err(LocationError::MissingField((*missing.0).to_string()));
        }

        let value = |i: usize| values[i].as_deref().unwrap_or_default();
        Self::new(value(0), value(1), value(2), value(3), values[4].as_deref())
    }

    /// Parse `text` and require tag, org, template and category to be set.
    pub fn ensure_fully_specified(text: &str) -> LocationResult<Self> {
        let location = Self::parse(text)?;
        location.check_fully_specified()?;
        Ok(location)
    }

    /// Fail with [`LocationError::Underspecified`] if tag, org, template or
    /// category is empty.
    pub fn check_fully_specified(&self) -> LocationResult<()> {
        let required = [&self.tag, &self.org, &self.template, &self.category];
        if required.iter().any(|v| v.is_empty()) {
            return Err(LocationError::Underspecified(self.url()));
        }
        Ok(())
    }

    pub fn is_valid(text: &str) -> bool {
        Self::parse(text).is_ok()
    }

    fn validate(&self) -> LocationResult<()> {
        for value in [&self.tag, &self.org, &self.template, &self.category] {
            if clean::has_invalid_chars(value) {
                return Err(LocationError::InvalidCharacters {
                    value: value.clone(),
                });
            }
        }
        if let Some(display_name) = &self.display_name {
            if clean::has_invalid_name_chars(display_name) {
                return Err(LocationError::InvalidCharacters {
                    value: display_name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Display name with `_` read back as spaces.
    ///
    /// Template names encode spaces as underscores, so this is lossy for
    /// names that really contain underscores.
    pub fn spaced_display_name(&self) -> String {
        self.display_name
            .as_deref()
            .unwrap_or_default()
            .replace('_', " ")
    }

    pub fn url(&self) -> String {
        format!(
            "{}://{}/{}/{}/{}",
            self.tag,
            self.org,
            self.template,
            self.category,
            self.display_name.as_deref().unwrap_or_default()
        )
    }
}

impl fmt::Display for TemplateLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

impl FromStr for TemplateLocation {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
