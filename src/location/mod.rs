//! Location identifiers for course content
//!
//! A location addresses one piece of course content using the form
//! `{tag}://{org}/{course}/{category}/{name}[@{revision}]`. Clone sources use
//! the sibling [`TemplateLocation`] form. Both share the character policy in
//! [`clean`].
//!
//! Locations can be built from a URL string, an ordered list of fields, or a
//! map of named fields. Non-string forms may leave fields empty, which callers
//! treat as a wildcard; [`Location::ensure_fully_specified`] rejects those.

pub mod clean;
pub mod error;
pub mod template;

pub use clean::{clean, clean_for_html, clean_for_url_name, clean_keeping_underscores};
pub use error::{LocationError, LocationResult};
pub use template::TemplateLocation;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<tag>[^:]+)://(?P<org>[^/]+)/(?P<course>[^/]+)/(?P<category>[^/]+)/(?P<name>[^@]+)(?:@(?P<revision>[^/]+))?$",
    )
    .expect("valid location pattern")
});

// Some redirects drop one slash after the tag.
static MISSING_SLASH_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<tag>[^:]+):/(?P<org>[^/]+)/(?P<course>[^/]+)/(?P<category>[^/]+)/(?P<name>[^@]+)(?:@(?P<revision>[^/]+))?$",
    )
    .expect("valid missing-slash location pattern")
});

const FIELDS: [&str; 6] = ["tag", "org", "course", "category", "name", "revision"];

/// Structured address of one piece of course content
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    tag: String,
    org: String,
    course: String,
    category: String,
    name: String,
    revision: Option<String>,
}

impl Location {
    /// Build a location from individual fields, validating each one.
    pub fn new(
        tag: &str,
        org: &str,
        course: &str,
        category: &str,
        name: &str,
        revision: Option<&str>,
    ) -> LocationResult<Self> {
        let location = Self {
            tag: tag.to_string(),
            org: org.to_string(),
            course: course.to_string(),
            category: category.to_string(),
            name: name.to_string(),
            revision: revision.filter(|r| !r.is_empty()).map(str::to_string),
        };
        location.validate()?;
        Ok(location)
    }

    /// Parse a location URL.
    ///
    /// The missing-slash form `tag:/org/...` is accepted as a recovery.
    pub fn parse(text: &str) -> LocationResult<Self> {
        let caps = URL_RE
            .captures(text)
            .or_else(|| MISSING_SLASH_URL_RE.captures(text))
            .ok_or_else(|| LocationError::Invalid(text.to_string()))?;

        let group = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();

        Self::new(
            group("tag"),
            group("org"),
            group("course"),
            group("category"),
            group("name"),
            caps.name("revision").map(|m| m.as_str()),
        )
    }

    /// Build from an ordered list `[tag, org, course, category, name, revision?]`.
    ///
    /// Empty entries are left unspecified; an empty revision means no revision.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> LocationResult<Self> {
        if parts.len() != 5 && parts.len() != 6 {
            return Err(LocationError::WrongLength {
                expected: "5 or 6",
                actual: parts.len(),
            });
        }

        let part = |i: usize| parts[i].as_ref();
        let revision = parts.get(5).map(|r| r.as_ref());
        Self::new(part(0), part(1), part(2), part(3), part(4), revision)
    }

    /// Build from named fields. `revision` may be omitted; every other field
    /// must be present (possibly empty) and unknown keys are rejected.
    pub fn from_fields<I, K, V>(fields: I) -> LocationResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut values: [Option<String>; 6] = Default::default();
        for (key, value) in fields {
            let key = key.as_ref();
            let idx = FIELDS
                .iter()
                .position(|f| *f == key)
                .ok_or_else(|| LocationError::UnknownField(key.to_string()))?;
            values[idx] = Some(value.as_ref().to_string());
        }

        for (idx, field) in FIELDS.iter().enumerate().take(5) {
            if values[idx].is_none() {
                return Err(LocationError::MissingField((*field).to_string()));
            }
        }

        let value = |i: usize| values[i].as_deref().unwrap_or_default();
        Self::new(
            value(0),
            value(1),
            value(2),
            value(3),
            value(4),
            values[5].as_deref(),
        )
    }

    /// Parse `text` and require every field except the revision to be set.
    pub fn ensure_fully_specified(text: &str) -> LocationResult<Self> {
        let location = Self::parse(text)?;
        location.check_fully_specified()?;
        Ok(location)
    }

    /// Fail with [`LocationError::Underspecified`] if any non-revision field is empty.
    pub fn check_fully_specified(&self) -> LocationResult<()> {
        let required = [
            &self.tag,
            &self.org,
            &self.course,
            &self.category,
            &self.name,
        ];
        if required.iter().any(|v| v.is_empty()) {
            return Err(LocationError::Underspecified(self.url()));
        }
        Ok(())
    }

    /// Whether `text` parses as a location.
    pub fn is_valid(text: &str) -> bool {
        Self::parse(text).is_ok()
    }

    fn validate(&self) -> LocationResult<()> {
        let plain = [&self.tag, &self.org, &self.course, &self.category]
            .into_iter()
            .chain(self.revision.as_ref());
        for value in plain {
            if clean::has_invalid_chars(value) {
                return Err(LocationError::InvalidCharacters {
                    value: value.clone(),
                });
            }
        }
        if clean::has_invalid_name_chars(&self.name) {
            return Err(LocationError::InvalidCharacters {
                value: self.name.clone(),
            });
        }
        Ok(())
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    /// URL form; the `@revision` suffix is omitted when there is no revision.
    pub fn url(&self) -> String {
        let mut url = format!(
            "{}://{}/{}/{}/{}",
            self.tag, self.org, self.course, self.category, self.name
        );
        if let Some(revision) = &self.revision {
            url.push('@');
            url.push_str(revision);
        }
        url
    }

    /// Version of the location safe for html `id` attributes.
    pub fn html_id(&self) -> String {
        let joined = [
            Some(self.tag.as_str()),
            Some(self.org.as_str()),
            Some(self.course.as_str()),
            Some(self.category.as_str()),
            Some(self.name.as_str()),
            self.revision.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join("-");
        clean_for_html(&joined)
    }

    /// `org/course/name`, the course id when this location is a course node.
    pub fn course_id(&self) -> String {
        format!("{}/{}/{}", self.org, self.course, self.name)
    }

    /// Whether this location belongs to the given org and course.
    pub fn in_course(&self, org: &str, course: &str) -> bool {
        self.org == org && self.course == course
    }

    pub fn with_revision(&self, revision: Option<&str>) -> LocationResult<Self> {
        Self::new(
            &self.tag,
            &self.org,
            &self.course,
            &self.category,
            &self.name,
            revision,
        )
    }

    pub fn with_name(&self, name: &str) -> LocationResult<Self> {
        Self::new(
            &self.tag,
            &self.org,
            &self.course,
            &self.category,
            name,
            self.revision.as_deref(),
        )
    }

    pub fn with_category(&self, category: &str) -> LocationResult<Self> {
        Self::new(
            &self.tag,
            &self.org,
            &self.course,
            category,
            &self.name,
            self.revision.as_deref(),
        )
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.url())
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
