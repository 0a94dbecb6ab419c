//! Output encodings for the TSV report

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Character encoding of the written report
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    /// ISO-8859-1; characters outside it become `?`
    #[default]
    #[value(alias = "latin-1", alias = "iso-8859-1")]
    #[serde(alias = "latin-1", alias = "iso-8859-1")]
    Latin1,
    #[value(alias = "utf-8")]
    #[serde(alias = "utf-8")]
    Utf8,
}

const REPLACEMENT: u8 = b'?';

impl OutputEncoding {
    /// Encode `text`, replacing characters the encoding cannot represent.
    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        match self {
            OutputEncoding::Utf8 => Cow::Borrowed(text.as_bytes()),
            OutputEncoding::Latin1 if text.is_ascii() => Cow::Borrowed(text.as_bytes()),
            OutputEncoding::Latin1 => Cow::Owned(
                text.chars()
                    .map(|c| u8::try_from(u32::from(c)).unwrap_or(REPLACEMENT))
                    .collect(),
            ),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputEncoding::Latin1 => "latin1",
            OutputEncoding::Utf8 => "utf8",
        }
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latin1" | "latin-1" | "iso-8859-1" => Ok(OutputEncoding::Latin1),
            "utf8" | "utf-8" => Ok(OutputEncoding::Utf8),
            other => Err(format!("Unknown output encoding '{other}' (use latin1 or utf8)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_keeps_accented_letters() {
        assert_eq!(OutputEncoding::Latin1.encode("Café").as_ref(), b"Caf\xe9");
    }

    #[test]
    fn test_latin1_replaces_unencodable() {
        assert_eq!(OutputEncoding::Latin1.encode("电路 1").as_ref(), b"?? 1");
        assert_eq!(OutputEncoding::Latin1.encode("a → b").as_ref(), b"a ? b");
    }

    #[test]
    fn test_utf8_passthrough() {
        assert_eq!(OutputEncoding::Utf8.encode("电路").as_ref(), "电路".as_bytes());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("UTF-8".parse::<OutputEncoding>(), Ok(OutputEncoding::Utf8));
        assert_eq!("iso-8859-1".parse::<OutputEncoding>(), Ok(OutputEncoding::Latin1));
        assert!("ebcdic".parse::<OutputEncoding>().is_err());
    }
}
