//! Text-encoding selection for the request/response boundary
//!
//! Codes follow Windows codepage numbering, which is what SHIORI hosts
//! pass to `set_encoding` (65001 = UTF-8, 932 = Shift_JIS, 0 = ANSI).

use serde::{Deserialize, Serialize};

/// Text encoding used for request and response buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    /// Platform default codepage
    Ansi,
    /// Shift_JIS (codepage 932)
    ShiftJis,
    /// UTF-8 (codepage 65001)
    #[default]
    Utf8,
}

impl Charset {
    /// Resolve a numeric encoding code; unknown codes are rejected
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Ansi),
            932 => Some(Self::ShiftJis),
            65001 => Some(Self::Utf8),
            _ => None,
        }
    }

    /// The numeric code a host would pass for this charset
    pub fn code(&self) -> i32 {
        match self {
            Self::Ansi => 0,
            Self::ShiftJis => 932,
            Self::Utf8 => 65001,
        }
    }

    /// Header form, as written in a `Charset:` line
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ansi => "ANSI",
            Self::ShiftJis => "Shift_JIS",
            Self::Utf8 => "UTF-8",
        }
    }

    /// Resolve a `Charset:` header value
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "ANSI" => Some(Self::Ansi),
            "Shift_JIS" | "SJIS" => Some(Self::ShiftJis),
            "UTF-8" | "utf-8" => Some(Self::Utf8),
            _ => None,
        }
    }
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for charset in [Charset::Ansi, Charset::ShiftJis, Charset::Utf8] {
            assert_eq!(Charset::from_code(charset.code()), Some(charset));
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(Charset::from_code(1252), None);
        assert_eq!(Charset::from_code(-1), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Charset::Utf8.label(), "UTF-8");
        assert_eq!(Charset::from_label("Shift_JIS"), Some(Charset::ShiftJis));
        assert_eq!(Charset::from_label("EUC-JP"), None);
    }
}
