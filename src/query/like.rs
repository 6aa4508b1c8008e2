//! LIKE pattern construction.
//!
//! Catalog statements compare with `LIKE ? ESCAPE '|'`, so user text is
//! escaped before the wildcards for the requested match are added.

use std::fmt;
use std::str::FromStr;

/// Escape character declared by every pattern statement.
pub const ESCAPE: char = '|';

/// How a name pattern is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikeType {
    StartsWith,
    EndsWith,
    /// Substring match anywhere in the name.
    #[default]
    Matches,
    /// Use the text verbatim, wildcards included.
    Raw,
}

impl LikeType {
    /// Build the LIKE argument for `text`.
    pub fn pattern(&self, text: &str) -> String {
        match self {
            LikeType::StartsWith => format!("{}%", escape(text)),
            LikeType::EndsWith => format!("%{}", escape(text)),
            LikeType::Matches => format!("%{}%", escape(text)),
            LikeType::Raw => text.to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LikeType::StartsWith => "starts-with",
            LikeType::EndsWith => "ends-with",
            LikeType::Matches => "matches",
            LikeType::Raw => "raw",
        }
    }
}

impl fmt::Display for LikeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LikeType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "starts-with" | "startswith" | "prefix" => Ok(LikeType::StartsWith),
            "ends-with" | "endswith" | "suffix" => Ok(LikeType::EndsWith),
            "matches" | "contains" => Ok(LikeType::Matches),
            "raw" => Ok(LikeType::Raw),
            _ => Err(crate::Error::InvalidValue(format!("unknown match type: {}", s))),
        }
    }
}

/// Prefix every LIKE metacharacter (and the escape itself) with [`ESCAPE`].
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | ESCAPE) {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn like(name: &str, pattern: &str) -> bool {
        let conn = Connection::open_in_memory().unwrap();
        conn.query_row("SELECT ?1 LIKE ?2 ESCAPE '|'", [name, pattern], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("100%_done"), "100|%|_done");
        assert_eq!(escape("a|b"), "a||b");
    }

    #[test]
    fn test_patterns() {
        assert_eq!(LikeType::StartsWith.pattern("tex"), "tex%");
        assert_eq!(LikeType::EndsWith.pattern(".png"), "%.png");
        assert_eq!(LikeType::Matches.pattern("%"), "%|%%");
        assert_eq!(LikeType::Raw.pattern("a%b"), "a%b");
    }

    #[test]
    fn test_percent_is_literal() {
        let pattern = LikeType::Matches.pattern("%");
        assert!(like("100%_done", &pattern));
        assert!(!like("100_done", &pattern));
        assert!(!like("done", &pattern));

        let underscore = LikeType::Matches.pattern("0_d");
        assert!(like("100_done", &underscore));
        assert!(!like("100xdone", &underscore));
    }

    #[test]
    fn test_parse_like_type() {
        assert_eq!("contains".parse::<LikeType>().unwrap(), LikeType::Matches);
        assert_eq!("starts-with".parse::<LikeType>().unwrap(), LikeType::StartsWith);
        assert!("fuzzy".parse::<LikeType>().is_err());
    }
}
