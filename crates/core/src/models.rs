use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One manifest entry, built once per bible file that parsed cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibleRecord {
    pub id: String,
    pub name: String,
    /// Path relative to the base directory, always with `/` separators.
    pub path: String,
    pub bible_type: Option<String>,
    pub default: bool,
}

/// Shape of the written manifest.
///
/// `Rich` emits `name`, `path`, `type` and `default` and deduplicates on the
/// display name. `Minimal` emits only `id` and `name` and deduplicates on the
/// id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexSchema {
    #[default]
    Rich,
    Minimal,
}

impl IndexSchema {
    pub fn dedup_key<'a>(&self, record: &'a BibleRecord) -> &'a str {
        match self {
            IndexSchema::Rich => &record.name,
            IndexSchema::Minimal => &record.id,
        }
    }

    pub fn classifies(&self) -> bool {
        matches!(self, IndexSchema::Rich)
    }

    pub fn marks_default(&self) -> bool {
        matches!(self, IndexSchema::Rich)
    }
}

impl FromStr for IndexSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rich" => Ok(IndexSchema::Rich),
            "minimal" => Ok(IndexSchema::Minimal),
            other => Err(format!("unknown schema '{other}' (expected rich|minimal)")),
        }
    }
}

impl fmt::Display for IndexSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexSchema::Rich => f.write_str("rich"),
            IndexSchema::Minimal => f.write_str("minimal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> BibleRecord {
        BibleRecord {
            id: id.to_string(),
            name: name.to_string(),
            path: format!("{id}.ebf1.json"),
            bible_type: None,
            default: false,
        }
    }

    #[test]
    fn dedup_key_follows_schema() {
        let r = record("ave-maria", "Ave Maria");
        assert_eq!(IndexSchema::Rich.dedup_key(&r), "Ave Maria");
        assert_eq!(IndexSchema::Minimal.dedup_key(&r), "ave-maria");
    }

    #[test]
    fn parses_schema_names() {
        assert_eq!("Minimal".parse::<IndexSchema>(), Ok(IndexSchema::Minimal));
        assert_eq!("rich".parse::<IndexSchema>(), Ok(IndexSchema::Rich));
        assert!("full".parse::<IndexSchema>().is_err());
    }
}
