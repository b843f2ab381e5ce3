use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::path::Path;

use crate::error::PoolError;

static POOLS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/pools");

/// Built-in content languages
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, clap::ValueEnum, strum_macros::Display)]
pub enum SupportedLanguage {
    Portuguese,
    /// Matches the language of the interface text
    #[default]
    English,
}

impl SupportedLanguage {
    pub fn file_name(&self) -> String {
        format!("{}.json", self.to_string().to_lowercase())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "portuguese" => Some(Self::Portuguese),
            "english" => Some(Self::English),
            _ => None,
        }
    }
}

/// Non-empty ordered list of prompt candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    label: &'static str,
    entries: Vec<String>,
}

impl Pool {
    pub fn new(label: &'static str, entries: Vec<String>) -> Result<Self, PoolError> {
        if entries.is_empty() {
            return Err(PoolError::Empty(label));
        }
        Ok(Self { label, entries })
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[derive(Deserialize, Debug)]
struct PoolsFile {
    name: String,
    words: Vec<String>,
    reading_themes: Vec<String>,
    expression_themes: Vec<String>,
}

/// The three prompt pools a session draws from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPools {
    pub name: String,
    pub words: Pool,
    pub reading_themes: Pool,
    pub expression_themes: Pool,
}

impl ContentPools {
    pub fn builtin(language: SupportedLanguage) -> Result<Self, PoolError> {
        let file_name = language.file_name();
        let contents = POOLS_DIR
            .get_file(&file_name)
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| PoolError::UnknownLanguage(language.to_string()))?;
        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> Result<Self, PoolError> {
        let raw: PoolsFile = serde_json::from_str(json)?;
        Ok(Self {
            name: raw.name,
            words: Pool::new("words", raw.words)?,
            reading_themes: Pool::new("reading_themes", raw.reading_themes)?,
            expression_themes: Pool::new("expression_themes", raw.expression_themes)?,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PoolError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PoolError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_builtin_portuguese() {
        let pools = ContentPools::builtin(SupportedLanguage::Portuguese).unwrap();
        assert_eq!(pools.name, "portuguese");
        assert_eq!(pools.words.entries().len(), 20);
        assert_eq!(pools.reading_themes.entries().len(), 10);
        assert_eq!(pools.expression_themes.entries().len(), 15);
        assert!(pools.words.entries().contains(&"horizonte".to_string()));
    }

    #[test]
    fn test_builtin_english() {
        let pools = ContentPools::builtin(SupportedLanguage::English).unwrap();
        assert_eq!(pools.name, "english");
        assert_eq!(pools.words.entries().len(), 20);
        assert_eq!(pools.reading_themes.entries().len(), 10);
        assert_eq!(pools.expression_themes.entries().len(), 15);
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        let json = r#"
        {
            "name": "broken",
            "words": ["one"],
            "reading_themes": [],
            "expression_themes": ["two"]
        }
        "#;
        assert_matches!(
            ContentPools::from_json(json),
            Err(PoolError::Empty("reading_themes"))
        );
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert_matches!(
            ContentPools::from_json("{ not json"),
            Err(PoolError::Parse(_))
        );
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert_matches!(ContentPools::from_file(&path), Err(PoolError::Io { .. }));
    }

    #[test]
    fn test_from_file_custom_pools() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pools.json");
        std::fs::write(
            &path,
            r#"{"name":"mine","words":["a","b"],"reading_themes":["r"],"expression_themes":["e"]}"#,
        )
        .unwrap();
        let pools = ContentPools::from_file(&path).unwrap();
        assert_eq!(pools.name, "mine");
        assert_eq!(pools.words.label(), "words");
        assert_eq!(pools.words.entries(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_language_names() {
        assert_eq!(SupportedLanguage::Portuguese.file_name(), "portuguese.json");
        assert_eq!(
            SupportedLanguage::from_name("English"),
            Some(SupportedLanguage::English)
        );
        assert_eq!(SupportedLanguage::from_name("klingon"), None);
        assert_eq!(SupportedLanguage::default(), SupportedLanguage::English);
    }
}
