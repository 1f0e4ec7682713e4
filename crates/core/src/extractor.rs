//! Reads one bible file and turns it into a [`BibleRecord`].

use crate::config::Settings;
use crate::error::{IndexError, ParseCause, Result};
use crate::models::BibleRecord;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Component, Path};

/// The handful of fields the index cares about; everything else in the file
/// is skipped without being materialised.
#[derive(Debug, Default, Deserialize)]
struct BibleDocument {
    #[serde(default)]
    bible: Option<BibleMeta>,
}

#[derive(Debug, Default, Deserialize)]
struct BibleMeta {
    /// Kept loose: a non-string name falls back to the id instead of
    /// failing the file.
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    books: Vec<IgnoredAny>,
}

pub fn extract(path: &Path, settings: &Settings) -> Result<BibleRecord> {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let document = read_document(path).map_err(|source| IndexError::ParseFailure {
        file: file.clone(),
        source,
    })?;
    let meta = document.bible.unwrap_or_default();

    let id = derive_id(&file, &settings.id_suffix);
    let name = match meta.name {
        Some(Value::String(n)) if !n.is_empty() => n,
        _ => id.clone(),
    };
    let relative = relative_posix(path, &settings.base_dir);

    let schema = settings.schema;
    let bible_type = schema
        .classifies()
        .then(|| settings.classifier.classify(meta.books.len()).to_string());
    let default =
        schema.marks_default() && settings.default_path.as_deref() == Some(relative.as_str());

    Ok(BibleRecord {
        id,
        name,
        path: relative,
        bible_type,
        default,
    })
}

fn read_document(path: &Path) -> std::result::Result<BibleDocument, ParseCause> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Strips the format suffix from a file name. Names that do not carry the
/// suffix, or would be left empty by it, fall back to the plain file stem.
pub fn derive_id(file_name: &str, suffix: &str) -> String {
    match file_name.strip_suffix(suffix) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| file_name.to_string()),
    }
}

/// Path of `path` relative to `base`, joined with `/` whatever the host
/// separator is. Paths outside `base` are kept whole.
pub fn relative_posix(path: &Path, base: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    let mut parts: Vec<String> = Vec::new();
    for component in rel.components() {
        match component {
            Component::Prefix(p) => parts.push(p.as_os_str().to_string_lossy().into_owned()),
            Component::RootDir => {
                if parts.is_empty() {
                    parts.push(String::new());
                }
            }
            Component::CurDir => {}
            Component::ParentDir => parts.push("..".to_string()),
            Component::Normal(s) => parts.push(s.to_string_lossy().into_owned()),
        }
    }
    parts.join("/")
}
