//! Stable serialization of the index and atomic replacement of the manifest.

use crate::error::{IndexError, Result};
use crate::models::{BibleRecord, IndexSchema};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const INDENT: &[u8] = b"    ";

#[derive(Serialize)]
struct RichEntry<'a> {
    name: &'a str,
    path: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    bible_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<bool>,
}

#[derive(Serialize)]
struct MinimalEntry<'a> {
    id: &'a str,
    name: &'a str,
}

impl<'a> From<&'a BibleRecord> for RichEntry<'a> {
    fn from(r: &'a BibleRecord) -> Self {
        Self {
            name: &r.name,
            path: &r.path,
            bible_type: r.bible_type.as_deref(),
            default: r.default.then_some(true),
        }
    }
}

impl<'a> From<&'a BibleRecord> for MinimalEntry<'a> {
    fn from(r: &'a BibleRecord) -> Self {
        Self {
            id: &r.id,
            name: &r.name,
        }
    }
}

/// JSON array with 4-space indentation, literal non-ASCII and one trailing
/// newline. Identical input always renders to identical bytes.
pub fn render_index(records: &[BibleRecord], schema: IndexSchema) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    match schema {
        IndexSchema::Rich => records
            .iter()
            .map(RichEntry::from)
            .collect::<Vec<_>>()
            .serialize(&mut ser)?,
        IndexSchema::Minimal => records
            .iter()
            .map(MinimalEntry::from)
            .collect::<Vec<_>>()
            .serialize(&mut ser)?,
    }
    out.push(b'\n');
    Ok(out)
}

pub fn digest(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Renders and writes the index, returning the digest of the written bytes.
pub fn write_index(records: &[BibleRecord], schema: IndexSchema, path: &Path) -> Result<String> {
    let bytes = render_index(records, schema).map_err(|source| write_failure(path, source))?;
    write_bytes(&bytes, path)?;
    Ok(digest(&bytes))
}

/// Writes through a temp file in the target directory and renames it into
/// place, so readers never observe a half-written manifest.
pub fn write_bytes(bytes: &[u8], path: &Path) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| write_failure(path, e))?;
    tmp.write_all(bytes).map_err(|e| write_failure(path, e))?;
    tmp.as_file().sync_all().map_err(|e| write_failure(path, e))?;
    carry_permissions(tmp.path(), path).map_err(|e| write_failure(path, e))?;
    tmp.persist(path).map_err(|e| write_failure(path, e.error))?;
    Ok(())
}

// Temp files are created 0600; keep the manifest's existing mode, or make a
// new one world-readable.
fn carry_permissions(tmp: &Path, target: &Path) -> io::Result<()> {
    match fs::metadata(target) {
        Ok(meta) => fs::set_permissions(tmp, meta.permissions()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => set_default_mode(tmp),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn set_default_mode(tmp: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(tmp, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_mode(_tmp: &Path) -> io::Result<()> {
    Ok(())
}

fn write_failure(path: &Path, source: io::Error) -> IndexError {
    IndexError::WriteFailure {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn rich(name: &str, path: &str, kind: &str, default: bool) -> BibleRecord {
        BibleRecord {
            id: path.trim_end_matches(".ebf1.json").to_string(),
            name: name.to_string(),
            path: path.to_string(),
            bible_type: Some(kind.to_string()),
            default,
        }
    }

    #[test]
    fn renders_rich_layout() {
        let records = vec![
            rich("Ave Maria", "Ave-Maria.ebf1.json", "catholic", true),
            rich("Almeida Revista e Corrigida", "ARC.ebf1.json", "protestant", false),
        ];
        let out = String::from_utf8(render_index(&records, IndexSchema::Rich).unwrap()).unwrap();
        let expected = r#"[
    {
        "name": "Ave Maria",
        "path": "Ave-Maria.ebf1.json",
        "type": "catholic",
        "default": true
    },
    {
        "name": "Almeida Revista e Corrigida",
        "path": "ARC.ebf1.json",
        "type": "protestant"
    }
]
"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn renders_minimal_layout() {
        let records = vec![rich("Bíblia Sagrada", "BS.ebf1.json", "other", true)];
        let out = String::from_utf8(render_index(&records, IndexSchema::Minimal).unwrap()).unwrap();
        assert_eq!(
            out,
            "[\n    {\n        \"id\": \"BS\",\n        \"name\": \"Bíblia Sagrada\"\n    }\n]\n"
        );
    }

    #[test]
    fn keeps_non_ascii_literal() {
        let records = vec![rich("Bíblia de Jerusalém", "BJ.ebf1.json", "catholic", false)];
        let out = String::from_utf8(render_index(&records, IndexSchema::Rich).unwrap()).unwrap();
        assert!(out.contains("Bíblia de Jerusalém"));
        assert!(!out.contains("\\u"));
        assert!(out.ends_with("]\n"));
        assert!(!out.ends_with("\n\n"));
    }

    #[test]
    fn writes_and_overwrites() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("index.json");
        fs::write(&target, "stale").unwrap();
        let records = vec![rich("A", "A.ebf1.json", "other", false)];

        let digest_written = write_index(&records, IndexSchema::Rich, &target).unwrap();
        let on_disk = fs::read(&target).unwrap();
        assert_eq!(on_disk, render_index(&records, IndexSchema::Rich).unwrap());
        assert_eq!(digest_written, digest(&on_disk));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_parent_is_write_failure() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("missing").join("index.json");
        let records = vec![rich("A", "A.ebf1.json", "other", false)];
        let err = write_index(&records, IndexSchema::Rich, &target).unwrap_err();
        assert!(matches!(err, IndexError::WriteFailure { .. }));
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn new_manifest_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;
        let temp = tempdir().unwrap();
        let target = temp.path().join("index.json");
        write_index(&[rich("A", "A.ebf1.json", "other", false)], IndexSchema::Rich, &target)
            .unwrap();
        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
