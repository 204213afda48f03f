//! File persistence helpers for the JSON-backed review store.
//!
//! Writes go to a `.tmp` sibling first and are renamed into place, so a
//! crash mid-write never leaves a truncated store file behind.

use std::io;
use std::path::Path;

/// Serialize `data` to JSON and write it atomically.
///
/// Creates parent directories as needed.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(data).map_err(io::Error::other)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json.as_bytes())?;
    std::fs::rename(&tmp, path)
}

/// Load and deserialize JSON from a file.
///
/// A missing file is `Ok(None)`; unreadable or malformed content is an error.
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> io::Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path)?;
    let value =
        serde_json::from_str(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        label: String,
        value: u32,
    }

    #[test]
    fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store").join("u1.json");

        let doc = Doc {
            label: "reviews".into(),
            value: 3,
        };
        atomic_write_json(&path, &doc).unwrap();

        let loaded: Option<Doc> = load_json(&path).unwrap();
        assert_eq!(loaded, Some(doc));
    }

    #[test]
    fn test_load_missing_is_none() {
        let result: io::Result<Option<Doc>> = load_json(Path::new("/nonexistent/u1.json"));
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_no_tmp_file_remains() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("u1.json");
        atomic_write_json(&path, &"x").unwrap();
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_load_malformed_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("u1.json");
        std::fs::write(&path, "{not json").unwrap();
        let result: io::Result<Option<Doc>> = load_json(&path);
        assert!(result.is_err());
    }
}
