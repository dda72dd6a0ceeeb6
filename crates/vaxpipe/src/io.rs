//! File loading and atomic report writing

use std::fs;
use std::path::Path;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use serde::de::DeserializeOwned;

/// Load and deserialize a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("could not read {}", path.display()))?;
    serde_json::from_str(&content)
        .wrap_err_with(|| format!("could not parse {}", path.display()))
}

/// Write content to a file atomically using write-then-rename.
///
/// The content is first written to a temporary file next to the target,
/// then renamed into place, so an interrupted run never leaves a
/// half-written report at the target path.
pub fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.json");

        atomic_write(&path, "{\"tries\":10}\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"tries\":10}\n");

        // Temp file should not exist
        let temp_path = path.with_extension("tmp");
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.json");

        atomic_write(&path, "first").unwrap();
        atomic_write(&path, "second").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn test_load_json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, "{\"tries\": 250, \"months\": 48}").unwrap();

        let value: serde_json::Value = load_json(&path).unwrap();
        assert_eq!(value["tries"], 250);
        assert_eq!(value["months"], 48);
    }

    #[test]
    fn test_load_json_names_the_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let error = load_json::<serde_json::Value>(&path).unwrap_err();
        assert!(format!("{error}").contains("absent.json"));
    }
}
