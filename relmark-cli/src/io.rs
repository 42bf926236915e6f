//! File I/O for native CLI

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use relmark_core::Document;

/// Load a text file and create a Document
pub fn load_file(path: &str) -> Result<Document> {
    let path = Path::new(path);
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;

    let content = fs::read_to_string(&canonical)
        .with_context(|| format!("Failed to read file: {}", canonical.display()))?;

    let filepath = canonical.to_string_lossy().to_string();
    let filename = canonical
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let title = canonical
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Untitled".to_string());

    tracing::info!(path = %filepath, chars = content.chars().count(), "document loaded");
    Ok(Document::with_file_info(title, content, filepath, filename))
}

/// Get the ~/.relmark directory path, creating it if needed
pub fn relmark_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    let relmark_dir = home.join(".relmark");

    if !relmark_dir.exists() {
        fs::create_dir_all(&relmark_dir)
            .with_context(|| format!("Failed to create {}", relmark_dir.display()))?;
    }

    Ok(relmark_dir)
}

/// Export document to `<dir>/document.json`
pub fn export_document(doc: &Document, dir: &Path) -> Result<PathBuf> {
    let export_path = dir.join("document.json");

    let json = relmark_core::to_json(doc).context("Failed to serialize document")?;

    fs::write(&export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    tracing::info!(path = %export_path.display(), annotations = doc.annotations().len(), "document exported");
    Ok(export_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmark_core::RelevanceLevel;
    use tempfile::TempDir;

    #[test]
    fn test_load_file_sets_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "Hello world").unwrap();

        let doc = load_file(path.to_str().unwrap()).unwrap();
        assert_eq!(doc.title, "notes");
        assert_eq!(doc.filename.as_deref(), Some("notes.txt"));
        assert_eq!(doc.content(), "Hello world");
        assert_eq!(doc.char_len(), 11);
    }

    #[test]
    fn test_load_missing_file_fails_with_context() {
        let err = load_file("/definitely/not/here.txt").unwrap_err();
        assert!(err.to_string().contains("Failed to resolve path"));
    }

    #[test]
    fn test_export_writes_json() {
        let dir = TempDir::new().unwrap();
        let mut doc = Document::new("Out".to_string(), "Hello world".to_string());
        doc.submit_selection(0, 5, RelevanceLevel::High).unwrap();

        let path = export_document(&doc, dir.path()).unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("\"relevanceLevel\": \"high\""));
        assert!(written.contains("\"text\": \"Hello\""));
    }
}
