use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Check that `name` exists in the upload directory with exactly `expected` as content
pub fn validate_saved_file(upload_dir: &Path, name: &str, expected: &[u8]) -> Result<()> {
    let file_path = upload_dir.join(name);

    if !file_path.exists() {
        anyhow::bail!("File does not exist: {:?}", file_path);
    }

    let content =
        fs::read(&file_path).with_context(|| format!("Failed to read file: {:?}", file_path))?;

    if content.len() != expected.len() {
        anyhow::bail!(
            "File {:?} has {} bytes, expected {}",
            file_path,
            content.len(),
            expected.len()
        );
    }

    if content != expected {
        anyhow::bail!("File {:?} content differs from the uploaded body", file_path);
    }

    println!("  ✓ {} saved with {} bytes", name, content.len());
    Ok(())
}

/// Check that no entry starting with `prefix` exists in the upload directory
pub fn validate_absent(upload_dir: &Path, prefix: &str) -> Result<()> {
    let found = list_with_prefix(upload_dir, prefix)?;
    if !found.is_empty() {
        anyhow::bail!("Unexpected files in {:?}: {:?}", upload_dir, found);
    }
    println!("  ✓ No file starting with {} was created", prefix);
    Ok(())
}

/// Names in the upload directory that start with `prefix`, sorted
pub fn list_with_prefix(upload_dir: &Path, prefix: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(upload_dir)
        .with_context(|| format!("Failed to read upload directory: {:?}", upload_dir))?
    {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name.starts_with(prefix) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
