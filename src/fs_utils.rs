use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::fs::try_exists;

use crate::constants::IMAGE_EXTENSIONS;
use crate::errors::{PipelineError, Result};

pub async fn ensure_dir(path: &Path) -> Result<PathBuf> {
    if !try_exists(path)
        .await
        .map_err(|err| PipelineError::io(path, err))?
    {
        fs::create_dir_all(path)
            .await
            .map_err(|err| PipelineError::io(path, err))?;
    }
    Ok(path.to_path_buf())
}

/// Regular files directly inside `dir`, sorted by file name. A missing
/// directory lists as empty.
pub async fn list_dir_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::warn!(dir = %dir.display(), "directory does not exist");
            return Ok(Vec::new());
        }
        Err(err) => return Err(PipelineError::io(dir, err)),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|err| PipelineError::io(dir, err))?
    {
        let path = entry.path();
        // follows symlinks
        let metadata = fs::metadata(&path)
            .await
            .map_err(|err| PipelineError::io(&path, err))?;
        if metadata.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Exact, case-sensitive extension match.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(extension)
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Base filename without its extension.
pub fn file_key(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// UTF-8 when valid, otherwise Latin-1 (every byte maps to the code point of
/// the same value).
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    }
}

pub async fn read_text_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .await
        .map_err(|err| PipelineError::io(path, err))?;
    Ok(decode_text(bytes))
}

/// `None` when the file does not exist.
pub async fn read_optional_text_file(path: &Path) -> Result<Option<String>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(decode_text(bytes))),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(PipelineError::io(path, err)),
    }
}

pub async fn write_text_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .await
        .map_err(|err| PipelineError::io(path, err))
}

/// True when `path` is a file holding at least `min_bytes` bytes.
pub async fn artifact_complete(path: &Path, min_bytes: u64) -> bool {
    match fs::metadata(path).await {
        Ok(metadata) => metadata.is_file() && metadata.len() >= min_bytes,
        Err(_) => false,
    }
}
