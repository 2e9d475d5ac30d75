//! Input acceptance, output naming and download path confinement.

use std::path::{Component, Path, PathBuf};

use crate::checks::CheckKind;
use crate::error::AvtalskollError;

pub const MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["xlsx"];

/// True when the file name carries an accepted extension.
///
/// Only the final path component is considered.
pub fn allowed_file(name: &str) -> bool {
    let base = Path::new(name.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ALLOWED_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed)),
        _ => false,
    }
}

/// Validate an incoming workbook by name and size.
pub fn check_upload(name: &str, size: u64) -> Result<(), AvtalskollError> {
    if !allowed_file(name) {
        return Err(AvtalskollError::UnsupportedInput(name.to_string()));
    }
    if size > MAX_INPUT_BYTES {
        return Err(AvtalskollError::InputTooLarge {
            size,
            limit: MAX_INPUT_BYTES,
        });
    }
    Ok(())
}

/// Read an input workbook from disk after checking name and size.
pub fn read_input(path: &Path) -> Result<Vec<u8>, AvtalskollError> {
    let size = std::fs::metadata(path)?.len();
    check_upload(&path.to_string_lossy(), size)?;
    Ok(std::fs::read(path)?)
}

/// Short random token that keeps output names from colliding.
pub fn session_token() -> String {
    let mut token = uuid::Uuid::new_v4().simple().to_string();
    token.truncate(8);
    token
}

pub fn output_file_name(kind: CheckKind, token: &str) -> String {
    format!("avvikelser_{}_{}.xlsx", kind.slug(), token)
}

/// Resolve a requested download name inside `base`.
///
/// Absolute names and any component other than a plain file or directory
/// name (`..`, `.`, drive prefixes) are rejected.
pub fn resolve_within(base: &Path, name: &str) -> Result<PathBuf, AvtalskollError> {
    let requested = Path::new(name);
    if name.trim().is_empty() {
        return Err(AvtalskollError::PathRejected("empty file name".into()));
    }
    if requested.is_absolute() {
        return Err(AvtalskollError::PathRejected(format!(
            "absolute path not allowed: {name}"
        )));
    }
    if !requested
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(AvtalskollError::PathRejected(format!(
            "path leaves the download directory: {name}"
        )));
    }
    Ok(base.join(requested))
}
