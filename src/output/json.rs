//! JSON report writer

use crate::defaults::JSON_INDENT;
use crate::error::{AppError, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;

/// Serialize `data` as JSON indented with four spaces
pub fn to_json_string<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    data.serialize(&mut serializer)?;

    String::from_utf8(buffer)
        .map_err(|e| AppError::internal(format!("Serialized JSON is not UTF-8: {}", e)))
}

/// Write `data` to `path` in one shot, replacing any existing file
pub fn save_json<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<()> {
    let json = to_json_string(data)?;
    std::fs::write(path, json)
        .map_err(|e| AppError::io(format!("Failed to write {}: {}", path.display(), e)))
}
