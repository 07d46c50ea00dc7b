//! I/O helpers for input images, cascade models and JSON reports.
//!
//! - `load_rgba_image`: read a PNG/JPEG/etc. into an owned RGBA buffer.
//! - `load_cascade`: read a cascade model, either JSON (`.json`) or the dense
//!   little-endian `f32` encoding (any other extension).
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::RgbaImageBuf;
use crate::cascade::CascadeDescriptor;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to interleaved RGBA.
pub fn load_rgba_image(path: &Path) -> Result<RgbaImageBuf, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgba8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(RgbaImageBuf::new(width, height, img.into_raw()))
}

/// Load a cascade descriptor from a JSON model or a raw little-endian blob.
pub fn load_cascade(path: &Path) -> Result<CascadeDescriptor, String> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let data = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cascade {}: {e}", path.display()))?;
        let descriptor: CascadeDescriptor = serde_json::from_str(&data)
            .map_err(|e| format!("Failed to parse cascade {}: {e}", path.display()))?;
        descriptor
            .validate()
            .map_err(|e| format!("Invalid cascade {}: {e}", path.display()))?;
        Ok(descriptor)
    } else {
        let bytes = fs::read(path)
            .map_err(|e| format!("Failed to read cascade {}: {e}", path.display()))?;
        CascadeDescriptor::from_le_bytes(&bytes)
            .map_err(|e| format!("Invalid cascade {}: {e}", path.display()))
    }
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
