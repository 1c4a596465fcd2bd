//! File helpers for image uploads

use crate::models::{ImageFile, ACCEPTED_IMAGE_TYPES};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Whether `content_type` is one of the accepted image MIME types
pub fn is_accepted_image(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ACCEPTED_IMAGE_TYPES.contains(&essence.as_str())
}

/// Same check, applied to a received file
pub fn is_image_file(file: &ImageFile) -> bool {
    is_accepted_image(&file.content_type)
}

/// Human-readable size with up to two decimals (`0 Bytes`, `1.5 KB`, `5 MB`)
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// `{base}_{timestamp_ms}.{ext}`; names without an extension get `{name}_{timestamp_ms}`
pub fn unique_file_name(file_name: &str, timestamp_ms: i64) -> String {
    match file_name.rsplit_once('.') {
        Some((base, ext)) => format!("{}_{}.{}", base, timestamp_ms, ext),
        None => format!("{}_{}", file_name, timestamp_ms),
    }
}
