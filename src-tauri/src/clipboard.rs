//! System clipboard access via `arboard`.

use arboard::Clipboard;
use image::RgbaImage;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Clipboard does not contain an image")]
    NoImage,

    #[error("Clipboard image is malformed ({width}x{height}, {len} bytes)")]
    BadImage {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("Failed to write clipboard: {0}")]
    WriteFailed(String),
}

/// Text placed on the clipboard for a set of decoded payloads, one per line.
pub fn clipboard_text(codes: &[String]) -> String {
    codes.join("\n")
}

pub fn copy_codes(codes: &[String]) -> Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
    clipboard
        .set_text(clipboard_text(codes))
        .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;
    log::info!("[CLIPBOARD] copied {} code(s)", codes.len());
    Ok(())
}

pub fn read_image() -> Result<RgbaImage, ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
    let data = clipboard.get_image().map_err(|_| ClipboardError::NoImage)?;

    let (width, height, len) = (data.width, data.height, data.bytes.len());
    RgbaImage::from_raw(width as u32, height as u32, data.bytes.into_owned())
        .ok_or(ClipboardError::BadImage { width, height, len })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_payload_per_line() {
        let codes = vec!["https://example.com".to_string(), "WIFI:S:home;;".to_string()];
        assert_eq!(clipboard_text(&codes), "https://example.com\nWIFI:S:home;;");
    }

    #[test]
    fn single_payload_is_copied_verbatim() {
        assert_eq!(clipboard_text(&["abc".to_string()]), "abc");
    }
}
