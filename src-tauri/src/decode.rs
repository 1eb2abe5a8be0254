//! QR code decoding with `rqrr`.
//!
//! Pure: pixels in, payload strings out.

use image::{imageops, DynamicImage, RgbaImage};

/// Decodes every QR code in `image`.
///
/// Payloads come back in detection order with duplicates removed. With a
/// non-zero `max_dim` the image is downsampled first so its longer side
/// fits, which trades small codes for speed on large captures.
pub fn find_qr_codes(image: &RgbaImage, max_dim: u32) -> Vec<String> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let gray = if max_dim > 0 && w.max(h) > max_dim {
        let factor = w.max(h) as f32 / max_dim as f32;
        let new_w = ((w as f32 / factor) as u32).max(1);
        let new_h = ((h as f32 / factor) as u32).max(1);
        let resized = imageops::resize(image, new_w, new_h, imageops::FilterType::Triangle);
        DynamicImage::ImageRgba8(resized).to_luma8()
    } else {
        imageops::grayscale(image)
    };

    let mut prepared = rqrr::PreparedImage::prepare(gray);
    let mut codes: Vec<String> = Vec::new();

    for grid in prepared.detect_grids() {
        match grid.decode() {
            Ok((_, content)) => {
                if !codes.contains(&content) {
                    codes.push(content);
                }
            }
            Err(e) => log::debug!("[DECODE] grid found but not decodable: {:?}", e),
        }
    }

    log::info!("[DECODE] {}x{} image -> {} code(s)", w, h, codes.len());
    codes
}
