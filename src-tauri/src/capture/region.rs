//! Pure region cropping logic.
//!
//! This module has zero infrastructure dependencies.
//! It takes pixel data in, returns pixel data out.

use crate::selection::AreaRequest;
use image::{imageops, RgbaImage};

/// Crops a full-screen capture to a selection made in logical pixels.
///
/// # Arguments
/// * `image` - The full screenshot, in physical pixels
/// * `area` - The normalized selection, in logical pixels
/// * `scale` - Monitor scale factor (physical / logical)
/// * `padding` - Extra logical rows kept below the selection
///
/// Parts of the selection that fall outside the screen are clipped.
pub fn crop_area(
    image: &RgbaImage,
    area: &AreaRequest,
    scale: f32,
    padding: u32,
) -> Result<RgbaImage, CropError> {
    if area.is_empty() {
        return Err(CropError::ZeroDimension);
    }

    let scale = if scale.is_finite() && scale > 0.0 { scale as f64 } else { 1.0 };
    let to_px = |v: f64| (v * scale).round() as i64;

    let left = to_px(area.x as f64);
    let top = to_px(area.y as f64);
    let right = to_px(area.x as f64 + area.width as f64);
    let bottom = to_px(area.y as f64 + area.height as f64 + padding as f64);

    let (img_width, img_height) = (image.width() as i64, image.height() as i64);

    let x0 = left.clamp(0, img_width);
    let y0 = top.clamp(0, img_height);
    let x1 = right.clamp(0, img_width);
    let y1 = bottom.clamp(0, img_height);

    if x1 <= x0 || y1 <= y0 {
        return Err(CropError::OutOfBounds {
            requested: (area.x, area.y, area.width, area.height),
            image_size: (image.width(), image.height()),
        });
    }

    let cropped = imageops::crop_imm(
        image,
        x0 as u32,
        y0 as u32,
        (x1 - x0) as u32,
        (y1 - y0) as u32,
    )
    .to_image();

    Ok(cropped)
}

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Crop rectangle has zero width or height")]
    ZeroDimension,

    #[error(
        "Crop rectangle ({},{},{},{}) lies outside the screen ({}x{})",
        requested.0, requested.1, requested.2, requested.3,
        image_size.0, image_size.1
    )]
    OutOfBounds {
        requested: (i32, i32, u32, u32),
        image_size: (u32, u32),
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(x: i32, y: i32, width: u32, height: u32) -> AreaRequest {
        AreaRequest {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn crop_valid_region() {
        let img = RgbaImage::new(100, 100);
        let cropped = crop_area(&img, &area(10, 10, 50, 20), 1.0, 0).unwrap();
        assert_eq!(cropped.dimensions(), (50, 20));
    }

    #[test]
    fn crop_applies_scale_factor() {
        let img = RgbaImage::new(200, 200);
        let cropped = crop_area(&img, &area(10, 10, 30, 20), 2.0, 0).unwrap();
        assert_eq!(cropped.dimensions(), (60, 40));
    }

    #[test]
    fn padding_extends_height_and_is_clipped() {
        let img = RgbaImage::new(100, 100);
        let cropped = crop_area(&img, &area(0, 10, 20, 20), 1.0, 48).unwrap();
        assert_eq!(cropped.dimensions(), (20, 68));

        let cropped = crop_area(&img, &area(0, 60, 20, 20), 1.0, 48).unwrap();
        assert_eq!(cropped.dimensions(), (20, 40));
    }

    #[test]
    fn crop_zero_dimension_fails() {
        let img = RgbaImage::new(100, 100);
        let result = crop_area(&img, &area(0, 0, 0, 50), 1.0, 48);
        assert!(matches!(result, Err(CropError::ZeroDimension)));
    }

    #[test]
    fn crop_partially_offscreen_is_clipped() {
        let img = RgbaImage::new(100, 100);
        let cropped = crop_area(&img, &area(-10, 80, 30, 30), 1.0, 0).unwrap();
        assert_eq!(cropped.dimensions(), (20, 20));
    }

    #[test]
    fn crop_out_of_bounds_fails() {
        let img = RgbaImage::new(100, 100);
        let result = crop_area(&img, &area(120, 10, 30, 30), 1.0, 0);
        assert!(matches!(result, Err(CropError::OutOfBounds { .. })));
    }

    #[test]
    fn invalid_scale_falls_back_to_one() {
        let img = RgbaImage::new(100, 100);
        let cropped = crop_area(&img, &area(0, 0, 10, 10), f32::NAN, 0).unwrap();
        assert_eq!(cropped.dimensions(), (10, 10));
    }
}
