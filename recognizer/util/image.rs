//! Image preprocessing for the recognizer.
//!
//! Decodes image bytes (PNG/JPEG/BMP/GIF), resizes them to the network's
//! input grid, and normalizes pixel values to the [0, 1] range.

/// Decodes image bytes, resizes to `width × height`, converts to grayscale,
/// and normalizes pixels to [0, 1].
///
/// Returns a flat row-major `Vec<f64>` of length `width * height`.
pub fn image_bytes_to_grayscale_input(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<f64>, String> {
    let img = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    let resized = img.resize_exact(width, height, image::imageops::FilterType::Triangle);
    let gray = resized.to_luma8();
    Ok(gray.pixels().map(|p| p.0[0] as f64 / 255.0).collect())
}

/// Side length of a square image with `n_pixels` pixels, if there is one.
pub fn square_side(n_pixels: usize) -> Option<u32> {
    let side = (n_pixels as f64).sqrt().round() as usize;
    if side > 0 && side * side == n_pixels {
        u32::try_from(side).ok()
    } else {
        None
    }
}
