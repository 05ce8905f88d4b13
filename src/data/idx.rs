//! IDX decoding for MNIST-style image/label file pairs.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions = 3)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x01        (number of dimensions = 1)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index in [0, n_classes)
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::data::sample::{one_hot, Sample};
use crate::error::{NetError, Result};

const IMAGE_HEADER_LEN: usize = 16;
const LABEL_HEADER_LEN: usize = 8;

/// Decodes an image file and a label file into samples.
///
/// Pixels are divided by 255.0 so inputs lie in `[0.0, 1.0]`; labels become
/// one-hot vectors of length `n_classes`.
pub fn parse_idx_pair(
    image_bytes: &[u8],
    label_bytes: &[u8],
    n_classes: usize,
) -> Result<Vec<Sample>> {
    if n_classes < 2 {
        return Err(NetError::Dataset(format!(
            "n_classes must be at least 2, got {}",
            n_classes
        )));
    }

    // ── Image file validation ───────────────────────────────────────────────

    check_header(image_bytes, IMAGE_HEADER_LEN, 0x03, "image")?;
    let n_items = read_be_u32(image_bytes, 4);
    let rows = read_be_u32(image_bytes, 8);
    let cols = read_be_u32(image_bytes, 12);

    let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
        NetError::Dataset(format!("image size {}x{} overflows", rows, cols))
    })?;
    let image_data_len = n_items.checked_mul(n_pixels).ok_or_else(|| {
        NetError::Dataset(format!("{} images of {} pixels overflows", n_items, n_pixels))
    })?;
    let image_data = image_bytes
        .get(IMAGE_HEADER_LEN..IMAGE_HEADER_LEN + image_data_len)
        .ok_or_else(|| {
            NetError::Dataset(format!(
                "image file declares {} items of {}x{} pixels but is only {} bytes",
                n_items,
                rows,
                cols,
                image_bytes.len()
            ))
        })?;

    // ── Label file validation ───────────────────────────────────────────────

    check_header(label_bytes, LABEL_HEADER_LEN, 0x01, "label")?;
    let label_count = read_be_u32(label_bytes, 4);
    if label_count != n_items {
        return Err(NetError::Dataset(format!(
            "image file declares {} items but label file declares {}",
            n_items, label_count
        )));
    }
    let label_data = label_bytes
        .get(LABEL_HEADER_LEN..LABEL_HEADER_LEN + n_items)
        .ok_or_else(|| {
            NetError::Dataset(format!(
                "label file declares {} labels but is only {} bytes",
                n_items,
                label_bytes.len()
            ))
        })?;

    // ── Build samples ───────────────────────────────────────────────────────

    let mut samples = Vec::with_capacity(n_items);
    for (i, &class) in label_data.iter().enumerate() {
        let class = class as usize;
        if class >= n_classes {
            return Err(NetError::Dataset(format!(
                "label {}: class {} is out of range for {} classes",
                i, class, n_classes
            )));
        }
        let pixels = &image_data[i * n_pixels..(i + 1) * n_pixels];
        let input = pixels.iter().map(|&px| px as f64 / 255.0).collect();
        samples.push(Sample::new(input, one_hot(class, n_classes)));
    }

    Ok(samples)
}

/// Reads and decodes an image/label file pair from disk.
///
/// Files whose name ends in `.gz` are decompressed first, so the MNIST
/// distribution files can be used as downloaded.
pub fn load_idx_pair<P: AsRef<Path>, Q: AsRef<Path>>(
    image_path: P,
    label_path: Q,
    n_classes: usize,
) -> Result<Vec<Sample>> {
    let image_bytes = read_maybe_gz(image_path.as_ref())?;
    let label_bytes = read_maybe_gz(label_path.as_ref())?;
    let samples = parse_idx_pair(&image_bytes, &label_bytes, n_classes)?;
    debug!(
        images = %image_path.as_ref().display(),
        count = samples.len(),
        "loaded IDX dataset"
    );
    Ok(samples)
}

fn read_maybe_gz(path: &Path) -> Result<Vec<u8>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut bytes = Vec::new();
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        GzDecoder::new(reader).read_to_end(&mut bytes)?;
    } else {
        reader.read_to_end(&mut bytes)?;
    }
    Ok(bytes)
}

fn check_header(bytes: &[u8], header_len: usize, dims: u8, kind: &str) -> Result<()> {
    if bytes.len() < header_len {
        return Err(NetError::Dataset(format!(
            "{} file too short: expected at least {} header bytes, got {}",
            kind,
            header_len,
            bytes.len()
        )));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(NetError::Dataset(format!(
            "{} file: bytes 0-1 must be 0x00 0x00, got 0x{:02X} 0x{:02X}",
            kind, bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(NetError::Dataset(format!(
            "{} file: dtype byte must be 0x08 (uint8), got 0x{:02X}",
            kind, bytes[2]
        )));
    }
    if bytes[3] != dims {
        return Err(NetError::Dataset(format!(
            "{} file: expected {} dimensions, got {}",
            kind, dims, bytes[3]
        )));
    }
    Ok(())
}

fn read_be_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0x00, 0x00, 0x08, 0x03];
        bytes.extend_from_slice(&n.to_be_bytes());
        bytes.extend_from_slice(&rows.to_be_bytes());
        bytes.extend_from_slice(&cols.to_be_bytes());
        bytes.extend_from_slice(pixels);
        bytes
    }

    fn labels(classes: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0x00, 0x00, 0x08, 0x01];
        bytes.extend_from_slice(&(classes.len() as u32).to_be_bytes());
        bytes.extend_from_slice(classes);
        bytes
    }

    #[test]
    fn decodes_and_normalizes() {
        let samples = parse_idx_pair(
            &images(2, 1, 2, &[0, 255, 51, 102]),
            &labels(&[1, 2]),
            3,
        )
        .unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].input, vec![0.0, 1.0]);
        assert_eq!(samples[0].expected, vec![0.0, 1.0, 0.0]);
        assert_eq!(samples[1].input, vec![0.2, 0.4]);
        assert_eq!(samples[1].expected, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_count_mismatch() {
        let err = parse_idx_pair(&images(2, 1, 1, &[0, 0]), &labels(&[0]), 2).unwrap_err();
        assert!(matches!(err, NetError::Dataset(_)));
    }

    #[test]
    fn rejects_truncated_pixels() {
        let err = parse_idx_pair(&images(2, 2, 2, &[0; 5]), &labels(&[0, 1]), 2).unwrap_err();
        assert!(matches!(err, NetError::Dataset(_)));
    }

    #[test]
    fn rejects_wrong_dimensions_byte() {
        // label bytes handed in as the image file
        let err = parse_idx_pair(&labels(&[0; 16]), &labels(&[0]), 2).unwrap_err();
        assert!(matches!(err, NetError::Dataset(_)));
    }

    #[test]
    fn rejects_out_of_range_label() {
        let err = parse_idx_pair(&images(1, 1, 1, &[9]), &labels(&[7]), 5).unwrap_err();
        assert!(matches!(err, NetError::Dataset(_)));
    }
}
