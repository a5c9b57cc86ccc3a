//! Pixel dimensions of an uploaded photo, read from the JPEG frame header.

use bytes::Bytes;
use roster_core::Dimensions;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhotoError {
    #[error("not a JPEG stream")]
    NotJpeg,
    #[error("truncated JPEG segment at offset {0}")]
    Truncated(usize),
    #[error("no frame header before image data")]
    NoFrameHeader,
    #[error("frame header reports zero size")]
    EmptyFrame,
    #[error("decode worker failed: {0}")]
    Worker(String),
}

/// Start-of-frame markers carry the image size. DHT (C4), JPG (C8) and DAC
/// (CC) share the range but are not frames.
fn is_start_of_frame(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

fn read_u16(bytes: &[u8], offset: usize) -> Result<u16, PhotoError> {
    match bytes.get(offset..offset + 2) {
        Some(&[high, low]) => Ok(u16::from_be_bytes([high, low])),
        _ => Err(PhotoError::Truncated(offset)),
    }
}

/// Walks the marker segments up to the first frame header.
pub fn jpeg_dimensions(bytes: &[u8]) -> Result<Dimensions, PhotoError> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return Err(PhotoError::NotJpeg);
    }
    let mut offset = 2;
    loop {
        if bytes.get(offset) != Some(&0xFF) {
            return Err(PhotoError::Truncated(offset));
        }
        // Markers may be preceded by any number of fill bytes.
        while bytes.get(offset) == Some(&0xFF) {
            offset += 1;
        }
        let marker = *bytes.get(offset).ok_or(PhotoError::Truncated(offset))?;
        offset += 1;

        match marker {
            0x01 | 0xD0..=0xD8 => continue,
            0xD9 | 0xDA => return Err(PhotoError::NoFrameHeader),
            _ => {}
        }

        let length = usize::from(read_u16(bytes, offset)?);
        if length < 2 {
            return Err(PhotoError::Truncated(offset));
        }
        if is_start_of_frame(marker) {
            // precision (1), height (2), width (2)
            let height = read_u16(bytes, offset + 3)?;
            let width = read_u16(bytes, offset + 5)?;
            if width == 0 || height == 0 {
                return Err(PhotoError::EmptyFrame);
            }
            return Ok(Dimensions::new(u32::from(width), u32::from(height)));
        }
        offset += length;
    }
}

/// Decodes on the blocking pool so other tasks keep running meanwhile.
pub async fn read_photo_dimensions(bytes: Bytes) -> Result<Dimensions, PhotoError> {
    tokio::task::spawn_blocking(move || jpeg_dimensions(&bytes))
        .await
        .map_err(|err| PhotoError::Worker(err.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_jpeg() {
        assert_eq!(jpeg_dimensions(b"\x89PNG\r\n"), Err(PhotoError::NotJpeg));
        assert_eq!(jpeg_dimensions(b""), Err(PhotoError::NotJpeg));
    }

    #[test]
    fn truncated_segment_is_reported() {
        assert_eq!(
            jpeg_dimensions(&[0xFF, 0xD8, 0xFF, 0xC0, 0x00]),
            Err(PhotoError::Truncated(4))
        );
    }

    #[test]
    fn scan_before_frame_is_an_error() {
        assert_eq!(
            jpeg_dimensions(&[0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x02]),
            Err(PhotoError::NoFrameHeader)
        );
    }
}
