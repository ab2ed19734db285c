use std::io::Cursor;

use anyhow::{Context, Result};
use base64::Engine as _;
use image::{ImageFormat, RgbImage};

/// Content type of every image payload; see [`encode_png`].
pub const IMAGE_PNG: &str = "image/png";

/// Re-encodes a decoded image as PNG so every provider receives the same bytes
/// regardless of the source file format.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .context("Failed to encode image as PNG")?;
    Ok(bytes.into_inner())
}

pub fn encode_byte_to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn encode_image_to_base64(image: &RgbImage) -> Result<String> {
    let bytes = encode_png(image)?;
    Ok(encode_byte_to_base64(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_content_type_matches_encoding() {
        let image = RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 0]));
        let bytes = encode_png(&image).unwrap();
        let format = image::guess_format(&bytes).unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!(IMAGE_PNG, format.to_mime_type());
    }

    #[test]
    fn encoded_png_has_signature() {
        let image = RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]));
        let bytes = encode_png(&image).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let b64 = encode_image_to_base64(&image).unwrap();
        assert!(b64.starts_with("iVBORw0KGgo"));
    }
}
