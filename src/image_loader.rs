//! # Image Loading and Decoding
//!
//! Turns an embedded image payload (data URI or raw base64) into data the PDF
//! writer can consume. JPEG images pass through without re-encoding (PDF
//! readers decode DCTDecode natively). PNG images are decoded to RGB pixels
//! with a separate alpha channel for SMask transparency.

use std::io::Cursor;

use base64::Engine;
use thiserror::Error;

/// A fully decoded/loaded image ready for PDF embedding.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

/// The pixel data in a format the PDF serializer can consume directly.
#[derive(Debug, Clone)]
pub enum ImagePixelData {
    /// Raw JPEG bytes, embedded directly with DCTDecode.
    Jpeg {
        data: Vec<u8>,
        color_space: JpegColorSpace,
    },
    /// Decoded RGB pixels + optional alpha channel.
    Decoded {
        /// width * height * 3 bytes (RGB)
        rgb: Vec<u8>,
        /// width * height bytes (grayscale alpha). None if fully opaque.
        alpha: Option<Vec<u8>>,
    },
}

/// JPEG color space for the PDF /ColorSpace entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JpegColorSpace {
    DeviceRGB,
    DeviceGray,
}

/// Raster formats recognized by magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Unknown,
}

impl ImageFormat {
    /// Sniff the format from the first bytes of an image.
    pub fn sniff(data: &[u8]) -> Self {
        if is_jpeg(data) {
            ImageFormat::Jpeg
        } else if is_png(data) {
            ImageFormat::Png
        } else {
            ImageFormat::Unknown
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Unknown => "application/octet-stream",
        }
    }
}

#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("invalid data URI: missing comma")]
    InvalidDataUri,
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image data too short")]
    TooShort,
    #[error("unsupported image format (expected JPEG or PNG)")]
    UnsupportedFormat,
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("failed to read image header: {0}")]
    Header(#[from] std::io::Error),
}

/// Load an image from a source string.
///
/// Supported `src` formats:
/// - `data:image/...;base64,...` data URI
/// - Raw base64-encoded image data
pub fn load_image(src: &str) -> Result<LoadedImage, ImageLoadError> {
    let raw_bytes = read_source_bytes(src)?;
    decode_image_bytes(&raw_bytes)
}

/// Read pixel dimensions from image bytes without decoding the pixels.
pub fn read_dimensions(data: &[u8]) -> Result<(u32, u32), ImageLoadError> {
    let reader = image::io::Reader::new(Cursor::new(data)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

fn read_source_bytes(src: &str) -> Result<Vec<u8>, ImageLoadError> {
    let b64_data = if src.starts_with("data:") {
        let comma_pos = src.find(',').ok_or(ImageLoadError::InvalidDataUri)?;
        &src[comma_pos + 1..]
    } else {
        src
    };
    Ok(base64::engine::general_purpose::STANDARD.decode(b64_data)?)
}

/// Detect image format from magic bytes and decode accordingly.
fn decode_image_bytes(data: &[u8]) -> Result<LoadedImage, ImageLoadError> {
    if data.len() < 4 {
        return Err(ImageLoadError::TooShort);
    }

    match ImageFormat::sniff(data) {
        ImageFormat::Jpeg => decode_jpeg(data),
        ImageFormat::Png => decode_png(data),
        ImageFormat::Unknown => Err(ImageLoadError::UnsupportedFormat),
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn is_png(data: &[u8]) -> bool {
    data.len() >= 4 && data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47
}

/// JPEG: read dimensions and color space without decoding pixels.
fn decode_jpeg(data: &[u8]) -> Result<LoadedImage, ImageLoadError> {
    let (width, height) = read_dimensions(data)?;
    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: data.to_vec(),
            color_space: detect_jpeg_color_space(data),
        },
        width_px: width,
        height_px: height,
    })
}

/// Scan JPEG markers for the SOF segment and read its component count.
fn detect_jpeg_color_space(data: &[u8]) -> JpegColorSpace {
    let mut i = 2; // skip SOI marker (FF D8)
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            break;
        }
        let marker = data[i + 1];
        // SOF markers: C0-C3, C5-C7, C9-CB, CD-CF
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_sof && i + 9 < data.len() {
            return if data[i + 9] == 1 {
                JpegColorSpace::DeviceGray
            } else {
                JpegColorSpace::DeviceRGB
            };
        }
        if i + 3 < data.len() {
            let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            i += 2 + seg_len;
        } else {
            break;
        }
    }
    JpegColorSpace::DeviceRGB
}

/// PNG: decode to RGBA, split into RGB + alpha.
fn decode_png(data: &[u8]) -> Result<LoadedImage, ImageLoadError> {
    let img = image::load_from_memory_with_format(data, image::ImageFormat::Png)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixel_count = (width * height) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    let mut has_transparency = false;

    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel[3]);
        has_transparency |= pixel[3] != 255;
    }

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: has_transparency.then_some(alpha),
        },
        width_px: width,
        height_px: height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(pixel: [u8; 4]) -> Vec<u8> {
        let mut img = image::RgbaImage::new(1, 1);
        img.put_pixel(0, 0, image::Rgba(pixel));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 1, 1, image::ColorType::Rgba8)
            .unwrap();
        buf
    }

    #[test]
    fn test_sniff() {
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::sniff(&[0x89, 0x50, 0x4E, 0x47]), ImageFormat::Png);
        assert_eq!(ImageFormat::sniff(&[0xFF]), ImageFormat::Unknown);
    }

    #[test]
    fn test_invalid_data_uri() {
        assert!(matches!(
            load_image("data:image/png;base64"),
            Err(ImageLoadError::InvalidDataUri)
        ));
    }

    #[test]
    fn test_too_short_data() {
        assert!(matches!(decode_image_bytes(&[0x00, 0x01]), Err(ImageLoadError::TooShort)));
    }

    #[test]
    fn test_unsupported_format() {
        assert!(matches!(
            decode_image_bytes(&[0x00, 0x01, 0x02, 0x03, 0x04]),
            Err(ImageLoadError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_decode_png_with_alpha() {
        let loaded = decode_image_bytes(&png_bytes([255, 0, 0, 128])).unwrap();
        match &loaded.pixel_data {
            ImagePixelData::Decoded { rgb, alpha } => {
                assert_eq!(rgb, &[255, 0, 0]);
                assert_eq!(alpha.as_ref().unwrap(), &[128]);
            }
            _ => panic!("PNG should decode to Decoded variant"),
        }
    }

    #[test]
    fn test_opaque_png_has_no_alpha() {
        let loaded = decode_image_bytes(&png_bytes([0, 255, 0, 255])).unwrap();
        match &loaded.pixel_data {
            ImagePixelData::Decoded { alpha, .. } => assert!(alpha.is_none()),
            _ => panic!("PNG should decode to Decoded variant"),
        }
    }

    #[test]
    fn test_decode_minimal_jpeg() {
        let img = image::RgbImage::from_fn(2, 2, |_, _| image::Rgb([0, 128, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 2, 2, image::ColorType::Rgb8)
            .unwrap();

        let loaded = decode_image_bytes(&buf).unwrap();
        assert_eq!((loaded.width_px, loaded.height_px), (2, 2));
        match &loaded.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                assert!(data.starts_with(&[0xFF, 0xD8]));
                assert_eq!(*color_space, JpegColorSpace::DeviceRGB);
            }
            _ => panic!("JPEG should stay as Jpeg variant"),
        }
    }

    #[test]
    fn test_base64_data_uri() {
        let b64 = base64::engine::general_purpose::STANDARD.encode(png_bytes([0, 255, 0, 255]));
        let data_uri = format!("data:image/png;base64,{}", b64);
        let loaded = load_image(&data_uri).unwrap();
        assert_eq!((loaded.width_px, loaded.height_px), (1, 1));
        assert_eq!(load_image(&b64).unwrap().width_px, 1);
    }
}
