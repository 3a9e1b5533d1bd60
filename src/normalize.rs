//! # Image Normalizer
//!
//! Bounds the size of raster assets before they are embedded in a report.
//!
//! A payload at or under [`SIZE_THRESHOLD`] is embedded as-is, byte for byte.
//! A larger one is decoded, scaled so that neither side exceeds
//! [`MAX_DIMENSION`], and re-encoded as JPEG at [`JPEG_QUALITY`]. The width
//! cap is applied first and the height cap second, each to the dimensions
//! the previous step produced.
//!
//! Decoding failures never abort a report: they produce an empty payload and
//! the image slot is left blank.

use std::io::Cursor;

use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

use crate::assets::{AssetError, AssetSource};
use crate::image_loader::{read_dimensions, ImageFormat};

/// Payloads larger than this many bytes are downscaled.
pub const SIZE_THRESHOLD: usize = 500 * 1024;
/// Longest allowed side, in pixels, after downscaling.
pub const MAX_DIMENSION: f64 = 800.0;
/// Quality of the lossy re-encode (0.7 on a 0..1 scale).
pub const JPEG_QUALITY: u8 = 70;

/// An embeddable image payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    /// Pixel dimensions, when they could be read.
    pub dimensions: Option<(u32, u32)>,
    /// Whether the payload came out of the resize step.
    pub resized: bool,
}

impl NormalizedImage {
    pub fn empty() -> Self {
        Self {
            bytes: Vec::new(),
            format: ImageFormat::Unknown,
            dimensions: None,
            resized: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The payload as a `data:` URI. Empty for an empty payload.
    pub fn to_data_uri(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Two-stage aspect-preserving cap: width first, then height.
pub fn target_dimensions(width: f64, height: f64) -> (f64, f64) {
    let (mut w, mut h) = (width, height);
    // The capped side is assigned, not multiplied, so it lands on exactly 800.
    if w > MAX_DIMENSION {
        h *= MAX_DIMENSION / w;
        w = MAX_DIMENSION;
    }
    if h > MAX_DIMENSION {
        w *= MAX_DIMENSION / h;
        h = MAX_DIMENSION;
    }
    (w, h)
}

/// Normalize an in-memory payload.
pub fn normalize_bytes(bytes: Vec<u8>) -> NormalizedImage {
    if bytes.len() <= SIZE_THRESHOLD {
        return NormalizedImage {
            format: ImageFormat::sniff(&bytes),
            dimensions: read_dimensions(&bytes).ok(),
            bytes,
            resized: false,
        };
    }

    let original_len = bytes.len();
    match downscale(&bytes) {
        Ok(image) => {
            log::info!(
                "downscaled image from {} to {} bytes ({:?})",
                original_len,
                image.bytes.len(),
                image.dimensions
            );
            image
        }
        Err(e) => {
            log::warn!("image of {} bytes could not be normalized, leaving it out: {}", original_len, e);
            NormalizedImage::empty()
        }
    }
}

fn downscale(bytes: &[u8]) -> Result<NormalizedImage, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let (w, h) = target_dimensions(decoded.width() as f64, decoded.height() as f64);
    let (tw, th) = ((w as u32).max(1), (h as u32).max(1));

    let rgba = decoded.to_rgba8();
    let scaled = image::imageops::resize(&rgba, tw, th, FilterType::Triangle);
    let flattened = flatten_onto_white(&DynamicImage::ImageRgba8(scaled));

    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode(
        flattened.as_raw(),
        tw,
        th,
        image::ColorType::Rgb8,
    )?;

    Ok(NormalizedImage {
        bytes: out.into_inner(),
        format: ImageFormat::Jpeg,
        dimensions: Some((tw, th)),
        resized: true,
    })
}

/// JPEG has no alpha channel.
fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let p = rgba.get_pixel(x, y).0;
        let alpha = p[3] as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        image::Rgb([blend(p[0]), blend(p[1]), blend(p[2])])
    })
}

/// Fetch one asset and normalize it.
///
/// Fetch failures are returned to the caller; decode failures become an
/// empty payload. An empty URL means "no asset" and fetches nothing.
pub async fn normalize_image(
    source: &dyn AssetSource,
    url: &str,
) -> Result<NormalizedImage, AssetError> {
    if url.trim().is_empty() {
        return Ok(NormalizedImage::empty());
    }
    let bytes = source.fetch(url).await?;
    log::debug!("normalizing {} ({} bytes)", url, bytes.len());
    match tokio::task::spawn_blocking(move || normalize_bytes(bytes)).await {
        Ok(image) => Ok(image),
        Err(e) => {
            log::warn!("normalizer task for {} did not complete: {}", url, e);
            Ok(NormalizedImage::empty())
        }
    }
}

/// Fetch and normalize the logo and the QR code concurrently, returning once
/// both are done.
pub async fn normalize_pair(
    source: &dyn AssetSource,
    logo_url: &str,
    qr_url: &str,
) -> (
    Result<NormalizedImage, AssetError>,
    Result<NormalizedImage, AssetError>,
) {
    tokio::join!(normalize_image(source, logo_url), normalize_image(source, qr_url))
}
