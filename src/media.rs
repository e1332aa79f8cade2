use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::error::InputError;

pub const DEFAULT_MAX_MEDIA_BYTES: usize = 50 * 1024 * 1024;

const EBML_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaKind {
    Jpeg,
    Png,
    WebP,
    Mp4,
    WebM,
}

impl MediaKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaKind::Jpeg => "image/jpeg",
            MediaKind::Png => "image/png",
            MediaKind::WebP => "image/webp",
            MediaKind::Mp4 => "video/mp4",
            MediaKind::WebM => "video/webm",
        }
    }

    pub fn from_mime_type(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(MediaKind::Jpeg),
            "image/png" => Some(MediaKind::Png),
            "image/webp" => Some(MediaKind::WebP),
            "video/mp4" => Some(MediaKind::Mp4),
            "video/webm" => Some(MediaKind::WebM),
            _ => None,
        }
    }
}

fn sniff(media: &[u8]) -> Option<MediaKind> {
    if media.len() >= 12 && &media[4..8] == b"ftyp" {
        return Some(MediaKind::Mp4);
    }
    if media.starts_with(&EBML_MAGIC) {
        return Some(MediaKind::WebM);
    }
    match image::guess_format(media).ok()? {
        ImageFormat::Jpeg => Some(MediaKind::Jpeg),
        ImageFormat::Png => Some(MediaKind::Png),
        ImageFormat::WebP => Some(MediaKind::WebP),
        _ => None,
    }
}

/// Checks size and content type of an upload before anything else touches it.
/// A declared type must be supported and agree with the sniffed content.
pub fn validate_media(
    media: &[u8],
    declared_type: Option<&str>,
    max_bytes: usize,
) -> Result<MediaKind, InputError> {
    if media.is_empty() {
        return Err(InputError::EmptyMedia);
    }
    if media.len() > max_bytes {
        return Err(InputError::TooLarge {
            size: media.len(),
            max: max_bytes,
        });
    }

    let declared = match declared_type {
        Some(raw) => Some(
            MediaKind::from_mime_type(raw)
                .ok_or_else(|| InputError::UnsupportedMediaType(raw.to_string()))?,
        ),
        None => None,
    };

    let detected = sniff(media)
        .ok_or_else(|| InputError::UnsupportedMediaType("unrecognised content".to_string()))?;

    match declared {
        Some(kind) if kind != detected => Err(InputError::UnsupportedMediaType(format!(
            "declared {} but content is {}",
            kind.mime_type(),
            detected.mime_type()
        ))),
        _ => Ok(detected),
    }
}
