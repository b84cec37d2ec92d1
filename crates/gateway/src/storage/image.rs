//! Image upload checks.
//!
//! A file is accepted only when the declared content type, the size and the
//! leading magic bytes all agree.

use common::{AppError, AppResult};
use domain::{ALLOWED_IMAGE_CONTENT_TYPES, MAX_IMAGE_UPLOAD_BYTES};

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
        }
    }

    fn magic(&self) -> &'static [u8] {
        match self {
            ImageKind::Jpeg => JPEG_MAGIC,
            ImageKind::Png => PNG_MAGIC,
        }
    }

    pub fn matches(&self, bytes: &[u8]) -> bool {
        bytes.starts_with(self.magic())
    }
}

/// Validate an uploaded file and tell which kind of image it is.
pub fn check_image(content_type: Option<&str>, bytes: &[u8]) -> AppResult<ImageKind> {
    let kind = content_type
        .and_then(ImageKind::from_content_type)
        .ok_or_else(|| {
            AppError::validation(format!(
                "Only {} images are accepted",
                ALLOWED_IMAGE_CONTENT_TYPES.join(", ")
            ))
        })?;

    if bytes.is_empty() {
        return Err(AppError::validation("Uploaded file is empty"));
    }
    if bytes.len() > MAX_IMAGE_UPLOAD_BYTES {
        return Err(AppError::validation(format!(
            "Images may not exceed {} MiB",
            MAX_IMAGE_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    if !kind.matches(bytes) {
        return Err(AppError::validation(
            "File content does not match its content type",
        ));
    }

    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(len: usize) -> Vec<u8> {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.resize(len.max(PNG_MAGIC.len()), 0);
        bytes
    }

    #[test]
    fn accepts_png_with_matching_signature() {
        assert_eq!(check_image(Some("image/png"), &png(64)).unwrap(), ImageKind::Png);
    }

    #[test]
    fn accepts_jpeg_with_parameters_in_content_type() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let kind = check_image(Some("image/JPEG; charset=binary"), &bytes).unwrap();
        assert_eq!(kind, ImageKind::Jpeg);
        assert_eq!(kind.extension(), "jpg");
    }

    #[test]
    fn rejects_other_content_types() {
        let result = check_image(Some("image/gif"), b"GIF89a");
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(check_image(None, &png(8)).is_err());
    }

    #[test]
    fn rejects_files_over_the_limit() {
        let result = check_image(Some("image/png"), &png(MAX_IMAGE_UPLOAD_BYTES + 1));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn accepts_file_exactly_at_the_limit() {
        assert!(check_image(Some("image/png"), &png(MAX_IMAGE_UPLOAD_BYTES)).is_ok());
    }

    #[test]
    fn rejects_disguised_files() {
        let result = check_image(Some("image/jpeg"), &png(32));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_empty_files() {
        assert!(check_image(Some("image/png"), &[]).is_err());
    }
}
