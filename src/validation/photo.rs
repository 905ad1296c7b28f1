use std::path::Path;

/// Upload cap for profile photos
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

pub const ALLOWED_PHOTO_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];

pub const PHOTO_TOO_LARGE_MESSAGE: &str = "Profile photo must be smaller than 5MB";
pub const PHOTO_TYPE_MESSAGE: &str = "Profile photo must be a JPEG, PNG or GIF image";

/// Guess the MIME type from the file extension
pub fn photo_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" => Some("image/jpg"),
        "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Size and type checks that must pass before any upload is attempted
pub fn validate_photo(mime: Option<&str>, size: u64) -> Result<(), &'static str> {
    if size > MAX_PHOTO_BYTES {
        return Err(PHOTO_TOO_LARGE_MESSAGE);
    }
    match mime {
        Some(m) if ALLOWED_PHOTO_TYPES.contains(&m.to_ascii_lowercase().as_str()) => Ok(()),
        _ => Err(PHOTO_TYPE_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allowed_types_under_limit() {
        assert_eq!(validate_photo(Some("image/png"), 1024), Ok(()));
        assert_eq!(validate_photo(Some("IMAGE/JPEG"), MAX_PHOTO_BYTES), Ok(()));
    }

    #[test]
    fn rejects_oversize_before_type() {
        assert_eq!(validate_photo(Some("image/png"), MAX_PHOTO_BYTES + 1), Err(PHOTO_TOO_LARGE_MESSAGE));
        assert_eq!(validate_photo(Some("image/webp"), 10), Err(PHOTO_TYPE_MESSAGE));
        assert_eq!(validate_photo(None, 10), Err(PHOTO_TYPE_MESSAGE));
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(photo_mime(Path::new("me.JPG")), Some("image/jpg"));
        assert_eq!(photo_mime(Path::new("me.gif")), Some("image/gif"));
        assert_eq!(photo_mime(Path::new("me.bmp")), None);
        assert_eq!(photo_mime(Path::new("me")), None);
    }
}
