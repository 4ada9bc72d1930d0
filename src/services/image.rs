use crate::models::ImagePayload;

/// MIME type used when an upload declares none.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Extensions the meal upload accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A file as received from the upload form.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn has_accepted_extension(&self) -> bool {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| {
                ACCEPTED_EXTENSIONS
                    .iter()
                    .any(|accepted| ext.eq_ignore_ascii_case(accepted))
            })
            .unwrap_or(false)
    }
}

/// Turns an upload into a model payload. The declared MIME type is trusted as-is;
/// the bytes are never decoded or inspected.
pub fn to_payload(upload: Option<UploadedImage>) -> Option<ImagePayload> {
    let upload = upload?;

    log::debug!(
        "📸 Image upload {}: {} bytes, declared type {:?}",
        upload.file_name,
        upload.bytes.len(),
        upload.content_type
    );

    Some(ImagePayload {
        mime_type: upload
            .content_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string()),
        bytes: upload.bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, content_type: Option<&str>, bytes: &[u8]) -> UploadedImage {
        UploadedImage {
            file_name: name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_no_upload_gives_no_payload() {
        assert_eq!(to_payload(None), None);
    }

    #[test]
    fn test_payload_keeps_bytes_and_declared_type() {
        let bytes = [0x89, b'P', b'N', b'G', 0x00, 0xFF];
        let payload = to_payload(Some(upload("lunch.png", Some("image/png"), &bytes))).unwrap();

        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.bytes, bytes);
    }

    #[test]
    fn test_declared_type_is_not_sniffed() {
        // PNG magic bytes labelled as JPEG stay labelled as JPEG.
        let payload =
            to_payload(Some(upload("lunch.jpg", Some("image/jpeg"), b"\x89PNG"))).unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");
    }

    #[test]
    fn test_missing_type_falls_back() {
        let payload = to_payload(Some(upload("lunch.jpg", None, b"abc"))).unwrap();
        assert_eq!(payload.mime_type, FALLBACK_MIME_TYPE);
    }

    #[test]
    fn test_accepted_extensions() {
        assert!(upload("a.JPG", None, b"").has_accepted_extension());
        assert!(upload("a.jpeg", None, b"").has_accepted_extension());
        assert!(upload("meal.photo.png", None, b"").has_accepted_extension());
        assert!(!upload("a.gif", None, b"").has_accepted_extension());
        assert!(!upload("png", None, b"").has_accepted_extension());
    }
}
