use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};

use crate::error::{PipelineError, PipelineResult};
use crate::id_generator;

const DATA_URI_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";
// Bare base64 bodies (no data: header) are assumed to be PNG
const DEFAULT_MIME: &str = "image/png";

/// An encoded raster exchanged between the canvas, the upload adapter and
/// the inference service.
///
/// The data URI is the canonical value: it is what gets sent over the wire
/// and it is stored verbatim when it comes back. The pipeline only ever asks
/// whether a payload is present; pixels are never compared.
#[derive(Clone)]
pub struct ImagePayload {
    id: usize,
    mime: String,
    data_uri: String,
    dimensions: Option<[u32; 2]>,
}

// Data URIs run to hundreds of kilobytes, keep them out of logs
impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("id", &self.id)
            .field("mime", &self.mime)
            .field("data_uri_len", &self.data_uri.len())
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl ImagePayload {
    /// Wrap already-encoded image bytes without touching them.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        let data_uri = format!(
            "{}{}{},{}",
            DATA_URI_PREFIX,
            mime,
            BASE64_MARKER,
            general_purpose::STANDARD.encode(bytes)
        );
        Self {
            id: id_generator::generate_id(),
            mime: mime.to_owned(),
            data_uri,
            dimensions: probe_dimensions(bytes),
        }
    }

    /// Wrap a PNG whose dimensions are already known.
    pub fn from_png(bytes: &[u8], width: u32, height: u32) -> Self {
        let mut payload = Self::from_bytes(DEFAULT_MIME, bytes);
        payload.dimensions = Some([width, height]);
        payload
    }

    /// Adopt a data URI as-is. The string is kept byte-for-byte; the media
    /// type is read from the header when there is one.
    pub fn from_data_uri(data_uri: impl Into<String>) -> Self {
        let data_uri = data_uri.into();
        let mime = split_data_uri(&data_uri)
            .map(|(mime, _, _)| mime.to_owned())
            .unwrap_or_else(|| DEFAULT_MIME.to_owned());
        Self {
            id: id_generator::generate_id(),
            mime,
            data_uri,
            dimensions: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn dimensions(&self) -> Option<[u32; 2]> {
        self.dimensions
    }

    /// Decode the encoded image bytes carried by this payload.
    pub fn decode_bytes(&self) -> PipelineResult<Vec<u8>> {
        let body = match split_data_uri(&self.data_uri) {
            Some((_, true, body)) => body,
            Some((mime, false, _)) => {
                return Err(PipelineError::InvalidPayload(format!(
                    "data URI for {} is not base64 encoded",
                    mime
                )));
            }
            None => self.data_uri.trim(),
        };

        general_purpose::STANDARD
            .decode(body)
            .map_err(|e| PipelineError::InvalidPayload(e.to_string()))
    }
}

/// Split `data:<mime>[;params][;base64],<body>` into (mime, is_base64, body).
fn split_data_uri(uri: &str) -> Option<(&str, bool, &str)> {
    let rest = uri.strip_prefix(DATA_URI_PREFIX)?;
    let (meta, body) = rest.split_once(',')?;
    let is_base64 = meta.ends_with(BASE64_MARKER);
    let mime = meta.split(';').next().unwrap_or_default();
    let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };
    Some((mime, is_base64, body))
}

fn probe_dimensions(bytes: &[u8]) -> Option<[u32; 2]> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()?;
    Some([width, height])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_builds_data_uri() {
        let payload = ImagePayload::from_bytes("image/gif", b"GIF89a");
        assert_eq!(payload.mime(), "image/gif");
        assert!(payload.data_uri().starts_with("data:image/gif;base64,"));
        assert_eq!(payload.decode_bytes().unwrap(), b"GIF89a");
    }

    #[test]
    fn test_from_data_uri_is_verbatim() {
        let uri = "data:image/jpeg;base64,/9j/4AAQ";
        let payload = ImagePayload::from_data_uri(uri);
        assert_eq!(payload.data_uri(), uri);
        assert_eq!(payload.mime(), "image/jpeg");
    }

    #[test]
    fn test_bare_base64_is_accepted() {
        let payload = ImagePayload::from_data_uri("aGVsbG8=");
        assert_eq!(payload.mime(), "image/png");
        assert_eq!(payload.decode_bytes().unwrap(), b"hello");
    }

    #[test]
    fn test_non_base64_data_uri_is_rejected() {
        let payload = ImagePayload::from_data_uri("data:image/svg+xml,%3Csvg%3E");
        assert!(matches!(
            payload.decode_bytes(),
            Err(PipelineError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_dimensions_probed_from_png() {
        let mut png = Vec::new();
        image::RgbaImage::new(3, 2)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let payload = ImagePayload::from_bytes("image/png", &png);
        assert_eq!(payload.dimensions(), Some([3, 2]));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ImagePayload::from_data_uri("data:image/png;base64,");
        let b = ImagePayload::from_data_uri("data:image/png;base64,");
        assert_ne!(a.id(), b.id());
    }
}
