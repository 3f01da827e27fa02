//! Media type classification.
//!
//! Maps file extensions and request `Content-Type` values onto a small set of
//! media kinds, and each kind onto the `Content-Type` we send.

/// Logical media classification of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    /// Unspecified; the serializer falls back to plain text.
    #[default]
    None,
    Html,
    Js,
    Css,
    Text,
    Json,
    Binary,
}

impl MediaType {
    /// Classifies a file extension (without the dot). Case-insensitive.
    ///
    /// # Examples
    /// ```
    /// use porthole::http::mime::MediaType;
    /// assert_eq!(MediaType::from_extension(Some("HTML")), MediaType::Html);
    /// assert_eq!(MediaType::from_extension(Some("png")), MediaType::Binary);
    /// assert_eq!(MediaType::from_extension(None), MediaType::Binary);
    /// ```
    pub fn from_extension(extension: Option<&str>) -> Self {
        let Some(ext) = extension else {
            return MediaType::Binary;
        };
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => MediaType::Html,
            "js" => MediaType::Js,
            "css" => MediaType::Css,
            "txt" => MediaType::Text,
            "json" => MediaType::Json,
            _ => MediaType::Binary,
        }
    }

    /// Classifies a file path by the extension of its last segment.
    pub fn from_path(path: &str) -> Self {
        Self::from_extension(extension(path))
    }

    /// Classifies a request `Content-Type` header value.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(ct) = content_type else {
            return MediaType::None;
        };
        let essence = ct.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case("application/json") {
            MediaType::Json
        } else if essence.eq_ignore_ascii_case("text/plain") {
            MediaType::Text
        } else if essence.eq_ignore_ascii_case("text/html") {
            MediaType::Html
        } else if essence.eq_ignore_ascii_case("application/octet-stream") {
            MediaType::Binary
        } else {
            MediaType::None
        }
    }

    /// The `Content-Type` value for this kind, `None` for [`MediaType::None`].
    pub fn content_type(self) -> Option<&'static str> {
        match self {
            MediaType::None => None,
            MediaType::Html => Some("text/html; charset=UTF-8"),
            MediaType::Js => Some("text/javascript"),
            MediaType::Css => Some("text/css"),
            MediaType::Text => Some("text/plain; charset=UTF-8"),
            MediaType::Json => Some("application/json; charset=UTF-8"),
            MediaType::Binary => Some("application/octet-stream"),
        }
    }
}

/// Extension of the last path segment, if it has one.
fn extension(path: &str) -> Option<&str> {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rfind('.').map(|dot| &file[dot + 1..])
}
