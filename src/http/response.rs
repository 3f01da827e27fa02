use std::borrow::Cow;

use bytes::Bytes;

use crate::http::mime::MediaType;
use crate::http::request::Header;

/// HTTP status codes supported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusCode {
    /// 200 OK
    #[default]
    Ok,
    /// 201 Created
    Created,
    /// 204 No Content
    NoContent,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 302 Found
    Found,
    /// 307 Temporary Redirect
    TemporaryRedirect,
    /// 308 Permanent Redirect
    PermanentRedirect,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 415 Unsupported Media Type
    UnsupportedMediaType,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use porthole::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::MovedPermanently => 301,
            StatusCode::Found => 302,
            StatusCode::TemporaryRedirect => 307,
            StatusCode::PermanentRedirect => 308,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::UnsupportedMediaType => 415,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use porthole::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::Found => "Found",
            StatusCode::TemporaryRedirect => "Temporary Redirect",
            StatusCode::PermanentRedirect => "Permanent Redirect",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::UnsupportedMediaType => "Unsupported Media Type",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

/// Response payload.
///
/// `Static` borrows storage that outlives every connection; `Owned` holds
/// bytes the response is responsible for. Dropping either is always sound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    #[default]
    Empty,
    Static(&'static [u8]),
    Owned(Bytes),
}

impl Body {
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Empty => &[],
            Body::Static(b) => b,
            Body::Owned(b) => &b[..],
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Body::Owned(_))
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Body::Static(s.as_bytes())
    }
}

impl From<&'static [u8]> for Body {
    fn from(b: &'static [u8]) -> Self {
        Body::Static(b)
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        Body::Owned(Bytes::from(v))
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Owned(Bytes::from(s))
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self {
        Body::Owned(b)
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// `Content-Length` and `Connection` are not stored; the writer derives them.
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// `Content-Type` value; the writer falls back to plain text when unset
    pub content_type: Option<Cow<'static, str>>,
    /// Additional headers, written in order after the required ones
    pub extra_headers: Vec<Header>,
    /// Response body
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("application/json")
///     .body(b"{}".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            response: Response {
                status,
                ..Response::default()
            },
        }
    }

    pub fn content_type(mut self, content_type: impl Into<Cow<'static, str>>) -> Self {
        self.response.content_type = Some(content_type.into());
        self
    }

    /// Sets the content type from a media classification.
    pub fn media(mut self, media: MediaType) -> Self {
        self.response.content_type = media.content_type().map(Cow::Borrowed);
        self
    }

    /// Appends an extra header. Duplicates are kept.
    pub fn header(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.response.extra_headers.push(Header::new(key, value));
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.response.body = body.into();
        self
    }

    pub fn build(self) -> Response {
        self.response
    }
}

impl Response {
    /// Creates a simple 200 OK response with the given body.
    pub fn ok(body: impl Into<Body>) -> Self {
        ResponseBuilder::new(StatusCode::Ok).body(body).build()
    }

    /// Plain-text response with a static message.
    pub fn text(status: StatusCode, message: &'static str) -> Self {
        ResponseBuilder::new(status)
            .media(MediaType::Text)
            .body(message)
            .build()
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::text(StatusCode::NotFound, "Not found\n")
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        Self::text(StatusCode::InternalServerError, "Internal server error\n")
    }

    /// Redirect to `location` with an empty body.
    pub fn redirect(status: StatusCode, location: impl Into<Cow<'static, str>>) -> Self {
        ResponseBuilder::new(status).header("Location", location).build()
    }

    /// Body length in bytes, as sent in `Content-Length`.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Looks up an extra header, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.extra_headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(key))
            .map(|h| h.value.as_ref())
    }

    /// Releases the body and extra headers and resets every field.
    ///
    /// Safe to call any number of times.
    pub fn clear(&mut self) {
        *self = Response::default();
    }
}
