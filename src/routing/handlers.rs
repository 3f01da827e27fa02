//! Built-in API handlers

use crate::http::mime::MediaType;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Echoes the request body back, or `<METHOD> <path>` when there is none.
///
/// A bodiless request with a method other than GET or POST is a 400.
pub fn echo(request: &Request, response: &mut Response) -> anyhow::Result<()> {
    if let Some(body) = &request.body {
        let media = MediaType::from_content_type(request.header("Content-Type"));
        *response = ResponseBuilder::new(StatusCode::Ok)
            .media(media)
            .body(body.clone())
            .build();
        return Ok(());
    }

    *response = match request.method {
        Method::GET | Method::POST => ResponseBuilder::new(StatusCode::Ok)
            .media(MediaType::Text)
            .body(format!("{} {}", request.method, request.path))
            .build(),
        _ => ResponseBuilder::new(StatusCode::BadRequest).build(),
    };
    Ok(())
}
