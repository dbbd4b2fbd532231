// src/responses.rs
use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

pub fn text_response(status: u16, body: impl Into<String>) -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Body::from(body.into()))
        .unwrap();

    Ok(resp)
}

/// Convert a ServerError into a plain-text response.
pub fn error_to_response(err: ServerError) -> Response {
    let (status, message) = match err {
        ServerError::NotFound => (404, "Not Found".to_string()),
        ServerError::DbError(msg) => (500, msg),
        ServerError::InternalError => (500, "Internal Server Error".to_string()),
    };

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Body::from(format!("Error {status}: {message}")))
        .unwrap()
}
