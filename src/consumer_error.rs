use crate::constants;
use http::header::{self, HeaderMap, HeaderValue};
use http::{Response, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// A request level error returned by route handlers and middlewares.
///
/// Only the `detail` is sent to the client, as `{"detail": "..."}`. The `cause` stays on the server, it shows
/// up in the [`Display`] output and in [`source`](std::error::Error::source).
///
/// # Examples
///
/// ```
/// use consumer_router::ConsumerError;
/// use http::StatusCode;
///
/// let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// let err = ConsumerError::from_cause(io, StatusCode::INSUFFICIENT_STORAGE, "could not save the upload");
///
/// assert_eq!(err.to_string(), "could not save the upload : disk full");
/// assert_eq!(&err.to_response_body().unwrap()[..], br#"{"detail":"could not save the upload"}"#);
/// ```
#[derive(Debug, Serialize)]
pub struct ConsumerError {
    #[serde(skip)]
    cause: Option<Cause>,
    detail: String,
    #[serde(skip)]
    status: StatusCode,
}

impl ConsumerError {
    /// Creates an error without an underlying cause.
    pub fn new<D: Into<String>>(status: StatusCode, detail: D) -> ConsumerError {
        ConsumerError {
            cause: None,
            detail: detail.into(),
            status,
        }
    }

    /// Creates an error which wraps the failure that triggered it.
    pub fn from_cause<C, D>(cause: C, status: StatusCode, detail: D) -> ConsumerError
    where
        C: Into<Cause>,
        D: Into<String>,
    {
        ConsumerError::new(status, detail).with_cause(cause)
    }

    /// Attaches (or replaces) the underlying cause.
    pub fn with_cause<C: Into<Cause>>(mut self, cause: C) -> ConsumerError {
        self.cause = Some(cause.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Serializes the client facing part of the error.
    pub fn to_response_body(&self) -> crate::Result<Bytes> {
        let body = serde_json::to_vec(self)?;
        Ok(Bytes::from(body))
    }

    /// Returns the status code and the headers of the error response.
    pub fn to_response_headers(&self) -> (StatusCode, HeaderMap) {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(constants::JSON_CONTENT_TYPE),
        );
        (self.status, headers)
    }

    /// Renders the error as a complete HTTP response.
    pub fn into_response(self) -> crate::Result<Response<Full<Bytes>>> {
        let body = self.to_response_body()?;
        let (status, headers) = self.to_response_headers();

        let mut res = Response::new(Full::new(body));
        *res.status_mut() = status;
        res.headers_mut().extend(headers);
        Ok(res)
    }
}

impl Display for ConsumerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.cause {
            Some(ref cause) => write!(f, "{} : {}", self.detail, cause),
            None => f.write_str(&self.detail),
        }
    }
}

impl StdError for ConsumerError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn should_describe_detail_without_cause() {
        let err = ConsumerError::new(StatusCode::BAD_REQUEST, "missing field `name`");
        assert_eq!(err.to_string(), "missing field `name`");
        assert!(err.cause().is_none());
        assert!(StdError::source(&err).is_none());
    }

    #[test]
    fn should_describe_the_cause_chain() {
        let inner = ConsumerError::new(StatusCode::INTERNAL_SERVER_ERROR, "connection reset");
        let err = ConsumerError::from_cause(inner, StatusCode::BAD_GATEWAY, "upstream failed");

        assert_eq!(err.to_string(), "upstream failed : connection reset");
        assert_eq!(StdError::source(&err).unwrap().to_string(), "connection reset");
    }

    #[test]
    fn should_only_serialize_the_detail() {
        let err = ConsumerError::from_cause("secret database dsn", StatusCode::CONFLICT, "user exists");
        let body = err.to_response_body().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json, serde_json::json!({ "detail": "user exists" }));
    }

    #[test]
    fn should_return_status_and_json_content_type() {
        let err = ConsumerError::new(StatusCode::UNPROCESSABLE_ENTITY, "invalid");
        let (status, headers) = err.to_response_headers();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json; charset=utf-8");
    }

    #[tokio::test]
    async fn should_render_into_response() {
        let res = ConsumerError::new(StatusCode::FORBIDDEN, "nope").into_response().unwrap();

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json; charset=utf-8");
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"detail":"nope"}"#);
    }
}
