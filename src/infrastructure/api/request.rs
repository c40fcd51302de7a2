//! Replayable request description.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Method, RequestBuilder, header};
use serde::Serialize;

use crate::domain::entities::{AuthToken, LocalFile};
use crate::domain::errors::ApiError;

#[derive(Debug, Clone)]
enum RequestBody {
    Empty,
    Json(serde_json::Value),
    File { field: &'static str, file: LocalFile },
}

/// An API call that can be rebuilt and sent more than once.
///
/// `reqwest::RequestBuilder` cannot be cloned once it carries a multipart
/// body, so the client keeps this description and builds a fresh request for
/// the original attempt and for the replay after a token refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: RequestBody,
    timeout: Option<Duration>,
    refreshable: bool,
    retried: bool,
}

impl ApiRequest {
    /// Creates request for a path relative to the API base URL.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            timeout: None,
            refreshable: true,
            retried: false,
        }
    }

    /// `GET` request to `path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request to `path`.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT` request to `path`.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `PATCH` request to `path`.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE` request to `path`.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    /// Returns error if the body cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::validation(format!("failed to encode request body: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Attaches a file as a single-part multipart form.
    #[must_use]
    pub fn file(mut self, field: &'static str, file: LocalFile) -> Self {
        self.body = RequestBody::File { field, file };
        self
    }

    /// Appends query string pairs.
    #[must_use]
    pub fn query(mut self, pairs: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Overrides the client's default timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Excludes the request from the 401 refresh flow.
    #[must_use]
    pub fn without_refresh(mut self) -> Self {
        self.refreshable = false;
        self
    }

    /// Path relative to the base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Whether a 401 may trigger a refresh and replay.
    #[must_use]
    pub const fn can_refresh(&self) -> bool {
        self.refreshable && !self.retried
    }

    /// Whether this request is already the replay.
    #[must_use]
    pub const fn is_retried(&self) -> bool {
        self.retried
    }

    pub(crate) fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Builds a sendable request stamped with `token` when present.
    pub(crate) fn build(
        &self,
        client: &Client,
        base_url: &str,
        token: Option<&AuthToken>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = format!("{base_url}{}", self.path);
        let mut builder = client.request(self.method.clone(), url);

        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token.bearer());
        }

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match &self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::File { field, file } => {
                let part = Part::stream_with_length(Body::from(file.bytes().clone()), file.size())
                    .file_name(file.name().to_string())
                    .mime_str(file.mime())
                    .map_err(|e| ApiError::validation(format!("invalid MIME type: {e}")))?;
                builder.multipart(Form::new().part(*field, part))
            }
        };

        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::new()
    }

    #[test]
    fn test_no_token_means_no_authorization_header() {
        let request = ApiRequest::get("/profile")
            .build(&client(), "http://api.test", None)
            .unwrap()
            .build()
            .unwrap();

        assert!(request.headers().get(header::AUTHORIZATION).is_none());
        assert_eq!(request.url().as_str(), "http://api.test/profile");
    }

    #[test]
    fn test_token_is_stamped_as_bearer() {
        let token = AuthToken::new_unchecked("abc");
        let request = ApiRequest::get("/auth/me")
            .build(&client(), "http://api.test", Some(&token))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.headers()[header::AUTHORIZATION], "Bearer abc");
    }

    #[test]
    fn test_query_pairs_are_encoded() {
        let request = ApiRequest::get("/blog/posts")
            .query([("page", "2".to_string()), ("search", "تقنية".to_string())])
            .build(&client(), "http://api.test", None)
            .unwrap()
            .build()
            .unwrap();

        let query = request.url().query().unwrap();
        assert!(query.starts_with("page=2&search="));
    }

    #[test]
    fn test_retry_flag() {
        let mut request = ApiRequest::get("/projects");
        assert!(request.can_refresh());
        request.mark_retried();
        assert!(request.is_retried());
        assert!(!request.can_refresh());
        assert!(!ApiRequest::post("/auth/login").without_refresh().can_refresh());
    }

    #[test]
    fn test_file_body_builds_multipart() {
        let file = LocalFile::from_name("a.png", vec![1_u8, 2, 3]);
        let request = ApiRequest::post("/upload/image")
            .file("file", file)
            .build(&client(), "http://api.test", None)
            .unwrap()
            .build()
            .unwrap();

        let content_type = request.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
    }
}
