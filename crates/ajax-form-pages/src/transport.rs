//! Request building and the transport seam
//!
//! [`FormRequest`] captures everything the component sends; [`Transport`]
//! turns it into a [`FormResponse`]. [`ReqwestTransport`] is the stock
//! implementation for both the browser (fetch) and native targets.

use ajax_form_http::form_headers;
use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};

use crate::error::SubmitError;
use crate::payload::FormPayload;

/// Failure to obtain any response from the server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("network error: {0}")]
pub struct TransportError(String);

impl TransportError {
	/// Creates a transport error with the given message.
	pub fn new(message: impl Into<String>) -> Self {
		Self(message.into())
	}
}

/// An outbound form submission.
#[derive(Debug, Clone)]
pub struct FormRequest {
	/// HTTP method taken from the form.
	pub method: Method,
	/// Target URL taken from the form's action.
	pub url: String,
	/// `Content-Type` and the AJAX marker header.
	pub headers: HeaderMap,
	/// URL-encoded payload; `None` for methods that carry no body.
	pub body: Option<String>,
}

impl FormRequest {
	/// Builds the request for a form submission.
	///
	/// `GET` and `HEAD` cannot carry a body, so for those the payload
	/// replaces the query string of `action`.
	///
	/// # Examples
	///
	/// ```
	/// use ajax_form_pages::{FormPayload, FormRequest};
	///
	/// let payload: FormPayload = [("a", "1"), ("go", "yes")].into_iter().collect();
	///
	/// let post = FormRequest::new("post", "/submit", &payload).unwrap();
	/// assert_eq!(post.method, http::Method::POST);
	/// assert_eq!(post.body.as_deref(), Some("a=1&go=yes"));
	///
	/// let get = FormRequest::new("get", "/search?old=1#top", &payload).unwrap();
	/// assert_eq!(get.url, "/search?a=1&go=yes");
	/// assert_eq!(get.body, None);
	/// ```
	pub fn new(method: &str, action: &str, payload: &FormPayload) -> Result<Self, SubmitError> {
		let method = Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
			.map_err(|_| SubmitError::InvalidMethod(method.to_string()))?;
		let encoded = payload.encode()?;

		let (url, body) = if method == Method::GET || method == Method::HEAD {
			(replace_query(action, &encoded), None)
		} else {
			(action.to_string(), Some(encoded))
		};

		Ok(Self {
			method,
			url,
			headers: form_headers(),
			body,
		})
	}
}

fn replace_query(action: &str, query: &str) -> String {
	let base = action.split('#').next().unwrap_or(action);
	let base = base.split('?').next().unwrap_or(base);
	if query.is_empty() {
		base.to_string()
	} else {
		format!("{base}?{query}")
	}
}

/// A server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResponse {
	/// Response status.
	pub status: StatusCode,
	/// Response body as text.
	pub body: String,
}

impl FormResponse {
	/// Creates a response.
	pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
		}
	}

	/// Creates a `200 OK` response carrying `body`.
	pub fn ok(body: impl Into<String>) -> Self {
		Self::new(StatusCode::OK, body)
	}

	/// Returns `true` for statuses in the 200-299 range.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Converts a non-2xx response into [`SubmitError::Status`].
	pub fn error_for_status(self) -> Result<Self, SubmitError> {
		if self.is_success() {
			Ok(self)
		} else {
			Err(SubmitError::Status {
				status: self.status.as_u16(),
				reason: self.status.canonical_reason().unwrap_or_default().to_string(),
			})
		}
	}
}

/// Sends form requests.
///
/// Futures are not `Send`: the component lives on a single-threaded event
/// loop.
#[async_trait(?Send)]
pub trait Transport {
	/// Sends the request and waits for the full response body.
	async fn send(&self, request: FormRequest) -> Result<FormResponse, TransportError>;
}

/// [`Transport`] backed by `reqwest`.
///
/// Relative actions are resolved against the base URL when one is set.
/// Browser forms report an absolute `action`, so no base is needed there.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
	client: reqwest::Client,
	base_url: Option<reqwest::Url>,
}

impl ReqwestTransport {
	/// Creates a transport with a default client.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a transport around an existing client.
	pub fn with_client(client: reqwest::Client) -> Self {
		Self {
			client,
			base_url: None,
		}
	}

	/// Sets the URL relative actions are resolved against.
	pub fn base_url(mut self, base_url: reqwest::Url) -> Self {
		self.base_url = Some(base_url);
		self
	}

	fn resolve(&self, url: &str) -> Result<reqwest::Url, TransportError> {
		let resolved = match &self.base_url {
			Some(base) => base.join(url),
			None => reqwest::Url::parse(url),
		};
		resolved.map_err(|e| TransportError::new(format!("invalid URL {url:?}: {e}")))
	}
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
	async fn send(&self, request: FormRequest) -> Result<FormResponse, TransportError> {
		let url = self.resolve(&request.url)?;
		let mut builder = self
			.client
			.request(request.method, url)
			.headers(request.headers);
		if let Some(body) = request.body {
			builder = builder.body(body);
		}

		let response = builder
			.send()
			.await
			.map_err(|e| TransportError::new(e.to_string()))?;
		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|e| TransportError::new(format!("failed to read response body: {e}")))?;

		Ok(FormResponse::new(status, body))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ajax_form_http::{X_REQUESTED_WITH, XML_HTTP_REQUEST};
	use http::header::CONTENT_TYPE;
	use rstest::rstest;

	fn payload() -> FormPayload {
		[("a", "1"), ("b", "2"), ("go", "yes")].into_iter().collect()
	}

	#[rstest]
	fn test_post_request_headers_and_body() {
		let request = FormRequest::new("post", "https://example.com/submit", &payload()).unwrap();

		assert_eq!(request.method, Method::POST);
		assert_eq!(request.url, "https://example.com/submit");
		assert_eq!(request.body.as_deref(), Some("a=1&b=2&go=yes"));
		assert_eq!(
			request.headers.get(CONTENT_TYPE).unwrap(),
			"application/x-www-form-urlencoded"
		);
		assert_eq!(request.headers.get(X_REQUESTED_WITH).unwrap(), XML_HTTP_REQUEST);
	}

	#[rstest]
	#[case("put", Method::PUT)]
	#[case("PATCH", Method::PATCH)]
	#[case("delete", Method::DELETE)]
	fn test_methods_with_body(#[case] raw: &str, #[case] expected: Method) {
		let request = FormRequest::new(raw, "/submit", &payload()).unwrap();

		assert_eq!(request.method, expected);
		assert!(request.body.is_some());
	}

	#[rstest]
	#[case("/search", "/search?a=1&b=2&go=yes")]
	#[case("/search?page=2", "/search?a=1&b=2&go=yes")]
	#[case("/search#results", "/search?a=1&b=2&go=yes")]
	fn test_get_request_moves_payload_to_query(#[case] action: &str, #[case] expected: &str) {
		let request = FormRequest::new("get", action, &payload()).unwrap();

		assert_eq!(request.url, expected);
		assert_eq!(request.body, None);
	}

	#[rstest]
	fn test_invalid_method_is_rejected() {
		let result = FormRequest::new("po st", "/submit", &payload());

		assert_eq!(
			result.unwrap_err(),
			SubmitError::InvalidMethod("po st".to_string())
		);
	}

	#[rstest]
	#[case(200, true)]
	#[case(204, true)]
	#[case(299, true)]
	#[case(302, false)]
	#[case(404, false)]
	#[case(500, false)]
	fn test_success_range(#[case] status: u16, #[case] success: bool) {
		let response = FormResponse::new(StatusCode::from_u16(status).unwrap(), "");

		assert_eq!(response.is_success(), success);
	}

	#[rstest]
	fn test_error_for_status_carries_reason() {
		let err = FormResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "boom")
			.error_for_status()
			.unwrap_err();

		assert_eq!(
			err,
			SubmitError::Status {
				status: 500,
				reason: "Internal Server Error".to_string(),
			}
		);
		assert_eq!(err.to_string(), "server responded with 500 Internal Server Error");
	}

	#[rstest]
	fn test_reqwest_transport_resolves_relative_actions() {
		let transport =
			ReqwestTransport::new().base_url(reqwest::Url::parse("https://example.com/app/").unwrap());

		let url = transport.resolve("submit").unwrap();

		assert_eq!(url.as_str(), "https://example.com/app/submit");
	}

	#[rstest]
	fn test_reqwest_transport_rejects_relative_without_base() {
		let transport = ReqwestTransport::new();

		assert!(transport.resolve("/submit").is_err());
	}
}
