//! AJAX request detection
//!
//! A request counts as AJAX only when `X-Requested-With` is present and
//! equals `XMLHttpRequest` exactly. Anything else, including a missing or
//! differently-cased value, is a regular navigation.

use http::HeaderMap;
use http::request::Parts;

use crate::headers::{X_REQUESTED_WITH, XML_HTTP_REQUEST};

/// Returns `true` when the headers carry the AJAX marker.
///
/// # Examples
///
/// ```
/// use ajax_form_http::is_ajax;
/// use http::HeaderMap;
///
/// let mut headers = HeaderMap::new();
/// assert!(!is_ajax(&headers));
///
/// headers.insert("x-requested-with", "XMLHttpRequest".parse().unwrap());
/// assert!(is_ajax(&headers));
/// ```
pub fn is_ajax(headers: &HeaderMap) -> bool {
	headers
		.get(X_REQUESTED_WITH)
		.is_some_and(|value| value.as_bytes() == XML_HTTP_REQUEST.as_bytes())
}

/// How a request reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
	/// Programmatic submission from the `ajax-form` component.
	Ajax,
	/// Regular full-page navigation or form post.
	Navigation,
}

impl RequestKind {
	/// Classifies a request by its headers.
	pub fn from_headers(headers: &HeaderMap) -> Self {
		if is_ajax(headers) {
			Self::Ajax
		} else {
			Self::Navigation
		}
	}

	/// Returns `true` for [`RequestKind::Ajax`].
	pub fn is_ajax(self) -> bool {
		matches!(self, Self::Ajax)
	}
}

/// Extension trait adding AJAX detection to request types.
pub trait AjaxRequestExt {
	/// Returns how the request reached the server.
	///
	/// A [`RequestKind`] stored in the extensions by
	/// [`RequestKindMiddleware`](crate::RequestKindMiddleware) takes
	/// precedence over the headers.
	fn request_kind(&self) -> RequestKind;

	/// Returns `true` when the request is an AJAX submission.
	fn is_ajax(&self) -> bool {
		self.request_kind().is_ajax()
	}
}

impl<B> AjaxRequestExt for http::Request<B> {
	fn request_kind(&self) -> RequestKind {
		self.extensions()
			.get::<RequestKind>()
			.copied()
			.unwrap_or_else(|| RequestKind::from_headers(self.headers()))
	}
}

impl AjaxRequestExt for Parts {
	fn request_kind(&self) -> RequestKind {
		self.extensions
			.get::<RequestKind>()
			.copied()
			.unwrap_or_else(|| RequestKind::from_headers(&self.headers))
	}
}
