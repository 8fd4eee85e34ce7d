//! Header names and values exchanged between the component and the server.

use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

/// Header carried by every programmatic (non-navigational) submission.
pub const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// Value of [`X_REQUESTED_WITH`] that identifies an AJAX submission.
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// Content type of the serialized form payload.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Returns the marker header pair that flags a request as AJAX.
pub fn ajax_marker() -> (HeaderName, HeaderValue) {
	(X_REQUESTED_WITH, HeaderValue::from_static(XML_HTTP_REQUEST))
}

/// Builds the header set attached to an outbound form submission.
///
/// # Examples
///
/// ```
/// use ajax_form_http::{form_headers, FORM_URLENCODED, X_REQUESTED_WITH};
///
/// let headers = form_headers();
/// assert_eq!(headers[http::header::CONTENT_TYPE], FORM_URLENCODED);
/// assert_eq!(headers[X_REQUESTED_WITH], "XMLHttpRequest");
/// ```
pub fn form_headers() -> HeaderMap {
	let mut headers = HeaderMap::with_capacity(2);
	headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
	let (name, value) = ajax_marker();
	headers.insert(name, value);
	headers
}
