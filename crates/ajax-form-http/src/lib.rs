//! Server-side companion for `ajax-form`
//!
//! The client component marks every programmatic submission with
//! `X-Requested-With: XMLHttpRequest`. This crate holds the header
//! constants shared by both sides and lets request handlers tell those
//! submissions apart from full-page navigations, so a view can answer with
//! an HTML fragment instead of a whole document.
//!
//! ## Example
//!
//! ```
//! use ajax_form_http::{AjaxRequestExt, RequestKind, X_REQUESTED_WITH, XML_HTTP_REQUEST};
//!
//! let request = http::Request::builder()
//!     .uri("/contact")
//!     .header(X_REQUESTED_WITH, XML_HTTP_REQUEST)
//!     .body(())
//!     .unwrap();
//!
//! assert!(request.is_ajax());
//! assert_eq!(request.request_kind(), RequestKind::Ajax);
//! ```

#![warn(missing_docs)]

pub mod detection;
pub mod headers;
pub mod middleware;

pub use detection::{AjaxRequestExt, RequestKind, is_ajax};
pub use headers::{
	FORM_URLENCODED, X_REQUESTED_WITH, XML_HTTP_REQUEST, ajax_marker, form_headers,
};
pub use middleware::{Handler, RequestKindMiddleware};
