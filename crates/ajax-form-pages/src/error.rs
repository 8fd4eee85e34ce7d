//! Error types
//!
//! Two families with different propagation rules:
//!
//! - [`ConfigError`] is raised synchronously by `create` and `attach`. A
//!   component that fails here never handles a submission.
//! - [`SubmitError`] describes a failed submission. It is logged as a
//!   warning inside the pipeline and never crosses the component boundary.

use crate::transport::TransportError;

/// Failure reported by a DOM adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("DOM operation failed: {0}")]
pub struct DomError(String);

impl DomError {
	/// Creates a DOM error with the given message.
	pub fn new(message: impl Into<String>) -> Self {
		Self(message.into())
	}

	/// Returns the error message.
	pub fn message(&self) -> &str {
		&self.0
	}
}

/// Fatal configuration error raised at construction or attachment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
	/// The `swap` attribute holds an unsupported value.
	#[error("Invalid swap value: {0}")]
	InvalidSwap(String),

	/// No `<form>` descendant exists when the component is attached.
	#[error("Form element not found")]
	FormNotFound,

	/// The component was detached and cannot be attached again.
	#[error("component has been detached")]
	Detached,

	/// The DOM refused an operation needed to wire the component.
	#[error(transparent)]
	Dom(#[from] DomError),
}

/// Recoverable failure of a single submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
	/// The request never produced a response.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The server answered outside the 200-299 range.
	#[error("server responded with {status} {reason}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Canonical reason phrase, empty when unknown.
		reason: String,
	},

	/// The payload could not be URL-encoded.
	#[error("failed to encode form payload: {0}")]
	Encoding(String),

	/// The form's method is not a valid HTTP method token.
	#[error("invalid form method: {0}")]
	InvalidMethod(String),

	/// Reading the form or applying the response failed.
	#[error(transparent)]
	Dom(#[from] DomError),

	/// The host left the document before the response arrived.
	#[error("host element left the document before the response arrived")]
	Detached,
}
