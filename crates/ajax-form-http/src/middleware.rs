//! Request kind middleware
//!
//! Classifies each incoming request once and stores the resulting
//! [`RequestKind`] in the request extensions, so downstream handlers can
//! branch on it without re-reading headers.
//!
//! ## Example
//!
//! ```
//! use ajax_form_http::{AjaxRequestExt, Handler, RequestKindMiddleware};
//! use async_trait::async_trait;
//!
//! struct Fragment;
//!
//! #[async_trait]
//! impl Handler<()> for Fragment {
//!     type Output = &'static str;
//!
//!     async fn handle(&self, request: http::Request<()>) -> Self::Output {
//!         if request.is_ajax() { "<p>ok</p>" } else { "<html>...</html>" }
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let request = http::Request::builder()
//!     .header("X-Requested-With", "XMLHttpRequest")
//!     .body(())
//!     .unwrap();
//! let body = RequestKindMiddleware::new().process(request, &Fragment).await;
//! assert_eq!(body, "<p>ok</p>");
//! # });
//! ```

use async_trait::async_trait;
use http::Request;

use crate::detection::RequestKind;

/// Downstream request handler invoked by [`RequestKindMiddleware`].
#[async_trait]
pub trait Handler<B: Send + 'static>: Send + Sync {
	/// Value produced for a request.
	type Output: Send;

	/// Handles the request.
	async fn handle(&self, request: Request<B>) -> Self::Output;
}

/// Middleware that annotates requests with their [`RequestKind`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestKindMiddleware {
	_private: (),
}

impl RequestKindMiddleware {
	/// Creates the middleware.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores the request kind in the extensions and returns it.
	pub fn annotate<B>(&self, request: &mut Request<B>) -> RequestKind {
		let kind = RequestKind::from_headers(request.headers());
		request.extensions_mut().insert(kind);
		kind
	}

	/// Annotates the request and forwards it to `handler`.
	pub async fn process<B, H>(&self, mut request: Request<B>, handler: &H) -> H::Output
	where
		B: Send + 'static,
		H: Handler<B> + ?Sized,
	{
		let kind = self.annotate(&mut request);
		tracing::debug!(
			method = %request.method(),
			uri = %request.uri(),
			?kind,
			"classified request"
		);
		handler.handle(request).await
	}
}
