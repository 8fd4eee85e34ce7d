//! # ajax-form
//!
//! Progressive AJAX submission for server-rendered HTML forms.
//!
//! Wrap a `<form>` in an `<ajax-form>` element and submitting it sends the
//! data in the background, swaps the server's HTML answer into the page, and
//! announces the submission with a bubbling `ajax-form` event.
//!
//! ## Crates
//!
//! - [`pages`]: the client component (`ajax-form-pages`)
//! - [`http`]: server-side helpers for recognizing its requests
//!   (`ajax-form-http`)
//!
//! ## Feature Flags
//!
//! - `pages` (default): client component
//! - `http` (default): server helpers
//! - `debug-hooks`: console debug output on WASM debug builds
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! // Browser entry point
//! use ajax_form::pages::{Runtime, wasm::mount_all};
//!
//! #[wasm_bindgen(start)]
//! pub fn start() -> Result<(), JsValue> {
//!     let components = mount_all(&Runtime::browser())
//!         .map_err(|e| JsValue::from_str(&e.to_string()))?;
//!     std::mem::forget(components);
//!     Ok(())
//! }
//! ```

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "pages")]
pub mod pages;

#[cfg(feature = "http")]
pub use ajax_form_http::{AjaxRequestExt, RequestKind, is_ajax};
#[cfg(feature = "pages")]
pub use ajax_form_pages::{AjaxForm, AjaxFormConfig, ConfigError, SubmitError, SwapMode};
