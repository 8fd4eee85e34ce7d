//! Server-side helpers for `ajax-form` requests
//!
//! Handlers can tell component submissions apart from full-page form posts
//! and answer with a fragment instead of a whole document.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ajax_form::http::AjaxRequestExt;
//!
//! if request.is_ajax() {
//!     return render_fragment(&context);
//! }
//! render_page(&context)
//! ```

// Re-export all ajax-form-http functionality
pub use ajax_form_http::*;
