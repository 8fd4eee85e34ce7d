//! Client-side `ajax-form` component
//!
//! This module provides access to ajax-form-pages.
//!
//! ## Architecture
//!
//! - **Component**: the `Idle`/`Submitting` state machine around one form
//! - **DOM seam**: `HostElement`/`FormElement`, implemented for `web_sys` and
//!   for the in-memory test DOM
//! - **Transport seam**: `Transport`, implemented with `reqwest`

// Re-export all ajax-form-pages functionality
pub use ajax_form_pages::*;
