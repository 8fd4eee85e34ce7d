//! # ajax-form-pages
//!
//! Progressive AJAX submission for server-rendered HTML forms.
//!
//! Wrap a plain `<form>` in an `<ajax-form>` element and the component takes
//! over its submission: the form data is sent in the background, the
//! server's HTML answer replaces the wrapper (or its contents), and an
//! `ajax-form` event announces what was submitted. Without WASM the form
//! keeps working as an ordinary full-page form.
//!
//! ```html
//! <ajax-form swap="innerHTML" delay="500">
//!   <form action="/contact" method="post">
//!     <input name="email">
//!     <button name="intent" value="subscribe">Subscribe</button>
//!   </form>
//! </ajax-form>
//! ```
//!
//! While a submission is pending the host carries a `form-submitting`
//! attribute, so stylesheets can show progress without any script.
//!
//! ## Modules
//!
//! - [`component`]: the [`AjaxForm`] state machine
//! - [`config`]: `swap`/`delay` attribute parsing
//! - [`dom`]: host and form abstractions
//! - [`payload`]: form serialization
//! - [`transport`]: request building and the [`Transport`] seam
//! - [`runtime`]: timer and spawner services
//! - [`testing`]: in-memory DOM, mock transport, manual clock
//! - `wasm`: browser adapter (WASM only)
//!
//! ## Browser usage
//!
//! ```ignore
//! use ajax_form_pages::{Runtime, wasm::mount_all};
//!
//! let components = mount_all(&Runtime::browser())?;
//! ```

#![warn(missing_docs)]

// Core modules
pub mod component;
pub mod config;
pub mod dom;
pub mod error;
pub mod logging;
pub mod payload;

// Effects
pub mod runtime;
pub mod transport;

// Testing utilities (available on both WASM and native)
pub mod testing;

// Browser adapter
#[cfg(target_arch = "wasm32")]
pub mod wasm;

#[doc(hidden)]
pub mod __private {
	pub use tracing;
	#[cfg(target_arch = "wasm32")]
	pub use web_sys;
}

pub use component::{AjaxForm, SubmissionState, SubmitDisposition};
pub use config::{AjaxFormConfig, DELAY_ATTRIBUTE, SWAP_ATTRIBUTE, SwapMode, TAG_NAME};
pub use dom::{
	AjaxFormEvent, EVENT_NAME, EventSource, FormElement, FormEvent, HostElement, ListenerHandle,
	Replacement, SUBMITTING_ATTRIBUTE, SubmitEvent, SubmitListener, Submitter,
};
pub use error::{ConfigError, DomError, SubmitError};
pub use payload::FormPayload;
#[cfg(not(target_arch = "wasm32"))]
pub use runtime::TokioTimer;
pub use runtime::{Runtime, Timer};
#[cfg(target_arch = "wasm32")]
pub use runtime::{BrowserSpawner, BrowserTimer};
pub use transport::{FormRequest, FormResponse, ReqwestTransport, Transport, TransportError};
