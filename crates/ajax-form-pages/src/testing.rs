//! Testing utilities
//!
//! In-memory stand-ins for the browser so components can be driven from
//! ordinary `cargo test` runs:
//!
//! - [`MemoryDocument`], [`MemoryHost`], [`MemoryForm`]: a minimal DOM that
//!   records attribute changes, swaps, and dispatched events. Swapped markup
//!   is read for `<ajax-form>` hosts and forms.
//! - [`MockTransport`]: scripted responses, deferred responses, request log.
//! - [`ManualClock`]: virtual time for the settle delay.
//!
//! ## Example
//!
//! ```
//! use ajax_form_pages::testing::{ManualClock, MemoryDocument, MemoryForm, MemoryHost, MockTransport};
//! use ajax_form_pages::{AjaxForm, FormResponse, Runtime, Submitter};
//! use futures::executor::LocalPool;
//!
//! let mut pool = LocalPool::new();
//! let transport = MockTransport::new();
//! let runtime = Runtime::new(transport.clone(), ManualClock::new(), pool.spawner());
//!
//! let document = MemoryDocument::new();
//! let form = MemoryForm::new("/submit", "post").with_field("a", "1");
//! let host = MemoryHost::new().with_form(form.clone());
//! document.append(&host);
//!
//! let component = AjaxForm::create(host, runtime).unwrap();
//! component.attach().unwrap();
//!
//! transport.respond(FormResponse::ok("<p>ok</p>"));
//! form.submit(Some(Submitter::new("go", "yes")));
//! pool.run_until_stalled();
//!
//! assert_eq!(document.to_html(), "<p>ok</p>");
//! ```

mod clock;
mod document;
mod markup;
mod transport;

pub use clock::ManualClock;
pub use document::{MemoryDocument, MemoryForm, MemoryHost};
pub use transport::{DeferredResponse, MockTransport};
