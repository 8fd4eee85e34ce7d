//! DOM abstraction layer
//!
//! The component never touches `web_sys` directly. It talks to its host
//! element and the wrapped form through [`HostElement`] and [`FormElement`],
//! which the browser adapter (`crate::wasm`) and the in-memory test DOM
//! (`crate::testing`) both implement.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::error::DomError;

/// Attribute present on the host while a request is in flight.
pub const SUBMITTING_ATTRIBUTE: &str = "form-submitting";

/// Name of the notification event emitted after a successful swap.
pub const EVENT_NAME: &str = "ajax-form";

/// The control that triggered a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitter {
	/// The control's `name`.
	pub name: String,
	/// The control's `value`.
	pub value: String,
}

impl Submitter {
	/// Creates a submitter from its name and value.
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}
}

/// A submit event raised by a form.
///
/// Default prevention is recorded on the event and applied to the native
/// event by the adapter once listeners have run.
#[derive(Debug, Default)]
pub struct SubmitEvent {
	submitter: Option<Submitter>,
	default_prevented: Cell<bool>,
}

impl SubmitEvent {
	/// Creates a submit event for the given submitter.
	pub fn new(submitter: Option<Submitter>) -> Self {
		Self {
			submitter,
			default_prevented: Cell::new(false),
		}
	}

	/// Returns the control that triggered the submission, if any.
	pub fn submitter(&self) -> Option<&Submitter> {
		self.submitter.as_ref()
	}

	/// Suppresses the browser's default navigation.
	pub fn prevent_default(&self) {
		self.default_prevented.set(true);
	}

	/// Returns `true` once [`prevent_default`](Self::prevent_default) was called.
	pub fn default_prevented(&self) -> bool {
		self.default_prevented.get()
	}
}

/// Events the component reacts to.
#[derive(Debug)]
#[non_exhaustive]
pub enum FormEvent<'a> {
	/// The owned form was submitted.
	Submit(&'a SubmitEvent),
}

/// Notification dispatched after a successful swap.
///
/// Always bubbling and never cancelable. It is dispatched from the host,
/// or from the host's former parent when the host itself was replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AjaxFormEvent {
	/// The URL-encoded payload that was submitted.
	pub detail: String,
}

impl AjaxFormEvent {
	/// Creates the notification for a submitted payload.
	pub fn new(detail: impl Into<String>) -> Self {
		Self {
			detail: detail.into(),
		}
	}

	/// Event type name.
	pub fn name(&self) -> &'static str {
		EVENT_NAME
	}

	/// Whether the event bubbles.
	pub fn bubbles(&self) -> bool {
		true
	}

	/// Whether the event can be canceled.
	pub fn cancelable(&self) -> bool {
		false
	}
}

/// Callback invoked for each submit event of a form.
pub type SubmitListener = Rc<dyn Fn(&SubmitEvent)>;

/// Registration of a submit listener.
///
/// Dropping the handle removes the listener.
pub struct ListenerHandle {
	remove: Option<Box<dyn FnOnce()>>,
}

impl ListenerHandle {
	/// Creates a handle that runs `remove` when released.
	pub fn new(remove: impl FnOnce() + 'static) -> Self {
		Self {
			remove: Some(Box::new(remove)),
		}
	}

	/// Removes the listener now.
	pub fn remove(mut self) {
		if let Some(remove) = self.remove.take() {
			remove();
		}
	}
}

impl Drop for ListenerHandle {
	fn drop(&mut self) {
		if let Some(remove) = self.remove.take() {
			remove();
		}
	}
}

impl fmt::Debug for ListenerHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ListenerHandle")
			.field("active", &self.remove.is_some())
			.finish()
	}
}

/// A node notifications can be dispatched from.
pub trait EventSource {
	/// Dispatches the notification from this node.
	///
	/// Returns `false` if a listener canceled it.
	fn dispatch_event(&self, event: &AjaxFormEvent) -> Result<bool, DomError>;
}

/// Outcome of replacing a host element with response markup.
pub struct Replacement<H: HostElement> {
	/// `ajax-form` elements contained in the inserted markup, in document
	/// order.
	pub hosts: Vec<H>,
	/// The node that received the markup.
	pub parent: H::Parent,
}

impl<H: HostElement + fmt::Debug> fmt::Debug for Replacement<H>
where
	H::Parent: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Replacement")
			.field("hosts", &self.hosts)
			.field("parent", &self.parent)
			.finish()
	}
}

/// The element the component is mounted on.
pub trait HostElement: EventSource + Sized + 'static {
	/// Form type found inside the host.
	type Form: FormElement + Clone;

	/// Node that holds the host and receives an outer replacement.
	type Parent: EventSource;

	/// Returns an attribute value.
	fn attribute(&self, name: &str) -> Option<String>;

	/// Returns `true` when the attribute is present.
	fn has_attribute(&self, name: &str) -> bool {
		self.attribute(name).is_some()
	}

	/// Sets an attribute.
	fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError>;

	/// Removes an attribute.
	fn remove_attribute(&self, name: &str) -> Result<(), DomError>;

	/// Returns the first `<form>` descendant.
	fn query_form(&self) -> Option<Self::Form>;

	/// Replaces the host element, tag included, with `markup`.
	///
	/// Fails when the host has no parent.
	fn set_outer_html(&self, markup: &str) -> Result<Replacement<Self>, DomError>;

	/// Replaces the host's contents with `markup`.
	fn set_inner_html(&self, markup: &str) -> Result<(), DomError>;

	/// Returns `true` while the host is part of a document.
	fn is_connected(&self) -> bool;
}

/// The form wrapped by the component.
pub trait FormElement: 'static {
	/// Resolved submission URL.
	fn action(&self) -> String;

	/// Resolved submission method.
	fn method(&self) -> String;

	/// Current successful controls as name/value pairs, in document order.
	fn entries(&self) -> Result<Vec<(String, String)>, DomError>;

	/// Installs a submit listener.
	fn add_submit_listener(&self, listener: SubmitListener) -> Result<ListenerHandle, DomError>;
}
