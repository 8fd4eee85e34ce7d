//! The `ajax-form` component
//!
//! Wraps a server-rendered `<form>` so that submitting it sends the data in
//! the background and swaps the response markup into the page.
//!
//! ## Lifecycle
//!
//! ```text
//!            submit (guard: Idle)                pipeline done + delay
//!   Idle ─────────────────────────▶ Submitting ─────────────────────────▶ Idle
//!    ▲                                 │
//!    └──── submit while Submitting ────┘  (default prevented, nothing sent)
//! ```
//!
//! 1. [`AjaxForm::create`] resolves `swap`/`delay` from the host attributes.
//! 2. [`AjaxForm::attach`] finds the form and installs the submit listener.
//! 3. Each accepted submit snapshots the form and spawns one pipeline:
//!    send, swap, notify, settle.
//! 4. [`AjaxForm::detach`] removes the listener and aborts the pipeline.
//!
//! ## Swapped markup
//!
//! Response markup usually carries a fresh form, often the same form
//! re-rendered with errors.
//!
//! - `innerHTML`: the component moves its listener to the form found in the
//!   new contents.
//! - `outerHTML`: the old host is gone, so the component releases its form
//!   and mounts a new component on every `<ajax-form>` in the inserted
//!   markup (see [`AjaxForm::replacements`]). The notification is
//!   dispatched from the former parent, which is still in the document.
//!
//! ## Example
//!
//! ```ignore
//! use ajax_form_pages::{AjaxForm, Runtime};
//! use ajax_form_pages::wasm::WebHost;
//!
//! let component = AjaxForm::create(WebHost::new(element), Runtime::browser())?;
//! component.attach()?;
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};
use futures::task::LocalSpawnExt;

use crate::config::{AjaxFormConfig, SwapMode};
use crate::dom::{
	AjaxFormEvent, EVENT_NAME, EventSource, FormElement, FormEvent, HostElement, ListenerHandle,
	SUBMITTING_ATTRIBUTE, SubmitEvent,
};
use crate::error::{ConfigError, DomError, SubmitError};
use crate::payload::FormPayload;
use crate::runtime::Runtime;
use crate::transport::FormRequest;
use crate::{debug_log, info_log, warn_log};

/// Submission state of a component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
	/// Ready to accept a submission.
	#[default]
	Idle,
	/// A submission is in flight or settling.
	Submitting,
}

/// What a submit event led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDisposition {
	/// A new submission pipeline was started.
	Started,
	/// The event was swallowed: a submission is already in flight, or the
	/// component is not attached.
	Ignored,
}

/// Progressive AJAX form component.
///
/// Cloning yields another handle to the same component.
pub struct AjaxForm<H: HostElement> {
	inner: Rc<Inner<H>>,
}

impl<H: HostElement> Clone for AjaxForm<H> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

struct Inner<H: HostElement> {
	host: H,
	config: AjaxFormConfig,
	runtime: Runtime,
	state: Cell<SubmissionState>,
	form: RefCell<Option<H::Form>>,
	listener: RefCell<Option<ListenerHandle>>,
	in_flight: RefCell<Option<AbortHandle>>,
	detached: Cell<bool>,
	replacements: RefCell<Vec<AjaxForm<H>>>,
}

impl<H: HostElement> AjaxForm<H> {
	/// Creates a component for `host`, reading its `swap` and `delay`
	/// attributes.
	///
	/// # Errors
	///
	/// [`ConfigError::InvalidSwap`] when `swap` holds an unknown value.
	pub fn create(host: H, runtime: Runtime) -> Result<Self, ConfigError> {
		let config = AjaxFormConfig::from_attributes(|name| host.attribute(name))?;
		Ok(Self::with_config(host, config, runtime))
	}

	/// Creates a component with an already resolved configuration.
	pub fn with_config(host: H, config: AjaxFormConfig, runtime: Runtime) -> Self {
		Self {
			inner: Rc::new(Inner {
				host,
				config,
				runtime,
				state: Cell::new(SubmissionState::Idle),
				form: RefCell::new(None),
				listener: RefCell::new(None),
				in_flight: RefCell::new(None),
				detached: Cell::new(false),
				replacements: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Connects the component to its form.
	///
	/// Attaching an attached component is a no-op.
	///
	/// # Errors
	///
	/// - [`ConfigError::FormNotFound`] when the host has no `<form>`.
	/// - [`ConfigError::Detached`] after [`detach`](Self::detach) or after
	///   the host was replaced by an `outerHTML` swap.
	pub fn attach(&self) -> Result<(), ConfigError> {
		if self.inner.detached.get() {
			return Err(ConfigError::Detached);
		}
		if self.inner.listener.borrow().is_some() {
			return Ok(());
		}

		let form = self.inner.host.query_form().ok_or(ConfigError::FormNotFound)?;
		self.inner.listen(form)?;
		debug_log!("ajax-form attached ({}, delay {:?})", self.inner.config.swap, self.inner.config.delay);
		Ok(())
	}

	/// Routes an event to its handler.
	pub fn handle_event(&self, event: &FormEvent<'_>) {
		match event {
			FormEvent::Submit(submit) => {
				self.handle_submit(submit);
			}
		}
	}

	/// Handles a submit event of the owned form.
	///
	/// The event's default is always prevented. A submission starts only
	/// when the component is attached and idle.
	pub fn handle_submit(&self, event: &SubmitEvent) -> SubmitDisposition {
		event.prevent_default();

		if self.inner.state.get() == SubmissionState::Submitting {
			debug_log!("ajax-form submit ignored, a submission is already in flight");
			return SubmitDisposition::Ignored;
		}
		let Some(form) = self.inner.form.borrow().clone() else {
			debug_log!("ajax-form submit ignored, component is not attached");
			return SubmitDisposition::Ignored;
		};

		// Field values are read now, not when the pipeline is first polled.
		let payload = FormPayload::collect(&form, event.submitter());
		self.inner.enter_submitting();

		let (abort_handle, registration) = AbortHandle::new_pair();
		let pipeline = Abortable::new(Rc::clone(&self.inner).run(form, payload), registration);
		*self.inner.in_flight.borrow_mut() = Some(abort_handle);

		let spawned = self.inner.runtime.spawner.spawn_local(async move {
			// Aborted only by detach, which resets the state itself.
			let _ = pipeline.await;
		});
		if let Err(err) = spawned {
			warn_log!("ajax-form could not schedule submission: {}", err);
			self.inner.leave_submitting();
			return SubmitDisposition::Ignored;
		}

		SubmitDisposition::Started
	}

	/// Disconnects the component.
	///
	/// Removes the submit listener, aborts any in-flight request or pending
	/// settle delay, and returns the host to idle. Components mounted on
	/// replacement markup are detached too. A detached component cannot be
	/// attached again.
	pub fn detach(&self) {
		let first = !self.inner.detached.replace(true);
		self.inner.release_form();
		let in_flight = self.inner.in_flight.borrow_mut().take();
		if let Some(handle) = in_flight {
			handle.abort();
		}
		if self.inner.state.get() == SubmissionState::Submitting {
			self.inner.leave_submitting();
		}
		for replacement in self.replacements() {
			replacement.detach();
		}
		if first {
			debug_log!("ajax-form detached");
		}
	}

	/// Returns the current submission state.
	pub fn state(&self) -> SubmissionState {
		self.inner.state.get()
	}

	/// Returns `true` while a submission is in flight or settling.
	pub fn is_submitting(&self) -> bool {
		self.state() == SubmissionState::Submitting
	}

	/// Returns `true` while the submit listener is installed.
	pub fn is_attached(&self) -> bool {
		self.inner.listener.borrow().is_some()
	}

	/// Returns the components mounted on the markup that replaced this
	/// component's host.
	///
	/// They live as long as this component. Empty unless an `outerHTML`
	/// swap inserted `<ajax-form>` elements.
	pub fn replacements(&self) -> Vec<AjaxForm<H>> {
		self.inner.replacements.borrow().clone()
	}

	/// Returns the resolved configuration.
	pub fn config(&self) -> &AjaxFormConfig {
		&self.inner.config
	}

	/// Returns the host element.
	pub fn host(&self) -> &H {
		&self.inner.host
	}
}

impl<H: HostElement> Inner<H> {
	fn listen(self: &Rc<Self>, form: H::Form) -> Result<(), DomError> {
		let weak = Rc::downgrade(self);
		let handle = form.add_submit_listener(Rc::new(move |event: &SubmitEvent| {
			event.prevent_default();
			if let Some(inner) = weak.upgrade() {
				AjaxForm { inner }.handle_event(&FormEvent::Submit(event));
			}
		}))?;

		*self.form.borrow_mut() = Some(form);
		*self.listener.borrow_mut() = Some(handle);
		Ok(())
	}

	fn release_form(&self) {
		let listener = self.listener.borrow_mut().take();
		if let Some(listener) = listener {
			listener.remove();
		}
		self.form.borrow_mut().take();
	}

	fn rebind_form(self: &Rc<Self>) {
		self.release_form();
		match self.host.query_form() {
			Some(form) => {
				if let Err(err) = self.listen(form) {
					warn_log!("ajax-form could not listen to the swapped form: {}", err);
				}
			}
			None => debug_log!("ajax-form swapped contents hold no form, component is unattached"),
		}
	}

	fn adopt(&self, hosts: Vec<H>) {
		let mut replacements = self.replacements.borrow_mut();
		for host in hosts {
			let component = AjaxForm::create(host, self.runtime.clone())
				.and_then(|component| component.attach().map(|()| component));
			match component {
				Ok(component) => replacements.push(component),
				Err(err) => warn_log!("ajax-form could not mount swapped-in element: {}", err),
			}
		}
	}

	fn enter_submitting(&self) {
		self.state.set(SubmissionState::Submitting);
		if let Err(err) = self.host.set_attribute(SUBMITTING_ATTRIBUTE, "") {
			warn_log!("ajax-form could not mark host as submitting: {}", err);
		}
	}

	fn leave_submitting(&self) {
		self.in_flight.borrow_mut().take();
		self.state.set(SubmissionState::Idle);
		if let Err(err) = self.host.remove_attribute(SUBMITTING_ATTRIBUTE) {
			warn_log!("ajax-form could not clear submitting marker: {}", err);
		}
	}

	async fn run(self: Rc<Self>, form: H::Form, payload: Result<FormPayload, SubmitError>) {
		match self.exchange(&form, payload).await {
			Ok(payload) => info_log!("ajax-form submitted {} field(s)", payload.len()),
			Err(SubmitError::Detached) => {
				debug_log!("ajax-form dropped a response for a host that left the document");
			}
			Err(err) => warn_log!("ajax-form submission failed: {}", err),
		}

		self.runtime.timer.sleep(self.config.delay).await;
		self.leave_submitting();
	}

	async fn exchange(
		self: &Rc<Self>,
		form: &H::Form,
		payload: Result<FormPayload, SubmitError>,
	) -> Result<FormPayload, SubmitError> {
		let payload = payload?;
		let event = AjaxFormEvent::new(payload.encode()?);
		let request = FormRequest::new(&form.method(), &form.action(), &payload)?;

		let response = self.runtime.transport.send(request).await?.error_for_status()?;

		if !self.host.is_connected() {
			return Err(SubmitError::Detached);
		}
		let dispatched = match self.config.swap {
			SwapMode::OuterReplace => {
				let replacement = self.host.set_outer_html(&response.body)?;
				self.detached.set(true);
				self.release_form();
				self.adopt(replacement.hosts);
				replacement.parent.dispatch_event(&event)
			}
			SwapMode::InnerReplace => {
				self.host.set_inner_html(&response.body)?;
				self.rebind_form();
				self.host.dispatch_event(&event)
			}
		};

		// The markup is already applied, so this is not a submission failure.
		if let Err(err) = dispatched {
			warn_log!("ajax-form could not dispatch the {} event: {}", EVENT_NAME, err);
		}
		Ok(payload)
	}
}
