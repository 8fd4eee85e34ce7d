//! Browser adapter
//!
//! Implements [`HostElement`] and [`FormElement`] over `web_sys` elements and
//! mounts a component on every `<ajax-form>` in the document. Hosts that an
//! outerHTML swap inserts are reported back to the component that swapped.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;
use web_sys::{
	CustomEvent, CustomEventInit, Element, EventTarget, FormData, HtmlElement, HtmlFormElement,
	Node, NodeList,
};

use crate::component::AjaxForm;
use crate::config::TAG_NAME;
use crate::dom::{
	AjaxFormEvent, EventSource, FormElement, HostElement, ListenerHandle, Replacement,
	SubmitEvent, SubmitListener, Submitter,
};
use crate::error::{ConfigError, DomError};
use crate::runtime::Runtime;
use crate::warn_log;

fn js_error(err: JsValue) -> DomError {
	DomError::new(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// An `<ajax-form>` element in the live document.
#[derive(Debug, Clone)]
pub struct WebHost {
	element: HtmlElement,
}

impl WebHost {
	/// Wraps an element.
	pub fn new(element: HtmlElement) -> Self {
		Self { element }
	}

	/// Returns the wrapped element.
	pub fn element(&self) -> &HtmlElement {
		&self.element
	}
}

impl EventSource for WebHost {
	fn dispatch_event(&self, event: &AjaxFormEvent) -> Result<bool, DomError> {
		dispatch_on(&self.element, event)
	}
}

impl HostElement for WebHost {
	type Form = WebForm;
	type Parent = WebNode;

	fn attribute(&self, name: &str) -> Option<String> {
		self.element.get_attribute(name)
	}

	fn has_attribute(&self, name: &str) -> bool {
		self.element.has_attribute(name)
	}

	fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
		self.element.set_attribute(name, value).map_err(js_error)
	}

	fn remove_attribute(&self, name: &str) -> Result<(), DomError> {
		self.element.remove_attribute(name).map_err(js_error)
	}

	fn query_form(&self) -> Option<WebForm> {
		self.element
			.query_selector("form")
			.ok()
			.flatten()
			.and_then(|element| element.dyn_into::<HtmlFormElement>().ok())
			.map(WebForm::new)
	}

	fn set_outer_html(&self, markup: &str) -> Result<Replacement<Self>, DomError> {
		// Assigning outerHTML on a parentless element is silently ignored.
		let Some(parent) = self.element.parent_node() else {
			return Err(DomError::new("cannot replace an element without a parent"));
		};
		let previous = self.element.previous_sibling();
		let next = self.element.next_sibling();
		self.element.set_outer_html(markup);

		// The inserted nodes sit between the old siblings.
		let mut hosts = Vec::new();
		let mut cursor = match &previous {
			Some(previous) => previous.next_sibling(),
			None => parent.first_child(),
		};
		while let Some(node) = cursor {
			if next.as_ref().is_some_and(|next| next.is_same_node(Some(&node))) {
				break;
			}
			if let Some(element) = node.dyn_ref::<Element>() {
				if element.matches(TAG_NAME).unwrap_or(false)
					&& let Some(host) = element.dyn_ref::<HtmlElement>()
				{
					hosts.push(WebHost::new(host.clone()));
				}
				let nested = element.query_selector_all(TAG_NAME).map_err(js_error)?;
				hosts.extend(hosts_in(&nested));
			}
			cursor = node.next_sibling();
		}

		Ok(Replacement {
			hosts,
			parent: WebNode::new(parent),
		})
	}

	fn set_inner_html(&self, markup: &str) -> Result<(), DomError> {
		self.element.set_inner_html(markup);
		Ok(())
	}

	fn is_connected(&self) -> bool {
		self.element.is_connected()
	}
}

/// The parent a replaced [`WebHost`] was removed from.
#[derive(Debug, Clone)]
pub struct WebNode {
	node: Node,
}

impl WebNode {
	/// Wraps a node.
	pub fn new(node: Node) -> Self {
		Self { node }
	}

	/// Returns the wrapped node.
	pub fn node(&self) -> &Node {
		&self.node
	}
}

impl EventSource for WebNode {
	fn dispatch_event(&self, event: &AjaxFormEvent) -> Result<bool, DomError> {
		dispatch_on(&self.node, event)
	}
}

fn dispatch_on(target: &EventTarget, event: &AjaxFormEvent) -> Result<bool, DomError> {
	let init = CustomEventInit::new();
	init.set_bubbles(event.bubbles());
	init.set_cancelable(event.cancelable());
	init.set_detail(&JsValue::from_str(&event.detail));
	let custom = CustomEvent::new_with_event_init_dict(event.name(), &init).map_err(js_error)?;
	target.dispatch_event(&custom).map_err(js_error)
}

fn hosts_in(nodes: &NodeList) -> impl Iterator<Item = WebHost> + '_ {
	(0..nodes.length()).filter_map(|index| {
		nodes
			.get(index)
			.and_then(|node| node.dyn_into::<HtmlElement>().ok())
			.map(WebHost::new)
	})
}

/// A `<form>` in the live document.
#[derive(Debug, Clone)]
pub struct WebForm {
	form: HtmlFormElement,
}

impl WebForm {
	/// Wraps a form element.
	pub fn new(form: HtmlFormElement) -> Self {
		Self { form }
	}
}

impl FormElement for WebForm {
	fn action(&self) -> String {
		self.form.action()
	}

	fn method(&self) -> String {
		self.form.method()
	}

	fn entries(&self) -> Result<Vec<(String, String)>, DomError> {
		let data = FormData::new_with_form(&self.form).map_err(js_error)?;
		let Some(iter) = js_sys::try_iter(&data).map_err(js_error)? else {
			return Ok(Vec::new());
		};

		let mut entries = Vec::new();
		for entry in iter {
			let entry: js_sys::Array = entry.map_err(js_error)?.unchecked_into();
			let name = entry.get(0).as_string().unwrap_or_default();
			// File inputs yield `File` values, which are not sent.
			match entry.get(1).as_string() {
				Some(value) => entries.push((name, value)),
				None => warn_log!("ajax-form skipped non-text field {:?}", name),
			}
		}
		Ok(entries)
	}

	fn add_submit_listener(&self, listener: SubmitListener) -> Result<ListenerHandle, DomError> {
		let closure = Closure::wrap(Box::new(move |native: web_sys::SubmitEvent| {
			let event = SubmitEvent::new(native.submitter().and_then(submitter_of));
			listener(&event);
			if event.default_prevented() {
				native.prevent_default();
			}
		}) as Box<dyn FnMut(web_sys::SubmitEvent)>);

		self.form
			.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())
			.map_err(js_error)?;

		let form = self.form.clone();
		Ok(ListenerHandle::new(move || {
			let _ = form.remove_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
			drop(closure);
		}))
	}
}

fn submitter_of(element: HtmlElement) -> Option<Submitter> {
	if let Some(button) = element.dyn_ref::<web_sys::HtmlButtonElement>() {
		return Some(Submitter::new(button.name(), button.value()));
	}
	if let Some(input) = element.dyn_ref::<web_sys::HtmlInputElement>() {
		return Some(Submitter::new(input.name(), input.value()));
	}
	None
}

/// Creates and attaches a component for every `<ajax-form>` in the document.
///
/// # Errors
///
/// Fails on the first element with an invalid `swap` value or without a
/// `<form>`. Components attached before the failure are detached.
pub fn mount_all(runtime: &Runtime) -> Result<Vec<AjaxForm<WebHost>>, ConfigError> {
	let document = web_sys::window()
		.and_then(|window| window.document())
		.ok_or_else(|| DomError::new("no document available"))?;
	let nodes = document.query_selector_all(TAG_NAME).map_err(js_error)?;

	let mut mounted = Vec::with_capacity(nodes.length() as usize);
	for host in hosts_in(&nodes) {
		let component = AjaxForm::create(host, runtime.clone())
			.and_then(|component| component.attach().map(|()| component));
		match component {
			Ok(component) => mounted.push(component),
			Err(err) => {
				for component in &mounted {
					component.detach();
				}
				return Err(err);
			}
		}
	}
	Ok(mounted)
}
