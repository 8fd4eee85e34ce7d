use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::TAG_NAME;
use crate::dom::{
	AjaxFormEvent, EventSource, FormElement, HostElement, ListenerHandle, Replacement,
	SubmitEvent, SubmitListener, Submitter,
};
use crate::error::DomError;

use super::markup::{self, Fragment};

/// A flat in-memory document.
///
/// Top-level children are either raw markup or [`MemoryHost`] elements.
/// Events dispatched by connected hosts bubble up to the document, where
/// they are recorded.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
	state: Rc<RefCell<DocumentState>>,
}

#[derive(Debug, Default)]
struct DocumentState {
	children: Vec<Child>,
	events: Vec<AjaxFormEvent>,
}

#[derive(Debug)]
enum Child {
	Markup(String),
	Host(MemoryHost),
}

impl MemoryDocument {
	/// Creates an empty document.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends markup. Top-level `<ajax-form>` elements become hosts.
	pub fn append_markup(&self, markup: impl AsRef<str>) {
		let (children, _) = parse_children(markup.as_ref(), &self.state);
		self.state.borrow_mut().children.extend(children);
	}

	/// Appends a host element and connects it to this document.
	pub fn append(&self, host: &MemoryHost) {
		host.connect(&self.state);
		self.state
			.borrow_mut()
			.children
			.push(Child::Host(host.clone()));
	}

	/// Removes a host element from the document.
	pub fn remove(&self, host: &MemoryHost) {
		self.state
			.borrow_mut()
			.children
			.retain(|child| !matches!(child, Child::Host(h) if h.same_node(host)));
		let mut node = host.node.borrow_mut();
		node.connected = false;
		node.document = Weak::new();
	}

	/// Returns the host elements currently in the document.
	pub fn hosts(&self) -> Vec<MemoryHost> {
		self.state
			.borrow()
			.children
			.iter()
			.filter_map(|child| match child {
				Child::Host(host) => Some(host.clone()),
				Child::Markup(_) => None,
			})
			.collect()
	}

	/// Serializes the document.
	pub fn to_html(&self) -> String {
		self.state
			.borrow()
			.children
			.iter()
			.map(|child| match child {
				Child::Markup(markup) => markup.clone(),
				Child::Host(host) => host.outer_html(),
			})
			.collect()
	}

	/// Returns the events that reached the document.
	pub fn received_events(&self) -> Vec<AjaxFormEvent> {
		self.state.borrow().events.clone()
	}
}

impl EventSource for MemoryDocument {
	fn dispatch_event(&self, event: &AjaxFormEvent) -> Result<bool, DomError> {
		self.state.borrow_mut().events.push(event.clone());
		Ok(true)
	}
}

/// An in-memory `<ajax-form>` element.
#[derive(Debug, Clone)]
pub struct MemoryHost {
	node: Rc<RefCell<HostNode>>,
}

#[derive(Debug)]
struct HostNode {
	attributes: Vec<(String, String)>,
	content: Content,
	connected: bool,
	document: Weak<RefCell<DocumentState>>,
	dispatched: Vec<AjaxFormEvent>,
	reject_events: bool,
}

#[derive(Debug)]
enum Content {
	Form(MemoryForm),
	Markup {
		html: String,
		form: Option<MemoryForm>,
	},
}

impl Content {
	fn from_markup(html: &str) -> Self {
		Content::Markup {
			form: markup::parse_form(html),
			html: html.to_string(),
		}
	}
}

impl Default for MemoryHost {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryHost {
	/// Creates an empty host that is not part of any document.
	pub fn new() -> Self {
		Self {
			node: Rc::new(RefCell::new(HostNode {
				attributes: Vec::new(),
				content: Content::from_markup(""),
				connected: false,
				document: Weak::new(),
				dispatched: Vec::new(),
				reject_events: false,
			})),
		}
	}

	/// Sets an attribute, builder style.
	pub fn with_attribute(self, name: &str, value: &str) -> Self {
		set_attr(&mut self.node.borrow_mut().attributes, name, value);
		self
	}

	/// Places a form inside the host.
	pub fn with_form(self, form: MemoryForm) -> Self {
		self.node.borrow_mut().content = Content::Form(form);
		self
	}

	/// Places markup inside the host. A `<form>` in it becomes the host's form.
	pub fn with_markup(self, markup: impl AsRef<str>) -> Self {
		self.node.borrow_mut().content = Content::from_markup(markup.as_ref());
		self
	}

	/// Makes every later [`EventSource::dispatch_event`] call fail.
	pub fn rejecting_events(self) -> Self {
		self.node.borrow_mut().reject_events = true;
		self
	}

	/// Serializes the host's contents.
	pub fn inner_html(&self) -> String {
		match &self.node.borrow().content {
			Content::Form(form) => form.to_html(),
			Content::Markup { html, .. } => html.clone(),
		}
	}

	/// Serializes the host, tag included.
	pub fn outer_html(&self) -> String {
		let attributes: String = self
			.node
			.borrow()
			.attributes
			.iter()
			.map(|(name, value)| {
				if value.is_empty() {
					format!(" {name}")
				} else {
					format!(" {name}=\"{value}\"")
				}
			})
			.collect();
		format!("<{TAG_NAME}{attributes}>{}</{TAG_NAME}>", self.inner_html())
	}

	/// Returns every event dispatched from this host.
	pub fn dispatched_events(&self) -> Vec<AjaxFormEvent> {
		self.node.borrow().dispatched.clone()
	}

	fn connect(&self, document: &Rc<RefCell<DocumentState>>) {
		let mut node = self.node.borrow_mut();
		node.document = Rc::downgrade(document);
		node.connected = true;
	}

	fn same_node(&self, other: &MemoryHost) -> bool {
		Rc::ptr_eq(&self.node, &other.node)
	}
}

impl EventSource for MemoryHost {
	fn dispatch_event(&self, event: &AjaxFormEvent) -> Result<bool, DomError> {
		let document = {
			let mut node = self.node.borrow_mut();
			if node.reject_events {
				return Err(DomError::new("event dispatch rejected"));
			}
			node.dispatched.push(event.clone());
			if node.connected && event.bubbles() {
				node.document.upgrade()
			} else {
				None
			}
		};
		if let Some(document) = document {
			document.borrow_mut().events.push(event.clone());
		}
		Ok(true)
	}
}

impl HostElement for MemoryHost {
	type Form = MemoryForm;
	type Parent = MemoryDocument;

	fn attribute(&self, name: &str) -> Option<String> {
		markup::attribute(&self.node.borrow().attributes, name)
	}

	fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
		set_attr(&mut self.node.borrow_mut().attributes, name, value);
		Ok(())
	}

	fn remove_attribute(&self, name: &str) -> Result<(), DomError> {
		self.node
			.borrow_mut()
			.attributes
			.retain(|(n, _)| n != name);
		Ok(())
	}

	fn query_form(&self) -> Option<MemoryForm> {
		match &self.node.borrow().content {
			Content::Form(form) => Some(form.clone()),
			Content::Markup { form, .. } => form.clone(),
		}
	}

	fn set_outer_html(&self, markup: &str) -> Result<Replacement<Self>, DomError> {
		let document = {
			let node = self.node.borrow();
			if node.connected {
				node.document.upgrade()
			} else {
				None
			}
		};
		let document =
			document.ok_or_else(|| DomError::new("cannot replace an element without a parent"))?;

		let (children, hosts) = parse_children(markup, &document);
		{
			let mut state = document.borrow_mut();
			let index = state
				.children
				.iter()
				.position(|child| matches!(child, Child::Host(h) if h.same_node(self)))
				.ok_or_else(|| DomError::new("element is not a child of its document"))?;
			state.children.splice(index..=index, children);
		}

		let mut node = self.node.borrow_mut();
		node.connected = false;
		node.document = Weak::new();
		Ok(Replacement {
			hosts,
			parent: MemoryDocument { state: document },
		})
	}

	fn set_inner_html(&self, markup: &str) -> Result<(), DomError> {
		self.node.borrow_mut().content = Content::from_markup(markup);
		Ok(())
	}

	fn is_connected(&self) -> bool {
		self.node.borrow().connected
	}
}

/// Turns markup into document children, connecting every new host.
fn parse_children(
	markup: &str,
	document: &Rc<RefCell<DocumentState>>,
) -> (Vec<Child>, Vec<MemoryHost>) {
	let mut children = Vec::new();
	let mut hosts = Vec::new();
	for fragment in markup::split_hosts(markup) {
		match fragment {
			Fragment::Text(text) => children.push(Child::Markup(text.to_string())),
			Fragment::Host { attributes, inner } => {
				let host = MemoryHost::new().with_markup(inner);
				host.node.borrow_mut().attributes = attributes;
				host.connect(document);
				children.push(Child::Host(host.clone()));
				hosts.push(host);
			}
		}
	}
	(children, hosts)
}

/// An in-memory `<form>`.
///
/// Fields are plain name/value pairs kept in document order.
#[derive(Clone)]
pub struct MemoryForm {
	state: Rc<RefCell<FormState>>,
}

struct FormState {
	action: String,
	method: String,
	fields: Vec<(String, String)>,
	listeners: Vec<(u64, SubmitListener)>,
	next_listener: u64,
}

impl std::fmt::Debug for MemoryForm {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.borrow();
		f.debug_struct("MemoryForm")
			.field("action", &state.action)
			.field("method", &state.method)
			.field("fields", &state.fields)
			.field("listeners", &state.listeners.len())
			.finish()
	}
}

impl MemoryForm {
	/// Creates a form with the given action and method.
	pub fn new(action: impl Into<String>, method: impl Into<String>) -> Self {
		Self {
			state: Rc::new(RefCell::new(FormState {
				action: action.into(),
				method: method.into(),
				fields: Vec::new(),
				listeners: Vec::new(),
				next_listener: 0,
			})),
		}
	}

	/// Appends a field, builder style.
	pub fn with_field(self, name: &str, value: &str) -> Self {
		self.state
			.borrow_mut()
			.fields
			.push((name.to_string(), value.to_string()));
		self
	}

	/// Changes the value of the first field named `name`.
	pub fn set_field(&self, name: &str, value: &str) {
		let mut state = self.state.borrow_mut();
		if let Some((_, v)) = state.fields.iter_mut().find(|(n, _)| n == name) {
			*v = value.to_string();
		}
	}

	/// Fires a submit event at every listener and returns it.
	pub fn submit(&self, submitter: Option<Submitter>) -> SubmitEvent {
		let listeners: Vec<SubmitListener> = self
			.state
			.borrow()
			.listeners
			.iter()
			.map(|(_, listener)| Rc::clone(listener))
			.collect();
		let event = SubmitEvent::new(submitter);
		for listener in listeners {
			listener(&event);
		}
		event
	}

	/// Returns the number of installed submit listeners.
	pub fn listener_count(&self) -> usize {
		self.state.borrow().listeners.len()
	}

	/// Serializes the form.
	pub fn to_html(&self) -> String {
		let state = self.state.borrow();
		let fields: String = state
			.fields
			.iter()
			.map(|(name, value)| format!("<input name=\"{name}\" value=\"{value}\">"))
			.collect();
		format!(
			"<form action=\"{}\" method=\"{}\">{fields}</form>",
			state.action, state.method
		)
	}
}

impl FormElement for MemoryForm {
	fn action(&self) -> String {
		self.state.borrow().action.clone()
	}

	fn method(&self) -> String {
		self.state.borrow().method.clone()
	}

	fn entries(&self) -> Result<Vec<(String, String)>, DomError> {
		Ok(self.state.borrow().fields.clone())
	}

	fn add_submit_listener(&self, listener: SubmitListener) -> Result<ListenerHandle, DomError> {
		let id = {
			let mut state = self.state.borrow_mut();
			let id = state.next_listener;
			state.next_listener += 1;
			state.listeners.push((id, listener));
			id
		};
		let weak = Rc::downgrade(&self.state);
		Ok(ListenerHandle::new(move || {
			if let Some(state) = weak.upgrade() {
				state.borrow_mut().listeners.retain(|(i, _)| *i != id);
			}
		}))
	}
}

fn set_attr(attributes: &mut Vec<(String, String)>, name: &str, value: &str) {
	match attributes.iter_mut().find(|(n, _)| n == name) {
		Some((_, v)) => *v = value.to_string(),
		None => attributes.push((name.to_string(), value.to_string())),
	}
}
