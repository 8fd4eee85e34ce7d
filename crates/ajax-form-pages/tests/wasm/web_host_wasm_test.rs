//! Browser adapter tests
//!
//! Run with `wasm-pack test --headless --firefox crates/ajax-form-pages`.

#![cfg(target_arch = "wasm32")]

use ajax_form_pages::wasm::{WebForm, WebHost};
use ajax_form_pages::{AjaxFormEvent, EventSource, FormElement, HostElement};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn mount(markup: &str) -> HtmlElement {
	let document = web_sys::window().unwrap().document().unwrap();
	let body = document.body().unwrap();
	body.set_inner_html(markup);
	body.query_selector("ajax-form")
		.unwrap()
		.unwrap()
		.dyn_into::<HtmlElement>()
		.unwrap()
}

#[wasm_bindgen_test]
fn test_web_form_reads_entries() {
	let element = mount(
		"<ajax-form><form action=\"/submit\" method=\"post\">\
		 <input name=\"a\" value=\"1\"><input name=\"b\" value=\"2\">\
		 </form></ajax-form>",
	);
	let host = WebHost::new(element);

	let form: WebForm = host.query_form().unwrap();

	assert!(form.action().ends_with("/submit"));
	assert_eq!(form.method(), "post");
	assert_eq!(
		form.entries().unwrap(),
		vec![
			("a".to_string(), "1".to_string()),
			("b".to_string(), "2".to_string()),
		]
	);
}

#[wasm_bindgen_test]
fn test_web_host_attributes_and_swap() {
	let element = mount("<ajax-form swap=\"innerHTML\"><form></form></ajax-form>");
	let host = WebHost::new(element.clone());

	assert_eq!(host.attribute("swap").as_deref(), Some("innerHTML"));
	host.set_attribute("form-submitting", "").unwrap();
	assert!(element.has_attribute("form-submitting"));
	host.remove_attribute("form-submitting").unwrap();
	assert!(!element.has_attribute("form-submitting"));

	host.set_inner_html("<p>ok</p>").unwrap();

	assert_eq!(element.inner_html(), "<p>ok</p>");
	assert!(host.query_form().is_none());
	assert!(host.is_connected());
}

#[wasm_bindgen_test]
fn test_web_host_dispatches_event() {
	let element = mount("<ajax-form><form></form></ajax-form>");
	let host = WebHost::new(element);

	let not_canceled = host.dispatch_event(&AjaxFormEvent::new("a=1")).unwrap();

	assert!(not_canceled);
}

#[wasm_bindgen_test]
fn test_outer_swap_disconnects_host() {
	let element = mount("<ajax-form><form></form></ajax-form>");
	let host = WebHost::new(element);

	let replacement = host.set_outer_html("<p id=\"swapped\">ok</p>").unwrap();

	assert!(!host.is_connected());
	assert!(replacement.hosts.is_empty());
	let document = web_sys::window().unwrap().document().unwrap();
	assert!(document.get_element_by_id("swapped").is_some());
	assert!(replacement.parent.dispatch_event(&AjaxFormEvent::new("a=1")).unwrap());
}

#[wasm_bindgen_test]
fn test_outer_swap_reports_inserted_hosts() {
	let element = mount("<p>before</p><ajax-form><form></form></ajax-form><p>after</p>");
	let host = WebHost::new(element);

	let replacement = host
		.set_outer_html(
			"<p>saved</p><ajax-form swap=\"innerHTML\">\
			 <form action=\"/next\" method=\"post\"><input name=\"a\" value=\"9\"></form>\
			 </ajax-form><div><ajax-form id=\"nested\"><form></form></ajax-form></div>",
		)
		.unwrap();

	assert_eq!(replacement.hosts.len(), 2);
	assert_eq!(
		replacement.hosts[0].attribute("swap").as_deref(),
		Some("innerHTML")
	);
	assert!(replacement.hosts[0].is_connected());
	assert!(replacement.hosts[0].query_form().unwrap().action().ends_with("/next"));
	assert_eq!(replacement.hosts[1].attribute("id").as_deref(), Some("nested"));
}
