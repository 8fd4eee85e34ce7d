//! AjaxForm Lifecycle Integration Tests
//!
//! Drives the component through the in-memory DOM, a scripted transport
//! and a manual clock.
//!
//! Test Categories:
//! - Category 1: Configuration and Attachment
//! - Category 2: Successful Submissions
//! - Category 3: Re-entrancy Guard and Settle Delay
//! - Category 4: Failures
//! - Category 5: Detach and Disconnected Hosts
//! - Category 6: Swapped Markup

use std::time::Duration;

use ajax_form_http::{FORM_URLENCODED, X_REQUESTED_WITH, XML_HTTP_REQUEST};
use ajax_form_pages::testing::{
	ManualClock, MemoryDocument, MemoryForm, MemoryHost, MockTransport,
};
use ajax_form_pages::{
	AjaxForm, AjaxFormEvent, ConfigError, FormResponse, HostElement, Runtime, SubmissionState,
	SubmitDisposition, SubmitEvent, Submitter, SwapMode,
};
use futures::executor::LocalPool;
use http::{Method, StatusCode, header::CONTENT_TYPE};
use rstest::rstest;

const FORM_HTML: &str = "<form action=\"/submit\" method=\"post\"><input name=\"a\" value=\"1\"><input name=\"b\" value=\"2\"></form>";
const RERENDERED_FORM_HTML: &str = "<p class=\"error\">Check b</p><form action=\"/submit\" method=\"post\"><input name=\"a\" value=\"5\"><input name=\"b\" value=\"\"></form>";

struct Page {
	pool: LocalPool,
	transport: MockTransport,
	clock: ManualClock,
	document: MemoryDocument,
	form: MemoryForm,
	host: MemoryHost,
	component: AjaxForm<MemoryHost>,
}

impl Page {
	fn submit(&mut self, submitter: Option<Submitter>) -> SubmitEvent {
		let event = self.form.submit(submitter);
		self.pool.run_until_stalled();
		event
	}

	/// Submits whatever form the host holds now.
	fn submit_current(&mut self, submitter: Option<Submitter>) -> SubmitEvent {
		let form = self.host.query_form().unwrap();
		let event = form.submit(submitter);
		self.pool.run_until_stalled();
		event
	}

	fn settle(&mut self, by: Duration) {
		self.clock.advance(by);
		self.pool.run_until_stalled();
	}
}

fn page_with(form: MemoryForm, attributes: &[(&str, &str)]) -> Page {
	let pool = LocalPool::new();
	let transport = MockTransport::new();
	let clock = ManualClock::new();
	let runtime = Runtime::new(transport.clone(), clock.clone(), pool.spawner());

	let document = MemoryDocument::new();
	let host = attributes
		.iter()
		.fold(MemoryHost::new(), |host, (name, value)| {
			host.with_attribute(name, value)
		})
		.with_form(form.clone());
	document.append(&host);

	let component = AjaxForm::create(host.clone(), runtime).unwrap();
	component.attach().unwrap();

	Page {
		pool,
		transport,
		clock,
		document,
		form,
		host,
		component,
	}
}

fn page(attributes: &[(&str, &str)]) -> Page {
	let form = MemoryForm::new("/submit", "post")
		.with_field("a", "1")
		.with_field("b", "2");
	page_with(form, attributes)
}

fn go() -> Option<Submitter> {
	Some(Submitter::new("go", "yes"))
}

// ============================================================================
// Category 1: Configuration and Attachment
// ============================================================================

#[rstest]
#[case(&[], SwapMode::OuterReplace, 0)]
#[case(&[("swap", "innerHTML")], SwapMode::InnerReplace, 0)]
#[case(&[("swap", "outerHTML"), ("delay", "750")], SwapMode::OuterReplace, 750)]
#[case(&[("delay", "soon")], SwapMode::OuterReplace, 0)]
fn test_config_resolved_from_attributes(
	#[case] attributes: &[(&str, &str)],
	#[case] swap: SwapMode,
	#[case] delay_ms: u64,
) {
	let page = page(attributes);

	assert_eq!(page.component.config().swap, swap);
	assert_eq!(page.component.config().delay, Duration::from_millis(delay_ms));
	assert_eq!(page.component.state(), SubmissionState::Idle);
}

#[rstest]
fn test_invalid_swap_fails_construction() {
	let pool = LocalPool::new();
	let runtime = Runtime::new(MockTransport::new(), ManualClock::new(), pool.spawner());
	let host = MemoryHost::new()
		.with_attribute("swap", "sideways")
		.with_form(MemoryForm::new("/submit", "post"));

	let result = AjaxForm::create(host, runtime);

	assert_eq!(
		result.err(),
		Some(ConfigError::InvalidSwap("sideways".to_string()))
	);
}

#[rstest]
fn test_missing_form_fails_attach() {
	let pool = LocalPool::new();
	let runtime = Runtime::new(MockTransport::new(), ManualClock::new(), pool.spawner());
	let host = MemoryHost::new().with_markup("<p>no form here</p>");
	let component = AjaxForm::create(host, runtime).unwrap();

	assert_eq!(component.attach(), Err(ConfigError::FormNotFound));
	assert!(!component.is_attached());
}

#[rstest]
fn test_attach_twice_installs_one_listener() {
	let page = page(&[]);

	page.component.attach().unwrap();

	assert!(page.component.is_attached());
	assert_eq!(page.form.listener_count(), 1);
}

// ============================================================================
// Category 2: Successful Submissions
// ============================================================================

#[rstest]
fn test_outer_swap_replaces_host() {
	let mut page = page(&[]);
	page.transport.respond(FormResponse::ok("<p>ok</p>"));

	let event = page.submit(go());

	assert!(event.default_prevented());
	assert_eq!(page.document.to_html(), "<p>ok</p>");
	assert!(!page.host.is_connected());
	assert_eq!(page.component.state(), SubmissionState::Idle);
}

#[rstest]
fn test_inner_swap_keeps_host() {
	let mut page = page(&[("swap", "innerHTML")]);
	page.transport.respond(FormResponse::ok("<p>ok</p>"));

	page.submit(go());

	assert_eq!(page.host.inner_html(), "<p>ok</p>");
	assert_eq!(
		page.document.to_html(),
		"<ajax-form swap=\"innerHTML\"><p>ok</p></ajax-form>"
	);
}

#[rstest]
fn test_request_carries_payload_and_headers() {
	let mut page = page(&[]);
	page.transport.respond(FormResponse::ok("<p>ok</p>"));

	page.submit(go());

	let requests = page.transport.requests();
	assert_eq!(requests.len(), 1);
	let request = &requests[0];
	assert_eq!(request.method, Method::POST);
	assert_eq!(request.url, "/submit");
	assert_eq!(request.body.as_deref(), Some("a=1&b=2&go=yes"));
	assert_eq!(request.headers[CONTENT_TYPE], FORM_URLENCODED);
	assert_eq!(request.headers[X_REQUESTED_WITH], XML_HTTP_REQUEST);
}

#[rstest]
fn test_success_dispatches_one_event_with_payload() {
	let mut page = page(&[("swap", "innerHTML")]);
	page.transport.respond(FormResponse::ok("<p>ok</p>"));

	page.submit(go());

	let expected = vec![AjaxFormEvent::new("a=1&b=2&go=yes")];
	assert_eq!(page.host.dispatched_events(), expected);
	assert_eq!(page.document.received_events(), expected);
}

#[rstest]
fn test_outer_swap_dispatches_event_from_former_parent() {
	let mut page = page(&[]);
	page.transport.respond(FormResponse::ok("<p>ok</p>"));

	page.submit(go());

	assert_eq!(
		page.document.received_events(),
		vec![AjaxFormEvent::new("a=1&b=2&go=yes")]
	);
	assert!(page.host.dispatched_events().is_empty());
}

#[rstest]
fn test_nameless_submitter_pair_is_sent() {
	let mut page = page(&[("swap", "innerHTML")]);
	page.transport.respond(FormResponse::ok("<p>ok</p>"));

	page.submit(Some(Submitter::new("", "Send")));

	assert_eq!(
		page.transport.requests()[0].body.as_deref(),
		Some("a=1&b=2&=Send")
	);
}

#[rstest]
fn test_get_form_sends_query_string() {
	let form = MemoryForm::new("/search?page=2", "get").with_field("q", "rust wasm");
	let mut page = page_with(form, &[("swap", "innerHTML")]);
	page.transport.respond(FormResponse::ok("<ul></ul>"));

	page.submit(None);

	let request = &page.transport.requests()[0];
	assert_eq!(request.method, Method::GET);
	assert_eq!(request.url, "/search?q=rust+wasm");
	assert_eq!(request.body, None);
}

#[rstest]
fn test_payload_is_read_at_submit_time() {
	let mut page = page(&[("swap", "innerHTML")]);
	let deferred = page.transport.defer();

	page.form.submit(go());
	page.form.set_field("a", "changed");
	page.pool.run_until_stalled();
	deferred.resolve(FormResponse::ok("<p>ok</p>"));
	page.pool.run_until_stalled();

	assert_eq!(
		page.transport.requests()[0].body.as_deref(),
		Some("a=1&b=2&go=yes")
	);
	assert_eq!(
		page.host.dispatched_events(),
		vec![AjaxFormEvent::new("a=1&b=2&go=yes")]
	);
}

// ============================================================================
// Category 3: Re-entrancy Guard and Settle Delay
// ============================================================================

#[rstest]
fn test_submit_while_submitting_is_ignored() {
	let mut page = page(&[("swap", "innerHTML")]);
	let deferred = page.transport.defer();

	let first = page.submit(go());
	assert!(page.component.is_submitting());
	assert!(page.host.has_attribute("form-submitting"));

	let second = page.submit(go());

	assert!(first.default_prevented());
	assert!(second.default_prevented());
	assert_eq!(page.transport.request_count(), 1);

	deferred.resolve(FormResponse::ok("<p>ok</p>"));
	page.pool.run_until_stalled();

	assert_eq!(page.host.dispatched_events().len(), 1);
	assert_eq!(page.component.state(), SubmissionState::Idle);
	assert!(!page.host.has_attribute("form-submitting"));
}

#[rstest]
fn test_handle_submit_reports_disposition() {
	let page = page(&[]);
	let _deferred = page.transport.defer();

	let first = page.component.handle_submit(&SubmitEvent::new(None));
	let second = page.component.handle_submit(&SubmitEvent::new(None));

	assert_eq!(first, SubmitDisposition::Started);
	assert_eq!(second, SubmitDisposition::Ignored);
}

#[rstest]
fn test_delay_holds_submitting_state() {
	let mut page = page(&[("swap", "innerHTML"), ("delay", "250")]);
	page.transport.respond(FormResponse::ok("<p>ok</p>"));

	page.submit(go());

	assert_eq!(page.host.inner_html(), "<p>ok</p>");
	assert!(page.component.is_submitting());

	page.settle(Duration::from_millis(249));
	assert!(page.component.is_submitting());
	assert!(page.host.has_attribute("form-submitting"));

	page.settle(Duration::from_millis(1));
	assert_eq!(page.component.state(), SubmissionState::Idle);
	assert!(!page.host.has_attribute("form-submitting"));
}

#[rstest]
fn test_submit_during_delay_is_ignored() {
	let mut page = page(&[("swap", "innerHTML"), ("delay", "100")]);
	page.transport.respond(FormResponse::ok(FORM_HTML));
	page.submit(go());

	let during = page.submit_current(go());

	assert!(during.default_prevented());
	assert_eq!(page.transport.request_count(), 1);
}

// ============================================================================
// Category 4: Failures
// ============================================================================

#[rstest]
fn test_server_error_skips_swap_and_event() {
	let mut page = page(&[("swap", "innerHTML"), ("delay", "100")]);
	page.transport.respond(FormResponse::new(
		StatusCode::INTERNAL_SERVER_ERROR,
		"<p>boom</p>",
	));

	page.submit(go());

	assert_eq!(page.host.inner_html(), FORM_HTML);
	assert!(page.host.dispatched_events().is_empty());
	assert!(page.component.is_submitting());

	page.settle(Duration::from_millis(100));

	assert_eq!(page.component.state(), SubmissionState::Idle);
}

#[rstest]
fn test_resubmit_after_server_error() {
	let mut page = page(&[("swap", "innerHTML")]);
	page.transport
		.respond(FormResponse::new(StatusCode::BAD_GATEWAY, ""));
	page.transport.respond(FormResponse::ok("<p>ok</p>"));

	page.submit(go());
	page.submit(go());

	assert_eq!(page.transport.request_count(), 2);
	assert_eq!(page.host.inner_html(), "<p>ok</p>");
	assert_eq!(page.host.dispatched_events().len(), 1);
}

#[rstest]
fn test_network_failure_is_swallowed() {
	let mut page = page(&[]);
	page.transport.fail("connection refused");
	let before = page.document.to_html();

	page.submit(go());

	assert_eq!(page.document.to_html(), before);
	assert!(page.host.dispatched_events().is_empty());
	assert_eq!(page.component.state(), SubmissionState::Idle);
}

// ============================================================================
// Category 5: Detach and Disconnected Hosts
// ============================================================================

#[rstest]
fn test_detach_aborts_in_flight_submission() {
	let mut page = page(&[("swap", "innerHTML")]);
	let deferred = page.transport.defer();
	page.submit(go());

	page.component.detach();
	page.pool.run_until_stalled();
	deferred.resolve(FormResponse::ok("<p>late</p>"));
	page.pool.run_until_stalled();

	assert_eq!(page.component.state(), SubmissionState::Idle);
	assert!(!page.host.has_attribute("form-submitting"));
	assert_eq!(page.host.inner_html(), FORM_HTML);
	assert!(page.host.dispatched_events().is_empty());
}

#[rstest]
fn test_detach_cancels_settle_delay() {
	let mut page = page(&[("swap", "innerHTML"), ("delay", "1000")]);
	page.transport.respond(FormResponse::ok("<p>ok</p>"));
	page.submit(go());
	assert_eq!(page.clock.pending_sleeps(), 1);

	page.component.detach();
	page.pool.run_until_stalled();

	assert_eq!(page.clock.pending_sleeps(), 0);
	assert_eq!(page.component.state(), SubmissionState::Idle);
}

#[rstest]
fn test_detached_component_stops_listening() {
	let mut page = page(&[]);
	page.component.detach();
	page.component.detach();

	let event = page.submit(go());

	assert!(!event.default_prevented());
	assert_eq!(page.form.listener_count(), 0);
	assert_eq!(page.transport.request_count(), 0);
	assert_eq!(page.component.attach(), Err(ConfigError::Detached));
}

#[rstest]
fn test_response_for_removed_host_is_dropped() {
	let mut page = page(&[]);
	let deferred = page.transport.defer();
	page.submit(go());

	page.document.remove(&page.host);
	deferred.resolve(FormResponse::ok("<p>ok</p>"));
	page.pool.run_until_stalled();

	assert_eq!(page.document.to_html(), "");
	assert_eq!(page.host.inner_html(), FORM_HTML);
	assert!(page.host.dispatched_events().is_empty());
	assert_eq!(page.component.state(), SubmissionState::Idle);
}

#[rstest]
fn test_detach_cascades_to_replacements() {
	let mut page = page(&[]);
	page.transport.respond(FormResponse::ok(format!(
		"<ajax-form>{FORM_HTML}</ajax-form>"
	)));
	page.submit(go());
	let replacement = page.component.replacements().remove(0);

	page.component.detach();

	assert!(!replacement.is_attached());
	assert_eq!(replacement.attach(), Err(ConfigError::Detached));
}

// ============================================================================
// Category 6: Swapped Markup
// ============================================================================

#[rstest]
fn test_outer_swap_releases_old_form() {
	let mut page = page(&[]);
	page.transport.respond(FormResponse::ok("<p>ok</p>"));
	page.submit(go());

	let stale = page.submit(go());

	assert!(!page.component.is_attached());
	assert_eq!(page.form.listener_count(), 0);
	assert!(!stale.default_prevented());
	assert_eq!(page.transport.request_count(), 1);
	assert_eq!(page.component.attach(), Err(ConfigError::Detached));
}

#[rstest]
fn test_outer_swap_mounts_returned_ajax_form() {
	let mut page = page(&[]);
	page.transport.respond(FormResponse::ok(format!(
		"<p>saved</p><ajax-form swap=\"innerHTML\">{RERENDERED_FORM_HTML}</ajax-form>"
	)));
	page.submit(go());

	let replacements = page.component.replacements();
	assert_eq!(replacements.len(), 1);
	let next = &replacements[0];
	assert!(next.is_attached());
	assert_eq!(next.config().swap, SwapMode::InnerReplace);
	assert_eq!(page.document.received_events().len(), 1);

	page.transport.respond(FormResponse::ok("<p>thanks</p>"));
	let next_host = page.document.hosts().remove(0);
	let event = next_host.query_form().unwrap().submit(go());
	page.pool.run_until_stalled();

	assert!(event.default_prevented());
	let requests = page.transport.requests();
	assert_eq!(requests.len(), 2);
	assert_eq!(requests[1].body.as_deref(), Some("a=5&b=&go=yes"));
	assert_eq!(next_host.inner_html(), "<p>thanks</p>");
	assert_eq!(
		next_host.dispatched_events(),
		vec![AjaxFormEvent::new("a=5&b=&go=yes")]
	);
}

#[rstest]
fn test_outer_swap_settle_delay_still_applies() {
	let mut page = page(&[("delay", "200")]);
	page.transport.respond(FormResponse::ok(format!(
		"<ajax-form>{FORM_HTML}</ajax-form>"
	)));

	page.submit(go());

	assert!(page.component.is_submitting());
	page.settle(Duration::from_millis(200));
	assert_eq!(page.component.state(), SubmissionState::Idle);
}

#[rstest]
fn test_inner_swap_rebinds_to_returned_form() {
	let mut page = page(&[("swap", "innerHTML")]);
	page.transport.respond(FormResponse::ok(RERENDERED_FORM_HTML));
	page.submit(go());

	assert!(page.component.is_attached());
	assert_eq!(page.form.listener_count(), 0);

	page.transport.respond(FormResponse::ok("<p>thanks</p>"));
	let event = page.submit_current(go());

	assert!(event.default_prevented());
	let requests = page.transport.requests();
	assert_eq!(requests.len(), 2);
	assert_eq!(requests[1].body.as_deref(), Some("a=5&b=&go=yes"));
	assert_eq!(page.host.inner_html(), "<p>thanks</p>");
}

#[rstest]
fn test_inner_swap_without_form_unattaches() {
	let mut page = page(&[("swap", "innerHTML")]);
	page.transport.respond(FormResponse::ok("<p>thanks</p>"));

	page.submit(go());

	assert!(!page.component.is_attached());
	assert_eq!(page.form.listener_count(), 0);
	assert_eq!(page.component.state(), SubmissionState::Idle);
}

#[rstest]
fn test_failed_notification_keeps_swap() {
	let mut pool = LocalPool::new();
	let transport = MockTransport::new();
	let runtime = Runtime::new(transport.clone(), ManualClock::new(), pool.spawner());
	let document = MemoryDocument::new();
	let form = MemoryForm::new("/submit", "post").with_field("a", "1");
	let host = MemoryHost::new()
		.with_attribute("swap", "innerHTML")
		.with_form(form.clone())
		.rejecting_events();
	document.append(&host);
	let component = AjaxForm::create(host.clone(), runtime).unwrap();
	component.attach().unwrap();
	transport.respond(FormResponse::ok(RERENDERED_FORM_HTML));

	form.submit(go());
	pool.run_until_stalled();

	assert_eq!(host.inner_html(), RERENDERED_FORM_HTML);
	assert!(document.received_events().is_empty());
	assert_eq!(component.state(), SubmissionState::Idle);
	assert!(!host.has_attribute("form-submitting"));
	assert!(component.is_attached());

	let again = host.query_form().unwrap().submit(go());
	pool.run_until_stalled();

	assert!(again.default_prevented());
	assert_eq!(transport.request_count(), 2);
}
