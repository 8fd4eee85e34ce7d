use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::transport::{FormRequest, FormResponse, Transport, TransportError};

type Outcome = Result<FormResponse, TransportError>;

/// Scripted [`Transport`].
///
/// Responses are handed out in the order they were queued. Every request is
/// logged, including those that found the queue empty.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
	state: Rc<RefCell<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
	requests: Vec<FormRequest>,
	queue: VecDeque<Queued>,
}

#[derive(Debug)]
enum Queued {
	Ready(Outcome),
	Deferred(oneshot::Receiver<Outcome>),
}

/// Completes a response queued with [`MockTransport::defer`].
///
/// Dropping it unresolved fails the request.
#[derive(Debug)]
pub struct DeferredResponse {
	sender: oneshot::Sender<Outcome>,
}

impl DeferredResponse {
	/// Delivers `response` to the waiting request.
	pub fn resolve(self, response: FormResponse) {
		let _ = self.sender.send(Ok(response));
	}

	/// Fails the waiting request with a network error.
	pub fn fail(self, message: &str) {
		let _ = self.sender.send(Err(TransportError::new(message)));
	}
}

impl MockTransport {
	/// Creates a transport with an empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a response.
	pub fn respond(&self, response: FormResponse) {
		self.push(Queued::Ready(Ok(response)));
	}

	/// Queues a network failure.
	pub fn fail(&self, message: &str) {
		self.push(Queued::Ready(Err(TransportError::new(message))));
	}

	/// Queues a response that stays pending until resolved.
	pub fn defer(&self) -> DeferredResponse {
		let (sender, receiver) = oneshot::channel();
		self.push(Queued::Deferred(receiver));
		DeferredResponse { sender }
	}

	/// Returns every request sent so far.
	pub fn requests(&self) -> Vec<FormRequest> {
		self.state.borrow().requests.clone()
	}

	/// Returns the number of requests sent so far.
	pub fn request_count(&self) -> usize {
		self.state.borrow().requests.len()
	}

	fn push(&self, queued: Queued) {
		self.state.borrow_mut().queue.push_back(queued);
	}
}

#[async_trait(?Send)]
impl Transport for MockTransport {
	async fn send(&self, request: FormRequest) -> Result<FormResponse, TransportError> {
		let next = {
			let mut state = self.state.borrow_mut();
			state.requests.push(request);
			state.queue.pop_front()
		};
		match next {
			Some(Queued::Ready(outcome)) => outcome,
			Some(Queued::Deferred(receiver)) => receiver
				.await
				.unwrap_or_else(|_| Err(TransportError::new("deferred response dropped"))),
			None => Err(TransportError::new("no response queued")),
		}
	}
}
