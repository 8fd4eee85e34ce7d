use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use futures::future::LocalBoxFuture;

use crate::runtime::Timer;

/// A [`Timer`] driven by hand.
///
/// Time starts at zero and only moves on [`advance`](Self::advance). A sleep
/// of zero completes on its first poll.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
	state: Rc<RefCell<ClockState>>,
}

#[derive(Debug, Default)]
struct ClockState {
	now: Duration,
	next_id: u64,
	waiters: Vec<Waiter>,
}

#[derive(Debug)]
struct Waiter {
	id: u64,
	deadline: Duration,
	waker: Waker,
}

impl ManualClock {
	/// Creates a clock at time zero.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the virtual time elapsed since creation.
	pub fn now(&self) -> Duration {
		self.state.borrow().now
	}

	/// Moves time forward and wakes every sleep that became due.
	pub fn advance(&self, by: Duration) {
		let due: Vec<Waker> = {
			let mut state = self.state.borrow_mut();
			state.now += by;
			let now = state.now;
			let (due, pending): (Vec<Waiter>, Vec<Waiter>) = std::mem::take(&mut state.waiters)
				.into_iter()
				.partition(|waiter| waiter.deadline <= now);
			state.waiters = pending;
			due.into_iter().map(|waiter| waiter.waker).collect()
		};
		for waker in due {
			waker.wake();
		}
	}

	/// Returns the number of sleeps waiting for time to pass.
	pub fn pending_sleeps(&self) -> usize {
		self.state.borrow().waiters.len()
	}
}

impl Timer for ManualClock {
	fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
		let deadline = self.now() + duration;
		Box::pin(Sleep {
			clock: self.clone(),
			deadline,
			id: None,
		})
	}
}

struct Sleep {
	clock: ManualClock,
	deadline: Duration,
	id: Option<u64>,
}

impl Future for Sleep {
	type Output = ();

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
		let this = self.get_mut();
		let mut state = this.clock.state.borrow_mut();
		if state.now >= this.deadline {
			if let Some(id) = this.id.take() {
				state.waiters.retain(|waiter| waiter.id != id);
			}
			return Poll::Ready(());
		}
		match this.id {
			Some(id) => {
				if let Some(waiter) = state.waiters.iter_mut().find(|waiter| waiter.id == id) {
					waiter.waker.clone_from(cx.waker());
				} else {
					state.waiters.push(Waiter {
						id,
						deadline: this.deadline,
						waker: cx.waker().clone(),
					});
				}
			}
			None => {
				let id = state.next_id;
				state.next_id += 1;
				state.waiters.push(Waiter {
					id,
					deadline: this.deadline,
					waker: cx.waker().clone(),
				});
				this.id = Some(id);
			}
		}
		Poll::Pending
	}
}

impl Drop for Sleep {
	fn drop(&mut self) {
		let Some(id) = self.id else {
			return;
		};
		if let Ok(mut state) = self.clock.state.try_borrow_mut() {
			state.waiters.retain(|waiter| waiter.id != id);
		}
	}
}
