//! Runtime services shared by components
//!
//! A [`Runtime`] bundles the three effects a component performs outside the
//! DOM: sending requests, waiting out the settle delay, and spawning the
//! submission pipeline on the local event loop.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::task::LocalSpawn;

use crate::transport::Transport;

/// One-shot timer used for the settle delay.
pub trait Timer {
	/// Returns a future that completes after `duration`.
	fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// [`Timer`] backed by `tokio::time`.
///
/// Requires a running tokio runtime when the sleep is polled.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[cfg(not(target_arch = "wasm32"))]
impl Timer for TokioTimer {
	fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
		Box::pin(tokio::time::sleep(duration))
	}
}

/// [`Timer`] backed by `setTimeout`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

#[cfg(target_arch = "wasm32")]
impl Timer for BrowserTimer {
	fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
		Box::pin(gloo_timers::future::sleep(duration))
	}
}

/// Spawns futures on the browser's microtask queue.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSpawner;

#[cfg(target_arch = "wasm32")]
impl LocalSpawn for BrowserSpawner {
	fn spawn_local_obj(
		&self,
		future: futures::task::LocalFutureObj<'static, ()>,
	) -> Result<(), futures::task::SpawnError> {
		wasm_bindgen_futures::spawn_local(future);
		Ok(())
	}
}

/// Services used by components.
#[derive(Clone)]
pub struct Runtime {
	pub(crate) transport: Rc<dyn Transport>,
	pub(crate) timer: Rc<dyn Timer>,
	pub(crate) spawner: Rc<dyn LocalSpawn>,
}

impl Runtime {
	/// Creates a runtime from its parts.
	pub fn new(
		transport: impl Transport + 'static,
		timer: impl Timer + 'static,
		spawner: impl LocalSpawn + 'static,
	) -> Self {
		Self {
			transport: Rc::new(transport),
			timer: Rc::new(timer),
			spawner: Rc::new(spawner),
		}
	}

	/// Runtime for native hosts: the given reqwest transport, `tokio::time`
	/// sleeps, and the caller's local spawner.
	///
	/// Settle delays must be polled inside a tokio runtime. Relative form
	/// actions need a transport with a base URL.
	#[cfg(not(target_arch = "wasm32"))]
	pub fn native(
		transport: crate::transport::ReqwestTransport,
		spawner: impl LocalSpawn + 'static,
	) -> Self {
		Self::new(transport, TokioTimer, spawner)
	}

	/// Runtime for browser use: `fetch` through reqwest, `setTimeout`, and
	/// `wasm_bindgen_futures::spawn_local`.
	#[cfg(target_arch = "wasm32")]
	pub fn browser() -> Self {
		Self::new(
			crate::transport::ReqwestTransport::new(),
			BrowserTimer,
			BrowserSpawner,
		)
	}
}

impl fmt::Debug for Runtime {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Runtime")
			.field("transport", &"<transport>")
			.field("timer", &"<timer>")
			.field("spawner", &"<spawner>")
			.finish()
	}
}
