//! Event system for session lifecycle.
//!
//! Events are fired from the guard's operations. If no listeners are
//! registered, they are silently ignored (zero overhead).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gatehouse::register_event_listeners;
//! use gatehouse::events::listeners::LoggingListener;
//!
//! fn main() {
//!     // register listeners at startup
//!     register_event_listeners(|registry| {
//!         registry.listen(LoggingListener::new());
//!     });
//!
//!     // session events will now be logged
//! }
//! ```
//!
//! # Custom Listeners
//!
//! Implement the [`Listener`] trait to create custom handlers:
//!
//! ```rust,ignore
//! use gatehouse::events::{Listener, SessionEvent};
//! use async_trait::async_trait;
//!
//! struct RedirectCounter;
//!
//! #[async_trait]
//! impl Listener for RedirectCounter {
//!     async fn handle(&self, event: &SessionEvent) {
//!         if let SessionEvent::GuardRejected { .. } = event {
//!             // count redirects to the login surface
//!         }
//!     }
//! }
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::SessionEvent;
pub use listener::Listener;
pub use registry::{dispatch, register_event_listeners};
