//! Fate GM Helper — in-process notification fan-out.
//!
//! [`NotificationHub`] maintains per-campaign sets of live subscribers and
//! pushes events to them best-effort. Hub state is process-local and never
//! persisted: after a restart every subscriber must reconnect.

mod hub;

pub use hub::{HubEvent, NotificationHub, Subscription};
