//! Event system bridging the backend process and the UI.
//!
//! - `EventBus`: named-channel publish/subscribe shared by both sides of the
//!   process boundary
//! - `event_types`: channel names and typed payload decoding
//! - `Debouncer`: coalesces bursts of change notifications into one action

mod debounce;
mod event_bus;
pub mod event_types;

pub use debounce::{DebounceHandle, Debouncer, DEFAULT_QUIET_PERIOD};
pub use event_bus::{BusSubscription, EventBus};
