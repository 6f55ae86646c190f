//! Cooperative scheduling primitives.
//!
//! The loading pipeline never blocks. Work is driven entirely by completion
//! callbacks, which fetchers deliver through the `Dispatcher`. Composite
//! loads join their parts with count-down latches.

pub mod dispatcher;
pub mod join;
pub mod latch;

pub mod prelude {
    pub use super::dispatcher::Dispatcher;
    pub use super::join::Join;
    pub use super::latch::{CountLatch, Latch};
}
