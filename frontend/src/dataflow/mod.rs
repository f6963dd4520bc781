//! Actor+Relay primitives.
//!
//! - [`Relay`] carries UI events into an Actor.
//! - [`Actor`] owns one piece of state and the loop that mutates it.
//!
//! State is read only through signals, and it is mutated only inside the
//! owning Actor's loop.

pub mod actor;
pub mod relay;

pub use actor::Actor;
pub use relay::{Relay, relay};
