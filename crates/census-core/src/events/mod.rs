//! Scan events: handler trait, payload types and a synchronous dispatcher.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::{CensusEventHandler, NoOpHandler};
pub use types::*;
