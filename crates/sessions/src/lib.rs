//! Session storage for the chat server.
//!
//! Sessions live only in process memory: a restart discards them all.
//! [`SessionSweeper`] evicts the ones that have gone idle.

pub mod in_memory;
pub mod sweeper;

pub use in_memory::InMemorySessionStore;
pub use sweeper::{SessionSweeper, SweeperHandle};
