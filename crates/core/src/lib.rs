//! # simchat core
//!
//! Domain types, traits, and error definitions shared by the simchat
//! chat server and wallet dashboard. This crate has **no HTTP framework
//! dependencies**: it defines the model that every other crate implements
//! against.
//!
//! ## Design Philosophy
//!
//! Each external seam is a trait here, with implementations in their own
//! crates:
//! - [`Provider`]: the chat-completion backend (`simchat-providers`)
//! - [`Tool`]: a data-fetch operation the model may call (`simchat-tools`)
//! - [`SessionStore`]: where conversations live between requests (`simchat-sessions`)

pub mod error;
pub mod message;
pub mod provider;
pub mod session;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolChoice, ToolDefinition};
pub use session::{Session, SessionGuard, SessionId, SessionStore};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
