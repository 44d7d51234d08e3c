//! LLM provider implementations for simchat.
//!
//! All providers implement the `simchat_core::Provider` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
