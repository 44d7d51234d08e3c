//! The chat turn: tool dispatch plus the bounded completion loop.
//!
//! A turn follows a fixed shape:
//!
//! 1. **Append** the user message to the session
//! 2. **Complete** with the full history and the tool catalog
//! 3. **If tool calls**: run each through the [`ToolDispatcher`], append the
//!    results, and **complete once more** for the final answer
//! 4. **Return** the answer and the calls that were executed
//!
//! There is no open-ended loop: at most two completions per turn.

pub mod dispatcher;
pub mod loop_runner;

pub use dispatcher::ToolDispatcher;
pub use loop_runner::{ChatAgent, TurnOutcome};
