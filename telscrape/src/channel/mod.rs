//! Channel layer: output accumulation and prompt/marker detection.
//!
//! This module turns the transport's timed chunk reads into complete
//! command responses.

mod buffer;
mod collector;
pub mod patterns;

pub use buffer::ResponseBuffer;
pub use collector::{PollSchedule, ResponseCollector};
pub use patterns::PromptMatcher;
