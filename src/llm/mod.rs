//! Chat-completion client used to extract a requested field from aggregated
//! search snippets.

mod client;
mod types;

pub use client::{CompletionProvider, LlmClient, LlmError};
