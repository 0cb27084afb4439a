//! Web search provider client: query execution and normalized result records.

mod client;
mod types;

pub use client::{SearchProvider, SerpClient, SerpError};
pub use types::SearchRecord;
