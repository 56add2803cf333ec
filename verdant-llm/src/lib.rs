mod client;
pub mod extract;
pub mod prompt;

pub use client::{LlmConfig, LlmService};
