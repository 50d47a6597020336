pub mod client;
pub mod extractor;
pub mod prompts;
pub mod types;

pub use client::*;
pub use extractor::*;
pub use types::*;
