mod client;
mod error;
pub mod sse;
pub mod types;

pub use client::Client;
pub use error::Error;
