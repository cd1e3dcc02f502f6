// Client side of the assistant service: the `/ask` wire contract, error
// mapping, and the bounded retry policy for transport failures.

pub mod client;
pub mod error;
pub mod retry;

pub use client::{AskBackend, AskClient, AskRequest, AskResponse, HealthReport};
pub use error::AskError;
pub use retry::{ask_with_retry, RetryPolicy};
