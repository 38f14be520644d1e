//! Services that wire configuration to storage backends.

mod backends;

pub use backends::BackendSet;
