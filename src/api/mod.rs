pub mod client;
pub mod error;
pub mod traits;

pub use client::ApiClient;
pub use error::ApiError;
pub use traits::{ContactSink, PropertySource};
