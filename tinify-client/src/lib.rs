pub mod client;
pub mod error;
pub mod models;
pub mod transport;

// Re-export commonly used types
pub use client::{TinifyClient, TinifyClientBuilder, DEFAULT_BASE_URL};
pub use error::{ClientError, Result};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
