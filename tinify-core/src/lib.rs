pub mod error;
pub mod models;
pub mod storage;

// Re-export commonly used types
pub use error::{NetworkError, NetworkErrorKind, Result, TinifyError};
pub use models::source::{Metadata, Source};
pub use models::transform::{Convert, ImageType, Preserve, Resize, ResizeMethod, Transform};
pub use storage::{Aws, Gcs, StorageConfiguration};
