//! Cloud storage destinations for compressed images.
//!
//! The service can write a result straight into a bucket. All it needs is a
//! flat configuration object naming the provider (`service`) and carrying the
//! provider's credentials. Any type implementing [`StorageConfiguration`]
//! can be passed to the client, so providers beyond the built-in ones need no
//! changes elsewhere.

pub mod aws;
pub mod gcs;

use serde_json::{Map, Value};

pub use aws::Aws;
pub use gcs::Gcs;

/// Key holding the provider discriminator in every configuration.
pub const SERVICE_KEY: &str = "service";

/// Produces the `store` configuration sent to the service.
pub trait StorageConfiguration {
    /// Returns the provider configuration.
    ///
    /// Must be deterministic: calling it twice on the same value yields
    /// identical maps. The map always contains [`SERVICE_KEY`].
    fn configuration(&self) -> Map<String, Value>;
}

/// A raw configuration, for providers without a dedicated type.
///
/// The caller is responsible for including the `service` key.
impl StorageConfiguration for Map<String, Value> {
    fn configuration(&self) -> Map<String, Value> {
        self.clone()
    }
}

impl<T: StorageConfiguration + ?Sized> StorageConfiguration for &T {
    fn configuration(&self) -> Map<String, Value> {
        (**self).configuration()
    }
}

impl<T: StorageConfiguration + ?Sized> StorageConfiguration for Box<T> {
    fn configuration(&self) -> Map<String, Value> {
        (**self).configuration()
    }
}

/// Shallow merge: `options` entries are appended after `base`.
///
/// An option named like a base key replaces that value in place, so the
/// order of the required keys never changes.
pub(crate) fn merge_options(
    mut base: Map<String, Value>,
    options: &Map<String, Value>,
) -> Map<String, Value> {
    for (key, value) in options {
        base.insert(key.clone(), value.clone());
    }
    base
}
