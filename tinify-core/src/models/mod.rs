pub mod source;
pub mod transform;
