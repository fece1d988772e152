//! Object storage gateway for uploaded media.
//!
//! Wraps an [`object_store::ObjectStore`] (S3 in production, in-memory in
//! tests) and turns stored keys into public URLs.

pub mod error;
pub mod store;

pub use error::MediaError;
pub use store::{object_key, MediaStore, StoredObject, Upload};
