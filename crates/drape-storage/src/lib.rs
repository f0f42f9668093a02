//! Drape Storage Library
//!
//! Issues time-limited write credentials for garment files. Bytes never pass
//! through this crate: the client uploads directly against the returned URL.
//!
//! # Storage key format
//!
//! Every original upload lands at `asset/{garment_id}/original/{file_name}`.
//! The key is deterministic, so re-uploading a category overwrites the same
//! object while each upload still gets its own file record. Key generation is
//! centralized in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use drape_core::StorageBackend;
pub use factory::create_credential_issuer;
pub use keys::garment_original_key;
#[cfg(feature = "storage-local")]
pub use local::LocalCredentialIssuer;
#[cfg(feature = "storage-s3")]
pub use s3::S3CredentialIssuer;
pub use traits::{CredentialIssuer, StorageError, StorageResult, WriteCredential};
