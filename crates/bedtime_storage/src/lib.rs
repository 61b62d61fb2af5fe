//! Run-scoped artifact storage for the Bedtime story pipeline.
//!
//! Two ports are defined here:
//!
//! - [`BlobStore`]: the durable, authoritative store shared by all runs and
//!   addressed by `{date}/{run_id}/{name}.{ext}` keys.
//! - [`EphemeralStore`]: a same-run cache that keeps a copy of every
//!   artifact a run writes, independently of the durable outcome.
//!
//! # Example
//!
//! ```rust
//! use bedtime_storage::{ArtifactKey, BlobStore, InMemoryBlobStore};
//! use chrono::NaiveDate;
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryBlobStore::new();
//! let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let key = ArtifactKey::new(date, Uuid::new_v4(), "scene_0", "image/png")?;
//!
//! let uri = store.put(&key, b"png bytes", "image/png").await?;
//! assert!(uri.starts_with("memory://2024-05-01/"));
//! assert_eq!(store.get(&key).await?, b"png bytes");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod filesystem;
mod gcs;
mod key;
mod media_type;
mod memory;
mod reference;
mod store;

pub use bedtime_error::{StorageError, StorageErrorKind};
pub use config::{StorageBackend, StorageConfig};
pub use filesystem::FileSystemBlobStore;
pub use gcs::{DEFAULT_GCS_BASE_URL, GcsBlobStore};
pub use key::ArtifactKey;
pub use media_type::{MediaType, extension_for};
pub use memory::{InMemoryBlobStore, InMemoryEphemeralStore};
pub use reference::{ArtifactReference, content_hash};
pub use store::{BlobStore, EphemeralStore};
