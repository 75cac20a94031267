mod error;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use filesystem::FilesystemObjectStore;
pub use traits::{
    MAX_LIST_LIMIT, Metadata, ObjectInfo, ObjectMetadata, ObjectPage, ObjectStore, PutOutcome,
};
