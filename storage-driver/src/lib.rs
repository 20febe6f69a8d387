//! # Storage drivers
//!
//! The interface between artifact repositories and the backends which hold
//! their files. A [`Driver`] addresses files by bucket and bucket-relative path,
//! and can enumerate the immediate children of a directory.

mod driver;
mod error;

pub use driver::DirEntry;
pub use driver::Driver;
pub use driver::EntryKind;
pub use driver::Metadata;
pub use driver::Reader;
pub use driver::Writer;
pub use error::StorageError;
pub use error::StorageErrorBuilder;
pub use error::StorageErrorKind;
