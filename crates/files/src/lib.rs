//! Mission Blob Storage
//!
//! Binary storage for attachment documents. Attachment *metadata* lives in the
//! relational store; the bytes live here, addressed by their SHA-256 digest.
//!
//! ## Design Principles
//!
//! - Semantic meaning and binary bytes are deliberately separated
//! - Binary files are immutable once added (new content creates a new file)
//! - Identical content is stored exactly once
//! - The store is pluggable: callers depend on [`BlobStore`], not on the filesystem
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//! └── sha256/
//!     └── ab/
//!         └── cd/
//!             └── abcd3f9e…
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use mission_files::{BlobStore, FilesService};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = FilesService::new(Path::new("attachments"))?;
//! let metadata = service.put(b"%PDF-1.4", "consent.pdf")?;
//! let bytes = service.read(metadata.hash.as_str())?;
//! # Ok(())
//! # }
//! ```

mod constants;
mod files;
mod hash;

pub use constants::HASH_FOLDER_NAME;
pub use files::{BlobStore, FileMetadata, FilesService};
pub use hash::Sha256Hash;

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Root directory does not exist or is not a directory
    #[error("Invalid root directory: {0}")]
    InvalidRootDirectory(String),

    /// A hash string was not 64 lowercase hexadecimal characters
    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    /// Supplied original filename was blank
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    /// No stored file matches the requested hash
    #[error("File not found for hash: {0}")]
    NotFound(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
