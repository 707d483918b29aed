//! Content-addressed blob storage implementation
//!
//! This module provides the [`BlobStore`] seam used by the attachment service and the
//! filesystem-backed [`FilesService`] that implements it.
//!
//! # Content Addressing
//!
//! Files are stored using their SHA-256 hash as the identifier. This provides:
//!
//! - **Deduplication**: Identical files are stored once
//! - **Integrity**: File content can be verified against its hash
//! - **Immutability**: Files are never rewritten after creation
//! - **Deterministic paths**: Same content always produces the same path
//!
//! # Security Model
//!
//! - The root directory is canonicalised at construction time
//! - Hashes are validated before they are turned into paths, so a caller-supplied
//!   hash can never escape the storage root

use crate::constants::HASH_ALGORITHM;
use crate::{FilesError, Sha256Hash, HASH_FOLDER_NAME};
use chrono::{DateTime, Utc};
use mission_types::NonEmptyText;
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata for a stored file
///
/// Describes where a blob lives and what was detected about it. It carries no
/// patient or clinical identifiers.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FileMetadata {
    /// Hashing algorithm used (always "sha256" for current implementation)
    pub hash_algorithm: NonEmptyText,

    /// Hexadecimal digest of the file content
    pub hash: Sha256Hash,

    /// Path relative to the storage root where the file is stored
    pub relative_path: NonEmptyText,

    /// Size of the file in bytes
    pub size_bytes: u64,

    /// Detected media type (MIME type), if available
    ///
    /// This is a best-effort detection and should not be considered authoritative.
    pub media_type: Option<NonEmptyText>,

    /// Original filename supplied by the uploader
    pub original_filename: NonEmptyText,

    /// UTC timestamp when the file was stored
    pub stored_at: DateTime<Utc>,
}

/// Pluggable binary storage for attachment documents.
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Stores `bytes` and returns where they landed.
    ///
    /// Storing content that is already present is not an error; the existing blob is reused.
    fn put(&self, bytes: &[u8], file_name: &str) -> Result<FileMetadata, FilesError>;

    /// Reads back the bytes stored under `hash`.
    fn read(&self, hash: &str) -> Result<Vec<u8>, FilesError>;
}

/// Filesystem blob store rooted at a single directory
///
/// # Design
///
/// - Immutable: Files are never modified after creation
/// - Content-addressed: Files are identified by their SHA-256 hash
/// - Defensive: All hashes are validated before path construction
#[derive(Debug)]
pub struct FilesService {
    /// Canonicalised storage root
    root_directory: PathBuf,
}

impl FilesService {
    /// Creates a new `FilesService` rooted at `root_directory`
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidRootDirectory` if:
    /// - The root directory does not exist or is not a directory
    /// - Path canonicalisation fails
    pub fn new(root_directory: &Path) -> Result<Self, FilesError> {
        if !root_directory.exists() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Directory does not exist: {}",
                root_directory.display()
            )));
        }

        if !root_directory.is_dir() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                root_directory.display()
            )));
        }

        let root_directory = root_directory.canonicalize().map_err(|e| {
            FilesError::InvalidRootDirectory(format!(
                "Cannot canonicalize path {}: {}",
                root_directory.display(),
                e
            ))
        })?;

        Ok(Self { root_directory })
    }

    /// Returns the canonicalised storage root
    #[must_use]
    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    /// Computes the absolute storage path for a validated hash
    ///
    /// Example: hash `abcdef123...` produces `<root>/sha256/ab/cd/abcdef123...`
    fn compute_storage_path(&self, hash: &Sha256Hash) -> PathBuf {
        self.root_directory
            .join(Self::compute_relative_path(hash).as_str())
    }

    /// Relative path string in the format: `sha256/<shard1>/<shard2>/<hash>`
    fn compute_relative_path(hash: &Sha256Hash) -> NonEmptyText {
        let hex = hash.as_str();
        let shard1 = &hex[0..2];
        let shard2 = &hex[2..4];
        match NonEmptyText::new(format!("{HASH_FOLDER_NAME}/{shard1}/{shard2}/{hex}")) {
            Ok(path) => path,
            Err(_) => unreachable!("formatted path always contains the folder name"),
        }
    }
}

impl BlobStore for FilesService {
    /// Writes `bytes` to content-addressed storage
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `file_name` is blank
    /// - Storage directory creation fails (I/O)
    /// - File write to storage fails (I/O)
    fn put(&self, bytes: &[u8], file_name: &str) -> Result<FileMetadata, FilesError> {
        let original_filename = NonEmptyText::new(file_name)
            .map_err(|_| FilesError::InvalidFileName(file_name.to_string()))?;

        let hash = Sha256Hash::of(bytes);
        let storage_path = self.compute_storage_path(&hash);

        if !storage_path.exists() {
            if let Some(parent) = storage_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    FilesError::Io(std::io::Error::new(
                        e.kind(),
                        format!(
                            "Failed to create storage directory {}: {}",
                            parent.display(),
                            e
                        ),
                    ))
                })?;
            }

            fs::write(&storage_path, bytes).map_err(|e| {
                FilesError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to write file to {}: {}", storage_path.display(), e),
                ))
            })?;
        }

        let media_type = infer::get(bytes).and_then(|kind| NonEmptyText::new(kind.mime_type()).ok());

        Ok(FileMetadata {
            hash_algorithm: NonEmptyText::new(HASH_ALGORITHM)
                .map_err(|_| FilesError::InvalidHash(HASH_ALGORITHM.to_string()))?,
            relative_path: Self::compute_relative_path(&hash),
            hash,
            size_bytes: bytes.len() as u64,
            media_type,
            original_filename,
            stored_at: Utc::now(),
        })
    }

    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - The hash is not canonical
    /// - No file is stored under the hash
    /// - The file cannot be read (I/O)
    fn read(&self, hash: &str) -> Result<Vec<u8>, FilesError> {
        let hash = Sha256Hash::parse(hash)?;
        let storage_path = self.compute_storage_path(&hash);

        if !storage_path.exists() {
            return Err(FilesError::NotFound(hash.to_string()));
        }

        fs::read(&storage_path).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read file from {}: {}", storage_path.display(), e),
            ))
        })
    }
}
