/// Folder under the storage root that holds SHA-256 addressed files.
pub const HASH_FOLDER_NAME: &str = "sha256";

/// Hash algorithm recorded in [`crate::FileMetadata`].
pub(crate) const HASH_ALGORITHM: &str = "sha256";
