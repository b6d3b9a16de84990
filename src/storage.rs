// Object storage collaborator seam. Uploads land in a named bucket under a
// `{user_id}/{timestamp}.{ext}` key and come back as a public URL; the
// hosting side (CDN, ACLs) is outside this application.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::core::{current_time_millis, UserId};
use crate::error::{AppError, AppResult};

pub const BUCKET_SOCIAL_IMAGES: &str = "social-images";
pub const BUCKET_SOCIAL_VIDEOS: &str = "social-videos";
pub const BUCKET_STORIES: &str = "stories";
pub const BUCKET_PROJECT_IMAGES: &str = "project-images";
pub const BUCKET_MEDIA_COLLECTIONS: &str = "media-collections";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm"];

pub fn is_known_bucket(bucket: &str) -> bool {
    matches!(
        bucket,
        BUCKET_SOCIAL_IMAGES
            | BUCKET_SOCIAL_VIDEOS
            | BUCKET_STORIES
            | BUCKET_PROJECT_IMAGES
            | BUCKET_MEDIA_COLLECTIONS
    )
}

/// Whether `ext` is an accepted upload extension for `bucket`.
pub fn allowed_extension(bucket: &str, ext: &str) -> bool {
    let ext = ext.to_lowercase();
    match bucket {
        BUCKET_SOCIAL_IMAGES | BUCKET_PROJECT_IMAGES => IMAGE_EXTENSIONS.contains(&ext.as_str()),
        BUCKET_SOCIAL_VIDEOS => VIDEO_EXTENSIONS.contains(&ext.as_str()),
        BUCKET_STORIES | BUCKET_MEDIA_COLLECTIONS => {
            IMAGE_EXTENSIONS.contains(&ext.as_str()) || VIDEO_EXTENSIONS.contains(&ext.as_str())
        }
        _ => false,
    }
}

pub fn object_key(user_id: UserId, ext: &str) -> String {
    format!("{}/{}.{}", user_id, current_time_millis(), ext.to_lowercase())
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores the object and returns its public URL.
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> AppResult<String>;
}

/// Filesystem-backed storage; objects are served from `public_base_url`
/// (the server mounts the root directory there).
pub struct FsObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl FsObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        FsObjectStorage {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait]
impl ObjectStorage for FsObjectStorage {
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> AppResult<String> {
        if !is_known_bucket(bucket) {
            return Err(AppError::Validation(format!("Unknown bucket: {}", bucket)));
        }

        let path = self.root.join(bucket).join(key);
        let parent = path
            .parent()
            .ok_or_else(|| AppError::StorageError(format!("bad object key: {}", key)))?;
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::StorageError(e.to_string()))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::StorageError(e.to_string()))?;

        Ok(format!("{}/{}/{}", self.public_base_url, bucket, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_rules_per_bucket() {
        assert!(allowed_extension(BUCKET_SOCIAL_IMAGES, "png"));
        assert!(allowed_extension(BUCKET_SOCIAL_IMAGES, "JPG"));
        assert!(!allowed_extension(BUCKET_SOCIAL_IMAGES, "mp4"));
        assert!(allowed_extension(BUCKET_SOCIAL_VIDEOS, "mp4"));
        assert!(!allowed_extension(BUCKET_SOCIAL_VIDEOS, "png"));
        assert!(allowed_extension(BUCKET_STORIES, "webm"));
        assert!(!allowed_extension("unknown", "png"));
    }

    #[tokio::test]
    async fn put_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsObjectStorage::new(dir.path(), "http://localhost:3000/storage");

        let key = object_key(7, "png");
        let url = storage
            .put(BUCKET_SOCIAL_IMAGES, &key, b"png-bytes")
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:3000/storage/social-images/7/"));
        assert!(url.ends_with(".png"));

        let on_disk = dir.path().join(BUCKET_SOCIAL_IMAGES).join(&key);
        assert_eq!(std::fs::read(on_disk).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn put_rejects_unknown_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsObjectStorage::new(dir.path(), "http://localhost:3000/storage");

        let err = storage.put("attic", "1/2.png", b"x").await.unwrap_err();
        assert!(matches!(err, crate::error::AppError::Validation(_)));
    }
}
