//! Storage for uploaded images
//!
//! Issue images and profile pictures go through the [`ImageStore`] trait; the
//! production implementation is MinIO/S3.

mod minio_store;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::AppError;

pub use minio_store::MinIOImageStore;

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `data` under `key` and return the URL clients should use
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String, AppError>;

    /// Remove an object previously returned by [`ImageStore::put`]
    async fn delete_by_url(&self, url: &str) -> Result<(), AppError>;
}

/// Build an object key: `{folder}/{owner}/{random}.{extension}`
pub fn object_key(folder: &str, owner: Uuid, extension: &str) -> String {
    format!("{}/{}/{}.{}", folder, owner, Uuid::now_v7(), extension)
}

/// File extension for an accepted image content type
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[cfg(test)]
pub use memory::MemoryImageStore;

#[cfg(test)]
mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::ImageStore;
    use crate::core::error::AppError;

    const BASE_URL: &str = "http://images.test";

    /// In-memory store for service tests
    #[derive(Default)]
    pub struct MemoryImageStore {
        objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    }

    impl MemoryImageStore {
        pub fn len(&self) -> usize {
            self.objects.lock().unwrap().len()
        }

        pub fn contains_url(&self, url: &str) -> bool {
            url.strip_prefix(&format!("{}/", BASE_URL))
                .is_some_and(|key| self.objects.lock().unwrap().contains_key(key))
        }
    }

    #[async_trait]
    impl ImageStore for MemoryImageStore {
        async fn put(
            &self,
            key: &str,
            data: Vec<u8>,
            content_type: &str,
        ) -> Result<String, AppError> {
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), (data, content_type.to_string()));
            Ok(format!("{}/{}", BASE_URL, key))
        }

        async fn delete_by_url(&self, url: &str) -> Result<(), AppError> {
            let key = url
                .strip_prefix(&format!("{}/", BASE_URL))
                .ok_or_else(|| AppError::Storage(format!("Unknown URL {}", url)))?;
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_layout() {
        let owner = Uuid::new_v4();
        let key = object_key("issue_images", owner, "jpg");

        let parts: Vec<&str> = key.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "issue_images");
        assert_eq!(parts[1], owner.to_string());
        assert!(parts[2].ends_with(".jpg"));
    }

    #[test]
    fn test_object_keys_are_unique() {
        let owner = Uuid::new_v4();
        assert_ne!(
            object_key("issue_images", owner, "png"),
            object_key("issue_images", owner, "png")
        );
    }

    #[test]
    fn test_extension_for_content_type() {
        assert_eq!(extension_for_content_type("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for_content_type("image/webp"), Some("webp"));
        assert_eq!(extension_for_content_type("application/pdf"), None);
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryImageStore::default();
        let url = store.put("a/b.png", vec![1, 2, 3], "image/png").await.unwrap();

        assert!(store.contains_url(&url));
        store.delete_by_url(&url).await.unwrap();
        assert_eq!(store.len(), 0);
    }
}
