//! JSONPlaceholder REST API Client
//!
//! Single-attempt passthrough reads; each response item is projected down to
//! a stable field subset before it leaves this module.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const JSONPLACEHOLDER_API_BASE: &str = "https://jsonplaceholder.typicode.com";

/// Default timeout for upstream calls, in seconds
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Upstream photo, projected to {id, title, url, thumbnail_url}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    pub title: String,
    pub url: String,
    #[serde(rename(deserialize = "thumbnailUrl"))]
    pub thumbnail_url: String,
}

/// Upstream post, projected to {id, title, body}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Clone)]
pub struct JsonPlaceholderClient {
    client: Client,
    base_url: String,
}

impl JsonPlaceholderClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Self {
            client,
            base_url: JSONPLACEHOLDER_API_BASE.to_string(),
        })
    }

    /// Point the client at a different base URL (tests, staging mirrors)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[inline]
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_photos(&self) -> Result<Vec<Photo>> {
        self.get_list("/photos").await
    }

    pub async fn get_posts(&self) -> Result<Vec<Post>> {
        self.get_list("/posts").await
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;

        if !resp.status().is_success() {
            bail!("GET {} returned {}", path, resp.status());
        }

        resp.json::<Vec<T>>()
            .await
            .with_context(|| format!("Failed to parse {} response", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_projection_drops_album_id() {
        let upstream = serde_json::json!({
            "albumId": 1,
            "id": 42,
            "title": "accusamus beatae",
            "url": "https://via.placeholder.com/600/92c952",
            "thumbnailUrl": "https://via.placeholder.com/150/92c952"
        });

        let photo: Photo = serde_json::from_value(upstream).unwrap();
        assert_eq!(photo.id, 42);
        assert_eq!(photo.thumbnail_url, "https://via.placeholder.com/150/92c952");

        let out = serde_json::to_value(&photo).unwrap();
        let keys: Vec<&str> = out.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert!(keys.contains(&"thumbnail_url"));
        assert!(!keys.contains(&"albumId"));
        assert!(!keys.contains(&"album_id"));
    }

    #[test]
    fn test_post_projection_drops_user_id() {
        let upstream = serde_json::json!({
            "userId": 7,
            "id": 3,
            "title": "ea molestias",
            "body": "et iusto sed quo iure"
        });

        let post: Post = serde_json::from_value(upstream).unwrap();
        assert_eq!(post.id, 3);

        let out = serde_json::to_value(&post).unwrap();
        assert!(out.get("userId").is_none());
        assert!(out.get("user_id").is_none());
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let client = JsonPlaceholderClient::new(Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://127.0.0.1:9999");
        assert_eq!(client.url("/photos"), "http://127.0.0.1:9999/photos");
    }
}
