//! Items to type, loaded from a JSON dump of the posts API
//!
//! Any failure to read the source is recovered by substituting a fixed,
//! clearly labelled offline dataset; the automation never sees the error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read posts from {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid posts JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
}

impl Post {
    /// Text typed into the editor
    pub fn document(&self) -> String {
        format!("Title: {}\n\n{}\n\n", self.title, self.body)
    }

    /// File stem the document is saved under
    pub fn base_name(&self) -> String {
        format!("post_{}", self.id)
    }
}

/// Read a JSON array of posts, keeping at most `limit`
pub async fn load_posts(path: &Path, limit: usize) -> Result<Vec<Post>, ContentError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let mut posts: Vec<Post> = serde_json::from_str(&raw).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    posts.truncate(limit);
    Ok(posts)
}

pub fn offline_posts(count: u64) -> Vec<Post> {
    (1..=count)
        .map(|i| Post {
            id: i,
            title: format!("Offline Backup Post {i}"),
            body: "This post was generated locally because the API is currently down.".to_string(),
        })
        .collect()
}

/// Load posts from `source`, or fall back to the offline dataset.
///
/// Returns the posts and whether the offline dataset was used.
pub async fn posts_or_offline(source: Option<&Path>, count: u64) -> (Vec<Post>, bool) {
    let Some(path) = source else {
        log::warn!("[Warning] No post source configured.");
        log::warn!("-> Switching to OFFLINE MODE with fallback data.");
        return (offline_posts(count), true);
    };
    match load_posts(path, count as usize).await {
        Ok(posts) if !posts.is_empty() => {
            log::info!("Fetched {} posts from {}.", posts.len(), path.display());
            (posts, false)
        }
        Ok(_) => {
            log::warn!("[Warning] {} holds no posts.", path.display());
            log::warn!("-> Switching to OFFLINE MODE with fallback data.");
            (offline_posts(count), true)
        }
        Err(e) => {
            log::warn!("[Warning] Post source unavailable ({}).", e);
            log::warn!("-> Switching to OFFLINE MODE with fallback data.");
            (offline_posts(count), true)
        }
    }
}
