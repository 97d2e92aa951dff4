//! Post Repository Port
//!
//! Abstract interface over WordPress posts, their meta and the CRM flags.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{errors::DomainError, FlagsUpdate, NewPost, PostRecord};

/// Repository interface for WordPress posts
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts of a type in the given statuses, with meta and flags
    async fn find_by_type(
        &self,
        post_type: &str,
        statuses: &[&str],
    ) -> Result<Vec<PostRecord>, DomainError>;

    /// One post of a type, with meta and flags
    async fn find_by_id(&self, post_type: &str, id: u64)
        -> Result<Option<PostRecord>, DomainError>;

    /// `_wp_attached_file` of attachment posts
    async fn attached_files(&self, ids: &[u64]) -> Result<HashMap<u64, String>, DomainError>;

    /// Insert a post with its meta, returning the new post ID
    async fn create(&self, post: &NewPost) -> Result<u64, DomainError>;

    /// Insert or replace one meta value
    async fn upsert_meta(&self, post_id: u64, key: &str, value: &str) -> Result<(), DomainError>;

    /// Add `delta` to a numeric meta value, never going below zero.
    /// Returns false when the meta row does not exist.
    async fn adjust_meta_amount(
        &self,
        post_id: u64,
        key: &str,
        delta: f64,
    ) -> Result<bool, DomainError>;

    /// Upsert review flags; unset fields keep their stored value
    async fn update_flags(&self, post_id: u64, update: &FlagsUpdate) -> Result<(), DomainError>;

    /// Delete a post of a type together with its meta and flags
    async fn delete(&self, post_type: &str, id: u64) -> Result<bool, DomainError>;

    /// Number of WordPress site accounts
    async fn count_site_users(&self) -> Result<u64, DomainError>;
}
