//! Whole-file JSON post store.
//!
//! Every mutating operation is a full read-modify-rewrite through one
//! `PostStore` value, which is the process-wide single writer. There is no
//! cross-process locking; concurrent processes can lose updates.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::types::Post;

pub struct PostStore {
    path: PathBuf,
}

impl PostStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole store. Malformed JSON is a hard error.
    pub fn load(&self) -> Result<Vec<Post>> {
        let raw = fs::read_to_string(&self.path)?;
        let posts: Vec<Post> = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), count = posts.len(), "store loaded");
        Ok(posts)
    }

    /// Rewrite the whole store, pretty-printed with 2-space indentation.
    ///
    /// Writes a sibling temp file and renames it over the store path, so a
    /// crash mid-write never truncates the store.
    pub fn save(&self, posts: &[Post]) -> Result<()> {
        let json = serde_json::to_string_pretty(posts)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), count = posts.len(), "store saved");
        Ok(())
    }
}
