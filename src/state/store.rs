use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::errors::StoreError;
use crate::persistence::{read_snapshot, write_snapshot};
use crate::state::article::Article;

/// Articles keyed by id.
pub type ArticleMap = HashMap<String, Article>;

/// Shared store type used across the app.
pub type SharedStore = Arc<ArticleStore>;

/// In-memory article collection mirrored to a JSON snapshot.
///
/// A single mutex guards the map. Every mutation rewrites the whole
/// snapshot before the lock is released, so readers block behind an
/// in-flight write and never see a half-applied one.
#[derive(Debug)]
pub struct ArticleStore {
    path: PathBuf,
    articles: Mutex<ArticleMap>,
}

impl ArticleStore {
    /// Create an empty store backed by the snapshot at `path`.
    ///
    /// Nothing is read until [`load`](Self::load) is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            articles: Mutex::new(HashMap::new()),
        }
    }

    pub fn shared(path: impl Into<PathBuf>) -> SharedStore {
        Arc::new(Self::new(path))
    }

    fn lock(&self) -> MutexGuard<'_, ArticleMap> {
        // A panic while holding the lock cannot leave a half-written
        // entry behind, so the map is still usable.
        self.articles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace the article at `article.id`, then persist.
    ///
    /// The in-memory value is kept even when persisting fails. Request
    /// handlers go through [`create`](Self::create) instead.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn put(&self, article: Article) -> Result<(), StoreError> {
        let mut map = self.lock();
        map.insert(article.id.clone(), article);
        self.persist_locked(&map)
    }

    /// Insert a new article, refusing to replace an existing id.
    pub fn create(&self, article: Article) -> Result<(), StoreError> {
        let mut map = self.lock();
        if map.contains_key(&article.id) {
            return Err(StoreError::AlreadyExists(article.id));
        }
        map.insert(article.id.clone(), article);
        self.persist_locked(&map)
    }

    pub fn get(&self, id: &str) -> Option<Article> {
        self.lock().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    /// All articles, most recent first.
    pub fn list(&self) -> Vec<Article> {
        let mut articles: Vec<Article> = self.lock().values().cloned().collect();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        articles
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Replace the in-memory map with the snapshot on disk.
    ///
    /// A missing file is the "no prior data" case and yields `Ok(0)`.
    /// On any error the map is left empty.
    pub fn load(&self) -> Result<usize, StoreError> {
        let mut map = self.lock();
        map.clear();

        match read_snapshot(&self.path)? {
            Some(loaded) => {
                *map = loaded;
                tracing::info!(path = %self.path.display(), count = map.len(), "articles loaded");
                Ok(map.len())
            }
            None => {
                tracing::warn!(path = %self.path.display(), "no saved articles found");
                Ok(0)
            }
        }
    }

    /// Write the full map to the snapshot file.
    pub fn persist(&self) -> Result<(), StoreError> {
        let map = self.lock();
        self.persist_locked(&map)
    }

    fn persist_locked(&self, map: &ArticleMap) -> Result<(), StoreError> {
        write_snapshot(&self.path, map)?;
        tracing::info!(path = %self.path.display(), count = map.len(), "articles saved");
        Ok(())
    }
}
