use tracing::{error, info, warn};

use crate::errors::{ApiError, StoreError};
use crate::services::id_service;
use crate::state::{Article, ArticleStore};

/// A generated id not currently present in `store`.
pub fn fresh_id(store: &ArticleStore) -> String {
    loop {
        let id = id_service::generate();
        if !store.contains(&id) {
            return id;
        }
    }
}

/// Create an article from submitted form values.
///
/// `requested_id` is the id embedded in the create form. It is used only
/// when it has the generated shape; otherwise a new id is generated. An
/// id that already exists is refused with [`ApiError::Conflict`] so a
/// submission can never overwrite someone else's article.
///
/// Persist failures are logged and do not fail the request.
pub fn create(
    store: &ArticleStore,
    requested_id: Option<&str>,
    title: String,
    content: String,
) -> Result<Article, ApiError> {
    let requested = requested_id.map(str::trim).filter(|s| !s.is_empty());

    let (mut id, client_supplied) = match requested {
        Some(id) if id_service::is_valid(id) => (id.to_string(), true),
        Some(id) => {
            warn!(id, "ignoring malformed article id");
            (fresh_id(store), false)
        }
        None => (fresh_id(store), false),
    };

    loop {
        let article = Article::new(id, title.clone(), content.clone());

        match store.create(article.clone()) {
            Ok(()) => {
                info!(id = %article.id, title = %article.title, "article created");
                return Ok(article);
            }
            Err(StoreError::AlreadyExists(existing)) if client_supplied => {
                warn!(id = %existing, "refusing to overwrite existing article");
                return Err(ApiError::Conflict);
            }
            Err(StoreError::AlreadyExists(_)) => {
                id = fresh_id(store);
            }
            Err(e) => {
                error!(id = %article.id, error = %e, "article kept in memory but not persisted");
                return Ok(article);
            }
        }
    }
}

/// Look up an article by the `id` query parameter.
pub fn find(store: &ArticleStore, id: Option<&str>) -> Result<Article, ApiError> {
    let id = match id.filter(|s| !s.is_empty()) {
        Some(id) => id,
        None => {
            warn!("article lookup without id");
            return Err(ApiError::BadRequest("Missing ID"));
        }
    };

    store.get(id).ok_or_else(|| {
        warn!(id, "article not found");
        ApiError::NotFound
    })
}

/// All articles for the overview page, newest first.
pub fn overview(store: &ArticleStore) -> Vec<Article> {
    store.list()
}
