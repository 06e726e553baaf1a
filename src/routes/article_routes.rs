use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, Query, State,
    },
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::errors::{ApiError, UploadError};
use crate::services::{article_service, id_service, upload_service};
use crate::state::{AppState, ViewArticle};
use crate::views;

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateForm {
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Build the article routes: create form, article view, overview, upload.
pub fn routes(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(create_form).post(create_article))
        .route("/article", get(view_article))
        .route("/overview", get(overview))
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}

//
// ─────────────────────────────────────────────────────────────
// GET /
// Create form with a fresh article id
// ─────────────────────────────────────────────────────────────
//
async fn create_form(State(state): State<AppState>) -> Html<String> {
    let id = article_service::fresh_id(&state.store);
    views::create_page(&id)
}

//
// ─────────────────────────────────────────────────────────────
// POST /
// Create the article, then redirect to its page
// ─────────────────────────────────────────────────────────────
//
async fn create_article(
    State(state): State<AppState>,
    Form(form): Form<CreateForm>,
) -> Result<Redirect, ApiError> {
    // Creating rewrites the snapshot under the store lock.
    let store = state.store.clone();
    let article = tokio::task::spawn_blocking(move || {
        article_service::create(&store, form.id.as_deref(), form.title, form.content)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "create task failed");
        ApiError::Internal
    })??;

    Ok(Redirect::to(&format!("/article?id={}", article.id)))
}

//
// ─────────────────────────────────────────────────────────────
// GET /article?id=<id>
// Render one article or 400/404
// ─────────────────────────────────────────────────────────────
//
async fn view_article(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Html<String>, ApiError> {
    let article = article_service::find(&state.store, query.id.as_deref())?;
    Ok(views::article_page(&ViewArticle::from(&article)))
}

//
// ─────────────────────────────────────────────────────────────
// GET /overview
// All articles, newest first
// ─────────────────────────────────────────────────────────────
//
async fn overview(State(state): State<AppState>) -> Html<String> {
    views::overview_page(&article_service::overview(&state.store))
}

//
// ─────────────────────────────────────────────────────────────
// POST /upload?id=<id>
// Store the multipart `file` field under uploads/<id>/ and
// answer with its URL for the editor
// ─────────────────────────────────────────────────────────────
//
async fn upload(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = match query.id.as_deref().filter(|s| !s.is_empty()) {
        Some(id) => id,
        None => {
            warn!("upload without id");
            return Err(ApiError::BadRequest("Missing ID"));
        }
    };

    if !id_service::is_valid(id) {
        warn!(id, "upload with malformed id");
        return Err(ApiError::BadRequest("Invalid ID"));
    }

    let mut multipart = multipart.map_err(|e| {
        warn!(error = %e, "upload is not a multipart form");
        ApiError::BadRequest("Invalid upload form")
    })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or(ApiError::BadRequest("Error retrieving the file"))?;
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let location =
            upload_service::save_upload(&state.config.uploads_dir, id, &filename, &bytes)
                .await
                .map_err(|e| {
                    match &e {
                        UploadError::Io(err) => {
                            error!(id, file = %filename, error = %err, "failed to store upload")
                        }
                        UploadError::InvalidFilename => {
                            warn!(id, file = %filename, "rejected upload filename")
                        }
                    }
                    ApiError::from(e)
                })?;

        return Ok(Json(json!({ "location": location })));
    }

    warn!(id, "upload without file field");
    Err(ApiError::BadRequest("Error retrieving the file"))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("upload exceeds size limit");
        ApiError::PayloadTooLarge
    } else {
        warn!(error = %err, "failed to read upload form");
        ApiError::BadRequest("Error retrieving the file")
    }
}
