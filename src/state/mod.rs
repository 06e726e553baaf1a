pub mod app;
pub mod article;
pub mod store;


pub use app::AppState;
pub use article::{Article, ViewArticle};
pub use store::{ArticleStore, SharedStore};
