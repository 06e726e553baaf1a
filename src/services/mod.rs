pub mod article_service;
pub mod id_service;
pub mod upload_service;
