use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A published article as stored in the snapshot.
///
/// `content` is raw markup and is rendered without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Missing in the oldest snapshots; those load as [`legacy_created_at`].
    #[serde(default = "legacy_created_at")]
    pub created_at: DateTime<Utc>,
}

/// Creation time given to articles saved without one: 0001-01-01T00:00:00Z.
/// Such articles sort after everything else.
pub fn legacy_created_at() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl Article {
    pub fn new(id: String, title: String, content: String) -> Self {
        Self {
            id,
            title,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Render projection of an [`Article`].
#[derive(Debug, Clone)]
pub struct ViewArticle<'a> {
    pub id: &'a str,
    pub title: &'a str,
    /// Trusted markup, inserted verbatim.
    pub content: &'a str,
    pub created_at: String,
}

impl<'a> From<&'a Article> for ViewArticle<'a> {
    fn from(article: &'a Article) -> Self {
        Self {
            id: &article.id,
            title: &article.title,
            content: &article.content,
            created_at: format_date(&article.created_at),
        }
    }
}

/// Formats as e.g. "January 2, 2006 at 15:04".
pub fn format_date(t: &DateTime<Utc>) -> String {
    t.format("%B %-d, %Y at %H:%M").to_string()
}
