use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::news::client::NewsError;

/// A single headline, flattened from one `<item>` of a news feed.
///
/// Records are produced by [`normalize`](crate::news::normalize) and are never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsRecord {
    /// Headline text, copied verbatim from the item
    pub title: String,
    /// Article link, copied verbatim from the item
    pub link: String,
    /// Publish time in UTC; the Unix epoch when the feed date was unparseable
    pub published: DateTime<Utc>,
    /// Description with HTML markup removed
    pub description: String,
    /// Display name of the originating outlet (empty when absent)
    pub source: String,
    /// Homepage of the originating outlet (empty when absent)
    pub source_url: String,
}

impl NewsRecord {
    /// True when the feed date could not be parsed and the zero time was used.
    pub fn has_unknown_date(&self) -> bool {
        self.published == DateTime::<Utc>::default()
    }
}

/// The four headline queries a news backend answers.
///
/// [`GoogleNews`](crate::news::GoogleNews) is the only implementation shipped;
/// callers that hold a `Box<dyn NewsSource>` can swap in another backend.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Top stories for the configured locale.
    async fn top_news(&self) -> Result<Vec<NewsRecord>, NewsError>;

    /// Headlines for a topic section such as `WORLD`, `BUSINESS` or `SPORTS`.
    async fn topic_headlines(&self, topic: &str) -> Result<Vec<NewsRecord>, NewsError>;

    /// Headlines for a geographic section (a city, region or country name).
    async fn geo_headlines(&self, geo: &str) -> Result<Vec<NewsRecord>, NewsError>;

    /// Free-text search, optionally bounded to stories after `from` and/or
    /// before `to`.
    async fn search(
        &self,
        query: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<NewsRecord>, NewsError>;
}
