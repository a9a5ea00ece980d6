//! Request URL construction for each query mode.
//!
//! Every URL carries the locale parameters `hl`, `gl` and `ceid`. The mode
//! decides the path suffix under the `/rss` endpoint and, for search, the
//! leading `q` parameter.

use chrono::NaiveDate;
use url::{form_urlencoded, Url};

/// Default Google News RSS endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://news.google.com/rss";

/// Date format used by the `after:` / `before:` search operators.
const SEARCH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Builds request URLs for one locale.
///
/// The base URL must be able to carry path segments (checked by
/// [`GoogleNews::new`](crate::news::GoogleNews::new)).
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base: Url,
    language: String,
    country: String,
}

impl QueryBuilder {
    pub fn new(base: Url, language: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            base,
            language: language.into(),
            country: country.into(),
        }
    }

    /// `<base>?hl=..&gl=..&ceid=..`
    pub fn top_news(&self) -> Url {
        let mut url = self.base.clone();
        url.set_query(Some(&self.locale_query()));
        url
    }

    /// `<base>/headlines/section/topic/<topic>?hl=..&gl=..&ceid=..`
    pub fn topic_headlines(&self, topic: &str) -> Url {
        self.section("topic", topic)
    }

    /// `<base>/headlines/section/geo/<geo>?hl=..&gl=..&ceid=..`
    pub fn geo_headlines(&self, geo: &str) -> Url {
        self.section("geo", geo)
    }

    /// `<base>/search?q=<text>&hl=..&gl=..&ceid=..`
    ///
    /// `q` comes first; see [`search_text`] for how the value is formed.
    pub fn search(&self, query: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Url {
        let mut url = self.with_segments(&["search"]);
        let q = search_text(query, from, to);
        url.set_query(Some(&format!("q={}&{}", q, self.locale_query())));
        url
    }

    fn section(&self, kind: &str, value: &str) -> Url {
        let mut url = self.with_segments(&["headlines", "section", kind, value]);
        url.set_query(Some(&self.locale_query()));
        url
    }

    /// Appends percent-encoded path segments to the base path. Empty segments
    /// are skipped.
    fn with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot-be-a-base URLs are rejected at construction
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(segments.iter().copied().filter(|s| !s.is_empty()));
        }
        url
    }

    fn locale_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("hl", &format!("{}-{}", self.language, self.country))
            .append_pair("gl", &self.country)
            .append_pair("ceid", &format!("{}:{}", self.country, self.language))
            .finish()
    }
}

/// Builds the raw `q` value for a search request.
///
/// The free text is form-encoded (spaces become `+`, reserved characters are
/// percent-escaped), then `+after:YYYY-MM-DD` and `+before:YYYY-MM-DD` are
/// appended for whichever bounds are present, after-bound first. The server
/// decodes the `+` separators to spaces, so it sees e.g.
/// `tech after:2024-01-01 before:2024-06-01`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gnews::news::search_text;
///
/// let from = NaiveDate::from_ymd_opt(2024, 1, 1);
/// let to = NaiveDate::from_ymd_opt(2024, 6, 1);
/// assert_eq!(
///     search_text("tech", from, to),
///     "tech+after:2024-01-01+before:2024-06-01"
/// );
/// ```
pub fn search_text(query: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> String {
    let mut text: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    if let Some(from) = from {
        text.push_str("+after:");
        text.push_str(&from.format(SEARCH_DATE_FORMAT).to_string());
    }
    if let Some(to) = to {
        text.push_str("+before:");
        text.push_str(&to.format(SEARCH_DATE_FORMAT).to_string());
    }
    text
}
