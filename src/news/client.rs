use async_trait::async_trait;
use chrono::NaiveDate;
use futures::StreamExt;
use thiserror::Error;
use url::Url;

use crate::news::parser::{normalize, parse_document, DateParsing};
use crate::news::query::{QueryBuilder, DEFAULT_ENDPOINT};
use crate::news::types::{NewsRecord, NewsSource};

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Invalid construction-time options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("country not provided in options")]
    MissingCountry,
    #[error("language not provided in options")]
    MissingLanguage,
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    /// The base URL parsed but cannot carry path segments (e.g. `mailto:`)
    #[error("base URL cannot have path segments: {0}")]
    CannotBeABase(String),
}

/// Errors returned by [`GoogleNews`] construction and queries.
#[derive(Debug, Error)]
pub enum NewsError {
    /// Construction-time options were rejected
    #[error("Invalid options: {0}")]
    Options(#[from] OptionsError),
    /// Network-level error (DNS, connection, TLS, transport timeout)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body is not a well-formed RSS document
    #[error("Parse error: {0}")]
    Parse(#[from] quick_xml::de::DeError),
    /// Unparseable `pubDate` under [`DateParsing::Strict`]
    #[error("Invalid publish date: {value:?}")]
    Date { value: String },
}

impl NewsError {
    /// True for errors raised while validating [`NewsOptions`].
    pub fn is_config(&self) -> bool {
        matches!(self, NewsError::Options(_))
    }
}

/// Options accepted by [`GoogleNews::new`].
///
/// `language` and `country` are required; everything else has a default.
///
/// # Example
///
/// ```
/// use gnews::news::{DateParsing, NewsOptions};
///
/// let opts = NewsOptions::new("en", "US").with_date_parsing(DateParsing::Strict);
/// assert_eq!(opts.language, "en");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NewsOptions {
    /// Language code, e.g. `en`
    pub language: String,
    /// Country code, e.g. `US`
    pub country: String,
    /// HTTP client to use; a default client is created when `None`.
    /// Timeouts, proxies and user agent are configured here.
    pub client: Option<reqwest::Client>,
    /// Endpoint override; [`DEFAULT_ENDPOINT`] when `None`
    pub base_url: Option<String>,
    /// Treatment of unparseable `pubDate` values; lenient by default
    pub date_parsing: DateParsing,
}

impl NewsOptions {
    pub fn new(language: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            country: country.into(),
            ..Default::default()
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_date_parsing(mut self, date_parsing: DateParsing) -> Self {
        self.date_parsing = date_parsing;
        self
    }
}

/// Google News RSS client.
///
/// Stateless after construction: each query builds a URL, issues one GET,
/// and normalizes the returned feed. No retries, no caching, no internal
/// timeout (configure one on the `reqwest::Client`).
///
/// # Example
///
/// ```no_run
/// use gnews::news::{GoogleNews, NewsOptions, NewsSource};
///
/// # async fn run() -> Result<(), gnews::news::NewsError> {
/// let news = GoogleNews::new(NewsOptions::new("en", "US"))?;
/// for record in news.topic_headlines("TECHNOLOGY").await? {
///     println!("{} ({})", record.title, record.source);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GoogleNews {
    client: reqwest::Client,
    query: QueryBuilder,
    date_parsing: DateParsing,
}

impl GoogleNews {
    /// Validates `opts` and builds a client.
    ///
    /// # Errors
    ///
    /// - [`OptionsError::MissingCountry`] when `country` is empty
    /// - [`OptionsError::MissingLanguage`] when `language` is empty
    /// - [`OptionsError::InvalidBaseUrl`] / [`OptionsError::CannotBeABase`]
    ///   for an unusable `base_url`
    pub fn new(opts: NewsOptions) -> Result<Self, NewsError> {
        if opts.country.is_empty() {
            return Err(OptionsError::MissingCountry.into());
        }
        if opts.language.is_empty() {
            return Err(OptionsError::MissingLanguage.into());
        }

        let base = Url::parse(opts.base_url.as_deref().unwrap_or(DEFAULT_ENDPOINT))
            .map_err(OptionsError::from)?;
        if base.cannot_be_a_base() {
            return Err(OptionsError::CannotBeABase(base.to_string()).into());
        }

        Ok(Self {
            client: opts.client.unwrap_or_default(),
            query: QueryBuilder::new(base, opts.language, opts.country),
            date_parsing: opts.date_parsing,
        })
    }

    /// URL builder for this client's locale and endpoint.
    pub fn query_builder(&self) -> &QueryBuilder {
        &self.query
    }

    async fn fetch(&self, url: Url) -> Result<Vec<NewsRecord>, NewsError> {
        tracing::debug!(url = %url, "Fetching news feed");

        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(NewsError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
        let document = parse_document(&bytes)?;
        let records = normalize(&document, self.date_parsing)?;

        tracing::debug!(url = %url, count = records.len(), "Fetched news feed");
        Ok(records)
    }
}

#[async_trait]
impl NewsSource for GoogleNews {
    async fn top_news(&self) -> Result<Vec<NewsRecord>, NewsError> {
        self.fetch(self.query.top_news()).await
    }

    async fn topic_headlines(&self, topic: &str) -> Result<Vec<NewsRecord>, NewsError> {
        self.fetch(self.query.topic_headlines(topic)).await
    }

    async fn geo_headlines(&self, geo: &str) -> Result<Vec<NewsRecord>, NewsError> {
        self.fetch(self.query.geo_headlines(geo)).await
    }

    async fn search(
        &self,
        query: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<NewsRecord>, NewsError> {
        self.fetch(self.query.search(query, from, to)).await
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, NewsError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(NewsError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(NewsError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
