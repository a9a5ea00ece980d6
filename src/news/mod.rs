//! Google News RSS client: URL construction, fetching and normalization.
//!
//! - **Query building**: per-mode request URLs with locale parameters
//! - **Fetching**: one HTTP GET per query with a bounded body read
//! - **Normalization**: RSS `<item>`s mapped to flat [`NewsRecord`]s
//!
//! # Architecture
//!
//! - [`query`] - Request URL construction for the four query modes
//! - [`parser`] - Declarative RSS schema (`quick-xml` + serde) and record mapping
//! - [`client`] - [`GoogleNews`], its options and error type
//! - [`types`] - [`NewsRecord`] and the [`NewsSource`] trait
//!
//! # Example
//!
//! ```no_run
//! use gnews::news::{GoogleNews, NewsOptions, NewsSource};
//!
//! # async fn run() -> Result<(), gnews::news::NewsError> {
//! let news = GoogleNews::new(NewsOptions::new("en", "GB"))?;
//! let records = news.geo_headlines("Manchester").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod parser;
pub mod query;
pub mod types;

pub use client::{GoogleNews, NewsError, NewsOptions, OptionsError};
pub use parser::{normalize, parse_document, parse_pub_date, DateParsing, RssDocument};
pub use query::{search_text, QueryBuilder, DEFAULT_ENDPOINT};
pub use types::{NewsRecord, NewsSource};
