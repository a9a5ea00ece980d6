use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::de::DeError;
use serde::Deserialize;

use crate::news::client::NewsError;
use crate::news::types::NewsRecord;
use crate::util::strip_tags;

/// How publish dates that fail to parse are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateParsing {
    /// Unparseable dates become the zero time (Unix epoch); no error.
    #[default]
    Lenient,
    /// Unparseable dates fail the whole request with [`NewsError::Date`].
    Strict,
}

/// `<rss>` root of a news feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RssDocument {
    #[serde(rename = "@version", default)]
    pub version: String,
    pub channel: Channel,
}

/// `<channel>` metadata plus its items, in document order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub generator: String,
    pub title: String,
    pub link: String,
    pub language: String,
    #[serde(rename = "webMaster")]
    pub web_master: String,
    pub copyright: String,
    #[serde(rename = "lastBuildDate")]
    pub last_build_date: String,
    pub description: String,
    #[serde(rename = "item")]
    pub items: Vec<Item>,
}

/// One `<item>` of a channel.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Item {
    pub title: String,
    pub link: String,
    pub guid: Guid,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    pub description: String,
    pub source: Source,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Guid {
    #[serde(rename = "$text")]
    pub value: String,
    #[serde(rename = "@isPermaLink")]
    pub is_perma_link: String,
}

/// `<source url="...">Outlet name</source>`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Source {
    #[serde(rename = "$text")]
    pub name: String,
    #[serde(rename = "@url")]
    pub url: String,
}

/// Deserializes a raw response body into a feed document.
///
/// Elements outside the schema are ignored. Fails when the body is not
/// well-formed XML or has no `<channel>`.
pub fn parse_document(bytes: &[u8]) -> Result<RssDocument, DeError> {
    quick_xml::de::from_reader(bytes)
}

/// Maps every item of the document to a [`NewsRecord`], preserving order.
///
/// # Errors
///
/// Only under [`DateParsing::Strict`]: returns [`NewsError::Date`] for the
/// first item whose `pubDate` does not parse. Nothing is returned for the
/// other items in that case.
pub fn normalize(doc: &RssDocument, dates: DateParsing) -> Result<Vec<NewsRecord>, NewsError> {
    doc.channel
        .items
        .iter()
        .map(|item| {
            let published = match (parse_pub_date(&item.pub_date), dates) {
                (Some(dt), _) => dt,
                (None, DateParsing::Strict) => {
                    return Err(NewsError::Date {
                        value: item.pub_date.clone(),
                    })
                }
                (None, DateParsing::Lenient) => {
                    tracing::debug!(
                        pub_date = %item.pub_date,
                        title = %item.title,
                        "Unparseable publish date, using zero time"
                    );
                    DateTime::<Utc>::default()
                }
            };

            Ok(NewsRecord {
                title: item.title.clone(),
                link: item.link.clone(),
                published,
                description: clean_description(&item.description),
                source: item.source.name.clone(),
                source_url: item.source.url.clone(),
            })
        })
        .collect()
}

/// Strips markup, then turns the literal `&nbsp;` into a space.
fn clean_description(raw: &str) -> String {
    strip_tags(raw).replace("&nbsp;", " ")
}

/// Layout of an RFC 1123 date once the zone abbreviation is removed.
const RFC1123_NO_ZONE: &str = "%a, %d %b %Y %H:%M:%S";

/// Parses an RFC 1123 date (`Mon, 02 Jan 2006 15:04:05 GMT`) into UTC.
///
/// Numeric offsets and the zone names RFC 2822 knows are applied. Any other
/// upper-case abbreviation (`UTC`, `CET`, `JST`, ...) is read at offset zero.
pub fn parse_pub_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let (rest, zone) = value.rsplit_once(' ')?;
    if zone.len() < 3 || !zone.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    NaiveDateTime::parse_from_str(rest, RFC1123_NO_ZONE)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const GOOGLE_RSS: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/"><channel>
<generator>NFE/5.0</generator>
<title>Top stories - Google News</title>
<link>https://news.google.com/?hl=en-US&amp;gl=US&amp;ceid=US:en</link>
<language>en-US</language>
<webMaster>news-webmaster@google.com</webMaster>
<copyright>2024 Google LLC</copyright>
<lastBuildDate>Tue, 04 Jun 2024 12:00:00 GMT</lastBuildDate>
<description>Google News</description>
<item>
  <title>Markets rally on rate hopes - Reuters</title>
  <link>https://news.google.com/rss/articles/CBMiAAA?oc=5</link>
  <guid isPermaLink="false">CBMiAAA</guid>
  <pubDate>Tue, 04 Jun 2024 11:30:00 GMT</pubDate>
  <description>&lt;a href="https://news.google.com/rss/articles/CBMiAAA?oc=5" target="_blank"&gt;Markets rally on rate hopes&lt;/a&gt;&amp;nbsp;&amp;nbsp;&lt;font color="#6f6f6f"&gt;Reuters&lt;/font&gt;</description>
  <source url="https://www.reuters.com">Reuters</source>
</item>
<item>
  <title>Second story</title>
  <link>https://example.com/2</link>
  <guid isPermaLink="true">https://example.com/2</guid>
  <pubDate>Tue, 04 Jun 2024 09:15:00 +0200</pubDate>
  <description><![CDATA[<p>Plain&nbsp;text</p>]]></description>
</item>
</channel></rss>"##;

    fn item(title: &str, pub_date: &str, description: &str) -> Item {
        Item {
            title: title.to_string(),
            link: format!("https://example.com/{title}"),
            pub_date: pub_date.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    fn doc(items: Vec<Item>) -> RssDocument {
        RssDocument {
            version: "2.0".to_string(),
            channel: Channel {
                items,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_parse_google_feed_schema() {
        let doc = parse_document(GOOGLE_RSS.as_bytes()).unwrap();
        assert_eq!(doc.version, "2.0");
        assert_eq!(doc.channel.title, "Top stories - Google News");
        assert_eq!(doc.channel.generator, "NFE/5.0");
        assert_eq!(doc.channel.web_master, "news-webmaster@google.com");
        assert_eq!(doc.channel.last_build_date, "Tue, 04 Jun 2024 12:00:00 GMT");
        assert_eq!(doc.channel.items.len(), 2);

        let first = &doc.channel.items[0];
        assert_eq!(first.guid.value, "CBMiAAA");
        assert_eq!(first.guid.is_perma_link, "false");
        assert_eq!(first.source.name, "Reuters");
        assert_eq!(first.source.url, "https://www.reuters.com");
        assert!(first.description.starts_with("<a href="));

        let second = &doc.channel.items[1];
        assert_eq!(second.source.name, "");
        assert_eq!(second.source.url, "");
    }

    #[test]
    fn test_normalize_google_feed() {
        let doc = parse_document(GOOGLE_RSS.as_bytes()).unwrap();
        let records = normalize(&doc, DateParsing::Lenient).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(
            records[0],
            NewsRecord {
                title: "Markets rally on rate hopes - Reuters".to_string(),
                link: "https://news.google.com/rss/articles/CBMiAAA?oc=5".to_string(),
                published: Utc.with_ymd_and_hms(2024, 6, 4, 11, 30, 0).unwrap(),
                description: "Markets rally on rate hopes  Reuters".to_string(),
                source: "Reuters".to_string(),
                source_url: "https://www.reuters.com".to_string(),
            }
        );

        assert_eq!(records[1].description, "Plain text");
        assert_eq!(
            records[1].published,
            Utc.with_ymd_and_hms(2024, 6, 4, 7, 15, 0).unwrap()
        );
        assert_eq!(records[1].source, "");
    }

    #[test]
    fn test_description_nbsp_becomes_space() {
        let records = normalize(
            &doc(vec![item("a", "", "<p>Hello&nbsp;World</p>")]),
            DateParsing::Lenient,
        )
        .unwrap();
        assert_eq!(records[0].description, "Hello World");
    }

    #[test]
    fn test_description_other_entities_untouched() {
        let records = normalize(
            &doc(vec![item("a", "", "<b>Q&amp;A &quot;live&quot;</b>")]),
            DateParsing::Lenient,
        )
        .unwrap();
        assert_eq!(records[0].description, "Q&amp;A &quot;live&quot;");
    }

    #[test]
    fn test_parse_pub_date_rfc1123() {
        assert_eq!(
            parse_pub_date("Mon, 02 Jan 2006 15:04:05 GMT"),
            Some(Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap())
        );
        assert_eq!(
            parse_pub_date("Mon, 02 Jan 2006 15:04:05 +0000"),
            Some(Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap())
        );
    }

    #[test]
    fn test_parse_pub_date_utc_zone() {
        assert_eq!(
            parse_pub_date("Mon, 02 Jan 2006 15:04:05 UTC"),
            Some(Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap())
        );
    }

    #[test]
    fn test_parse_pub_date_unknown_abbreviation_is_offset_zero() {
        for zone in ["CET", "BST", "JST"] {
            assert_eq!(
                parse_pub_date(&format!("Tue, 04 Jun 2024 11:30:00 {zone}")),
                Some(Utc.with_ymd_and_hms(2024, 6, 4, 11, 30, 0).unwrap()),
                "zone {zone}"
            );
        }
    }

    #[test]
    fn test_parse_pub_date_rejects_garbage() {
        assert_eq!(parse_pub_date(""), None);
        assert_eq!(parse_pub_date("yesterday"), None);
        assert_eq!(parse_pub_date("2024-06-04T11:30:00Z"), None);
        assert_eq!(parse_pub_date("Mon, 02 Jan 2006 15:04:05 utc"), None);
        assert_eq!(parse_pub_date("Mon, 02 Jan 2006 UTC"), None);
    }

    #[test]
    fn test_items_split_by_other_element_are_all_kept() {
        let doc = parse_document(
            br#"<rss version="2.0"><channel>
<item><title>a</title></item>
<title>Chan</title>
<item><title>b</title></item>
</channel></rss>"#,
        )
        .unwrap();
        assert_eq!(doc.channel.title, "Chan");

        let records = normalize(&doc, DateParsing::Lenient).unwrap();
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["a", "b"]);
    }

    #[test]
    fn test_lenient_malformed_date_is_zero_time() {
        let records = normalize(
            &doc(vec![
                item("bad", "not a date", ""),
                item("good", "Mon, 02 Jan 2006 15:04:05 GMT", ""),
            ]),
            DateParsing::Lenient,
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "bad");
        assert_eq!(records[0].published, DateTime::<Utc>::default());
        assert_eq!(records[0].published.timestamp(), 0);
        assert!(records[0].has_unknown_date());
        assert_eq!(records[1].title, "good");
        assert_eq!(
            records[1].published,
            Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap()
        );
        assert!(!records[1].has_unknown_date());
    }

    #[test]
    fn test_strict_malformed_date_errors() {
        let result = normalize(
            &doc(vec![
                item("good", "Mon, 02 Jan 2006 15:04:05 GMT", ""),
                item("bad", "02/01/2006", ""),
            ]),
            DateParsing::Strict,
        );
        match result {
            Err(NewsError::Date { value }) => assert_eq!(value, "02/01/2006"),
            other => panic!("Expected Date error, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_valid_dates_succeed() {
        let records = normalize(
            &doc(vec![item("good", "Tue, 04 Jun 2024 11:30:00 GMT", "")]),
            DateParsing::Strict,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_empty_channel() {
        let doc = parse_document(br#"<rss version="2.0"><channel></channel></rss>"#).unwrap();
        assert!(doc.channel.items.is_empty());
        assert!(normalize(&doc, DateParsing::Lenient).unwrap().is_empty());
    }

    #[test]
    fn test_missing_channel_is_error() {
        assert!(parse_document(b"<html><body>Not a feed</body></html>").is_err());
    }

    #[test]
    fn test_malformed_xml_is_error() {
        assert!(parse_document(b"<rss><channel><item>").is_err());
        assert!(parse_document(b"not xml at all").is_err());
    }

    #[test]
    fn test_preserves_item_order() {
        let titles = ["c", "a", "b", "a"];
        let items = titles.iter().map(|t| item(t, "", "")).collect();
        let records = normalize(&doc(items), DateParsing::Lenient).unwrap();
        let got: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(got, titles);
    }
}
