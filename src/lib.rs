//! Client for the Google News RSS endpoint.
//!
//! Fetches top stories, topic sections, geographic sections and search
//! results, and normalizes each feed item into a flat [`news::NewsRecord`].

pub mod config;
pub mod news;
pub mod util;
