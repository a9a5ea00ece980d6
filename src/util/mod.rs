//! Utility functions for common operations.
//!
//! - **Text processing**: HTML tag stripping for feed descriptions
//!
//! # Examples
//!
//! ```
//! use gnews::util::strip_tags;
//!
//! let text = strip_tags("<p>Headline <b>text</b></p>");
//! assert_eq!(text, "Headline text");
//! ```

mod text;

pub use text::strip_tags;
