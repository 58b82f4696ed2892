//! JSON export for other tools.
//!
//! The file holds one array, in the same order as the other exports:
//!
//! ```json
//! [
//!   {
//!     "source_name": "Sophos",
//!     "title": "Patch now",
//!     "url": "https://news.sophos.com/...",
//!     "published": "2025-04-21T08:00:00"
//!   }
//! ]
//! ```

use crate::models::ExtractedArticle;
use std::error::Error;

/// Serialize `articles` as a pretty-printed JSON array.
pub fn render(articles: &[ExtractedArticle]) -> Result<String, Box<dyn Error>> {
    Ok(serde_json::to_string_pretty(articles)?)
}
