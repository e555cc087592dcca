//! Instagram post references.

use serde::{Deserialize, Serialize};

/// The social feed shown near the bottom of the page.
///
/// Posts are permalinks used verbatim; their shape is not checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InstagramFeed {
    /// Account handle without the leading `@`
    pub handle: String,

    /// Link for the "follow" button
    pub profile_url: String,

    /// Post permalinks in display order
    #[serde(default)]
    pub posts: Vec<String>,
}

impl InstagramFeed {
    /// Whether there is anything to embed.
    pub fn has_posts(&self) -> bool {
        !self.posts.is_empty()
    }

    /// Handle formatted for display, e.g. `@hansens_excavating`.
    pub fn display_handle(&self) -> String {
        format!("@{}", self.handle.trim_start_matches('@'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_handle_adds_single_at() {
        let feed = InstagramFeed {
            handle: "@crew".to_string(),
            ..Default::default()
        };
        assert_eq!(feed.display_handle(), "@crew");

        let feed = InstagramFeed {
            handle: "crew".to_string(),
            ..Default::default()
        };
        assert_eq!(feed.display_handle(), "@crew");
    }

    #[test]
    fn empty_feed_has_no_posts() {
        assert!(!InstagramFeed::default().has_posts());
    }
}
