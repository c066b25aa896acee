use chrono::{DateTime, Utc};
use storyfeed_types::Timestamp;

/// RSS 2.0 specification URL, advertised in `<docs>`.
pub const RSS_DOCS_URL: &str = "https://validator.w3.org/feed/docs/rss2.html";

/// Channel author.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub link: Option<String>,
}

/// Media attached to an item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub mime_type: String,
    pub length: u64,
}

impl Enclosure {
    /// An image enclosure, with the MIME type taken from the URL extension.
    pub fn image(url: impl Into<String>) -> Self {
        let url = url.into();
        let mime_type = image_mime_type(&url).to_string();
        Self {
            url,
            mime_type,
            length: 0,
        }
    }
}

fn image_mime_type(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.contains('/'))
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "image/*",
    }
}

/// One feed entry.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedItem {
    pub title: String,
    /// Permanent identifier, written as `<guid>`.
    pub id: String,
    pub link: String,
    /// Written verbatim inside CDATA.
    pub description: String,
    pub date: Timestamp,
    pub enclosure: Option<Enclosure>,
}

impl FeedItem {
    /// An item whose guid is its link.
    pub fn new(title: impl Into<String>, link: impl Into<String>, date: Timestamp) -> Self {
        let link = link.into();
        Self {
            title: title.into(),
            id: link.clone(),
            link,
            description: String::new(),
            date,
            enclosure: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, url: Option<impl Into<String>>) -> Self {
        self.enclosure = url.map(Enclosure::image);
        self
    }
}

/// A syndication channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub id: String,
    pub favicon: Option<String>,
    pub copyright: Option<String>,
    pub author: Option<Author>,
    pub generator: String,
    /// Canonical URL of the feed document itself (`atom:link rel="self"`).
    pub self_link: Option<String>,
    pub last_build: DateTime<Utc>,
    pub items: Vec<FeedItem>,
}

impl Feed {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        let link = link.into();
        Self {
            title: title.into(),
            id: link.clone(),
            link,
            description: String::new(),
            favicon: None,
            copyright: None,
            author: None,
            generator: concat!("storyfeed ", env!("CARGO_PKG_VERSION")).to_string(),
            self_link: None,
            last_build: Utc::now(),
            items: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn favicon(mut self, url: impl Into<String>) -> Self {
        self.favicon = Some(url.into());
        self
    }

    pub fn copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    pub fn author(mut self, name: impl Into<String>, link: Option<String>) -> Self {
        self.author = Some(Author {
            name: name.into(),
            link,
        });
        self
    }

    pub fn self_link(mut self, url: impl Into<String>) -> Self {
        self.self_link = Some(url.into());
        self
    }

    pub fn last_build(mut self, at: DateTime<Utc>) -> Self {
        self.last_build = at;
        self
    }

    pub fn add_item(&mut self, item: FeedItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_mime_types() {
        assert_eq!(Enclosure::image("https://x.io/a.PNG").mime_type, "image/png");
        assert_eq!(Enclosure::image("https://x.io/a.jpeg?w=10").mime_type, "image/jpeg");
        assert_eq!(Enclosure::image("https://x.io/a.svg#frag").mime_type, "image/svg+xml");
        assert_eq!(Enclosure::image("https://x.io/noext").mime_type, "image/*");
        assert_eq!(Enclosure::image("https://cdn.x.io/dir/file").mime_type, "image/*");
    }

    #[test]
    fn item_guid_defaults_to_link() {
        let item = FeedItem::new("t", "https://a/b", Timestamp::zero())
            .with_description("body")
            .with_image(None::<String>);
        assert_eq!(item.id, "https://a/b");
        assert_eq!(item.description, "body");
        assert!(item.enclosure.is_none());
    }

    #[test]
    fn builder_sets_channel_fields() {
        let mut feed = Feed::new("Blog", "https://a/alice")
            .description("About")
            .favicon("https://a/favicon.png")
            .copyright("All rights reserved 2024, alice")
            .author("alice", Some("https://a/alice".into()));
        feed.add_item(FeedItem::new("x", "https://a/alice/1", Timestamp::zero()));
        assert_eq!(feed.id, "https://a/alice");
        assert_eq!(feed.len(), 1);
        assert!(feed.generator.starts_with("storyfeed "));
    }
}
