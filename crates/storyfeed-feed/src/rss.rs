use std::fmt::Write;

use crate::error::{FeedError, FeedResult};
use crate::model::{Feed, FeedItem, RSS_DOCS_URL};
use crate::xml::{cdata_element, escape, text_element};

/// HTTP content type of an RSS document.
pub const CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

impl Feed {
    /// Serialize as an RSS 2.0 document.
    pub fn rss2(&self) -> FeedResult<String> {
        if self.title.trim().is_empty() {
            return Err(FeedError::MissingField("title"));
        }
        if self.link.trim().is_empty() {
            return Err(FeedError::MissingField("link"));
        }

        let mut out = String::with_capacity(1024 + self.items.len() * 512);
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        out.push_str(
            "<rss version=\"2.0\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
             xmlns:content=\"http://purl.org/rss/1.0/modules/content/\" \
             xmlns:atom=\"http://www.w3.org/2005/Atom\">\n",
        );
        out.push_str("<channel>\n");

        text_element(&mut out, "title", &self.title)?;
        out.push('\n');
        text_element(&mut out, "link", &self.link)?;
        out.push('\n');
        text_element(&mut out, "description", &self.description)?;
        out.push('\n');
        text_element(&mut out, "lastBuildDate", &self.last_build.to_rfc2822())?;
        out.push('\n');
        text_element(&mut out, "docs", RSS_DOCS_URL)?;
        out.push('\n');
        text_element(&mut out, "generator", &self.generator)?;
        out.push('\n');

        if let Some(favicon) = &self.favicon {
            out.push_str("<image>\n");
            text_element(&mut out, "title", &self.title)?;
            out.push('\n');
            text_element(&mut out, "url", favicon)?;
            out.push('\n');
            text_element(&mut out, "link", &self.link)?;
            out.push_str("\n</image>\n");
        }
        if let Some(copyright) = &self.copyright {
            text_element(&mut out, "copyright", copyright)?;
            out.push('\n');
        }
        if let Some(author) = &self.author {
            text_element(&mut out, "dc:creator", &author.name)?;
            out.push('\n');
        }
        if let Some(self_link) = &self.self_link {
            out.push_str("<atom:link href=\"");
            escape(&mut out, self_link)?;
            out.push_str("\" rel=\"self\" type=\"application/rss+xml\"/>\n");
        }

        for item in &self.items {
            write_item(&mut out, item)?;
        }

        out.push_str("</channel>\n</rss>");
        Ok(out)
    }
}

fn write_item(out: &mut String, item: &FeedItem) -> FeedResult<()> {
    out.push_str("<item>\n");
    cdata_element(out, "title", &item.title)?;
    out.push('\n');
    text_element(out, "link", &item.link)?;
    out.push('\n');
    let permalink = item.id == item.link;
    write!(out, "<guid isPermaLink=\"{permalink}\">")?;
    escape(out, &item.id)?;
    out.push_str("</guid>\n");
    match item.date.to_rfc2822() {
        Ok(date) => {
            text_element(out, "pubDate", &date)?;
            out.push('\n');
        }
        Err(e) => tracing::warn!(
            item = %item.id,
            error = %e,
            "item date out of range, omitting pubDate"
        ),
    }
    cdata_element(out, "description", &item.description)?;
    out.push('\n');
    if let Some(enclosure) = &item.enclosure {
        out.push_str("<enclosure url=\"");
        escape(out, &enclosure.url)?;
        write!(out, "\" length=\"{}\" type=\"", enclosure.length)?;
        escape(out, &enclosure.mime_type)?;
        out.push_str("\"/>\n");
    }
    out.push_str("</item>\n");
    Ok(())
}
