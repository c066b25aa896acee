use serde::Serialize;
use storyfeed_render::SafeHtml;
use storyfeed_types::{Profile, SettingsFile, StoryRecord, Timestamp};

/// Search-engine and social-card metadata for a story page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Who wrote the story, as shown on its page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

/// A single story, ready for a page: sanitized body plus metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryView {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub html: SafeHtml,
    pub seo: Seo,
    pub author: AuthorView,
}

impl StoryView {
    pub(crate) fn assemble(
        story: &StoryRecord,
        html: SafeHtml,
        url: String,
        handle: &str,
        profile: &Profile,
        settings: &SettingsFile,
    ) -> Self {
        Self {
            id: story.id.clone(),
            title: story.title.clone(),
            excerpt: story.excerpt.clone(),
            created_at: story.created_at,
            updated_at: story.updated_at,
            cover_image_url: story.cover_image_url.clone(),
            html,
            seo: Seo {
                title: story.seo_title().to_string(),
                description: story.seo_description().to_string(),
                url,
                image: story.cover_image_url.clone(),
            },
            author: AuthorView {
                handle: handle.to_string(),
                name: profile.name.clone(),
                avatar_url: profile.avatar_url().map(str::to_string),
                site_name: settings.display_name().map(str::to_string),
            },
        }
    }
}
