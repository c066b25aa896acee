use std::fmt;
use std::sync::Arc;

use chrono::Datelike;
use storyfeed_feed::{Feed, FeedItem};
use storyfeed_identity::{HandleResolver, IdentityLookup, Resolved};
use storyfeed_migrate::{migrate_settings, migrate_stories_with_report};
use storyfeed_render::Renderer;
use storyfeed_storage::{ContentFetcher, StorageFetch};
use storyfeed_types::{SettingsFile, StoryFile};

use crate::error::{PipelineError, PipelineResult};
use crate::view::StoryView;

/// Pipeline states, in order. Each completed transition is logged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Start,
    Resolved,
    Fetched,
    Migrated,
    Assembled,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Resolved => "resolved",
            Self::Fetched => "fetched",
            Self::Migrated => "migrated",
            Self::Assembled => "assembled",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything known about a handle once its bucket has been read and
/// migrated.
#[derive(Clone, Debug)]
pub struct Loaded {
    pub handle: String,
    pub app_origin: String,
    pub resolved: Resolved,
    pub stories: StoryFile,
    pub settings: SettingsFile,
}

impl Loaded {
    /// `{origin}/{handle}`.
    pub fn blog_link(&self) -> String {
        format!("{}/{}", self.app_origin, self.handle)
    }

    /// `{origin}/{handle}/{story_id}`.
    pub fn story_link(&self, story_id: &str) -> String {
        format!("{}/{}/{}", self.app_origin, self.handle, story_id)
    }
}

/// Handle in, feed or story view out.
///
/// Linear: resolve the handle, fetch both bucket resources concurrently,
/// migrate them, assemble the output. No retries; the first failure ends the
/// request.
#[derive(Clone)]
pub struct AggregationPipeline {
    resolver: HandleResolver,
    fetcher: ContentFetcher,
    renderer: Arc<Renderer>,
}

impl AggregationPipeline {
    pub fn new(resolver: HandleResolver, fetcher: ContentFetcher, renderer: Arc<Renderer>) -> Self {
        Self {
            resolver,
            fetcher,
            renderer,
        }
    }

    /// Build a pipeline over raw backends.
    pub fn from_backends(
        lookup: Arc<dyn IdentityLookup>,
        storage: Arc<dyn StorageFetch>,
        renderer: Arc<Renderer>,
    ) -> Self {
        Self::new(
            HandleResolver::new(lookup),
            ContentFetcher::new(storage),
            renderer,
        )
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Run the shared stages: resolve, fetch, migrate.
    pub async fn load(&self, handle: &str, app_origin: &str) -> PipelineResult<Loaded> {
        let app_origin = app_origin.trim_end_matches('/').to_string();
        tracing::debug!(handle, stage = %Stage::Start, %app_origin, "pipeline started");

        let resolved = self.resolver.resolve(handle, &app_origin).await?;
        tracing::debug!(handle, stage = %Stage::Resolved, bucket = %resolved.bucket_url);

        let fetched = self
            .fetcher
            .fetch_all(&resolved.bucket_url)
            .await
            .map_err(|source| PipelineError::Fetch {
                handle: handle.to_string(),
                source,
            })?;
        tracing::debug!(
            handle,
            stage = %Stage::Fetched,
            stories = fetched.stories_raw.is_some(),
            settings = fetched.settings_raw.is_some()
        );

        let (stories, report) = migrate_stories_with_report(fetched.stories_raw);
        let settings = migrate_settings(fetched.settings_raw);
        if report.skipped_records > 0 {
            tracing::warn!(
                handle,
                skipped = report.skipped_records,
                "stories skipped during migration"
            );
        }
        tracing::debug!(
            handle,
            stage = %Stage::Migrated,
            steps = ?report.applied,
            stories = stories.len()
        );

        Ok(Loaded {
            handle: handle.to_string(),
            app_origin,
            resolved,
            stories,
            settings,
        })
    }

    /// Assemble the syndication feed for `handle`.
    pub async fn build_feed(&self, handle: &str, app_origin: &str) -> PipelineResult<Feed> {
        let loaded = self.load(handle, app_origin).await?;
        let feed = assemble_feed(&loaded);
        tracing::debug!(handle, stage = %Stage::Assembled, items = feed.len());
        Ok(feed)
    }

    /// [`build_feed`](Self::build_feed), serialized as RSS 2.0.
    pub async fn feed_rss(&self, handle: &str, app_origin: &str) -> PipelineResult<String> {
        let feed = self.build_feed(handle, app_origin).await?;
        feed.rss2().map_err(|source| PipelineError::Feed {
            handle: handle.to_string(),
            source,
        })
    }

    /// Locate one story and render its body.
    pub async fn story_view(
        &self,
        handle: &str,
        story_id: &str,
        app_origin: &str,
    ) -> PipelineResult<StoryView> {
        let loaded = self.load(handle, app_origin).await?;
        let story = loaded
            .stories
            .find(story_id)
            .ok_or_else(|| PipelineError::StoryNotFound {
                handle: handle.to_string(),
                story_id: story_id.to_string(),
            })?;

        let html = self.renderer.render_encoded(&story.content);
        let view = StoryView::assemble(
            story,
            html,
            loaded.story_link(story_id),
            handle,
            &loaded.resolved.profile,
            &loaded.settings,
        );
        tracing::debug!(
            handle,
            story_id,
            stage = %Stage::Assembled,
            bytes = view.html.as_str().len()
        );
        Ok(view)
    }
}

impl fmt::Debug for AggregationPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregationPipeline")
            .field("resolver", &self.resolver)
            .field("fetcher", &self.fetcher)
            .finish_non_exhaustive()
    }
}

fn assemble_feed(loaded: &Loaded) -> Feed {
    let handle = loaded.handle.as_str();
    let blog_link = loaded.blog_link();
    let title = loaded.settings.display_name().unwrap_or(handle);
    let year = chrono::Utc::now().year();

    let mut feed = Feed::new(title, blog_link.clone())
        .description(loaded.settings.display_description().unwrap_or_default())
        .favicon(format!("{}/favicon/apple-touch-icon.png", loaded.app_origin))
        .copyright(format!("All rights reserved {year}, {handle}"))
        .author(handle, Some(blog_link))
        .self_link(format!("{}/api/feed/{}", loaded.app_origin, handle));

    for story in &loaded.stories.stories {
        feed.add_item(
            FeedItem::new(&story.title, loaded.story_link(&story.id), story.created_at)
                .with_description(&story.content)
                .with_image(story.cover_image_url.as_deref()),
        );
    }
    feed
}
