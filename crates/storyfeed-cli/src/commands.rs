use std::io::Read;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::Value;
use storyfeed_migrate::{migrate_settings, migrate_stories_with_report, MigrationReport};
use storyfeed_render::{Renderer, SafeHtml};
use storyfeed_server::{http_pipeline, ServerConfig, StoryfeedServer};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Feed(args) => cmd_feed(args).await,
        Command::Render(args) => cmd_render(args),
        Command::Migrate(args) => cmd_migrate(args, cli.format),
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = serve_config(&args)?;
    let server = StoryfeedServer::new(config).context("failed to start server")?;
    server.serve().await?;
    Ok(())
}

async fn cmd_feed(args: FeedArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(url) = args.naming_url {
        config.naming_url = url;
    }
    tracing::debug!(handle = %args.handle, naming_url = %config.naming_url, "building feed");
    let pipeline = http_pipeline(&config)?;
    let rss = pipeline
        .feed_rss(&args.handle, &args.app_origin)
        .await
        .with_context(|| format!("no feed for {}", args.handle))?;
    println!("{rss}");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let input = read_input(&args.file)?;
    let html = render_input(&Renderer::headless(), &input);
    if html.is_empty() {
        eprintln!("{} nothing rendered", "!".yellow().bold());
    }
    println!("{html}");
    Ok(())
}

fn cmd_migrate(args: MigrateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let input = read_input(&args.file)?;
    let raw: Value = serde_json::from_str(&input)
        .with_context(|| format!("{} is not JSON", args.file.display()))?;
    let (migrated, report) = migrate_document(args.kind, raw)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&migrated)?),
        OutputFormat::Text => print_migration(args.kind, &migrated, &report),
    }
    Ok(())
}

/// File overrides defaults, flags override the file.
pub fn serve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(origin) = &args.app_origin {
        config.app_origin = Some(origin.clone());
    }
    if let Some(url) = &args.naming_url {
        config.naming_url = url.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Accepts either a bare document tree or a whole story record, whose
/// `content` string is then rendered.
pub fn render_input(renderer: &Renderer, input: &str) -> SafeHtml {
    if let Ok(Value::Object(record)) = serde_json::from_str::<Value>(input) {
        let is_tree = record.contains_key("document") || record.contains_key("nodes");
        if let (false, Some(Value::String(content))) = (is_tree, record.get("content")) {
            return renderer.render_encoded(content);
        }
    }
    renderer.render_encoded(input)
}

pub fn migrate_document(
    kind: ResourceKind,
    raw: Value,
) -> anyhow::Result<(Value, MigrationReport)> {
    Ok(match kind {
        ResourceKind::Stories => {
            let (file, report) = migrate_stories_with_report(Some(raw));
            (serde_json::to_value(file)?, report)
        }
        ResourceKind::Settings => (
            serde_json::to_value(migrate_settings(Some(raw)))?,
            MigrationReport::default(),
        ),
    })
}

fn print_migration(kind: ResourceKind, migrated: &Value, report: &MigrationReport) {
    let steps = if report.applied.is_empty() {
        "none".to_string()
    } else {
        report.applied.join(", ")
    };
    let version = migrated["version"].as_str().unwrap_or("?");
    println!(
        "{} Migrated {:?} to version {}",
        "✓".green().bold(),
        kind,
        version.cyan()
    );
    println!("  steps: {}", steps.yellow());
    if report.unrecognized {
        println!("  {}", "unrecognized shape, decoded best-effort".yellow());
    }
    if let Some(stories) = migrated["stories"].as_array() {
        println!("  stories: {}", stories.len().to_string().bold());
        for story in stories {
            println!(
                "    {} {}",
                story["id"].as_str().unwrap_or("?").cyan(),
                story["title"].as_str().unwrap_or("")
            );
        }
    }
    if report.skipped_records > 0 {
        println!("  {} {} record(s) skipped", "!".red().bold(), report.skipped_records);
    }
    if let Some(name) = migrated["siteName"].as_str() {
        println!("  site name: {}", name.bold());
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::net::SocketAddr;

    #[test]
    fn render_bare_tree() {
        let tree = json!({ "document": { "nodes": [
            { "object": "block", "type": "heading-two", "nodes": [
                { "object": "text", "leaves": [{ "text": "Title" }] }
            ]}
        ]}});
        let html = render_input(&Renderer::headless(), &tree.to_string());
        assert_eq!(html.as_str(), "<h2>Title</h2>");
    }

    #[test]
    fn render_story_record() {
        let tree = json!({ "document": { "nodes": [
            { "object": "block", "type": "paragraph", "nodes": [
                { "object": "text", "leaves": [{ "text": "Body" }] }
            ]}
        ]}});
        let record = json!({ "id": "s1", "content": tree.to_string() });
        let html = render_input(&Renderer::headless(), &record.to_string());
        assert_eq!(html.as_str(), "<p>Body</p>");
    }

    #[test]
    fn render_garbage_is_empty() {
        assert!(render_input(&Renderer::headless(), "not json").is_empty());
    }

    #[test]
    fn migrate_stories_document() {
        let (value, report) =
            migrate_document(ResourceKind::Stories, json!([{ "_id": "a", "title": "A" }])).unwrap();
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["stories"][0]["id"], "a");
        assert_eq!(value["stories"][0]["excerpt"], "");
        assert_eq!(report.applied, vec!["wrap-bare-array", "stamp-unversioned"]);
    }

    #[test]
    fn migrate_settings_document() {
        let (value, _) = migrate_document(ResourceKind::Settings, json!({ "siteName": "S" })).unwrap();
        assert_eq!(value["kind"], "Settings");
        assert_eq!(value["siteName"], "S");
    }

    #[test]
    fn serve_flags_override_defaults() {
        let args = ServeArgs {
            config: None,
            bind: Some("0.0.0.0:9000".parse::<SocketAddr>().unwrap()),
            app_origin: Some("https://app.io".into()),
            naming_url: None,
        };
        let config = serve_config(&args).unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.app_origin.as_deref(), Some("https://app.io"));
        assert_eq!(config.naming_url, ServerConfig::default().naming_url);
    }

    #[test]
    fn serve_rejects_bad_origin() {
        let args = ServeArgs {
            config: None,
            bind: None,
            app_origin: Some("app.io".into()),
            naming_url: None,
        };
        assert!(serve_config(&args).is_err());
    }
}
