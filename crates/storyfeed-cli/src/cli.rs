use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "storyfeed",
    about = "Public story feeds from user-owned storage buckets",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Print the RSS feed for a handle
    Feed(FeedArgs),
    /// Render a stored story body to sanitized HTML
    Render(RenderArgs),
    /// Migrate a stored resource to the current schema
    Migrate(MigrateArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    #[arg(long)]
    pub app_origin: Option<String>,
    #[arg(long)]
    pub naming_url: Option<String>,
}

#[derive(Args)]
pub struct FeedArgs {
    pub handle: String,
    /// Origin the handle's profile registers its bucket under
    #[arg(long)]
    pub app_origin: String,
    #[arg(long)]
    pub naming_url: Option<String>,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Story body (JSON document tree) or story record; `-` reads stdin
    pub file: PathBuf,
}

#[derive(Args)]
pub struct MigrateArgs {
    pub kind: ResourceKind,
    /// Stored JSON file; `-` reads stdin
    pub file: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ResourceKind {
    Stories,
    Settings,
}
