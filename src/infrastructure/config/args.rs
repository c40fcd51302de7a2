//! Command-line interface.

use super::app_config::{Environment, LogLevel, StorageBackend};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "portfolio-admin",
    version,
    about = "Back-office client for the portfolio site API",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// API base URL.
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Session storage backend.
    #[arg(long, value_enum, global = true)]
    pub storage: Option<StorageBackend>,

    /// Deployment environment.
    #[arg(long, value_enum, global = true)]
    pub environment: Option<Environment>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Content collections reachable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    /// Blog posts.
    Posts,
    /// Blog categories.
    BlogCategories,
    /// Blog tags.
    Tags,
    /// Portfolio projects.
    Projects,
    /// Project categories.
    ProjectCategories,
    /// Offered services.
    Services,
    /// Client testimonials.
    Testimonials,
    /// Programs and skills.
    Programs,
    /// Work experience.
    Experiences,
    /// Newsletter subscribers.
    Subscribers,
    /// Contact messages.
    Messages,
}

impl ResourceKind {
    /// Back-office route the collection is managed under.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::Posts => "/admin/blog/posts",
            Self::BlogCategories => "/admin/blog/categories",
            Self::Tags => "/admin/blog/tags",
            Self::Projects => "/admin/projects",
            Self::ProjectCategories => "/admin/projects/categories",
            Self::Services => "/admin/services",
            Self::Testimonials => "/admin/testimonials",
            Self::Programs => "/admin/programs",
            Self::Experiences => "/admin/experiences",
            Self::Subscribers => "/admin/newsletter",
            Self::Messages => "/admin/messages",
        }
    }
}

/// JSON payload given inline or as a file.
#[derive(Debug, Clone, clap::Args)]
#[group(required = true, multiple = false)]
pub struct Payload {
    /// JSON document.
    #[arg(long, value_name = "JSON")]
    pub data: Option<String>,

    /// File containing the JSON document.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

/// Back-office commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in to the back-office.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Read from standard input when omitted.
        #[arg(long, env = "PORTFOLIO_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Exchange the refresh token for a new pair.
    Refresh,
    /// Change the signed-in user's password.
    ChangePassword {
        /// Current password.
        #[arg(long)]
        current: String,
        /// Replacement password.
        #[arg(long = "new")]
        new_password: String,
    },
    /// Show dashboard counters.
    Stats,
    /// List a collection.
    List {
        /// Collection to list.
        #[arg(value_enum)]
        resource: ResourceKind,
        /// Page number, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Records per page, at most 100.
        #[arg(long, default_value_t = 10)]
        limit: u32,
        /// Search term.
        #[arg(long)]
        search: Option<String>,
        /// Publication status filter.
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one record as JSON.
    Show {
        /// Collection holding the record.
        #[arg(value_enum)]
        resource: ResourceKind,
        /// Record id.
        id: String,
    },
    /// Create a record.
    Create {
        /// Collection to add to.
        #[arg(value_enum)]
        resource: ResourceKind,
        /// Record as JSON.
        #[command(flatten)]
        payload: Payload,
    },
    /// Replace a record.
    Update {
        /// Collection holding the record.
        #[arg(value_enum)]
        resource: ResourceKind,
        /// Record id.
        id: String,
        /// Replacement record as JSON.
        #[command(flatten)]
        payload: Payload,
    },
    /// Delete a record.
    Delete {
        /// Collection holding the record.
        #[arg(value_enum)]
        resource: ResourceKind,
        /// Record id.
        id: String,
    },
    /// Mark a contact message as read.
    MarkRead {
        /// Message id.
        id: String,
    },
    /// Show the site profile, or replace it with `--data`/`--file`.
    Profile {
        /// Replacement profile as JSON.
        #[arg(long, value_name = "JSON", conflicts_with = "file")]
        data: Option<String>,
        /// File containing the replacement profile.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Validate and upload an image.
    UploadImage {
        /// Image file.
        path: PathBuf,
    },
    /// Upload any file.
    UploadFile {
        /// File to upload.
        path: PathBuf,
    },
    /// Show locally retained error reports.
    ErrorLogs {
        /// Remove them after printing.
        #[arg(long)]
        clear: bool,
    },
}

impl Command {
    /// Route the command runs under.
    #[must_use]
    pub fn route(&self) -> &'static str {
        match self {
            Self::Login { .. } => "/admin/login",
            Self::Logout | Self::Whoami | Self::Refresh | Self::ErrorLogs { .. } => "/admin",
            Self::ChangePassword { .. } => "/admin/settings",
            Self::Stats => "/admin/dashboard",
            Self::List { resource, .. }
            | Self::Show { resource, .. }
            | Self::Create { resource, .. }
            | Self::Update { resource, .. }
            | Self::Delete { resource, .. } => resource.route(),
            Self::MarkRead { .. } => "/admin/messages",
            Self::Profile { .. } => "/admin/profile",
            Self::UploadImage { .. } | Self::UploadFile { .. } => "/admin/media",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_arguments() {
        let args = CliArgs::parse_from([
            "portfolio-admin",
            "list",
            "blog-categories",
            "--page",
            "2",
            "--search",
            "rust",
        ]);

        match args.command {
            Command::List {
                resource,
                page,
                limit,
                search,
                ..
            } => {
                assert_eq!(resource, ResourceKind::BlogCategories);
                assert_eq!(page, 2);
                assert_eq!(limit, 10);
                assert_eq!(search.as_deref(), Some("rust"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_create_requires_payload() {
        assert!(CliArgs::try_parse_from(["portfolio-admin", "create", "tags"]).is_err());
        assert!(
            CliArgs::try_parse_from(["portfolio-admin", "create", "tags", "--data", "{}"]).is_ok()
        );
    }

    #[test]
    fn test_routes() {
        let args = CliArgs::parse_from(["portfolio-admin", "delete", "projects", "4"]);
        assert_eq!(args.command.route(), "/admin/projects");
        assert_eq!(
            CliArgs::parse_from(["portfolio-admin", "stats"]).command.route(),
            "/admin/dashboard"
        );
    }
}
