//! Shopdesk CLI - migrations, seeding, listing, exports and reports.
//!
//! # Usage
//!
//! ```bash
//! # Run document store migrations
//! shopdesk migrate
//!
//! # Seed the admin's tenant
//! shopdesk seed -f seed.yaml
//!
//! # Print page 2 of in-stock products, most expensive first
//! shopdesk list products -f availability=in_stock --sort price --desc --page 2
//!
//! # Export vendors matching "acme" as a spreadsheet
//! shopdesk export vendors -s acme --format xlsx
//!
//! # Disable two shipping methods
//! shopdesk disable shipping-methods 3f2a... 9b1c...
//!
//! # Sales report as JSON
//! shopdesk report
//! ```
//!
//! The principal comes from `SHOPDESK_ADMIN_EMAIL`; see
//! [`shopdesk_admin::config`] for all variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopdesk_admin::config::AdminConfig;
use shopdesk_admin::error::AdminError;
use shopdesk_admin::export::ExportFormat;
use shopdesk_admin::view::BulkOperation;

mod commands;

use commands::{Context, Target, ViewArgs};

#[derive(Parser)]
#[command(name = "shopdesk")]
#[command(author, version, about = "Shopdesk back office tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    #[command(flatten)]
    Tenant(TenantCommand),
}

/// Commands acting on the admin principal's tenant.
#[derive(Subcommand)]
enum TenantCommand {
    /// Seed the tenant from a YAML file
    Seed {
        /// Path to the seed file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Print one page of a collection
    List {
        #[command(flatten)]
        view: ViewArgs,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (default: `SHOPDESK_PAGE_SIZE`)
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Export the filtered view to the export directory
    Export {
        #[command(flatten)]
        view: ViewArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: FormatArg,
    },
    /// Delete records by identifier
    Delete {
        #[command(flatten)]
        target: Target,

        /// Record identifiers
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Enable records by identifier
    Enable {
        #[command(flatten)]
        target: Target,

        /// Record identifiers
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Disable records by identifier
    Disable {
        #[command(flatten)]
        target: Target,

        /// Record identifiers
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Upload an image and attach it to a product
    AttachImage {
        /// Product identifier
        product_id: String,

        /// Image file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Print the sales report as JSON
    Report,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Delimited text using `SHOPDESK_EXPORT_DELIMITER`
    Csv,
    /// Tab-separated text
    Tsv,
    /// Excel workbook
    Xlsx,
}

impl FormatArg {
    const fn resolve(self, delimiter: char) -> ExportFormat {
        match self {
            Self::Csv => ExportFormat::Delimited(delimiter),
            Self::Tsv => ExportFormat::Delimited('\t'),
            Self::Xlsx => ExportFormat::Spreadsheet,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
///
/// Events carrying a `sentry_event_id` were captured explicitly and only
/// become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    if metadata.fields().field("sentry_event_id").is_some() {
        return sentry_tracing::EventFilter::Breadcrumb;
    }
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

fn subscriber(json: bool) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopdesk=info,shopdesk_admin=info".into());

    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
}

fn init_tracing() {
    subscriber(std::env::var_os("SHOPDESK_LOG_JSON").is_some()).init();
}

/// Log a failed command. Back office errors go through
/// [`AdminError::report`] so backend failures are captured with Sentry.
fn report_failure(error: &(dyn std::error::Error + 'static)) {
    match error.downcast_ref::<AdminError>() {
        Some(admin_error) => admin_error.report(),
        None => tracing::error!("Command failed: {error}"),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Sentry must be up before the subscriber so its layer has a client.
    let config = AdminConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();
    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    let code = match config {
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            2
        }
        Ok(config) => match run(cli, config).await {
            Ok(()) => return,
            Err(e) => {
                report_failure(e.as_ref());
                1
            }
        },
    };

    // Flush pending Sentry events; `exit` skips destructors.
    drop(sentry_guard);
    std::process::exit(code);
}

async fn run(cli: Cli, config: AdminConfig) -> Result<(), Box<dyn std::error::Error>> {
    let command = match cli.command {
        Commands::Migrate => return commands::migrate::run(&config).await,
        Commands::Tenant(command) => command,
    };

    let ctx = Context::connect(config).await?;
    if let Some(principal) = ctx.principal() {
        shopdesk_admin::error::set_sentry_user(principal);
    }

    match command {
        TenantCommand::Seed { file } => commands::seed::run(&ctx, &file).await?,
        TenantCommand::List {
            view,
            page,
            page_size,
        } => commands::records::list(&ctx, &view, page, page_size).await?,
        TenantCommand::Export { view, format } => {
            let format = format.resolve(ctx.config.export_delimiter);
            commands::records::export(&ctx, &view, format).await?;
        }
        TenantCommand::Delete { target, ids } => {
            commands::records::bulk(&ctx, &target, &ids, BulkOperation::Delete).await?;
        }
        TenantCommand::Enable { target, ids } => {
            commands::records::bulk(&ctx, &target, &ids, BulkOperation::SetEnabled(true)).await?;
        }
        TenantCommand::Disable { target, ids } => {
            commands::records::bulk(&ctx, &target, &ids, BulkOperation::SetEnabled(false)).await?;
        }
        TenantCommand::AttachImage { product_id, file } => {
            commands::media::attach_image(&ctx, &product_id, &file).await?;
        }
        TenantCommand::Report => commands::report::run(&ctx).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from([
            "shopdesk", "list", "products", "-f", "category=Home", "--sort", "price", "--desc",
        ])
        .unwrap();
        let Commands::Tenant(TenantCommand::List { view, page, .. }) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(page, 1);
        assert_eq!(view.filters, vec![("category".to_string(), "Home".to_string())]);
        assert!(view.sort_spec().is_some());
    }

    #[test]
    fn test_failures_reach_sentry_once() {
        use shopdesk_admin::db::StoreError;

        let events = sentry::test::with_captured_events(|| {
            tracing::subscriber::with_default(subscriber(false), || {
                report_failure(&AdminError::from(StoreError::Unavailable("offline".into())));
                report_failure(&AdminError::NotAuthenticated);
                tracing::info!("Seeded tenant");
            });
        });
        assert_eq!(events.len(), 2);

        let events = sentry::test::with_captured_events(|| {
            tracing::subscriber::with_default(subscriber(false), || {
                let error: Box<dyn std::error::Error> = "cannot enable vendors".into();
                report_failure(error.as_ref());
            });
        });
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_desc_requires_sort() {
        assert!(Cli::try_parse_from(["shopdesk", "list", "vendors", "--desc"]).is_err());
    }
}
