//! Seed a tenant from a YAML file.
//!
//! The file lists records per collection; customers may carry nested
//! `orders`. See [`shopdesk_admin::seed`] for the format.

use std::path::Path;

use shopdesk_admin::seed::{SeedFile, seed};
use tracing::{error, info};

use super::Context;

/// Seed records from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a record fails
/// validation, or a write fails.
pub async fn run(ctx: &Context, file_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !file_path.exists() {
        return Err(format!("File not found: {}", file_path.display()).into());
    }

    info!(path = %file_path.display(), "Loading seed file");
    let content = tokio::fs::read_to_string(file_path).await?;
    let file = SeedFile::from_yaml(&content)?;

    // Validate before touching the store
    let errors = file.validate();
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let summary = seed(&ctx.store, ctx.principal(), &file).await?;

    info!("Seeding complete!");
    for (collection, count) in &summary.created {
        info!("  {collection}: {count}");
    }
    info!("  Total: {}", summary.total());
    Ok(())
}
