//! Product image upload command.

use std::path::Path;

use shopdesk_admin::services::{Blob, FsBlobStore, ProductImages};
use shopdesk_core::DocumentId;
use tracing::info;

use super::Context;

/// Upload an image file and attach it to a product.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the product does not exist
/// or the upload fails.
pub async fn attach_image(
    ctx: &Context,
    product_id: &str,
    file_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = tokio::fs::read(file_path).await?;
    let file_name = file_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let blob = Blob::new(bytes, content_type(file_name), file_name);

    let images = ProductImages::new(ctx.store.clone(), FsBlobStore::new(&ctx.config.blob_dir));
    let reference = images
        .attach(ctx.principal(), &DocumentId::new(product_id), blob)
        .await?;
    info!(image = %reference, "Image attached");
    Ok(())
}

fn content_type(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
