//! List, export and bulk commands over any entity collection.

use shopdesk_admin::AdminError;
use shopdesk_admin::accessor::CollectionAccessor;
use shopdesk_admin::db::AnyStore;
use shopdesk_admin::export::{ExportFormat, to_delimited_text};
use shopdesk_admin::models::Entity;
use shopdesk_admin::services::{DirectorySink, FileSink};
use shopdesk_admin::view::{BulkOperation, BulkReport, BulkSelection, ListViewModel};
use shopdesk_core::DocumentId;
use tracing::info;

use super::{Context, Target, ViewArgs, with_accessor};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

async fn load_view<T: Entity>(
    ctx: &Context,
    accessor: CollectionAccessor<AnyStore, T>,
    args: &ViewArgs,
) -> Result<ListViewModel<AnyStore, T>, Box<dyn std::error::Error>> {
    let mut list = ListViewModel::new(accessor, ctx.principal.clone());
    let loaded = list.load().await?;
    list.set_filter(args.filter_set());
    list.set_sort(args.sort_spec());
    info!(collection = T::COLLECTION, loaded, "Loaded records");
    Ok(list)
}

/// Print one page of the filtered view as tab-separated text.
///
/// # Errors
///
/// Returns an error if the collection cannot be loaded.
pub async fn list(ctx: &Context, args: &ViewArgs, page: usize, page_size: Option<usize>) -> CommandResult {
    let page_size = page_size.unwrap_or(ctx.config.page_size);
    with_accessor!(ctx, &args.target, |accessor| {
        print_page(&load_view(ctx, accessor, args).await?, page, page_size);
    });
    Ok(())
}

fn print_page<T: Entity>(list: &ListViewModel<AnyStore, T>, page: usize, page_size: usize) {
    let page = list.paginate(page_size, page);
    let mut columns = vec![shopdesk_admin::components::TableColumn::new("id", "ID")];
    columns.extend(T::COLUMNS.iter().filter(|c| c.key != "id").copied());

    #[allow(clippy::print_stdout)]
    {
        print!("{}", to_delimited_text(&page.items, &columns, '\t'));
    }
    info!(
        page = page.page,
        total_pages = page.total_pages,
        total_items = page.total_items,
        "Page {} of {}",
        page.page,
        page.total_pages
    );
}

/// Render the filtered view and save it to the export directory.
///
/// # Errors
///
/// Returns an error if loading, rendering or writing fails.
pub async fn export(ctx: &Context, args: &ViewArgs, format: ExportFormat) -> CommandResult {
    let file = with_accessor!(ctx, &args.target, |accessor| {
        load_view(ctx, accessor, args).await?.export(format)?
    });
    let path = DirectorySink::new(&ctx.config.export_dir)
        .save(&file)
        .await?;
    info!(path = %path.display(), "Export written");
    Ok(())
}

/// Refuses operations that do not apply to `T` before touching any record.
async fn apply_selected<T: Entity>(
    ctx: &Context,
    accessor: CollectionAccessor<AnyStore, T>,
    selection: &mut BulkSelection,
    operation: &BulkOperation,
) -> Result<BulkReport, AdminError> {
    if !operation.applies_to::<T>() {
        return Err(AdminError::Unsupported {
            operation: operation.name(),
            collection: T::COLLECTION,
        });
    }
    let mut list = ListViewModel::new(accessor, ctx.principal.clone());
    Ok(selection.apply(&mut list, operation).await)
}

/// Apply a bulk operation to the given identifiers.
///
/// # Errors
///
/// Returns an error when any record failed; the others are still applied.
/// Operations that do not apply to the collection are refused up front.
pub async fn bulk(ctx: &Context, target: &Target, ids: &[String], operation: BulkOperation) -> CommandResult {
    let mut selection = BulkSelection::new();
    for id in ids {
        selection.toggle(&DocumentId::new(id.as_str()));
    }

    let report = with_accessor!(ctx, target, |accessor| {
        apply_selected(ctx, accessor, &mut selection, &operation).await?
    });

    info!(succeeded = report.succeeded.len(), "Bulk operation finished");
    if report.is_success() {
        Ok(())
    } else {
        for failure in &report.failed {
            let _span = tracing::error_span!("bulk_record", id = %failure.id).entered();
            failure.error.report();
        }
        Err(format!("{} of {} records failed", report.failed.len(), ids.len()).into())
    }
}
