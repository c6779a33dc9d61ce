//! Sales report command.

use shopdesk_admin::reports::SalesReport;
use shopdesk_admin::services::CustomerOrders;
use tracing::info;

use super::Context;

/// Print the sales report over all orders as JSON.
///
/// # Errors
///
/// Returns an error if orders cannot be loaded.
pub async fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let orders = CustomerOrders::new(ctx.store.clone())
        .all_orders(ctx.principal())
        .await?;
    let report = SalesReport::from_orders(&orders);
    info!(orders = report.order_count, "Report generated");

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
