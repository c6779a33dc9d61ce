//! Sales report over a set of orders.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;

use shopdesk_core::OrderStatus;

use crate::models::{Order, Record};

/// How many line items [`SalesReport::top_items`] keeps.
pub const TOP_ITEMS: usize = 5;

/// Units and revenue for one product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSales {
    pub name: String,
    pub quantity: u64,
    pub revenue: Decimal,
}

/// Aggregates over a set of orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesReport {
    pub order_count: usize,
    /// Orders per status; every status is present, possibly with zero.
    pub by_status: BTreeMap<OrderStatus, usize>,
    /// Sum of totals of paid orders.
    pub paid_revenue: Decimal,
    /// Sum of totals of unpaid orders.
    pub outstanding: Decimal,
    /// Mean order total, `None` without orders.
    pub average_order_value: Option<Decimal>,
    /// Best sellers by quantity, then name.
    pub top_items: Vec<ItemSales>,
}

impl SalesReport {
    /// Build the report from loaded order records.
    ///
    /// Sums saturate at the bounds of [`Decimal`] rather than overflow.
    #[must_use]
    pub fn from_orders(orders: &[Record<Order>]) -> Self {
        let mut by_status: BTreeMap<OrderStatus, usize> =
            OrderStatus::ALL.iter().map(|status| (*status, 0)).collect();
        let mut paid_revenue = Decimal::ZERO;
        let mut outstanding = Decimal::ZERO;
        let mut items: HashMap<&str, ItemSales> = HashMap::new();

        for Record { data: order, .. } in orders {
            *by_status.entry(order.status).or_default() += 1;
            if order.paid {
                paid_revenue = paid_revenue.saturating_add(order.total);
            } else {
                outstanding = outstanding.saturating_add(order.total);
            }
            for item in &order.items {
                let entry = items.entry(item.name.as_str()).or_insert_with(|| ItemSales {
                    name: item.name.clone(),
                    quantity: 0,
                    revenue: Decimal::ZERO,
                });
                entry.quantity = entry.quantity.saturating_add(u64::from(item.quantity));
                entry.revenue = entry.revenue.saturating_add(item.subtotal());
            }
        }

        let average_order_value = u64::try_from(orders.len())
            .ok()
            .filter(|count| *count > 0)
            .map(|count| {
                (paid_revenue.saturating_add(outstanding) / Decimal::from(count)).round_dp(2)
            });

        let mut top_items: Vec<ItemSales> = items.into_values().collect();
        top_items.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
        top_items.truncate(TOP_ITEMS);

        Self {
            order_count: orders.len(),
            by_status,
            paid_revenue,
            outstanding,
            average_order_value,
            top_items,
        }
    }
}
