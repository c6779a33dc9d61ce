//! Command implementations and the shared command context.

pub mod media;
pub mod migrate;
pub mod records;
pub mod report;
pub mod seed;

use clap::{Args, ValueEnum};

use shopdesk_admin::components::{FilterSet, SortSpec};
use shopdesk_admin::config::AdminConfig;
use shopdesk_admin::db::AnyStore;
use shopdesk_admin::services::{IdentityProvider, StaticIdentity};
use shopdesk_core::Principal;

/// Everything a command needs: configuration, an open store and the
/// principal to act as.
pub struct Context {
    pub config: AdminConfig,
    pub store: AnyStore,
    pub principal: Option<Principal>,
}

impl Context {
    /// Open the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    pub async fn connect(config: AdminConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = config.connect_store().await?;
        if matches!(store, AnyStore::Memory(_)) {
            tracing::warn!("Using the in-memory store; nothing persists past this command");
        }
        if config.admin.is_none() {
            tracing::warn!("SHOPDESK_ADMIN_EMAIL not set; tenant commands will be rejected");
        }
        let principal = StaticIdentity::new(config.admin.clone()).current_principal();
        Ok(Self {
            config,
            store,
            principal,
        })
    }

    pub const fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }
}

/// Entity collections reachable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityKind {
    Products,
    Customers,
    Categories,
    Coupons,
    Vendors,
    /// Orders of one customer (requires `--customer`)
    Orders,
    PaymentMethods,
    ShippingMethods,
    ShippingRegions,
}

/// Which collection to act on.
#[derive(Debug, Clone, Args)]
pub struct Target {
    /// Entity collection
    #[arg(value_enum)]
    pub entity: EntityKind,

    /// Customer owning the orders (orders only)
    #[arg(long)]
    pub customer: Option<String>,
}

/// Filtering and ordering of a list view.
#[derive(Debug, Clone, Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub target: Target,

    /// Case-insensitive text search over the searchable fields
    #[arg(short, long)]
    pub search: Option<String>,

    /// Equality filter, `key=value` (repeatable)
    #[arg(short, long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Column key to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl ViewArgs {
    pub fn filter_set(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        if let Some(search) = &self.search {
            filters = filters.search(search);
        }
        for (key, value) in &self.filters {
            filters = filters.equals(key, value);
        }
        filters
    }

    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort.as_deref().map(|key| {
            if self.desc {
                SortSpec::descending(key)
            } else {
                SortSpec::ascending(key)
            }
        })
    }
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("expected key=value, got {raw}"))
}

/// Run `$body` with `$accessor` bound to a [`CollectionAccessor`] of the
/// entity selected by `$target`.
///
/// [`CollectionAccessor`]: shopdesk_admin::accessor::CollectionAccessor
macro_rules! with_accessor {
    ($ctx:expr, $target:expr, |$accessor:ident| $body:expr) => {{
        use shopdesk_admin::accessor::CollectionAccessor;
        use shopdesk_admin::models::*;
        use $crate::commands::EntityKind;

        let store = $ctx.store.clone();
        match $target.entity {
            EntityKind::Products => {
                let $accessor = CollectionAccessor::<_, Product>::new(store);
                $body
            }
            EntityKind::Customers => {
                let $accessor = CollectionAccessor::<_, Customer>::new(store);
                $body
            }
            EntityKind::Categories => {
                let $accessor = CollectionAccessor::<_, Category>::new(store);
                $body
            }
            EntityKind::Coupons => {
                let $accessor = CollectionAccessor::<_, Coupon>::new(store);
                $body
            }
            EntityKind::Vendors => {
                let $accessor = CollectionAccessor::<_, Vendor>::new(store);
                $body
            }
            EntityKind::Orders => {
                let customer = $target
                    .customer
                    .clone()
                    .ok_or("--customer is required for orders")?;
                let $accessor = CollectionAccessor::<_, Order>::nested::<Customer>(
                    store,
                    shopdesk_core::DocumentId::new(customer),
                );
                $body
            }
            EntityKind::PaymentMethods => {
                let $accessor = CollectionAccessor::<_, PaymentMethod>::new(store);
                $body
            }
            EntityKind::ShippingMethods => {
                let $accessor = CollectionAccessor::<_, ShippingMethod>::new(store);
                $body
            }
            EntityKind::ShippingRegions => {
                let $accessor = CollectionAccessor::<_, ShippingRegion>::new(store);
                $body
            }
        }
    }};
}

pub(crate) use with_accessor;
