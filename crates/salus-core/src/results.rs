//! Search results view: a full lookup for a navigated query.

use tokio_util::sync::CancellationToken;

use crate::api::ItemLookup;
use crate::models::{Item, ResultsRoute};

/// Shown when a query matched nothing or the lookup failed.
pub const EMPTY_RESULTS_MESSAGE: &str = "No items found";

/// Outcome of loading a results view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsLoad {
    Loaded(Vec<Item>),
    /// The view was torn down before the response arrived
    Cancelled,
}

impl ResultsLoad {
    pub fn items(&self) -> &[Item] {
        match self {
            Self::Loaded(items) => items,
            Self::Cancelled => &[],
        }
    }
}

/// Fetch up to `limit` items for the route's query.
///
/// Transport, status, and payload failures degrade to an empty list and a
/// warning in the log. Cancellation is not logged.
pub async fn load_results<L: ItemLookup>(
    lookup: &L,
    route: &ResultsRoute,
    limit: usize,
    cancel: CancellationToken,
) -> ResultsLoad {
    match lookup.search_items(route.query(), limit, cancel).await {
        Ok(items) => ResultsLoad::Loaded(items),
        Err(error) if error.is_cancelled() => ResultsLoad::Cancelled,
        Err(error) => {
            tracing::warn!("Results lookup for {:?} failed: {}", route.query(), error);
            ResultsLoad::Loaded(Vec::new())
        }
    }
}
