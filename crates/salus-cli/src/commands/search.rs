use salus_core::api::ItemLookup;
use salus_core::results::{load_results, ResultsLoad};
use tokio_util::sync::CancellationToken;

use crate::commands::common::{format_item_lines, normalize_search_query, CliContext};
use crate::error::CliError;

pub async fn run_search(
    query: &[String],
    limit: Option<usize>,
    as_json: bool,
    context: &CliContext,
) -> Result<(), CliError> {
    let client = context.client()?;
    let limit = limit.unwrap_or(context.config.suggestion_limit);
    let lines = search_lines(&client, query, limit, as_json).await?;
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

pub async fn search_lines<L: ItemLookup>(
    lookup: &L,
    query: &[String],
    limit: usize,
    as_json: bool,
) -> Result<Vec<String>, CliError> {
    let route = normalize_search_query(query)?;
    tracing::debug!("Opening results view {}", route);

    let items = match load_results(lookup, &route, limit, CancellationToken::new()).await {
        ResultsLoad::Loaded(items) => items,
        ResultsLoad::Cancelled => Vec::new(),
    };

    if as_json {
        Ok(vec![serde_json::to_string_pretty(&items)?])
    } else {
        Ok(format_item_lines(&items))
    }
}
