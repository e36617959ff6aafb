//! Line-driven front end for the incremental search controller.

use std::io::Write;

use salus_core::api::ItemLookup;
use salus_core::results::{load_results, ResultsLoad};
use salus_core::search::{
    DismissSignal, Key, PointerTarget, SearchController, SearchEvent, SearchSettings,
};
use salus_core::ResultsRoute;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::commands::common::{format_item_lines, format_suggestion_lines};
use crate::error::CliError;

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    /// New contents of the search box
    Text(String),
    Submit,
    Select(usize),
    Escape,
    ClickOutside,
    Quit,
}

impl SessionInput {
    pub fn parse(line: &str) -> Result<Self, String> {
        let Some(command) = line.trim().strip_prefix('/') else {
            return Ok(Self::Text(line.to_string()));
        };
        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("submit"), None) => Ok(Self::Submit),
            (Some("esc"), None) => Ok(Self::Escape),
            (Some("outside"), None) => Ok(Self::ClickOutside),
            (Some("quit"), None) => Ok(Self::Quit),
            (Some("select"), Some(index)) => index
                .parse::<usize>()
                .ok()
                .filter(|index| *index > 0)
                .map(Self::Select)
                .ok_or_else(|| format!("Invalid suggestion number: {index}")),
            _ => Err(format!("Unknown command: /{command}")),
        }
    }
}

/// Forward stdin lines into a channel until EOF.
pub fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(error) => {
                    tracing::error!("Failed to read stdin: {}", error);
                    break;
                }
            }
        }
    });
    rx
}

/// Run a suggestion session until `/quit` or the input closes.
///
/// Suggestions are printed whenever the dropdown content changes. Selecting
/// or submitting prints the results route, then the loaded items once they
/// arrive. A newer navigation or leaving the session cancels the load.
pub async fn run_suggest_session<L, W>(
    lookup: L,
    settings: SearchSettings,
    mut lines: mpsc::UnboundedReceiver<String>,
    out: &mut W,
) -> Result<(), CliError>
where
    L: ItemLookup + Clone,
    W: Write,
{
    let (dismiss_tx, dismiss_rx) = mpsc::unbounded_channel();
    let (controller, mut events) =
        SearchController::spawn(lookup.clone(), settings, Some(dismiss_rx));
    let handle = controller.handle().clone();
    let (results_tx, mut results_rx) = mpsc::unbounded_channel();
    let mut results: Option<ResultsTask> = None;
    let mut next_results_id = 0_u64;
    // Text the next `/submit` confirms; a selection replaces it.
    let mut text = String::new();

    let outcome: Result<(), CliError> = async {
        loop {
            tokio::select! {
                line = lines.recv() => {
                    let Some(line) = line else { break };
                    match SessionInput::parse(&line) {
                        Ok(SessionInput::Text(value)) => {
                            text.clone_from(&value);
                            handle.input_changed(value)?;
                        }
                        Ok(SessionInput::Submit) => handle.submit(text.clone())?,
                        Ok(SessionInput::Select(index)) => {
                            let snapshot = handle.snapshot();
                            match snapshot.suggestions.get(index - 1) {
                                Some(item) if snapshot.visible => {
                                    text.clone_from(&item.name);
                                    handle.select(item.clone())?;
                                }
                                _ => writeln!(out, "No suggestion #{index}")?,
                            }
                        }
                        Ok(SessionInput::Escape) => {
                            dismiss(&dismiss_tx, DismissSignal::KeyDown(Key::Escape));
                        }
                        Ok(SessionInput::ClickOutside) => {
                            dismiss(&dismiss_tx, DismissSignal::PointerDown(PointerTarget::Outside));
                        }
                        Ok(SessionInput::Quit) => break,
                        Err(message) => writeln!(out, "{message}")?,
                    }
                }
                event = events.recv() => {
                    let Some(event) = event else { break };
                    match event {
                        SearchEvent::SuggestionsUpdated { suggestions, .. } => {
                            for line in format_suggestion_lines(&suggestions) {
                                writeln!(out, "{line}")?;
                            }
                        }
                        SearchEvent::Navigate(route) => {
                            writeln!(out, "{route}")?;
                            if let Some(previous) = results.take() {
                                previous.cancel.cancel();
                            }
                            next_results_id += 1;
                            results = Some(ResultsTask::spawn(
                                next_results_id,
                                lookup.clone(),
                                route,
                                settings.suggestion_limit,
                                results_tx.clone(),
                            ));
                        }
                        SearchEvent::LookupIssued { request_id, query } => {
                            tracing::debug!("Lookup #{} for {:?}", request_id, query);
                        }
                        SearchEvent::LookupFailed { query, error } => {
                            tracing::debug!("Suggestions for {:?} unavailable: {}", query, error);
                        }
                        SearchEvent::Dismissed => {}
                    }
                }
                Some(finished) = results_rx.recv() => {
                    // A superseded load may still report before it sees its token.
                    if results.as_ref().map(|task| task.id) != Some(finished.id) {
                        continue;
                    }
                    results = None;
                    if let ResultsLoad::Loaded(items) = finished.load {
                        tracing::debug!("Loaded {} results for {}", items.len(), finished.route);
                        for line in format_item_lines(&items) {
                            writeln!(out, "{line}")?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
    .await;

    if let Some(task) = results.take() {
        task.cancel.cancel();
        if let Err(error) = task.join.await {
            tracing::debug!("Results task ended abnormally: {}", error);
        }
    }
    controller.shutdown().await;
    outcome
}

struct FinishedResults {
    id: u64,
    route: ResultsRoute,
    load: ResultsLoad,
}

/// A results load running beside the session loop.
struct ResultsTask {
    id: u64,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl ResultsTask {
    fn spawn<L: ItemLookup>(
        id: u64,
        lookup: L,
        route: ResultsRoute,
        limit: usize,
        finished: mpsc::UnboundedSender<FinishedResults>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let join = tokio::spawn(async move {
            let load = load_results(&lookup, &route, limit, token).await;
            if finished.send(FinishedResults { id, route, load }).is_err() {
                tracing::debug!("Results arrived after the session ended");
            }
        });
        Self { id, cancel, join }
    }
}

fn dismiss(sender: &mpsc::UnboundedSender<DismissSignal>, signal: DismissSignal) {
    if sender.send(signal).is_err() {
        tracing::debug!("Dismissal dropped; controller already stopped");
    }
}
