//! Actor that owns the incremental search state.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{DismissSignal, LookupPhase, SearchEvent, SearchSettings, SearchSnapshot};
use crate::api::{ApiResult, ItemLookup};
use crate::error::{Error, Result};
use crate::models::{Item, ResultsRoute};

enum Command {
    InputChanged(String),
    Submit(String),
    Select(Item),
    Dismiss,
    Teardown,
}

struct LookupOutcome {
    request_id: u64,
    query: String,
    result: ApiResult<Vec<Item>>,
}

/// Internal phase. At most one timer and one request exist at a time.
enum Phase {
    Idle,
    Pending {
        deadline: Instant,
        query: String,
    },
    InFlight {
        request_id: u64,
        query: String,
        cancel: CancellationToken,
    },
    Cancelled,
}

impl Phase {
    const fn public(&self) -> LookupPhase {
        match self {
            Self::Idle => LookupPhase::Idle,
            Self::Pending { .. } => LookupPhase::Pending,
            Self::InFlight { .. } => LookupPhase::InFlight,
            Self::Cancelled => LookupPhase::Cancelled,
        }
    }

    const fn deadline(&self) -> Option<Instant> {
        match self {
            Self::Pending { deadline, .. } => Some(*deadline),
            _ => None,
        }
    }
}

/// Cheap, cloneable sender side of a running controller.
#[derive(Clone)]
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<SearchSnapshot>,
}

impl SearchHandle {
    /// The input text changed. Restarts the debounce window.
    pub fn input_changed(&self, text: impl Into<String>) -> Result<()> {
        self.send(Command::InputChanged(text.into()))
    }

    /// Explicit confirmation of `text`. Blank text is ignored.
    pub fn submit(&self, text: impl Into<String>) -> Result<()> {
        self.send(Command::Submit(text.into()))
    }

    pub fn select(&self, item: Item) -> Result<()> {
        self.send(Command::Select(item))
    }

    /// Hide the dropdown, keeping text and suggestions.
    pub fn dismiss(&self) -> Result<()> {
        self.send(Command::Dismiss)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.snapshot.borrow().clone()
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| Error::ControllerClosed)
    }
}

/// A running incremental search controller.
///
/// Dropping the controller tears it down: any pending timer and in-flight
/// lookup are cancelled.
pub struct SearchController {
    handle: SearchHandle,
    task: Option<JoinHandle<()>>,
}

impl SearchController {
    /// Start a controller on the current tokio runtime.
    ///
    /// `lookup` carries the auth token it was built with. `dismissals` is the
    /// source of pointer and key events that may close the dropdown.
    pub fn spawn<L: ItemLookup>(
        lookup: L,
        settings: SearchSettings,
        dismissals: Option<mpsc::UnboundedReceiver<DismissSignal>>,
    ) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(SearchSnapshot::default());

        let actor = SearchActor {
            lookup: Arc::new(lookup),
            settings,
            phase: Phase::Idle,
            text: String::new(),
            suggestions: Vec::new(),
            visible: false,
            next_request_id: 0,
            outcome_tx,
            snapshot_tx,
            event_tx,
        };
        let task = tokio::spawn(actor.run(command_rx, outcome_rx, dismissals));

        let controller = Self {
            handle: SearchHandle {
                commands: command_tx,
                snapshot: snapshot_rx,
            },
            task: Some(task),
        };
        (controller, event_rx)
    }

    pub const fn handle(&self) -> &SearchHandle {
        &self.handle
    }

    /// Tear down and wait for the controller task to finish.
    pub async fn shutdown(mut self) {
        let _ = self.handle.send(Command::Teardown);
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                tracing::error!("Search controller task failed: {}", error);
            }
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.handle.send(Command::Teardown);
        }
    }
}

struct SearchActor<L> {
    lookup: Arc<L>,
    settings: SearchSettings,
    phase: Phase,
    text: String,
    suggestions: Vec<Item>,
    visible: bool,
    next_request_id: u64,
    outcome_tx: mpsc::UnboundedSender<LookupOutcome>,
    snapshot_tx: watch::Sender<SearchSnapshot>,
    event_tx: mpsc::UnboundedSender<SearchEvent>,
}

enum Flow {
    Continue,
    Stop,
}

impl<L: ItemLookup> SearchActor<L> {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut outcomes: mpsc::UnboundedReceiver<LookupOutcome>,
        mut dismissals: Option<mpsc::UnboundedReceiver<DismissSignal>>,
    ) {
        loop {
            let deadline = self.phase.deadline();
            let listening_for_dismissals = dismissals.is_some();

            let flow = tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => {
                        self.teardown();
                        Flow::Stop
                    }
                },
                signal = recv_dismissal(&mut dismissals), if listening_for_dismissals => {
                    match signal {
                        Some(signal) if signal.dismisses() => self.dismiss(),
                        Some(_) => {}
                        None => dismissals = None,
                    }
                    Flow::Continue
                }
                () = sleep_until(deadline), if deadline.is_some() => {
                    self.fire_timer();
                    Flow::Continue
                }
                Some(outcome) = outcomes.recv() => {
                    self.apply_outcome(outcome);
                    Flow::Continue
                }
            };

            self.publish();
            if matches!(flow, Flow::Stop) {
                break;
            }
        }

        tracing::debug!("Search controller stopped");
    }

    fn handle_command(&mut self, command: Command) -> Flow {
        if matches!(self.phase, Phase::Cancelled) {
            return Flow::Stop;
        }

        match command {
            Command::InputChanged(text) => self.input_changed(text),
            Command::Submit(text) => self.submit(&text),
            Command::Select(item) => self.select(item),
            Command::Dismiss => self.dismiss(),
            Command::Teardown => {
                self.teardown();
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    fn input_changed(&mut self, text: String) {
        self.cancel_activity();

        if self.settings.qualifies(&text) {
            self.visible = !self.suggestions.is_empty();
            self.phase = Phase::Pending {
                deadline: Instant::now() + self.settings.debounce,
                query: text.clone(),
            };
        } else {
            self.suggestions.clear();
            self.visible = false;
        }
        self.text = text;
    }

    fn fire_timer(&mut self) {
        let Phase::Pending { query, .. } = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return;
        };

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        let cancel = CancellationToken::new();

        let lookup = Arc::clone(&self.lookup);
        let outcome_tx = self.outcome_tx.clone();
        let limit = self.settings.suggestion_limit;
        let task_query = query.clone();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let result = lookup.search_items(&task_query, limit, task_cancel).await;
            let _ = outcome_tx.send(LookupOutcome {
                request_id,
                query: task_query,
                result,
            });
        });

        tracing::debug!("Issued lookup #{} for {:?}", request_id, query);
        self.emit(SearchEvent::LookupIssued {
            request_id,
            query: query.clone(),
        });
        self.phase = Phase::InFlight {
            request_id,
            query,
            cancel,
        };
    }

    fn apply_outcome(&mut self, outcome: LookupOutcome) {
        let current = match &self.phase {
            Phase::InFlight {
                request_id, cancel, ..
            } => *request_id == outcome.request_id && !cancel.is_cancelled(),
            _ => false,
        };
        if !current {
            return;
        }
        self.phase = Phase::Idle;

        match outcome.result {
            Ok(items) => {
                self.visible = !items.is_empty();
                self.suggestions = items;
                self.emit(SearchEvent::SuggestionsUpdated {
                    query: outcome.query,
                    suggestions: self.suggestions.clone(),
                });
            }
            Err(error) if error.is_cancelled() => {}
            Err(error) => {
                tracing::warn!("Lookup for {:?} failed: {}", outcome.query, error);
                self.suggestions.clear();
                self.visible = false;
                self.emit(SearchEvent::LookupFailed {
                    query: outcome.query,
                    error: error.to_string(),
                });
            }
        }
    }

    fn submit(&mut self, text: &str) {
        let Some(route) = ResultsRoute::for_query(text) else {
            return;
        };
        self.navigate(route);
    }

    fn select(&mut self, item: Item) {
        self.text = item.name;
        if let Some(route) = ResultsRoute::for_query(&self.text) {
            self.navigate(route);
        } else {
            self.cancel_activity();
            self.visible = false;
        }
    }

    fn navigate(&mut self, route: ResultsRoute) {
        self.cancel_activity();
        self.visible = false;
        tracing::debug!("Navigating to {}", route);
        self.emit(SearchEvent::Navigate(route));
    }

    fn dismiss(&mut self) {
        self.visible = false;
        self.emit(SearchEvent::Dismissed);
    }

    fn teardown(&mut self) {
        self.cancel_activity();
        self.phase = Phase::Cancelled;
    }

    /// Drop the pending timer and signal cancellation to the in-flight request.
    fn cancel_activity(&mut self) {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::InFlight {
                request_id,
                query,
                cancel,
            } => {
                tracing::debug!("Cancelling lookup #{} for {:?}", request_id, query);
                cancel.cancel();
            }
            Phase::Cancelled => self.phase = Phase::Cancelled,
            Phase::Idle | Phase::Pending { .. } => {}
        }
    }

    fn publish(&self) {
        let snapshot = SearchSnapshot {
            text: self.text.clone(),
            suggestions: self.suggestions.clone(),
            visible: self.visible,
            loading: matches!(self.phase, Phase::InFlight { .. }),
            phase: self.phase.public(),
        };
        self.snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    fn emit(&self, event: SearchEvent) {
        let _ = self.event_tx.send(event);
    }
}

async fn recv_dismissal(
    dismissals: &mut Option<mpsc::UnboundedReceiver<DismissSignal>>,
) -> Option<DismissSignal> {
    match dismissals {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tokio::time::sleep;

    use super::*;
    use crate::api::ApiError;
    use crate::search::{Key, PointerTarget};

    #[derive(Clone)]
    enum Scripted {
        Items(Duration, Vec<Item>),
        Status(Duration, u16),
        Malformed,
    }

    #[derive(Default)]
    struct FakeState {
        calls: Mutex<Vec<String>>,
        cancelled: Mutex<Vec<String>>,
        responses: Mutex<HashMap<String, Scripted>>,
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    #[derive(Clone, Default)]
    struct FakeLookup {
        state: Arc<FakeState>,
    }

    impl FakeLookup {
        fn respond(&self, query: &str, scripted: Scripted) {
            self.state
                .responses
                .lock()
                .unwrap()
                .insert(query.to_string(), scripted);
        }

        fn calls(&self) -> Vec<String> {
            self.state.calls.lock().unwrap().clone()
        }

        fn cancelled(&self) -> Vec<String> {
            self.state.cancelled.lock().unwrap().clone()
        }

        fn max_active(&self) -> usize {
            self.state.max_active.load(Ordering::SeqCst)
        }
    }

    impl ItemLookup for FakeLookup {
        fn search_items(
            &self,
            name: &str,
            _limit: usize,
            cancel: CancellationToken,
        ) -> impl Future<Output = ApiResult<Vec<Item>>> + Send {
            let state = Arc::clone(&self.state);
            let name = name.to_string();
            async move {
                state.calls.lock().unwrap().push(name.clone());
                let active = state.active.fetch_add(1, Ordering::SeqCst) + 1;
                state.max_active.fetch_max(active, Ordering::SeqCst);

                let scripted = state
                    .responses
                    .lock()
                    .unwrap()
                    .get(&name)
                    .cloned()
                    .unwrap_or(Scripted::Items(Duration::ZERO, Vec::new()));
                let (delay, result) = match scripted {
                    Scripted::Items(delay, items) => (delay, Ok(items)),
                    Scripted::Status(delay, status) => (
                        delay,
                        Err(ApiError::Status {
                            status,
                            message: None,
                        }),
                    ),
                    Scripted::Malformed => (
                        Duration::ZERO,
                        Err(ApiError::MalformedPayload("not json".to_string())),
                    ),
                };

                let outcome = tokio::select! {
                    () = cancel.cancelled() => {
                        state.cancelled.lock().unwrap().push(name);
                        Err(ApiError::Cancelled)
                    }
                    () = sleep(delay) => result,
                };
                state.active.fetch_sub(1, Ordering::SeqCst);
                outcome
            }
        }
    }

    fn paracetamol() -> Item {
        Item::new("PARACETAMOL", "A1", "X")
    }

    fn drain(events: &mut mpsc::UnboundedReceiver<SearchEvent>) -> Vec<SearchEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = events.try_recv() {
            drained.push(event);
        }
        drained
    }

    fn spawn(
        lookup: &FakeLookup,
    ) -> (
        SearchController,
        mpsc::UnboundedReceiver<SearchEvent>,
        mpsc::UnboundedSender<DismissSignal>,
    ) {
        let (dismiss_tx, dismiss_rx) = mpsc::unbounded_channel();
        let (controller, events) =
            SearchController::spawn(lookup.clone(), SearchSettings::default(), Some(dismiss_rx));
        (controller, events, dismiss_tx)
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_issues_no_lookup() {
        let lookup = FakeLookup::default();
        let (controller, mut events, _dismiss) = spawn(&lookup);

        controller.handle().input_changed("par").unwrap();
        sleep(Duration::from_millis(1_000)).await;

        let snapshot = controller.handle().snapshot();
        assert_eq!(snapshot.text, "par");
        assert!(snapshot.suggestions.is_empty());
        assert!(!snapshot.visible);
        assert!(lookup.calls().is_empty());
        assert!(drain(&mut events).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn qualifying_query_fires_one_lookup_after_debounce() {
        let lookup = FakeLookup::default();
        lookup.respond("para", Scripted::Items(Duration::ZERO, vec![paracetamol()]));
        let (controller, mut events, _dismiss) = spawn(&lookup);

        controller.handle().input_changed("par").unwrap();
        controller.handle().input_changed("para").unwrap();
        sleep(Duration::from_millis(250)).await;
        assert!(lookup.calls().is_empty(), "debounce window has not elapsed");
        assert_eq!(controller.handle().snapshot().phase, LookupPhase::Pending);

        sleep(Duration::from_millis(100)).await;
        assert_eq!(lookup.calls(), vec!["para".to_string()]);

        let snapshot = controller.handle().snapshot();
        assert!(snapshot.visible);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.phase, LookupPhase::Idle);
        let labels = snapshot
            .suggestions
            .iter()
            .map(Item::suggestion_label)
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["PARACETAMOL — A1".to_string()]);

        assert_eq!(
            drain(&mut events),
            vec![
                SearchEvent::LookupIssued {
                    request_id: 1,
                    query: "para".to_string()
                },
                SearchEvent::SuggestionsUpdated {
                    query: "para".to_string(),
                    suggestions: vec![paracetamol()]
                },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_collapse_into_final_text() {
        let lookup = FakeLookup::default();
        let (controller, _events, _dismiss) = spawn(&lookup);

        for text in ["para", "parac", "parace", "paracet"] {
            controller.handle().input_changed(text).unwrap();
            sleep(Duration::from_millis(120)).await;
        }
        assert!(lookup.calls().is_empty());

        sleep(Duration::from_millis(400)).await;
        assert_eq!(lookup.calls(), vec!["paracet".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_keystroke_cancels_in_flight_lookup() {
        let lookup = FakeLookup::default();
        lookup.respond(
            "para",
            Scripted::Items(Duration::from_millis(1_000), vec![paracetamol()]),
        );
        let paraffin = Item::new("PARAFFIN OIL", "B4", "Y");
        lookup.respond(
            "paraf",
            Scripted::Items(Duration::from_millis(10), vec![paraffin.clone()]),
        );
        let (controller, _events, _dismiss) = spawn(&lookup);

        controller.handle().input_changed("para").unwrap();
        sleep(Duration::from_millis(350)).await;
        let snapshot = controller.handle().snapshot();
        assert!(snapshot.loading);
        assert_eq!(snapshot.phase, LookupPhase::InFlight);

        controller.handle().input_changed("paraf").unwrap();
        sleep(Duration::from_millis(400)).await;
        assert_eq!(lookup.cancelled(), vec!["para".to_string()]);
        assert_eq!(controller.handle().snapshot().suggestions, vec![paraffin.clone()]);

        sleep(Duration::from_millis(2_000)).await;
        assert_eq!(controller.handle().snapshot().suggestions, vec![paraffin]);
        assert_eq!(lookup.calls(), vec!["para".to_string(), "paraf".to_string()]);
        assert_eq!(lookup.max_active(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shrinking_below_threshold_clears_suggestions() {
        let lookup = FakeLookup::default();
        lookup.respond("para", Scripted::Items(Duration::ZERO, vec![paracetamol()]));
        let (controller, _events, _dismiss) = spawn(&lookup);

        controller.handle().input_changed("para").unwrap();
        sleep(Duration::from_millis(350)).await;
        assert!(controller.handle().snapshot().visible);

        controller.handle().input_changed("pa ").unwrap();
        sleep(Duration::from_millis(10)).await;
        let snapshot = controller.handle().snapshot();
        assert_eq!(snapshot.text, "pa ");
        assert!(snapshot.suggestions.is_empty());
        assert!(!snapshot.visible);
        assert_eq!(snapshot.phase, LookupPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn server_error_degrades_to_empty_suggestions() {
        let lookup = FakeLookup::default();
        lookup.respond("para", Scripted::Status(Duration::ZERO, 500));
        let (controller, mut events, _dismiss) = spawn(&lookup);

        controller.handle().input_changed("para").unwrap();
        sleep(Duration::from_millis(350)).await;

        let snapshot = controller.handle().snapshot();
        assert!(snapshot.suggestions.is_empty());
        assert!(!snapshot.visible);
        assert!(!snapshot.loading);

        let failures = drain(&mut events)
            .into_iter()
            .filter(|event| matches!(event, SearchEvent::LookupFailed { .. }))
            .collect::<Vec<_>>();
        assert_eq!(failures.len(), 1);
        let SearchEvent::LookupFailed { query, error } = &failures[0] else {
            unreachable!();
        };
        assert_eq!(query, "para");
        assert!(error.contains("HTTP 500"));
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_payload_replaces_previous_suggestions() {
        let lookup = FakeLookup::default();
        lookup.respond("para", Scripted::Items(Duration::ZERO, vec![paracetamol()]));
        lookup.respond("parax", Scripted::Malformed);
        let (controller, _events, _dismiss) = spawn(&lookup);

        controller.handle().input_changed("para").unwrap();
        sleep(Duration::from_millis(350)).await;
        controller.handle().input_changed("parax").unwrap();
        sleep(Duration::from_millis(350)).await;

        let snapshot = controller.handle().snapshot();
        assert!(snapshot.suggestions.is_empty());
        assert!(!snapshot.visible);
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_suggestion_fills_input_and_navigates() {
        let lookup = FakeLookup::default();
        lookup.respond("para", Scripted::Items(Duration::ZERO, vec![paracetamol()]));
        let (controller, mut events, _dismiss) = spawn(&lookup);

        controller.handle().input_changed("para").unwrap();
        sleep(Duration::from_millis(350)).await;
        drain(&mut events);

        controller.handle().select(paracetamol()).unwrap();
        sleep(Duration::from_millis(10)).await;

        let snapshot = controller.handle().snapshot();
        assert_eq!(snapshot.text, "PARACETAMOL");
        assert!(!snapshot.visible);
        assert_eq!(
            drain(&mut events),
            vec![SearchEvent::Navigate(
                ResultsRoute::for_query("PARACETAMOL").unwrap()
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cloned_handle_reads_latest_snapshot() {
        let lookup = FakeLookup::default();
        lookup.respond("para", Scripted::Items(Duration::ZERO, vec![paracetamol()]));
        let (controller, _events, _dismiss) = spawn(&lookup);
        let observer = controller.handle().clone();

        controller.handle().input_changed("para").unwrap();
        sleep(Duration::from_millis(10)).await;
        assert_eq!(observer.snapshot().phase, LookupPhase::Pending);

        sleep(Duration::from_millis(340)).await;
        let snapshot = observer.snapshot();
        assert_eq!(snapshot, controller.handle().snapshot());
        assert_eq!(snapshot.suggestions, vec![paracetamol()]);
        assert!(snapshot.visible);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_submit_is_a_no_op() {
        let lookup = FakeLookup::default();
        let (controller, mut events, _dismiss) = spawn(&lookup);

        controller.handle().submit("   ").unwrap();
        sleep(Duration::from_millis(500)).await;

        assert!(drain(&mut events).is_empty());
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn submit_navigates_with_trimmed_text_and_cancels_pending_lookup() {
        let lookup = FakeLookup::default();
        let (controller, mut events, _dismiss) = spawn(&lookup);

        controller.handle().input_changed("  aspirin ").unwrap();
        controller.handle().submit("  aspirin ").unwrap();
        sleep(Duration::from_millis(500)).await;

        assert!(lookup.calls().is_empty());
        let snapshot = controller.handle().snapshot();
        assert_eq!(snapshot.text, "  aspirin ");
        assert!(!snapshot.visible);
        assert_eq!(
            drain(&mut events),
            vec![SearchEvent::Navigate(
                ResultsRoute::for_query("aspirin").unwrap()
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn outside_pointer_and_escape_dismiss_without_clearing() {
        let lookup = FakeLookup::default();
        lookup.respond("para", Scripted::Items(Duration::ZERO, vec![paracetamol()]));
        let (controller, _events, dismiss) = spawn(&lookup);

        controller.handle().input_changed("para").unwrap();
        sleep(Duration::from_millis(350)).await;
        assert!(controller.handle().snapshot().visible);

        dismiss
            .send(DismissSignal::PointerDown(PointerTarget::Dropdown))
            .unwrap();
        sleep(Duration::from_millis(10)).await;
        assert!(controller.handle().snapshot().visible);

        dismiss
            .send(DismissSignal::PointerDown(PointerTarget::Outside))
            .unwrap();
        sleep(Duration::from_millis(10)).await;
        let snapshot = controller.handle().snapshot();
        assert!(!snapshot.visible);
        assert_eq!(snapshot.text, "para");
        assert_eq!(snapshot.suggestions, vec![paracetamol()]);

        controller.handle().input_changed("para ").unwrap();
        sleep(Duration::from_millis(10)).await;
        assert!(controller.handle().snapshot().visible);

        dismiss.send(DismissSignal::KeyDown(Key::Escape)).unwrap();
        sleep(Duration::from_millis(10)).await;
        assert!(!controller.handle().snapshot().visible);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_outstanding_lookup() {
        let lookup = FakeLookup::default();
        lookup.respond(
            "para",
            Scripted::Items(Duration::from_millis(5_000), vec![paracetamol()]),
        );
        let (controller, _events, _dismiss) = spawn(&lookup);
        let handle = controller.handle().clone();

        handle.input_changed("para").unwrap();
        sleep(Duration::from_millis(350)).await;
        controller.shutdown().await;
        sleep(Duration::from_millis(10)).await;

        assert_eq!(lookup.cancelled(), vec!["para".to_string()]);
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.phase, LookupPhase::Cancelled);
        assert!(snapshot.suggestions.is_empty());
        assert!(matches!(
            handle.input_changed("paracetamol"),
            Err(Error::ControllerClosed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_controller_cancels_pending_timer() {
        let lookup = FakeLookup::default();
        let (controller, _events, _dismiss) = spawn(&lookup);

        controller.handle().input_changed("para").unwrap();
        drop(controller);
        sleep(Duration::from_millis(1_000)).await;

        assert!(lookup.calls().is_empty());
    }
}
