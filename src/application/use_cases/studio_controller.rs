use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::application::{KeyValueStore, RelayService, StudioEvent, StudioObserver};
use crate::domain::{DomainError, History, Query, HISTORY_STORAGE_KEY};

/// Prefix for failures that are not a message from the completion service.
pub const ERROR_MARKER: &str = "❌ Error: ";

/// What a call to [`StudioController::submit`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty domain, nothing happened.
    Ignored,
    /// Another relay call is still pending.
    Busy,
    CacheHit,
    Fetched,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudioState {
    pub domain: String,
    pub output: String,
    pub loading: bool,
    pub history: History,
}

/// Client-side orchestration: cache lookup, relay call, bounded history.
///
/// The history is read from the store once, in [`StudioController::load`],
/// and written back after every new result. Observers receive every state
/// transition in order; they are never called while internal state is locked.
pub struct StudioController {
    relay: Arc<dyn RelayService>,
    store: Arc<dyn KeyValueStore>,
    observers: Vec<Arc<dyn StudioObserver>>,
    state: Mutex<StudioState>,
    in_flight: AtomicBool,
}

impl StudioController {
    pub async fn load(relay: Arc<dyn RelayService>, store: Arc<dyn KeyValueStore>) -> Self {
        let history = match store.get(HISTORY_STORAGE_KEY).await {
            Ok(Some(raw)) => History::from_json(&raw).unwrap_or_else(|e| {
                warn!("Ignoring malformed history: {}", e);
                History::new()
            }),
            Ok(None) => History::new(),
            Err(e) => {
                warn!("Failed to read history, starting empty: {}", e);
                History::new()
            }
        };
        debug!("Loaded {} history entries", history.len());

        Self {
            relay,
            store,
            observers: Vec::new(),
            state: Mutex::new(StudioState {
                history,
                ..StudioState::default()
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StudioObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn snapshot(&self) -> StudioState {
        self.state().clone()
    }

    pub fn history(&self) -> History {
        self.state().history.clone()
    }

    pub fn output(&self) -> String {
        self.state().output.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Update the current domain, as typing into the input would.
    pub fn set_domain(&self, domain: &str) {
        let mut events = Vec::new();
        {
            let mut state = self.state();
            Self::change_domain(&mut state, domain, &mut events);
        }
        self.publish(events);
    }

    /// Show a stored result without touching the network or the loading flag.
    pub fn select(&self, domain: &str) -> Option<Query> {
        let mut events = Vec::new();
        let selected = {
            let mut state = self.state();
            let query = state.history.find(domain)?.clone();
            Self::change_domain(&mut state, query.domain(), &mut events);
            state.output = query.output().to_string();
            events.push(StudioEvent::OutputChanged(state.output.clone()));
            query
        };
        self.publish(events);
        Some(selected)
    }

    pub async fn submit(&self, domain: &str) -> SubmitOutcome {
        if domain.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Submit for {} rejected: a request is already pending", domain);
            return SubmitOutcome::Busy;
        }

        let mut events = Vec::new();
        let cached = {
            let mut state = self.state();
            Self::change_domain(&mut state, domain, &mut events);
            let cached = state.history.find(domain).map(|q| q.output().to_string());
            if let Some(output) = &cached {
                state.output = output.clone();
                events.push(StudioEvent::OutputChanged(output.clone()));
            }
            cached
        };
        if cached.is_some() {
            debug!("Cache hit for {}", domain);
            self.in_flight.store(false, Ordering::SeqCst);
            self.publish(events);
            return SubmitOutcome::CacheHit;
        }

        self.state().loading = true;
        events.push(StudioEvent::LoadingChanged(true));
        self.publish(events);

        let result = self.relay.relay(domain).await;

        let mut events = Vec::new();
        let (outcome, persist) = {
            let mut state = self.state();
            let outcome = match result {
                Ok(output) => {
                    state.output = output.clone();
                    events.push(StudioEvent::OutputChanged(output.clone()));
                    state.history.record(Query::new(domain, output));
                    events.push(StudioEvent::HistoryChanged(state.history.entries().to_vec()));
                    SubmitOutcome::Fetched
                }
                Err(e) => {
                    warn!("Relay failed for {}: {}", domain, e);
                    state.output = Self::display_error(&e);
                    events.push(StudioEvent::OutputChanged(state.output.clone()));
                    SubmitOutcome::Failed
                }
            };
            let persist = match outcome {
                SubmitOutcome::Fetched => Some(state.history.clone()),
                _ => None,
            };
            (outcome, persist)
        };

        if let Some(history) = persist {
            self.persist(&history).await;
        }

        self.state().loading = false;
        self.in_flight.store(false, Ordering::SeqCst);
        events.push(StudioEvent::LoadingChanged(false));
        self.publish(events);

        outcome
    }

    /// Text shown for a failed relay. Messages that originate from the
    /// completion service (or input validation) are shown as-is.
    pub fn display_error(error: &DomainError) -> String {
        match error {
            DomainError::UpstreamError(msg) | DomainError::InvalidInput(msg) => msg.clone(),
            other => format!("{ERROR_MARKER}{}", other.message()),
        }
    }

    async fn persist(&self, history: &History) {
        let json = match history.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize history: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(HISTORY_STORAGE_KEY, &json).await {
            warn!("Failed to persist history: {}", e);
        }
    }

    fn change_domain(state: &mut StudioState, domain: &str, events: &mut Vec<StudioEvent>) {
        if state.domain != domain {
            state.domain = domain.to_string();
            events.push(StudioEvent::DomainChanged(state.domain.clone()));
        }
    }

    fn publish(&self, events: Vec<StudioEvent>) {
        for event in &events {
            for observer in &self.observers {
                observer.on_event(event);
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, StudioState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::RelayDomainUseCase;
    use crate::connector::{InMemoryKeyValueStore, MockChatClient, MockReply};
    use async_trait::async_trait;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<StudioEvent>>,
    }

    impl RecordingObserver {
        fn events(&self) -> Vec<StudioEvent> {
            self.events.lock().unwrap().clone()
        }

        fn loading_transitions(&self) -> Vec<bool> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    StudioEvent::LoadingChanged(v) => Some(v),
                    _ => None,
                })
                .collect()
        }
    }

    impl StudioObserver for RecordingObserver {
        fn on_event(&self, event: &StudioEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    /// Relay that blocks until released, to observe the pending state.
    struct GatedRelay {
        release: Notify,
    }

    #[async_trait]
    impl RelayService for GatedRelay {
        async fn relay(&self, domain: &str) -> Result<String, DomainError> {
            self.release.notified().await;
            Ok(format!("brief for {domain}"))
        }
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, DomainError> {
            Err(DomainError::storage("disk on fire"))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), DomainError> {
            Err(DomainError::storage("disk on fire"))
        }
    }

    struct Fixture {
        controller: StudioController,
        client: Arc<MockChatClient>,
        store: Arc<InMemoryKeyValueStore>,
        observer: Arc<RecordingObserver>,
    }

    async fn fixture(reply: MockReply, store: InMemoryKeyValueStore) -> Fixture {
        let client = Arc::new(MockChatClient::with_reply(reply));
        let relay = Arc::new(RelayDomainUseCase::new(client.clone()));
        let store = Arc::new(store);
        let observer = Arc::new(RecordingObserver::default());
        let controller = StudioController::load(relay, store.clone())
            .await
            .with_observer(observer.clone());
        Fixture {
            controller,
            client,
            store,
            observer,
        }
    }

    async fn persisted(store: &InMemoryKeyValueStore) -> History {
        let raw = store.get(HISTORY_STORAGE_KEY).await.unwrap().unwrap();
        History::from_json(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_empty_domain_is_a_no_op() {
        let f = fixture(MockReply::Echo, InMemoryKeyValueStore::new()).await;

        assert_eq!(f.controller.submit("").await, SubmitOutcome::Ignored);
        assert_eq!(f.client.call_count(), 0);
        assert!(f.observer.events().is_empty());
        assert!(f.store.get(HISTORY_STORAGE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_miss_fetches_records_and_persists() {
        let f = fixture(
            MockReply::Text("About LINKR...".into()),
            InMemoryKeyValueStore::new(),
        )
        .await;

        assert_eq!(f.controller.submit("qualifacts.com").await, SubmitOutcome::Fetched);

        assert_eq!(f.controller.output(), "About LINKR...");
        assert!(!f.controller.is_loading());
        let expected = History::from(vec![Query::new("qualifacts.com", "About LINKR...")]);
        assert_eq!(f.controller.history(), expected);
        assert_eq!(persisted(&f.store).await, expected);
        assert_eq!(f.observer.loading_transitions(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_second_submit_is_a_cache_hit() {
        let f = fixture(MockReply::Echo, InMemoryKeyValueStore::new()).await;

        assert_eq!(f.controller.submit("acme.com").await, SubmitOutcome::Fetched);
        let first = f.controller.output();

        assert_eq!(f.controller.submit("acme.com").await, SubmitOutcome::CacheHit);
        assert_eq!(f.client.call_count(), 1);
        assert_eq!(f.controller.output(), first);
        assert_eq!(f.controller.history().len(), 1);
        // A cache hit never toggles the loading flag.
        assert_eq!(f.observer.loading_transitions(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_cache_hit_does_not_reorder_history() {
        let f = fixture(MockReply::Echo, InMemoryKeyValueStore::new()).await;
        f.controller.submit("a.com").await;
        f.controller.submit("b.com").await;

        assert_eq!(f.controller.submit("a.com").await, SubmitOutcome::CacheHit);
        let domains: Vec<_> = f
            .controller
            .history()
            .entries()
            .iter()
            .map(|q| q.domain().to_string())
            .collect();
        assert_eq!(domains, vec!["b.com", "a.com"]);
    }

    #[tokio::test]
    async fn test_history_keeps_five_most_recent() {
        let f = fixture(MockReply::Echo, InMemoryKeyValueStore::new()).await;

        for i in 0..8 {
            f.controller.submit(&format!("company{i}.com")).await;
        }

        let history = persisted(&f.store).await;
        assert_eq!(history.len(), 5);
        let domains: Vec<_> = history.entries().iter().map(|q| q.domain()).collect();
        assert_eq!(
            domains,
            vec!["company7.com", "company6.com", "company5.com", "company4.com", "company3.com"]
        );
        assert_eq!(f.client.call_count(), 8);
    }

    #[tokio::test]
    async fn test_upstream_failure_shows_message_and_keeps_history() {
        let seeded = History::from(vec![Query::new("old.com", "old brief")]);
        let store = InMemoryKeyValueStore::new();
        store
            .set(HISTORY_STORAGE_KEY, &seeded.to_json().unwrap())
            .await
            .unwrap();
        let f = fixture(MockReply::Upstream("rate limited".into()), store).await;

        assert_eq!(f.controller.submit("acme.com").await, SubmitOutcome::Failed);

        assert_eq!(f.controller.output(), "rate limited");
        assert!(!f.controller.is_loading());
        assert_eq!(f.controller.history(), seeded);
        assert_eq!(persisted(&f.store).await, seeded);
        assert_eq!(f.observer.loading_transitions(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_transport_failure_is_marked() {
        let f = fixture(
            MockReply::Transport("connection refused".into()),
            InMemoryKeyValueStore::new(),
        )
        .await;

        assert_eq!(f.controller.submit("acme.com").await, SubmitOutcome::Failed);
        assert_eq!(f.controller.output(), "❌ Error: connection refused");
        assert!(f.controller.history().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_history_loads_as_empty() {
        let store = InMemoryKeyValueStore::new();
        store.set(HISTORY_STORAGE_KEY, "{not json").await.unwrap();
        let f = fixture(MockReply::Echo, store).await;

        assert!(f.controller.history().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_store_loads_as_empty_and_survives_persist_failure() {
        let client = Arc::new(MockChatClient::new());
        let relay = Arc::new(RelayDomainUseCase::new(client.clone()));
        let controller = StudioController::load(relay, Arc::new(FailingStore)).await;

        assert!(controller.history().is_empty());
        assert_eq!(controller.submit("acme.com").await, SubmitOutcome::Fetched);
        assert_eq!(controller.history().len(), 1);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_select_sets_domain_and_output_without_network() {
        let seeded = History::from(vec![
            Query::new("b.com", "brief b"),
            Query::new("a.com", "brief a"),
        ]);
        let store = InMemoryKeyValueStore::new();
        store
            .set(HISTORY_STORAGE_KEY, &seeded.to_json().unwrap())
            .await
            .unwrap();
        let f = fixture(MockReply::Echo, store).await;

        let selected = f.controller.select("a.com").unwrap();
        assert_eq!(selected.output(), "brief a");

        let state = f.controller.snapshot();
        assert_eq!(state.domain, "a.com");
        assert_eq!(state.output, "brief a");
        assert_eq!(f.client.call_count(), 0);
        assert_eq!(
            f.observer.events(),
            vec![
                StudioEvent::DomainChanged("a.com".into()),
                StudioEvent::OutputChanged("brief a".into()),
            ]
        );
        assert_eq!(f.controller.history(), seeded);
    }

    #[tokio::test]
    async fn test_select_unknown_domain_changes_nothing() {
        let f = fixture(MockReply::Echo, InMemoryKeyValueStore::new()).await;
        assert!(f.controller.select("nope.com").is_none());
        assert!(f.observer.events().is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_submit_is_rejected_while_pending() {
        let relay = Arc::new(GatedRelay {
            release: Notify::new(),
        });
        let store = Arc::new(InMemoryKeyValueStore::new());
        let controller = Arc::new(StudioController::load(relay.clone(), store.clone()).await);

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("first.com").await })
        };
        while !controller.is_loading() {
            tokio::task::yield_now().await;
        }

        assert_eq!(controller.submit("second.com").await, SubmitOutcome::Busy);

        relay.release.notify_one();
        assert_eq!(pending.await.unwrap(), SubmitOutcome::Fetched);

        let history = persisted(&store).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].domain(), "first.com");
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_busy_submit_leaves_state_and_events_untouched() {
        let relay = Arc::new(GatedRelay {
            release: Notify::new(),
        });
        let observer = Arc::new(RecordingObserver::default());
        let controller = Arc::new(
            StudioController::load(relay.clone(), Arc::new(InMemoryKeyValueStore::new()))
                .await
                .with_observer(observer.clone()),
        );

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("a.com").await })
        };
        while !controller.is_loading() {
            tokio::task::yield_now().await;
        }
        let before = controller.snapshot();
        let events_before = observer.events();

        assert_eq!(controller.submit("b.com").await, SubmitOutcome::Busy);
        assert_eq!(controller.snapshot(), before);
        assert_eq!(observer.events(), events_before);

        relay.release.notify_one();
        assert_eq!(pending.await.unwrap(), SubmitOutcome::Fetched);
        let state = controller.snapshot();
        assert_eq!(state.domain, "a.com");
        assert_eq!(state.output, "brief for a.com");
        assert_eq!(state.history.entries()[0].domain(), "a.com");
    }

    #[tokio::test]
    async fn test_fetch_publishes_events_in_order() {
        let f = fixture(MockReply::Text("brief".into()), InMemoryKeyValueStore::new()).await;

        f.controller.submit("acme.com").await;

        assert_eq!(
            f.observer.events(),
            vec![
                StudioEvent::DomainChanged("acme.com".into()),
                StudioEvent::LoadingChanged(true),
                StudioEvent::OutputChanged("brief".into()),
                StudioEvent::HistoryChanged(vec![Query::new("acme.com", "brief")]),
                StudioEvent::LoadingChanged(false),
            ]
        );
    }

    #[tokio::test]
    async fn test_set_domain_publishes_only_changes() {
        let f = fixture(MockReply::Echo, InMemoryKeyValueStore::new()).await;

        f.controller.set_domain("acme.com");
        f.controller.set_domain("acme.com");

        assert_eq!(f.controller.snapshot().domain, "acme.com");
        assert_eq!(
            f.observer.events(),
            vec![StudioEvent::DomainChanged("acme.com".into())]
        );
        assert_eq!(f.client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_stored_history_is_kept_until_next_fetch() {
        let seeded = History::from(
            (0..7)
                .map(|i| Query::new(format!("d{i}.com"), format!("brief {i}")))
                .collect::<Vec<_>>(),
        );
        let store = InMemoryKeyValueStore::new();
        store
            .set(HISTORY_STORAGE_KEY, &seeded.to_json().unwrap())
            .await
            .unwrap();
        let f = fixture(MockReply::Text("new brief".into()), store).await;

        assert_eq!(f.controller.history().len(), 7);

        assert_eq!(f.controller.submit("d6.com").await, SubmitOutcome::CacheHit);
        assert_eq!(f.controller.output(), "brief 6");
        assert_eq!(f.client.call_count(), 0);
        assert_eq!(persisted(&f.store).await.len(), 7);

        assert_eq!(f.controller.submit("new.com").await, SubmitOutcome::Fetched);
        let history = persisted(&f.store).await;
        let domains: Vec<_> = history.entries().iter().map(|q| q.domain()).collect();
        assert_eq!(domains, vec!["new.com", "d0.com", "d1.com", "d2.com", "d3.com"]);
        assert_eq!(f.controller.history(), history);
    }

    #[test]
    fn test_display_error_marks_only_local_failures() {
        assert_eq!(
            StudioController::display_error(&DomainError::upstream("rate limited")),
            "rate limited"
        );
        assert_eq!(
            StudioController::display_error(&DomainError::transport("timed out")),
            "❌ Error: timed out"
        );
    }
}
