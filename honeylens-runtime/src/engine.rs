//! Evaluation engine
//!
//! Owns one attached page and an explicit [`EngineContext`] (threshold,
//! weights, cached result). Triggers are handled one at a time, each running
//! the pipeline synchronously to completion:
//! - **Attach**: immediate evaluation, then again once the stored sensitivity is known
//! - **Config change**: new threshold, re-evaluate, notify
//! - **Query**: re-evaluate, reply, no notification, never throttled
//! - **Interaction**: click/scroll, leading-edge throttled, notify
//!
//! The page is not `Send`, so the engine runs on the task that created it.
//! Other tasks reach it through an [`EngineHandle`].

use honeylens_core::{
    classify, BadgeUpdate, DetectionResult, Request, Response, WeightTable, DEFAULT_SENSITIVITY,
};
use honeylens_dom::Page;
use honeylens_extractors::ExtractorSet;
use std::fmt;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::{parse_sensitivity, NotificationSink, SensitivityStore, Throttle};

/// Pending triggers buffered per engine
const TRIGGER_BUFFER: usize = 64;

/// Mutable engine state threaded through every evaluation
#[derive(Debug, Clone)]
pub struct EngineContext {
    pub sensitivity: f64,
    pub weights: WeightTable,
    pub last_result: Option<DetectionResult>,
}

impl EngineContext {
    pub fn new(weights: WeightTable) -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            weights,
            last_result: None,
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(WeightTable::default())
    }
}

/// User interaction kinds that trigger a throttled re-evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Click,
    Scroll,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionKind::Click => write!(f, "click"),
            InteractionKind::Scroll => write!(f, "scroll"),
        }
    }
}

/// Events delivered to a running engine
#[derive(Debug)]
pub enum Trigger {
    /// The stored sensitivity changed
    ConfigChanged(Option<String>),
    /// On-demand query; the fresh result is sent back
    Query(oneshot::Sender<DetectionResult>),
    Interaction(InteractionKind),
    /// The document's markup changed in place
    DocumentMutated(String),
}

/// Transport faults between a caller and the engine
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("No engine is attached to a document")]
    EngineUnavailable,
}

/// Cloneable sender side of an engine's trigger channel
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<Trigger>,
}

/// Create a trigger channel for one engine
pub fn engine_channel() -> (EngineHandle, mpsc::Receiver<Trigger>) {
    let (tx, rx) = mpsc::channel(TRIGGER_BUFFER);
    (EngineHandle { tx }, rx)
}

impl EngineHandle {
    async fn send(&self, trigger: Trigger) -> Result<(), TransportError> {
        self.tx
            .send(trigger)
            .await
            .map_err(|_| TransportError::EngineUnavailable)
    }

    /// Fresh result for the attached document
    pub async fn query(&self) -> Result<DetectionResult, TransportError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Trigger::Query(reply_tx)).await?;
        reply_rx.await.map_err(|_| TransportError::EngineUnavailable)
    }

    pub async fn config_changed(&self, sensitivity: Option<String>) -> Result<(), TransportError> {
        self.send(Trigger::ConfigChanged(sensitivity)).await
    }

    pub async fn interaction(&self, kind: InteractionKind) -> Result<(), TransportError> {
        self.send(Trigger::Interaction(kind)).await
    }

    pub async fn mutate(&self, html: impl Into<String>) -> Result<(), TransportError> {
        self.send(Trigger::DocumentMutated(html.into())).await
    }
}

/// Detection engine attached to one document
pub struct Engine<S: NotificationSink> {
    id: String,
    page: Page,
    context: EngineContext,
    extractors: ExtractorSet,
    throttle: Throttle,
    sink: S,
}

impl<S: NotificationSink> Engine<S> {
    pub fn new(page: Page, sink: S) -> Self {
        Self {
            id: format!("engine-{}", &Uuid::new_v4().to_string()[..8]),
            page,
            context: EngineContext::default(),
            extractors: ExtractorSet::standard(),
            throttle: Throttle::default(),
            sink,
        }
    }

    pub fn with_weights(mut self, weights: WeightTable) -> Self {
        self.context.weights = weights;
        self
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run the pipeline without touching the cache or the sink
    pub fn evaluate(&self) -> DetectionResult {
        let breakdown = self.extractors.run(&self.page);
        classify(breakdown, &self.context.weights, self.context.sensitivity)
    }

    fn perform(&mut self, notify: bool) -> DetectionResult {
        let result = self.evaluate();

        info!(
            engine = %self.id,
            score = %result.display_score(),
            honeypot = result.is_honeypot,
            sensitivity = self.context.sensitivity,
            fingerprint = %self.page.fingerprint(),
            "Page evaluated"
        );

        self.context.last_result = Some(result.clone());
        if notify {
            self.sink.notify(BadgeUpdate::for_result(&result));
        }
        result
    }

    /// Attach to the document: clear the badge, evaluate with the default
    /// threshold, then re-evaluate once a stored sensitivity is found.
    pub async fn attach<St>(&mut self, store: &St) -> DetectionResult
    where
        St: SensitivityStore + ?Sized,
    {
        info!(engine = %self.id, url = %self.page.url(), "Attaching to document");
        self.sink.notify(BadgeUpdate::cleared());

        let initial = self.perform(true);

        match store.load().await {
            Ok(Some(raw)) => {
                self.context.sensitivity = parse_sensitivity(Some(&raw));
                self.perform(true)
            }
            Ok(None) => {
                debug!("No stored sensitivity, keeping {}", self.context.sensitivity);
                initial
            }
            Err(e) => {
                warn!("Failed to load sensitivity: {}; keeping {}", e, self.context.sensitivity);
                initial
            }
        }
    }

    fn apply_sensitivity(&mut self, raw: Option<&str>) -> DetectionResult {
        self.context.sensitivity = parse_sensitivity(raw);
        debug!(engine = %self.id, sensitivity = self.context.sensitivity, "Sensitivity changed");
        self.perform(true)
    }

    /// Handle one trigger arriving at `now`
    pub fn handle(&mut self, trigger: Trigger, now: Instant) {
        match trigger {
            Trigger::ConfigChanged(raw) => {
                self.apply_sensitivity(raw.as_deref());
            }
            Trigger::Query(reply) => {
                let result = self.perform(false);
                if reply.send(result).is_err() {
                    debug!("Query requester went away before the reply");
                }
            }
            Trigger::Interaction(kind) => {
                if self.throttle.try_fire(now) {
                    debug!(engine = %self.id, %kind, "Interaction triggered evaluation");
                    self.perform(true);
                } else {
                    trace!(%kind, "Interaction throttled");
                }
            }
            Trigger::DocumentMutated(html) => {
                self.page = self.page.with_source(html);
                debug!(engine = %self.id, fingerprint = %self.page.fingerprint(), "Document mutated");
            }
        }
    }

    /// Answer a protocol request from the display surface
    pub fn handle_request(&mut self, request: Request) -> Response {
        match request {
            Request::GetResults => Response::Results(self.perform(false)),
            Request::ConfigChanged { sensitivity } => {
                self.apply_sensitivity(sensitivity.as_deref());
                Response::Ack
            }
        }
    }

    /// Process triggers until every handle is dropped
    pub async fn run(&mut self, mut triggers: mpsc::Receiver<Trigger>) {
        info!(engine = %self.id, "Engine listening for triggers");

        while let Some(trigger) = triggers.recv().await {
            self.handle(trigger, Instant::now());
        }

        info!(engine = %self.id, "All handles closed, engine detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChannelSink, MemoryStore};
    use honeylens_core::{BadgeUpdate, DANGER_COLOR, SAFE_COLOR};
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::Duration;
    use url::Url;

    const URGENCY_PAGE: &str = "<html><body><p>Limited time offer, act now</p></body></html>";

    fn engine(html: &str) -> (Engine<ChannelSink>, UnboundedReceiver<BadgeUpdate>) {
        let page = Page::parse(html, Url::parse("https://shop.example/").unwrap());
        let (sink, rx) = ChannelSink::new();
        (Engine::new(page, sink), rx)
    }

    fn drain(rx: &mut UnboundedReceiver<BadgeUpdate>) -> Vec<BadgeUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    /// urgency weighs 3 and reward 2: two urgency hits score exactly 30
    fn thirty_percent_weights() -> WeightTable {
        WeightTable::from_toml_str("version = \"test\"\n[table]\nurgencyScore = 3.0\nrewardScore = 2.0\n")
            .unwrap()
    }

    #[test]
    fn test_empty_document_scores_zero() {
        let (engine, _rx) = engine("<html><body></body></html>");
        let result = engine.evaluate();
        assert_eq!(result.normalized_score, 0.0);
        assert!(!result.is_honeypot);
    }

    #[test]
    fn test_urgency_scenario() {
        let (engine, _rx) = engine(URGENCY_PAGE);
        let result = engine.evaluate();
        assert_eq!(result.details[&honeylens_core::SignalName::UrgencyScore], 2);
        assert!((result.normalized_score - 5.0 / 168.0 * 100.0).abs() < 1e-9);
        assert_eq!(result.display_score(), "2.98");
        assert!(!result.is_honeypot);
    }

    #[tokio::test]
    async fn test_attach_without_stored_value_uses_default() {
        let (mut engine, mut rx) = engine(URGENCY_PAGE);
        let result = engine.attach(&MemoryStore::default()).await;

        assert_eq!(engine.context().sensitivity, 65.0);
        assert!(!result.is_honeypot);
        assert_eq!(engine.context().last_result.as_ref(), Some(&result));
        assert_eq!(drain(&mut rx), vec![BadgeUpdate::cleared(), BadgeUpdate::cleared()]);
    }

    #[tokio::test]
    async fn test_attach_with_stored_value_reevaluates() {
        let (mut engine, mut rx) = engine(URGENCY_PAGE);
        let store = MemoryStore::new(Some("1".to_string()));
        let result = engine.attach(&store).await;

        assert!(result.is_honeypot);
        let updates = drain(&mut rx);
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[2].text, "2.98");
        assert_eq!(updates[2].color, DANGER_COLOR);
    }

    #[tokio::test]
    async fn test_sensitivity_drop_flips_verdict() {
        let (engine, mut rx) = engine(URGENCY_PAGE);
        let mut engine = engine.with_weights(thirty_percent_weights());
        let before = engine.attach(&MemoryStore::default()).await;
        assert!((before.normalized_score - 30.0).abs() < 1e-9);
        assert!(!before.is_honeypot);
        drain(&mut rx);

        engine.handle(Trigger::ConfigChanged(Some("10".to_string())), Instant::now());
        let after = engine.context().last_result.clone().unwrap();
        assert!(after.is_honeypot);
        assert_eq!(after.normalized_score, before.normalized_score);

        let updates = drain(&mut rx);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].text, "30.00");
    }

    #[tokio::test]
    async fn test_non_numeric_config_falls_back_to_default() {
        let (mut engine, _rx) = engine(URGENCY_PAGE);
        engine.handle(Trigger::ConfigChanged(Some("10".to_string())), Instant::now());
        assert_eq!(engine.context().sensitivity, 10.0);

        engine.handle(Trigger::ConfigChanged(Some("loud".to_string())), Instant::now());
        assert_eq!(engine.context().sensitivity, 65.0);

        engine.handle(Trigger::ConfigChanged(None), Instant::now());
        assert_eq!(engine.context().sensitivity, 65.0);
    }

    #[tokio::test]
    async fn test_queries_are_idempotent_and_silent() {
        let (mut engine, mut rx) = engine(URGENCY_PAGE);

        let first = engine.handle_request(Request::GetResults);
        let second = engine.handle_request(Request::GetResults);
        assert_eq!(first, second);
        assert!(drain(&mut rx).is_empty());

        let Response::Results(result) = first else {
            panic!("expected results");
        };
        assert_eq!(engine.context().last_result, Some(result));
    }

    #[tokio::test]
    async fn test_config_request_acknowledged() {
        let (mut engine, mut rx) = engine(URGENCY_PAGE);
        let response = engine.handle_request(Request::ConfigChanged {
            sensitivity: Some("2".to_string()),
        });
        assert_eq!(response, Response::Ack);
        assert_eq!(drain(&mut rx)[0].color, DANGER_COLOR);
    }

    #[tokio::test]
    async fn test_interactions_are_throttled() {
        let (mut engine, mut rx) = engine(URGENCY_PAGE);
        let base = Instant::now();

        for (ms, kind) in [
            (0, InteractionKind::Click),
            (100, InteractionKind::Scroll),
            (4999, InteractionKind::Click),
            (5001, InteractionKind::Scroll),
        ] {
            engine.handle(Trigger::Interaction(kind), base + Duration::from_millis(ms));
        }

        let updates = drain(&mut rx);
        assert_eq!(updates.len(), 2);
        assert!(updates.iter().all(|u| u.color == SAFE_COLOR));
    }

    #[tokio::test]
    async fn test_queries_bypass_throttle() {
        let (mut engine, _rx) = engine(URGENCY_PAGE);
        let now = Instant::now();
        engine.handle(Trigger::Interaction(InteractionKind::Click), now);

        let (tx, rx) = oneshot::channel();
        engine.handle(Trigger::Query(tx), now);
        assert!(rx.await.is_ok());
    }

    #[tokio::test]
    async fn test_mutation_is_seen_by_next_query() {
        let (mut engine, _rx) = engine("<html><body><p>Welcome</p></body></html>");
        let before = engine.handle_request(Request::GetResults);

        engine.handle(
            Trigger::DocumentMutated(URGENCY_PAGE.to_string()),
            Instant::now(),
        );
        let after = engine.handle_request(Request::GetResults);
        assert_ne!(before, after);
    }

    #[tokio::test]
    async fn test_run_loop_through_handle() {
        let (mut engine, _rx) = engine(URGENCY_PAGE);
        let (handle, triggers) = engine_channel();

        let client = async move {
            let first = handle.query().await.unwrap();
            handle.config_changed(Some("1".to_string())).await.unwrap();
            let second = handle.query().await.unwrap();
            (first, second)
        };

        let ((), (first, second)) = tokio::join!(engine.run(triggers), client);
        assert!(!first.is_honeypot);
        assert!(second.is_honeypot);
        assert_eq!(engine.context().sensitivity, 1.0);
    }

    #[tokio::test]
    async fn test_detached_engine_is_unavailable() {
        let (handle, triggers) = engine_channel();
        drop(triggers);

        let err = handle.query().await.unwrap_err();
        assert!(matches!(err, TransportError::EngineUnavailable));
        assert!(handle.interaction(InteractionKind::Scroll).await.is_err());
    }
}
