//! Test doubles for the backend seams
//!
//! In-memory implementations of [`SessionApi`], [`StreamingSdk`],
//! [`SdkConnector`] and [`CatalogSource`] with call counters and scripted
//! responses. Enabled for downstream crates by the `test-helpers` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use gamecast_core::prelude::*;
use gamecast_core::{BridgeEvent, FailureKind, Game};

use crate::catalog::CatalogSource;
use crate::protocol::{CreateSessionResponse, SessionStatusResponse, UpdateSessionResponse};
use crate::sdk::{SdkConnector, StreamingSdk};
use crate::session_api::{CreateSession, SessionApi};

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Build a status response
pub fn status_response(status: &str, signal: Option<&str>) -> SessionStatusResponse {
    SessionStatusResponse {
        arn: String::new(),
        region: Some("us-east-2".to_string()),
        status: Some(status.to_string()),
        signal_response: signal.map(str::to_string),
    }
}

/// Create a test game
pub fn test_game(app_id: &str, name: &str, ordering: i64) -> Game {
    Game {
        app_id: app_id.to_string(),
        group_id: format!("sg-{app_id}"),
        name: name.to_string(),
        description: None,
        ordering: Some(ordering),
        input_devices: vec![],
        regions: vec![],
    }
}

// ---------------------------------------------------------------------------
// FakeSdk
// ---------------------------------------------------------------------------

/// Scriptable [`StreamingSdk`]
pub struct FakeSdk {
    ready: AtomicBool,
    offer: Mutex<String>,
    reject: Option<String>,
    fail_attach: bool,
    generate_calls: AtomicUsize,
    attach_calls: AtomicUsize,
    close_calls: AtomicUsize,
    consumed: Mutex<Vec<String>>,
}

impl FakeSdk {
    /// An initialized SDK whose offer is `offer`
    pub fn ready(offer: &str) -> Self {
        Self {
            ready: AtomicBool::new(true),
            offer: Mutex::new(offer.to_string()),
            reject: None,
            fail_attach: false,
            generate_calls: AtomicUsize::new(0),
            attach_calls: AtomicUsize::new(0),
            close_calls: AtomicUsize::new(0),
            consumed: Mutex::new(Vec::new()),
        }
    }

    /// An SDK whose web view never reported `domLoaded`
    pub fn uninitialized() -> Self {
        let sdk = Self::ready("");
        sdk.ready.store(false, Ordering::SeqCst);
        sdk
    }

    /// Reject every remote signal with `reason`
    pub fn rejecting(mut self, reason: &str) -> Self {
        self.reject = Some(reason.to_string());
        self
    }

    /// Fail the input attach step
    pub fn failing_attach(mut self) -> Self {
        self.fail_attach = true;
        self
    }

    /// Change the offer returned by the next generate call
    pub fn set_offer(&self, offer: &str) {
        *lock(&self.offer) = offer.to_string();
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn attach_calls(&self) -> usize {
        self.attach_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// Remote signals passed to `process_signal_response`
    pub fn consumed(&self) -> Vec<String> {
        lock(&self.consumed).clone()
    }
}

#[async_trait]
impl StreamingSdk for FakeSdk {
    async fn generate_signal_request(&self) -> Result<String> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if !self.ready.load(Ordering::SeqCst) {
            return Err(Error::SdkNotInitialized);
        }
        Ok(lock(&self.offer).clone())
    }

    async fn process_signal_response(&self, payload: &str) -> Result<()> {
        lock(&self.consumed).push(payload.to_string());
        match &self.reject {
            Some(reason) => Err(Error::signal_rejected(reason.clone())),
            None => Ok(()),
        }
    }

    async fn attach_input(&self) -> Result<()> {
        self.attach_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_attach {
            return Err(Error::webview("gamepad unavailable"));
        }
        Ok(())
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// FakeConnector
// ---------------------------------------------------------------------------

type SdkFactory = Box<dyn Fn() -> FakeSdk + Send + Sync>;

/// [`SdkConnector`] handing out a fresh [`FakeSdk`] per connect
pub struct FakeConnector {
    factory: SdkFactory,
    failure: Option<String>,
    connected: Mutex<Vec<Arc<FakeSdk>>>,
    events: Mutex<Option<mpsc::Sender<BridgeEvent>>>,
}

impl FakeConnector {
    /// Every connect yields an initialized SDK offering `offer`
    pub fn ready(offer: &str) -> Self {
        let offer = offer.to_string();
        Self::with(move || FakeSdk::ready(&offer))
    }

    pub fn with(factory: impl Fn() -> FakeSdk + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            failure: None,
            connected: Mutex::new(Vec::new()),
            events: Mutex::new(None),
        }
    }

    /// Every connect fails with a web-view error
    pub fn failing(message: &str) -> Self {
        let mut connector = Self::ready("");
        connector.failure = Some(message.to_string());
        connector
    }

    pub fn connect_calls(&self) -> usize {
        lock(&self.connected).len()
    }

    /// The SDK handed out by the most recent connect
    pub fn last_sdk(&self) -> Option<Arc<FakeSdk>> {
        lock(&self.connected).last().cloned()
    }

    /// All SDKs handed out so far, oldest first
    pub fn sdks(&self) -> Vec<Arc<FakeSdk>> {
        lock(&self.connected).clone()
    }

    /// Push an event as if the most recent SDK produced it.
    /// Returns false if nothing is connected or the receiver is gone.
    pub async fn emit(&self, event: BridgeEvent) -> bool {
        let tx = lock(&self.events).clone();
        match tx {
            Some(tx) => tx.send(event).await.is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl SdkConnector for FakeConnector {
    async fn connect(&self, events: mpsc::Sender<BridgeEvent>) -> Result<Arc<dyn StreamingSdk>> {
        if let Some(message) = &self.failure {
            return Err(Error::webview(message.clone()));
        }
        let sdk = Arc::new((self.factory)());
        lock(&self.connected).push(Arc::clone(&sdk));
        *lock(&self.events) = Some(events);
        Ok(sdk)
    }
}

// ---------------------------------------------------------------------------
// FakeSessionApi
// ---------------------------------------------------------------------------

/// Scriptable [`SessionApi`].
///
/// Each operation pops a scripted result when one is queued and otherwise
/// falls back to a default: create returns `arn = "s<n>"`, status returns
/// the configured default (`PENDING`), update returns no signal, terminate
/// succeeds.
pub struct FakeSessionApi {
    creates: Mutex<VecDeque<Result<CreateSessionResponse>>>,
    statuses: Mutex<VecDeque<Result<SessionStatusResponse>>>,
    default_status: Mutex<SessionStatusResponse>,
    updates: Mutex<VecDeque<Result<UpdateSessionResponse>>>,
    fail_terminate: AtomicBool,
    create_delay: Mutex<Duration>,
    status_delay: Mutex<Duration>,

    create_calls: AtomicUsize,
    status_calls: AtomicUsize,
    update_calls: AtomicUsize,
    created: Mutex<Vec<CreateSession>>,
    updated: Mutex<Vec<(String, String)>>,
    terminated: Mutex<Vec<String>>,
}

impl Default for FakeSessionApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSessionApi {
    pub fn new() -> Self {
        Self {
            creates: Mutex::new(VecDeque::new()),
            statuses: Mutex::new(VecDeque::new()),
            default_status: Mutex::new(status_response("PENDING", None)),
            updates: Mutex::new(VecDeque::new()),
            fail_terminate: AtomicBool::new(false),
            create_delay: Mutex::new(Duration::ZERO),
            status_delay: Mutex::new(Duration::ZERO),
            create_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
            terminated: Mutex::new(Vec::new()),
        }
    }

    /// Queue a create result
    pub fn push_create(&self, result: Result<CreateSessionResponse>) {
        lock(&self.creates).push_back(result);
    }

    /// Queue a network failure for the next create
    pub fn fail_create_network(&self, message: &str) {
        self.push_create(Err(Error::create_failed(FailureKind::Network, message)));
    }

    /// Queue a status response
    pub fn push_status(&self, status: &str, signal: Option<&str>) {
        lock(&self.statuses).push_back(Ok(status_response(status, signal)));
    }

    /// Queue a status response exactly as the backend would send it
    pub fn push_status_response(&self, response: SessionStatusResponse) {
        lock(&self.statuses).push_back(Ok(response));
    }

    /// Queue a status check failure
    pub fn fail_status(&self, message: &str) {
        lock(&self.statuses).push_back(Err(Error::status_check_failed(message)));
    }

    /// Status returned once the queue is empty
    pub fn set_default_status(&self, status: &str, signal: Option<&str>) {
        *lock(&self.default_status) = status_response(status, signal);
    }

    /// Queue an update result
    pub fn push_update(&self, result: Result<UpdateSessionResponse>) {
        lock(&self.updates).push_back(result);
    }

    pub fn fail_terminate(&self) {
        self.fail_terminate.store(true, Ordering::SeqCst);
    }

    pub fn set_create_delay(&self, delay: Duration) {
        *lock(&self.create_delay) = delay;
    }

    pub fn set_status_delay(&self, delay: Duration) {
        *lock(&self.status_delay) = delay;
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Number of terminate calls, failed ones included
    pub fn terminate_calls(&self) -> usize {
        lock(&self.terminated).len()
    }

    /// ARNs passed to terminate, in call order
    pub fn terminated(&self) -> Vec<String> {
        lock(&self.terminated).clone()
    }

    /// Parameters of every create call
    pub fn created(&self) -> Vec<CreateSession> {
        lock(&self.created).clone()
    }

    /// `(arn, local_signal)` of every update call
    pub fn updated(&self) -> Vec<(String, String)> {
        lock(&self.updated).clone()
    }
}

#[async_trait]
impl SessionApi for FakeSessionApi {
    async fn create_session(&self, params: CreateSession) -> Result<CreateSessionResponse> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.created).push(params);

        let delay = *lock(&self.create_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let scripted = lock(&self.creates).pop_front();
        scripted.unwrap_or_else(|| {
            Ok(CreateSessionResponse {
                arn: format!("s{n}"),
                ..Default::default()
            })
        })
    }

    async fn get_session_status(
        &self,
        _group_id: &str,
        arn: &str,
    ) -> Result<SessionStatusResponse> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *lock(&self.status_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let scripted = lock(&self.statuses).pop_front();
        let mut response = match scripted {
            Some(result) => result?,
            None => lock(&self.default_status).clone(),
        };
        if response.arn.is_empty() {
            response.arn = arn.to_string();
        }
        Ok(response)
    }

    async fn update_session(
        &self,
        _group_id: &str,
        arn: &str,
        local_signal: &str,
    ) -> Result<UpdateSessionResponse> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.updated).push((arn.to_string(), local_signal.to_string()));
        let scripted = lock(&self.updates).pop_front();
        scripted.unwrap_or_else(|| Ok(UpdateSessionResponse::default()))
    }

    async fn terminate_session(&self, _group_id: &str, arn: &str) -> Result<()> {
        lock(&self.terminated).push(arn.to_string());
        if self.fail_terminate.load(Ordering::SeqCst) {
            return Err(Error::terminate_failed("HTTP 500"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FakeCatalog
// ---------------------------------------------------------------------------

/// [`CatalogSource`] returning a fixed list (sorted like the real client)
pub struct FakeCatalog {
    games: Mutex<Option<Vec<Game>>>,
    fetch_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new(games: Vec<Game>) -> Self {
        Self {
            games: Mutex::new(Some(games)),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Every fetch fails with `CatalogUnavailable`
    pub fn unavailable() -> Self {
        Self {
            games: Mutex::new(None),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_games(&self, games: Vec<Game>) {
        *lock(&self.games) = Some(games);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<Game>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let games = lock(&self.games).clone();
        match games {
            Some(mut games) => {
                gamecast_core::sort_games(&mut games);
                Ok(games)
            }
            None => Err(Error::catalog_unavailable("connection refused")),
        }
    }
}
