//! In-memory doubles for the platform collaborators, shared by unit tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{AdapterError, EngineError};
use crate::notification::NotificationContent;
use crate::platform::{
    AdapterClient, AdapterFactory, AdapterState, AlarmId, ChannelSpec, CharacteristicAddress,
    CharacteristicInfo, ClientOptions, ConnectOptions, ConnectionState, DescriptorAddress,
    EntryPoint, EventCallback, Execution, ExecutionEngine, HardwareSignals, LaunchOptions,
    LogLevel, NotificationSurface, RawSignal, RestoreCallback, ScanFilter, ScanResult,
    ServiceInfo, SignalListener, SignalSubscription, StateCallback, WakeScheduler,
};

/// Ordered record of side effects across doubles.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }

    fn record(&self, entry: &str) {
        self.0.lock().push(entry.to_string());
    }
}

// ---- hardware signals ----

pub struct FakeSignals {
    radio: AtomicBool,
    location: AtomicBool,
    next: AtomicU64,
    listeners: Mutex<HashMap<u64, SignalListener>>,
    retained: Option<Mutex<Vec<SignalListener>>>,
    journal: Journal,
}

impl FakeSignals {
    pub fn new(radio: bool, location: bool) -> Self {
        Self {
            radio: AtomicBool::new(radio),
            location: AtomicBool::new(location),
            next: AtomicU64::new(1),
            listeners: Mutex::new(HashMap::new()),
            retained: None,
            journal: Journal::default(),
        }
    }

    /// Keeps every registered listener, including unsubscribed ones, the way an
    /// OS may still hold a receiver whose broadcast is already queued.
    pub fn retaining(mut self) -> Self {
        self.retained = Some(Mutex::new(Vec::new()));
        self
    }

    /// Delivers `raw` to every listener ever registered (requires [`Self::retaining`]).
    pub fn emit_retained(&self, raw: RawSignal) {
        let listeners: Vec<_> = self
            .retained
            .as_ref()
            .map(|r| r.lock().clone())
            .unwrap_or_default();
        for listener in listeners {
            listener(raw);
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Delivers `raw` to every registered listener, outside the lock.
    pub fn emit(&self, raw: RawSignal) {
        let listeners: Vec<_> = self.listeners.lock().values().cloned().collect();
        for listener in listeners {
            listener(raw);
        }
    }

    pub fn set_radio(&self, enabled: bool) {
        self.radio.store(enabled, Ordering::SeqCst);
    }

    pub fn set_location(&self, enabled: bool) {
        self.location.store(enabled, Ordering::SeqCst);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl HardwareSignals for FakeSignals {
    fn subscribe(&self, listener: SignalListener) -> SignalSubscription {
        let id = self.next.fetch_add(1, Ordering::SeqCst);
        if let Some(retained) = &self.retained {
            retained.lock().push(Arc::clone(&listener));
        }
        self.listeners.lock().insert(id, listener);
        SignalSubscription(id)
    }

    fn unsubscribe(&self, subscription: SignalSubscription) {
        self.listeners.lock().remove(&subscription.0);
        self.journal.record("signals.unsubscribe");
    }

    fn radio_enabled(&self) -> bool {
        self.radio.load(Ordering::SeqCst)
    }

    fn location_enabled(&self) -> bool {
        self.location.load(Ordering::SeqCst)
    }
}

// ---- notification surface ----

#[derive(Default)]
struct SurfaceState {
    channels: Vec<ChannelSpec>,
    shown: Option<(u32, NotificationContent)>,
    show_calls: usize,
}

pub struct FakeSurface {
    label: Option<String>,
    state: Mutex<SurfaceState>,
    journal: Journal,
}

impl FakeSurface {
    pub fn new(label: Option<&str>) -> Self {
        Self {
            label: label.map(str::to_string),
            state: Mutex::new(SurfaceState::default()),
            journal: Journal::default(),
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn channels(&self) -> Vec<ChannelSpec> {
        self.state.lock().channels.clone()
    }

    /// The notification currently on screen.
    pub fn shown(&self) -> Option<(u32, NotificationContent)> {
        self.state.lock().shown.clone()
    }

    pub fn show_calls(&self) -> usize {
        self.state.lock().show_calls
    }
}

impl NotificationSurface for FakeSurface {
    fn app_label(&self) -> Option<String> {
        self.label.clone()
    }

    fn create_channel(&self, channel: &ChannelSpec) {
        self.state.lock().channels.push(channel.clone());
    }

    fn show(&self, id: u32, _channel_id: &str, content: &NotificationContent) {
        let mut state = self.state.lock();
        state.shown = Some((id, content.clone()));
        state.show_calls += 1;
    }

    fn withdraw(&self, id: u32) {
        let mut state = self.state.lock();
        if state.shown.as_ref().is_some_and(|(shown, _)| *shown == id) {
            state.shown = None;
        }
        self.journal.record("surface.withdraw");
    }
}

// ---- execution engine ----

pub struct FakeExecution {
    torn_down: AtomicBool,
    delivered: Mutex<Vec<(String, Value)>>,
    journal: Journal,
}

impl FakeExecution {
    pub fn delivered(&self) -> Vec<(String, Value)> {
        self.delivered.lock().clone()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }
}

impl Execution for FakeExecution {
    fn is_executing(&self) -> bool {
        !self.is_torn_down()
    }

    fn deliver(&self, method: &str, payload: Value) {
        self.delivered.lock().push((method.to_string(), payload));
    }

    fn teardown(&self) {
        self.torn_down.store(true, Ordering::SeqCst);
        self.journal.record("execution.teardown");
    }
}

/// Boxed view handed to the supervisor; the engine keeps the shared half.
struct ExecutionHandle(Arc<FakeExecution>);

impl Execution for ExecutionHandle {
    fn is_executing(&self) -> bool {
        self.0.is_executing()
    }

    fn deliver(&self, method: &str, payload: Value) {
        self.0.deliver(method, payload);
    }

    fn teardown(&self) {
        self.0.teardown();
    }
}

#[derive(Default)]
pub struct FakeEngine {
    handles: Mutex<BTreeSet<i64>>,
    failure: Mutex<Option<EngineError>>,
    executions: Mutex<Vec<Arc<FakeExecution>>>,
    journal: Journal,
}

impl FakeEngine {
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Makes `handle` resolvable.
    pub fn register(&self, handle: i64) {
        self.handles.lock().insert(handle);
    }

    /// The next `start` fails with `err`.
    pub fn fail_next(&self, err: EngineError) {
        *self.failure.lock() = Some(err);
    }

    pub fn started(&self) -> usize {
        self.executions.lock().len()
    }

    /// Executions not yet torn down.
    pub fn live(&self) -> usize {
        self.executions
            .lock()
            .iter()
            .filter(|e| !e.is_torn_down())
            .count()
    }

    pub fn execution(&self, index: usize) -> Option<Arc<FakeExecution>> {
        self.executions.lock().get(index).cloned()
    }
}

impl ExecutionEngine for FakeEngine {
    fn resolve(&self, handle: i64) -> Option<EntryPoint> {
        self.handles.lock().contains(&handle).then(|| EntryPoint {
            handle,
            library: "app".to_string(),
            function: format!("callback_{handle}"),
        })
    }

    fn start(
        &self,
        _entry: &EntryPoint,
        _options: LaunchOptions,
    ) -> Result<Box<dyn Execution>, EngineError> {
        if let Some(err) = self.failure.lock().take() {
            return Err(err);
        }
        let execution = Arc::new(FakeExecution {
            torn_down: AtomicBool::new(false),
            delivered: Mutex::new(Vec::new()),
            journal: self.journal.clone(),
        });
        self.executions.lock().push(Arc::clone(&execution));
        Ok(Box::new(ExecutionHandle(execution)))
    }
}

// ---- adapter ----

#[derive(Default)]
struct ClientState {
    destroyed: bool,
    failure: Option<AdapterError>,
    scan: Option<EventCallback<ScanResult>>,
    cancelled: Vec<String>,
    connections: HashMap<String, (ConnectOptions, EventCallback<ConnectionState>)>,
    connected: HashMap<String, bool>,
    monitor: Option<EventCallback<Vec<u8>>>,
    characteristics: HashMap<CharacteristicAddress, Vec<u8>>,
    descriptors: HashMap<DescriptorAddress, Vec<u8>>,
    log_level: LogLevel,
}

#[derive(Default)]
pub struct FakeClient {
    state: Mutex<ClientState>,
    journal: Journal,
}

impl FakeClient {
    fn with_journal(journal: Journal) -> Self {
        Self {
            state: Mutex::new(ClientState::default()),
            journal,
        }
    }

    /// The next fallible operation returns `err`.
    pub fn fail_next(&self, err: AdapterError) {
        self.state.lock().failure = Some(err);
    }

    pub fn connect_options(&self, device_id: &str) -> Option<ConnectOptions> {
        self.state
            .lock()
            .connections
            .get(device_id)
            .map(|(options, _)| options.clone())
    }

    pub fn emit_connection(&self, device_id: &str, state: Result<ConnectionState, AdapterError>) {
        if let Some((_, on_state)) = self.state.lock().connections.get(device_id) {
            on_state(state);
        }
    }

    pub fn set_connected(&self, device_id: &str, connected: bool) {
        self.state
            .lock()
            .connected
            .insert(device_id.to_string(), connected);
    }

    pub fn emit_monitor(&self, value: Result<Vec<u8>, AdapterError>) {
        if let Some(on_value) = &self.state.lock().monitor {
            on_value(value);
        }
    }

    pub fn emit_scan(&self, result: Result<ScanResult, AdapterError>) {
        if let Some(on_result) = &self.state.lock().scan {
            on_result(result);
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.lock().destroyed
    }

    pub fn is_scanning(&self) -> bool {
        self.state.lock().scan.is_some()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.state.lock().cancelled.clone()
    }

    fn check(&self) -> Result<(), AdapterError> {
        match self.state.lock().failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn is_device_connected(&self, device_id: &str) -> bool {
        self.state
            .lock()
            .connected
            .get(device_id)
            .copied()
            .unwrap_or(false)
    }
}

impl AdapterClient for FakeClient {
    fn destroy(&self) {
        self.state.lock().destroyed = true;
        self.journal.record("client.destroy");
    }

    fn start_scan(
        &self,
        _filter: ScanFilter,
        on_result: EventCallback<ScanResult>,
    ) -> Result<(), AdapterError> {
        self.check()?;
        self.state.lock().scan = Some(on_result);
        Ok(())
    }

    fn stop_scan(&self) {
        self.state.lock().scan = None;
    }

    fn cancel_transaction(&self, transaction_id: &str) {
        self.state
            .lock()
            .cancelled
            .push(transaction_id.to_string());
    }

    fn connect(
        &self,
        device_id: &str,
        options: ConnectOptions,
        on_state: EventCallback<ConnectionState>,
    ) -> Result<(), AdapterError> {
        self.check()?;
        self.state
            .lock()
            .connections
            .insert(device_id.to_string(), (options, on_state));
        Ok(())
    }

    fn is_connected(&self, device_id: &str) -> Result<bool, AdapterError> {
        self.check()?;
        Ok(self.is_device_connected(device_id))
    }

    fn cancel_connection(&self, device_id: &str) -> Result<(), AdapterError> {
        self.check()?;
        let mut state = self.state.lock();
        state.connections.remove(device_id);
        state.connected.insert(device_id.to_string(), false);
        Ok(())
    }

    fn connection_state(&self, device_id: &str) -> Result<ConnectionState, AdapterError> {
        self.check()?;
        Ok(if self.is_device_connected(device_id) {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        })
    }

    fn discover(&self, _device_id: &str, _transaction_id: Option<&str>) -> Result<(), AdapterError> {
        self.check()
    }

    fn services(&self, device_id: &str) -> Result<Vec<ServiceInfo>, AdapterError> {
        self.check()?;
        Ok(vec![ServiceInfo {
            uuid: "180d".to_string(),
            device_id: device_id.to_string(),
            is_primary: true,
        }])
    }

    fn characteristics(
        &self,
        _device_id: &str,
        service_uuid: &str,
    ) -> Result<Vec<CharacteristicInfo>, AdapterError> {
        self.check()?;
        Ok(vec![CharacteristicInfo {
            uuid: "2a37".to_string(),
            service_uuid: service_uuid.to_string(),
            is_readable: true,
            is_writable_with_response: true,
            is_writable_without_response: false,
            is_notifiable: true,
            is_indicatable: false,
        }])
    }

    fn read_characteristic(
        &self,
        address: &CharacteristicAddress,
        _transaction_id: Option<&str>,
    ) -> Result<Vec<u8>, AdapterError> {
        self.check()?;
        Ok(self
            .state
            .lock()
            .characteristics
            .get(address)
            .cloned()
            .unwrap_or_default())
    }

    fn write_characteristic(
        &self,
        address: &CharacteristicAddress,
        value: &[u8],
        _with_response: bool,
        _transaction_id: Option<&str>,
    ) -> Result<(), AdapterError> {
        self.check()?;
        self.state
            .lock()
            .characteristics
            .insert(address.clone(), value.to_vec());
        Ok(())
    }

    fn monitor_characteristic(
        &self,
        _address: &CharacteristicAddress,
        _transaction_id: Option<&str>,
        on_value: EventCallback<Vec<u8>>,
    ) -> Result<(), AdapterError> {
        self.check()?;
        self.state.lock().monitor = Some(on_value);
        Ok(())
    }

    fn read_descriptor(
        &self,
        address: &DescriptorAddress,
        _transaction_id: Option<&str>,
    ) -> Result<Vec<u8>, AdapterError> {
        self.check()?;
        Ok(self
            .state
            .lock()
            .descriptors
            .get(address)
            .cloned()
            .unwrap_or_default())
    }

    fn write_descriptor(
        &self,
        address: &DescriptorAddress,
        value: &[u8],
        _transaction_id: Option<&str>,
    ) -> Result<(), AdapterError> {
        self.check()?;
        self.state
            .lock()
            .descriptors
            .insert(address.clone(), value.to_vec());
        Ok(())
    }

    fn read_rssi(&self, _device_id: &str, _transaction_id: Option<&str>) -> Result<i32, AdapterError> {
        self.check()?;
        Ok(-42)
    }

    fn request_mtu(
        &self,
        _device_id: &str,
        mtu: u16,
        _transaction_id: Option<&str>,
    ) -> Result<u16, AdapterError> {
        self.check()?;
        Ok(mtu)
    }

    fn set_log_level(&self, level: LogLevel) -> Result<(), AdapterError> {
        self.check()?;
        self.state.lock().log_level = level;
        Ok(())
    }

    fn log_level(&self) -> LogLevel {
        self.state.lock().log_level
    }
}

#[derive(Default)]
struct AdapterInner {
    failure: Option<AdapterError>,
    clients: Vec<Arc<FakeClient>>,
    options: Option<ClientOptions>,
    callbacks: Option<(StateCallback, RestoreCallback)>,
}

#[derive(Default)]
pub struct FakeAdapter {
    inner: Mutex<AdapterInner>,
    journal: Journal,
}

impl FakeAdapter {
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// The next `create_client` fails with `err`.
    pub fn fail_next(&self, err: AdapterError) {
        self.inner.lock().failure = Some(err);
    }

    pub fn last_options(&self) -> Option<ClientOptions> {
        self.inner.lock().options.clone()
    }

    /// Invokes the state callback of the most recent client.
    pub fn emit_state(&self, state: AdapterState) {
        if let Some((on_state, _)) = &self.inner.lock().callbacks {
            on_state(state);
        }
    }

    /// Invokes the restore callback of the most recent client.
    pub fn emit_restore(&self, id: i64) {
        if let Some((_, on_restore)) = &self.inner.lock().callbacks {
            on_restore(id);
        }
    }

    pub fn client(&self, index: usize) -> Option<Arc<FakeClient>> {
        self.inner.lock().clients.get(index).cloned()
    }

    pub fn created(&self) -> usize {
        self.inner.lock().clients.len()
    }
}

impl AdapterFactory for FakeAdapter {
    fn create_client(
        &self,
        options: ClientOptions,
        on_state: StateCallback,
        on_restore: RestoreCallback,
    ) -> Result<Arc<dyn AdapterClient>, AdapterError> {
        let mut inner = self.inner.lock();
        if let Some(err) = inner.failure.take() {
            return Err(err);
        }
        let client = Arc::new(FakeClient::with_journal(self.journal.clone()));
        inner.clients.push(Arc::clone(&client));
        inner.options = Some(options);
        inner.callbacks = Some((on_state, on_restore));
        Ok(client)
    }
}

// ---- alarms ----

#[derive(Default)]
struct AlarmState {
    schedules: usize,
    cancels: usize,
    last: Option<(AlarmId, Duration, bool)>,
    pending: BTreeSet<AlarmId>,
}

#[derive(Default)]
pub struct FakeAlarm {
    state: Mutex<AlarmState>,
}

impl FakeAlarm {
    pub fn schedules(&self) -> usize {
        self.state.lock().schedules
    }

    pub fn cancels(&self) -> usize {
        self.state.lock().cancels
    }

    pub fn last(&self) -> Option<(AlarmId, Duration, bool)> {
        self.state.lock().last
    }

    pub fn is_pending(&self, id: AlarmId) -> bool {
        self.state.lock().pending.contains(&id)
    }

    pub fn pending_ids(&self) -> Vec<AlarmId> {
        self.state.lock().pending.iter().copied().collect()
    }
}

impl WakeScheduler for FakeAlarm {
    fn schedule(&self, id: AlarmId, delay: Duration, allow_while_idle: bool) {
        let mut state = self.state.lock();
        state.schedules += 1;
        state.last = Some((id, delay, allow_while_idle));
        state.pending.insert(id);
    }

    fn cancel(&self, id: AlarmId) {
        let mut state = self.state.lock();
        state.cancels += 1;
        state.pending.remove(&id);
    }
}
