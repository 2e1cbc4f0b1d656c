use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use client_logging::client_warn;
use prospector_core::{
    update, AppState, AppViewModel, Job, JobParams, Lead, MetricsSnapshot, Msg, Tab,
};
use prospector_engine::{
    ApiError, ApiSettings, EngineHandle, LeadApi, ReqwestLeadApi, TimerSettings,
};

/// Operator-facing dashboard client.
///
/// Owns the in-memory dashboard state and the effect engine. All state
/// mutation happens on the pump thread, one message at a time; the facade
/// methods only enqueue messages or take short read locks, so they are safe
/// to call from a UI thread.
pub struct DashboardClient {
    shared: Arc<Mutex<AppState>>,
    msg_tx: Option<mpsc::Sender<Msg>>,
    engine: EngineHandle,
    pump: Option<JoinHandle<()>>,
}

impl DashboardClient {
    /// Connect to a backend with the default timer periods and prime the
    /// lead collections.
    pub fn connect(base_url: &str) -> Result<Self, ApiError> {
        let api = ReqwestLeadApi::new(ApiSettings::new(base_url)?)?;
        Ok(Self::with_api(Arc::new(api), TimerSettings::default()))
    }

    /// Assemble the client from parts. Tests use this with short timers or
    /// a stub API.
    pub fn with_api(api: Arc<dyn LeadApi>, timers: TimerSettings) -> Self {
        let shared = Arc::new(Mutex::new(AppState::new()));
        let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
        let engine = EngineHandle::new(api, timers, msg_tx.clone());
        let pump = spawn_pump(shared.clone(), engine.clone(), msg_rx);
        let client = Self {
            shared,
            msg_tx: Some(msg_tx),
            engine,
            pump: Some(pump),
        };
        client.send(Msg::ClientStarted);
        client
    }

    pub fn start_job(&self, params: JobParams) {
        self.send(Msg::StartJobSubmitted { params });
    }

    pub fn add_email(&self, channel_id: impl Into<String>, email: impl Into<String>) {
        self.send(Msg::EmailSubmitted {
            channel_id: channel_id.into(),
            email: email.into(),
        });
    }

    pub fn set_active_view(&self, tab: Tab) {
        self.send(Msg::TabSelected(tab));
    }

    pub fn refresh_leads(&self) {
        self.send(Msg::RefreshLeadsRequested);
    }

    pub fn refresh_metrics(&self) {
        self.send(Msg::MetricsRefreshRequested);
    }

    pub fn dismiss_alert(&self) {
        self.send(Msg::AlertDismissed);
    }

    pub fn is_processing(&self) -> bool {
        self.lock().is_processing()
    }

    pub fn current_job_status(&self) -> Option<Job> {
        self.lock().job().cloned()
    }

    pub fn leads_with_email(&self) -> Vec<Lead> {
        self.lock().leads_with_email().to_vec()
    }

    pub fn leads_without_email(&self) -> Vec<Lead> {
        self.lock().leads_without_email().to_vec()
    }

    pub fn latest_metrics(&self) -> Option<MetricsSnapshot> {
        self.lock().metrics().cloned()
    }

    pub fn active_view(&self) -> Tab {
        self.lock().active_tab()
    }

    /// Blocking operator notification from a start or mutation failure.
    pub fn alert(&self) -> Option<String> {
        self.lock().alert().map(ToOwned::to_owned)
    }

    pub fn view(&self) -> AppViewModel {
        self.lock().view()
    }

    /// Tear down: cancels both timers, aborts in-flight fetches and stops
    /// the pump. Dropping the client does the same.
    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn send(&self, msg: Msg) {
        if let Some(tx) = &self.msg_tx {
            if tx.send(msg).is_err() {
                client_warn!("dashboard pump is gone; message dropped");
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.shared.lock().expect("lock dashboard state")
    }

    fn teardown(&mut self) {
        self.engine.stop();
        // The pump exits once every message sender is gone: ours here, the
        // engine's clones when its runtime shuts down.
        self.msg_tx.take();
        if let Some(pump) = self.pump.take() {
            let _ = pump.join();
        }
    }
}

impl Drop for DashboardClient {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn spawn_pump(
    shared: Arc<Mutex<AppState>>,
    engine: EngineHandle,
    msg_rx: mpsc::Receiver<Msg>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(msg) = msg_rx.recv() {
            let effects = {
                let mut guard = shared.lock().expect("lock dashboard state");
                let state = std::mem::take(&mut *guard);
                let (state, effects) = update(state, msg);
                *guard = state;
                effects
            };
            engine.execute(effects);
        }
    })
}
