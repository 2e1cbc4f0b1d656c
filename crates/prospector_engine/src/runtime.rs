//! Effect execution: a command loop on its own thread that owns the tokio
//! runtime, the API client, and the two periodic timers.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use client_logging::{client_info, client_warn};
use prospector_core::{Effect, Msg};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::api::LeadApi;

/// Periods for the two periodic components.
#[derive(Debug, Clone)]
pub struct TimerSettings {
    pub poll_interval: Duration,
    pub metrics_interval: Duration,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            metrics_interval: Duration::from_secs(30),
        }
    }
}

enum Command {
    Execute(Vec<Effect>),
    Shutdown,
}

/// Handle to the effect-execution thread.
///
/// Effects queued through one handle are applied in order on the engine
/// thread; resulting messages flow back through the sender supplied at
/// construction. Dropping every handle, or calling [`EngineHandle::stop`],
/// cancels both timers and aborts in-flight fetches.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<Command>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn LeadApi>, timers: TimerSettings, event_tx: mpsc::Sender<Msg>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        thread::spawn(move || run_engine(api, timers, event_tx, cmd_rx));
        Self { cmd_tx }
    }

    pub fn execute(&self, effects: Vec<Effect>) {
        if effects.is_empty() {
            return;
        }
        let _ = self.cmd_tx.send(Command::Execute(effects));
    }

    /// Tear the engine down. Safe to call more than once.
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(Command::Shutdown);
    }
}

#[derive(Default)]
struct Timers {
    poll: Option<CancellationToken>,
    metrics: Option<CancellationToken>,
}

impl Timers {
    fn cancel_all(&mut self) {
        if let Some(token) = self.poll.take() {
            token.cancel();
        }
        if let Some(token) = self.metrics.take() {
            token.cancel();
        }
    }
}

fn run_engine(
    api: Arc<dyn LeadApi>,
    settings: TimerSettings,
    event_tx: mpsc::Sender<Msg>,
    cmd_rx: mpsc::Receiver<Command>,
) {
    let runtime = Runtime::new().expect("tokio runtime");
    let mut timers = Timers::default();
    while let Ok(command) = cmd_rx.recv() {
        match command {
            Command::Shutdown => break,
            Command::Execute(effects) => {
                for effect in effects {
                    run_effect(&runtime, &api, &settings, &event_tx, &mut timers, effect);
                }
            }
        }
    }
    // Every exit path, including handle drop, cancels the timers before the
    // runtime goes away; an orphaned tick firing into a discarded state
    // would be a correctness bug.
    timers.cancel_all();
}

fn run_effect(
    runtime: &Runtime,
    api: &Arc<dyn LeadApi>,
    settings: &TimerSettings,
    event_tx: &mpsc::Sender<Msg>,
    timers: &mut Timers,
    effect: Effect,
) {
    match effect {
        Effect::StartJob { params } => {
            let api = api.clone();
            let tx = event_tx.clone();
            runtime.spawn(async move {
                let msg = match api.start_job(&params).await {
                    Ok(job) => {
                        client_info!("job {} started", job.id);
                        Msg::JobStartSucceeded { job }
                    }
                    Err(err) => {
                        client_warn!("job start failed: {err}");
                        Msg::JobStartFailed {
                            message: err.to_string(),
                        }
                    }
                };
                let _ = tx.send(msg);
            });
        }
        Effect::FetchJobStatus { job_id, seq } => {
            let api = api.clone();
            let tx = event_tx.clone();
            runtime.spawn(async move {
                let msg = match api.job_status(&job_id).await {
                    Ok(job) => Msg::JobStatusArrived { seq, job },
                    Err(err) => {
                        client_warn!("status fetch {seq} for job {job_id} failed: {err}");
                        Msg::JobStatusFetchFailed {
                            seq,
                            message: err.to_string(),
                        }
                    }
                };
                let _ = tx.send(msg);
            });
        }
        Effect::StartJobPolling => {
            // Single-timer invariant: restarting replaces the previous run.
            if let Some(token) = timers.poll.take() {
                token.cancel();
            }
            let token = CancellationToken::new();
            timers.poll = Some(token.clone());
            let tx = event_tx.clone();
            let period = settings.poll_interval;
            runtime.spawn(async move {
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = tokio::time::sleep(period) => {
                            if tx.send(Msg::PollTick).is_err() {
                                break;
                            }
                        }
                    }
                }
            });
        }
        Effect::StopJobPolling => {
            if let Some(token) = timers.poll.take() {
                token.cancel();
            }
        }
        Effect::RefreshLeads => {
            let api = api.clone();
            let tx = event_tx.clone();
            runtime.spawn(async move {
                let (with, without) =
                    tokio::join!(api.leads_with_email(), api.leads_without_email());
                let msg = match (with, without) {
                    (Ok(with_email), Ok(without_email)) => Msg::LeadsRefreshed {
                        with_email,
                        without_email,
                    },
                    (Err(err), _) | (_, Err(err)) => {
                        client_warn!("lead refresh failed: {err}");
                        Msg::LeadsRefreshFailed {
                            message: err.to_string(),
                        }
                    }
                };
                let _ = tx.send(msg);
            });
        }
        Effect::SubmitEmail { channel_id, email } => {
            let api = api.clone();
            let tx = event_tx.clone();
            runtime.spawn(async move {
                let msg = match api.add_email(&channel_id, &email).await {
                    Ok(()) => {
                        client_info!("email attached to {channel_id}");
                        Msg::EmailAddSucceeded { channel_id }
                    }
                    Err(err) => {
                        client_warn!("add email to {channel_id} failed: {err}");
                        Msg::EmailAddFailed {
                            channel_id,
                            message: err.to_string(),
                        }
                    }
                };
                let _ = tx.send(msg);
            });
        }
        Effect::FetchMetrics => {
            let api = api.clone();
            let tx = event_tx.clone();
            runtime.spawn(async move {
                let msg = match api.metrics_snapshot().await {
                    Ok(snapshot) => Msg::MetricsArrived { snapshot },
                    Err(err) => {
                        client_warn!("metrics refresh failed: {err}");
                        Msg::MetricsFetchFailed {
                            message: err.to_string(),
                        }
                    }
                };
                let _ = tx.send(msg);
            });
        }
        Effect::StartMetricsPolling => {
            if let Some(token) = timers.metrics.take() {
                token.cancel();
            }
            let token = CancellationToken::new();
            timers.metrics = Some(token.clone());
            let tx = event_tx.clone();
            let period = settings.metrics_interval;
            runtime.spawn(async move {
                // Entering the tab fetches immediately, then periodically.
                if tx.send(Msg::MetricsTick).is_err() {
                    return;
                }
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = tokio::time::sleep(period) => {
                            if tx.send(Msg::MetricsTick).is_err() {
                                break;
                            }
                        }
                    }
                }
            });
        }
        Effect::StopMetricsPolling => {
            if let Some(token) = timers.metrics.take() {
                token.cancel();
            }
        }
    }
}
