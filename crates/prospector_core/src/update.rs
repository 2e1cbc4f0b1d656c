use crate::{AppState, Effect, Msg, Tab};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ClientStarted => vec![Effect::RefreshLeads],

        Msg::StartJobSubmitted { params } => {
            // The processing flag doubles as the one-job-at-a-time guard.
            if state.is_processing() || !params.keywords_valid() {
                return (state, Vec::new());
            }
            state.begin_start();
            vec![Effect::StartJob { params }]
        }
        Msg::JobStartSucceeded { job } => {
            state.begin_tracking(job);
            vec![Effect::StartJobPolling]
        }
        Msg::JobStartFailed { message } => {
            state.abort_start(message);
            Vec::new()
        }

        Msg::PollTick => match state.tracked_job().cloned() {
            Some(job_id) => {
                let seq = state.next_status_seq();
                vec![Effect::FetchJobStatus { job_id, seq }]
            }
            // A tick that was already queued when the run ended.
            None => Vec::new(),
        },
        Msg::JobStatusArrived { seq, job } => {
            if !state.accepts_status(&job.id, seq) {
                return (state, Vec::new());
            }
            let terminal = job.status.is_terminal();
            state.apply_status(seq, job);
            if terminal {
                state.finish_tracking();
                vec![Effect::StopJobPolling, Effect::RefreshLeads]
            } else {
                Vec::new()
            }
        }
        // Transient; the engine logged it and the next tick retries.
        Msg::JobStatusFetchFailed { .. } => Vec::new(),

        Msg::RefreshLeadsRequested => vec![Effect::RefreshLeads],
        Msg::LeadsRefreshed {
            with_email,
            without_email,
        } => {
            state.replace_leads(with_email, without_email);
            Vec::new()
        }
        // Both collections keep their previous values.
        Msg::LeadsRefreshFailed { .. } => Vec::new(),

        Msg::EmailSubmitted { channel_id, email } => {
            if channel_id.is_empty() || email.trim().is_empty() {
                return (state, Vec::new());
            }
            vec![Effect::SubmitEmail { channel_id, email }]
        }
        // The server already reclassified the lead; re-sync both
        // collections rather than moving it locally.
        Msg::EmailAddSucceeded { .. } => vec![Effect::RefreshLeads],
        Msg::EmailAddFailed {
            channel_id,
            message,
        } => {
            state.raise_alert(format!("failed to add email to {channel_id}: {message}"));
            Vec::new()
        }

        Msg::TabSelected(tab) => {
            let previous = state.active_tab();
            if tab == previous {
                return (state, Vec::new());
            }
            state.set_tab(tab);
            if tab == Tab::Monitoring {
                vec![Effect::StartMetricsPolling]
            } else if previous == Tab::Monitoring {
                vec![Effect::StopMetricsPolling]
            } else {
                Vec::new()
            }
        }
        Msg::MetricsTick => {
            // Guards the tick that was in flight when the tab changed.
            if state.active_tab() != Tab::Monitoring {
                return (state, Vec::new());
            }
            state.begin_metrics_fetch();
            vec![Effect::FetchMetrics]
        }
        Msg::MetricsRefreshRequested => {
            // Manual refreshes are gated by the loading flag; automatic
            // ticks are not.
            if state.metrics_loading() {
                return (state, Vec::new());
            }
            state.begin_metrics_fetch();
            vec![Effect::FetchMetrics]
        }
        Msg::MetricsArrived { snapshot } => {
            state.apply_metrics(snapshot);
            Vec::new()
        }
        Msg::MetricsFetchFailed { .. } => {
            state.metrics_fetch_failed();
            Vec::new()
        }

        Msg::AlertDismissed => {
            state.clear_alert();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
