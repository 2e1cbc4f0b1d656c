use std::sync::Once;

use prospector_core::{update, AppState, Effect, Job, JobId, JobParams, JobPhase, Msg};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn params(keywords: &[&str]) -> JobParams {
    JobParams {
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        ..JobParams::default()
    }
}

fn snapshot(id: &str, status: JobPhase) -> Job {
    Job {
        id: JobId::new(id),
        status,
        current_step: String::new(),
        channels_discovered: 0,
        channels_processed: 0,
        emails_found: 0,
        emails_sent: 0,
        errors: Vec::new(),
        started_at: None,
        updated_at: None,
    }
}

/// State with a run being tracked, as after a successful start request.
fn tracking(id: &str) -> AppState {
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::StartJobSubmitted {
            params: params(&["crypto trading"]),
        },
    );
    let (state, _) = update(
        state,
        Msg::JobStartSucceeded {
            job: snapshot(id, JobPhase::Queued),
        },
    );
    state
}

#[test]
fn submit_sets_processing_and_emits_start() {
    init_logging();
    let state = AppState::new();
    let submitted = params(&["crypto trading", "day trading"]);

    let (mut state, effects) = update(
        state,
        Msg::StartJobSubmitted {
            params: submitted.clone(),
        },
    );

    assert!(state.is_processing());
    assert!(state.job().is_none());
    assert_eq!(effects, vec![Effect::StartJob { params: submitted }]);
    assert!(state.consume_dirty());
}

#[test]
fn submit_with_blank_keyword_is_rejected() {
    init_logging();
    let state = AppState::new();

    let (state, effects) = update(
        state,
        Msg::StartJobSubmitted {
            params: params(&["crypto trading", "   "]),
        },
    );

    assert!(!state.is_processing());
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::StartJobSubmitted {
            params: params(&[]),
        },
    );
    assert!(!state.is_processing());
    assert!(effects.is_empty());
}

#[test]
fn submit_while_processing_is_rejected() {
    init_logging();
    let state = tracking("job-1");

    let (state, effects) = update(
        state,
        Msg::StartJobSubmitted {
            params: params(&["second run"]),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.tracked_job(), Some(&JobId::new("job-1")));
}

#[test]
fn start_success_stores_first_snapshot_and_starts_polling() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::StartJobSubmitted {
            params: params(&["crypto trading"]),
        },
    );

    let (state, effects) = update(
        state,
        Msg::JobStartSucceeded {
            job: snapshot("job-1", JobPhase::Queued),
        },
    );

    // Exactly one immediate snapshot, and no status fetch until the timer
    // fires.
    assert_eq!(state.job(), Some(&snapshot("job-1", JobPhase::Queued)));
    assert_eq!(effects, vec![Effect::StartJobPolling]);
}

#[test]
fn start_failure_clears_processing_and_raises_alert() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::StartJobSubmitted {
            params: params(&["crypto trading"]),
        },
    );

    let (state, effects) = update(
        state,
        Msg::JobStartFailed {
            message: "http status 500".to_string(),
        },
    );

    assert!(!state.is_processing());
    assert_eq!(state.alert(), Some("http status 500"));
    assert!(effects.is_empty());
}

#[test]
fn ticks_issue_status_fetches_with_rising_seq() {
    init_logging();
    let state = tracking("job-1");

    let (state, effects) = update(state, Msg::PollTick);
    assert_eq!(
        effects,
        vec![Effect::FetchJobStatus {
            job_id: JobId::new("job-1"),
            seq: 1,
        }]
    );

    let (_state, effects) = update(state, Msg::PollTick);
    assert_eq!(
        effects,
        vec![Effect::FetchJobStatus {
            job_id: JobId::new("job-1"),
            seq: 2,
        }]
    );
}

#[test]
fn tick_when_idle_is_noop() {
    init_logging();
    let state = AppState::new();
    let (_state, effects) = update(state, Msg::PollTick);
    assert!(effects.is_empty());
}

#[test]
fn terminal_status_stops_polling_and_refreshes_leads_once() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::StartJobSubmitted {
            params: JobParams {
                keywords: vec!["ab".to_string()],
                max_videos_per_keyword: 100,
                ..JobParams::default()
            },
        },
    );
    let (state, _) = update(
        state,
        Msg::JobStartSucceeded {
            job: snapshot("job-1", JobPhase::Queued),
        },
    );

    let (state, _) = update(state, Msg::PollTick);
    let running = Job {
        channels_discovered: 5,
        ..snapshot("job-1", JobPhase::Running)
    };
    let (state, effects) = update(state, Msg::JobStatusArrived { seq: 1, job: running });
    assert!(effects.is_empty());
    assert_eq!(state.job().unwrap().channels_discovered, 5);
    assert!(state.is_processing());

    let (state, _) = update(state, Msg::PollTick);
    let completed = Job {
        channels_discovered: 50,
        emails_found: 10,
        ..snapshot("job-1", JobPhase::Completed)
    };
    let (state, effects) = update(
        state,
        Msg::JobStatusArrived {
            seq: 2,
            job: completed,
        },
    );

    assert_eq!(
        effects,
        vec![Effect::StopJobPolling, Effect::RefreshLeads]
    );
    assert!(!state.is_processing());
    assert!(state.tracked_job().is_none());
    assert_eq!(state.job().unwrap().emails_found, 10);

    // A tick already queued when the run ended does nothing.
    let (_state, effects) = update(state, Msg::PollTick);
    assert!(effects.is_empty());
}

#[test]
fn failed_run_also_stops_polling() {
    init_logging();
    let state = tracking("job-1");
    let (state, _) = update(state, Msg::PollTick);

    let failed = Job {
        errors: vec!["quota exceeded".to_string()],
        ..snapshot("job-1", JobPhase::Failed)
    };
    let (state, effects) = update(state, Msg::JobStatusArrived { seq: 1, job: failed });

    assert_eq!(effects, vec![Effect::StopJobPolling, Effect::RefreshLeads]);
    assert!(!state.is_processing());

    let view = state.view();
    let job_view = view.job.expect("failed snapshot stays visible");
    assert_eq!(job_view.phase, JobPhase::Failed);
    assert_eq!(job_view.errors, vec!["quota exceeded".to_string()]);
}

#[test]
fn transient_fetch_failure_keeps_polling() {
    init_logging();
    let state = tracking("job-1");
    let (state, _) = update(state, Msg::PollTick);

    let (state, effects) = update(
        state,
        Msg::JobStatusFetchFailed {
            seq: 1,
            message: "timeout".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert!(state.is_processing());
    assert_eq!(state.job(), Some(&snapshot("job-1", JobPhase::Queued)));

    let (_state, effects) = update(state, Msg::PollTick);
    assert_eq!(
        effects,
        vec![Effect::FetchJobStatus {
            job_id: JobId::new("job-1"),
            seq: 2,
        }]
    );
}

#[test]
fn stale_response_is_discarded() {
    init_logging();
    let state = tracking("job-1");
    let (state, _) = update(state, Msg::PollTick);
    let (state, _) = update(state, Msg::PollTick);

    // The second fetch resolves first.
    let newer = Job {
        channels_discovered: 9,
        ..snapshot("job-1", JobPhase::Running)
    };
    let (state, _) = update(state, Msg::JobStatusArrived { seq: 2, job: newer });

    let stale = Job {
        channels_discovered: 4,
        ..snapshot("job-1", JobPhase::Running)
    };
    let (state, effects) = update(state, Msg::JobStatusArrived { seq: 1, job: stale });

    assert!(effects.is_empty());
    assert_eq!(state.job().unwrap().channels_discovered, 9);
}

#[test]
fn response_after_idle_is_discarded() {
    init_logging();
    let state = tracking("job-1");
    let (state, _) = update(state, Msg::PollTick);
    let (state, _) = update(
        state,
        Msg::JobStatusArrived {
            seq: 1,
            job: snapshot("job-1", JobPhase::Completed),
        },
    );
    assert!(!state.is_processing());

    // A slow fetch from before the terminal response lands afterwards.
    let late = Job {
        channels_discovered: 3,
        ..snapshot("job-1", JobPhase::Running)
    };
    let (state, effects) = update(state, Msg::JobStatusArrived { seq: 2, job: late });

    assert!(effects.is_empty());
    assert!(!state.is_processing());
    assert_eq!(state.job().unwrap().status, JobPhase::Completed);
}

#[test]
fn response_for_other_job_is_discarded() {
    init_logging();
    let state = tracking("job-1");
    let (state, _) = update(state, Msg::PollTick);

    let (state, effects) = update(
        state,
        Msg::JobStatusArrived {
            seq: 1,
            job: snapshot("job-0", JobPhase::Completed),
        },
    );

    assert!(effects.is_empty());
    assert!(state.is_processing());
    assert_eq!(state.job().unwrap().id, JobId::new("job-1"));
}
