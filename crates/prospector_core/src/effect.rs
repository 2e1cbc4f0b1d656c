use crate::{JobId, JobParams};

/// IO the update function requests from the engine.
///
/// Effects carry everything the engine needs; the engine never reads state.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue the start request.
    StartJob { params: JobParams },
    /// Fetch the status of the tracked run. `seq` tags the fetch so a slow
    /// response can be recognized as stale when it finally lands.
    FetchJobStatus { job_id: JobId, seq: u64 },
    /// Start the periodic status timer. The first tick comes one full
    /// period after start; the start response already was a snapshot.
    StartJobPolling,
    /// Cancel the status timer.
    StopJobPolling,
    /// Fetch both lead collections concurrently; they are applied together
    /// or not at all.
    RefreshLeads,
    /// Attach an email to a lead. The server sends outreach and moves the
    /// lead into the with-email collection.
    SubmitEmail { channel_id: String, email: String },
    /// Fetch the monitoring snapshot once.
    FetchMetrics,
    /// Start the metrics timer: one tick immediately, then periodic.
    StartMetricsPolling,
    /// Cancel the metrics timer.
    StopMetricsPolling,
}
