use crate::{Job, JobParams, Lead, MetricsSnapshot, Tab};

/// Every event the dashboard reacts to, operator-driven or asynchronous.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Client came up; prime the lead collections.
    ClientStarted,
    /// Operator submitted the generator form.
    StartJobSubmitted { params: JobParams },
    /// Start request succeeded; the payload is the first status snapshot.
    JobStartSucceeded { job: Job },
    /// Start request failed before tracking began.
    JobStartFailed { message: String },
    /// Status poll timer fired.
    PollTick,
    /// A status fetch resolved.
    JobStatusArrived { seq: u64, job: Job },
    /// A status fetch failed; transient, polling continues.
    JobStatusFetchFailed { seq: u64, message: String },
    /// Operator asked for a lead refresh.
    RefreshLeadsRequested,
    /// Both halves of the dual lead fetch resolved.
    LeadsRefreshed {
        with_email: Vec<Lead>,
        without_email: Vec<Lead>,
    },
    /// At least one half of the dual lead fetch failed.
    LeadsRefreshFailed { message: String },
    /// Operator submitted an email address for a no-email lead.
    EmailSubmitted { channel_id: String, email: String },
    /// Server accepted the email and reclassified the lead.
    EmailAddSucceeded { channel_id: String },
    /// Server rejected the email; nothing changed locally.
    EmailAddFailed { channel_id: String, message: String },
    /// Operator switched tabs.
    TabSelected(Tab),
    /// Metrics timer fired. Also sent immediately on entering the
    /// monitoring tab.
    MetricsTick,
    /// Operator clicked the manual metrics refresh.
    MetricsRefreshRequested,
    /// Metrics fetch resolved.
    MetricsArrived { snapshot: MetricsSnapshot },
    /// Metrics fetch failed; the prior snapshot stays.
    MetricsFetchFailed { message: String },
    /// Operator dismissed the blocking alert.
    AlertDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
