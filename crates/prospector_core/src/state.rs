use crate::{Job, JobId, Lead, MetricsSnapshot};

/// Dashboard views the operator can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Generator,
    Leads,
    NoEmail,
    Monitoring,
}

/// The process-local projection of server-side state.
///
/// Mutated only through the named transition methods below, which are in
/// turn called only from [`crate::update`]. Every mutation that changes what
/// the operator sees marks the state dirty so the host can coalesce renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    processing: bool,
    tracking: Option<JobId>,
    job: Option<Job>,
    leads_with_email: Vec<Lead>,
    leads_without_email: Vec<Lead>,
    active_tab: Tab,
    metrics: Option<MetricsSnapshot>,
    metrics_loading: bool,
    alert: Option<String>,
    status_seq_issued: u64,
    status_seq_applied: u64,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Id of the run the poller is currently tracking, if any.
    pub fn tracked_job(&self) -> Option<&JobId> {
        self.tracking.as_ref()
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub fn leads_with_email(&self) -> &[Lead] {
        &self.leads_with_email
    }

    pub fn leads_without_email(&self) -> &[Lead] {
        &self.leads_without_email
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn metrics(&self) -> Option<&MetricsSnapshot> {
        self.metrics.as_ref()
    }

    pub fn metrics_loading(&self) -> bool {
        self.metrics_loading
    }

    /// Blocking operator notification, set by start and mutation failures.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Peek at the dirty flag without resetting it.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether a render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // Transitions. One per event in the update function; ad-hoc field
    // mutation from call sites is not allowed.

    pub(crate) fn begin_start(&mut self) {
        self.processing = true;
        self.job = None;
        self.alert = None;
        self.mark_dirty();
    }

    pub(crate) fn abort_start(&mut self, message: String) {
        self.processing = false;
        self.alert = Some(message);
        self.mark_dirty();
    }

    /// Enter `Tracking` with the start response as the first snapshot.
    pub(crate) fn begin_tracking(&mut self, job: Job) {
        self.tracking = Some(job.id.clone());
        self.job = Some(job);
        self.status_seq_issued = 0;
        self.status_seq_applied = 0;
        self.mark_dirty();
    }

    /// Next sequence number for an issued status fetch.
    pub(crate) fn next_status_seq(&mut self) -> u64 {
        self.status_seq_issued += 1;
        self.status_seq_issued
    }

    /// A status response is applied only while its run is still tracked and
    /// only if it is newer than the last applied one. Stale responses from
    /// slow in-flight fetches are dropped instead of resurrecting old state.
    pub(crate) fn accepts_status(&self, id: &JobId, seq: u64) -> bool {
        self.tracking.as_ref() == Some(id) && seq > self.status_seq_applied
    }

    pub(crate) fn apply_status(&mut self, seq: u64, job: Job) {
        self.status_seq_applied = seq;
        self.job = Some(job);
        self.mark_dirty();
    }

    /// Leave `Tracking`; the stored snapshot stays visible.
    pub(crate) fn finish_tracking(&mut self) {
        self.tracking = None;
        self.processing = false;
        self.mark_dirty();
    }

    /// Replace both lead collections together. There is deliberately no way
    /// to replace one without the other.
    pub(crate) fn replace_leads(&mut self, with_email: Vec<Lead>, without_email: Vec<Lead>) {
        self.leads_with_email = with_email;
        self.leads_without_email = without_email;
        self.mark_dirty();
    }

    pub(crate) fn set_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.mark_dirty();
    }

    pub(crate) fn begin_metrics_fetch(&mut self) {
        self.metrics_loading = true;
        self.mark_dirty();
    }

    pub(crate) fn apply_metrics(&mut self, snapshot: MetricsSnapshot) {
        self.metrics = Some(snapshot);
        self.metrics_loading = false;
        self.mark_dirty();
    }

    /// Failed refresh keeps the previous snapshot visible.
    pub(crate) fn metrics_fetch_failed(&mut self) {
        self.metrics_loading = false;
        self.mark_dirty();
    }

    pub(crate) fn raise_alert(&mut self, message: String) {
        self.alert = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn clear_alert(&mut self) {
        self.alert = None;
        self.mark_dirty();
    }
}
