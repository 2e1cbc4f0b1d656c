use chrono::{DateTime, Utc};

use crate::{AppState, JobPhase, Tab};

/// Render-ready projection of the tracked run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatusView {
    pub phase: JobPhase,
    pub current_step: String,
    pub channels_discovered: u64,
    pub channels_processed: u64,
    pub emails_found: u64,
    pub emails_sent: u64,
    pub errors: Vec<String>,
}

/// Render-ready projection of the whole dashboard.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub processing: bool,
    pub active_tab: Tab,
    pub job: Option<JobStatusView>,
    pub leads_with_email: usize,
    pub leads_without_email: usize,
    pub metrics_loading: bool,
    pub metrics_timestamp: Option<DateTime<Utc>>,
    pub alert: Option<String>,
    pub dirty: bool,
}

impl AppState {
    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            processing: self.is_processing(),
            active_tab: self.active_tab(),
            job: self.job().map(|job| JobStatusView {
                phase: job.status,
                current_step: job.current_step.clone(),
                channels_discovered: job.channels_discovered,
                channels_processed: job.channels_processed,
                emails_found: job.emails_found,
                emails_sent: job.emails_sent,
                errors: job.errors.clone(),
            }),
            leads_with_email: self.leads_with_email().len(),
            leads_without_email: self.leads_without_email().len(),
            metrics_loading: self.metrics_loading(),
            metrics_timestamp: self.metrics().and_then(|m| m.timestamp),
            alert: self.alert().map(ToOwned::to_owned),
            dirty: self.is_dirty(),
        }
    }
}
