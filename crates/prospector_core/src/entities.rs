//! Domain entities shared between the state machine and the API layer.
//!
//! Everything the server may omit carries `#[serde(default)]`: absent
//! counters decode as zero, absent optionals as `None`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque server-issued identifier for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle phase reported by the server for a pipeline run.
///
/// Older backends report `started` for a freshly accepted run and
/// `processing` while it executes; both are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    #[serde(alias = "started")]
    Queued,
    #[serde(alias = "processing")]
    Running,
    Completed,
    Failed,
}

impl JobPhase {
    /// Terminal phases stop the poller.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One status snapshot of a pipeline run.
///
/// The client never edits a `Job`; the poller overwrites it wholesale with
/// whatever the server reports. `errors` is server-authoritative and
/// append-only on the server side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobPhase,
    #[serde(default)]
    pub current_step: String,
    #[serde(default)]
    pub channels_discovered: u64,
    #[serde(default)]
    pub channels_processed: u64,
    #[serde(default)]
    pub emails_found: u64,
    #[serde(default)]
    pub emails_sent: u64,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Parameters for a start request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobParams {
    pub keywords: Vec<String>,
    pub max_videos_per_keyword: u32,
    pub max_channels: u32,
    pub subscriber_min: u64,
    pub subscriber_max: u64,
    pub content_frequency_min: f64,
    pub content_frequency_max: f64,
}

impl Default for JobParams {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            max_videos_per_keyword: 2000,
            max_channels: 500,
            subscriber_min: 10_000,
            subscriber_max: 1_000_000,
            content_frequency_min: 0.14,
            content_frequency_max: 2.0,
        }
    }
}

impl JobParams {
    /// Start precondition: at least one keyword and none blank.
    pub fn keywords_valid(&self) -> bool {
        !self.keywords.is_empty() && self.keywords.iter().all(|k| !k.trim().is_empty())
    }
}

/// How a lead's contact address was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailStatus {
    Found,
    ManuallyAdded,
    #[default]
    NotFound,
}

/// Delivery state of the outreach message for a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailSendState {
    Pending,
    Sent,
    Failed,
    #[default]
    NotSent,
}

/// One discovered channel with its enrichment and outreach metadata.
///
/// Leads are partitioned server-side into "has email" and "no email"
/// collections; the client never reclassifies one locally.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default)]
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub channel_url: String,
    #[serde(default)]
    pub subscriber_count: u64,
    #[serde(default)]
    pub video_count: u64,
    #[serde(default)]
    pub content_frequency_weekly: Option<f64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_status: EmailStatus,
    #[serde(default)]
    pub email_sent_status: EmailSendState,
    #[serde(default)]
    pub latest_video_title: Option<String>,
    /// Keywords the channel matched, in server-defined order.
    #[serde(default)]
    pub keywords_found_in: Vec<String>,
    #[serde(default)]
    pub top_comment: Option<String>,
    #[serde(default)]
    pub comment_author: Option<String>,
    /// Generated outreach subject line, if one was produced.
    #[serde(default)]
    pub email_subject: Option<String>,
    #[serde(default)]
    pub discovery_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub processing_timestamp: Option<DateTime<Utc>>,
}

/// Aggregate health numbers for the whole pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemPerformance {
    pub total_requests_processed: u64,
    pub success_rate: f64,
    pub overall_success_rate: f64,
    pub avg_response_time: f64,
    pub active_sessions: u64,
    pub active_accounts: u64,
    pub total_accounts: u64,
    pub healthy_proxies: u64,
    pub total_proxies: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliabilityMetrics {
    pub overall_reliability_score: f64,
    pub system_stability: Option<String>,
    pub availability_percentage: f64,
    pub mtbf_hours: f64,
    pub mttr_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CostTracking {
    pub api_requests_last_24h: u64,
    pub avg_processing_time_ms: f64,
    pub total_processing_cost_estimate: f64,
}

/// One row in the top-performing accounts list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSummary {
    pub account_id: String,
    pub email: Option<String>,
    pub status: Option<String>,
    pub total_requests: u64,
    pub success_rate: f64,
    pub last_used: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountPerformance {
    pub total_accounts: u64,
    pub healthy_accounts: u64,
    pub banned_accounts: u64,
    pub avg_success_rate: f64,
    pub top_performing: Vec<AccountSummary>,
}

/// One row in the fastest-proxies list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySummary {
    pub proxy_id: String,
    pub ip: String,
    pub port: u16,
    pub location: Option<String>,
    pub health_status: Option<String>,
    pub total_requests: u64,
    pub avg_response_time: f64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyPerformance {
    pub total_proxies: u64,
    pub healthy_proxies: u64,
    pub banned_proxies: u64,
    pub avg_response_time: f64,
    pub fastest_proxies: Vec<ProxySummary>,
}

/// One active alert raised by the monitoring backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsAlert {
    /// Free text, the backend uses high / medium / low.
    pub severity: String,
    pub message: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Latest monitoring snapshot, stored wholesale and replaced on each
/// successful refresh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSnapshot {
    pub system_performance: SystemPerformance,
    pub reliability_metrics: ReliabilityMetrics,
    pub cost_tracking: CostTracking,
    pub account_performance: AccountPerformance,
    pub proxy_performance: ProxyPerformance,
    pub alerts: Vec<MetricsAlert>,
    pub timestamp: Option<DateTime<Utc>>,
}
