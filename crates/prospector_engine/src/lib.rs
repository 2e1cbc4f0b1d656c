//! Prospector engine: API client and effect execution.
mod api;
mod error;
mod runtime;

pub use api::{ApiSettings, LeadApi, ReqwestLeadApi};
pub use error::{ApiError, FailureKind};
pub use runtime::{EngineHandle, TimerSettings};
