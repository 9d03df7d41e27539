use reqwest::StatusCode;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Failures raised while scanning and dispatching reminders.
/// Transient errors are retried or left for the next tick, permanent
/// ones are recorded and dropped.
#[derive(Debug)]
pub enum JobError {
    Database(mongodb::error::Error),
    Gateway(reqwest::Error),
    GatewayStatus(StatusCode),
    InvalidSchedule(String),
    AnyError(anyhow::Error),
}

impl JobError {
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Database(_) => true,
            Self::Gateway(err) => err.is_timeout() || err.is_connect(),
            Self::GatewayStatus(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::InvalidSchedule(_) => false,
            Self::AnyError(_) => false,
        }
    }
}

impl Display for JobError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Database(err) => write!(f, "database error: {}", err),
            Self::Gateway(err) => write!(f, "notification gateway error: {}", err),
            Self::GatewayStatus(status) => write!(f, "notification gateway returned {}", status),
            Self::InvalidSchedule(msg) => write!(f, "invalid appointment schedule: {}", msg),
            Self::AnyError(err) => write!(f, "{}", err),
        }
    }
}

impl From<mongodb::error::Error> for JobError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err)
    }
}

impl From<reqwest::Error> for JobError {
    fn from(err: reqwest::Error) -> Self {
        Self::Gateway(err)
    }
}

impl From<anyhow::Error> for JobError {
    fn from(err: anyhow::Error) -> Self {
        Self::AnyError(err)
    }
}
