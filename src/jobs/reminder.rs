pub mod dedup;
pub mod dispatch;
pub mod reminder_job;
pub mod window;

pub use reminder_job::{ReminderScheduler, ScanSummary};
