use chrono::{DateTime, Utc};
use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::constants::*;
use crate::models::appointment::AppointmentStatus;
use crate::utils::deserialize_helper;

/// Reminder events this subsystem owns. Other notification events of the
/// app (booking confirmations etc) are dispatched inline by their own
/// handlers and never reach the scheduler.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum ReminderEvent {
    REMINDER_24H,
    REMINDER_2H,
    FOLLOWUP,
}

impl ReminderEvent {
    pub fn to_bson(&self) -> anyhow::Result<Bson> {
        let bson = mongodb::bson::to_bson(self)?;
        Ok(bson)
    }

    pub fn all() -> [ReminderEvent; 3] {
        [Self::REMINDER_24H, Self::REMINDER_2H, Self::FOLLOWUP]
    }

    /// Reminder offset used when the setting carries no override
    pub fn default_offset_mins(&self) -> i64 {
        match self {
            Self::REMINDER_24H => REMINDER_24H_DEFAULT_MINS,
            Self::REMINDER_2H => REMINDER_2H_DEFAULT_MINS,
            Self::FOLLOWUP => FOLLOWUP_DEFAULT_MINS,
        }
    }

    /// Follow-ups look backward from the appointment end, reminders look
    /// forward from the appointment start
    pub fn is_followup(&self) -> bool {
        matches!(self, Self::FOLLOWUP)
    }

    /// Appointment statuses eligible for this event
    pub fn candidate_statuses(&self) -> Vec<AppointmentStatus> {
        match self {
            Self::FOLLOWUP => vec![AppointmentStatus::COMPLETED],
            _ => vec![AppointmentStatus::SCHEDULED, AppointmentStatus::CONFIRMED],
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            Self::REMINDER_24H => REMINDER_24H_TEMPLATE,
            Self::REMINDER_2H => REMINDER_2H_TEMPLATE,
            Self::FOLLOWUP => FOLLOWUP_TEMPLATE,
        }
    }

    pub fn subject(&self) -> &'static str {
        match self {
            Self::REMINDER_24H => REMINDER_24H_SUBJECT,
            Self::REMINDER_2H => REMINDER_2H_SUBJECT,
            Self::FOLLOWUP => FOLLOWUP_SUBJECT,
        }
    }
}

impl Display for ReminderEvent {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::REMINDER_24H => write!(f, "REMINDER_24H"),
            Self::REMINDER_2H => write!(f, "REMINDER_2H"),
            Self::FOLLOWUP => write!(f, "FOLLOWUP"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum NotificationChannel {
    SMS,
    EMAIL,
}

impl NotificationChannel {
    pub fn to_bson(&self) -> anyhow::Result<Bson> {
        let bson = mongodb::bson::to_bson(self)?;
        Ok(bson)
    }
}

impl Display for NotificationChannel {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::SMS => write!(f, "SMS"),
            Self::EMAIL => write!(f, "EMAIL"),
        }
    }
}

/// Per salon and event configuration, maintained by the salon dashboard.
/// Read-only to this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSetting {
    #[serde(rename = "_id")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "deserialize_helper")]
    #[serde(default)]
    pub _id: Option<String>,
    pub salon_id: String,
    pub event: ReminderEvent,
    pub sms_enabled: bool,
    pub email_enabled: bool,
    pub timing_minutes: Option<i64>,
    pub is_active: bool,
}

impl NotificationSetting {
    /// Channels this setting wants notified
    pub fn channels(&self) -> Vec<NotificationChannel> {
        let mut channels = vec![];
        if self.sms_enabled {
            channels.push(NotificationChannel::SMS);
        }
        if self.email_enabled {
            channels.push(NotificationChannel::EMAIL);
        }
        channels
    }

    pub fn offset_mins(&self) -> i64 {
        self.timing_minutes
            .unwrap_or_else(|| self.event.default_offset_mins())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[allow(non_camel_case_types)]
pub enum NotificationLogStatus {
    PENDING,
    SENT,
    FAILED,
}

impl NotificationLogStatus {
    pub fn to_bson(&self) -> anyhow::Result<Bson> {
        let bson = mongodb::bson::to_bson(self)?;
        Ok(bson)
    }
}

/// One delivery attempt per appointment, event and channel. The _id is
/// the deterministic "appointmentId:event:channel" key, so a second
/// insert for the same tuple collides on the server without any index
/// management here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationLog {
    #[serde(rename = "_id")]
    pub _id: String,
    pub appointment_id: String,
    pub salon_id: String,
    pub event: ReminderEvent,
    pub channel: NotificationChannel,
    pub status: NotificationLogStatus,
    pub message: Option<String>,
    pub error_message: Option<String>,
    pub created_ts: Option<u64>,
    pub updated_ts: Option<u64>,
}

impl NotificationLog {
    pub fn log_id(
        appointment_id: &str,
        event: ReminderEvent,
        channel: NotificationChannel,
    ) -> String {
        format!("{}:{}:{}", appointment_id, event, channel)
    }

    pub fn new_pending(
        appointment_id: &str,
        salon_id: &str,
        event: ReminderEvent,
        channel: NotificationChannel,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            _id: Self::log_id(appointment_id, event, channel),
            appointment_id: appointment_id.to_owned(),
            salon_id: salon_id.to_owned(),
            event,
            channel,
            status: NotificationLogStatus::PENDING,
            message: None,
            error_message: None,
            created_ts: Some(now.timestamp() as u64),
            updated_ts: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(sms: bool, email: bool, timing: Option<i64>) -> NotificationSetting {
        NotificationSetting {
            _id: Some("64a1f0c2d4e5f6a7b8c9d0e2".to_owned()),
            salon_id: "salon1".to_owned(),
            event: ReminderEvent::REMINDER_24H,
            sms_enabled: sms,
            email_enabled: email,
            timing_minutes: timing,
            is_active: true,
        }
    }

    #[test]
    fn test_channels() {
        assert_eq!(
            setting(true, false, None).channels(),
            vec![NotificationChannel::SMS]
        );
        assert_eq!(
            setting(true, true, None).channels(),
            vec![NotificationChannel::SMS, NotificationChannel::EMAIL]
        );
        assert_eq!(setting(false, false, None).channels(), vec![]);
    }

    #[test]
    fn test_offset_mins_defaults_per_event() {
        let mut s = setting(true, false, None);
        assert_eq!(s.offset_mins(), 1440);
        s.event = ReminderEvent::REMINDER_2H;
        assert_eq!(s.offset_mins(), 120);
        s.event = ReminderEvent::FOLLOWUP;
        assert_eq!(s.offset_mins(), 60);
    }

    #[test]
    fn test_offset_mins_honours_override() {
        let s = setting(true, false, Some(90));
        assert_eq!(s.offset_mins(), 90);
    }

    #[test]
    fn test_log_id_is_deterministic() {
        let id = NotificationLog::log_id(
            "a1",
            ReminderEvent::REMINDER_24H,
            NotificationChannel::SMS,
        );
        assert_eq!(id, "a1:REMINDER_24H:SMS");
    }

    #[test]
    fn test_new_pending() {
        let now = Utc::now();
        let log = NotificationLog::new_pending(
            "a1",
            "salon1",
            ReminderEvent::FOLLOWUP,
            NotificationChannel::EMAIL,
            now,
        );
        assert_eq!(log._id, "a1:FOLLOWUP:EMAIL");
        assert_eq!(log.status, NotificationLogStatus::PENDING);
        assert_eq!(log.created_ts, Some(now.timestamp() as u64));
        assert_eq!(log.message, None);
        assert_eq!(log.updated_ts, None);
    }
}
