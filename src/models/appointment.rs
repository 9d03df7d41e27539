use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

use crate::utils::{deserialize_helper, JobError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[allow(non_camel_case_types)]
pub enum AppointmentStatus {
    SCHEDULED,
    CONFIRMED,
    COMPLETED,
    CANCELLED,
    NO_SHOW,
}

impl AppointmentStatus {
    pub fn to_bson(&self) -> anyhow::Result<Bson> {
        let bson = mongodb::bson::to_bson(self)?;
        Ok(bson)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalonInfo {
    pub name: String,
}

/// Booking created by the rest of the application. This subsystem only
/// reads appointments, the embedded client/staff/service/salon info
/// documents carry everything the reminder templates need.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "deserialize_helper")]
    #[serde(default)]
    pub _id: Option<String>,
    pub salon_id: String,
    pub date: String,
    pub time: String,
    pub duration_mins: i64,
    pub status: AppointmentStatus,
    pub client: ClientInfo,
    pub staff: StaffInfo,
    pub service: ServiceInfo,
    pub salon: SalonInfo,
}

impl Appointment {
    /// Combines the date and time fields into a UTC instant
    pub fn start_instant(&self) -> Result<DateTime<Utc>, JobError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|_| {
            JobError::InvalidSchedule(format!("bad appointment date: {}", self.date))
        })?;
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&self.time, "%H:%M:%S"))
            .map_err(|_| {
                JobError::InvalidSchedule(format!("bad appointment time: {}", self.time))
            })?;
        Ok(Utc.from_utc_datetime(&date.and_time(time)))
    }

    /// Instant at which the appointment ends
    pub fn end_instant(&self) -> Result<DateTime<Utc>, JobError> {
        let start = self.start_instant()?;
        Ok(start + Duration::minutes(self.duration_mins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(date: &str, time: &str, duration_mins: i64) -> Appointment {
        Appointment {
            _id: Some("64a1f0c2d4e5f6a7b8c9d0e1".to_owned()),
            salon_id: "salon1".to_owned(),
            date: date.to_owned(),
            time: time.to_owned(),
            duration_mins,
            status: AppointmentStatus::SCHEDULED,
            client: ClientInfo {
                name: "Priya".to_owned(),
                phone: Some("5550100".to_owned()),
                email: Some("priya@example.com".to_owned()),
            },
            staff: StaffInfo {
                name: "Dana".to_owned(),
            },
            service: ServiceInfo {
                name: "Haircut".to_owned(),
            },
            salon: SalonInfo {
                name: "Shear Bliss".to_owned(),
            },
        }
    }

    #[test]
    fn test_start_instant() {
        let appointment = appointment("2026-03-11", "10:00", 45);
        let start = appointment.start_instant().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 11, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_start_instant_with_seconds() {
        let appointment = appointment("2026-03-11", "10:05:30", 45);
        let start = appointment.start_instant().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 11, 10, 5, 30).unwrap());
    }

    #[test]
    fn test_end_instant_adds_duration() {
        let appointment = appointment("2026-03-11", "10:00", 45);
        let end = appointment.end_instant().unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 3, 11, 10, 45, 0).unwrap());
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let appointment = appointment("11-03-2026", "10:00", 45);
        let err = appointment.start_instant().unwrap_err();
        assert!(!err.is_transient());
        assert_eq!(
            err.to_string(),
            "invalid appointment schedule: bad appointment date: 11-03-2026"
        );
    }

    #[test]
    fn test_bad_time_is_rejected() {
        let appointment = appointment("2026-03-11", "25:99", 45);
        let err = appointment.start_instant().unwrap_err();
        assert!(!err.is_transient());
    }
}
