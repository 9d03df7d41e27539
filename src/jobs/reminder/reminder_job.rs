use chrono::{DateTime, Utc};
use mongodb::bson::doc;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tokio::time::interval;

use super::{dedup, dispatch, window};
use crate::constants::*;
use crate::models::{Appointment, NotificationSetting, ReminderEvent};
use crate::utils::JobError;

#[cfg(test)]
use mockall_double::double;

#[cfg_attr(test, double)]
use crate::database::AppDatabase;
#[cfg_attr(test, double)]
use crate::notifier::NotificationClient;

/// Counters accumulated over a single scan pass
#[derive(Debug, Default, PartialEq)]
pub struct ScanSummary {
    pub settings: u32,
    pub candidates: u32,
    pub due: u32,
    pub deduped: u32,
    pub sent: u32,
    pub failed: u32,
}

/// Owns the periodic reminder scan: the database and gateway handles
/// plus a guard which keeps two scans from running concurrently when a
/// slow pass outlives the tick interval.
pub struct ReminderScheduler {
    db: Arc<AppDatabase>,
    notifier: Arc<NotificationClient>,
    in_flight: Mutex<()>,
}

impl ReminderScheduler {
    pub fn new(db: Arc<AppDatabase>, notifier: Arc<NotificationClient>) -> Self {
        Self {
            db,
            notifier,
            in_flight: Mutex::new(()),
        }
    }

    pub async fn run(&self) {
        tracing::debug!("initializing reminder scheduler job");
        // REMINDER_JOB_INTERVAL is mentioned in seconds
        let mut interval = interval(Duration::from_secs(REMINDER_JOB_INTERVAL));
        loop {
            interval.tick().await;
            self.tick(Utc::now()).await;
        }
    }

    /// Runs one scan pass unless the previous one is still in progress
    pub async fn tick(&self, now: DateTime<Utc>) {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::warn!("previous reminder scan still running, skipping tick");
            return;
        };
        match self.scan(now).await {
            Ok(summary) => tracing::debug!("reminder scan complete: {:?}", summary),
            Err(err) if err.is_transient() => {
                tracing::warn!("reminder scan failed, retrying next tick: {}", err)
            }
            Err(err) => tracing::error!("reminder scan failed: {}", err),
        }
    }

    /// Scans every active reminder setting once against the given instant
    pub async fn scan(&self, now: DateTime<Utc>) -> Result<ScanSummary, JobError> {
        let mut events = vec![];
        for event in ReminderEvent::all() {
            events.push(event.to_bson()?);
        }
        let filter = doc! {"isActive": true, "event": {"$in": events}};
        let settings = self
            .db
            .find::<NotificationSetting>(DB_NAME, COLL_NOTIFICATION_SETTINGS, Some(filter), None)
            .await?;
        let mut summary = ScanSummary::default();
        for setting in settings {
            summary.settings += 1;
            if let Err(err) = self.process_setting(&setting, now, &mut summary).await {
                summary.failed += 1;
                if err.is_transient() {
                    tracing::warn!("setting {:?} skipped this scan: {}", setting._id, err);
                } else {
                    tracing::error!("setting {:?} failed: {}", setting._id, err);
                }
            }
        }
        Ok(summary)
    }

    async fn process_setting(
        &self,
        setting: &NotificationSetting,
        now: DateTime<Utc>,
        summary: &mut ScanSummary,
    ) -> Result<(), JobError> {
        let channels = setting.channels();
        if channels.is_empty() {
            return Ok(());
        }
        let event = setting.event;
        let offset_mins = setting.offset_mins();
        let mut statuses = vec![];
        for status in event.candidate_statuses() {
            statuses.push(status.to_bson()?);
        }
        let filter = doc! {"salonId": &setting.salon_id, "status": {"$in": statuses}};
        let appointments = self
            .db
            .find::<Appointment>(DB_NAME, COLL_APPOINTMENTS, Some(filter), None)
            .await?;
        for appointment in appointments {
            summary.candidates += 1;
            let target = match window::target_instant(&appointment, event) {
                Ok(target) => target,
                Err(err) => {
                    tracing::debug!("appointment {:?} skipped: {}", appointment._id, err);
                    continue;
                }
            };
            if !window::is_due(target, event, offset_mins, now) {
                continue;
            }
            summary.due += 1;
            let Some(appointment_id) = appointment._id.as_ref() else {
                tracing::debug!("appointment without _id skipped");
                continue;
            };
            let remaining = dedup::unsent_channels(&self.db, appointment_id, event, &channels).await?;
            if remaining.is_empty() {
                summary.deduped += 1;
                continue;
            }
            let outcome = dispatch::dispatch_reminder(
                &self.db,
                &self.notifier,
                event,
                &appointment,
                &remaining,
                now,
            )
            .await?;
            summary.sent += outcome.sent;
            summary.failed += outcome.failed;
        }
        Ok(())
    }
}
