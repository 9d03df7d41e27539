use chrono::{DateTime, Utc};
use mongodb::bson::doc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::constants::*;
use crate::models::{
    Appointment, NotificationChannel, NotificationLog, NotificationLogStatus, ReminderEvent,
};
use crate::utils::{get_epoch_ts, replace_placeholders, JobError};

#[cfg(test)]
use mockall_double::double;

#[cfg_attr(test, double)]
use crate::database::AppDatabase;
#[cfg_attr(test, double)]
use crate::notifier::NotificationClient;

#[derive(Debug, Default, PartialEq)]
pub struct DispatchOutcome {
    pub sent: u32,
    pub failed: u32,
}

/// Sends the reminder on every requested channel and records the result.
/// A pending log row is claimed per channel before anything goes out, so
/// a racing scan loses the claim and skips instead of double sending.
/// Rows end up SENT on confirmed delivery and FAILED otherwise.
pub async fn dispatch_reminder(
    db: &Arc<AppDatabase>,
    notifier: &Arc<NotificationClient>,
    event: ReminderEvent,
    appointment: &Appointment,
    channels: &[NotificationChannel],
    now: DateTime<Utc>,
) -> Result<DispatchOutcome, JobError> {
    let Some(appointment_id) = appointment._id.as_ref() else {
        return Err(JobError::InvalidSchedule("appointment without _id".into()));
    };
    let rows: Vec<NotificationLog> = channels
        .iter()
        .map(|channel| {
            NotificationLog::new_pending(appointment_id, &appointment.salon_id, event, *channel, now)
        })
        .collect();
    let claimed = db
        .insert_many_skip_duplicates(DB_NAME, COLL_NOTIFICATION_LOGS, rows)
        .await?;
    let message = render_message(event, appointment);
    let mut outcome = DispatchOutcome::default();
    for index in claimed {
        let channel = channels[index];
        let log_id = NotificationLog::log_id(appointment_id, event, channel);
        let Some(recipient) = recipient_for(appointment, channel) else {
            tracing::debug!(
                "appointment {} has no {} recipient, marking failed",
                appointment_id,
                channel
            );
            mark_failed(db, &log_id, "no recipient contact on appointment").await;
            outcome.failed += 1;
            continue;
        };
        match send_with_retry(notifier, channel, &recipient, event.subject(), &message).await {
            Ok(()) => {
                mark_sent(db, &log_id, &message).await;
                outcome.sent += 1;
            }
            Err(err) => {
                tracing::debug!("dispatch to {} failed: {}", recipient, err);
                mark_failed(db, &log_id, &err.to_string()).await;
                outcome.failed += 1;
            }
        }
    }
    Ok(outcome)
}

fn recipient_for(appointment: &Appointment, channel: NotificationChannel) -> Option<String> {
    match channel {
        NotificationChannel::SMS => appointment.client.phone.clone(),
        NotificationChannel::EMAIL => appointment.client.email.clone(),
    }
}

fn render_message(event: ReminderEvent, appointment: &Appointment) -> String {
    let mut values = HashMap::new();
    values.insert("clientName".to_owned(), appointment.client.name.clone());
    values.insert("staffName".to_owned(), appointment.staff.name.clone());
    values.insert("serviceName".to_owned(), appointment.service.name.clone());
    values.insert("salonName".to_owned(), appointment.salon.name.clone());
    values.insert("date".to_owned(), appointment.date.clone());
    values.insert("time".to_owned(), appointment.time.clone());
    replace_placeholders(event.template(), &values)
}

async fn send_with_retry(
    notifier: &Arc<NotificationClient>,
    channel: NotificationChannel,
    to: &str,
    subject: &str,
    message: &str,
) -> Result<(), JobError> {
    let mut attempt = 1;
    loop {
        match notifier.send(channel, to, subject, message).await {
            Ok(()) => return Ok(()),
            Err(err) if err.is_transient() && attempt < DISPATCH_MAX_ATTEMPTS => {
                tracing::debug!("send attempt {} failed, retrying: {}", attempt, err);
                let delay = DISPATCH_RETRY_DELAY_SECS * attempt as u64;
                tokio::time::sleep(Duration::from_secs(delay)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

async fn mark_sent(db: &Arc<AppDatabase>, log_id: &str, message: &str) {
    let Ok(status) = NotificationLogStatus::SENT.to_bson() else {
        tracing::debug!("not able to convert NotificationLogStatus to bson");
        return;
    };
    let ts = get_epoch_ts() as i64;
    let filter = doc! {"_id": log_id};
    let update = doc! {"$set": {"status": status, "message": message, "updatedTs": ts}};
    if let Err(err) = db
        .update_one(DB_NAME, COLL_NOTIFICATION_LOGS, filter, update, None)
        .await
    {
        tracing::debug!("not able to mark log entry sent: {:?}", err);
    }
}

async fn mark_failed(db: &Arc<AppDatabase>, log_id: &str, error_message: &str) {
    let Ok(status) = NotificationLogStatus::FAILED.to_bson() else {
        tracing::debug!("not able to convert NotificationLogStatus to bson");
        return;
    };
    let ts = get_epoch_ts() as i64;
    let filter = doc! {"_id": log_id};
    let update = doc! {"$set": {"status": status, "errorMessage": error_message, "updatedTs": ts}};
    if let Err(err) = db
        .update_one(DB_NAME, COLL_NOTIFICATION_LOGS, filter, update, None)
        .await
    {
        tracing::debug!("not able to mark log entry failed: {:?}", err);
    }
}
