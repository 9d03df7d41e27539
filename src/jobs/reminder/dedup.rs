use mongodb::bson::doc;
use std::sync::Arc;

use crate::constants::*;
use crate::models::{NotificationChannel, NotificationLog, ReminderEvent};
use crate::utils::JobError;

#[cfg(test)]
use mockall_double::double;

#[cfg_attr(test, double)]
use crate::database::AppDatabase;

/// Channels from the requested set with no log entry yet for this
/// appointment and event. Any logged status counts as attempted, a
/// permanently failed channel is not retried on later ticks.
pub async fn unsent_channels(
    db: &Arc<AppDatabase>,
    appointment_id: &str,
    event: ReminderEvent,
    requested: &[NotificationChannel],
) -> Result<Vec<NotificationChannel>, JobError> {
    let mut channel_filters = Vec::with_capacity(requested.len());
    for channel in requested {
        channel_filters.push(channel.to_bson()?);
    }
    let filter = doc! {
        "appointmentId": appointment_id,
        "event": event.to_bson()?,
        "channel": {"$in": channel_filters},
    };
    let existing = db
        .find::<NotificationLog>(DB_NAME, COLL_NOTIFICATION_LOGS, Some(filter), None)
        .await?;
    let remaining = requested
        .iter()
        .copied()
        .filter(|channel| existing.iter().all(|log| log.channel != *channel))
        .collect();
    Ok(remaining)
}
