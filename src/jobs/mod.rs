use std::sync::Arc;

use self::reminder::ReminderScheduler;

pub mod reminder;

#[cfg(test)]
use mockall_double::double;

#[cfg_attr(test, double)]
use crate::database::AppDatabase;
#[cfg_attr(test, double)]
use crate::notifier::NotificationClient;

pub fn spawn_all_jobs(db: Arc<AppDatabase>, notifier: Arc<NotificationClient>) {
    // spawn job to periodically scan for due appointment reminders
    tokio::spawn(async move {
        let scheduler = ReminderScheduler::new(db, notifier);
        scheduler.run().await;
    });
}
