use salonbook_reminders::start_reminder_service;

#[tokio::main]
async fn main() {
    start_reminder_service().await;
}
