use chrono::{DateTime, Duration, Utc};

use crate::constants::DUE_WINDOW_TOLERANCE_MINS;
use crate::models::{Appointment, ReminderEvent};
use crate::utils::JobError;

/// Instant the event targets: the appointment start for forward
/// reminders, the appointment end for follow-ups
pub fn target_instant(
    appointment: &Appointment,
    event: ReminderEvent,
) -> Result<DateTime<Utc>, JobError> {
    if event.is_followup() {
        appointment.end_instant()
    } else {
        appointment.start_instant()
    }
}

/// An appointment is due when its target instant falls inside the
/// tolerance window around now plus the offset (minus for follow-ups,
/// which look backward). Both window ends are inclusive.
pub fn is_due(
    target: DateTime<Utc>,
    event: ReminderEvent,
    offset_mins: i64,
    now: DateTime<Utc>,
) -> bool {
    let offset = Duration::minutes(offset_mins);
    let center = if event.is_followup() {
        now - offset
    } else {
        now + offset
    };
    let tolerance = Duration::minutes(DUE_WINDOW_TOLERANCE_MINS);
    target >= center - tolerance && target <= center + tolerance
}
