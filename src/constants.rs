pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const MONGO_MIN_POOL_SIZE: u32 = 5;
pub const MONGO_MAX_POOL_SIZE: u32 = 10;
pub const MONGO_CONN_TIMEOUT: u64 = 10;

// REMINDER_JOB_INTERVAL is mentioned in seconds
pub const REMINDER_JOB_INTERVAL: u64 = 60;
// appointments are due when their target instant is within this many
// minutes of the scheduled reminder instant, inclusive both ends
pub const DUE_WINDOW_TOLERANCE_MINS: i64 = 5;

// reminder offsets used when a setting carries no timingMinutes override
pub const REMINDER_24H_DEFAULT_MINS: i64 = 1440;
pub const REMINDER_2H_DEFAULT_MINS: i64 = 120;
pub const FOLLOWUP_DEFAULT_MINS: i64 = 60;

pub const DISPATCH_MAX_ATTEMPTS: u32 = 3;
pub const DISPATCH_RETRY_DELAY_SECS: u64 = 2;

pub const NOTIFICATION_SERVICE_URL: &str = "http://localhost:7077";

pub const DB_NAME: &str = "salonbook";

pub const COLL_NOTIFICATION_SETTINGS: &str = "notificationSettings";
pub const COLL_APPOINTMENTS: &str = "appointments";
pub const COLL_NOTIFICATION_LOGS: &str = "notificationLogs";

pub const REMINDER_24H_TEMPLATE: &str = "Hi {{clientName}}, a reminder that your {{serviceName}} appointment with {{staffName}} at {{salonName}} is tomorrow at {{time}}.";
pub const REMINDER_2H_TEMPLATE: &str = "Hi {{clientName}}, your {{serviceName}} appointment at {{salonName}} starts today at {{time}}.";
pub const FOLLOWUP_TEMPLATE: &str = "Hi {{clientName}}, thank you for visiting {{salonName}}. We hope you loved your {{serviceName}}!";

pub const REMINDER_24H_SUBJECT: &str = "Your appointment tomorrow";
pub const REMINDER_2H_SUBJECT: &str = "Your appointment today";
pub const FOLLOWUP_SUBJECT: &str = "Thanks for your visit";
