pub(crate) mod error_handler;
pub(crate) mod misc;

pub(crate) use error_handler::JobError;
pub(crate) use misc::*;
