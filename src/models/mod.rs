use serde::{Deserialize, Serialize};

pub mod appointment;
pub mod notification;

#[derive(Debug, Serialize, Deserialize)]
pub struct GenericResponse {
    pub success: bool,
    pub message: String,
}

pub use appointment::*;
pub use notification::*;
