mod app_error;
pub mod messages;

pub use app_error::{AppError, AppResult, ErrorKind};
