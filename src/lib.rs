pub mod audio;
pub mod device;
pub mod error;
pub mod signal;
pub mod ui;
pub mod utils;

pub use error::{AppError, SignalError};
