#![forbid(unsafe_code)]

pub mod model;
pub mod settings;
pub mod time;

pub use settings::{SettingsError, TickSettings};
pub use time::Clock;
