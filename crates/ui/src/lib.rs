#![forbid(unsafe_code)]

pub mod vm;

pub use vm::{FlowVm, ScreenVm, map_screen};
