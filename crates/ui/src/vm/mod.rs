mod flow_vm;
mod screen_vm;

pub use flow_vm::FlowVm;
pub use screen_vm::{ButtonVm, QuestionVm, ScreenVm, map_screen};
