pub mod activity_log;
pub mod monitor_loop;
pub mod reforge_loop;
pub mod types;

pub use activity_log::push_log;
pub use monitor_loop::{start_monitor, stop_monitor};
pub use reforge_loop::{start_reforge, stop_reforge};
pub use types::*;
