pub mod args;
pub mod automation;
pub mod config;
pub mod desktop;
pub mod error;
pub mod gui;
pub mod monitor;
pub mod template_matching;

pub use error::{ReforgeError, ReforgeResult};
pub use template_matching::{TemplateMatcher, Verdict};
