//! Desktop collaborators: screen capture, input injection and the stop hotkey

pub mod capture;
pub mod hotkey;
pub mod input;
pub mod still;
pub mod types;

pub use capture::DesktopCapture;
pub use hotkey::{STOP_KEY, cursor_position, spawn_monitor_hotkey, spawn_reforge_hotkey, watch_key};
pub use input::DesktopInput;
pub use still::StillCapture;
pub use types::{InputInjector, InputKey, ScreenCapture, ScreenPoint, ScreenRect, ensure_capture_size};
