//! Mouse and keyboard injection through enigo

use super::types::{InputInjector, InputKey, ScreenPoint};
use crate::error::{ReforgeError, ReforgeResult};
use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

/// Desktop input injector. Create it on the thread that uses it.
pub struct DesktopInput {
    enigo: Enigo,
}

impl DesktopInput {
    pub fn new() -> ReforgeResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| ReforgeError::input(format!("could not open input connection: {e}")))?;
        Ok(Self { enigo })
    }

    fn key_event(&mut self, key: InputKey, direction: Direction) -> ReforgeResult<()> {
        let mapped = match key {
            InputKey::Shift => Key::Shift,
            InputKey::Alt => Key::Alt,
            InputKey::Char(c) => Key::Unicode(c),
        };
        self.enigo
            .key(mapped, direction)
            .map_err(|e| ReforgeError::input(format!("key {key} {direction:?}: {e}")))
    }

    fn click(&mut self, button: Button) -> ReforgeResult<()> {
        self.enigo
            .button(button, Direction::Click)
            .map_err(|e| ReforgeError::input(format!("{button:?} click: {e}")))
    }
}

impl InputInjector for DesktopInput {
    fn move_to(&mut self, point: ScreenPoint) -> ReforgeResult<()> {
        self.enigo
            .move_mouse(point.x, point.y, Coordinate::Abs)
            .map_err(|e| ReforgeError::input(format!("move to {point}: {e}")))
    }

    fn left_click(&mut self) -> ReforgeResult<()> {
        self.click(Button::Left)
    }

    fn right_click(&mut self) -> ReforgeResult<()> {
        self.click(Button::Right)
    }

    fn key_down(&mut self, key: InputKey) -> ReforgeResult<()> {
        self.key_event(key, Direction::Press)
    }

    fn key_up(&mut self, key: InputKey) -> ReforgeResult<()> {
        self.key_event(key, Direction::Release)
    }

    fn key_press(&mut self, key: InputKey) -> ReforgeResult<()> {
        self.key_event(key, Direction::Click)
    }
}
