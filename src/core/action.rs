//! # Actions
//!
//! Every accepted keypress becomes an `Action`. `update()` applies it to the
//! position model and tells the caller what to do next.
//!
//! ```text
//! PositionModel + Action  →  update()  →  Effect
//! ```
//!
//! No I/O here: rendering and quitting are the caller's job.

use crate::core::position::PositionModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Reset,
    Quit,
}

/// What the caller should do after an action has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Redraw,
    Quit,
}

pub fn update(model: &mut PositionModel, action: Action) -> Effect {
    match action {
        Action::Up => model.up(),
        Action::Down => model.down(),
        Action::Left => model.left(),
        Action::Right => model.right(),
        Action::Reset => model.reset(),
        Action::Quit => return Effect::Quit,
    }
    Effect::Redraw
}
