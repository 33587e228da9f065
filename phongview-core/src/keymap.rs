/// Key names (DOM `KeyboardEvent.key` style) to viewer commands
use crate::camera::{Axis, Turn};
use crate::selection::Sign::{Negative, Positive};
use crate::selection::{Direction, ObjectEdit};
use crate::viewer::Command;

/// Translate a key name into a command, `None` for unbound keys
pub fn command_for_key(key: &str) -> Option<Command> {
    let command = match key {
        // selection
        "ArrowRight" => Command::CycleSelection(Direction::Next),
        "ArrowLeft" => Command::CycleSelection(Direction::Previous),
        " " => Command::Deselect,

        // camera movement
        "a" => Command::MoveCamera(Axis::Right, Negative),
        "d" => Command::MoveCamera(Axis::Right, Positive),
        "w" => Command::MoveCamera(Axis::Lookat, Positive),
        "s" => Command::MoveCamera(Axis::Lookat, Negative),
        "q" => Command::MoveCamera(Axis::Up, Positive),
        "e" => Command::MoveCamera(Axis::Up, Negative),

        // camera turns
        "A" => Command::TurnCamera(Turn::YawLeft),
        "D" => Command::TurnCamera(Turn::YawRight),
        "W" => Command::TurnCamera(Turn::PitchUp),
        "S" => Command::TurnCamera(Turn::PitchDown),

        // object translation
        "k" => Command::EditObject(ObjectEdit::Translate(Axis::Right, Negative)),
        ";" => Command::EditObject(ObjectEdit::Translate(Axis::Right, Positive)),
        "o" => Command::EditObject(ObjectEdit::Translate(Axis::Lookat, Positive)),
        "l" => Command::EditObject(ObjectEdit::Translate(Axis::Lookat, Negative)),
        "i" => Command::EditObject(ObjectEdit::Translate(Axis::Up, Positive)),
        "p" => Command::EditObject(ObjectEdit::Translate(Axis::Up, Negative)),

        // object rotation
        "K" => Command::EditObject(ObjectEdit::Rotate(Axis::Up, Negative)),
        ":" => Command::EditObject(ObjectEdit::Rotate(Axis::Up, Positive)),
        "O" => Command::EditObject(ObjectEdit::Rotate(Axis::Right, Positive)),
        "L" => Command::EditObject(ObjectEdit::Rotate(Axis::Right, Negative)),
        "I" => Command::EditObject(ObjectEdit::Rotate(Axis::Lookat, Negative)),
        "P" => Command::EditObject(ObjectEdit::Rotate(Axis::Lookat, Positive)),

        _ => return None,
    };
    Some(command)
}
