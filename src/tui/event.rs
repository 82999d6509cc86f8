use std::io::{self, BufRead, BufReader, Read};
use std::sync::{Mutex, PoisonError};

use log::{debug, trace, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::config::InputMode;
use crate::core::position::PositionModel;
use crate::tui::signal::SignalSender;

/// ETX, what Ctrl+C sends once the terminal stops turning it into SIGINT.
pub const INTERRUPT_BYTE: u8 = 3;

/// Map one raw input byte to an action. Letters are case-insensitive.
pub fn decode_byte(byte: u8) -> Option<Action> {
    match byte.to_ascii_lowercase() {
        b'w' => Some(Action::Up),
        b's' => Some(Action::Down),
        b'a' => Some(Action::Left),
        b'd' => Some(Action::Right),
        b'r' => Some(Action::Reset),
        b'q' | INTERRUPT_BYTE => Some(Action::Quit),
        _ => None,
    }
}

/// Line-buffered variant: the whole line (surrounding whitespace ignored)
/// must be a single symbol, so `"w"` moves but `"ww"` does nothing.
pub fn decode_line(line: &str) -> Option<Action> {
    match line.trim().as_bytes() {
        [byte] => decode_byte(*byte),
        _ => None,
    }
}

/// The two mailboxes the capture side posts to.
#[derive(Debug, Clone)]
pub struct Signals {
    pub moved: SignalSender,
    pub quit: SignalSender,
}

/// Why input capture stopped.
#[derive(Debug)]
pub enum CaptureEnd {
    QuitKey,
    EndOfInput,
    ReadError(io::Error),
}

/// Read input until a quit key, end of input or a read error, applying
/// every recognized key to `model` and announcing it on `signals.moved`.
///
/// The model is updated before the move is posted, so whoever consumes the
/// signal sees the new position. Every way out of this function posts quit.
pub fn capture<R: Read>(
    input: R,
    mode: InputMode,
    model: &Mutex<PositionModel>,
    signals: &Signals,
) -> CaptureEnd {
    let end = match mode {
        InputMode::Raw => capture_bytes(input, model, signals),
        InputMode::Line => capture_lines(BufReader::new(input), model, signals),
    };
    match &end {
        CaptureEnd::QuitKey => debug!("Quit key received"),
        CaptureEnd::EndOfInput => {
            debug!("Input closed, treating as quit");
            signals.quit.post();
        }
        CaptureEnd::ReadError(e) => {
            warn!("Input read failed, treating as quit: {}", e);
            signals.quit.post();
        }
    }
    end
}

fn capture_bytes<R: Read>(
    mut input: R,
    model: &Mutex<PositionModel>,
    signals: &Signals,
) -> CaptureEnd {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return CaptureEnd::EndOfInput,
            Ok(_) => {
                let Some(action) = decode_byte(buf[0]) else {
                    trace!("Ignoring byte {:#04x}", buf[0]);
                    continue;
                };
                if dispatch(action, model, signals) == Effect::Quit {
                    return CaptureEnd::QuitKey;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return CaptureEnd::ReadError(e),
        }
    }
}

fn capture_lines<R: BufRead>(
    mut input: R,
    model: &Mutex<PositionModel>,
    signals: &Signals,
) -> CaptureEnd {
    let mut line = Vec::new();
    loop {
        line.clear();
        match input.read_until(b'\n', &mut line) {
            Ok(0) => return CaptureEnd::EndOfInput,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                let Some(action) = decode_line(&text) else {
                    trace!("Ignoring line {:?}", text.trim_end());
                    continue;
                };
                if dispatch(action, model, signals) == Effect::Quit {
                    return CaptureEnd::QuitKey;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return CaptureEnd::ReadError(e),
        }
    }
}

fn dispatch(action: Action, model: &Mutex<PositionModel>, signals: &Signals) -> Effect {
    debug!("Key decoded: {:?}", action);
    let effect = {
        let mut model = model.lock().unwrap_or_else(PoisonError::into_inner);
        update(&mut model, action)
    };
    match effect {
        Effect::Redraw => {
            if !signals.moved.post() {
                trace!("Redraw already pending, coalesced");
            }
        }
        Effect::Quit => {
            signals.quit.post();
        }
    }
    effect
}
