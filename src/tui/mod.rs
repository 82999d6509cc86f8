//! # TUI Adapter
//!
//! The crossterm-specific layer. Puts the terminal into raw mode, captures
//! keystrokes and redraws the grid.
//!
//! This is the only module that knows about terminals and threads.
//!
//! ## Redraw Strategy
//!
//! Two activities share the position model:
//!
//! - **Input capture** runs on its own thread, blocked on stdin. Each
//!   recognized key updates the model, then posts to the `moved` mailbox.
//! - **The render loop** waits on the `moved` and `quit` mailboxes and
//!   redraws once per consumed `moved` post.
//!
//! Mailboxes hold one pending post, so keys arriving faster than frames are
//! drawn collapse into a single redraw of the latest position. There is no
//! frame timer; nothing is drawn unless a key was accepted.

mod event;
mod signal;
mod ui;

use log::{debug, info, warn};
use std::fmt;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use crate::core::config::{Glyphs, InputMode, ResolvedConfig};
use crate::core::position::{GridError, PositionModel};

pub use event::{CaptureEnd, INTERRUPT_BYTE, Signals, capture, decode_byte, decode_line};
pub use signal::{SignalReceiver, SignalSender, signal};
pub use ui::{BANNER, CELL_SEPARATOR, CLEAR_SCREEN, render_frame};

// ============================================================================
// Terminal mode
// ============================================================================

/// Switching the terminal in and out of raw mode.
pub trait TerminalMode {
    fn enter_raw_mode(&mut self) -> io::Result<()>;
    fn restore_mode(&mut self) -> io::Result<()>;
}

/// The real terminal. crossterm keeps the pre-raw settings and puts them
/// back on restore.
pub struct CrosstermTerminal;

impl TerminalMode for CrosstermTerminal {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }
}

/// Holds the terminal in raw mode. Restores it exactly once, either through
/// `restore()` or on drop.
struct RawModeGuard<'a, T: TerminalMode> {
    terminal: &'a mut T,
    active: bool,
}

impl<'a, T: TerminalMode> RawModeGuard<'a, T> {
    fn enter(terminal: &'a mut T, mode: InputMode) -> Result<Self, LoopError> {
        let active = match mode {
            InputMode::Raw => {
                terminal.enter_raw_mode().map_err(LoopError::RawMode)?;
                info!("Terminal raw mode enabled");
                true
            }
            // Line input needs the terminal's own line editing.
            InputMode::Line => false,
        };
        Ok(Self { terminal, active })
    }

    fn restore(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        match self.terminal.restore_mode() {
            Ok(()) => info!("Terminal mode restored"),
            Err(e) => warn!("Failed to restore terminal mode: {}", e),
        }
    }
}

impl<T: TerminalMode> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        self.release();
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum LoopError {
    /// Bad grid size. Nothing was touched.
    Grid(GridError),
    /// Raw mode could not be entered. Nothing was rendered.
    RawMode(io::Error),
    /// The input thread could not be started.
    Spawn(io::Error),
    /// Writing a frame failed. The terminal mode has been restored.
    Write(io::Error),
    /// `start()` was called on a loop that already ran.
    AlreadyStarted,
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopError::Grid(e) => write!(f, "grid error: {e}"),
            LoopError::RawMode(e) => write!(f, "failed to enter raw mode: {e}"),
            LoopError::Spawn(e) => write!(f, "failed to start input capture: {e}"),
            LoopError::Write(e) => write!(f, "failed to write frame: {e}"),
            LoopError::AlreadyStarted => write!(f, "render loop already started"),
        }
    }
}

impl std::error::Error for LoopError {}

impl From<GridError> for LoopError {
    fn from(e: GridError) -> Self {
        LoopError::Grid(e)
    }
}

// ============================================================================
// Render loop
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// Owns the terminal, the input stream and the display for one session.
/// Single use: once stopped it cannot be started again.
pub struct RenderLoop<T, R, W> {
    state: LoopState,
    model: Arc<Mutex<PositionModel>>,
    glyphs: Glyphs,
    input_mode: InputMode,
    terminal: T,
    input: Option<R>,
    output: W,
}

impl<T, R, W> RenderLoop<T, R, W>
where
    T: TerminalMode,
    R: Read + Send + 'static,
    W: Write,
{
    pub fn new(config: &ResolvedConfig, terminal: T, input: R, output: W) -> Result<Self, LoopError> {
        Ok(Self {
            state: LoopState::Idle,
            model: Arc::new(Mutex::new(PositionModel::new(config.size)?)),
            glyphs: config.glyphs,
            input_mode: config.input_mode,
            terminal,
            input: Some(input),
            output,
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Current marker position, unclamped.
    pub fn position(&self) -> (i64, i64) {
        let model = self.model.lock().unwrap_or_else(PoisonError::into_inner);
        (model.x(), model.y())
    }

    /// Runs until a quit key, end of input or a write failure.
    ///
    /// Raw mode is entered first; if that fails nothing is drawn and the
    /// loop stays `Idle`. Once entered, raw mode is restored on every
    /// return path.
    pub async fn start(&mut self) -> Result<(), LoopError> {
        if self.state != LoopState::Idle {
            return Err(LoopError::AlreadyStarted);
        }

        let guard = RawModeGuard::enter(&mut self.terminal, self.input_mode)?;
        let input = self.input.take().ok_or(LoopError::AlreadyStarted)?;
        self.state = LoopState::Running;
        let size = self.model.lock().unwrap_or_else(PoisonError::into_inner).size();
        info!(
            "Render loop running ({size}x{size} grid, {:?} input)",
            self.input_mode
        );

        let painter = Painter {
            model: &self.model,
            glyphs: &self.glyphs,
            line_ending: self.input_mode.line_ending(),
        };
        let result = drive(&painter, &mut self.output, input, self.input_mode).await;

        guard.restore();
        self.state = LoopState::Stopped;
        match &result {
            Ok(()) => info!("Render loop stopped"),
            Err(e) => warn!("Render loop stopped: {}", e),
        }
        result
    }
}

/// Everything a render pass reads.
struct Painter<'a> {
    model: &'a Arc<Mutex<PositionModel>>,
    glyphs: &'a Glyphs,
    line_ending: &'static str,
}

impl Painter<'_> {
    /// Clamp, snapshot and write one whole frame.
    fn draw<W: Write>(&self, output: &mut W) -> Result<(), LoopError> {
        let grid = {
            let mut model = self.model.lock().unwrap_or_else(PoisonError::into_inner);
            model.clamp();
            model.snapshot()
        };
        let frame = ui::render_frame(&grid, self.glyphs, self.line_ending);
        output
            .write_all(frame.as_bytes())
            .and_then(|()| output.flush())
            .map_err(LoopError::Write)?;
        debug!("Rendered marker at {:?}", grid.marker());
        Ok(())
    }
}

async fn drive<R, W>(
    painter: &Painter<'_>,
    output: &mut W,
    input: R,
    mode: InputMode,
) -> Result<(), LoopError>
where
    R: Read + Send + 'static,
    W: Write,
{
    painter.draw(output)?;

    let (moved, mut moved_rx) = signal();
    let (quit, mut quit_rx) = signal();
    spawn_capture(input, mode, Arc::clone(painter.model), Signals { moved, quit })
        .map_err(LoopError::Spawn)?;

    let mut moves_open = true;
    loop {
        tokio::select! {
            posted = moved_rx.wait(), if moves_open => {
                if posted {
                    painter.draw(output)?;
                } else {
                    moves_open = false;
                }
            }
            _ = quit_rx.wait() => {
                // A move announced just before quit still gets its frame.
                if moved_rx.try_take() {
                    painter.draw(output)?;
                }
                return Ok(());
            }
        }
    }
}

fn spawn_capture<R>(
    input: R,
    mode: InputMode,
    model: Arc<Mutex<PositionModel>>,
    signals: Signals,
) -> io::Result<thread::JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    // Detached: a read blocked on stdin is never interrupted, the process
    // exit takes the thread down with it.
    thread::Builder::new()
        .name("input-capture".to_string())
        .spawn(move || {
            let end = event::capture(input, mode, &model, &signals);
            debug!("Input capture finished: {:?}", end);
        })
}

/// Run the grid on the real terminal until the user quits.
pub async fn run(config: ResolvedConfig) -> Result<(), LoopError> {
    let mut render_loop = RenderLoop::new(&config, CrosstermTerminal, io::stdin(), io::stdout())?;
    render_loop.start().await
}
