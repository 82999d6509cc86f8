//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::LevelFilter;

use crate::core::config::{Glyphs, InputMode, ResolvedConfig};
use crate::tui::{CLEAR_SCREEN, TerminalMode};

/// Counts raw-mode transitions instead of touching a real terminal.
#[derive(Debug, Default)]
pub struct MockTerminal {
    pub entered: usize,
    pub restored: usize,
    fail_enter: bool,
}

impl MockTerminal {
    /// A terminal that refuses to enter raw mode.
    pub fn failing() -> Self {
        Self {
            fail_enter: true,
            ..Default::default()
        }
    }
}

impl TerminalMode for MockTerminal {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        if self.fail_enter {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "not a tty"));
        }
        self.entered += 1;
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        self.restored += 1;
        Ok(())
    }
}

/// A display sink the test can read after handing a clone to the loop.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Splits written output into frames, each without its clear-screen prefix.
pub fn frames(output: &str) -> Vec<&str> {
    output.split(CLEAR_SCREEN).skip(1).collect()
}

/// Raw-mode config with `.` background and `@` marker.
pub fn test_config(size: usize) -> ResolvedConfig {
    ResolvedConfig {
        size,
        glyphs: Glyphs {
            background: '.',
            marker: '@',
        },
        input_mode: InputMode::Raw,
        log_level: LevelFilter::Off,
        log_file: PathBuf::from("test.log"),
    }
}
