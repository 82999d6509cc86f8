use gridwalk::core::config::{Glyphs, InputMode, ResolvedConfig};
use gridwalk::tui::{BANNER, CLEAR_SCREEN, LoopState, RenderLoop, TerminalMode, signal};
use log::LevelFilter;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;
use tokio_test::{assert_pending, assert_ready_eq, task};

// ============================================================================
// Helper Types
// ============================================================================

#[derive(Default)]
struct CountingTerminal {
    entered: usize,
    restored: usize,
}

impl TerminalMode for CountingTerminal {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        self.entered += 1;
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        self.restored += 1;
        Ok(())
    }
}

/// Keyboard stand-in: blocks until the test sends more bytes, reports end of
/// input once the sender is dropped.
struct KeyFeed {
    keys: mpsc::Receiver<Vec<u8>>,
    pending: Vec<u8>,
}

impl Read for KeyFeed {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            match self.keys.recv() {
                Ok(bytes) => self.pending = bytes,
                Err(_) => return Ok(0),
            }
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}

#[derive(Clone, Default)]
struct Screen(Arc<Mutex<Vec<u8>>>);

impl Screen {
    fn frames(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .split(CLEAR_SCREEN)
            .skip(1)
            .map(str::to_string)
            .collect()
    }

    /// Waits until at least `count` frames were written.
    async fn wait_for_frames(&self, count: usize) -> Vec<String> {
        for _ in 0..500 {
            let frames = self.frames();
            if frames.len() >= count {
                return frames;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {count} frames, got {}", self.frames().len());
    }
}

impl Write for Screen {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn config(size: usize) -> ResolvedConfig {
    ResolvedConfig {
        size,
        glyphs: Glyphs {
            background: '#',
            marker: 'X',
        },
        input_mode: InputMode::Raw,
        log_level: LevelFilter::Off,
        log_file: PathBuf::from("unused.log"),
    }
}

// ============================================================================
// Interactive session
// ============================================================================

#[tokio::test]
async fn test_unrecognized_key_keeps_loop_running() {
    let (keys, feed) = mpsc::channel();
    let screen = Screen::default();
    let mut render_loop = RenderLoop::new(
        &config(3),
        CountingTerminal::default(),
        KeyFeed {
            keys: feed,
            pending: Vec::new(),
        },
        screen.clone(),
    )
    .unwrap();

    let handle = tokio::spawn(async move {
        let result = render_loop.start().await;
        (render_loop, result)
    });

    screen.wait_for_frames(1).await;
    keys.send(b"z".to_vec()).unwrap();
    keys.send(b"d".to_vec()).unwrap();

    // z draws nothing, so the second frame is the d move.
    let frames = screen.wait_for_frames(2).await;
    assert_eq!(frames[1], format!("{BANNER}\r\n#  X  #\r\n#  #  #\r\n#  #  #\r\n"));
    assert!(!handle.is_finished());

    keys.send(b"q".to_vec()).unwrap();
    let (render_loop, result) = handle.await.unwrap();
    result.unwrap();

    assert_eq!(render_loop.state(), LoopState::Stopped);
    assert_eq!(render_loop.terminal().entered, 1);
    assert_eq!(render_loop.terminal().restored, 1);
    assert_eq!(screen.frames().len(), 2);
}

#[tokio::test]
async fn test_each_key_after_a_frame_gets_its_own_frame() {
    let (keys, feed) = mpsc::channel();
    let screen = Screen::default();
    let mut render_loop = RenderLoop::new(
        &config(2),
        CountingTerminal::default(),
        KeyFeed {
            keys: feed,
            pending: Vec::new(),
        },
        screen.clone(),
    )
    .unwrap();

    let handle = tokio::spawn(async move { render_loop.start().await });

    screen.wait_for_frames(1).await;
    keys.send(b"s".to_vec()).unwrap();
    screen.wait_for_frames(2).await;
    keys.send(b"D".to_vec()).unwrap();
    screen.wait_for_frames(3).await;
    keys.send(b"r".to_vec()).unwrap();
    let frames = screen.wait_for_frames(4).await;

    assert!(frames[1].ends_with("#  #\r\nX  #\r\n"));
    assert!(frames[2].ends_with("#  #\r\n#  X\r\n"));
    assert!(frames[3].ends_with("X  #\r\n#  #\r\n"));

    // Dropping the feed closes input, which ends the session like a quit key.
    drop(keys);
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_interrupt_byte_quits() {
    let (keys, feed) = mpsc::channel();
    let screen = Screen::default();
    let mut render_loop = RenderLoop::new(
        &config(4),
        CountingTerminal::default(),
        KeyFeed {
            keys: feed,
            pending: Vec::new(),
        },
        screen.clone(),
    )
    .unwrap();

    keys.send(vec![gridwalk::tui::INTERRUPT_BYTE]).unwrap();
    render_loop.start().await.unwrap();

    assert_eq!(render_loop.position(), (0, 0));
    assert_eq!(render_loop.terminal().restored, 1);
    assert_eq!(screen.frames().len(), 1);
}

// ============================================================================
// Mailbox coalescing
// ============================================================================

#[test]
fn test_two_posts_wake_the_receiver_once() {
    let (tx, mut rx) = signal();
    assert!(tx.post());
    assert!(!tx.post());

    let mut first = task::spawn(rx.wait());
    assert_ready_eq!(first.poll(), true);
    drop(first);

    let mut second = task::spawn(rx.wait());
    assert_pending!(second.poll());
}

#[test]
fn test_post_wakes_a_waiting_receiver() {
    let (tx, mut rx) = signal();
    let mut waiting = task::spawn(rx.wait());
    assert_pending!(waiting.poll());

    tx.post();
    assert!(waiting.is_woken());
    assert_ready_eq!(waiting.poll(), true);
}
