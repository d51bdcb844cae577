//! RAII terminal lifecycle guard backed by crossterm.
//!
//! [`TerminalGuard`] enters raw mode, the alternate screen and mouse capture on
//! construction, and restores the terminal on [`Drop`], including during panics
//! and early error returns. A panic hook restores the terminal *before* the
//! panic message is printed so the message lands on a normal screen.

use std::io::{self, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::style::ResetColor;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};

/// Set while the terminal is in raw mode; the panic hook checks it.
static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Owns the raw-mode/alternate-screen session.
pub struct TerminalGuard {
    hook_installed: bool,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen, installing a panic-safe
    /// cleanup hook.
    ///
    /// # Errors
    /// Returns I/O errors if terminal setup fails. Whatever was set up before
    /// the failure is undone.
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);

        let mut guard = Self {
            hook_installed: false,
        };
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            Hide
        )?;

        let prev = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal_best_effort();
            prev(info);
        }));
        guard.hook_installed = true;

        Ok(guard)
    }

    /// Terminal dimensions (columns, rows), falling back to 80x24 when no
    /// tty is attached.
    #[must_use]
    pub fn terminal_size() -> (u16, u16) {
        terminal::size()
            .ok()
            .filter(|&(cols, rows)| cols > 0 && rows > 0)
            .unwrap_or((80, 24))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.hook_installed {
            // The previous hook was moved into ours; fall back to the default.
            let _ = panic::take_hook();
        }
        restore_terminal_best_effort();
    }
}

/// Leave the alternate screen and raw mode. Safe to call more than once.
fn restore_terminal_best_effort() {
    if RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
        let mut stdout = io::stdout();
        let _ = execute!(
            stdout,
            ResetColor,
            DisableMouseCapture,
            Show,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

// ──────────────────── tests ────────────────────
