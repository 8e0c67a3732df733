use anyhow::Context;
use crossterm::{
    cursor, execute,
    terminal::{self, ClearType},
};
use std::io::{stdout, Stdout, Write};

// Modes the renderers toggle per frame and must not leak out of the
// session: synchronized update (2026), autowrap (7), SGR attributes.
const FRAME_MODE_RESET: &[u8] = b"\x1b[?2026l\x1b[?7h\x1b[0m";

pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        // Guard exists before any further setup so Drop restores raw mode
        // even if entering the alternate screen fails.
        let guard = Self { _private: () };

        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
        )
        .context("prepare alternate screen")?;

        Ok(guard)
    }

    pub fn stdout() -> Stdout {
        stdout()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Unwind in reverse of setup, best-effort. A frame may have been
        // cut short mid-write, so close its modes before leaving the
        // alternate screen.
        let mut out = stdout();
        let _ = out.write_all(FRAME_MODE_RESET);
        let _ = execute!(out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = out.flush();
        let _ = terminal::disable_raw_mode();
    }
}
