use std::io::{self, Stdout};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::error::Result;

/// Terminal wrapper that manages raw mode, the alternate screen, and mouse
/// capture. Restores the terminal on drop if `restore` was never called.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    mouse_enabled: bool,
    restored: bool,
}

impl Tui {
    /// Initialize the terminal: enter alternate screen and enable raw mode.
    /// Mouse capture is needed for the click-outside panel dismissal.
    pub fn new(enable_mouse: bool) -> Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
        if enable_mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            mouse_enabled: enable_mouse,
            restored: false,
        })
    }

    /// Put the terminal back into its pre-launch state. Idempotent, so the
    /// drop guard can run after an explicit call without a double reset.
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        self.terminal.show_cursor()?;
        reset_terminal(self.mouse_enabled)
    }

    /// Get a mutable reference to the underlying terminal for drawing.
    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Undo the terminal modes set up by `Tui::new`, in reverse order.
fn reset_terminal(mouse_enabled: bool) -> Result<()> {
    if mouse_enabled {
        execute!(io::stdout(), DisableMouseCapture)?;
    }
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that resets the terminal before printing panic info,
/// undoing only the modes that were actually enabled.
pub fn install_panic_hook(mouse_enabled: bool) {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = reset_terminal(mouse_enabled);
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_hook_preserves_the_chain() {
        // Quiet inner hook so the caught panic does not spam test output.
        std::panic::set_hook(Box::new(|_| {}));
        install_panic_hook(false);
        let result = std::panic::catch_unwind(|| panic!("boom"));
        assert!(result.is_err());
        let _ = std::panic::take_hook();
    }
}
