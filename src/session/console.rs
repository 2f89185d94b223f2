//! The terminal, as seen by a session.
//!
//! Everything a session reads from or shows to the user goes through
//! [`Console`], so a session can be driven from a script in tests.

use std::io;
use std::io::BufRead;
use std::io::Write;
use std::time::Duration;
use std::time::Instant;

use crossterm::cursor::MoveTo;
use crossterm::event;
use crossterm::event::Event;
use crossterm::event::KeyEventKind;
use crossterm::execute;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::Clear;
use crossterm::terminal::ClearType;
use zeroize::Zeroizing;

pub trait Console {
    /// Prompt for a secret without echoing it.
    fn read_password(&mut self, prompt: &str) -> io::Result<Zeroizing<String>>;

    /// Prompt for one line of plain input, without the line terminator.
    ///
    /// End of input is an [`io::ErrorKind::UnexpectedEof`] error.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Show one line.
    fn print(&mut self, text: &str);

    /// Show text without ending the line, e.g. a progress dot.
    fn print_inline(&mut self, text: &str);

    fn pause(&mut self, duration: Duration);

    /// Wait until a key is pressed or `timeout` passes.
    ///
    /// Returns `true` if a key cut the wait short.
    fn wait_for_key(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Clear the screen and its scrollback.
    fn clear_screen(&mut self) -> io::Result<()>;
}

/// [`Console`] on the process's stdin and stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for TerminalConsole {
    fn read_password(&mut self, prompt: &str) -> io::Result<Zeroizing<String>> {
        rpassword::prompt_password(prompt).map(Zeroizing::new)
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "end of input",
            ));
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    fn print(&mut self, text: &str) {
        println!("{text}");
    }

    fn print_inline(&mut self, text: &str) {
        print!("{text}");
        let _ = io::stdout().flush();
    }

    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn wait_for_key(&mut self, timeout: Duration) -> io::Result<bool> {
        enable_raw_mode()?;
        let pressed = poll_for_key_press(timeout);
        disable_raw_mode()?;
        pressed
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        execute!(
            io::stdout(),
            Clear(ClearType::All),
            Clear(ClearType::Purge),
            MoveTo(0, 0)
        )
    }
}

/// In raw mode Ctrl+C arrives as an ordinary key event.
fn poll_for_key_press(timeout: Duration) -> io::Result<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() || !event::poll(remaining)? {
            return Ok(false);
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(true);
            }
        }
    }
}
