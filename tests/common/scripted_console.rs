use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use soss::session::Console;
use zeroize::Zeroizing;

/// A [`Console`] that replays canned answers and records everything else.
///
/// Prompts and printed text go to `transcript`; answers never do. Pauses
/// and waits return immediately and are only recorded. The key wait
/// reports `key_pressed`, or fails when `keyboard_unavailable` is set.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub transcript: Vec<String>,
    pub pauses: Vec<Duration>,
    pub waits: Vec<Duration>,
    pub clears: usize,
    pub key_pressed: bool,
    pub keyboard_unavailable: bool,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn output(&self) -> String {
        self.transcript.join("\n")
    }

    pub fn unused_answers(&self) -> usize {
        self.answers.len()
    }

    fn answer(&mut self, prompt: &str) -> io::Result<String> {
        self.transcript.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

impl Console for ScriptedConsole {
    fn read_password(&mut self, prompt: &str) -> io::Result<Zeroizing<String>> {
        self.answer(prompt).map(Zeroizing::new)
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.answer(prompt)
    }

    fn print(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }

    fn print_inline(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }

    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }

    fn wait_for_key(&mut self, timeout: Duration) -> io::Result<bool> {
        self.waits.push(timeout);
        if self.keyboard_unavailable {
            return Err(io::Error::other("not a terminal"));
        }
        Ok(self.key_pressed)
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.clears += 1;
        Ok(())
    }
}
