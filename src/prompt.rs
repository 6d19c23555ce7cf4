//! Presentation boundary.
//!
//! The lookup pipeline asks the user to pick a search result and reports
//! messages through [`Prompter`]; it never formats menus or dialogs
//! itself. [`TerminalPrompter`] is the line-oriented implementation used
//! by the CLI. It rejects out-of-range numbers itself, so only `None`, `0`,
//! or a valid rank ever reach the disambiguator from it.

use std::io::{BufRead, Write};
use std::sync::Mutex;

use crate::models::Candidate;

/// Severity of a message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

/// User interaction needed by the lookup pipeline and the detail menu.
pub trait Prompter: Send + Sync {
    /// Ask the user to choose one of `candidates` by rank.
    ///
    /// Returns `Some(0)` or `None` to cancel, otherwise a rank.
    fn prompt_selection(&self, candidates: &[Candidate]) -> Option<u32>;

    /// Ask the user to choose a menu entry for the record stored under
    /// `key`. `entries` are `(choice, label)` pairs in display order.
    fn prompt_menu_choice(&self, key: &str, entries: &[(u32, &str)]) -> Option<u32>;

    /// Show a message.
    fn show_message(&self, kind: MessageKind, text: &str);
}

/// Line-based prompter over any reader and writer.
pub struct TerminalPrompter<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl TerminalPrompter<std::io::BufReader<std::io::Stdin>, std::io::Stdout> {
    /// Prompter over the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl<R: BufRead + Send, W: Write + Send> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    /// Consume the prompter and return the writer.
    pub fn into_output(self) -> W {
        self.output
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, text: &str) {
        let mut out = self
            .output
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    /// Read one line; `None` on EOF or read failure.
    fn read_line(&self) -> Option<String> {
        let mut input = self
            .input
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }

    /// Prompt until the user enters a number in `0..=max`, a blank line, or EOF.
    fn read_choice(&self, prompt: &str, max: u32) -> Option<u32> {
        loop {
            self.write(prompt);
            let line = self.read_line()?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<u32>() {
                Ok(n) if n <= max => return Some(n),
                _ => self.write(&format!(
                    "Please enter a number between 0 and {}.\n",
                    max
                )),
            }
        }
    }
}

impl<R: BufRead + Send, W: Write + Send> Prompter for TerminalPrompter<R, W> {
    fn prompt_selection(&self, candidates: &[Candidate]) -> Option<u32> {
        let mut text = String::from("Found multiple results. Please select the correct movie:\n\n");
        for c in candidates {
            text.push_str(&format!("{}. {} ({})\n", c.rank, c.title, c.year));
        }
        text.push_str(&format!(
            "\nEnter number (1-{}) or 0 to cancel: ",
            candidates.len()
        ));
        self.read_choice(&text, candidates.len() as u32)
    }

    fn prompt_menu_choice(&self, key: &str, entries: &[(u32, &str)]) -> Option<u32> {
        let mut text = format!("\nMovie: {}\n\nWhat information do you want to see?\n\n", key);
        for (choice, label) in entries {
            text.push_str(&format!("{}. {}\n", choice, label));
        }
        let max = entries.iter().map(|(c, _)| *c).max().unwrap_or(0);
        text.push_str(&format!("\nEnter your choice (0-{}): ", max));
        self.read_choice(&text, max)
    }

    fn show_message(&self, kind: MessageKind, text: &str) {
        let line = match kind {
            MessageKind::Info => format!("{}\n", text),
            MessageKind::Warning => format!("Warning: {}\n", text),
            MessageKind::Error => format!("Error: {}\n", text),
        };
        self.write(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOT_AVAILABLE;
    use std::io::Cursor;

    fn candidates(n: u32) -> Vec<Candidate> {
        (1..=n)
            .map(|rank| Candidate {
                rank,
                title: format!("Movie {}", rank),
                year: NOT_AVAILABLE.to_string(),
                locator: String::new(),
                id: None,
            })
            .collect()
    }

    fn prompter(input: &str) -> TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn selection_lists_candidates_and_reads_rank() {
        let p = prompter("2\n");
        assert_eq!(p.prompt_selection(&candidates(3)), Some(2));
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("1. Movie 1 (N/A)"));
        assert!(out.contains("Enter number (1-3) or 0 to cancel"));
    }

    #[test]
    fn selection_reprompts_on_bad_input() {
        let p = prompter("abc\n9\n3\n");
        assert_eq!(p.prompt_selection(&candidates(3)), Some(3));
        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out.matches("Please enter a number between 0 and 3").count(), 2);
    }

    #[test]
    fn blank_line_and_eof_cancel() {
        assert_eq!(prompter("\n").prompt_selection(&candidates(2)), None);
        assert_eq!(prompter("").prompt_selection(&candidates(2)), None);
        assert_eq!(prompter("0\n").prompt_selection(&candidates(2)), Some(0));
    }

    #[test]
    fn menu_prompt_bounds_by_largest_entry() {
        let p = prompter("8\n");
        let entries: [(u32, &str); 3] = [(1, "Title & Year"), (8, "Full Information (All)"), (0, "Back")];
        assert_eq!(p.prompt_menu_choice("Dune", &entries), Some(8));
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("Movie: Dune"));
        assert!(out.contains("Enter your choice (0-8)"));
    }

    #[test]
    fn messages_are_prefixed_by_kind() {
        let p = prompter("");
        p.show_message(MessageKind::Error, "boom");
        p.show_message(MessageKind::Info, "ok");
        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out, "Error: boom\nok\n");
    }
}
