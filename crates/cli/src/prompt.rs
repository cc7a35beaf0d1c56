//! Interactive prompts
//!
//! [`Prompt`] separates collecting answers from the code that uses them, so
//! workflows can run against a terminal, scripted input, or no input at all.

use devkit_core::Result;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};

/// Source of interactive answers
pub trait Prompt {
    /// Ask a yes/no question. Only `y` or `yes` (any case) counts as yes.
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Ask for a value; empty input (or end of input) yields `default`
    fn input(&mut self, label: &str, default: &str) -> Result<String>;

    /// Show an instruction line ahead of a group of questions
    fn message(&mut self, text: &str) -> Result<()>;
}

/// Prompt over any reader/writer pair
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

/// Prompt bound to the process terminal
pub type StdioPrompt = LinePrompt<io::StdinLock<'static>, io::Stdout>;

impl StdioPrompt {
    /// Prompt on stdin/stdout
    pub fn stdio() -> Self {
        LinePrompt::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    /// Wrap a reader and a writer
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consume the prompt, returning the writer (useful to inspect output in tests)
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn read_answer(&mut self) -> Result<String> {
        self.writer.flush()?;
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.writer, "{} (y/N): ", question.bold())?;
        let answer = self.read_answer()?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    fn input(&mut self, label: &str, default: &str) -> Result<String> {
        write!(self.writer, "  {} [{}]: ", label, default.dimmed())?;
        let answer = self.read_answer()?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    fn message(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{}", text)?;
        Ok(())
    }
}

/// Answers every question with its default and declines confirmations
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractive;

impl Prompt for NonInteractive {
    fn confirm(&mut self, _question: &str) -> Result<bool> {
        Ok(false)
    }

    fn input(&mut self, _label: &str, default: &str) -> Result<String> {
        Ok(default.to_string())
    }

    fn message(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}
