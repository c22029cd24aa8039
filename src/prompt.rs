//! Interactive console input.
//!
//! Workflows ask questions through the [`Prompt`] trait so tests can supply
//! scripted answers instead of reading stdin.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Source of answers to interactive questions.
pub trait Prompt {
  /// Show `message` and read one line of input.
  ///
  /// # Returns
  /// The line without its trailing newline, or `None` once input is exhausted.
  fn ask(&mut self, message: &str) -> Result<Option<String>>;
}

/// Reads answers from standard input.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
  fn ask(&mut self, message: &str) -> Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{message}").context("Failed to write prompt")?;
    stdout.flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    let read = io::stdin()
      .lock()
      .read_line(&mut line)
      .context("Failed to read from standard input")?;

    if read == 0 {
      return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
  }
}

/// Replays a fixed list of answers; used for non-interactive runs and tests.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
  answers: VecDeque<String>,
  asked: Vec<String>,
}

impl ScriptedPrompt {
  pub fn new<I, S>(answers: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      answers: answers.into_iter().map(Into::into).collect(),
      asked: Vec::new(),
    }
  }

  /// Messages shown so far, in order.
  pub fn asked(&self) -> &[String] {
    &self.asked
  }

  /// Answers that were never consumed.
  pub fn remaining(&self) -> usize {
    self.answers.len()
  }
}

impl Prompt for ScriptedPrompt {
  fn ask(&mut self, message: &str) -> Result<Option<String>> {
    self.asked.push(message.to_string());
    Ok(self.answers.pop_front())
  }
}
