//! Prompt askers
//!
//! [`PromptAsker`] is the interactive collaborator of form resolution. The
//! terminal implementation reads lines from any `BufRead` and writes to any
//! `Write`; [`ScriptedAsker`] replays queued answers for tests and scripts.

use std::collections::VecDeque;
use std::io::{self, BufRead, StdinLock, Stderr, Write};

use colored::Colorize;
use serde_json::Value;
use tracing::debug;

use crate::error::{FormError, Result};
use crate::question::Question;

/// Asks questions and returns validated answers
pub trait PromptAsker {
    /// Ask until the answer validates or the question's attempts run out
    fn ask(&mut self, question: &Question<'_>) -> Result<Value>;

    /// Called after each question is answered
    fn write_separator(&mut self) {}
}

/// Retry loop shared by askers
///
/// `read` yields one raw answer per attempt and is handed the error that
/// rejected the previous answer.
fn ask_with_retries<F>(question: &Question<'_>, mut read: F) -> Result<Value>
where
    F: FnMut(Option<&FormError>) -> Result<Value>,
{
    let mut last_error = None;
    for attempt in 1..=question.max_attempts.max(1) {
        let answer = read(last_error.as_ref())?;
        match question.validate(answer) {
            Ok(value) => return Ok(value),
            Err(err) => {
                debug!(field = %question.field, attempt, error = %err, "answer rejected");
                last_error = Some(err);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| FormError::InputAborted {
        field: question.field.clone(),
    }))
}

// ============================================================================
// TERMINAL
// ============================================================================

/// Line-based asker over a reader and a writer
pub struct TerminalAsker<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> TerminalAsker<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn read_answer(&mut self, question: &Question<'_>) -> Result<Value> {
        write!(self.writer, "{}", question.text)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(FormError::InputAborted {
                field: question.field.clone(),
            });
        }
        Ok(question.answer_from_line(&line))
    }
}

impl TerminalAsker<StdinLock<'static>, Stderr> {
    /// Ask on standard input, writing questions to standard error
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptAsker for TerminalAsker<R, W> {
    fn ask(&mut self, question: &Question<'_>) -> Result<Value> {
        ask_with_retries(question, |previous| {
            if let Some(err) = previous {
                writeln!(self.writer, "{} {}", "Error:".red().bold(), err)?;
            }
            self.read_answer(question)
        })
    }

    fn write_separator(&mut self) {
        if let Err(err) = writeln!(self.writer) {
            debug!(error = %err, "failed to write separator");
        }
    }
}

// ============================================================================
// SCRIPTED
// ============================================================================

/// Answers questions from a queue; each answer is one typed line
#[derive(Debug, Default)]
pub struct ScriptedAsker {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedAsker {
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

    /// Texts of the questions asked so far, one entry per attempt
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl PromptAsker for ScriptedAsker {
    fn ask(&mut self, question: &Question<'_>) -> Result<Value> {
        let answers = &mut self.answers;
        let asked = &mut self.asked;
        ask_with_retries(question, |_| {
            asked.push(question.text.clone());
            let line = answers.pop_front().ok_or_else(|| FormError::InputAborted {
                field: question.field.clone(),
            })?;
            Ok(question.answer_from_line(&line))
        })
    }
}
