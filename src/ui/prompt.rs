//! Terminal prompts.
use crate::common::Result;
use inquire::{Confirm, Select, Text};

/// The questions the form asks, and where it prints answers.
///
/// Cancelling a prompt (Esc, Ctrl-C) surfaces as an error for which
/// [`Error::is_cancelled`](crate::Error::is_cancelled) holds.
pub trait Prompter {
    /// One line of text.
    fn text(&mut self, message: &str) -> Result<String>;

    /// Yes or no.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;

    /// Pick one of `options`, returning its index.
    fn select(&mut self, message: &str, options: &[&str]) -> Result<usize>;

    /// Informational output.
    fn message(&mut self, text: &str);

    /// Error output.
    fn error(&mut self, text: &str);

    /// Several lines of text, ended by an empty line.
    fn multi_line(&mut self, message: &str) -> Result<String> {
        let mut lines = Vec::new();
        let mut prompt = format!("{} (linha vazia para terminar)", message);
        loop {
            let line = self.text(&prompt)?;
            if line.is_empty() {
                break;
            }
            lines.push(line);
            prompt = "…".to_string();
        }
        Ok(lines.join("\n"))
    }
}

/// Prompts on the terminal with `inquire`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn text(&mut self, message: &str) -> Result<String> {
        Ok(Text::new(message).prompt()?)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new(message).with_default(default).prompt()?)
    }

    fn select(&mut self, message: &str, options: &[&str]) -> Result<usize> {
        let choice = Select::new(message, options.to_vec()).raw_prompt()?;
        Ok(choice.index)
    }

    fn message(&mut self, text: &str) {
        println!("{}", text);
    }

    fn error(&mut self, text: &str) {
        eprintln!("{}", text);
    }
}

/// A prompter answering from a script, for tests.
#[cfg(test)]
pub(crate) mod scripted {
    use super::Prompter;
    use crate::common::error::types::CANCELLED;
    use crate::common::{Error, Result};
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Answer {
        Text(String),
        Confirm(bool),
        Select(usize),
        Cancel,
    }

    #[derive(Debug, Default)]
    pub(crate) struct ScriptedPrompter {
        answers: VecDeque<Answer>,
        pub(crate) messages: Vec<String>,
        pub(crate) errors: Vec<String>,
        pub(crate) questions: Vec<String>,
    }

    impl ScriptedPrompter {
        pub(crate) fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                ..Default::default()
            }
        }

        /// Whether every scripted answer was used.
        pub(crate) fn finished(&self) -> bool {
            self.answers.is_empty()
        }

        fn next(&mut self, message: &str) -> Result<Answer> {
            self.questions.push(message.to_string());
            match self.answers.pop_front() {
                Some(Answer::Cancel) | None => Err(Error::Prompt(CANCELLED.to_string())),
                Some(answer) => Ok(answer),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn text(&mut self, message: &str) -> Result<String> {
            match self.next(message)? {
                Answer::Text(text) => Ok(text),
                other => panic!("expected text for '{}', script has {:?}", message, other),
            }
        }

        fn confirm(&mut self, message: &str, _default: bool) -> Result<bool> {
            match self.next(message)? {
                Answer::Confirm(yes) => Ok(yes),
                other => panic!("expected confirm for '{}', script has {:?}", message, other),
            }
        }

        fn select(&mut self, message: &str, options: &[&str]) -> Result<usize> {
            match self.next(message)? {
                Answer::Select(index) if index < options.len() => Ok(index),
                other => panic!("expected selection for '{}', script has {:?}", message, other),
            }
        }

        fn message(&mut self, text: &str) {
            self.messages.push(text.to_string());
        }

        fn error(&mut self, text: &str) {
            self.errors.push(text.to_string());
        }
    }

    #[test]
    fn test_multi_line_ends_on_empty_line() {
        let mut prompter = ScriptedPrompter::new([
            Answer::Text("pneus".to_string()),
            Answer::Text("freios".to_string()),
            Answer::Text(String::new()),
        ]);
        assert_eq!(prompter.multi_line("Itens").unwrap(), "pneus\nfreios");
        assert!(prompter.finished());

        let mut prompter = ScriptedPrompter::new([Answer::Text(String::new())]);
        assert_eq!(prompter.multi_line("Observações").unwrap(), "");
    }

    #[test]
    fn test_running_out_of_answers_cancels() {
        let mut prompter = ScriptedPrompter::new([]);
        assert!(prompter.text("Placa").unwrap_err().is_cancelled());
    }
}
