// Disambiguation between several matching common names.
//
// `parse_selection` is the pure decision: one line of input against the
// number of displayed choices. `disambiguate` drives a `Prompt` until that
// decision is a pick or a cancel.

use std::io;

/// Outcome of reading one line of selection input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the displayed choices.
    Pick(usize),
    Cancel,
    Invalid(InvalidSelection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSelection {
    NotANumber,
    OutOfRange,
}

impl InvalidSelection {
    pub fn message(&self) -> &'static str {
        match self {
            InvalidSelection::NotANumber => "Please enter a valid number.",
            InvalidSelection::OutOfRange => "Invalid choice. Please try again.",
        }
    }
}

/// Choices are numbered from 1; `0` cancels. Blank input picks the first
/// choice.
pub fn parse_selection(input: &str, choices: usize) -> Selection {
    let input = input.trim();
    if input.is_empty() {
        return if choices == 0 {
            Selection::Cancel
        } else {
            Selection::Pick(0)
        };
    }

    match input.parse::<usize>() {
        Err(_) => Selection::Invalid(InvalidSelection::NotANumber),
        Ok(0) => Selection::Cancel,
        Ok(n) if n <= choices => Selection::Pick(n - 1),
        Ok(_) => Selection::Invalid(InvalidSelection::OutOfRange),
    }
}

/// Console side of disambiguation.
pub trait Prompt {
    /// Show the numbered choices found for `query`.
    fn show_choices(&mut self, query: &str, choices: &[String]);

    /// Read one raw line of selection input.
    fn read_selection(&mut self) -> io::Result<String>;

    /// Tell the user their last input was rejected.
    fn reject(&mut self, reason: &InvalidSelection);
}

impl<P: Prompt + ?Sized> Prompt for &mut P {
    fn show_choices(&mut self, query: &str, choices: &[String]) {
        (**self).show_choices(query, choices)
    }

    fn read_selection(&mut self) -> io::Result<String> {
        (**self).read_selection()
    }

    fn reject(&mut self, reason: &InvalidSelection) {
        (**self).reject(reason)
    }
}

/// Asks until the user picks a choice (`Some(index)`) or cancels (`None`).
/// Invalid input is reported and asked again.
pub fn disambiguate<P: Prompt + ?Sized>(
    prompt: &mut P,
    query: &str,
    choices: &[String],
) -> io::Result<Option<usize>> {
    prompt.show_choices(query, choices);
    loop {
        let line = prompt.read_selection()?;
        match parse_selection(&line, choices.len()) {
            Selection::Pick(index) => return Ok(Some(index)),
            Selection::Cancel => return Ok(None),
            Selection::Invalid(reason) => prompt.reject(&reason),
        }
    }
}

/// A `Prompt` fed from a fixed list of answers. Useful for scripted runs and
/// tests; running out of answers is an `UnexpectedEof` error.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    pub shown: Vec<Vec<String>>,
    pub rejections: Vec<InvalidSelection>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompt {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn show_choices(&mut self, _query: &str, choices: &[String]) {
        self.shown.push(choices.to_vec());
    }

    fn read_selection(&mut self) -> io::Result<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left"))
    }

    fn reject(&mut self, reason: &InvalidSelection) {
        self.rejections.push(reason.clone());
    }
}
