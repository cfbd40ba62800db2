// UI layer: the interactive search loop and one-shot lookups, built on
// `dialoguer` prompts, an `indicatif` spinner and `crossterm` styling.
// All lookup logic lives in `Resolver`; this module only reads input and
// prints results.

use crate::categorize::{organize, suggested, Category};
use crate::config::Config;
use crate::fetch::{Sleeper, Transport};
use crate::resolver::Resolver;
use crate::select::{InvalidSelection, Prompt, ScriptedPrompt};
use crate::taxonomy::Hierarchy;
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

const QUIT: &str = "quit";

/// Log writer for the subscriber. While a spinner is attached, each log line
/// is written with the spinner suspended so it does not land mid-line.
#[derive(Clone, Default)]
pub struct LogSink {
    active: Arc<Mutex<Option<ProgressBar>>>,
}

impl LogSink {
    pub fn attach(&self, spinner: &ProgressBar) {
        if let Ok(mut slot) = self.active.lock() {
            *slot = Some(spinner.clone());
        }
    }

    pub fn detach(&self) {
        if let Ok(mut slot) = self.active.lock() {
            *slot = None;
        }
    }

    fn current(&self) -> Option<ProgressBar> {
        self.active.lock().ok().and_then(|slot| slot.clone())
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = SuspendingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendingWriter {
            spinner: self.current(),
        }
    }
}

/// stderr, with the attached spinner (if any) suspended per write.
pub struct SuspendingWriter {
    spinner: Option<ProgressBar>,
}

impl Write for SuspendingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.spinner {
            Some(spinner) => spinner.suspend(|| io::stderr().write(buf)),
            None => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// One line of the disambiguation listing.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChoiceLine {
    Heading(Category),
    Choice {
        number: usize,
        name: String,
        suggested: bool,
    },
}

/// Choices grouped under category headings, sorted within each group. Each
/// choice keeps the number it has in `choices`, so the typed number still
/// maps to the same entry.
fn choice_lines(choices: &[String]) -> Vec<ChoiceLine> {
    let hint = suggested(choices);
    let mut lines = Vec::new();
    for (category, names) in organize(choices) {
        lines.push(ChoiceLine::Heading(category));
        for name in names {
            let Some(index) = choices.iter().position(|c| *c == name) else {
                continue;
            };
            lines.push(ChoiceLine::Choice {
                number: index + 1,
                name,
                suggested: Some(index) == hint,
            });
        }
    }
    lines
}

/// Asks on the terminal, hiding the lookup spinner while it does.
pub struct ConsolePrompt {
    spinner: ProgressBar,
}

impl ConsolePrompt {
    pub fn new(spinner: ProgressBar) -> Self {
        ConsolePrompt { spinner }
    }
}

impl Prompt for ConsolePrompt {
    fn show_choices(&mut self, query: &str, choices: &[String]) {
        let lines = choice_lines(choices);
        self.spinner.suspend(|| {
            println!("\nFound multiple matches for '{}':", query);
            for line in lines {
                match line {
                    ChoiceLine::Heading(category) => {
                        println!("\n{}:", category.as_str().to_uppercase());
                    }
                    ChoiceLine::Choice {
                        number,
                        name,
                        suggested,
                    } => {
                        let text = format!("{}. {}", number, name);
                        if suggested {
                            println!("{}", text.bold());
                        } else {
                            println!("{}", text);
                        }
                    }
                }
            }
            println!("(Enter picks 1)");
        });
    }

    fn read_selection(&mut self) -> io::Result<String> {
        self.spinner.suspend(|| {
            Input::<String>::new()
                .with_prompt("Enter number (or 0 to cancel)")
                .allow_empty(true)
                .interact_text()
        })
    }

    fn reject(&mut self, reason: &InvalidSelection) {
        self.spinner.suspend(|| println!("{}", reason.message().yellow()));
    }
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Look up one name and print the outcome. Returns whether a hierarchy was
/// found.
pub fn lookup_and_print<T: Transport, S: Sleeper>(
    resolver: &mut Resolver<T, S>,
    config: &Config,
    logs: &LogSink,
    name: &str,
) -> Result<bool> {
    let progress = spinner(format!("Searching for {}...", name));
    logs.attach(&progress);
    let result = match config.pick {
        Some(choice) => resolver.lookup(name, &mut ScriptedPrompt::new([choice.to_string()])),
        None => resolver.lookup(name, &mut ConsolePrompt::new(progress.clone())),
    };
    logs.detach();
    progress.finish_and_clear();

    match result {
        Some(hierarchy) => {
            print_hierarchy(&hierarchy, config.json)?;
            Ok(true)
        }
        None => {
            println!("No results found for '{}'", name);
            Ok(false)
        }
    }
}

/// Styled rank lines, or pretty JSON when `json` is set.
pub fn print_hierarchy(hierarchy: &Hierarchy, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(hierarchy).context("Serializing hierarchy")?;
        println!("{}", text);
        return Ok(());
    }

    println!("\n{}", "Taxonomy Results:".bold());
    for (rank, taxon) in hierarchy.iter() {
        if taxon.description.is_empty() {
            println!("{}: {}", rank.label().bold(), taxon.name);
        } else {
            println!(
                "{}: {} - {}",
                rank.label().bold(),
                taxon.name,
                taxon.description.as_str().dim()
            );
        }
    }
    Ok(())
}

/// Look up each name once. Returns how many produced no result.
pub fn run_once<T: Transport, S: Sleeper>(
    resolver: &mut Resolver<T, S>,
    config: &Config,
    logs: &LogSink,
) -> Result<usize> {
    let mut misses = 0;
    for name in &config.names {
        if !lookup_and_print(resolver, config, logs, name)? {
            misses += 1;
        }
    }
    Ok(misses)
}

pub fn print_banner() {
    println!("\n{}", "Welcome to the Animal Name Search!".bold());
    println!("--------------------------------");
    println!("This tool helps you search for animal names and shows their taxonomy.");
    println!("Type '{}' at any time to exit.", QUIT);
}

/// Interactive loop: read a name, look it up, print, repeat until the user
/// types `quit`.
pub fn search_loop<T: Transport, S: Sleeper>(
    resolver: &mut Resolver<T, S>,
    config: &Config,
    logs: &LogSink,
) -> Result<()> {
    loop {
        let search: String = Input::new()
            .with_prompt(format!("\nEnter an animal name (or '{}' to exit)", QUIT))
            .allow_empty(true)
            .interact_text()
            .context("Reading search term")?;
        let search = search.trim();

        if search.eq_ignore_ascii_case(QUIT) {
            break;
        }
        if search.is_empty() {
            continue;
        }

        lookup_and_print(resolver, config, logs, search)?;

        let _: String = Input::new()
            .with_prompt("\nPress Enter to search again")
            .allow_empty(true)
            .interact_text()
            .context("Waiting for Enter")?;
    }
    Ok(())
}
