use crate::catalog::Candidate;
use crate::rename::format_rating;
use crate::resolve::CATALOG_TAG;
use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::debug;

/// What the operator settled on for a folder
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Candidate(Candidate),
    Custom(String),
}

/// Human in the loop: picks among ranked candidates and supplies free-text retries
pub trait InteractiveSelector {
    /// Present the ranked list; `None` only when input is closed
    fn choose(&mut self, candidates: &[Candidate]) -> Option<Selection>;

    /// Offer a custom-query retry after every stage failed; `None` declines
    fn ask_custom_query(&mut self, failed_query: &str) -> Option<String>;
}

/// Classified line of operator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// 0-based index into the candidate list
    Index(usize),
    /// The extra "enter a custom name" entry
    AskCustom,
    /// Free text taken as a custom title
    Custom(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Custom name cannot be empty. Please try again.")]
    Empty,
    #[error("Invalid choice number {0}. Please try again.")]
    OutOfRange(u64),
}

/// Validate one line typed at the candidate prompt
pub fn parse_choice(input: &str, count: usize) -> Result<Choice, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(InputError::Empty);
    }

    if input.chars().all(|c| c.is_ascii_digit()) {
        let number: u64 = input.parse().map_err(|_| InputError::OutOfRange(u64::MAX))?;
        return match usize::try_from(number) {
            Ok(n) if (1..=count).contains(&n) => Ok(Choice::Index(n - 1)),
            Ok(n) if n == count + 1 => Ok(Choice::AskCustom),
            _ => Err(InputError::OutOfRange(number)),
        };
    }

    Ok(Choice::Custom(input.to_string()))
}

/// Group digits with commas: 1234567 -> "1,234,567"
fn format_votes(votes: u64) -> String {
    let digits = votes.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn describe(candidate: &Candidate) -> String {
    let year = candidate
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Unknown Year".to_string());
    format!(
        "{} ({}) - {}- {} (Ranked by {} people)",
        candidate.title,
        year,
        CATALOG_TAG,
        format_rating(candidate.rating),
        format_votes(candidate.votes)
    )
}

/// Line-oriented selector over any reader/writer pair (stdin/stdout in the binary)
pub struct TerminalSelector<R, W> {
    input: R,
    output: W,
}

impl TerminalSelector<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a prompt and read one trimmed line; `None` on EOF or read error
    fn ask(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.output, "{}", prompt);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn say(&mut self, message: &str) {
        let _ = writeln!(self.output, "{}", message);
    }
}

impl<R: BufRead, W: Write> InteractiveSelector for TerminalSelector<R, W> {
    fn choose(&mut self, candidates: &[Candidate]) -> Option<Selection> {
        self.say("\nPlease choose one of the following options:");
        for (i, candidate) in candidates.iter().enumerate() {
            let line = format!("{}. {}", i + 1, describe(candidate));
            self.say(&line);
        }
        let custom_entry = format!("{}. Enter a custom name", candidates.len() + 1);
        self.say(&custom_entry);

        loop {
            let line = self.ask("Enter the number of your choice or custom name: ")?;
            match parse_choice(&line, candidates.len()) {
                Ok(Choice::Index(i)) => return Some(Selection::Candidate(candidates[i].clone())),
                Ok(Choice::Custom(title)) => return Some(Selection::Custom(title)),
                Ok(Choice::AskCustom) => {
                    let name = self.ask("Enter the custom name: ")?;
                    if name.is_empty() {
                        self.say(&InputError::Empty.to_string());
                    } else {
                        return Some(Selection::Custom(name));
                    }
                }
                Err(e) => {
                    debug!("Rejected operator input {:?}: {}", line, e);
                    self.say(&e.to_string());
                }
            }
        }
    }

    fn ask_custom_query(&mut self, failed_query: &str) -> Option<String> {
        let prompt = format!(
            "No valid options found for '{}'. Would you like to retry with a custom name? (yes/no) ",
            failed_query
        );
        let answer = self.ask(&prompt)?.to_lowercase();
        if answer != "yes" && answer != "y" {
            return None;
        }

        let query = self.ask("Enter the custom name to retry: ")?;
        if query.is_empty() {
            self.say("No custom name provided. Skipping folder...");
            None
        } else {
            Some(query)
        }
    }
}
