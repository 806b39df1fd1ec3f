//! Console-backed operator answers.

use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, Write};

use crate::extract::{IdentifierSource, KeywordSource, parse_keywords};
use crate::part::PartLabel;

/// Ask `question` on stderr and read one line from stdin.
fn ask(question: &str) -> Result<String> {
    eprint!("{question} ");
    io::stderr().flush()?;

    let mut input = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read answer")?;
    if read == 0 {
        bail!("no answer to `{question}`: input closed");
    }
    Ok(input.trim().to_string())
}

/// Asks for comma-separated keywords of every part.
#[derive(Debug, Default)]
pub struct ConsoleKeywords;

impl KeywordSource for ConsoleKeywords {
    fn keywords(&mut self, label: &PartLabel) -> Result<Vec<String>> {
        let answer = ask(&format!("enter keywords for {label}:"))?;
        Ok(parse_keywords(&answer))
    }
}

/// Asks which hair a deferred part belongs to.
#[derive(Debug, Default)]
pub struct ConsoleIdentifiers;

impl IdentifierSource for ConsoleIdentifiers {
    fn identifier(&mut self, label: &PartLabel) -> Result<u32> {
        let answer = ask(&format!("enter matching hair id (4 digits) for {label}:"))?;
        parse_identifier(&answer)
    }
}

/// Parse an operator-supplied part number such as `0004`.
pub fn parse_identifier(answer: &str) -> Result<u32> {
    answer
        .trim()
        .parse()
        .with_context(|| format!("`{}` is not a part number", answer.trim()))
}
