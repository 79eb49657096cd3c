//! Splits command text into words for the CLI grammar

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::error::{DatactlError, Result};

#[derive(Parser)]
#[grammar = "../grammar/command.pest"]
struct WordParser;

/// Split `text` into words the way a shell would, without any expansion.
pub fn split_words(text: &str) -> Result<Vec<String>> {
    let pairs = WordParser::parse(Rule::words, text).map_err(|e| {
        DatactlError::Usage(format!("cannot split '{}' into words: {}", text, e.variant.message()))
    })?;

    Ok(pairs
        .flatten()
        .filter(|p| p.as_rule() == Rule::word)
        .map(build_word)
        .collect())
}

fn build_word(pair: Pair<Rule>) -> String {
    let mut word = String::new();
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::bare => word.push_str(&unescape(part.as_str())),
            Rule::single_quoted => word.push_str(part.into_inner().as_str()),
            Rule::double_quoted => word.push_str(&unescape(part.into_inner().as_str())),
            _ => {}
        }
    }
    word
}

// Shell-style: a backslash only protects the next character, so `\n` is
// a plain `n`. Script string literals decode control escapes instead.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}
