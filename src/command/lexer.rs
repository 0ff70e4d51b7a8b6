//! command::lexer
//!
//! Line screening and tokenization.
//!
//! [`lex`] runs the grammar gates in a fixed order and stops at the first
//! failure:
//!
//! 1. The line is not blank
//! 2. Double quotes are balanced
//! 3. The word `git` appears at most once
//! 4. The line starts with `git`
//! 5. Split into tokens, honoring single- and double-quoted spans
//!
//! Gate 3 counts whitespace-separated words with their quote characters
//! stripped, so a quoted message containing the word `git` is rejected
//! wherever it sits in the message.

use super::error::CommandError;

/// Screen and tokenize a command line.
///
/// The leading `git` token is included in the result.
///
/// # Errors
///
/// Returns the validation error of the first gate the line fails.
///
/// # Example
///
/// ```
/// use branchlab::command::lexer::lex;
///
/// let tokens = lex(r#"git commit -m "Fix login form""#).unwrap();
/// assert_eq!(tokens, vec!["git", "commit", "-m", "Fix login form"]);
///
/// assert!(lex("git add . && git commit").is_err());
/// ```
pub fn lex(line: &str) -> Result<Vec<String>, CommandError> {
    if line.trim().is_empty() {
        return Err(CommandError::Empty);
    }

    if line.chars().filter(|c| *c == '"').count() % 2 != 0 {
        return Err(CommandError::UnbalancedQuotes);
    }

    let words: Vec<&str> = line
        .split_whitespace()
        .map(|w| w.trim_matches(|c| c == '"' || c == '\''))
        .collect();
    if words.iter().filter(|w| **w == "git").count() > 1 {
        return Err(CommandError::MultipleGit);
    }

    if line.split_whitespace().next() != Some("git") {
        return Err(CommandError::MissingGit);
    }

    Ok(tokenize(line))
}

/// Split on unquoted whitespace.
///
/// Quote characters delimit spans and are dropped; a quoted span may be
/// empty (`""` yields an empty token). An unterminated single-quoted span
/// runs to the end of the line.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    tokens
}
