#![deny(missing_docs)]

//! # Generated Code Checks
//!
//! Lightweight sanity checks over emitted server source. Pattern checks are
//! heuristics and only warn; unbalanced delimiters are a hard failure.

use crate::error::{AppError, AppResult};
use crate::strategies::ServerStrategy;
use regex::Regex;
use tracing::{debug, warn};

/// Result of one pattern check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// What the check looks for.
    pub name: &'static str,
    /// Whether the pattern matched.
    pub passed: bool,
}

/// Runs the strategy's pattern checks, then the delimiter check.
///
/// Returns the pattern outcomes. Fails only when delimiters are unbalanced
/// or a pattern is not a valid regex.
///
/// # Arguments
///
/// * `code` - Generated source.
/// * `strategy` - Supplies the expected patterns.
pub fn check_generated(code: &str, strategy: &impl ServerStrategy) -> AppResult<Vec<CheckOutcome>> {
    let mut outcomes = Vec::new();
    for (name, pattern) in strategy.check_patterns() {
        let re = Regex::new(pattern)
            .map_err(|e| AppError::General(format!("Invalid check pattern '{}': {}", name, e)))?;
        let passed = re.is_match(code);
        if passed {
            debug!(check = name, "Check passed");
        } else {
            warn!(check = name, "Generated code does not contain an expected {}", name);
        }
        outcomes.push(CheckOutcome { name, passed });
    }
    check_balanced_delimiters(code)?;
    Ok(outcomes)
}

/// Verifies that `{}`, `()` and `[]` nest correctly outside strings, chars and comments.
pub fn check_balanced_delimiters(code: &str) -> AppResult<()> {
    let chars: Vec<char> = code.chars().collect();
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut line = 1usize;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\n' => line += 1,
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    if chars[i] == '\n' {
                        line += 1;
                    }
                    i += 1;
                }
                i += 2;
                continue;
            }
            'r' if is_raw_string_start(&chars, i) => {
                i = skip_raw_string(&chars, i, &mut line);
                continue;
            }
            '"' => {
                i = skip_string(&chars, i, &mut line);
                continue;
            }
            '\'' => {
                i = skip_char_literal(&chars, i);
                continue;
            }
            '(' | '[' | '{' => stack.push((c, line)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, opened_at)) => {
                        return Err(AppError::General(format!(
                            "Mismatched delimiter '{}' on line {} (opened '{}' on line {})",
                            c, line, open, opened_at
                        )))
                    }
                    None => {
                        return Err(AppError::General(format!(
                            "Unexpected closing delimiter '{}' on line {}",
                            c, line
                        )))
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    match stack.pop() {
        Some((open, opened_at)) => Err(AppError::General(format!(
            "Unclosed delimiter '{}' opened on line {}",
            open, opened_at
        ))),
        None => Ok(()),
    }
}

/// `r"` or `r#...#"` not preceded by an identifier character.
fn is_raw_string_start(chars: &[char], i: usize) -> bool {
    if i > 0 && (chars[i - 1].is_alphanumeric() || chars[i - 1] == '_') {
        return false;
    }
    let mut j = i + 1;
    while chars.get(j) == Some(&'#') {
        j += 1;
    }
    chars.get(j) == Some(&'"')
}

fn skip_raw_string(chars: &[char], start: usize, line: &mut usize) -> usize {
    let mut i = start + 1;
    let mut hashes = 0;
    while chars.get(i) == Some(&'#') {
        hashes += 1;
        i += 1;
    }
    i += 1;
    while i < chars.len() {
        if chars[i] == '\n' {
            *line += 1;
        }
        if chars[i] == '"' && (1..=hashes).all(|k| chars.get(i + k) == Some(&'#')) {
            return i + 1 + hashes;
        }
        i += 1;
    }
    i
}

fn skip_string(chars: &[char], start: usize, line: &mut usize) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '"' => return i + 1,
            '\n' => {
                *line += 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    i
}

/// Skips `'x'` and `'\n'`; a lifetime (`'a`) only consumes the quote.
fn skip_char_literal(chars: &[char], start: usize) -> usize {
    match (chars.get(start + 1), chars.get(start + 2)) {
        (Some('\\'), _) => {
            let mut i = start + 2;
            while i < chars.len() && chars[i] != '\'' {
                i += 1;
            }
            i + 1
        }
        (Some(_), Some('\'')) => start + 3,
        _ => start + 1,
    }
}
