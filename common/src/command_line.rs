//! Splits the configured command line into an executable and its arguments.
//!
//! Only double quotes are understood, and only as a grouping device: inside a
//! quoted span spaces do not separate tokens. There is no escaping, so a token
//! can never contain a literal `"`. This is a known limitation, not a bug. No
//! shell ever sees the result.

use thiserror::Error as ThisError;

/// Reasons a command line cannot be turned into a program invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum TokenizeError {
    #[error("unmatched quotes in command line")]
    UnmatchedQuote,
    #[error("empty command line")]
    EmptyCommand,
}

/// Splits `command_line` on unquoted spaces.
///
/// The first token is the executable, the rest are passed as literal arguments.
///
/// # Errors
///
/// Returns [`TokenizeError::UnmatchedQuote`] if a quoted span is never closed and
/// [`TokenizeError::EmptyCommand`] if no token remains.
///
/// # Examples
///
/// ```
/// # use winpsp_common::tokenize;
/// let tokens = tokenize(r#""C:\Program Files\app.exe" --flag value"#).unwrap();
/// assert_eq!(tokens, [r"C:\Program Files\app.exe", "--flag", "value"]);
/// ```
pub fn tokenize(command_line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in command_line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ' ' if !in_quotes => {
                if !current.is_empty() {
                    tokens.push(core::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(TokenizeError::UnmatchedQuote);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    if tokens.is_empty() {
        return Err(TokenizeError::EmptyCommand);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_path_with_arguments() {
        let tokens = tokenize(r#""C:\Program Files\app.exe" --flag value"#).unwrap();
        assert_eq!(tokens, [r"C:\Program Files\app.exe", "--flag", "value"]);
    }

    #[test]
    fn unterminated_quote_is_rejected() {
        assert_eq!(
            tokenize(r#"open "unterminated"#),
            Err(TokenizeError::UnmatchedQuote)
        );
    }

    #[test]
    fn consecutive_spaces_collapse() {
        let tokens = tokenize("  backup.exe   --full  ").unwrap();
        assert_eq!(tokens, ["backup.exe", "--full"]);
    }

    #[test]
    fn blank_input_is_empty_command() {
        assert_eq!(tokenize(""), Err(TokenizeError::EmptyCommand));
        assert_eq!(tokenize("    "), Err(TokenizeError::EmptyCommand));
    }

    #[test]
    fn empty_quotes_yield_no_token() {
        assert_eq!(tokenize(r#""""#), Err(TokenizeError::EmptyCommand));
        assert_eq!(tokenize(r#"app.exe "" x"#).unwrap(), ["app.exe", "x"]);
    }

    #[test]
    fn quotes_only_gate_separation() {
        // Quotes inside a token are consumed and glue the pieces together.
        let tokens = tokenize(r#"--name="John Doe" tail"#).unwrap();
        assert_eq!(tokens, ["--name=John Doe", "tail"]);
    }

    #[test]
    fn tabs_are_not_separators() {
        let tokens = tokenize("a\tb c").unwrap();
        assert_eq!(tokens, ["a\tb", "c"]);
    }

    #[test]
    fn non_ascii_is_preserved() {
        let tokens = tokenize(r#""D:\备份\run.cmd" ünïcode"#).unwrap();
        assert_eq!(tokens, [r"D:\备份\run.cmd", "ünïcode"]);
    }
}
