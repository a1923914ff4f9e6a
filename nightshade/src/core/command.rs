//! Tokenizing raw input lines into commands.
//!
//! A raw line is split on `|` and each segment runs as if it had been entered
//! on its own line. No output flows between segments.

use crate::core::types::CommandError;

/// Separator between sequentially executed segments.
pub const PIPE: char = '|';

/// A parsed command with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Ls,
    Cd { target: String },
    Cat { name: String },
    Grep { pattern: String, name: String },
    History,
    Arm,
    /// The code is optional so a missing device is reported before usage.
    Defuse { code: Option<String> },
    Status,
    Exit,
}

/// Split a raw line into trimmed, non-empty segments.
pub fn split_segments(raw_line: &str) -> Vec<&str> {
    raw_line
        .split(PIPE)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Split a segment on whitespace. Double quotes group words into one token
/// and are removed; an unterminated quote runs to the end of the segment.
pub fn tokenize(segment: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;
    for ch in segment.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        tokens.push(current);
    }
    tokens
}

/// Parse one segment. Extra arguments are ignored.
pub fn parse_segment(segment: &str) -> Result<Command, CommandError> {
    let tokens = tokenize(segment);
    let Some((name, rest)) = tokens.split_first() else {
        return Err(CommandError::UnknownCommand(segment.to_string()));
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    let command = match name.as_str() {
        "help" => Command::Help,
        "ls" => Command::Ls,
        "cd" => Command::Cd {
            target: required_arg(&args, 0, "cd <directory>")?,
        },
        "cat" => Command::Cat {
            name: required_arg(&args, 0, "cat <file>")?,
        },
        "grep" => {
            if args.len() < 2 {
                return Err(CommandError::InvalidArgs("grep <pattern> <file>"));
            }
            Command::Grep {
                pattern: args[0].to_string(),
                name: args[1].to_string(),
            }
        }
        "history" => Command::History,
        "arm" | "arm_bomb" => Command::Arm,
        "defuse" => Command::Defuse {
            code: args.first().map(|arg| (*arg).to_string()),
        },
        "status" | "story" => Command::Status,
        "exit" => Command::Exit,
        _ => return Err(CommandError::UnknownCommand(segment.to_string())),
    };
    Ok(command)
}

fn required_arg(args: &[&str], index: usize, usage: &'static str) -> Result<String, CommandError> {
    args.get(index)
        .map(|arg| (*arg).to_string())
        .ok_or(CommandError::InvalidArgs(usage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_segments_trims_and_drops_empty() {
        assert_eq!(
            split_segments(" ls | cd missions ||cat brief.txt "),
            vec!["ls", "cd missions", "cat brief.txt"]
        );
        assert!(split_segments("  |  ").is_empty());
    }

    #[test]
    fn tokenize_groups_quoted_words() {
        assert_eq!(
            tokenize(r#"grep "sum to 6" classified.txt"#),
            vec!["grep", "sum to 6", "classified.txt"]
        );
        assert_eq!(tokenize(r#"grep "" x"#), vec!["grep", "", "x"]);
        assert_eq!(tokenize(r#"grep "open ended"#), vec!["grep", "open ended"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn parse_known_commands_and_aliases() {
        assert_eq!(parse_segment("ls"), Ok(Command::Ls));
        assert_eq!(parse_segment("arm_bomb"), Ok(Command::Arm));
        assert_eq!(parse_segment("story"), Ok(Command::Status));
        assert_eq!(
            parse_segment("grep  sum   classified.txt extra"),
            Ok(Command::Grep {
                pattern: "sum".to_string(),
                name: "classified.txt".to_string(),
            })
        );
        assert_eq!(
            parse_segment("defuse 1-4-1"),
            Ok(Command::Defuse {
                code: Some("1-4-1".to_string())
            })
        );
        assert_eq!(parse_segment("defuse"), Ok(Command::Defuse { code: None }));
    }

    #[test]
    fn parse_grep_with_quoted_pattern() {
        assert_eq!(
            parse_segment(r#"grep "sum to 6" classified.txt"#),
            Ok(Command::Grep {
                pattern: "sum to 6".to_string(),
                name: "classified.txt".to_string(),
            })
        );
    }

    #[test]
    fn parse_reports_missing_args_and_unknown_names() {
        assert_eq!(
            parse_segment("cd"),
            Err(CommandError::InvalidArgs("cd <directory>"))
        );
        assert_eq!(
            parse_segment("grep onlypattern"),
            Err(CommandError::InvalidArgs("grep <pattern> <file>"))
        );
        assert_eq!(
            parse_segment("rm -rf /"),
            Err(CommandError::UnknownCommand("rm -rf /".to_string()))
        );
    }
}
