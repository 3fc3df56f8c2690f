//! Argument and switch parsing.
//!
//! Splits one raw command line into the leading command token, positional
//! arguments (quoted substrings stay whole), and switches (`-name` or
//! `-name=value`).

use novakern_types::{KernelError, Result};

use crate::command::CommandArgumentInfo;

/// A switch token, optionally carrying a value (`-provider=host:443`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    pub name: String,
    pub value: Option<String>,
}

/// The parsed form of one command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvidedArguments {
    /// The leading command token.
    pub command: String,
    /// Positional arguments in order.
    pub args: Vec<String>,
    /// Switches in order of appearance.
    pub switches: Vec<Switch>,
    /// The raw line the invocation was parsed from.
    pub raw: String,
}

impl ProvidedArguments {
    /// Look up a switch by name.
    pub fn switch(&self, name: &str) -> Option<&Switch> {
        self.switches.iter().find(|s| s.name == name)
    }

    /// Whether a switch is present.
    pub fn has_switch(&self, name: &str) -> bool {
        self.switch(name).is_some()
    }
}

/// Tokenize a command line respecting quotes and backslash escapes.
///
/// - Double-quoted substrings are single tokens, internal whitespace kept.
/// - Single-quoted substrings preserve all characters literally.
/// - Backslash escapes the next character outside of quotes.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars();
    let mut in_single = false;
    let mut in_double = false;
    // Distinguishes a bare separator from an empty quoted token ("").
    let mut token_started = false;

    while let Some(ch) = chars.next() {
        if in_single {
            if ch == '\'' {
                in_single = false;
            } else {
                current.push(ch);
            }
        } else if in_double {
            if ch == '"' {
                in_double = false;
            } else {
                current.push(ch);
            }
        } else {
            match ch {
                '\'' => {
                    in_single = true;
                    token_started = true;
                },
                '"' => {
                    in_double = true;
                    token_started = true;
                },
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                        token_started = true;
                    }
                },
                c if c.is_whitespace() => {
                    if token_started {
                        tokens.push(std::mem::take(&mut current));
                        token_started = false;
                    }
                },
                _ => {
                    current.push(ch);
                    token_started = true;
                },
            }
        }
    }

    if in_single {
        return Err(KernelError::Command("unterminated single quote".to_string()));
    }
    if in_double {
        return Err(KernelError::Command("unterminated double quote".to_string()));
    }

    if token_started {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Parse a raw command line.
///
/// Returns `Ok(None)` for an empty or whitespace-only line: a no-op, not
/// an error. Tokens with a leading `-` become switches; a switch value is
/// split off at the first `=`.
pub fn parse_line(line: &str) -> Result<Option<ProvidedArguments>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let tokens = tokenize(trimmed)?;
    let Some((command, rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let mut args = Vec::new();
    let mut switches = Vec::new();
    for token in rest {
        if let Some(body) = token.strip_prefix('-') {
            if body.is_empty() {
                // A lone dash is a positional argument by convention.
                args.push(token.clone());
                continue;
            }
            match body.split_once('=') {
                Some((name, value)) => switches.push(Switch {
                    name: name.to_string(),
                    value: Some(value.to_string()),
                }),
                None => switches.push(Switch {
                    name: body.to_string(),
                    value: None,
                }),
            }
        } else {
            args.push(token.clone());
        }
    }

    Ok(Some(ProvidedArguments {
        command: command.clone(),
        args,
        switches,
        raw: trimmed.to_string(),
    }))
}

/// Result of validating positional arguments against a declared shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentCheck {
    Satisfied,
    Insufficient { required: usize, supplied: usize },
}

/// Validate a parsed invocation against one argument shape.
///
/// The minimum is only enforced when the shape requires arguments.
pub fn check_arguments(shape: &CommandArgumentInfo, provided: &ProvidedArguments) -> ArgumentCheck {
    if shape.arguments_required() && provided.args.len() < shape.minimum_arguments() {
        ArgumentCheck::Insufficient {
            required: shape.minimum_arguments(),
            supplied: provided.args.len(),
        }
    } else {
        ArgumentCheck::Satisfied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_line_is_no_op() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   \t ").unwrap(), None);
    }

    #[test]
    fn splits_command_and_args() {
        let parsed = parse_line("copy a.txt b.txt").unwrap().unwrap();
        assert_eq!(parsed.command, "copy");
        assert_eq!(parsed.args, ["a.txt", "b.txt"]);
        assert!(parsed.switches.is_empty());
    }

    #[test]
    fn quoted_argument_stays_whole() {
        let parsed = parse_line("mycommand \"hello world\" second").unwrap().unwrap();
        assert_eq!(parsed.args, ["hello world", "second"]);
    }

    #[test]
    fn single_quotes_preserve_literals() {
        let parsed = parse_line("note 'a \"quoted\" thing'").unwrap().unwrap();
        assert_eq!(parsed.args, ["a \"quoted\" thing"]);
    }

    #[test]
    fn empty_quoted_token_is_kept() {
        let parsed = parse_line("touch \"\"").unwrap().unwrap();
        assert_eq!(parsed.args, [""]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert!(parse_line("echo \"oops").is_err());
        assert!(parse_line("echo 'oops").is_err());
    }

    #[test]
    fn backslash_escapes_spaces() {
        let parsed = parse_line("cat my\\ file.txt").unwrap().unwrap();
        assert_eq!(parsed.args, ["my file.txt"]);
    }

    #[test]
    fn flag_switch_has_no_value() {
        let parsed = parse_line("list -tui").unwrap().unwrap();
        assert!(parsed.args.is_empty());
        assert_eq!(
            parsed.switches,
            [Switch {
                name: "tui".to_string(),
                value: None
            }]
        );
        assert!(parsed.has_switch("tui"));
    }

    #[test]
    fn valued_switch_splits_on_first_equals() {
        let parsed = parse_line("upload -provider=pastebin.com:443 file").unwrap().unwrap();
        assert_eq!(parsed.args, ["file"]);
        let sw = parsed.switch("provider").unwrap();
        assert_eq!(sw.value.as_deref(), Some("pastebin.com:443"));
    }

    #[test]
    fn switch_value_may_contain_equals() {
        let parsed = parse_line("run -env=A=B").unwrap().unwrap();
        let sw = parsed.switch("env").unwrap();
        assert_eq!(sw.value.as_deref(), Some("A=B"));
    }

    #[test]
    fn lone_dash_is_positional() {
        let parsed = parse_line("cat -").unwrap().unwrap();
        assert_eq!(parsed.args, ["-"]);
        assert!(parsed.switches.is_empty());
    }

    #[test]
    fn check_respects_arguments_required() {
        let optional = CommandArgumentInfo::new(&["x [path]"], false, 3);
        let required = CommandArgumentInfo::new(&["x <a> <b>"], true, 2);
        let one_arg = parse_line("x only").unwrap().unwrap();

        assert_eq!(check_arguments(&optional, &one_arg), ArgumentCheck::Satisfied);
        assert_eq!(
            check_arguments(&required, &one_arg),
            ArgumentCheck::Insufficient {
                required: 2,
                supplied: 1
            }
        );
    }

    #[test]
    fn switches_do_not_count_as_positionals() {
        let required = CommandArgumentInfo::new(&["x <a>"], true, 1);
        let parsed = parse_line("x -verbose").unwrap().unwrap();
        assert_eq!(
            check_arguments(&required, &parsed),
            ArgumentCheck::Insufficient {
                required: 1,
                supplied: 0
            }
        );
    }

    proptest! {
        #[test]
        fn tokenize_never_panics(input in ".*") {
            let _ = tokenize(&input);
        }

        #[test]
        fn plain_words_match_whitespace_split(
            words in proptest::collection::vec("[a-z0-9_.]{1,8}", 1..6)
        ) {
            let line = words.join(" ");
            let tokens = tokenize(&line).unwrap();
            prop_assert_eq!(tokens, words);
        }

        #[test]
        fn quoted_word_round_trips(body in "[a-z ]{0,16}") {
            let line = format!("cmd \"{body}\"");
            let parsed = parse_line(&line).unwrap().unwrap();
            prop_assert_eq!(parsed.args, vec![body]);
        }
    }
}
