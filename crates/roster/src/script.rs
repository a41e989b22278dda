use std::io::Write;

use anyhow::Result;
use roster_output::{format_user, users_to_json};
use roster_registry::UserRegistry;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Create { username: String, email: String },
    Find { username: String },
    List,
    Count,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: '{command}' expects {expected} argument(s), got {got}")]
    WrongArity {
        line: usize,
        command: String,
        expected: usize,
        got: usize,
    },
}

/// Parses one command per line. Blank lines and `#` comments are skipped.
pub fn parse_script(input: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    let mut commands = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut words = trimmed.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();

        let expected = match command {
            "create" => 2,
            "find" => 1,
            "list" | "count" => 0,
            _ => {
                return Err(ScriptError::UnknownCommand {
                    line,
                    command: command.to_string(),
                })
            }
        };
        if args.len() != expected {
            return Err(ScriptError::WrongArity {
                line,
                command: command.to_string(),
                expected,
                got: args.len(),
            });
        }

        commands.push(match command {
            "create" => ScriptCommand::Create {
                username: args[0].to_string(),
                email: args[1].to_string(),
            },
            "find" => ScriptCommand::Find {
                username: args[0].to_string(),
            },
            "list" => ScriptCommand::List,
            _ => ScriptCommand::Count,
        });
    }

    Ok(commands)
}

/// Applies `commands` in order, writing lookups, listings and counts to `out`.
pub fn execute<W: Write>(
    registry: &mut UserRegistry,
    commands: &[ScriptCommand],
    json_output: bool,
    out: &mut W,
) -> Result<()> {
    for command in commands {
        match command {
            ScriptCommand::Create { username, email } => {
                registry.create_user(username, email);
            }
            ScriptCommand::Find { username } => {
                if let Some(user) = registry.find_user(username) {
                    if json_output {
                        writeln!(out, "{}", serde_json::to_string(user)?)?;
                    } else {
                        writeln!(out, "{}", format_user(user))?;
                    }
                }
            }
            ScriptCommand::List => {
                if json_output {
                    writeln!(out, "{}", users_to_json(registry.users())?)?;
                } else {
                    registry.list_users(&mut *out)?;
                }
            }
            ScriptCommand::Count => {
                writeln!(out, "{}", registry.user_count())?;
            }
        }
    }
    Ok(())
}
