use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roster_config::{get_config_path, Config};
use roster_output::*;
use roster_registry::{is_valid_email, UserRegistry};
use serde_json::json;

mod logging;
mod profiling;
mod script;

const MAIN_HELP: &str = r#"Roster keeps an in-memory registry of users. Usernames are unique and
email addresses must pass a minimal format check (an `@` that is not first,
then a `.` with at least one character on either side).

Nothing is persisted: every invocation starts with an empty registry.
`roster demo` (the default) registers a fixed set of users and lists them.
`roster run FILE` applies a script of `create USERNAME EMAIL`, `find
USERNAME`, `list` and `count` lines to a fresh registry.

Settings are read from ~/.config/roster/config.toml unless --config is given.

See `roster COMMAND --help` for more documentation and command-specific options."#;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = MAIN_HELP)]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "Output as JSON")]
    json: bool,

    #[arg(long, global = true, help = "Print timing information for profiling")]
    profile: bool,

    #[arg(long, global = true, env = "ROSTER_CONFIG", help = "Path to config file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Register the sample users and list them (default).")]
    Demo,

    #[command(about = "Run a registry script from a file or stdin.")]
    Run {
        #[arg(help = "Script file, '-' or omitted for stdin")]
        file: Option<PathBuf>,
    },

    #[command(about = "Check an email address against the registry's format rule.")]
    CheckEmail {
        #[arg(help = "Email address to check")]
        email: String,
    },

    #[command(about = "Print config file location and contents.")]
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: Application failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.clone().unwrap_or_else(get_config_path);
    let command = cli.command.unwrap_or(Commands::Demo);
    let json_output = cli.json;

    let dispatch = || match command {
        Commands::Demo => {
            let config = load_config(&config_path, json_output)?;
            handle_demo(&config, json_output)
        }
        Commands::Run { file } => {
            let config = load_config(&config_path, json_output)?;
            handle_run(&config, json_output, file.as_deref())
        }
        Commands::CheckEmail { email } => handle_check_email(json_output, &email),
        Commands::Config => handle_config(&config_path),
    };

    if cli.profile {
        let (result, stats) = profiling::profiled("roster", dispatch);
        eprintln!("\n{}", format_profiling(&stats));
        result
    } else {
        dispatch()
    }
}

fn load_config(config_path: &Path, json_output: bool) -> Result<Config> {
    let config = Config::load_from(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    logging::init(&config.logging.level, json_output)?;
    Ok(config)
}

fn handle_demo(config: &Config, json_output: bool) -> Result<ExitCode> {
    let registry = register_sample_users(config);

    if json_output {
        println!("{}", users_to_json(registry.users())?);
        return Ok(ExitCode::SUCCESS);
    }

    let mut out = std::io::stdout();
    registry.list_users(&mut out)?;
    write_summary(&mut out, registry.user_count())?;
    Ok(ExitCode::SUCCESS)
}

fn register_sample_users(config: &Config) -> UserRegistry {
    let mut registry = UserRegistry::with_config(config.registry.clone());

    registry.create_user("john_doe", "john@example.com");
    registry.create_user("jane_smith", "jane@example.com");
    registry.create_user("bob_wilson", "bob@invalid");
    registry.create_user("john_doe", "john2@example.com");
    registry
}

/// The summary is program output, so it bypasses the log filter.
fn write_summary<W: Write>(out: &mut W, count: usize) -> std::io::Result<()> {
    for line in format_summary(count) {
        writeln!(out, "INFO: {}", line)?;
    }
    out.flush()
}

fn handle_run(config: &Config, json_output: bool, file: Option<&Path>) -> Result<ExitCode> {
    let source = match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let commands = script::parse_script(&source)?;
    let mut registry = UserRegistry::with_config(config.registry.clone());
    script::execute(&mut registry, &commands, json_output, &mut std::io::stdout())?;
    Ok(ExitCode::SUCCESS)
}

fn handle_check_email(json_output: bool, email: &str) -> Result<ExitCode> {
    let valid = is_valid_email(email);
    if json_output {
        println!("{}", json!({ "email": email, "valid": valid }));
    } else {
        println!("{}", if valid { "valid" } else { "invalid" });
    }
    Ok(if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn handle_config(config_path: &Path) -> Result<ExitCode> {
    println!("Config file: {}", config_path.display());
    println!();

    if config_path.exists() {
        println!("{}", std::fs::read_to_string(config_path)?);
    } else {
        println!("(file does not exist, using defaults)");
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_demo_summary_survives_quiet_log_level() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_writer(std::io::sink)
            .finish();

        let mut out = Vec::new();
        tracing::subscriber::with_default(subscriber, || {
            let registry = register_sample_users(&Config::default());
            registry.list_users(&mut out).unwrap();
            write_summary(&mut out, registry.user_count()).unwrap();
        });

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "User: john_doe (john@example.com)\n\
             User: jane_smith (jane@example.com)\n\
             INFO: Application version 1.0.0\n\
             INFO: Total users created: 2\n"
        );
    }
}
