use std::path::PathBuf;

use atty::Stream;
use clap::{ArgAction, Parser};
use color_eyre::Result;
use pylock_core::{CommandStatus, EnvironmentSnapshot, ExecutionOutcome, LockRequest};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

mod style;

use style::Style;

const LOG_ENV: &str = "PYLOCK_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "pylock",
    version,
    about = "Write a deterministic pylock.toml for the active virtual environment.",
    after_help = "Examples:\n  pylock\n  pylock pylock.dev.toml\n"
)]
struct PylockCli {
    #[arg(
        value_name = "OUTPUT",
        help = "Lock file to write (defaults to ./pylock.toml)"
    )]
    output: Option<PathBuf>,
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)"
    )]
    quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q")]
    trace: bool,
    #[arg(long, help = "Emit {status,message,details} JSON on stdout")]
    json: bool,
    #[arg(long, help = "Disable colored human output")]
    no_color: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = PylockCli::parse();
    init_tracing(cli.trace, cli.verbose, cli.quiet);

    let request = cli
        .output
        .clone()
        .map_or_else(LockRequest::default, |output| LockRequest { output });
    let outcome = pylock_core::execute(&request, &EnvironmentSnapshot::capture());
    let code = emit_output(&cli, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(trace: bool, verbose: u8, quiet: bool) {
    let level = if trace {
        "trace"
    } else if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pylock={level},pylock_core={level},pylock_domain={level}"
        ))
    });
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn emit_output(cli: &PylockCli, outcome: &ExecutionOutcome) -> Result<i32> {
    let code = outcome.exit_code();

    if cli.json {
        let payload = json!({
            "status": outcome.status,
            "message": outcome.message,
            "details": outcome.details,
            "exit_code": code,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    if outcome.status == CommandStatus::Ok {
        if !cli.quiet && !cli.json {
            let style = Style::for_stream(cli.no_color, Stream::Stdout);
            println!("{}", style.status(&outcome.status, &outcome.message));
            if let Some(hint) = hint_from_details(&outcome.details) {
                println!("{}", style.hint(hint));
            }
        }
    } else {
        let style = Style::for_stream(cli.no_color, Stream::Stderr);
        eprintln!("{}", style.status(&outcome.status, &outcome.message));
        if let Some(hint) = hint_from_details(&outcome.details) {
            eprintln!("{}", style.hint(hint));
        }
    }

    Ok(code)
}

fn hint_from_details(details: &Value) -> Option<&str> {
    details
        .as_object()
        .and_then(|map| map.get("hint"))
        .and_then(Value::as_str)
}
