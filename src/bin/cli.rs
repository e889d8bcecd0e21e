//! databroker CLI
//!
//! Runs the completion translator on a hand-supplied backend outcome.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use databroker::completion::{AppHandle, Request, StageSpec};
use databroker::protocol::{Opcode, Reply, ReplyKind, Status};
use databroker::{Config, Translator};
use tracing_subscriber::{fmt, EnvFilter};

/// databroker CLI
#[derive(Parser, Debug)]
#[command(name = "databroker-cli")]
#[command(about = "Inspect how backend outcomes map to completions")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate one backend outcome into a completion
    Translate {
        /// Request opcode (put, get, nscreate, ...)
        #[arg(short, long)]
        opcode: Opcode,

        /// Raw backend return code (negated errno)
        #[arg(short, long, allow_hyphen_values = true, default_value = "0")]
        rc: i64,

        /// Integer payload of the reply
        #[arg(short, long, allow_hyphen_values = true, default_value = "0")]
        payload: i64,

        /// Reply type tag (integer, bulk, array, nil, error)
        #[arg(short = 'k', long, default_value = "integer")]
        reply_kind: ReplyKind,

        /// Evaluate as an intermediate protocol stage
        #[arg(long)]
        non_terminal: bool,

        /// Leave non-terminal directory completions unrefined
        #[arg(long)]
        strict: bool,
    },

    /// Show a cancelled completion
    Cancel {
        /// Request opcode
        #[arg(short, long)]
        opcode: Opcode,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,databroker=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("databroker-cli v{}", databroker::VERSION);

    match args.command {
        Commands::Translate {
            opcode,
            rc,
            payload,
            reply_kind,
            non_terminal,
            strict,
        } => {
            let config = Config::builder().strict_stage_checks(strict).build();
            let translator = Translator::from_config(&config);

            let step = if non_terminal {
                StageSpec::intermediate(0)
            } else {
                StageSpec::terminal(0)
            };
            let request = Request::new(opcode, AppHandle(0)).with_step(Some(step));
            let reply = build_reply(reply_kind, payload);

            match translator.translate(&request, &reply, rc) {
                Ok(completion) => {
                    print_completion(completion.status, completion.value);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!("Translation failed: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Cancel { opcode } => {
            let request = Request::new(opcode, AppHandle(0));
            let completion = Translator::new().translate_cancel(&request);
            print_completion(completion.status, completion.value);
            ExitCode::SUCCESS
        }
    }
}

fn build_reply(kind: ReplyKind, payload: i64) -> Reply {
    match kind {
        ReplyKind::Integer => Reply::Integer(payload),
        ReplyKind::Bulk => Reply::Bulk(payload.to_string().into_bytes()),
        ReplyKind::Array => Reply::Array(payload.max(0) as usize),
        ReplyKind::Nil => Reply::Nil,
        ReplyKind::Error => Reply::Error(format!("ERR {}", payload)),
    }
}

fn print_completion(status: Status, value: i64) {
    println!("status: {:?} ({})", status, status);
    println!("value:  {}", value);
}
