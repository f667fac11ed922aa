// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! SPACE compiler command-line interface.
//!
//! This is the entry point for the `space` command: it drives the
//! lex → parse → analyse pipeline over one source file and reports
//! diagnostics. Exit code 0 means a clean compilation; any fatal lex,
//! parse or analysis error exits non-zero.

use camino::Utf8PathBuf;
use clap::Parser;
use miette::Result;

mod compile;

/// SPACE: a statically-typed, class-based source language
#[derive(Debug, Parser)]
#[command(name = "space")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source file to compile
    path: Utf8PathBuf,

    /// Print the token stream before parsing
    #[arg(long)]
    dump_tokens: bool,

    /// Print the AST shape after parsing
    #[arg(long)]
    dump_ast: bool,

    /// Print per-stage timing
    #[arg(long)]
    timing: bool,
}

fn main() -> Result<()> {
    // Initialize the tracing subscriber only when RUST_LOG is explicitly
    // set, so normal runs keep stderr clean for diagnostics.
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let options = compile::Options {
        path: cli.path,
        dump_tokens: cli.dump_tokens,
        dump_ast: cli.dump_ast,
        timing: cli.timing,
    };

    match compile::run(&options) {
        Ok(()) => std::process::exit(0),
        Err(error) => {
            eprintln!("{error:?}");
            std::process::exit(1);
        }
    }
}
