// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! The compilation driver.
//!
//! Owns the per-invocation state the pipeline shares: the source buffer
//! read from disk, the rendered diagnostics, and the optional debug dumps.
//! Stages run strictly in order; the first fatal diagnostic of a stage
//! ends the compilation.

use std::time::Instant;

use camino::Utf8PathBuf;
use miette::{IntoDiagnostic, miette};
use tracing::debug;

use space_core::diagnostics::Diagnostic;
use space_core::parse::parse;
use space_core::semantic_analysis::analyse;
use space_core::source_analysis::{SourceBuffer, lex};

/// Driver options resolved from the command line.
#[derive(Debug)]
pub struct Options {
    /// Path of the source file.
    pub path: Utf8PathBuf,
    /// Print the token stream before parsing.
    pub dump_tokens: bool,
    /// Print the AST shape after parsing.
    pub dump_ast: bool,
    /// Print per-stage timing.
    pub timing: bool,
}

/// One or more reports were printed; the process must exit non-zero.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("compilation failed with {count} error(s)")]
#[diagnostic(code(space::compile))]
struct CompileFailed {
    count: usize,
}

/// Runs the pipeline over one source file.
pub fn run(options: &Options) -> miette::Result<()> {
    let text = std::fs::read_to_string(&options.path).into_diagnostic()?;
    if text.is_empty() {
        return Err(miette!("source file \"{}\" is empty", options.path));
    }
    let buffer = SourceBuffer::new(options.path.as_str(), text);

    // Lex
    let stage = Instant::now();
    let tokens = match lex(&buffer) {
        Ok(tokens) => tokens,
        Err(diagnostic) => return Err(fail(&[diagnostic], &buffer)),
    };
    debug!(tokens = tokens.len(), "lexing finished");
    if options.timing {
        println!("lexer: {:?}", stage.elapsed());
    }
    if options.dump_tokens {
        for token in &tokens {
            println!("{}:{}\t{:?}", token.line(), token.column(), token.kind());
        }
    }

    // Parse
    let stage = Instant::now();
    let module = match parse(tokens) {
        Ok(module) => module,
        Err(diagnostic) => return Err(fail(&[diagnostic], &buffer)),
    };
    debug!(statements = module.statements.len(), "parsing finished");
    if options.timing {
        println!("parser: {:?}", stage.elapsed());
    }
    if options.dump_ast {
        println!("{module:#?}");
    }

    // Analyse
    let stage = Instant::now();
    let analysis = analyse(&module);
    debug!(
        scopes = analysis.scopes.len(),
        diagnostics = analysis.diagnostics.len(),
        externals = analysis.external_accesses.len(),
        "semantic analysis finished"
    );
    if options.timing {
        println!("analyzer: {:?}", stage.elapsed());
    }

    if analysis.diagnostics.is_empty() {
        Ok(())
    } else {
        Err(fail(&analysis.diagnostics, &buffer))
    }
}

/// Renders every report against the source buffer and returns the
/// non-zero-exit error for the driver.
fn fail(diagnostics: &[Diagnostic], buffer: &SourceBuffer) -> miette::Report {
    for diagnostic in diagnostics {
        eprint!("{}", diagnostic.render(buffer));
    }
    CompileFailed {
        count: diagnostics.len(),
    }
    .into()
}
