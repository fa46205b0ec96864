//! SB Interpreter CLI

use clap::{Parser, Subcommand};
use sb::debug::{write_symbol_table, Stepper};
use sb::interp::Interpreter;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sb", version, about = "SB - tree-walking interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an SB source file
    Run {
        /// Source file to run
        file: PathBuf,
        /// Pause after every statement
        #[arg(long)]
        debug: bool,
        /// Dump the symbol table after execution and at pauses
        #[arg(long)]
        sym: bool,
        /// Pause whenever this line finishes (repeatable)
        #[arg(long = "break", value_name = "LINE")]
        breakpoints: Vec<usize>,
    },
    /// Parse and dump AST (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run {
            file,
            debug,
            sym,
            breakpoints,
        } => run_file(&file, debug, sym, breakpoints),
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Load and parse a source file, reporting front-end errors with ariadne
fn load(path: &PathBuf) -> Result<(String, sb::Node), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let tokens = match sb::lexer::tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            sb::error::report_error(&filename, &source, &e);
            std::process::exit(1);
        }
    };
    let ast = match sb::parser::parse(&source, tokens) {
        Ok(ast) => ast,
        Err(e) => {
            sb::error::report_error(&filename, &source, &e);
            std::process::exit(1);
        }
    };

    Ok((source, ast))
}

fn run_file(
    path: &PathBuf,
    debug: bool,
    sym: bool,
    breakpoints: Vec<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_source, ast) = load(path)?;

    let mut interp = Interpreter::new();
    if debug || !breakpoints.is_empty() {
        interp.set_hook(Box::new(Stepper::new(debug, breakpoints, sym)?));
    }

    let result = interp.run(&ast);

    if let Err(e) = &result {
        // The error line is the last program output
        println!("{e}");
    }
    if sym {
        write_symbol_table(&mut io::stdout(), interp.env());
    }
    if result.is_err() {
        std::process::exit(1);
    }
    Ok(())
}

fn parse_file(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let (_source, ast) = load(path)?;
    println!("{}", serde_json::to_string_pretty(&ast)?);
    Ok(())
}

fn tokenize_file(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    match sb::lexer::tokenize(&source) {
        Ok(tokens) => {
            for (tok, span) in &tokens {
                println!("{:?} @ {}..{}", tok, span.start, span.end);
            }
            Ok(())
        }
        Err(e) => {
            sb::error::report_error(&filename, &source, &e);
            std::process::exit(1);
        }
    }
}
