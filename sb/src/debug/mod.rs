//! Interactive step debugger and symbol-table dump

use crate::interp::{Environment, StepHook};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};

/// Operator input that resumes execution at a pause
const CONTINUE_TOKEN: &str = "n";

/// Write the environment as a bounded textual block, one binding per
/// line, sorted by name
pub fn write_symbol_table(out: &mut dyn Write, env: &Environment) {
    let _ = writeln!(out, "-- Symbol Table Start --");
    let mut names: Vec<&String> = env.bindings().keys().collect();
    names.sort();
    for name in names {
        if let Some(value) = env.bindings().get(name) {
            let _ = writeln!(out, "{name}: {}", value.stringify());
        }
    }
    let _ = writeln!(out, "-- Symbol Table End --");
}

/// When execution pauses: always in single-step mode, or on a line with
/// a registered breakpoint
#[derive(Debug, Clone)]
pub struct TriggerSet {
    step: bool,
    breakpoints: Vec<usize>,
}

impl TriggerSet {
    pub fn new(step: bool, breakpoints: Vec<usize>) -> Self {
        TriggerSet { step, breakpoints }
    }

    pub fn matches(&self, line: usize) -> bool {
        self.step || self.breakpoints.contains(&line)
    }
}

/// Terminal step debugger, attached to the interpreter as its
/// per-statement hook
pub struct Stepper {
    triggers: TriggerSet,
    dump: bool,
    editor: DefaultEditor,
}

impl Stepper {
    pub fn new(step: bool, breakpoints: Vec<usize>, dump: bool) -> rustyline::Result<Self> {
        Ok(Stepper {
            triggers: TriggerSet::new(step, breakpoints),
            dump,
            editor: DefaultEditor::new()?,
        })
    }

    /// Block until the operator enters the continuation token
    fn wait_for_continue(&mut self, line: usize) {
        loop {
            match self.editor.readline(&format!("sb:{line}> ")) {
                Ok(input) if input.trim() == CONTINUE_TOKEN => break,
                Ok(_) => {
                    println!("Enter '{CONTINUE_TOKEN}' to continue.");
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(_) => break,
            }
        }
    }
}

impl StepHook for Stepper {
    fn after_statement(&mut self, line: usize, env: &Environment) {
        if !self.triggers.matches(line) {
            return;
        }
        if self.dump {
            let mut out = io::stdout();
            write_symbol_table(&mut out, env);
        }
        self.wait_for_continue(line);
    }
}
