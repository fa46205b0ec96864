//! Runtime errors for the evaluator
//!
//! A runtime failure is a value in this language: it carries the source
//! line of the node that produced it and a fixed message, and it unwinds
//! evaluation to the program boundary where it is printed as a single
//! `ERROR AT LINE <n>: <message>` line.

use std::fmt;

/// Runtime error produced during evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub line: usize,
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operand of unexpected runtime type
    TypeMismatch,
    /// Identifier, sub or builtin used before registration
    UnboundName,
    /// Builtin called with the wrong argument count
    ArityMismatch,
    /// List index-assignment outside the list
    BoundsViolation,
    /// An expression position produced no value
    NoValue,
    /// A builtin's I/O failed
    Io,
}

impl RuntimeError {
    pub fn new(line: usize, kind: ErrorKind, message: impl Into<String>) -> Self {
        RuntimeError {
            line,
            kind,
            message: message.into(),
        }
    }

    pub fn unrecognised_variable(line: usize) -> Self {
        Self::new(line, ErrorKind::UnboundName, "Unrecognised variable!")
    }

    pub fn unknown_sub(line: usize) -> Self {
        Self::new(
            line,
            ErrorKind::UnboundName,
            "Could not find sub with that identifier",
        )
    }

    pub fn unknown_builtin(line: usize) -> Self {
        Self::new(
            line,
            ErrorKind::UnboundName,
            "Could not find builtin with that identifier",
        )
    }

    pub fn statement_argument(line: usize) -> Self {
        // The misspelling is part of the message contract
        Self::new(
            line,
            ErrorKind::NoValue,
            "Cannot have a statement as an arguement!",
        )
    }

    pub fn no_value(line: usize) -> Self {
        Self::new(line, ErrorKind::NoValue, "Expected a value, got none!")
    }

    pub fn string_right_operand(line: usize) -> Self {
        Self::new(
            line,
            ErrorKind::TypeMismatch,
            "Expected string for right operand as left is string.",
        )
    }

    pub fn number_right_operand(line: usize) -> Self {
        Self::new(
            line,
            ErrorKind::TypeMismatch,
            "Expected number for right operand as left is number.",
        )
    }

    pub fn unsupported_string_op(line: usize) -> Self {
        Self::new(
            line,
            ErrorKind::TypeMismatch,
            "Unsupported operator between strings!",
        )
    }

    pub fn unsupported_number_op(line: usize) -> Self {
        Self::new(
            line,
            ErrorKind::TypeMismatch,
            "Unsupported operator between numbers!",
        )
    }

    pub fn unrecognised_binary_op(line: usize) -> Self {
        Self::new(line, ErrorKind::TypeMismatch, "Unrecognised binary operator!")
    }

    pub fn unary_number(line: usize) -> Self {
        Self::new(
            line,
            ErrorKind::TypeMismatch,
            "Unary operators only support numbers!",
        )
    }

    pub fn for_initialiser(line: usize) -> Self {
        Self::new(
            line,
            ErrorKind::TypeMismatch,
            "For initialiser must be a number!",
        )
    }

    pub fn for_maximum(line: usize) -> Self {
        Self::new(line, ErrorKind::TypeMismatch, "For maximum must be a number!")
    }

    pub fn for_step(line: usize) -> Self {
        Self::new(line, ErrorKind::TypeMismatch, "For step must be a number!")
    }

    pub fn index_assign_bounds(line: usize) -> Self {
        Self::new(
            line,
            ErrorKind::BoundsViolation,
            "Cannot index outside bounds of list, use append instead!",
        )
    }

    pub fn index_read_bounds(line: usize) -> Self {
        Self::new(
            line,
            ErrorKind::BoundsViolation,
            "Cannot index outside bounds of list!",
        )
    }

    pub fn missing_key(line: usize) -> Self {
        Self::new(line, ErrorKind::UnboundName, "Could not find key in map!")
    }

    pub fn index_not_number(line: usize) -> Self {
        Self::new(line, ErrorKind::TypeMismatch, "List index must be a number!")
    }

    pub fn not_indexable(line: usize) -> Self {
        Self::new(line, ErrorKind::TypeMismatch, "Can only index lists and maps!")
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR AT LINE {}: {}", self.line, self.message)
    }
}

impl std::error::Error for RuntimeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let err = RuntimeError::unrecognised_variable(7);
        assert_eq!(format!("{err}"), "ERROR AT LINE 7: Unrecognised variable!");
    }

    #[test]
    fn test_unrecognised_variable() {
        let err = RuntimeError::unrecognised_variable(1);
        assert_eq!(err.kind, ErrorKind::UnboundName);
        assert_eq!(err.message, "Unrecognised variable!");
    }

    #[test]
    fn test_unknown_sub_message() {
        let err = RuntimeError::unknown_sub(2);
        assert_eq!(err.message, "Could not find sub with that identifier");
    }

    #[test]
    fn test_unknown_builtin_message() {
        let err = RuntimeError::unknown_builtin(2);
        assert_eq!(err.message, "Could not find builtin with that identifier");
    }

    #[test]
    fn test_statement_argument_message() {
        let err = RuntimeError::statement_argument(3);
        assert_eq!(err.message, "Cannot have a statement as an arguement!");
    }

    #[test]
    fn test_bounds_messages() {
        assert_eq!(
            RuntimeError::index_assign_bounds(1).message,
            "Cannot index outside bounds of list, use append instead!"
        );
        assert_eq!(
            RuntimeError::index_read_bounds(1).message,
            "Cannot index outside bounds of list!"
        );
    }

    #[test]
    fn test_for_loop_messages() {
        assert_eq!(
            RuntimeError::for_initialiser(1).message,
            "For initialiser must be a number!"
        );
        assert_eq!(
            RuntimeError::for_maximum(1).message,
            "For maximum must be a number!"
        );
        assert_eq!(RuntimeError::for_step(1).message, "For step must be a number!");
    }

    #[test]
    fn test_binary_op_messages() {
        assert_eq!(
            RuntimeError::unsupported_string_op(1).message,
            "Unsupported operator between strings!"
        );
        assert_eq!(
            RuntimeError::unsupported_number_op(1).message,
            "Unsupported operator between numbers!"
        );
        assert_eq!(
            RuntimeError::unrecognised_binary_op(1).message,
            "Unrecognised binary operator!"
        );
    }

    #[test]
    fn test_error_carries_line() {
        assert_eq!(RuntimeError::no_value(42).line, 42);
        assert_eq!(RuntimeError::missing_key(9).line, 9);
    }

    #[test]
    fn test_error_clone_eq() {
        let err = RuntimeError::unary_number(5);
        assert_eq!(err, err.clone());
    }

    #[test]
    fn test_error_is_std_error() {
        let err = RuntimeError::no_value(1);
        let _: &dyn std::error::Error = &err;
    }
}
