//! Integration tests for the SB interpreter
//!
//! Drives the full pipeline: tokenize -> parse -> run, asserting on the
//! program's printed output and on the reported error line.

use sb::debug::write_symbol_table;
use sb::interp::{Interpreter, RuntimeError};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Write sink that can be read back after the interpreter is done
#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run a program the way the CLI does: printed output, then the error
/// line (if any) as the last line
fn run_program(source: &str) -> (String, Result<(), RuntimeError>) {
    let tokens = sb::lexer::tokenize(source).expect("tokenize failed");
    let ast = sb::parser::parse(source, tokens).expect("parse failed");
    let buf = SharedBuf::default();
    let mut interp = Interpreter::with_output(Box::new(buf.clone()));
    let result = interp.run(&ast);
    let mut out = buf.contents();
    if let Err(e) = &result {
        out.push_str(&format!("{e}\n"));
    }
    (out, result)
}

fn run_ok(source: &str) -> String {
    let (out, result) = run_program(source);
    assert!(result.is_ok(), "unexpected error: {result:?}");
    out
}

#[test]
fn test_hello_world() {
    assert_eq!(run_ok("Print \"Hello, World!\""), "Hello, World!\n");
}

#[test]
fn test_countdown_program() {
    let src = "x = 3\n\
               While x > 0\n\
               Print x\n\
               x = x - 1\n\
               End\n\
               Print \"liftoff\"";
    insta::assert_snapshot!(run_ok(src).trim_end(), @r"
    3
    2
    1
    liftoff
    ");
}

#[test]
fn test_for_loop_accumulator() {
    let src = "total = 0\n\
               For i = 1 To 6\n\
               total = total + i\n\
               End\n\
               Print total";
    assert_eq!(run_ok(src), "15\n");
}

#[test]
fn test_for_step_two() {
    let src = "For i = 0 To 5 Step 2\nPrint i\nEnd";
    assert_eq!(run_ok(src), "0\n2\n4\n");
}

#[test]
fn test_sub_registration_and_redefinition() {
    let src = "Sub greet\n\
               Print \"old\"\n\
               End\n\
               Call greet\n\
               Sub greet\n\
               Print \"new\"\n\
               End\n\
               Call greet";
    assert_eq!(run_ok(src), "old\nnew\n");
}

#[test]
fn test_subs_mutate_shared_state() {
    let src = "count = 0\n\
               Sub tick\n\
               count = count + 1\n\
               End\n\
               For i = 0 To 4\n\
               Call tick\n\
               End\n\
               Print count";
    assert_eq!(run_ok(src), "4\n");
}

#[test]
fn test_list_workflow() {
    let src = "xs = [1, 2, 3]\n\
               xs[0] = 10\n\
               xs = append(xs, 4)\n\
               Print xs\n\
               Print len(xs)";
    assert_eq!(run_ok(src), "[10, 2, 3, 4]\n4\n");
}

#[test]
fn test_map_iteration_order_is_hash_order() {
    // fnv1a("three") < fnv1a("one") < fnv1a("two")
    let src = "m = {\"one\": 1, \"two\": 2, \"three\": 3}\nPrint m";
    assert_eq!(run_ok(src), "{three: 3, one: 1, two: 2}\n");
}

#[test]
fn test_map_update_and_read() {
    let src = "ages = {\"ada\": 36}\n\
               ages[\"alan\"] = 41\n\
               ages[\"ada\"] = 37\n\
               Print ages[\"ada\"]\n\
               Print ages[\"alan\"]";
    assert_eq!(run_ok(src), "37\n41\n");
}

#[test]
fn test_error_line_is_last_output() {
    let src = "Print \"one\"\nPrint missing\nPrint \"never\"";
    let (out, result) = run_program(src);
    assert!(result.is_err());
    assert_eq!(out, "one\nERROR AT LINE 2: Unrecognised variable!\n");
}

#[test]
fn test_error_inside_loop_reports_loop_line() {
    let src = "For i = 0 To 3\nPrint nothere\nEnd";
    let (out, result) = run_program(src);
    assert!(result.is_err());
    assert_eq!(out, "ERROR AT LINE 2: Unrecognised variable!\n");
}

#[test]
fn test_list_bounds_error_message() {
    let src = "xs = [1, 2, 3]\nxs[3] = 4";
    let (out, _) = run_program(src);
    assert_eq!(
        out,
        "ERROR AT LINE 2: Cannot index outside bounds of list, use append instead!\n"
    );
}

#[test]
fn test_call_before_definition_errors() {
    let src = "Call greet\nSub greet\nPrint \"hi\"\nEnd";
    let (out, _) = run_program(src);
    assert_eq!(
        out,
        "ERROR AT LINE 1: Could not find sub with that identifier\n"
    );
}

#[test]
fn test_builtin_errors_carry_call_line() {
    let src = "x = 4\nPrint sqrt(x)\nPrint sqrt(\"x\")";
    let (out, result) = run_program(src);
    assert!(result.is_err());
    assert_eq!(
        out,
        "2\nERROR AT LINE 3: Expected a number value when calling sqrt!\n"
    );
}

#[test]
fn test_symbol_table_dump_after_run() {
    let src = "x = 1\nname = \"ada\"\nflag = True\nxs = [1, 2]";
    let tokens = sb::lexer::tokenize(src).unwrap();
    let ast = sb::parser::parse(src, tokens).unwrap();
    let mut interp = Interpreter::with_output(Box::new(SharedBuf::default()));
    interp.run(&ast).unwrap();

    let mut dump = Vec::new();
    write_symbol_table(&mut dump, interp.env());
    insta::assert_snapshot!(String::from_utf8(dump).unwrap().trim_end(), @r"
    -- Symbol Table Start --
    flag: True
    name: ada
    x: 1
    xs: [1, 2]
    -- Symbol Table End --
    ");
}

#[test]
fn test_nested_control_flow() {
    let src = "For i = 1 To 4\n\
               If i == 2 Then\n\
               Print \"two\"\n\
               Else\n\
               Print i\n\
               End\n\
               End";
    assert_eq!(run_ok(src), "1\ntwo\n3\n");
}

#[test]
fn test_comments_are_ignored() {
    let src = "# header comment\nx = 1 # trailing comment\nPrint x";
    assert_eq!(run_ok(src), "1\n");
}

#[test]
fn test_string_equality_and_concat() {
    let src = "a = \"foo\"\nb = a + \"bar\"\nPrint b == \"foobar\"";
    assert_eq!(run_ok(src), "True\n");
}

#[test]
fn test_parse_error_reports_message() {
    let source = "If x Then\nPrint 1";
    let tokens = sb::lexer::tokenize(source).unwrap();
    let err = sb::parser::parse(source, tokens).unwrap_err();
    assert!(err.message().contains("expected End"));
}

#[test]
fn test_lexer_error_position() {
    let err = sb::lexer::tokenize("x = $").unwrap_err();
    assert_eq!(err.span().start, 4);
}
