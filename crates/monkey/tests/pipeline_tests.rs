//! End-to-end pipeline tests: source → lex → parse → evaluate.
//!
//! Also covers the persistent session environment, error reporting for
//! hosts, and the AST JSON dump.

use monkey::{dump_ast, run, EvalConfig, EvalError, Session, SessionError, Value};
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════════════════════════
// Sample programs
// ══════════════════════════════════════════════════════════════════════════════

const FIBONACCI: &str = r#"
let fibonacci = fn(x) {
  if (x == 0) {
    0
  } else {
    if (x == 1) {
      return 1;
    } else {
      fibonacci(x - 1) + fibonacci(x - 2);
    }
  }
};
fibonacci(20);
"#;

const REDUCE: &str = r#"
let reduce = fn(arr, initial, f) {
  let iter = fn(arr, result) {
    if (len(arr) == 0) {
      result
    } else {
      iter(rest(arr), f(result, first(arr)));
    }
  };
  iter(arr, initial);
};
let sum = fn(arr) { reduce(arr, 0, fn(initial, el) { initial + el }) };
sum([1, 2, 3, 4, 5]);
"#;

const BOOK: &str = r#"
let book = {"title": "Writing An Interpreter", "pages": 200};
let describe = fn(b) { b["title"] + ": " + "pages" };
[describe(book), book["pages"] / 2, len(book["title"])]
"#;

// ══════════════════════════════════════════════════════════════════════════════
// Full pipeline
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_sample_programs() {
    assert_eq!(run(FIBONACCI).unwrap(), Value::Integer(6765));
    assert_eq!(run(REDUCE).unwrap(), Value::Integer(15));
    assert_eq!(
        run(BOOK).unwrap().to_string(),
        "[Writing An Interpreter: pages, 100, 22]"
    );
}

#[test]
fn test_quote_through_pipeline() {
    let value = run("quote(unquote(4 + 4) + 8)").unwrap();
    let Value::Quote(node) = value else {
        panic!("expected quote, got {value:?}");
    };
    assert_eq!(node.to_string(), "(8 + 8)");
}

// ══════════════════════════════════════════════════════════════════════════════
// Session
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_session_keeps_bindings_between_inputs() {
    let mut session = Session::new();
    assert_eq!(session.eval("let a = 5;").unwrap(), Value::Integer(5));
    assert_eq!(
        session.eval("let addA = fn(x) { x + a };").unwrap().to_string(),
        "fn(x) { (x + a) }"
    );
    assert_eq!(session.eval("addA(10)").unwrap(), Value::Integer(15));
    assert_eq!(session.environment().names(), vec!["a", "addA"]);
}

#[test]
fn test_session_survives_errors() {
    let mut session = Session::new();
    session.eval("let x = 1;").unwrap();
    assert!(session.eval("x + true").is_err());
    assert!(session.eval("let = 2;").is_err());
    assert_eq!(session.eval("x").unwrap(), Value::Integer(1));
}

#[test]
fn test_syntax_errors_prevent_evaluation() {
    let mut session = Session::new();
    let err = session.eval("let x = 1; let y 2;").unwrap_err();
    assert!(matches!(err, SessionError::Parse(_)));
    assert_eq!(session.environment().get("x"), None);
}

#[test]
fn test_session_with_config() {
    let mut session = Session::with_config(EvalConfig::default().with_max_call_depth(10));
    session.eval("let down = fn(n) { if (n == 0) { 0 } else { down(n - 1) } };").unwrap();
    assert_eq!(session.eval("down(9)").unwrap(), Value::Integer(0));
    let err = session.eval("down(10)").unwrap_err();
    assert!(matches!(err, SessionError::Eval(EvalError::CallDepthExceeded(10))));
}

// ══════════════════════════════════════════════════════════════════════════════
// Error reporting
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_parse_error_rendering() {
    let err = run("let x 5; let = 10;").unwrap_err();
    assert_eq!(
        err.to_string(),
        "parser errors:\n\
         \texpected next token to be =, got INT instead\n\
         \texpected next token to be IDENT, got = instead\n\
         \tno prefix parse function for = found"
    );
    assert_eq!(err.diagnostics().map(|d| d.len()), Some(3));
}

#[test]
fn test_eval_error_rendering() {
    let err = run("[1, 2] + 3").unwrap_err();
    assert_eq!(err.to_string(), "invalid operation: ARRAY + INTEGER");
    assert!(err.diagnostics().is_none());
    assert_eq!(run("x").unwrap_err().to_string(), "undefined name x");
}

// ══════════════════════════════════════════════════════════════════════════════
// AST dump
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_dump_ast() {
    let json = dump_ast("if (x) { 1 }").unwrap();
    let expr = &json["statements"][0];
    assert_eq!(expr["node"], "expression");
    assert_eq!(expr["value"]["node"], "if");
    assert_eq!(
        expr["value"]["value"]["condition"],
        serde_json::json!({ "node": "identifier", "value": "x" })
    );
}

#[test]
fn test_dump_ast_rejects_invalid_source() {
    assert!(matches!(dump_ast("fn(1) {}"), Err(SessionError::Parse(_))));
}

// ══════════════════════════════════════════════════════════════════════════════
// 100-iteration determinism test
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_pipeline_determinism_100_iterations() {
    let first = run(REDUCE).unwrap();
    for i in 0..100 {
        assert_eq!(run(REDUCE).unwrap(), first, "Determinism failure at iteration {i}");
    }
}
