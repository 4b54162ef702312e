//! Edge case tests for fos-js
//!
//! Script behavior the navigator depends on: guarded re-execution,
//! error isolation and shared global state.

use fos_js::*;

// ============================================================================
// RUNTIME EDGE CASES
// ============================================================================

#[test]
fn test_empty_code() {
    assert!(eval("").is_ok());
    assert!(eval("   \n\t  ").is_ok());
    assert!(eval("// just a comment").is_ok());
}

#[test]
fn test_unicode_strings() {
    let result = eval("'héllo ✓'").unwrap();
    assert_eq!(result, JsValue::String("héllo ✓".into()));
}

#[test]
fn test_syntax_error_is_reported() {
    let ctx = JsContext::new().unwrap();
    assert!(ctx.exec("function (").is_err());
    // Context survives the failed script
    assert_eq!(ctx.eval("1 + 2").unwrap(), JsValue::Number(3.0));
}

#[test]
fn test_thrown_string() {
    let ctx = JsContext::new().unwrap();
    match ctx.exec("throw 'plain'") {
        Err(JsError::Exception(msg)) => assert_eq!(msg, "plain"),
        other => panic!("unexpected {other:?}"),
    }
}

// ============================================================================
// GUARDED EXECUTION
// ============================================================================

#[test]
fn test_guarded_wrapper_runs_once() {
    let ctx = JsContext::new().unwrap();
    ctx.exec("var runs = 0;").unwrap();

    let wrapped = r#"(function() { if (window["script_0"]) return; window["script_0"] = true; runs += 1; })();"#;
    ctx.exec(wrapped).unwrap();
    ctx.exec(wrapped).unwrap();

    assert_eq!(ctx.global("runs"), JsValue::Number(1.0));
    assert_eq!(ctx.global("script_0"), JsValue::Bool(true));
}

#[test]
fn test_guard_ids_are_independent() {
    let ctx = JsContext::new().unwrap();
    ctx.exec("var seen = [];").unwrap();
    for id in ["script_0", "script_1", "script_0"] {
        let code = format!(
            "(function() {{ if (window[\"{id}\"]) return; window[\"{id}\"] = true; seen.push(\"{id}\"); }})();"
        );
        ctx.exec(&code).unwrap();
    }
    assert_eq!(ctx.eval("seen.join(',')").unwrap(), JsValue::String("script_0,script_1".into()));
}

// ============================================================================
// LIMITS
// ============================================================================

#[test]
fn test_memory_limit_enforced() {
    let ctx = JsContext::with_memory_limit(2 * 1024 * 1024).unwrap();
    let result = ctx.exec("var a = []; while (true) { a.push(new Array(10000).fill(1)); }");
    assert!(result.is_err());
}
