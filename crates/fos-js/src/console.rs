//! Console API
//!
//! console.log and friends forward to tracing under the `js` target.

use rquickjs::{Ctx, Function, Object, Value};
use std::fmt::Write;

use crate::runtime::{convert_value, JsValue};

#[derive(Clone, Copy)]
enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

const METHODS: &[(&str, Level)] = &[
    ("log", Level::Info),
    ("info", Level::Info),
    ("debug", Level::Debug),
    ("warn", Level::Warn),
    ("error", Level::Error),
];

/// Install console API into the global object
pub fn install_console(ctx: &Ctx) -> Result<(), rquickjs::Error> {
    let console = Object::new(ctx.clone())?;

    for &(name, level) in METHODS {
        console.set(name, Function::new(ctx.clone(), move |_ctx: Ctx, args: rquickjs::function::Rest<Value>| {
            emit(level, &format_args_list(&args.0));
            Ok::<(), rquickjs::Error>(())
        })?)?;
    }

    ctx.globals().set("console", console)?;
    Ok(())
}

fn emit(level: Level, line: &str) {
    match level {
        Level::Error => tracing::error!(target: "js", "{}", line),
        Level::Warn => tracing::warn!(target: "js", "{}", line),
        Level::Debug => tracing::debug!(target: "js", "{}", line),
        Level::Info => tracing::info!(target: "js", "{}", line),
    }
}

/// Join console arguments the way browsers print them
fn format_args_list(values: &[Value]) -> String {
    let mut output = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            output.push(' ');
        }
        match convert_value(value) {
            JsValue::Undefined => output.push_str("undefined"),
            JsValue::Null => output.push_str("null"),
            JsValue::Bool(b) => { write!(output, "{}", b).ok(); }
            JsValue::Number(n) => { write!(output, "{}", n).ok(); }
            JsValue::String(s) => output.push_str(&s),
            JsValue::Array => output.push_str("[Array]"),
            JsValue::Function => output.push_str("[Function]"),
            JsValue::Object => output.push_str("[Object]"),
        }
    }
    output
}
