//! Value conversion between QuickJS and Rust

use rquickjs::{Ctx, Value};

use crate::JsError;

/// JavaScript value
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object,
    Array,
    Function,
}

impl JsValue {
    /// JavaScript truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            JsValue::Undefined | JsValue::Null => false,
            JsValue::Bool(b) => *b,
            JsValue::Number(n) => *n != 0.0 && !n.is_nan(),
            JsValue::String(s) => !s.is_empty(),
            JsValue::Object | JsValue::Array | JsValue::Function => true,
        }
    }
}

pub(crate) fn convert_value(value: &Value) -> JsValue {
    if value.is_undefined() {
        JsValue::Undefined
    } else if value.is_null() {
        JsValue::Null
    } else if let Some(b) = value.as_bool() {
        JsValue::Bool(b)
    } else if let Some(n) = value.as_int() {
        JsValue::Number(n as f64)
    } else if let Some(n) = value.as_float() {
        JsValue::Number(n)
    } else if let Some(s) = value.as_string() {
        JsValue::String(s.to_string().unwrap_or_default())
    } else if value.is_array() {
        JsValue::Array
    } else if value.is_function() {
        JsValue::Function
    } else {
        JsValue::Object
    }
}

/// Turn an rquickjs error into a `JsError`, pulling the pending exception
pub(crate) fn describe_error(ctx: &Ctx, err: rquickjs::Error) -> JsError {
    if !err.is_exception() {
        return JsError::Runtime(err.to_string());
    }

    let thrown = ctx.catch();
    let message = match thrown.as_exception() {
        Some(exception) => exception.message().unwrap_or_else(|| "unknown error".to_string()),
        None => match convert_value(&thrown) {
            JsValue::String(s) => s,
            other => format!("{:?}", other),
        },
    };
    JsError::Exception(message)
}
