//! fOS JavaScript Runtime
//!
//! QuickJS-based script context used to run page scripts after navigation.
//!
//! Features:
//! - QuickJS runtime via rquickjs
//! - `window` aliased to the global object
//! - Console API (log, info, warn, error, debug) routed to tracing

mod runtime;
mod console;

pub use runtime::JsValue;

/// Default heap limit for a context
const DEFAULT_MEMORY_LIMIT: usize = 32 * 1024 * 1024;

/// Execute JavaScript code in a throwaway context
pub fn eval(code: &str) -> Result<JsValue, JsError> {
    JsContext::new()?.eval(code)
}

/// JavaScript error
#[derive(Debug, thiserror::Error)]
pub enum JsError {
    #[error("JavaScript error: {0}")]
    Runtime(String),

    #[error("Uncaught exception: {0}")]
    Exception(String),
}

/// JavaScript context with the page globals installed
pub struct JsContext {
    // Dropped after `context`
    _runtime: rquickjs::Runtime,
    context: rquickjs::Context,
}

impl JsContext {
    /// Create a new context with the default memory limit
    pub fn new() -> Result<Self, JsError> {
        Self::with_memory_limit(DEFAULT_MEMORY_LIMIT)
    }

    /// Create a new context with an explicit heap limit in bytes
    pub fn with_memory_limit(limit: usize) -> Result<Self, JsError> {
        let runtime = rquickjs::Runtime::new().map_err(|e| JsError::Runtime(e.to_string()))?;
        runtime.set_memory_limit(limit);

        let context = rquickjs::Context::full(&runtime).map_err(|e| JsError::Runtime(e.to_string()))?;

        context.with(|ctx| {
            let globals = ctx.globals();
            globals.set("window", globals.clone())?;
            console::install_console(&ctx)
        }).map_err(|e| JsError::Runtime(e.to_string()))?;

        tracing::debug!("Created JavaScript context ({} byte limit)", limit);
        Ok(Self { _runtime: runtime, context })
    }

    /// Evaluate JavaScript code
    pub fn eval(&self, code: &str) -> Result<JsValue, JsError> {
        self.context.with(|ctx| {
            match ctx.eval::<rquickjs::Value, _>(code) {
                Ok(result) => Ok(runtime::convert_value(&result)),
                Err(e) => Err(runtime::describe_error(&ctx, e)),
            }
        })
    }

    /// Execute JavaScript (ignore result)
    pub fn exec(&self, code: &str) -> Result<(), JsError> {
        self.eval(code).map(|_| ())
    }

    /// Read a global as a value
    pub fn global(&self, name: &str) -> JsValue {
        self.context.with(|ctx| {
            ctx.globals()
                .get::<_, rquickjs::Value>(name)
                .map(|v| runtime::convert_value(&v))
                .unwrap_or(JsValue::Undefined)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_simple() {
        let result = eval("1 + 1").unwrap();
        match result {
            JsValue::Number(n) => assert_eq!(n, 2.0),
            _ => panic!("Expected number"),
        }
    }

    #[test]
    fn test_window_is_global() {
        let ctx = JsContext::new().unwrap();
        ctx.exec("window.marker = 'set'").unwrap();
        assert_eq!(ctx.global("marker"), JsValue::String("set".into()));
        assert_eq!(ctx.eval("window === globalThis").unwrap(), JsValue::Bool(true));
    }

    #[test]
    fn test_context_keeps_state() {
        let ctx = JsContext::new().unwrap();
        ctx.exec("var count = 1;").unwrap();
        ctx.exec("count += 1;").unwrap();
        assert_eq!(ctx.eval("count").unwrap(), JsValue::Number(2.0));
    }

    #[test]
    fn test_exception_message() {
        let ctx = JsContext::new().unwrap();
        let err = ctx.exec("throw new Error('boom')").unwrap_err();
        match err {
            JsError::Exception(msg) => assert!(msg.contains("boom"), "got {msg}"),
            other => panic!("Expected exception, got {other:?}"),
        }
    }
}
