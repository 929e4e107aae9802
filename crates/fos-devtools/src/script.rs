//! Script evaluation
//!
//! The console tab runs whatever the user types in the page's global scope.
//! There is no sandbox: an evaluator has the same reach as page script.

use crate::console::ConsoleValue;

/// An exception thrown by evaluated script
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{name}: {message}")]
pub struct ScriptError {
    pub name: String,
    pub message: String,
}

impl ScriptError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), message: message.into() }
    }

    /// The payload handed to the uncaught-error listener
    pub fn to_console_value(&self) -> ConsoleValue {
        ConsoleValue::error(self.name.clone(), self.message.clone())
    }
}

/// Unsandboxed global-scope evaluator.
///
/// Implementations run untrusted text with full page privileges. Only hand
/// one to an overlay the user explicitly opened.
pub trait ScriptEvaluator {
    fn evaluate(&self, source: &str) -> Result<ConsoleValue, ScriptError>;
}

/// Evaluator that refuses everything
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEvaluator;

impl ScriptEvaluator for DisabledEvaluator {
    fn evaluate(&self, _source: &str) -> Result<ConsoleValue, ScriptError> {
        Err(ScriptError::new("EvalError", "script evaluation is disabled"))
    }
}

#[cfg(feature = "quickjs")]
pub use quickjs::QuickJsEvaluator;

#[cfg(feature = "quickjs")]
mod quickjs {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rquickjs::function::Rest;
    use rquickjs::object::Accessor;
    use rquickjs::{Context, Ctx, Function, Object, Runtime, Value};

    use super::{ScriptError, ScriptEvaluator};
    use crate::console::{ConsoleValue, LogInterceptor, LogLevel};
    use crate::storage::Storage;
    use crate::DevToolsError;

    /// Nesting depth kept when converting objects for the log
    const MAX_DEPTH: usize = 3;

    /// QuickJS context whose `console` feeds the log interceptor
    pub struct QuickJsEvaluator {
        _runtime: Runtime,
        context: Context,
    }

    impl QuickJsEvaluator {
        pub fn new(console: LogInterceptor) -> Result<Self, DevToolsError> {
            let runtime = Runtime::new().map_err(|e| DevToolsError::ScriptEngine(e.to_string()))?;
            runtime.set_memory_limit(32 * 1024 * 1024);
            let context = Context::full(&runtime).map_err(|e| DevToolsError::ScriptEngine(e.to_string()))?;

            context
                .with(|ctx| install_console(&ctx, console))
                .map_err(|e| DevToolsError::ScriptEngine(e.to_string()))?;

            Ok(Self { _runtime: runtime, context })
        }

        /// Expose the page's storage areas as `localStorage` / `sessionStorage`
        pub fn with_storage(
            self,
            local: Rc<RefCell<Storage>>,
            session: Rc<RefCell<Storage>>,
        ) -> Result<Self, DevToolsError> {
            self.context
                .with(|ctx| {
                    let globals = ctx.globals();
                    globals.set("localStorage", storage_object(&ctx, local)?)?;
                    globals.set("sessionStorage", storage_object(&ctx, session)?)?;
                    Ok::<_, rquickjs::Error>(())
                })
                .map_err(|e| DevToolsError::ScriptEngine(e.to_string()))?;
            Ok(self)
        }
    }

    impl ScriptEvaluator for QuickJsEvaluator {
        fn evaluate(&self, source: &str) -> Result<ConsoleValue, ScriptError> {
            self.context.with(|ctx| match ctx.eval::<Value, _>(source) {
                Ok(value) => Ok(to_console_value(&value, 0)),
                Err(rquickjs::Error::Exception) => Err(thrown_error(&ctx.catch())),
                Err(e) => Err(ScriptError::new("InternalError", e.to_string())),
            })
        }
    }

    fn install_console(ctx: &Ctx, console: LogInterceptor) -> Result<(), rquickjs::Error> {
        let object = Object::new(ctx.clone())?;

        for (name, level) in [
            ("log", LogLevel::Info),
            ("info", LogLevel::Info),
            ("warn", LogLevel::Warn),
            ("error", LogLevel::Error),
        ] {
            let console = console.clone();
            object.set(name, Function::new(ctx.clone(), move |_ctx: Ctx, args: Rest<Value>| {
                console.call(level, payload(&args.0));
                Ok::<(), rquickjs::Error>(())
            })?)?;
        }

        ctx.globals().set("console", object)
    }

    fn storage_object<'js>(ctx: &Ctx<'js>, storage: Rc<RefCell<Storage>>) -> Result<Object<'js>, rquickjs::Error> {
        let obj = Object::new(ctx.clone())?;

        let s = Rc::clone(&storage);
        obj.set("getItem", Function::new(ctx.clone(), move |key: String| -> Option<String> {
            s.borrow().get_item(&key).map(|v| v.to_string())
        })?)?;

        let s = Rc::clone(&storage);
        obj.set("setItem", Function::new(ctx.clone(), move |key: String, value: String| {
            s.borrow_mut().set_item(&key, &value);
        })?)?;

        let s = Rc::clone(&storage);
        obj.set("removeItem", Function::new(ctx.clone(), move |key: String| {
            s.borrow_mut().remove_item(&key);
        })?)?;

        let s = Rc::clone(&storage);
        obj.set("clear", Function::new(ctx.clone(), move || {
            s.borrow_mut().clear();
        })?)?;

        let s = Rc::clone(&storage);
        obj.set("key", Function::new(ctx.clone(), move |index: i32| -> Option<String> {
            usize::try_from(index).ok()
                .and_then(|i| s.borrow().key(i).map(|k| k.to_string()))
        })?)?;

        // `length` is a live getter; rquickjs widens a usize past i32 to a float
        let s = storage;
        obj.prop("length", Accessor::new_get(move || -> usize { s.borrow().length() }))?;

        Ok(obj)
    }

    /// Several arguments log as one space-joined line
    fn payload(args: &[Value]) -> ConsoleValue {
        match args {
            [] => ConsoleValue::Undefined,
            [single] => to_console_value(single, 0),
            many => ConsoleValue::String(
                many.iter()
                    .map(|v| to_console_value(v, 0).to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        }
    }

    fn thrown_error(value: &Value) -> ScriptError {
        match value.as_exception() {
            Some(exc) => ScriptError::new(
                exc.get::<_, String>("name").unwrap_or_else(|_| "Error".to_string()),
                exc.message().unwrap_or_default(),
            ),
            None => ScriptError::new("Uncaught", to_console_value(value, 0).to_string()),
        }
    }

    fn to_console_value(value: &Value, depth: usize) -> ConsoleValue {
        if value.is_undefined() {
            ConsoleValue::Undefined
        } else if value.is_null() {
            ConsoleValue::Null
        } else if let Some(b) = value.as_bool() {
            ConsoleValue::Boolean(b)
        } else if let Some(n) = value.as_int() {
            ConsoleValue::Number(n as f64)
        } else if let Some(n) = value.as_float() {
            ConsoleValue::Number(n)
        } else if let Some(s) = value.as_string() {
            ConsoleValue::String(s.to_string().unwrap_or_default())
        } else if let Some(exc) = value.as_exception() {
            ConsoleValue::error(
                exc.get::<_, String>("name").unwrap_or_else(|_| "Error".to_string()),
                exc.message().unwrap_or_default(),
            )
        } else if value.is_function() {
            let name = value.as_object()
                .and_then(|o| o.get::<_, String>("name").ok())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "anonymous".to_string());
            ConsoleValue::Function(name)
        } else if let Some(array) = value.as_array() {
            if depth >= MAX_DEPTH {
                return ConsoleValue::String("[Array]".into());
            }
            ConsoleValue::Array(
                array.iter::<Value>()
                    .filter_map(|v| v.ok())
                    .map(|v| to_console_value(&v, depth + 1))
                    .collect(),
            )
        } else if let Some(object) = value.as_object() {
            if depth >= MAX_DEPTH {
                return ConsoleValue::String("[Object]".into());
            }
            ConsoleValue::Object(
                object.props::<String, Value>()
                    .filter_map(|p| p.ok())
                    .map(|(k, v)| (k, to_console_value(&v, depth + 1)))
                    .collect(),
            )
        } else {
            ConsoleValue::String("[unknown]".into())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::clock::ManualClock;

        fn evaluator() -> (QuickJsEvaluator, LogInterceptor) {
            let console = LogInterceptor::new(
                Rc::new(|_: LogLevel, _: &ConsoleValue| {}),
                Rc::new(ManualClock::new(0.0)),
            );
            (QuickJsEvaluator::new(console.clone()).unwrap(), console)
        }

        #[test]
        fn test_eval_simple() {
            let (js, _) = evaluator();
            assert_eq!(js.evaluate("1 + 1").unwrap(), ConsoleValue::Number(2.0));
            assert_eq!(js.evaluate("'a' + 'b'").unwrap(), ConsoleValue::from("ab"));
            assert_eq!(js.evaluate("void 0").unwrap(), ConsoleValue::Undefined);
        }

        #[test]
        fn test_console_routes_to_interceptor() {
            let (js, console) = evaluator();
            js.evaluate("console.log('hi'); console.warn('careful', 2)").unwrap();

            let entries = console.book().entries();
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].payload, ConsoleValue::from("hi"));
            assert_eq!(entries[1].level, LogLevel::Warn);
            assert_eq!(entries[1].payload, ConsoleValue::from("careful 2"));
        }

        #[test]
        fn test_thrown_error() {
            let (js, _) = evaluator();
            let err = js.evaluate("throw new TypeError('bad')").unwrap_err();
            assert_eq!(err.name, "TypeError");
            assert_eq!(err.message, "bad");
        }

        #[test]
        fn test_syntax_error() {
            let (js, _) = evaluator();
            let err = js.evaluate("let = ;").unwrap_err();
            assert_eq!(err.name, "SyntaxError");
        }

        #[test]
        fn test_object_conversion() {
            let (js, _) = evaluator();
            let value = js.evaluate("({a: 1, b: [true, null]})").unwrap();
            assert_eq!(value.get("a"), Some(&ConsoleValue::Number(1.0)));
            assert_eq!(
                value.get("b"),
                Some(&ConsoleValue::Array(vec![ConsoleValue::Boolean(true), ConsoleValue::Null]))
            );
        }

        #[test]
        fn test_storage_bindings() {
            let local = Rc::new(RefCell::new(Storage::new()));
            let session = Rc::new(RefCell::new(Storage::new()));
            let (js, _) = evaluator();
            let js = js.with_storage(Rc::clone(&local), session).unwrap();

            js.evaluate("localStorage.setItem('k', 'v')").unwrap();
            assert_eq!(local.borrow().get_item("k"), Some("v"));
            assert_eq!(js.evaluate("localStorage.getItem('k')").unwrap(), ConsoleValue::from("v"));
            assert_eq!(
                js.evaluate("localStorage.getItem('missing') == null").unwrap(),
                ConsoleValue::Boolean(true)
            );
        }

        #[test]
        fn test_storage_length_is_a_property() {
            let local = Rc::new(RefCell::new(Storage::new()));
            let session = Rc::new(RefCell::new(Storage::new()));
            let (js, _) = evaluator();
            let js = js.with_storage(Rc::clone(&local), session).unwrap();

            assert_eq!(js.evaluate("localStorage.length").unwrap(), ConsoleValue::Number(0.0));
            local.borrow_mut().set_item("a", "1");
            js.evaluate("localStorage.setItem('b', '2')").unwrap();
            assert_eq!(js.evaluate("localStorage.length").unwrap(), ConsoleValue::Number(2.0));
            assert_eq!(js.evaluate("sessionStorage.length").unwrap(), ConsoleValue::Number(0.0));
            assert_eq!(js.evaluate("localStorage.key(1)").unwrap(), ConsoleValue::from("b"));
        }
    }
}
