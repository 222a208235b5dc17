//! Expression gate deciding whether a section is included.

use buildcfg_expr::{Bindings, Interpreter};

use crate::error::BoxError;

/// Judges header expressions.
///
/// Implemented by the bundled [`Interpreter`] and by any closure
/// `Fn(&str, &Bindings) -> Result<bool, E>`, so callers can plug in their
/// own engine.
pub trait Evaluator {
    fn evaluate(&self, expression: &str, globals: &Bindings) -> Result<bool, BoxError>;
}

impl Evaluator for Interpreter {
    fn evaluate(&self, expression: &str, globals: &Bindings) -> Result<bool, BoxError> {
        Ok(self.is_true(expression, globals)?)
    }
}

impl<F, E> Evaluator for F
where
    F: Fn(&str, &Bindings) -> Result<bool, E>,
    E: Into<BoxError>,
{
    fn evaluate(&self, expression: &str, globals: &Bindings) -> Result<bool, BoxError> {
        self(expression, globals).map_err(Into::into)
    }
}

/// Zero-argument provider of extra expression bindings.
pub type GlobalsProvider = dyn Fn() -> Bindings + Send + Sync;

/// Per-parse gate state. The globals provider runs at most once, on the
/// first header that carries an expression.
pub(crate) struct Gate<'a> {
    evaluator: &'a dyn Evaluator,
    provider: Option<&'a GlobalsProvider>,
    globals: Option<Bindings>,
}

impl<'a> Gate<'a> {
    pub(crate) fn new(evaluator: &'a dyn Evaluator, provider: Option<&'a GlobalsProvider>) -> Self {
        Self {
            evaluator,
            provider,
            globals: None,
        }
    }

    /// Whether a section with this header expression is included.
    pub(crate) fn admits(&mut self, expression: Option<&str>) -> Result<bool, BoxError> {
        let Some(expression) = expression else {
            return Ok(true);
        };
        let provider = self.provider;
        let globals = self.globals.get_or_insert_with(|| match provider {
            Some(provide) => {
                tracing::debug!("Loading expression globals");
                provide()
            }
            None => Bindings::new(),
        });
        self.evaluator.evaluate(expression, globals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildcfg_expr::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_no_expression_always_admits() {
        let interpreter = Interpreter::new();
        let mut gate = Gate::new(&interpreter, None);
        assert!(gate.admits(None).unwrap());
    }

    #[test]
    fn test_provider_called_once() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let provider = || {
            CALLS.fetch_add(1, Ordering::SeqCst);
            let mut globals = Bindings::new();
            globals.insert("x".to_string(), Value::Int(1));
            globals
        };
        let interpreter = Interpreter::new();
        let mut gate = Gate::new(&interpreter, Some(&provider));

        assert!(gate.admits(None).unwrap());
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
        assert!(gate.admits(Some("x == 1")).unwrap());
        assert!(!gate.admits(Some("x == 2")).unwrap());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closure_evaluator() {
        let evaluator = |expr: &str, _: &Bindings| -> Result<bool, std::io::Error> {
            Ok(expr == "yes")
        };
        let mut gate = Gate::new(&evaluator, None);
        assert!(gate.admits(Some("yes")).unwrap());
        assert!(!gate.admits(Some("no")).unwrap());
    }
}
