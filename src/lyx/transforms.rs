//! Conversion pipelines
//!
//! A LyX conversion runs three steps, each consuming what the previous one built:
//!
//! ```text
//! Conversion ──Parsing──▶ Document ──Postprocessing──▶ Document ──HtmlRendering──▶ String
//! ```
//!
//! A step is anything implementing [`ConversionStep`]. [`Transform::start`] opens an
//! empty pipeline and [`Transform::then`] appends a step, so a pipeline that feeds a
//! parsed tree into a step expecting a source does not type check. The pipelines the
//! crate uses are prepared once in [`standard`]; most callers reach them through
//! [`DocumentLoader`](crate::lyx::loader::DocumentLoader).

pub mod stages;
pub mod standard;

use crate::lyx::ast::Container;
use crate::lyx::context::DocumentContext;
use thiserror::Error;

pub use stages::{HtmlRendering, Parsing, Postprocessing};

/// A conversion step that could not complete
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{step} failed: {message}")]
pub struct TransformError {
    pub step: &'static str,
    pub message: String,
}

impl TransformError {
    pub fn new(step: &'static str, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
        }
    }
}

/// A source waiting to be converted, with the context it will fill
#[derive(Debug)]
pub struct Conversion {
    pub source: String,
    pub context: DocumentContext,
}

impl Conversion {
    pub fn new(source: impl Into<String>, context: DocumentContext) -> Self {
        Self {
            source: source.into(),
            context,
        }
    }
}

/// A parsed document and everything learned while parsing it
#[derive(Debug)]
pub struct Document {
    pub root: Container,
    pub context: DocumentContext,
}

impl Document {
    pub fn diagnostics(&self) -> &crate::lyx::diagnostics::Diagnostics {
        &self.context.diagnostics
    }
}

/// One step of a conversion
pub trait ConversionStep<I, O>: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    fn apply(&self, input: I) -> Result<O, TransformError>;
}

type StepFn<I, O> = dyn Fn(I) -> Result<O, TransformError> + Send + Sync;

/// A chain of steps from `I` to `O`
pub struct Transform<I, O> {
    steps: Vec<&'static str>,
    run_fn: Box<StepFn<I, O>>,
}

impl<I: 'static> Transform<I, I> {
    /// A pipeline with no steps yet
    pub fn start() -> Self {
        Self {
            steps: Vec::new(),
            run_fn: Box::new(Ok::<I, TransformError>),
        }
    }
}

impl<I: 'static, O: 'static> Transform<I, O> {
    /// Append a step
    pub fn then<O2: 'static>(self, step: impl ConversionStep<O, O2> + 'static) -> Transform<I, O2> {
        let mut steps = self.steps;
        steps.push(step.name());
        let previous = self.run_fn;
        Transform {
            steps,
            run_fn: Box::new(move |input| {
                let intermediate = previous(input)?;
                log::debug!("running {}", step.name());
                step.apply(intermediate)
            }),
        }
    }

    /// Names of the steps, in order
    pub fn steps(&self) -> &[&'static str] {
        &self.steps
    }

    pub fn run(&self, input: I) -> Result<O, TransformError> {
        (self.run_fn)(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Count;

    impl ConversionStep<&'static str, usize> for Count {
        fn name(&self) -> &'static str {
            "count"
        }

        fn apply(&self, input: &'static str) -> Result<usize, TransformError> {
            Ok(input.lines().count())
        }
    }

    struct RejectEmpty;

    impl ConversionStep<usize, usize> for RejectEmpty {
        fn name(&self) -> &'static str {
            "reject-empty"
        }

        fn apply(&self, input: usize) -> Result<usize, TransformError> {
            if input == 0 {
                Err(TransformError::new(self.name(), "no lines"))
            } else {
                Ok(input)
            }
        }
    }

    #[test]
    fn test_steps_change_the_value_type() {
        let transform = Transform::start().then(Count).then(RejectEmpty);
        assert_eq!(transform.run("\\begin_body\n\\end_body"), Ok(2));
        assert_eq!(transform.steps(), &["count", "reject-empty"]);
    }

    #[test]
    fn test_failing_step_stops_the_pipeline() {
        let transform = Transform::start().then(Count).then(RejectEmpty);
        let err = transform.run("").unwrap_err();
        assert_eq!(err, TransformError::new("reject-empty", "no lines"));
        assert_eq!(err.to_string(), "reject-empty failed: no lines");
    }
}
