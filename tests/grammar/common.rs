//! Shared helpers for the grammar tests.

use briar::grammar::runtime::{InitContext, RuntimeExpr, SyntaxElement};

/// An element that accepts any inputs without looking at them.
#[derive(Debug)]
pub struct Sink;

impl SyntaxElement for Sink {
    fn init(
        &mut self,
        _inputs: Vec<RuntimeExpr>,
        _ctx: &InitContext<'_>,
    ) -> Result<(), String> {
        Ok(())
    }
}

/// Factory for [`Sink`] elements.
pub fn sink() -> Box<dyn SyntaxElement> {
    Box::new(Sink)
}
