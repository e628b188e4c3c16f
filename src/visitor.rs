//! Markup discovery over the oxc tree.
//!
//! [`MarkupRewriter`] walks any subtree, stops at each outermost JSX element or fragment,
//! generates code for it immediately and records a `(start, end, code)` replacement.
//! Nested markup is left to the generators, so nothing is visited twice.

use oxc_ast::ast::{JSXElement, JSXFragment};
use oxc_ast_visit::Visit;

use crate::codegen::Emitter;
use crate::error::GenerateError;

pub type Replacement = (u32, u32, String);

pub struct MarkupRewriter<'e, 's, 'a> {
    emitter: &'e mut Emitter<'s, 'a>,
    pub replacements: Vec<Replacement>,
    pub error: Option<GenerateError>,
}

impl<'e, 's, 'a> MarkupRewriter<'e, 's, 'a> {
    pub fn new(emitter: &'e mut Emitter<'s, 'a>) -> Self {
        MarkupRewriter {
            emitter,
            replacements: Vec::new(),
            error: None,
        }
    }

    pub fn finish(self) -> Result<Vec<Replacement>, GenerateError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.replacements),
        }
    }

    fn record(&mut self, start: u32, end: u32, generated: Result<String, GenerateError>) {
        match generated {
            Ok(code) => {
                tracing::trace!(start, end, "rewrote markup");
                self.replacements.push((start, end, code));
            }
            Err(err) => self.error = Some(err),
        }
    }
}

impl<'e, 's, 'a> Visit<'a> for MarkupRewriter<'e, 's, 'a> {
    fn visit_jsx_element(&mut self, it: &JSXElement<'a>) {
        if self.error.is_some() {
            return;
        }
        let generated = self.emitter.element(it);
        self.record(it.span.start, it.span.end, generated);
    }

    fn visit_jsx_fragment(&mut self, it: &JSXFragment<'a>) {
        if self.error.is_some() {
            return;
        }
        let generated = self.emitter.fragment(it);
        self.record(it.span.start, it.span.end, generated);
    }
}

/// Applies replacements to `text`, whose first byte sits at offset `base` of the source.
pub fn apply_replacements(text: &str, base: u32, mut replacements: Vec<Replacement>) -> String {
    let mut result = text.to_string();
    // Sort reverse to apply safely
    replacements.sort_by(|a, b| b.0.cmp(&a.0));
    for (start, end, replacement) in replacements {
        let start = (start - base) as usize;
        let end = (end - base) as usize;
        result.replace_range(start..end, &replacement);
    }
    result
}
