//! Server target.
//!
//! Renders the same marker skeleton the client uses into string chunks, so hydration
//! markers carry identical ids on both sides. Chunks are interned like client templates
//! and declared as plain string arrays.

use oxc_ast::ast::JSXElement;

use crate::codegen::{CodeContext, Emitter};
use crate::error::GenResult;
use crate::jsx::{event_name, html_attribute_name, js_string};
use crate::template::{marker_comment, marker_skeleton_of, DynamicPart, MarkerCounter, Piece, PartValue};

/// `["<a>", "</a>"]` as a JS array literal.
pub fn chunk_array(chunks: &[String]) -> String {
    let items: Vec<String> = chunks.iter().map(|chunk| js_string(chunk)).collect();
    format!("[{}]", items.join(", "))
}

impl<'s, 'a> Emitter<'s, 'a> {
    /// `_$ssr(_tmpl$N, v0, v1, ...)` for an intrinsic element.
    pub(crate) fn ssr_element(&mut self, element: &JSXElement<'a>) -> GenResult {
        let mut counter = MarkerCounter::new();
        let skeleton = marker_skeleton_of(element, &mut counter);

        let mut chunks = vec![String::new()];
        let mut values = Vec::new();
        for piece in &skeleton.pieces {
            match piece {
                Piece::Html(html) => push_chunk(&mut chunks, html),
                Piece::AttributeSlot(i) => {
                    if let Some(value) = self.ssr_attribute(&skeleton.parts[*i])? {
                        values.push(value);
                        chunks.push(String::new());
                    }
                }
                Piece::ChildSlot(i) => {
                    let part = &skeleton.parts[*i];
                    values.push(self.ssr_child(part)?);
                    chunks.push(marker_comment(part));
                }
            }
        }

        let id = self.templates.intern(&chunk_array(&chunks));
        if values.is_empty() {
            Ok(format!("_$ssr({})", id))
        } else {
            Ok(format!("_$ssr({}, {})", id, values.join(", ")))
        }
    }

    /// Handlers have no server meaning and render nothing.
    fn ssr_attribute(&mut self, part: &DynamicPart<'_, 'a>) -> GenResult<Option<String>> {
        let name = part.attribute_name.as_deref().unwrap_or_default();
        let value = match part.value {
            PartValue::Spread(expr) => {
                let value = self.stringify_in(expr, CodeContext::Static)?;
                return Ok(Some(format!("_$ssrSpread({})", value)));
            }
            _ if event_name(name).is_some() => return Ok(None),
            PartValue::Expression(expr) => self.stringify_in(expr, CodeContext::Static)?,
            PartValue::Element(el) => self.element(el)?,
            PartValue::Fragment(fragment) => self.fragment(fragment)?,
        };
        Ok(Some(format!(
            "_$ssrAttr({}, {})",
            js_string(html_attribute_name(name)),
            value
        )))
    }

    /// Expression children always go through `_$escape`, even when they evaluate to
    /// server markup (`items.map(i => <li/>)`, `ok && <b/>`). The server runtime's
    /// `_$escape` passes `_$ssr` results and arrays of them through unescaped and
    /// escapes everything else. Element and fragment children are emitted bare.
    fn ssr_child(&mut self, part: &DynamicPart<'_, 'a>) -> GenResult {
        match part.value {
            PartValue::Expression(expr) | PartValue::Spread(expr) => {
                Ok(format!("_$escape({})", self.stringify_in(expr, CodeContext::Static)?))
            }
            PartValue::Element(el) => self.element(el),
            PartValue::Fragment(fragment) => self.fragment(fragment),
        }
    }
}

fn push_chunk(chunks: &mut Vec<String>, html: &str) {
    if let Some(last) = chunks.last_mut() {
        last.push_str(html);
    } else {
        chunks.push(html.to_string());
    }
}
