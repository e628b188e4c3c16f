//! Template Manager
//!
//! Serializes element subtrees to HTML, interns the results per compilation unit,
//! and splits dynamic subtrees into a marker skeleton plus the list of
//! [`DynamicPart`]s that the element generators wire up at runtime.

use std::collections::HashMap;

use oxc_ast::ast::{
    Expression, JSXAttributeItem, JSXAttributeValue, JSXChild, JSXElement, JSXFragment,
};

use crate::component::is_component;
use crate::error::{GenResult, GenerateError};
use crate::jsx::{
    attribute_name, clean_jsx_text, decode_entities, element_name, escape_html_attribute,
    escape_html_text, html_attribute_name, is_void_element,
};
use crate::static_eval::{attribute_literal, is_empty_container, is_static, LiteralValue};

pub const TEMPLATE_PREFIX: &str = "_tmpl$";

// ═══════════════════════════════════════════════════════════════════════════════
// INTERN TABLE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: String,
    pub html: String,
}

/// Per-unit table of templates keyed by exact HTML text.
#[derive(Debug, Default)]
pub struct TemplateManager {
    templates: Vec<Template>,
    index: HashMap<String, usize>,
}

impl TemplateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of the template with exactly this text, creating it on first sight.
    pub fn intern(&mut self, html: &str) -> String {
        if let Some(&i) = self.index.get(html) {
            return self.templates[i].id.clone();
        }
        let id = format!("{}{}", TEMPLATE_PREFIX, self.templates.len());
        self.index.insert(html.to_string(), self.templates.len());
        self.templates.push(Template {
            id: id.clone(),
            html: html.to_string(),
        });
        id
    }

    /// Drops every interned template and restarts numbering at zero.
    pub fn reset_counter(&mut self) {
        self.templates.clear();
        self.index.clear();
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DYNAMIC PARTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Hands out marker ids for one template. Threaded through the skeleton walk by `&mut`.
#[derive(Debug, Default)]
pub struct MarkerCounter {
    next: usize,
}

impl MarkerCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("#{}", self.next);
        self.next += 1;
        id
    }

    pub fn issued(&self) -> usize {
        self.next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Attribute,
    Child,
    NestedElement,
}

#[derive(Debug, Clone, Copy)]
pub enum PartValue<'b, 'a> {
    Expression(&'b Expression<'a>),
    /// `{...props}` on an element or `{...items}` as a child.
    Spread(&'b Expression<'a>),
    Element(&'b JSXElement<'a>),
    Fragment(&'b JSXFragment<'a>),
}

/// One binding point inside a template.
#[derive(Debug, Clone)]
pub struct DynamicPart<'b, 'a> {
    pub kind: PartKind,
    /// Text of the `<!--...-->` marker; child and nested-element parts only.
    pub marker_id: Option<String>,
    /// Element-only sibling indices from the template root to the owning element.
    pub path: Vec<usize>,
    pub value: PartValue<'b, 'a>,
    pub attribute_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Html(String),
    AttributeSlot(usize),
    ChildSlot(usize),
}

/// Serialized element with its dynamic slots left open.
#[derive(Debug, Default)]
pub struct Skeleton<'b, 'a> {
    pub pieces: Vec<Piece>,
    pub parts: Vec<DynamicPart<'b, 'a>>,
}

impl<'b, 'a> Skeleton<'b, 'a> {
    fn push_html(&mut self, html: &str) {
        if let Some(Piece::Html(last)) = self.pieces.last_mut() {
            last.push_str(html);
        } else {
            self.pieces.push(Piece::Html(html.to_string()));
        }
    }

    fn push_part(&mut self, part: DynamicPart<'b, 'a>) {
        let slot = self.parts.len();
        match part.kind {
            PartKind::Attribute => self.pieces.push(Piece::AttributeSlot(slot)),
            PartKind::Child | PartKind::NestedElement => self.pieces.push(Piece::ChildSlot(slot)),
        }
        self.parts.push(part);
    }

    /// HTML for the client template: attribute slots vanish, child slots become markers.
    pub fn client_html(&self) -> String {
        let mut html = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Html(text) => html.push_str(text),
                Piece::AttributeSlot(_) => {}
                Piece::ChildSlot(i) => html.push_str(&marker_comment(&self.parts[*i])),
            }
        }
        html
    }
}

pub fn marker_comment(part: &DynamicPart) -> String {
    format!("<!--{}-->", part.marker_id.as_deref().unwrap_or_default())
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERIALIZATION
// ═══════════════════════════════════════════════════════════════════════════════

/// HTML of a static subtree.
pub fn template_html_of(element: &JSXElement) -> GenResult {
    if !is_static(element) {
        return Err(GenerateError::NotStatic);
    }
    let mut counter = MarkerCounter::new();
    Ok(marker_skeleton_of(element, &mut counter).client_html())
}

/// Serializes `element`, leaving a slot for every dynamic attribute and child.
pub fn marker_skeleton_of<'b, 'a>(
    element: &'b JSXElement<'a>,
    counter: &mut MarkerCounter,
) -> Skeleton<'b, 'a> {
    let mut skeleton = Skeleton::default();
    let mut path = Vec::new();
    write_element(element, &mut path, counter, &mut skeleton);
    skeleton
}

fn write_element<'b, 'a>(
    element: &'b JSXElement<'a>,
    path: &mut Vec<usize>,
    counter: &mut MarkerCounter,
    out: &mut Skeleton<'b, 'a>,
) {
    let tag = element_name(&element.opening_element.name);
    out.push_html(&format!("<{}", tag));

    for item in &element.opening_element.attributes {
        match item {
            JSXAttributeItem::SpreadAttribute(spread) => out.push_part(DynamicPart {
                kind: PartKind::Attribute,
                marker_id: None,
                path: path.clone(),
                value: PartValue::Spread(&spread.argument),
                attribute_name: None,
            }),
            JSXAttributeItem::Attribute(attr) => {
                let name = attribute_name(&attr.name);
                if name == "key" || is_empty_container(attr.value.as_ref()) {
                    continue;
                }
                if let Some(literal) = attribute_literal(attr.value.as_ref()) {
                    write_static_attribute(out, &name, &literal);
                    continue;
                }
                let value = match &attr.value {
                    Some(JSXAttributeValue::ExpressionContainer(c)) => {
                        c.expression.as_expression().map(PartValue::Expression)
                    }
                    Some(JSXAttributeValue::Element(el)) => Some(PartValue::Element(&**el)),
                    Some(JSXAttributeValue::Fragment(f)) => Some(PartValue::Fragment(&**f)),
                    Some(JSXAttributeValue::StringLiteral(_)) | None => None,
                };
                if let Some(value) = value {
                    out.push_part(DynamicPart {
                        kind: PartKind::Attribute,
                        marker_id: None,
                        path: path.clone(),
                        value,
                        attribute_name: Some(name),
                    });
                }
            }
        }
    }
    out.push_html(">");

    if is_void_element(&tag) {
        return;
    }

    let mut element_index = 0;
    for child in &element.children {
        match child {
            JSXChild::Text(text) => {
                let cleaned = clean_jsx_text(text.value.as_str());
                if !cleaned.is_empty() {
                    out.push_html(&escape_html_text(&decode_entities(&cleaned)));
                }
            }
            JSXChild::Element(child_el) if !is_component(&child_el.opening_element.name) => {
                path.push(element_index);
                write_element(child_el, path, counter, out);
                path.pop();
                element_index += 1;
            }
            JSXChild::Element(child_el) => {
                push_child(out, counter, path, PartKind::NestedElement, PartValue::Element(&**child_el))
            }
            JSXChild::Fragment(fragment) => {
                push_child(out, counter, path, PartKind::NestedElement, PartValue::Fragment(&**fragment))
            }
            JSXChild::ExpressionContainer(container) => {
                if let Some(expr) = container.expression.as_expression() {
                    push_child(out, counter, path, PartKind::Child, PartValue::Expression(expr));
                }
            }
            JSXChild::Spread(spread) => {
                push_child(out, counter, path, PartKind::Child, PartValue::Spread(&spread.expression))
            }
        }
    }

    out.push_html(&format!("</{}>", tag));
}

fn push_child<'b, 'a>(
    out: &mut Skeleton<'b, 'a>,
    counter: &mut MarkerCounter,
    path: &[usize],
    kind: PartKind,
    value: PartValue<'b, 'a>,
) {
    out.push_part(DynamicPart {
        kind,
        marker_id: Some(counter.next_id()),
        path: path.to_vec(),
        value,
        attribute_name: None,
    });
}

fn write_static_attribute(out: &mut Skeleton, name: &str, literal: &LiteralValue) {
    let Some((text, bare)) = literal.attribute_text() else {
        return;
    };
    let name = html_attribute_name(name);
    if bare {
        out.push_html(&format!(" {}", name));
    } else {
        out.push_html(&format!(" {}=\"{}\"", name, escape_html_attribute(&text)));
    }
}
