//! Static analysis of markup.
//!
//! Decides whether an element subtree can be rendered once into a template, and
//! evaluates the literal attribute values that are allowed to appear inline in one.

use oxc_ast::ast::{Expression, JSXAttributeItem, JSXAttributeValue, JSXChild, JSXElement, JSXExpression};

use crate::component::is_component;
use crate::jsx::{attribute_name, decode_entities};

/// A value known at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// `null` or `undefined`.
    Nullish,
}

impl LiteralValue {
    /// Attribute text for inline serialization, `None` when the attribute is omitted.
    /// `Some("")` with `bare == true` renders as a valueless attribute.
    pub fn attribute_text(&self) -> Option<(String, bool)> {
        match self {
            LiteralValue::Text(s) => Some((s.clone(), false)),
            LiteralValue::Number(n) => Some((format_number(*n), false)),
            LiteralValue::Bool(true) => Some((String::new(), true)),
            LiteralValue::Bool(false) | LiteralValue::Nullish => None,
        }
    }
}

/// Number-to-string the way JS prints numeric literals.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.abs() >= 1e21 {
        let exp = format!("{:e}", n);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        };
    }
    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Evaluate an expression to a literal, looking through parentheses.
pub fn literal_value(expr: &Expression) -> Option<LiteralValue> {
    match expr {
        Expression::StringLiteral(s) => Some(LiteralValue::Text(s.value.to_string())),
        Expression::NumericLiteral(n) => Some(LiteralValue::Number(n.value)),
        Expression::BooleanLiteral(b) => Some(LiteralValue::Bool(b.value)),
        Expression::NullLiteral(_) => Some(LiteralValue::Nullish),
        Expression::Identifier(ident) if ident.name.as_str() == "undefined" => Some(LiteralValue::Nullish),
        Expression::TemplateLiteral(t) if t.expressions.is_empty() => {
            let text = t
                .quasis
                .iter()
                .map(|q| q.value.cooked.as_ref().unwrap_or(&q.value.raw).to_string())
                .collect::<String>();
            Some(LiteralValue::Text(text))
        }
        Expression::ParenthesizedExpression(p) => literal_value(&p.expression),
        _ => None,
    }
}

/// Literal value of an attribute; valueless attributes are `true`.
/// `None` means the value is dynamic. Empty `{}` containers also yield `None`.
pub fn attribute_literal(value: Option<&JSXAttributeValue>) -> Option<LiteralValue> {
    match value {
        None => Some(LiteralValue::Bool(true)),
        Some(JSXAttributeValue::StringLiteral(s)) => {
            Some(LiteralValue::Text(decode_entities(s.value.as_str())))
        }
        Some(JSXAttributeValue::ExpressionContainer(container)) => {
            container.expression.as_expression().and_then(literal_value)
        }
        Some(JSXAttributeValue::Element(_)) | Some(JSXAttributeValue::Fragment(_)) => None,
    }
}

pub fn is_empty_container(value: Option<&JSXAttributeValue>) -> bool {
    matches!(
        value,
        Some(JSXAttributeValue::ExpressionContainer(c))
            if matches!(c.expression, JSXExpression::EmptyExpression(_))
    )
}

/// An element is static when it is intrinsic, every attribute is a literal and
/// every child is text or another static element.
pub fn is_static(element: &JSXElement) -> bool {
    if is_component(&element.opening_element.name) {
        return false;
    }

    for item in &element.opening_element.attributes {
        match item {
            JSXAttributeItem::SpreadAttribute(_) => return false,
            JSXAttributeItem::Attribute(attr) => {
                if attribute_name(&attr.name) == "key" || is_empty_container(attr.value.as_ref()) {
                    continue;
                }
                if attribute_literal(attr.value.as_ref()).is_none() {
                    return false;
                }
            }
        }
    }

    element.children.iter().all(|child| match child {
        JSXChild::Text(_) => true,
        JSXChild::Element(el) => is_static(el),
        JSXChild::ExpressionContainer(c) => matches!(c.expression, JSXExpression::EmptyExpression(_)),
        JSXChild::Fragment(_) | JSXChild::Spread(_) => false,
    })
}
