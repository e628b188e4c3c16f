//! Component Generator
//!
//! Component-tagged markup never becomes a template. It compiles to a direct call of the
//! component function with a props object built from the attributes and children.

use oxc_ast::ast::{Expression, JSXAttributeItem, JSXAttributeValue, JSXChild, JSXElement, JSXElementName};
use oxc_syntax::identifier::is_identifier_name;

use crate::codegen::{CodeContext, Emitter};
use crate::error::GenResult;
use crate::jsx::{attribute_name, clean_jsx_text, decode_entities, element_name, event_name, is_component_tag, js_string};
use crate::static_eval::is_empty_container;

/// Uppercase identifiers, member references and `this` name components.
pub fn is_component(name: &JSXElementName) -> bool {
    match name {
        JSXElementName::Identifier(ident) => is_component_tag(ident.name.as_str()),
        JSXElementName::IdentifierReference(ident) => is_component_tag(ident.name.as_str()),
        JSXElementName::NamespacedName(_) => false,
        JSXElementName::MemberExpression(_) | JSXElementName::ThisExpression(_) => true,
    }
}

/// Object key for a prop name, quoted when it is not a plain identifier.
pub fn prop_key(name: &str) -> String {
    if is_identifier_name(name) {
        name.to_string()
    } else {
        js_string(name)
    }
}

fn object_literal(entries: &[String]) -> String {
    if entries.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", entries.join(", "))
    }
}

impl<'s, 'a> Emitter<'s, 'a> {
    /// `_$unwrapComponent(Comp(_$unwrapProps({ ...props })))`
    pub fn component_call(&mut self, element: &JSXElement<'a>) -> GenResult {
        let callee = element_name(&element.opening_element.name);
        let is_conditional = callee == self.options.conditional_component;

        // Object.assign sources, in attribute order.
        let mut sources: Vec<String> = Vec::new();
        let mut entries: Vec<String> = Vec::new();
        let mut has_spread = false;

        for item in &element.opening_element.attributes {
            match item {
                JSXAttributeItem::SpreadAttribute(spread) => {
                    has_spread = true;
                    if !entries.is_empty() {
                        sources.push(object_literal(&entries));
                        entries.clear();
                    }
                    sources.push(self.stringify_in(&spread.argument, CodeContext::Static)?);
                }
                JSXAttributeItem::Attribute(attr) => {
                    let name = attribute_name(&attr.name);
                    if name == "key" || is_empty_container(attr.value.as_ref()) {
                        continue;
                    }
                    let value = self.prop_value(&name, attr.value.as_ref(), is_conditional)?;
                    entries.push(format!("{}: {}", prop_key(&name), value));
                }
            }
        }

        let children = self.child_values(&element.children)?;
        if !children.is_empty() {
            let has_child_spread = element.children.iter().any(|c| matches!(c, JSXChild::Spread(_)));
            let value = if children.len() == 1 && !has_child_spread {
                children.into_iter().next().unwrap_or_default()
            } else {
                format!("[{}]", children.join(", "))
            };
            entries.push(format!("children: {}", value));
        }

        let props = if has_spread {
            if !entries.is_empty() {
                sources.push(object_literal(&entries));
            }
            format!("Object.assign({{}}, {})", sources.join(", "))
        } else {
            object_literal(&entries)
        };

        Ok(format!("_$unwrapComponent({}(_$unwrapProps({})))", callee, props))
    }

    fn prop_value(
        &mut self,
        name: &str,
        value: Option<&JSXAttributeValue<'a>>,
        is_conditional: bool,
    ) -> GenResult {
        match value {
            None => Ok("true".to_string()),
            Some(JSXAttributeValue::StringLiteral(s)) => Ok(js_string(&decode_entities(s.value.as_str()))),
            Some(JSXAttributeValue::Element(el)) => self.element(el),
            Some(JSXAttributeValue::Fragment(fragment)) => self.fragment(fragment),
            Some(JSXAttributeValue::ExpressionContainer(container)) => {
                let Some(expr) = container.expression.as_expression() else {
                    return Ok("undefined".to_string());
                };
                if is_conditional && name == self.options.condition_prop {
                    self.condition_value(expr)
                } else if event_name(name).is_some() {
                    self.stringify_in(expr, CodeContext::Event)
                } else {
                    self.stringify_in(expr, CodeContext::Reactive)
                }
            }
        }
    }

    /// Condition of the conditional component, always handed over deferred.
    fn condition_value(&mut self, expr: &Expression<'a>) -> GenResult {
        match expr.without_parentheses() {
            Expression::Identifier(_)
            | Expression::StaticMemberExpression(_)
            | Expression::ComputedMemberExpression(_)
            | Expression::PrivateFieldExpression(_)
            | Expression::ArrowFunctionExpression(_)
            | Expression::FunctionExpression(_) => self.stringify_in(expr, CodeContext::Static),
            _ => Ok(format!("() => {}", self.stringify_in(expr, CodeContext::Function)?)),
        }
    }

    /// Generated values for a child list; whitespace-only text is dropped and
    /// child spreads come back prefixed with `...`.
    pub(crate) fn child_values(&mut self, children: &[JSXChild<'a>]) -> GenResult<Vec<String>> {
        let mut values = Vec::with_capacity(children.len());
        for child in children {
            match child {
                JSXChild::Text(text) => {
                    let cleaned = clean_jsx_text(text.value.as_str());
                    if !cleaned.is_empty() {
                        values.push(js_string(&decode_entities(&cleaned)));
                    }
                }
                JSXChild::Element(el) => values.push(self.element(el)?),
                JSXChild::Fragment(fragment) => values.push(self.fragment(fragment)?),
                JSXChild::ExpressionContainer(container) => {
                    if let Some(expr) = container.expression.as_expression() {
                        values.push(self.stringify_in(expr, CodeContext::Reactive)?);
                    }
                }
                JSXChild::Spread(spread) => {
                    values.push(format!("...{}", self.stringify_in(&spread.expression, CodeContext::Static)?))
                }
            }
        }
        Ok(values)
    }
}
