//! List-Rendering Optimizer
//!
//! A child slot holding exactly `<array>.map(<fn>)` is compiled to an array
//! materialization call so the runtime can reconcile items instead of re-inserting
//! the whole list.

use oxc_ast::ast::{
    Expression, FormalParameters, FunctionBody, JSXAttributeItem, JSXAttributeValue, JSXElement,
    Statement,
};
use oxc_ast_visit::Visit;

use crate::codegen::{CodeContext, Emitter};
use crate::component::is_component;
use crate::error::GenResult;
use crate::jsx::{attribute_name, decode_entities, js_string};
use crate::static_eval::is_static;
use crate::template::template_html_of;

/// `<array>.map(<callback>)`
#[derive(Debug, Clone, Copy)]
pub struct ListShape<'b, 'a> {
    pub array: &'b Expression<'a>,
    pub callback: &'b Expression<'a>,
}

pub fn match_list<'b, 'a>(expr: &'b Expression<'a>) -> Option<ListShape<'b, 'a>> {
    let Expression::CallExpression(call) = expr.without_parentheses() else {
        return None;
    };
    if call.optional || call.arguments.len() != 1 {
        return None;
    }
    let Expression::StaticMemberExpression(member) = &call.callee else {
        return None;
    };
    if member.optional || member.property.name.as_str() != "map" {
        return None;
    }
    let callback = call.arguments[0].as_expression()?;
    Some(ListShape {
        array: &member.object,
        callback,
    })
}

/// A callback whose whole body is one element.
struct ItemTemplate<'b, 'a> {
    params: &'b FormalParameters<'a>,
    element: &'b JSXElement<'a>,
}

fn item_template<'b, 'a>(callback: &'b Expression<'a>) -> Option<ItemTemplate<'b, 'a>> {
    let (params, element) = match callback.without_parentheses() {
        Expression::ArrowFunctionExpression(arrow) if !arrow.r#async => {
            let element = match arrow.get_expression() {
                Some(expr) => as_element(expr),
                None => returned_element(&arrow.body),
            }?;
            (&*arrow.params, element)
        }
        Expression::FunctionExpression(func) if !func.r#async && !func.generator => {
            let element = returned_element(func.body.as_deref()?)?;
            (&*func.params, element)
        }
        _ => return None,
    };
    Some(ItemTemplate { params, element })
}

fn as_element<'b, 'a>(expr: &'b Expression<'a>) -> Option<&'b JSXElement<'a>> {
    match expr.without_parentheses() {
        Expression::JSXElement(element) => Some(&**element),
        _ => None,
    }
}

fn returned_element<'b, 'a>(body: &'b FunctionBody<'a>) -> Option<&'b JSXElement<'a>> {
    match &body.statements[..] {
        [Statement::ReturnStatement(ret)] => as_element(ret.argument.as_ref()?),
        _ => None,
    }
}

fn key_attribute<'b, 'a>(element: &'b JSXElement<'a>) -> Option<&'b JSXAttributeValue<'a>> {
    element.opening_element.attributes.iter().find_map(|item| match item {
        JSXAttributeItem::Attribute(attr) if attribute_name(&attr.name) == "key" => attr.value.as_ref(),
        _ => None,
    })
}

impl<'s, 'a> Emitter<'s, 'a> {
    /// Statement that materializes `list` in front of `marker`.
    pub(crate) fn list_binding(&mut self, list: &ListShape<'_, 'a>, marker: &str) -> GenResult {
        let array = self.stringify_in(list.array, CodeContext::Reactive)?;

        let Some(item) = item_template(list.callback) else {
            let callback = self.stringify_in(list.callback, CodeContext::Function)?;
            return Ok(format!(
                "_$mapArray({}.parentNode, {}, {}, {});",
                marker, marker, array, callback
            ));
        };

        let params = self.item_params(item.params)?;
        let body = if is_component(&item.element.opening_element.name) {
            self.component_call(item.element)?
        } else if is_static(item.element) {
            let html = template_html_of(item.element)?;
            format!("_$clone({})", self.templates.intern(&html))
        } else {
            format!("{{\n{}}}", self.element_block(item.element)?)
        };
        let item_fn = format!("{} => {}", params, body);

        match self.key_function(item.element, &params)? {
            Some(key_fn) => Ok(format!(
                "_$mapArrayKeyed({}.parentNode, {}, {}, {}, {});",
                marker, marker, array, item_fn, key_fn
            )),
            None => Ok(format!(
                "_$mapArray({}.parentNode, {}, {}, {});",
                marker, marker, array, item_fn
            )),
        }
    }

    /// Parameter list of the item callback, always parenthesized.
    fn item_params(&mut self, params: &FormalParameters<'a>) -> GenResult {
        let text = self.splice(params.span, |rw| rw.visit_formal_parameters(params))?;
        if text.starts_with('(') {
            Ok(text)
        } else {
            Ok(format!("({})", text))
        }
    }

    fn key_function(&mut self, element: &JSXElement<'a>, params: &str) -> GenResult<Option<String>> {
        let key = match key_attribute(element) {
            Some(JSXAttributeValue::ExpressionContainer(container)) => {
                match container.expression.as_expression() {
                    Some(expr) => self.stringify_in(expr, CodeContext::Function)?,
                    None => return Ok(None),
                }
            }
            Some(JSXAttributeValue::StringLiteral(s)) => js_string(&decode_entities(s.value.as_str())),
            Some(JSXAttributeValue::Element(_)) | Some(JSXAttributeValue::Fragment(_)) | None => {
                return Ok(None)
            }
        };
        Ok(Some(format!("{} => {}", params, key)))
    }
}
