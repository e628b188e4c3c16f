//! Dynamic-Element Codegen
//!
//! Turns an intrinsic element into DOM-building code: a clone of its interned template,
//! followed by the statements that bind every [`DynamicPart`] of the skeleton.

use oxc_ast::ast::{JSXElement, JSXFragment};

use crate::codegen::{is_potentially_reactive, CodeContext, Emitter};
use crate::component::is_component;
use crate::error::GenResult;
use crate::jsx::{event_name, js_string};
use crate::list::match_list;
use crate::static_eval::is_static;
use crate::template::{marker_skeleton_of, template_html_of, DynamicPart, MarkerCounter, PartKind, PartValue};

/// Appends one statement of a generated block.
pub(crate) fn push_line(out: &mut String, line: &str) {
    out.push_str("  ");
    out.push_str(line);
    out.push('\n');
}

/// `.children[i].children[j]` for an element path.
fn child_path(path: &[usize]) -> String {
    path.iter().map(|i| format!(".children[{}]", i)).collect()
}

impl<'s, 'a> Emitter<'s, 'a> {
    /// Code for any element in expression position.
    pub fn element(&mut self, element: &JSXElement<'a>) -> GenResult {
        if is_component(&element.opening_element.name) {
            return self.component_call(element);
        }
        if self.options.is_server() {
            return self.ssr_element(element);
        }
        if is_static(element) {
            let html = template_html_of(element)?;
            let id = self.templates.intern(&html);
            return Ok(format!("_$clone({})", id));
        }
        let block = self.element_block(element)?;
        Ok(format!("(() => {{\n{}}})()", block))
    }

    /// A fragment is the array of its children.
    pub fn fragment(&mut self, fragment: &JSXFragment<'a>) -> GenResult {
        let values = self.child_values(&fragment.children)?;
        Ok(format!("[{}]", values.join(", ")))
    }

    /// Block body for a dynamic intrinsic element, without a function wrapper.
    pub(crate) fn element_block(&mut self, element: &JSXElement<'a>) -> GenResult {
        let mut counter = MarkerCounter::new();
        let skeleton = marker_skeleton_of(element, &mut counter);
        let id = self.templates.intern(&skeleton.client_html());
        self.generate_block(&id, &skeleton.parts)
    }

    /// Statements that clone `template_id`, wire up `parts` and return the root.
    pub fn generate_block(&mut self, template_id: &str, parts: &[DynamicPart<'_, 'a>]) -> GenResult {
        let mut out = String::new();
        push_line(&mut out, &format!("const _root$ = _$clone({});", template_id));

        let (attributes, children): (Vec<&DynamicPart>, Vec<&DynamicPart>) =
            parts.iter().partition(|part| part.kind == PartKind::Attribute);

        // Each distinct path resolves once.
        let mut resolved: Vec<(&[usize], String)> = Vec::new();
        let mut targets = Vec::with_capacity(attributes.len());
        for part in &attributes {
            if part.path.is_empty() {
                targets.push("_root$".to_string());
                continue;
            }
            if let Some((_, name)) = resolved.iter().find(|(path, _)| *path == part.path.as_slice()) {
                targets.push(name.clone());
                continue;
            }
            let name = format!("_el${}", resolved.len());
            push_line(&mut out, &format!("const {} = _root${};", name, child_path(&part.path)));
            resolved.push((part.path.as_slice(), name.clone()));
            targets.push(name);
        }

        let mut markers = Vec::with_capacity(children.len());
        for (i, part) in children.iter().enumerate() {
            let name = format!("_m${}", i);
            let marker_id = part.marker_id.as_deref().unwrap_or_default();
            push_line(
                &mut out,
                &format!("const {} = _$findMarker(_root$, {});", name, js_string(marker_id)),
            );
            markers.push(name);
        }

        for (part, target) in attributes.iter().zip(&targets) {
            let line = self.attribute_binding(part, target)?;
            push_line(&mut out, &line);
        }

        for (part, marker) in children.iter().zip(&markers) {
            let code = self.child_binding(part, marker)?;
            push_line(&mut out, &code);
        }

        push_line(&mut out, "return _root$;");
        Ok(out)
    }

    fn attribute_binding(&mut self, part: &DynamicPart<'_, 'a>, target: &str) -> GenResult {
        let name = part.attribute_name.as_deref().unwrap_or_default();
        let event = event_name(name);
        let value = match part.value {
            PartValue::Spread(expr) => {
                let value = self.stringify_in(expr, CodeContext::Static)?;
                return Ok(format!("_$effect(() => _$spread({}, {}));", target, value));
            }
            PartValue::Expression(expr) if event.is_some() => self.stringify_in(expr, CodeContext::Event)?,
            PartValue::Expression(expr) => self.stringify_in(expr, CodeContext::Static)?,
            PartValue::Element(el) => self.element(el)?,
            PartValue::Fragment(fragment) => self.fragment(fragment)?,
        };
        match event {
            Some(event) => Ok(format!("_$delegate({}, {}, {});", target, js_string(&event), value)),
            None => Ok(format!(
                "_$effect(() => _$setProp({}, {}, {}));",
                target,
                js_string(name),
                value
            )),
        }
    }

    fn child_binding(&mut self, part: &DynamicPart<'_, 'a>, marker: &str) -> GenResult {
        if let PartValue::Expression(expr) = part.value {
            if let Some(list) = match_list(expr) {
                return self.list_binding(&list, marker);
            }
        }
        let (value, reactive) = match part.value {
            PartValue::Expression(expr) | PartValue::Spread(expr) => (
                self.stringify_in(expr, CodeContext::Reactive)?,
                is_potentially_reactive(expr),
            ),
            PartValue::Element(el) => (self.element(el)?, false),
            PartValue::Fragment(fragment) => (self.fragment(fragment)?, false),
        };
        let mut code = format!("_$insert({}.parentNode, {}, {});", marker, value, marker);
        if !reactive {
            code.push_str(&format!(" {}.remove();", marker));
        }
        Ok(code)
    }
}
