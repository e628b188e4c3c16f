//! Expression code generation.
//!
//! [`Emitter`] turns expression nodes back into source text. The ambient [`CodeContext`]
//! decides how zero-argument accessor calls are rendered: in reactive context `count()`
//! becomes `count` so the runtime receives the accessor itself, everywhere else calls are
//! emitted exactly as written.

use std::collections::HashSet;

use lazy_static::lazy_static;
use oxc_ast::ast::*;
use oxc_ast_visit::Visit;
use oxc_span::{GetSpan, Span};

use crate::error::{GenResult, GenerateError};
use crate::options::CompileOptions;
use crate::template::TemplateManager;
use crate::visitor::{apply_replacements, MarkupRewriter};

lazy_static! {
    /// Callee roots whose calls never read reactive state.
    static ref NON_REACTIVE_ROOTS: HashSet<&'static str> = [
        "Math", "Date", "console", "performance", "JSON", "Object", "Array", "Number", "String",
        "Boolean", "Symbol", "BigInt", "Promise", "Reflect", "Intl", "crypto", "window",
        "document", "globalThis", "navigator", "localStorage", "sessionStorage",
    ]
    .into_iter()
    .collect();

    /// Bare global functions that are timers, I/O or pure conversions.
    static ref NON_REACTIVE_CALLS: HashSet<&'static str> = [
        "setTimeout", "setInterval", "clearTimeout", "clearInterval", "requestAnimationFrame",
        "cancelAnimationFrame", "queueMicrotask", "fetch", "alert", "confirm", "prompt",
        "structuredClone", "parseInt", "parseFloat", "isNaN", "isFinite", "encodeURIComponent",
        "decodeURIComponent", "encodeURI", "decodeURI",
    ]
    .into_iter()
    .collect();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeContext {
    #[default]
    Static,
    /// Accessor calls are passed by reference.
    Reactive,
    /// Event handler values.
    Event,
    /// Bodies of nested functions.
    Function,
}

impl CodeContext {
    /// Context for the operands of a compound expression.
    pub fn operand(self) -> Self {
        match self {
            CodeContext::Reactive => CodeContext::Static,
            other => other,
        }
    }
}

/// Generation state for one compilation unit.
pub struct Emitter<'s, 'a> {
    pub(crate) source: &'a str,
    pub(crate) options: &'s CompileOptions,
    pub(crate) templates: &'s mut TemplateManager,
    context: CodeContext,
}

impl<'s, 'a> Emitter<'s, 'a> {
    pub fn new(source: &'a str, options: &'s CompileOptions, templates: &'s mut TemplateManager) -> Self {
        Emitter {
            source,
            options,
            templates,
            context: CodeContext::Static,
        }
    }

    pub fn context(&self) -> CodeContext {
        self.context
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SOURCE ACCESS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Exact source text under `span`.
    pub fn slice(&self, span: Span) -> GenResult<&'a str> {
        let source: &'a str = self.source;
        let (start, end) = (span.start as usize, span.end as usize);
        if start > end
            || end > source.len()
            || !source.is_char_boundary(start)
            || !source.is_char_boundary(end)
        {
            return Err(GenerateError::PositionLost {
                start: span.start,
                end: span.end,
            });
        }
        Ok(&source[start..end])
    }

    /// Like [`Emitter::slice`] but an empty span counts as lost.
    fn node_text(&self, span: Span) -> GenResult<&'a str> {
        if span.is_empty() {
            return Err(GenerateError::PositionLost {
                start: span.start,
                end: span.end,
            });
        }
        self.slice(span)
    }

    /// Source text under `span` with every outermost piece of markup found by `walk`
    /// replaced by its generated code.
    pub fn splice<F>(&mut self, span: Span, walk: F) -> GenResult
    where
        F: FnOnce(&mut MarkupRewriter<'_, 's, 'a>),
    {
        let text = self.slice(span)?;
        let mut rewriter = MarkupRewriter::new(self);
        walk(&mut rewriter);
        let replacements = rewriter.finish()?;
        Ok(apply_replacements(text, span.start, replacements))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EXPRESSIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Generates `expr` in `context`, restoring the previous context afterwards.
    pub fn stringify_in(&mut self, expr: &Expression<'a>, context: CodeContext) -> GenResult {
        let saved = std::mem::replace(&mut self.context, context);
        let result = self.stringify(expr);
        self.context = saved;
        result
    }

    fn operand(&mut self, expr: &Expression<'a>) -> GenResult {
        self.stringify_in(expr, self.context.operand())
    }

    /// Generates `expr` in the current context.
    pub fn stringify(&mut self, expr: &Expression<'a>) -> GenResult {
        match expr {
            Expression::BooleanLiteral(lit) => Ok(lit.value.to_string()),
            Expression::NullLiteral(_) => Ok("null".to_string()),
            Expression::NumericLiteral(lit) => Ok(self.node_text(lit.span)?.to_string()),
            Expression::BigIntLiteral(lit) => Ok(self.node_text(lit.span)?.to_string()),
            Expression::RegExpLiteral(lit) => Ok(self.node_text(lit.span)?.to_string()),
            Expression::StringLiteral(lit) => Ok(self.node_text(lit.span)?.to_string()),
            Expression::TemplateLiteral(lit) => self.template_literal(lit),
            Expression::Identifier(ident) => Ok(ident.name.to_string()),
            Expression::MetaProperty(meta) => Ok(format!("{}.{}", meta.meta.name, meta.property.name)),
            Expression::Super(_) => Ok("super".to_string()),
            Expression::ThisExpression(_) => Ok("this".to_string()),
            Expression::ArrayExpression(array) => self.array(array),
            Expression::ObjectExpression(object) => self.object(object),
            Expression::ArrowFunctionExpression(arrow) => self.arrow(arrow),
            Expression::FunctionExpression(func) => self.function(func),
            Expression::ClassExpression(class) => self.splice(class.span, |rw| rw.visit_class(class)),
            Expression::AssignmentExpression(assign) => {
                let left = self.splice(assign.left.span(), |rw| rw.visit_assignment_target(&assign.left))?;
                let right = self.operand(&assign.right)?;
                Ok(format!("{} {} {}", left, assign.operator.as_str(), right))
            }
            Expression::UpdateExpression(update) => {
                let target = self.splice(update.argument.span(), |rw| {
                    rw.visit_simple_assignment_target(&update.argument)
                })?;
                let op = update.operator.as_str();
                if update.prefix {
                    Ok(format!("{}{}", op, target))
                } else {
                    Ok(format!("{}{}", target, op))
                }
            }
            Expression::UnaryExpression(unary) => {
                let op = unary.operator.as_str();
                let argument = self.operand(&unary.argument)?;
                let glue = if unary.operator.is_keyword()
                    || (op.ends_with('-') && argument.starts_with('-'))
                    || (op.ends_with('+') && argument.starts_with('+'))
                {
                    " "
                } else {
                    ""
                };
                Ok(format!("{}{}{}", op, glue, argument))
            }
            Expression::BinaryExpression(binary) => {
                let left = self.operand(&binary.left)?;
                let right = self.operand(&binary.right)?;
                Ok(format!("{} {} {}", left, binary.operator.as_str(), right))
            }
            Expression::LogicalExpression(logical) => {
                let left = self.operand(&logical.left)?;
                let right = self.operand(&logical.right)?;
                Ok(format!("{} {} {}", left, logical.operator.as_str(), right))
            }
            Expression::PrivateInExpression(private_in) => {
                let right = self.operand(&private_in.right)?;
                Ok(format!("#{} in {}", private_in.left.name, right))
            }
            Expression::ConditionalExpression(cond) => {
                let test = self.operand(&cond.test)?;
                let consequent = self.operand(&cond.consequent)?;
                let alternate = self.operand(&cond.alternate)?;
                Ok(format!("{} ? {} : {}", test, consequent, alternate))
            }
            Expression::SequenceExpression(seq) => {
                let parts = seq
                    .expressions
                    .iter()
                    .map(|e| self.operand(e))
                    .collect::<GenResult<Vec<_>>>()?;
                Ok(parts.join(", "))
            }
            Expression::AwaitExpression(await_expr) => {
                Ok(format!("await {}", self.operand(&await_expr.argument)?))
            }
            Expression::YieldExpression(yield_expr) => {
                let star = if yield_expr.delegate { "*" } else { "" };
                match &yield_expr.argument {
                    Some(argument) => Ok(format!("yield{} {}", star, self.operand(argument)?)),
                    None => Ok(format!("yield{}", star)),
                }
            }
            Expression::CallExpression(call) => self.call(call),
            Expression::NewExpression(new_expr) => {
                let callee = self.operand(&new_expr.callee)?;
                let type_args = self.type_arguments(new_expr.type_arguments.as_deref())?;
                let args = self.arguments(&new_expr.arguments)?;
                Ok(format!("new {}{}({})", callee, type_args, args))
            }
            Expression::ImportExpression(import) => {
                if import.phase.is_some() {
                    return self.splice(import.span, |rw| rw.visit_import_expression(import));
                }
                let source = self.operand(&import.source)?;
                match &import.options {
                    Some(options) => Ok(format!("import({}, {})", source, self.operand(options)?)),
                    None => Ok(format!("import({})", source)),
                }
            }
            Expression::TaggedTemplateExpression(tagged) => {
                let tag = self.operand(&tagged.tag)?;
                let type_args = self.type_arguments(tagged.type_arguments.as_deref())?;
                let quasi = self.template_literal(&tagged.quasi)?;
                Ok(format!("{}{}{}", tag, type_args, quasi))
            }
            Expression::ChainExpression(chain) => match &chain.expression {
                ChainElement::CallExpression(call) => self.call(call),
                ChainElement::TSNonNullExpression(non_null) => {
                    Ok(format!("{}!", self.stringify(&non_null.expression)?))
                }
                element => match element.as_member_expression() {
                    Some(member) => self.member(member),
                    None => Err(GenerateError::Unsupported { what: "chain element" }),
                },
            },
            Expression::ParenthesizedExpression(paren) => Ok(format!("({})", self.stringify(&paren.expression)?)),
            Expression::ComputedMemberExpression(member) => self.computed_member(member),
            Expression::StaticMemberExpression(member) => self.static_member(member),
            Expression::PrivateFieldExpression(member) => self.private_field(member),
            Expression::JSXElement(element) => self.element(element),
            Expression::JSXFragment(fragment) => self.fragment(fragment),
            Expression::TSAsExpression(ts) => {
                let inner = self.stringify(&ts.expression)?;
                Ok(format!("{} as {}", inner, self.slice(ts.type_annotation.span())?))
            }
            Expression::TSSatisfiesExpression(ts) => {
                let inner = self.stringify(&ts.expression)?;
                Ok(format!("{} satisfies {}", inner, self.slice(ts.type_annotation.span())?))
            }
            Expression::TSTypeAssertion(ts) => {
                let inner = self.stringify(&ts.expression)?;
                Ok(format!("<{}>{}", self.slice(ts.type_annotation.span())?, inner))
            }
            Expression::TSNonNullExpression(ts) => Ok(format!("{}!", self.stringify(&ts.expression)?)),
            Expression::TSInstantiationExpression(ts) => {
                let inner = self.stringify(&ts.expression)?;
                Ok(format!("{}{}", inner, self.slice(ts.type_arguments.span)?))
            }
            Expression::V8IntrinsicExpression(intrinsic) => Ok(self.node_text(intrinsic.span)?.to_string()),
        }
    }

    fn call(&mut self, call: &CallExpression<'a>) -> GenResult {
        if self.context == CodeContext::Reactive
            && call.arguments.is_empty()
            && !call.optional
            && is_accessor_callee(&call.callee)
        {
            return self.stringify_in(&call.callee, CodeContext::Static);
        }
        let callee = self.operand(&call.callee)?;
        let type_args = self.type_arguments(call.type_arguments.as_deref())?;
        let args = self.arguments(&call.arguments)?;
        let optional = if call.optional { "?." } else { "" };
        Ok(format!("{}{}{}({})", callee, optional, type_args, args))
    }

    pub(crate) fn arguments(&mut self, args: &[Argument<'a>]) -> GenResult {
        let mut out = Vec::with_capacity(args.len());
        for arg in args {
            match arg {
                Argument::SpreadElement(spread) => out.push(format!("...{}", self.operand(&spread.argument)?)),
                _ => match arg.as_expression() {
                    Some(expr) => out.push(self.operand(expr)?),
                    None => return Err(GenerateError::Unsupported { what: "argument" }),
                },
            }
        }
        Ok(out.join(", "))
    }

    fn type_arguments(&self, args: Option<&TSTypeParameterInstantiation<'a>>) -> GenResult {
        match args {
            Some(args) => Ok(self.slice(args.span)?.to_string()),
            None => Ok(String::new()),
        }
    }

    fn member(&mut self, member: &MemberExpression<'a>) -> GenResult {
        match member {
            MemberExpression::ComputedMemberExpression(m) => self.computed_member(m),
            MemberExpression::StaticMemberExpression(m) => self.static_member(m),
            MemberExpression::PrivateFieldExpression(m) => self.private_field(m),
        }
    }

    fn static_member(&mut self, member: &StaticMemberExpression<'a>) -> GenResult {
        let object = self.operand(&member.object)?;
        let dot = if member.optional { "?." } else { "." };
        Ok(format!("{}{}{}", object, dot, member.property.name))
    }

    fn computed_member(&mut self, member: &ComputedMemberExpression<'a>) -> GenResult {
        let object = self.operand(&member.object)?;
        let property = self.operand(&member.expression)?;
        let dot = if member.optional { "?." } else { "" };
        Ok(format!("{}{}[{}]", object, dot, property))
    }

    fn private_field(&mut self, member: &PrivateFieldExpression<'a>) -> GenResult {
        let object = self.operand(&member.object)?;
        let dot = if member.optional { "?." } else { "." };
        Ok(format!("{}{}#{}", object, dot, member.field.name))
    }

    fn template_literal(&mut self, template: &TemplateLiteral<'a>) -> GenResult {
        let mut out = String::from("`");
        for (i, quasi) in template.quasis.iter().enumerate() {
            out.push_str(quasi.value.raw.as_str());
            if let Some(expr) = template.expressions.get(i) {
                out.push_str("${");
                out.push_str(&self.operand(expr)?);
                out.push('}');
            }
        }
        out.push('`');
        Ok(out)
    }

    fn array(&mut self, array: &ArrayExpression<'a>) -> GenResult {
        let mut items = Vec::with_capacity(array.elements.len());
        for element in &array.elements {
            match element {
                ArrayExpressionElement::SpreadElement(spread) => {
                    items.push(format!("...{}", self.operand(&spread.argument)?))
                }
                ArrayExpressionElement::Elision(_) => items.push(String::new()),
                _ => match element.as_expression() {
                    Some(expr) => items.push(self.operand(expr)?),
                    None => return Err(GenerateError::Unsupported { what: "array element" }),
                },
            }
        }
        let trailing_hole = matches!(array.elements.last(), Some(ArrayExpressionElement::Elision(_)));
        Ok(format!("[{}{}]", items.join(", "), if trailing_hole { "," } else { "" }))
    }

    fn object(&mut self, object: &ObjectExpression<'a>) -> GenResult {
        if object.properties.is_empty() {
            return Ok("{}".to_string());
        }
        let mut props = Vec::with_capacity(object.properties.len());
        for property in &object.properties {
            match property {
                ObjectPropertyKind::SpreadProperty(spread) => {
                    props.push(format!("...{}", self.operand(&spread.argument)?))
                }
                ObjectPropertyKind::ObjectProperty(prop) => {
                    if prop.method || prop.kind != PropertyKind::Init {
                        props.push(self.splice(prop.span, |rw| rw.visit_object_property(prop))?);
                    } else if prop.shorthand {
                        props.push(self.operand(&prop.value)?);
                    } else {
                        let key = self.property_key(&prop.key, prop.computed)?;
                        let value = self.operand(&prop.value)?;
                        props.push(format!("{}: {}", key, value));
                    }
                }
            }
        }
        Ok(format!("{{ {} }}", props.join(", ")))
    }

    fn property_key(&mut self, key: &PropertyKey<'a>, computed: bool) -> GenResult {
        match key {
            PropertyKey::StaticIdentifier(ident) => Ok(ident.name.to_string()),
            PropertyKey::PrivateIdentifier(ident) => Ok(format!("#{}", ident.name)),
            _ => match key.as_expression() {
                Some(expr) if computed => Ok(format!("[{}]", self.operand(expr)?)),
                Some(expr) => Ok(self.node_text(expr.span())?.to_string()),
                None => Err(GenerateError::Unsupported { what: "property key" }),
            },
        }
    }

    fn arrow(&mut self, arrow: &ArrowFunctionExpression<'a>) -> GenResult {
        let header = self.splice(Span::new(arrow.span.start, arrow.body.span.start), |rw| {
            rw.visit_formal_parameters(&arrow.params)
        })?;
        let saved = std::mem::replace(&mut self.context, CodeContext::Function);
        let body = match arrow.get_expression() {
            Some(expr) => self.stringify(expr),
            None => self.splice(arrow.body.span, |rw| rw.visit_function_body(&arrow.body)),
        };
        self.context = saved;
        Ok(format!("{}{}", header, body?))
    }

    fn function(&mut self, func: &Function<'a>) -> GenResult {
        let Some(body) = &func.body else {
            return Ok(self.node_text(func.span)?.to_string());
        };
        let header = self.splice(Span::new(func.span.start, body.span.start), |rw| {
            rw.visit_formal_parameters(&func.params)
        })?;
        let saved = std::mem::replace(&mut self.context, CodeContext::Function);
        let body = self.splice(body.span, |rw| rw.visit_function_body(body));
        self.context = saved;
        Ok(format!("{}{}", header, body?))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Whether a zero-argument call on `callee` reads a reactive accessor.
pub fn is_accessor_callee(callee: &Expression) -> bool {
    match callee {
        Expression::Identifier(ident) => {
            let name = ident.name.as_str();
            !NON_REACTIVE_CALLS.contains(name) && !NON_REACTIVE_ROOTS.contains(name)
        }
        Expression::StaticMemberExpression(_)
        | Expression::ComputedMemberExpression(_)
        | Expression::PrivateFieldExpression(_) => match member_root(callee) {
            Some(Expression::Identifier(root)) => !NON_REACTIVE_ROOTS.contains(root.name.as_str()),
            Some(Expression::ThisExpression(_)) => true,
            _ => false,
        },
        _ => false,
    }
}

/// Innermost object of a member chain.
fn member_root<'b, 'a>(expr: &'b Expression<'a>) -> Option<&'b Expression<'a>> {
    let mut current = expr;
    loop {
        current = match current {
            Expression::StaticMemberExpression(m) => &m.object,
            Expression::ComputedMemberExpression(m) => &m.object,
            Expression::PrivateFieldExpression(m) => &m.object,
            Expression::Identifier(_) | Expression::ThisExpression(_) => return Some(current),
            _ => return None,
        };
    }
}

/// Shape-based guess at whether a child value can change after first render.
pub fn is_potentially_reactive(expr: &Expression) -> bool {
    match expr {
        Expression::Identifier(_)
        | Expression::StaticMemberExpression(_)
        | Expression::ComputedMemberExpression(_)
        | Expression::PrivateFieldExpression(_)
        | Expression::ArrowFunctionExpression(_)
        | Expression::FunctionExpression(_) => true,
        Expression::CallExpression(call) => matches!(
            call.callee.without_parentheses(),
            Expression::Identifier(_)
                | Expression::StaticMemberExpression(_)
                | Expression::ComputedMemberExpression(_)
                | Expression::PrivateFieldExpression(_)
        ),
        Expression::ChainExpression(chain) => match &chain.expression {
            ChainElement::CallExpression(call) => {
                matches!(call.callee, Expression::Identifier(_)) || call.callee.is_member_expression()
            }
            _ => true,
        },
        Expression::ParenthesizedExpression(p) => is_potentially_reactive(&p.expression),
        Expression::TSAsExpression(ts) => is_potentially_reactive(&ts.expression),
        Expression::TSSatisfiesExpression(ts) => is_potentially_reactive(&ts.expression),
        Expression::TSNonNullExpression(ts) => is_potentially_reactive(&ts.expression),
        _ => false,
    }
}
