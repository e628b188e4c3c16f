//! Expression generation tests across code contexts.

#[cfg(test)]
mod tests {
    use crate::codegen::{is_accessor_callee, is_potentially_reactive, CodeContext, Emitter};
    use crate::options::CompileOptions;
    use crate::template::TemplateManager;
    use oxc_allocator::Allocator;
    use oxc_ast::ast::{Expression, Statement};
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn with_expression<R>(code: &str, check: impl for<'a> FnOnce(&Expression<'a>, &'a str) -> R) -> R {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, code, SourceType::jsx()).parse();
        assert!(ret.errors.is_empty(), "parse errors: {:?}", ret.errors);
        let Some(Statement::ExpressionStatement(stmt)) = ret.program.body.first() else {
            panic!("expected expression statement");
        };
        check(&stmt.expression, code)
    }

    fn generate(code: &str, context: CodeContext) -> String {
        let options = CompileOptions::default();
        let mut templates = TemplateManager::new();
        with_expression(code, |expr, source| {
            let mut emitter = Emitter::new(source, &options, &mut templates);
            emitter.stringify_in(expr, context).unwrap()
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // REACTIVE CONTEXT
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_reactive_accessor_passed_by_reference() {
        assert_eq!(generate("count()", CodeContext::Reactive), "count");
        assert_eq!(generate("store.user.name()", CodeContext::Reactive), "store.user.name");
        assert_eq!(generate("this.value()", CodeContext::Reactive), "this.value");
    }

    #[test]
    fn test_reactive_context_keeps_non_accessor_calls() {
        assert_eq!(generate("Math.random()", CodeContext::Reactive), "Math.random()");
        assert_eq!(generate("fetch()", CodeContext::Reactive), "fetch()");
        assert_eq!(generate("format(count)", CodeContext::Reactive), "format(count)");
        assert_eq!(generate("load?.()", CodeContext::Reactive), "load?.()");
        assert_eq!(generate("make()()", CodeContext::Reactive), "make()()");
    }

    #[test]
    fn test_operands_of_compound_expressions_are_evaluated() {
        assert_eq!(generate("count() + 1", CodeContext::Reactive), "count() + 1");
        assert_eq!(generate("ok() ? a() : b()", CodeContext::Reactive), "ok() ? a() : b()");
        assert_eq!(generate("`n=${count()}`", CodeContext::Reactive), "`n=${count()}`");
        assert_eq!(generate("!done()", CodeContext::Reactive), "!done()");
    }

    #[test]
    fn test_parentheses_preserve_context() {
        assert_eq!(generate("(count())", CodeContext::Reactive), "(count)");
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // EVENT / FUNCTION CONTEXT
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_handler_calls_stay_explicit() {
        assert_eq!(
            generate("() => count(count() + 1)", CodeContext::Event),
            "() => count(count() + 1)"
        );
        assert_eq!(generate("count()", CodeContext::Event), "count()");
    }

    #[test]
    fn test_nested_functions_are_not_rewritten_in_reactive_context() {
        assert_eq!(generate("() => count()", CodeContext::Reactive), "() => count()");
        assert_eq!(
            generate("(function (e) { set(e.target.value()); })", CodeContext::Reactive),
            "(function (e) { set(e.target.value()); })"
        );
    }

    #[test]
    fn test_arrow_header_is_preserved() {
        assert_eq!(generate("async (a, b = 2) => a + b", CodeContext::Static), "async (a, b = 2) => a + b");
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // SHAPES
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_literal_and_container_shapes() {
        assert_eq!(generate("[1, , ...rest]", CodeContext::Static), "[1, , ...rest]");
        assert_eq!(generate("({ a: 1, b, [k]: v, ...o })", CodeContext::Static), "({ a: 1, b, [k]: v, ...o })");
        assert_eq!(generate("typeof x === 'string'", CodeContext::Static), "typeof x === 'string'");
        assert_eq!(generate("new Map(entries)", CodeContext::Static), "new Map(entries)");
        assert_eq!(generate("a?.b?.[c]", CodeContext::Static), "a?.b?.[c]");
        assert_eq!(generate("- -x", CodeContext::Static), "- -x");
    }

    #[test]
    fn test_markup_inside_function_body_is_rewritten() {
        let options = CompileOptions::default();
        let mut templates = TemplateManager::new();
        let code = "() => { return <p>hi</p>; }";
        let out = with_expression(code, |expr, source| {
            let mut emitter = Emitter::new(source, &options, &mut templates);
            emitter.stringify_in(expr, CodeContext::Static).unwrap()
        });
        assert_eq!(out, "() => { return _$clone(_tmpl$0); }");
        assert_eq!(templates.templates()[0].html, "<p>hi</p>");
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // CLASSIFICATION
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_accessor_callee_classification() {
        let cases = [
            ("count", true),
            ("user.name", true),
            ("console.log", false),
            ("setTimeout", false),
            ("make()", false),
        ];
        for (code, expected) in cases {
            with_expression(code, |expr, _| {
                assert_eq!(is_accessor_callee(expr), expected, "{}", code);
            });
        }
    }

    #[test]
    fn test_potentially_reactive_shapes() {
        let cases = [
            ("count", true),
            ("count()", true),
            ("props.item.label", true),
            ("() => x", true),
            ("(count)", true),
            ("`text`", false),
            ("a + b", false),
            ("cond ? a : b", false),
            ("42", false),
        ];
        for (code, expected) in cases {
            with_expression(code, |expr, _| {
                assert_eq!(is_potentially_reactive(expr), expected, "{}", code);
            });
        }
    }
}
