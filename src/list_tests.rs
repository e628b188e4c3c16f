//! List-rendering tests: `array.map(...)` children compile to array materialization.

#[cfg(test)]
mod tests {
    use crate::list::match_list;
    use crate::options::CompileOptions;
    use crate::transform::compile;
    use oxc_allocator::Allocator;
    use oxc_ast::ast::Statement;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn client(source: &str) -> String {
        compile(source, "src/List.jsx", &CompileOptions::default())
            .unwrap()
            .unwrap()
            .code
    }

    fn is_list(code: &str) -> bool {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, code, SourceType::jsx()).parse();
        assert!(ret.errors.is_empty(), "parse errors: {:?}", ret.errors);
        let Some(Statement::ExpressionStatement(stmt)) = ret.program.body.first() else {
            panic!("expected expression statement");
        };
        match_list(&stmt.expression).is_some()
    }

    #[test]
    fn test_list_shape_detection() {
        assert!(is_list("items.map(i => i)"));
        assert!(is_list("(store.items).map(render)"));
        assert!(!is_list("items.map(a, b)"));
        assert!(!is_list("items?.map(i => i)"));
        assert!(!is_list("items.filter(i => i)"));
        assert!(!is_list("map(items)"));
    }

    #[test]
    fn test_keyed_list() {
        let code = client("const l = <ul>{items.map(i => <li key={i.id}>{i.name}</li>)}</ul>;");
        assert!(code.contains("const _tmpl$0 = _$template(\"<ul><!--#0--></ul>\");"), "{}", code);
        assert!(code.contains("const _tmpl$1 = _$template(\"<li><!--#0--></li>\");"), "{}", code);
        assert!(
            code.contains("_$mapArrayKeyed(_m$0.parentNode, _m$0, items, (i) => {\n"),
            "{}",
            code
        );
        assert!(code.contains("_$insert(_m$0.parentNode, i.name, _m$0);"), "{}", code);
        assert!(code.contains("}, (i) => i.id);"), "{}", code);
        assert!(!code.contains("_$insert(_m$0.parentNode, items"), "{}", code);
        assert!(code.contains("mapArrayKeyed as _$mapArrayKeyed"));
        assert!(!code.contains("mapArray as _$mapArray,"));
    }

    #[test]
    fn test_unkeyed_static_item() {
        let code = client("const l = <ul>{items.map(() => <li>x</li>)}</ul>;");
        assert!(
            code.contains("_$mapArray(_m$0.parentNode, _m$0, items, () => _$clone(_tmpl$1));"),
            "{}",
            code
        );
    }

    #[test]
    fn test_reactive_array_source() {
        let code = client("const l = <ul>{rows().map((r, idx) => <li key={idx}>{r}</li>)}</ul>;");
        assert!(code.contains("_$mapArrayKeyed(_m$0.parentNode, _m$0, rows, (r, idx) => {"), "{}", code);
        assert!(code.contains("}, (r, idx) => idx);"), "{}", code);
    }

    #[test]
    fn test_component_items() {
        let code = client("const l = <div>{users.map(u => <User key={u.id} user={u} />)}</div>;");
        assert!(
            code.contains(
                "_$mapArrayKeyed(_m$0.parentNode, _m$0, users, (u) => _$unwrapComponent(User(_$unwrapProps({ user: u }))), (u) => u.id);"
            ),
            "{}",
            code
        );
    }

    #[test]
    fn test_function_expression_callback() {
        let code = client("const l = <ul>{items.map(function (x) { return <li>{x}</li>; })}</ul>;");
        assert!(code.contains("_$mapArray(_m$0.parentNode, _m$0, items, (x) => {"), "{}", code);
    }

    #[test]
    fn test_opaque_callback_is_passed_through() {
        let code = client("const l = <ul>{items.map(renderItem)}</ul>;");
        assert!(code.contains("_$mapArray(_m$0.parentNode, _m$0, items, renderItem);"), "{}", code);
    }

    #[test]
    fn test_callback_with_statements_is_generated_whole() {
        let code = client("const l = <ul>{items.map(i => { const t = i.trim(); return <li>{t}</li>; })}</ul>;");
        assert!(code.contains("_$mapArray(_m$0.parentNode, _m$0, items, i => { const t = i.trim(); return (() => {"), "{}", code);
    }

    #[test]
    fn test_map_outside_a_child_slot_is_untouched() {
        let code = client("const l = items.map(i => <li>{i}</li>);");
        assert!(code.starts_with("import {"));
        assert!(code.contains("const l = items.map(i => (() => {"), "{}", code);
        assert!(!code.contains("_$mapArray("));
    }
}
