
#[cfg(test)]
mod tests {
    use crate::component::prop_key;
    use crate::options::CompileOptions;
    use crate::transform::compile;

    fn client(source: &str) -> String {
        compile(source, "src/App.jsx", &CompileOptions::default())
            .unwrap()
            .unwrap()
            .code
    }

    #[test]
    fn test_component_call_shape() {
        let code = client(r#"const c = <Card title="Hi" count={n} onSelect={() => pick()} />;"#);
        assert_eq!(
            code,
            concat!(
                "import { unwrapProps as _$unwrapProps, unwrapComponent as _$unwrapComponent } from \"sprig/dom\";\n",
                "const c = _$unwrapComponent(Card(_$unwrapProps({ title: \"Hi\", count: n, onSelect: () => pick() })));",
            )
        );
    }

    #[test]
    fn test_reactive_prop_passes_accessor() {
        let code = client("const c = <Counter value={count()} />;");
        assert!(code.contains("Counter(_$unwrapProps({ value: count }))"), "{}", code);
    }

    #[test]
    fn test_prop_names_and_flags() {
        let code = client(r#"const c = <Icon aria-label="x" checked key={id} />;"#);
        assert!(code.contains(r#"Icon(_$unwrapProps({ "aria-label": "x", checked: true }))"#), "{}", code);
    }

    #[test]
    fn test_member_tag() {
        let code = client(r#"const c = <UI.Button label="a" />;"#);
        assert!(code.contains(r#"_$unwrapComponent(UI.Button(_$unwrapProps({ label: "a" })))"#));
    }

    #[test]
    fn test_children_single_and_many() {
        let one = client("const c = <Card>hello</Card>;");
        assert!(one.contains(r#"Card(_$unwrapProps({ children: "hello" }))"#), "{}", one);

        let many = client("const c = <List>{a}{b}</List>;");
        assert!(many.contains("List(_$unwrapProps({ children: [a, b] }))"), "{}", many);

        let element = client("const c = <Layout><p>x</p></Layout>;");
        assert!(element.contains("Layout(_$unwrapProps({ children: _$clone(_tmpl$0) }))"), "{}", element);
        assert!(element.contains("const _tmpl$0 = _$template(\"<p>x</p>\");"));
    }

    #[test]
    fn test_space_between_slots_is_one_space() {
        let code = client("const c = <Card>{a} {b}</Card>;");
        assert!(code.contains(r#"Card(_$unwrapProps({ children: [a, " ", b] }))"#), "{}", code);
    }

    #[test]
    fn test_child_spread_is_always_an_array() {
        let code = client("const c = <List>{...items}</List>;");
        assert!(code.contains("List(_$unwrapProps({ children: [...items] }))"), "{}", code);
    }

    #[test]
    fn test_spread_props_merge_in_order() {
        let code = client(r#"const c = <Card a="1" {...rest} id="x" />;"#);
        assert!(
            code.contains(r#"Card(_$unwrapProps(Object.assign({}, { a: "1" }, rest, { id: "x" })))"#),
            "{}",
            code
        );
    }

    #[test]
    fn test_conditional_component_defers_condition() {
        let code = client("const c = <Show when={count() > 0}>yes</Show>;");
        assert!(
            code.contains(r#"Show(_$unwrapProps({ when: () => count() > 0, children: "yes" }))"#),
            "{}",
            code
        );

        let plain = client("const c = <Show when={visible}>yes</Show>;");
        assert!(plain.contains("when: visible"), "{}", plain);
    }

    #[test]
    fn test_conditional_component_name_is_configurable() {
        let options = CompileOptions {
            conditional_component: "If".to_string(),
            condition_prop: "test".to_string(),
            ..CompileOptions::default()
        };
        let code = compile("const c = <If test={a && b}>x</If>;", "a.jsx", &options)
            .unwrap()
            .unwrap()
            .code;
        assert!(code.contains("test: () => a && b"), "{}", code);
    }

    #[test]
    fn test_component_inside_element_uses_marker() {
        let code = client("const v = <div><Card /></div>;");
        assert!(code.contains("_$template(\"<div><!--#0--></div>\")"));
        assert!(
            code.contains("_$insert(_m$0.parentNode, _$unwrapComponent(Card(_$unwrapProps({}))), _m$0); _m$0.remove();"),
            "{}",
            code
        );
    }

    #[test]
    fn test_prop_key_quoting() {
        assert_eq!(prop_key("title"), "title");
        assert_eq!(prop_key("$x"), "$x");
        assert_eq!(prop_key("data-id"), "\"data-id\"");
    }
}
