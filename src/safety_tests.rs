//! Safety gate tests for compiler invariants:
//! - a compilation fully succeeds or fails with exactly one error
//! - no state leaks between compilation units
//! - generation is deterministic

#[cfg(test)]
mod tests {
    use crate::error::{CompilerError, ErrorCode, GenerateError};
    use crate::host::{transform_batch, SourceFile};
    use crate::options::{CompileOptions, HostOptions};
    use crate::transform::{compile, Compiler};

    // ═══════════════════════════════════════════════════════════════════════════════
    // ERROR NORMALIZATION
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_invalid_input_yields_one_error() {
        let sources = [
            "const x = <div>;",
            "const x = <div></span>;",
            "const x = <p>{</p>;",
            "const = <p/>;",
        ];
        for source in sources {
            let result = compile(source, "src/Bad.jsx", &CompileOptions::default());
            let err = result.expect_err(source);
            assert_eq!(err.code, ErrorCode::Parse, "{}", source);
            assert_eq!(err.file_id, "src/Bad.jsx");
            assert!(err.cause.is_some());
        }
    }

    #[test]
    fn test_error_json_shape() {
        let err = compile("const x = <div>;", "src/Bad.jsx", &CompileOptions::default()).unwrap_err();
        let json: serde_json::Value = serde_json::from_str(&err.to_json()).unwrap();
        assert_eq!(json["code"], "PARSE_ERROR");
        assert_eq!(json["fileId"], "src/Bad.jsx");
        assert!(json["location"]["line"].as_u64().unwrap() >= 1);
    }

    #[test]
    fn test_position_loss_maps_to_its_code() {
        let source = "let a = <p/>;";
        let err = CompilerError::from_generate(GenerateError::PositionLost { start: 8, end: 12 }, "a.jsx", source);
        assert_eq!(err.code, ErrorCode::PositionLost);
        assert_eq!(err.location.map(|l| (l.line, l.column)), Some((1, 9)));

        let err = CompilerError::from_generate(GenerateError::Unsupported { what: "argument" }, "a.jsx", source);
        assert_eq!(err.code, ErrorCode::Unclassified);
        assert_eq!(err.location, None);
    }

    #[test]
    fn test_failed_compile_does_not_poison_the_next() {
        let mut compiler = Compiler::new(CompileOptions::default());
        assert!(compiler.compile("const x = <div>;", "bad.jsx").is_err());
        let ok = compiler.compile("const y = <p>ok</p>;", "good.jsx").unwrap().unwrap();
        assert!(ok.code.contains("const _tmpl$0 = _$template(\"<p>ok</p>\");"));
        assert!(!ok.code.contains("_tmpl$1"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // ISOLATION
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_generation_is_deterministic() {
        let source = "const v = <div class={c} onClick={go}>{a}<span>{b}</span>{list.map(x => <i key={x}>{x}</i>)}</div>;";
        let first = compile(source, "a.jsx", &CompileOptions::default()).unwrap().unwrap();
        let second = compile(source, "a.jsx", &CompileOptions::default()).unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_units_do_not_share_state() {
        let files: Vec<SourceFile> = (0..32)
            .map(|i| SourceFile {
                id: format!("src/C{}.jsx", i),
                code: format!("export const C{} = () => <p>item {}</p>;", i, i),
            })
            .collect();
        let outcomes = transform_batch(&files, false, &HostOptions::default());
        assert_eq!(outcomes.len(), files.len());
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.id, format!("src/C{}.jsx", i));
            let code = &outcome.result.as_ref().unwrap().as_ref().unwrap().code;
            assert!(code.contains(&format!("const _tmpl$0 = _$template(\"<p>item {}</p>\");", i)), "{}", code);
            assert!(!code.contains("_tmpl$1"));
        }
    }

    #[test]
    fn test_generated_helpers_are_all_imported() {
        let source = "const v = <div {...p} title={t} onInput={f}>{a}{xs.map(x => <b key={x}>{x}</b>)}<Card /></div>;";
        let code = compile(source, "a.jsx", &CompileOptions::default()).unwrap().unwrap().code;
        let import = code.lines().next().unwrap();
        for helper in [
            "template", "clone", "insert", "effect", "setProp", "delegate", "spread", "mapArrayKeyed",
            "findMarker", "unwrapProps", "unwrapComponent",
        ] {
            assert!(import.contains(&format!("{} as _${}", helper, helper)), "missing {}", helper);
        }
        assert!(!import.contains("mapArray as"));
    }
}
