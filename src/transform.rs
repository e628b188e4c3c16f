//! Orchestrator
//!
//! Compiles one source file: parses it with oxc, rewrites every top-level piece of markup
//! in the source buffer, then prepends the runtime import and the interned templates.
//! Every failure leaves as exactly one [`CompilerError`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast_visit::Visit;
use oxc_parser::{Parser, ParserReturn};
use oxc_span::SourceType;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::codegen::Emitter;
use crate::error::{CompilerError, ErrorCode, SourceLocation};
use crate::jsx::js_string;
use crate::options::{CompileOptions, Target};
use crate::template::TemplateManager;
use crate::visitor::{apply_replacements, MarkupRewriter};

lazy_static! {
    /// Cheap check for anything that could open a tag or fragment.
    static ref MARKUP_SNIFF: Regex = Regex::new(r"<[A-Za-z>]").unwrap();
}

/// Helpers the client output may import, in import order.
pub const CLIENT_HELPERS: &[&str] = &[
    "template",
    "clone",
    "insert",
    "effect",
    "setProp",
    "delegate",
    "spread",
    "mapArray",
    "mapArrayKeyed",
    "findMarker",
    "unwrapProps",
    "unwrapComponent",
];

/// Helpers the server output may import, in import order.
pub const SERVER_HELPERS: &[&str] = &["ssr", "escape", "ssrAttr", "ssrSpread", "unwrapProps", "unwrapComponent"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    pub code: String,
    /// Source maps are not generated; always `None`.
    pub source_map: Option<String>,
}

pub fn contains_markup(source: &str) -> bool {
    MARKUP_SNIFF.is_match(source)
}

/// Parser configuration for a file id. Query strings are ignored.
pub fn source_type_for(file_id: &str) -> SourceType {
    let path = file_id.split(['?', '#']).next().unwrap_or(file_id);
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let (typescript, jsx) = match extension {
        "ts" | "mts" | "cts" => (true, false),
        "js" | "mjs" | "cjs" | "jsx" => (false, true),
        _ => (true, true),
    };
    SourceType::default()
        .with_module(true)
        .with_typescript(typescript)
        .with_jsx(jsx)
}

/// Names of the helpers referenced as `_$name(` anywhere in `texts`.
pub fn used_helpers<'h>(helpers: &[&'h str], texts: &[&str]) -> Vec<&'h str> {
    helpers
        .iter()
        .copied()
        .filter(|name| {
            let call = format!("_${}(", name);
            texts.iter().any(|text| text.contains(&call))
        })
        .collect()
}

/// Compiles source files one at a time. Reuse across files is safe: all per-file state
/// is reset at the start of each call.
pub struct Compiler {
    options: CompileOptions,
    templates: TemplateManager,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Compiler {
            options,
            templates: TemplateManager::new(),
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// `Ok(None)` when the file contains no markup.
    pub fn compile(&mut self, source: &str, file_id: &str) -> Result<Option<CompileResult>, CompilerError> {
        if !contains_markup(source) {
            tracing::debug!(file = file_id, "no markup, skipping");
            return Ok(None);
        }
        self.templates.reset_counter();

        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, source_type_for(file_id)).parse();
        if ret.panicked || !ret.errors.is_empty() {
            return Err(parse_error(&ret, source, file_id));
        }
        let program = ret.program;

        let options = &self.options;
        let templates = &mut self.templates;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut emitter = Emitter::new(source, options, templates);
            let mut rewriter = MarkupRewriter::new(&mut emitter);
            rewriter.visit_program(&program);
            rewriter.finish()
        }));

        let replacements = match outcome {
            Ok(Ok(replacements)) => replacements,
            Ok(Err(err)) => return Err(CompilerError::from_generate(err, file_id, source)),
            Err(payload) => {
                return Err(CompilerError::new(
                    ErrorCode::Unclassified,
                    file_id,
                    "code generation aborted unexpectedly",
                )
                .with_cause(panic_message(payload.as_ref())))
            }
        };

        if replacements.is_empty() {
            tracing::debug!(file = file_id, "no markup nodes after parsing");
            return Ok(None);
        }

        let roots = replacements.len();
        let body = apply_replacements(source, 0, replacements);
        let code = self.assemble(&body);
        tracing::debug!(
            file = file_id,
            target = ?self.options.target,
            roots,
            templates = self.templates.len(),
            "compiled"
        );

        Ok(Some(CompileResult {
            code,
            source_map: None,
        }))
    }

    /// Import line, template declarations, then the rewritten body.
    fn assemble(&self, body: &str) -> String {
        let server = self.options.target == Target::Server;
        let declarations = self
            .templates
            .templates()
            .iter()
            .map(|t| {
                if server {
                    format!("const {} = {};", t.id, t.html)
                } else {
                    format!("const {} = _$template({});", t.id, js_string(&t.html))
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        let helpers = if server { SERVER_HELPERS } else { CLIENT_HELPERS };
        let used = used_helpers(helpers, &[&declarations, body]);

        let mut out = String::with_capacity(body.len() + declarations.len() + 128);
        if !used.is_empty() {
            let specifiers = used
                .iter()
                .map(|name| format!("{} as _${}", name, name))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "import {{ {} }} from {};\n",
                specifiers,
                js_string(self.options.runtime_module())
            ));
        }
        if !declarations.is_empty() {
            out.push_str(&declarations);
            out.push('\n');
        }
        out.push_str(body);
        out
    }
}

/// Compiles one file with a fresh compiler.
pub fn compile(source: &str, file_id: &str, options: &CompileOptions) -> Result<Option<CompileResult>, CompilerError> {
    Compiler::new(options.clone()).compile(source, file_id)
}

fn parse_error(ret: &ParserReturn<'_>, source: &str, file_id: &str) -> CompilerError {
    let Some(first) = ret.errors.first() else {
        return CompilerError::new(ErrorCode::Parse, file_id, "parser aborted");
    };
    let mut error = CompilerError::new(ErrorCode::Parse, file_id, first.message.to_string());
    let offset = first
        .labels
        .as_ref()
        .and_then(|labels| labels.first())
        .map(|label| label.offset());
    if let Some(offset) = offset {
        error = error.with_location(SourceLocation::from_offset(source, offset as u32));
    }
    let cause = ret
        .errors
        .iter()
        .map(|e| e.message.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    error.with_cause(cause)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
