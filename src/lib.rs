//! # Sprig Compiler
//!
//! Compiles JSX-like markup embedded in JavaScript and TypeScript modules into
//! fine-grained DOM construction code for a signal-based runtime.
//!
//! ## Pipeline
//!
//! 1. **Sniff**: files without anything tag-shaped are returned untouched (`None`).
//! 2. **Parse**: oxc parses the module; any diagnostic fails the file.
//! 3. **Rewrite**: every outermost element or fragment is replaced in the source buffer
//!    by generated code. Nested markup is generated recursively, never revisited.
//! 4. **Assemble**: interned templates and a helper import naming only the helpers the
//!    output references are prepended.
//!
//! ## Output shape
//!
//! - Static subtrees become `_$clone(_tmpl$N)`.
//! - Dynamic subtrees clone a template holding `<!--#N-->` markers, then bind each
//!   attribute and child slot.
//! - Components become `_$unwrapComponent(Comp(_$unwrapProps({ ... })))`.
//! - `array.map(item => <li key={...}/>)` becomes a keyed list materialization.
//!
//! The server target renders the same skeleton to string chunks so marker ids agree
//! with the client during hydration.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod codegen;
mod component;
mod discovery;
mod element;
mod error;
mod host;
mod jsx;
mod list;
mod options;
mod ssr;
mod static_eval;
mod template;
mod transform;
mod visitor;

#[cfg(test)]
mod codegen_tests;
#[cfg(test)]
mod component_tests;
#[cfg(test)]
mod list_tests;
#[cfg(test)]
mod safety_tests;

pub use codegen::{CodeContext, Emitter};
pub use discovery::{compile_directory, discover_sources};
pub use error::{CompilerError, ErrorCode, GenResult, GenerateError, SourceLocation};
pub use host::{should_transform, transform, transform_batch, FileOutcome, SourceFile};
pub use options::{CompileOptions, HostOptions, Target};
pub use static_eval::{is_static, LiteralValue};
pub use template::{
    marker_skeleton_of, template_html_of, DynamicPart, MarkerCounter, PartKind, PartValue, Skeleton, Template,
    TemplateManager,
};
pub use transform::{compile, contains_markup, CompileResult, Compiler};

// ═══════════════════════════════════════════════════════════════════════════════
// NODE BINDING
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi(object)]
pub struct NativeTransformOutput {
    pub code: String,
    pub map: Option<String>,
}

/// Host entry point for Node build tools. Errors carry the JSON form of [`CompilerError`].
#[cfg(feature = "napi")]
#[napi]
pub fn transform_native(
    code: String,
    id: String,
    ssr: bool,
    options_json: Option<String>,
) -> napi::Result<Option<NativeTransformOutput>> {
    let options = HostOptions::from_json(options_json.as_deref().unwrap_or_default())
        .map_err(|e| napi::Error::from_reason(format!("invalid options: {}", e)))?;
    match host::transform(&code, &id, ssr, &options) {
        Ok(result) => Ok(result.map(|r| NativeTransformOutput {
            code: r.code,
            map: r.source_map,
        })),
        Err(err) => Err(napi::Error::from_reason(err.to_json())),
    }
}
