//! Small helpers over JSX syntax shared by the generators: tag names, text cleanup,
//! entity decoding and HTML escaping.

use std::collections::HashSet;

use lazy_static::lazy_static;
use oxc_ast::ast::{JSXAttributeName, JSXElementName, JSXMemberExpressionObject};

lazy_static! {
    static ref VOID_ELEMENTS: HashSet<&'static str> = [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect();
}

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(tag)
}

/// Check if a tag name refers to a component (starts with uppercase).
pub fn is_component_tag(tag: &str) -> bool {
    tag.chars().next().is_some_and(|c| c.is_uppercase())
}

/// Source text of a tag reference: `div`, `svg:rect`, `UI.Button`, `this.Item`.
pub fn element_name(name: &JSXElementName) -> String {
    match name {
        JSXElementName::Identifier(ident) => ident.name.to_string(),
        JSXElementName::IdentifierReference(ident) => ident.name.to_string(),
        JSXElementName::NamespacedName(ns) => format!("{}:{}", ns.namespace.name, ns.name.name),
        JSXElementName::MemberExpression(member) => member_name(member),
        JSXElementName::ThisExpression(_) => "this".to_string(),
    }
}

fn member_name(member: &oxc_ast::ast::JSXMemberExpression) -> String {
    let object = match &member.object {
        JSXMemberExpressionObject::IdentifierReference(ident) => ident.name.to_string(),
        JSXMemberExpressionObject::MemberExpression(inner) => member_name(inner),
        JSXMemberExpressionObject::ThisExpression(_) => "this".to_string(),
    };
    format!("{}.{}", object, member.property.name)
}

pub fn attribute_name(name: &JSXAttributeName) -> String {
    match name {
        JSXAttributeName::Identifier(ident) => ident.name.to_string(),
        JSXAttributeName::NamespacedName(ns) => format!("{}:{}", ns.namespace.name, ns.name.name),
    }
}

/// HTML spelling of a JSX attribute written inline into a template.
pub fn html_attribute_name(name: &str) -> &str {
    match name {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    }
}

/// Event type for handler attributes: `onClick` → `click`, `on:input` → `input`.
pub fn event_name(attr: &str) -> Option<String> {
    if let Some(rest) = attr.strip_prefix("on:") {
        return (!rest.is_empty()).then(|| rest.to_string());
    }
    let rest = attr.strip_prefix("on")?;
    if rest.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        Some(rest.to_ascii_lowercase())
    } else {
        None
    }
}

/// Collapses JSX text the way JSX does: lines are trimmed at their inner edges,
/// whitespace-only lines vanish, and surviving lines join with one space.
pub fn clean_jsx_text(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let last_non_empty = lines
        .iter()
        .rposition(|line| line.chars().any(|c| !matches!(c, ' ' | '\t')));

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let mut text = line.replace('\t', " ");
        if i != 0 {
            text = text.trim_start_matches(' ').to_string();
        }
        if i != lines.len() - 1 {
            text = text.trim_end_matches(' ').to_string();
        }
        if text.is_empty() {
            continue;
        }
        out.push_str(&text);
        if last_non_empty.is_some_and(|last| i < last) {
            out.push(' ');
        }
    }
    out
}

/// Decodes the character references JSX text and attribute strings may carry.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &tail[1..end];
            decode_entity(entity).map(|c| (c, end + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(num) = entity.strip_prefix('#') {
        let code = match num.strip_prefix(|c: char| c == 'x' || c == 'X') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "copy" => Some('\u{a9}'),
        "reg" => Some('\u{ae}'),
        "hellip" => Some('\u{2026}'),
        "mdash" => Some('\u{2014}'),
        "ndash" => Some('\u{2013}'),
        "times" => Some('\u{d7}'),
        "middot" => Some('\u{b7}'),
        _ => None,
    }
}

pub fn escape_html_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_html_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

/// JS string literal for `text`, double-quoted.
pub fn js_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text.escape_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_jsx_text() {
        assert_eq!(clean_jsx_text("Hello world"), "Hello world");
        assert_eq!(clean_jsx_text("\n    Hello\n    world\n  "), "Hello world");
        assert_eq!(clean_jsx_text("\n   \n  "), "");
        assert_eq!(clean_jsx_text(" trailing "), " trailing ");
        assert_eq!(clean_jsx_text("Count: "), "Count: ");
    }

    #[test]
    fn test_single_line_whitespace_is_kept_as_is() {
        assert_eq!(clean_jsx_text(" "), " ");
        assert_eq!(clean_jsx_text("   "), "   ");
        assert_eq!(clean_jsx_text("\t"), " ");
        assert_eq!(clean_jsx_text("a\n  \n  b"), "a b");
    }

    #[test]
    fn test_event_name() {
        assert_eq!(event_name("onClick").as_deref(), Some("click"));
        assert_eq!(event_name("onMouseMove").as_deref(), Some("mousemove"));
        assert_eq!(event_name("on:custom-event").as_deref(), Some("custom-event"));
        assert_eq!(event_name("online"), None);
        assert_eq!(event_name("title"), None);
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(escape_html_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_html_attribute(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(js_string("a\"b\n"), r#""a\"b\n""#);
    }
}
