//! Prompt template rendering.
//!
//! Templates use a small `{{variable}}` syntax:
//! - `{{variable}}` is replaced with the value of `variable`
//! - `{{#if variable}}content{{/if}}` includes content only if variable is set
//! - `{{#if variable}}content{{else}}alternative{{/if}}` with else support
//!
//! Rendering is a single pass over the template. Argument values are copied
//! into the output verbatim and never scanned for tags, so `{{ }}` inside a
//! value survives untouched. Placeholders for arguments that were not
//! supplied render as nothing.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::dispatch::{ArgumentRecord, DispatchError, Handler, HandlerOutput};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const IF_OPEN: &str = "{{#if ";
const ELSE_TAG: &str = "{{else}}";
const ENDIF_TAG: &str = "{{/if}}";

/// A prompt template bound to one registered prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    template: &'static str,
}

impl PromptTemplate {
    pub fn new(template: &'static str) -> Self {
        Self { template }
    }

    /// Render the template with the given arguments.
    pub fn render(&self, arguments: &HashMap<String, String>) -> Result<String, DispatchError> {
        let mut out = String::with_capacity(self.template.len());
        render_into(self.template, arguments, &mut out)?;
        Ok(out)
    }
}

#[async_trait]
impl Handler for PromptTemplate {
    async fn handle(&self, args: &ArgumentRecord) -> Result<HandlerOutput, DispatchError> {
        self.render(&args.to_string_map()).map(Into::into)
    }
}

fn template_error(msg: &str) -> DispatchError {
    DispatchError::internal(format!("prompt template: {}", msg))
}

/// Render `template` into `out`, expanding tags as they are met.
fn render_into(
    template: &str,
    arguments: &HashMap<String, String>,
    out: &mut String,
) -> Result<(), DispatchError> {
    let mut rest = template;

    while let Some(open) = rest.find(OPEN) {
        out.push_str(&rest[..open]);
        let tagged = &rest[open..];

        let Some(close) = tagged.find(CLOSE) else {
            if tagged.starts_with(IF_OPEN) {
                return Err(template_error("unclosed {{#if}} tag"));
            }
            out.push_str(tagged);
            return Ok(());
        };
        let tag = tagged[OPEN.len()..close].trim();
        let after = &tagged[close + CLOSE.len()..];

        if let Some(var_name) = tag.strip_prefix("#if ") {
            let (block, remainder) = split_block(after)?;
            let (when_set, when_unset) = split_else(block);
            let is_set = arguments
                .get(var_name.trim())
                .is_some_and(|v| !v.is_empty());

            render_into(if is_set { when_set } else { when_unset }, arguments, out)?;
            rest = remainder;
        } else if tag == "else" || tag == "/if" {
            return Err(template_error(&format!("unexpected {{{{{}}}}} tag", tag)));
        } else {
            if let Some(value) = arguments.get(tag) {
                out.push_str(value);
            }
            rest = after;
        }
    }

    out.push_str(rest);
    Ok(())
}

/// Split the text after an `{{#if}}` tag into its body and what follows the
/// matching `{{/if}}`. Nested blocks are balanced.
fn split_block(text: &str) -> Result<(&str, &str), DispatchError> {
    let mut depth = 1usize;
    let mut pos = 0;

    loop {
        let close = text[pos..]
            .find(ENDIF_TAG)
            .map(|i| pos + i)
            .ok_or_else(|| template_error("missing {{/if}} tag"))?;

        match text[pos..].find(IF_OPEN).map(|i| pos + i) {
            Some(open) if open < close => {
                depth += 1;
                pos = open + IF_OPEN.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&text[..close], &text[close + ENDIF_TAG.len()..]));
                }
                pos = close + ENDIF_TAG.len();
            }
        }
    }
}

/// Split a block body at its top-level `{{else}}`, if any.
fn split_else(block: &str) -> (&str, &str) {
    let mut depth = 0usize;
    let mut pos = 0;

    while let Some(i) = block[pos..].find(OPEN) {
        let at = pos + i;
        let tail = &block[at..];
        if tail.starts_with(IF_OPEN) {
            depth += 1;
        } else if tail.starts_with(ENDIF_TAG) {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && tail.starts_with(ELSE_TAG) {
            return (&block[..at], &block[at + ELSE_TAG.len()..]);
        }
        pos = at + OPEN.len();
    }

    (block, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_simple_substitution() {
        let template = PromptTemplate::new("Hello, {{name}}!");
        let result = template.render(&args(&[("name", "World")])).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_conditional_with_value() {
        let template = PromptTemplate::new("Hello{{#if name}}, {{name}}{{/if}}!");
        let result = template.render(&args(&[("name", "World")])).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_conditional_without_value() {
        let template = PromptTemplate::new("Hello{{#if name}}, {{name}}{{/if}}!");
        let result = template.render(&HashMap::new()).unwrap();
        assert_eq!(result, "Hello!");
    }

    #[test]
    fn test_conditional_with_else() {
        let template = PromptTemplate::new("Hello, {{#if name}}{{name}}{{else}}stranger{{/if}}!");
        let result = template.render(&HashMap::new()).unwrap();
        assert_eq!(result, "Hello, stranger!");
    }

    #[test]
    fn test_unmatched_placeholder_removed() {
        let template = PromptTemplate::new("[{{missing}}]");
        assert_eq!(template.render(&HashMap::new()).unwrap(), "[]");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let template = PromptTemplate::new("{{code}} / {{language}}");
        let result = template
            .render(&args(&[
                ("code", "let s = \"{{language}}\"; {{ user.name }} {{}}"),
                ("language", "rust"),
            ]))
            .unwrap();
        assert_eq!(result, "let s = \"{{language}}\"; {{ user.name }} {{}} / rust");
    }

    #[test]
    fn test_value_with_if_tag_is_literal() {
        let template = PromptTemplate::new("{{#if a}}[{{a}}]{{/if}}");
        let result = template.render(&args(&[("a", "{{#if b}}x{{/if}}")])).unwrap();
        assert_eq!(result, "[{{#if b}}x{{/if}}]");
    }

    #[test]
    fn test_nested_conditionals() {
        let template =
            PromptTemplate::new("{{#if a}}A{{#if b}}B{{else}}b{{/if}}{{else}}none{{/if}}.");
        assert_eq!(template.render(&args(&[("a", "1")])).unwrap(), "Ab.");
        assert_eq!(template.render(&args(&[("a", "1"), ("b", "1")])).unwrap(), "AB.");
        assert_eq!(template.render(&HashMap::new()).unwrap(), "none.");
    }

    #[test]
    fn test_stray_else_is_internal() {
        let template = PromptTemplate::new("oops {{else}}");
        let err = template.render(&HashMap::new()).unwrap_err();
        assert!(matches!(err, DispatchError::Internal(_)));
    }

    #[test]
    fn test_malformed_template_is_internal() {
        let template = PromptTemplate::new("{{#if name}}never closed");
        let err = template.render(&HashMap::new()).unwrap_err();
        assert!(matches!(err, DispatchError::Internal(_)));
    }
}
