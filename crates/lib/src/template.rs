//! Name template parsing and rendering.
//!
//! Build parameters describe output names with a small, closed set of
//! placeholders that are bound per product and version:
//!
//! - `{{Product}}` - the product identifier
//! - `{{Version}}` - the resolved project version
//!
//! Whitespace inside the delimiters is ignored, so `{{ Product }}` is the same
//! placeholder as `{{Product}}`. Any other name is rejected rather than passed
//! through, and a `{{` without a matching `}}` is a syntax error.
//!
//! # Example
//!
//! ```
//! use distplan_lib::template::{parse, render, Placeholder, Segment, TemplateContext};
//!
//! let segments = parse("{{Product}}-bin").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Placeholder(Placeholder::Product),
//!     Segment::Literal("-bin".to_string()),
//! ]);
//!
//! let ctx = TemplateContext::new("svc", "2.0.0");
//! assert_eq!(render("{{Product}}-{{Version}}", &ctx).unwrap(), "svc-2.0.0");
//! ```

use thiserror::Error;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A recognized placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
  /// `{{Product}}`
  Product,
  /// `{{Version}}`
  Version,
}

impl Placeholder {
  /// All placeholders a template may reference.
  pub const ALL: [Placeholder; 2] = [Placeholder::Product, Placeholder::Version];

  pub fn name(self) -> &'static str {
    match self {
      Placeholder::Product => "Product",
      Placeholder::Version => "Version",
    }
  }

  fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|p| p.name() == name)
  }
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text copied as-is.
  Literal(String),

  /// A placeholder bound at render time.
  Placeholder(Placeholder),
}

/// Errors that can occur while parsing or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
  #[error("unclosed placeholder at position {0}")]
  Unclosed(usize),

  #[error("empty placeholder at position {0}")]
  Empty(usize),

  #[error("unknown placeholder '{name}' at position {pos} (expected one of: Product, Version)")]
  UnknownPlaceholder { name: String, pos: usize },
}

/// Values bound to the placeholders during rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
  pub product: String,
  pub version: String,
}

impl TemplateContext {
  pub fn new(product: impl Into<String>, version: impl Into<String>) -> Self {
    Self {
      product: product.into(),
      version: version.into(),
    }
  }

  fn value(&self, placeholder: Placeholder) -> &str {
    match placeholder {
      Placeholder::Product => &self.product,
      Placeholder::Version => &self.version,
    }
  }
}

/// Parse a template into literal and placeholder segments.
///
/// Adjacent literal text is merged into a single segment.
///
/// # Errors
///
/// Returns an error if a placeholder is unclosed, empty, or names something
/// outside the recognized set.
pub fn parse(input: &str) -> Result<Vec<Segment>, TemplateError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut rest = input;
  let mut offset = 0;

  while let Some(start) = rest.find(OPEN) {
    literal.push_str(&rest[..start]);
    let pos = offset + start;
    let after_open = &rest[start + OPEN.len()..];

    let end = after_open.find(CLOSE).ok_or(TemplateError::Unclosed(pos))?;
    let name = after_open[..end].trim();
    if name.is_empty() {
      return Err(TemplateError::Empty(pos));
    }

    let placeholder = Placeholder::from_name(name).ok_or_else(|| TemplateError::UnknownPlaceholder {
      name: name.to_string(),
      pos,
    })?;

    if !literal.is_empty() {
      segments.push(Segment::Literal(std::mem::take(&mut literal)));
    }
    segments.push(Segment::Placeholder(placeholder));

    let consumed = start + OPEN.len() + end + CLOSE.len();
    offset += consumed;
    rest = &rest[consumed..];
  }

  literal.push_str(rest);
  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}

/// Check that a template only uses recognized placeholders.
pub fn validate(input: &str) -> Result<(), TemplateError> {
  parse(input).map(|_| ())
}

/// Render a template with the given context.
///
/// # Errors
///
/// Returns an error if the template fails to parse.
pub fn render(input: &str, ctx: &TemplateContext) -> Result<String, TemplateError> {
  let segments = parse(input)?;
  Ok(render_segments(&segments, ctx))
}

/// Render pre-parsed segments.
///
/// Use this when the same template is rendered for several products.
pub fn render_segments(segments: &[Segment], ctx: &TemplateContext) -> String {
  let mut result = String::new();
  for segment in segments {
    match segment {
      Segment::Literal(s) => result.push_str(s),
      Segment::Placeholder(p) => result.push_str(ctx.value(*p)),
    }
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ctx() -> TemplateContext {
    TemplateContext::new("svc", "2.0.0")
  }

  #[test]
  fn product_and_version() {
    assert_eq!(render("{{Product}}-{{Version}}", &ctx()).unwrap(), "svc-2.0.0");
  }

  #[test]
  fn plain_text_is_unchanged() {
    assert_eq!(render("godel", &ctx()).unwrap(), "godel");
  }

  #[test]
  fn repeated_placeholders() {
    assert_eq!(
      render("{{Product}}/{{Version}}/{{Product}}.tgz", &ctx()).unwrap(),
      "svc/2.0.0/svc.tgz"
    );
  }

  #[test]
  fn whitespace_inside_delimiters() {
    assert_eq!(render("{{ Product }}_{{Version }}", &ctx()).unwrap(), "svc_2.0.0");
  }

  #[test]
  fn adjacent_placeholders_no_separator() {
    assert_eq!(render("{{Product}}{{Version}}", &ctx()).unwrap(), "svc2.0.0");
  }

  #[test]
  fn rendering_is_deterministic() {
    let template = "bin/{{Product}}-{{Version}}-linux";
    let first = render(template, &ctx()).unwrap();
    let second = render(template, &ctx()).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn single_braces_pass_through() {
    assert_eq!(render("{Product} }} {", &ctx()).unwrap(), "{Product} }} {");
  }

  #[test]
  fn parse_merges_literals() {
    let segments = parse("a{{Version}}b").unwrap();
    assert_eq!(
      segments,
      vec![
        Segment::Literal("a".to_string()),
        Segment::Placeholder(Placeholder::Version),
        Segment::Literal("b".to_string()),
      ]
    );
  }

  #[test]
  fn empty_input() {
    assert!(parse("").unwrap().is_empty());
    assert_eq!(render("", &ctx()).unwrap(), "");
  }

  #[test]
  fn render_segments_for_several_products() {
    let segments = parse("{{Product}}.exe").unwrap();
    assert_eq!(render_segments(&segments, &TemplateContext::new("a", "1")), "a.exe");
    assert_eq!(render_segments(&segments, &TemplateContext::new("b", "1")), "b.exe");
  }

  #[test]
  fn error_unknown_placeholder() {
    let result = render("{{Product}}-{{OS}}", &ctx());
    assert!(matches!(
      result,
      Err(TemplateError::UnknownPlaceholder { ref name, pos: 12 }) if name == "OS"
    ));
  }

  #[test]
  fn error_placeholder_names_are_case_sensitive() {
    assert!(matches!(
      validate("{{product}}"),
      Err(TemplateError::UnknownPlaceholder { .. })
    ));
  }

  #[test]
  fn error_unclosed_placeholder() {
    assert_eq!(parse("out/{{Product"), Err(TemplateError::Unclosed(4)));
  }

  #[test]
  fn error_empty_placeholder() {
    assert_eq!(parse("x{{  }}"), Err(TemplateError::Empty(1)));
  }
}
