//! `{{ name }}` templates
//!
//! A [`Template`] is parsed once when it is built. The set of variables it
//! references is computed at that point and never changes, so dependency
//! analysis can inspect templates without rendering them.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use pest::Parser;
use thiserror::Error;

use crate::script::parser::{Rule, ScriptParser};
use crate::script::value::Values;

/// Malformed `{{ }}` expression in template text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid template: {0}")]
pub struct TemplateError(pub String);

/// Rendering failed because a referenced variable has no value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("variable '{0}' has no value")]
    Undefined(String),
}

#[derive(Debug, Clone)]
enum Segment {
    Text(String),
    Variable(String),
}

/// Text with `{{ name }}` placeholders
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    variables: BTreeSet<String>,
}

impl Template {
    /// Parse template text.
    pub fn new(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        let pairs = ScriptParser::parse(Rule::template, &source)
            .map_err(|e| TemplateError(e.variant.message().to_string()))?;

        let mut segments = Vec::new();
        let mut variables = BTreeSet::new();

        for pair in pairs.flatten() {
            match pair.as_rule() {
                Rule::template_text => segments.push(Segment::Text(pair.as_str().to_string())),
                Rule::placeholder => {
                    let name = pair
                        .into_inner()
                        .next()
                        .map(|p| p.as_str().to_string())
                        .ok_or_else(|| TemplateError("empty placeholder".to_string()))?;
                    variables.insert(name.clone());
                    segments.push(Segment::Variable(name));
                }
                _ => {}
            }
        }

        Ok(Self {
            source,
            segments,
            variables,
        })
    }

    /// The template text as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of all variables referenced by this template.
    pub fn variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    /// Substitute every placeholder with its value.
    pub fn render(&self, values: &Values) -> Result<String, RenderError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = values
                        .get(name)
                        .ok_or_else(|| RenderError::Undefined(name.clone()))?;
                    out.push_str(&value.to_string());
                }
            }
        }
        Ok(out)
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Template {}

impl Hash for Template {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}
