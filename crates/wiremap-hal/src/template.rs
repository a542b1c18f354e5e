//! RFC 6570 level 1 URI templates
//!
//! A template like `/people/{name}` expands variables into an href and
//! extracts them back out of one. Extraction compiles the template into an
//! anchored regex where each variable matches a single path segment.

use std::collections::BTreeMap;

use regex::Regex;

use wiremap_value::Value;

/// Error raised while parsing a URI template
#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    #[error("unclosed '{{' in template '{template}'")]
    UnclosedBrace { template: String },

    #[error("unmatched '}}' in template '{template}'")]
    UnmatchedBrace { template: String },

    #[error("empty variable in template '{template}'")]
    EmptyVariable { template: String },

    #[error("invalid character '{found}' in variable '{variable}'")]
    InvalidVariable { variable: String, found: char },

    #[error("template compiles to an invalid pattern")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone)]
enum Part {
    Literal(String),
    Variable(String),
}

/// A parsed URI template
#[derive(Debug, Clone)]
pub struct UriTemplate {
    raw: String,
    parts: Vec<Part>,
    names: Vec<String>,
    matcher: Regex,
}

impl UriTemplate {
    /// Parse a template string
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut parts = Vec::new();
        let mut names = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }

                    let mut variable = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) if c.is_ascii_alphanumeric() || c == '_' => variable.push(c),
                            Some(c) => {
                                return Err(TemplateError::InvalidVariable {
                                    variable,
                                    found: c,
                                });
                            }
                            None => {
                                return Err(TemplateError::UnclosedBrace {
                                    template: template.to_string(),
                                });
                            }
                        }
                    }

                    if variable.is_empty() {
                        return Err(TemplateError::EmptyVariable {
                            template: template.to_string(),
                        });
                    }

                    names.push(variable.clone());
                    parts.push(Part::Variable(variable));
                }
                '}' => {
                    return Err(TemplateError::UnmatchedBrace {
                        template: template.to_string(),
                    });
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        let mut pattern = String::from("^");
        for part in &parts {
            match part {
                Part::Literal(text) => pattern.push_str(&regex::escape(text)),
                Part::Variable(_) => pattern.push_str("([^/]+)"),
            }
        }
        pattern.push('$');
        let matcher = Regex::new(&pattern)?;

        Ok(UriTemplate {
            raw: template.to_string(),
            parts,
            names,
            matcher,
        })
    }

    /// The template string this was parsed from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Variable names in order of appearance
    pub fn variables(&self) -> &[String] {
        &self.names
    }

    /// Expand the template with parameter values
    ///
    /// Parameters without an entry expand to the empty string.
    pub fn expand(&self, params: &BTreeMap<String, Value>) -> String {
        let mut href = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(text) => href.push_str(text),
                Part::Variable(name) => {
                    if let Some(value) = params.get(name) {
                        href.push_str(&render(value));
                    }
                }
            }
        }
        href
    }

    /// Extract parameter values out of an href
    ///
    /// Returns `None` when the href does not match the template.
    pub fn extract(&self, href: &str) -> Option<BTreeMap<String, Value>> {
        let captures = self.matcher.captures(href)?;

        let params = self
            .names
            .iter()
            .zip(captures.iter().skip(1))
            .filter_map(|(name, capture)| {
                capture.map(|m| (name.clone(), Value::from(m.as_str())))
            })
            .collect();

        Some(params)
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}
