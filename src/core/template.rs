//! # Command Templates
//!
//! A template fixes the layout of a command line, e.g. `[AllOptions] /Fo[ObjectFile] [Sources]`.
//! `[Name]` is replaced by the rendering of the active switch `Name` (case-insensitive),
//! `[AllOptions]` by every active switch the template does not name explicitly, and
//! `[AdditionalOptions]` by the free-form additional text. `\[` is a literal bracket.

use crate::constants::{ADDITIONAL_OPTIONS_PLACEHOLDER, ALL_OPTIONS_PLACEHOLDER};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    // Either an escaped bracket or a complete placeholder.
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\\\[|\[([^\[\]]*)\]").unwrap();
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Empty placeholder '[]' at byte {0} of the command template.")]
    EmptyPlaceholder(usize),
    #[error("Unterminated or nested '[' at byte {0} of the command template.")]
    UnterminatedPlaceholder(usize),
}

/// A single piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateComponent {
    Literal(String),
    Switch(String),
    AllOptions,
    AdditionalOptions,
}

/// A command template parsed once and rendered for every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    components: Vec<TemplateComponent>,
}

impl CommandTemplate {
    /// Transforms a template string into a sequence of components,
    /// merging adjacent literal pieces.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut components = Vec::new();

        let mut last_index = 0;
        for caps in PLACEHOLDER_RE.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };

            push_literal(
                &mut components,
                text.get(last_index..full_match.start()).unwrap_or(""),
                last_index,
            )?;

            match caps.get(1) {
                None => {
                    // Escaped bracket: keep it, bypassing the unterminated check.
                    if let Some(TemplateComponent::Literal(last)) = components.last_mut() {
                        last.push('[');
                    } else {
                        components.push(TemplateComponent::Literal("[".to_string()));
                    }
                }
                Some(name) => {
                    let name = name.as_str().trim();
                    if name.is_empty() {
                        return Err(TemplateError::EmptyPlaceholder(full_match.start()));
                    }
                    components.push(component_for(name));
                }
            }
            last_index = full_match.end();
        }

        push_literal(
            &mut components,
            text.get(last_index..).unwrap_or(""),
            last_index,
        )?;

        log::trace!("Parsed command template into {} components.", components.len());
        Ok(Self { components })
    }

    pub fn components(&self) -> &[TemplateComponent] {
        &self.components
    }

    /// Switch names referenced explicitly by `[Name]` placeholders.
    pub fn referenced_switches(&self) -> impl Iterator<Item = &str> {
        self.components.iter().filter_map(|c| match c {
            TemplateComponent::Switch(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn references_switch(&self, name: &str) -> bool {
        self.referenced_switches()
            .any(|referenced| referenced.eq_ignore_ascii_case(name))
    }

    pub fn has_additional_options(&self) -> bool {
        self.components
            .iter()
            .any(|c| matches!(c, TemplateComponent::AdditionalOptions))
    }
}

/// Appends literal text, merging it into a preceding literal. A stray `[` means a
/// placeholder was never closed.
fn push_literal(
    components: &mut Vec<TemplateComponent>,
    s: &str,
    offset: usize,
) -> Result<(), TemplateError> {
    if let Some(pos) = s.find('[') {
        return Err(TemplateError::UnterminatedPlaceholder(offset + pos));
    }
    if s.is_empty() {
        return Ok(());
    }
    if let Some(TemplateComponent::Literal(last)) = components.last_mut() {
        last.push_str(s);
    } else {
        components.push(TemplateComponent::Literal(s.to_string()));
    }
    Ok(())
}

fn component_for(name: &str) -> TemplateComponent {
    if name.eq_ignore_ascii_case(ALL_OPTIONS_PLACEHOLDER) {
        TemplateComponent::AllOptions
    } else if name.eq_ignore_ascii_case(ADDITIONAL_OPTIONS_PLACEHOLDER) {
        TemplateComponent::AdditionalOptions
    } else {
        TemplateComponent::Switch(name.to_string())
    }
}
