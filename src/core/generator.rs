//! # Command-Line Generator
//!
//! Renders a resolved [`ActiveSwitchSet`] into the single string handed to a tool.
//!
//! Without a template, switches are emitted in the declared switch order, followed by
//! any active switch the order does not mention (in insertion order), followed by the
//! additional options. With a template, the template alone decides the layout.

use crate::{
    core::{
        commons::quote_if_needed,
        diagnostics::DiagnosticSink,
        switch_set::ActiveSwitchSet,
        template::{CommandTemplate, TemplateComponent},
        validation::build_composite_value,
    },
    models::{Switch, SwitchKind, SwitchValue},
};
use thiserror::Error;

/// Failures that abort command-line generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Switch '{switch}' requires property '{property}', which is not set.")]
    MissingRequiredArgument { switch: String, property: String },
}

/// Everything about a tool's command line that does not change between invocations.
#[derive(Debug, Clone, Default)]
pub struct CommandLineGenerator {
    switch_order: Vec<String>,
    template: Option<CommandTemplate>,
    additional_options: String,
}

impl CommandLineGenerator {
    pub fn new<I, S>(switch_order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            switch_order: switch_order.into_iter().map(Into::into).collect(),
            template: None,
            additional_options: String::new(),
        }
    }

    pub fn with_template(mut self, template: CommandTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Raw text appended after every switch. It is trusted and never escaped.
    pub fn with_additional_options(mut self, additional_options: impl Into<String>) -> Self {
        self.additional_options = additional_options.into();
        self
    }

    pub fn switch_order(&self) -> &[String] {
        &self.switch_order
    }

    pub fn template(&self) -> Option<&CommandTemplate> {
        self.template.as_ref()
    }

    pub fn additional_options(&self) -> &str {
        self.additional_options.trim()
    }

    /// Renders the full command line for `switches`.
    pub fn generate(
        &self,
        switches: &ActiveSwitchSet,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<String, GenerationError> {
        let command_line = match &self.template {
            Some(template) => self.generate_templated(template, switches, sink)?,
            None => self.generate_ordered(switches, sink)?,
        };
        log::debug!(
            "Generated command line ({} chars) from {} switches.",
            command_line.chars().count(),
            switches.len()
        );
        Ok(command_line)
    }

    /// Switches in emission order: the declared order first, then the rest in insertion order.
    pub fn emission_order<'s>(&self, switches: &'s ActiveSwitchSet) -> Vec<&'s Switch> {
        let mut ordered: Vec<&Switch> = Vec::with_capacity(switches.len());
        let push_unique = |switch: &'s Switch, ordered: &mut Vec<&'s Switch>| {
            if !ordered
                .iter()
                .any(|s| s.name.eq_ignore_ascii_case(&switch.name))
            {
                ordered.push(switch);
            }
        };

        for name in &self.switch_order {
            if let Some(switch) = switches.get(name) {
                push_unique(switch, &mut ordered);
            }
        }
        for switch in switches.iter() {
            push_unique(switch, &mut ordered);
        }
        ordered
    }

    fn generate_ordered(
        &self,
        switches: &ActiveSwitchSet,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<String, GenerationError> {
        let mut parts = Vec::with_capacity(switches.len() + 1);
        for switch in self.emission_order(switches) {
            let rendered = render_switch(switch, switches, sink)?;
            if !rendered.is_empty() {
                parts.push(rendered);
            }
        }
        if !self.additional_options().is_empty() {
            parts.push(self.additional_options().to_string());
        }
        Ok(parts.join(" "))
    }

    fn generate_templated(
        &self,
        template: &CommandTemplate,
        switches: &ActiveSwitchSet,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<String, GenerationError> {
        let mut command_line = String::new();

        for component in template.components() {
            match component {
                TemplateComponent::Literal(s) => command_line.push_str(s),
                TemplateComponent::Switch(name) => {
                    if let Some(switch) = switches.get(name) {
                        command_line.push_str(&render_switch(switch, switches, sink)?);
                    }
                }
                TemplateComponent::AllOptions => {
                    let mut parts = Vec::new();
                    for switch in self
                        .emission_order(switches)
                        .into_iter()
                        .filter(|s| !template.references_switch(&s.name))
                    {
                        let rendered = render_switch(switch, switches, sink)?;
                        if !rendered.is_empty() {
                            parts.push(rendered);
                        }
                    }
                    command_line.push_str(&parts.join(" "));
                }
                TemplateComponent::AdditionalOptions => {
                    command_line.push_str(self.additional_options());
                }
            }
        }

        if !template.has_additional_options() && !self.additional_options().is_empty() {
            command_line.push(' ');
            command_line.push_str(self.additional_options());
        }

        Ok(command_line.trim().to_string())
    }
}

/// Renders one switch: its token, its value formatted by kind, and the values of
/// its argument properties when it is a composite switch.
///
/// Returns an empty string when the switch contributes nothing.
pub fn render_switch(
    switch: &Switch,
    switches: &ActiveSwitchSet,
    sink: &mut dyn DiagnosticSink,
) -> Result<String, GenerationError> {
    let base = render_base(switch);
    if switch.arguments.is_empty() || base.is_empty() {
        return Ok(base);
    }
    build_composite_value(
        &switch.name,
        &base,
        &switch.separator,
        &switch.arguments,
        |property| switches.get(property).and_then(argument_value),
        sink,
    )
}

fn render_base(switch: &Switch) -> String {
    let token = switch.switch_token.as_str();
    let with_value = |value: &str| format!("{}{}{}", token, switch.separator, value);

    match (switch.kind, &switch.value) {
        (SwitchKind::Boolean, _) => switch.effective_token().to_string(),
        (SwitchKind::AlwaysAppend | SwitchKind::Enumeration, _) => token.to_string(),
        (SwitchKind::String, Some(SwitchValue::Text(text))) => with_value(&quote_if_needed(text)),
        (SwitchKind::Integer, Some(SwitchValue::Number(n))) => with_value(&n.to_string()),
        (SwitchKind::StringArray | SwitchKind::ItemArray, Some(SwitchValue::List(items))) => {
            if items.is_empty() {
                return String::new();
            }
            let quoted: Vec<String> = items.iter().map(|i| quote_if_needed(i)).collect();
            match &switch.item_separator {
                Some(item_separator) => with_value(&quoted.join(item_separator)),
                None => quoted
                    .iter()
                    .map(|item| with_value(item))
                    .collect::<Vec<_>>()
                    .join(" "),
            }
        }
        // Kind and value disagree; the switch set never holds such a switch.
        _ => String::new(),
    }
}

/// The value a property contributes as an argument of a composite switch.
fn argument_value(switch: &Switch) -> Option<String> {
    let value = match (switch.kind, &switch.value) {
        (SwitchKind::Boolean, _) => switch.effective_token().to_string(),
        (SwitchKind::AlwaysAppend | SwitchKind::Enumeration, _) => switch.switch_token.clone(),
        (_, Some(SwitchValue::Text(text))) => quote_if_needed(text),
        (_, Some(SwitchValue::Number(n))) => n.to_string(),
        (_, Some(SwitchValue::List(items))) => items
            .iter()
            .map(|i| quote_if_needed(i))
            .collect::<Vec<_>>()
            .join(switch.item_separator.as_deref().unwrap_or(" ")),
        (_, Some(SwitchValue::Flag(_)) | None) => String::new(),
    };
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::CollectingSink;

    fn set(switches: Vec<Switch>) -> ActiveSwitchSet {
        ActiveSwitchSet::try_from(switches).unwrap()
    }

    fn generate(generator: &CommandLineGenerator, switches: &ActiveSwitchSet) -> String {
        generator
            .generate(switches, &mut CollectingSink::new())
            .unwrap()
    }

    #[test]
    fn test_declared_order_example() {
        let generator = CommandLineGenerator::new(["Optimization", "WarningLevel"]);
        let switches = set(vec![
            Switch::enumeration("WarningLevel", "/W4"),
            Switch::enumeration("Optimization", "/O2"),
        ]);
        assert_eq!(generate(&generator, &switches), "/O2 /W4");
    }

    #[test]
    fn test_unordered_switches_follow_in_insertion_order() {
        let generator = CommandLineGenerator::new(["warninglevel"]);
        let switches = set(vec![
            Switch::always_append("NoLogo", "/nologo"),
            Switch::enumeration("WarningLevel", "/W4"),
            Switch::boolean("Debug", "/Zi", "", true),
        ]);
        assert_eq!(generate(&generator, &switches), "/W4 /nologo /Zi");
    }

    #[test]
    fn test_order_list_entries_without_active_switch_are_skipped() {
        let generator = CommandLineGenerator::new(["Missing", "A", "A"]);
        let switches = set(vec![Switch::always_append("A", "/a")]);
        assert_eq!(generate(&generator, &switches), "/a");
    }

    #[test]
    fn test_kind_specific_rendering() {
        let generator = CommandLineGenerator::new(Vec::<String>::new());
        let switches = set(vec![
            Switch::boolean("Rtti", "/GR", "/GR-", false),
            Switch::boolean("Silent", "/S", "", false),
            Switch::string("Output", "/Fo", "build dir/main.obj"),
            Switch::integer("Jobs", "-j", 8).with_separator(" "),
            Switch::string_array("Defines", "/D", vec!["A".into(), "B=1".into()]),
            Switch::string_array("Libs", "--libs", vec!["x".into(), "y".into()])
                .with_separator("=")
                .with_item_separator(","),
            Switch::item_array("Sources", "", vec!["a.c".into(), "my file.c".into()]),
        ]);
        assert_eq!(
            generate(&generator, &switches),
            "/GR- /Fo\"build dir/main.obj\" -j 8 /DA /DB=1 --libs=x,y a.c \"my file.c\""
        );
    }

    #[test]
    fn test_additional_options_are_appended_verbatim() {
        let generator = CommandLineGenerator::new(["A"]).with_additional_options("  /raw \"x y\" ");
        let switches = set(vec![Switch::always_append("A", "/a")]);
        assert_eq!(generate(&generator, &switches), "/a /raw \"x y\"");

        let empty = set(vec![]);
        assert_eq!(generate(&generator, &empty), "/raw \"x y\"");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let generator = CommandLineGenerator::new(["B"]).with_additional_options("/extra");
        let switches = set(vec![
            Switch::always_append("A", "/a"),
            Switch::always_append("B", "/b"),
            Switch::string("C", "/c:", "v"),
        ]);
        let first = generate(&generator, &switches);
        let second = generate(&generator, &switches);
        assert_eq!(first, second);
        assert_eq!(first, "/b /a /c:v /extra");
    }

    #[test]
    fn test_template_controls_layout_and_omits_unreferenced() {
        let template = CommandTemplate::parse("compile [Sources] -o [Output]").unwrap();
        let generator =
            CommandLineGenerator::new(["Output", "Sources", "Verbose"]).with_template(template);
        let switches = set(vec![
            Switch::always_append("Verbose", "-v"),
            Switch::string("Output", "", "a.out"),
            Switch::item_array("Sources", "", vec!["main.c".into()]),
        ]);
        assert_eq!(generate(&generator, &switches), "compile main.c -o a.out");
    }

    #[test]
    fn test_template_all_options_and_additional_options() {
        let template =
            CommandTemplate::parse("[AllOptions] [AdditionalOptions] [Sources]").unwrap();
        let generator = CommandLineGenerator::new(["B", "A"])
            .with_template(template)
            .with_additional_options("/extra");
        let switches = set(vec![
            Switch::always_append("A", "/a"),
            Switch::item_array("Sources", "", vec!["x.c".into()]),
            Switch::always_append("B", "/b"),
        ]);
        assert_eq!(generate(&generator, &switches), "/b /a /extra x.c");
    }

    #[test]
    fn test_template_without_additional_placeholder_appends_at_end() {
        let template = CommandTemplate::parse("[Missing] tool").unwrap();
        let generator = CommandLineGenerator::new(Vec::<String>::new())
            .with_template(template)
            .with_additional_options("/extra");
        assert_eq!(generate(&generator, &set(vec![])), "tool /extra");
    }

    #[test]
    fn test_composite_switch_appends_argument_values() {
        let generator = CommandLineGenerator::new(["PrecompiledHeader"]);
        let switches = set(vec![
            Switch::always_append("PrecompiledHeader", "/Yu")
                .with_argument("PrecompiledHeaderFile", true)
                .with_argument("Unset", false),
            Switch::string("PrecompiledHeaderFile", "/Fp", "stdafx.h"),
        ]);
        assert_eq!(generate(&generator, &switches), "/Yustdafx.h /Fpstdafx.h");
    }

    #[test]
    fn test_missing_required_argument_aborts_generation() {
        let generator = CommandLineGenerator::new(["PrecompiledHeader"]);
        let switches = set(vec![
            Switch::always_append("PrecompiledHeader", "/Yc")
                .with_argument("PrecompiledHeaderFile", true),
        ]);
        let mut sink = CollectingSink::new();
        let result = generator.generate(&switches, &mut sink);
        assert_eq!(
            result,
            Err(GenerationError::MissingRequiredArgument {
                switch: "PrecompiledHeader".to_string(),
                property: "PrecompiledHeaderFile".to_string(),
            })
        );
        assert_eq!(sink.codes(), vec!["TS1003"]);
    }

    #[test]
    fn test_boolean_argument_contributes_its_effective_token() {
        let generator = CommandLineGenerator::new(Vec::<String>::new());
        let switches = set(vec![
            Switch::always_append("Link", "/link")
                .with_separator(" ")
                .with_argument("Incremental", false),
            Switch::boolean("Incremental", "/INCREMENTAL", "/INCREMENTAL:NO", false),
        ]);
        assert_eq!(
            generate(&generator, &switches),
            "/link /INCREMENTAL:NO /INCREMENTAL:NO"
        );
    }
}
