// src/core/validation.rs

use crate::{
    core::{
        diagnostics::{Diagnostic, DiagnosticSink},
        generator::GenerationError,
    },
    models::SwitchArgument,
};

/// Checks that `value` lies in `[min, max]`. Reports `OutOfRange` and returns `false` otherwise.
pub fn validate_integer(
    switch_name: &str,
    min: i64,
    max: i64,
    value: i64,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    if (min..=max).contains(&value) {
        return true;
    }
    sink.report(Diagnostic::OutOfRange {
        switch: switch_name.to_string(),
        min,
        max,
        value,
    });
    false
}

/// Looks `value` up in a switch map and returns the token of the first entry whose
/// input value matches it, ignoring case.
///
/// When nothing matches, `UnmappedValue` is reported and an empty token is returned.
pub fn read_switch_map<K, T>(
    property_name: &str,
    map: &[(K, T)],
    value: &str,
    sink: &mut dyn DiagnosticSink,
) -> String
where
    K: AsRef<str>,
    T: AsRef<str>,
{
    if let Some((_, token)) = map
        .iter()
        .find(|(input, _)| input.as_ref().eq_ignore_ascii_case(value))
    {
        return token.as_ref().to_string();
    }
    sink.report(Diagnostic::UnmappedValue {
        property: property_name.to_string(),
        value: value.to_string(),
    });
    String::new()
}

/// Appends the values of a composite switch's argument properties to its base rendering.
///
/// `resolve` returns the value of a property when it is set. An unset optional
/// argument is skipped; an unset required one is reported and aborts generation.
pub fn build_composite_value<F>(
    switch_name: &str,
    base: &str,
    separator: &str,
    arguments: &[SwitchArgument],
    resolve: F,
    sink: &mut dyn DiagnosticSink,
) -> Result<String, GenerationError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut value = base.to_string();
    for argument in arguments {
        match resolve(&argument.property) {
            Some(argument_value) => {
                value.push_str(separator);
                value.push_str(&argument_value);
            }
            None if argument.required => {
                sink.report(Diagnostic::MissingRequiredArgument {
                    switch: switch_name.to_string(),
                    property: argument.property.clone(),
                });
                return Err(GenerationError::MissingRequiredArgument {
                    switch: switch_name.to_string(),
                    property: argument.property.clone(),
                });
            }
            None => {}
        }
    }
    Ok(value)
}
