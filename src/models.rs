// src/models.rs

use crate::core::commons::strip_switch_prefix;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// --- SWITCH MODEL ---

/// Controls how a switch's value is rendered on the command line.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SwitchKind {
    /// Renders the switch token when on, the reverse token when off. Never a value.
    Boolean,
    /// Token followed by a single text value.
    String,
    /// Token followed by the decimal form of a number.
    Integer,
    /// Token followed by a list of values.
    StringArray,
    /// Renders the token produced by a switch map lookup.
    Enumeration,
    /// Like `StringArray`, but every item is a file path.
    ItemArray,
    /// Token emitted whenever the switch is present.
    AlwaysAppend,
}

/// The raw value carried by a switch.
///
/// Untagged so that TOML `true`, `3`, `"text"` and `["a", "b"]` map directly onto it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum SwitchValue {
    /// On/off state of a boolean switch.
    Flag(bool),
    /// Integer value.
    Number(i64),
    /// Single text value, or the logical value of an enumeration.
    Text(String),
    /// Items of a string or file array.
    List(Vec<String>),
}

impl SwitchValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Flag(_) => "boolean",
            Self::Number(_) => "integer",
            Self::Text(_) => "string",
            Self::List(_) => "list",
        }
    }
}

/// One override relationship: while the owning switch's effective token is `own_token`,
/// any other active switch whose effective token is `target_token` is dropped.
///
/// Tokens are compared case-insensitively with leading `/` and `-` ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OverrideRule {
    /// Token the owning switch must currently render for the rule to apply.
    pub own_token: String,
    /// Token of the switch that gets dropped.
    pub target_token: String,
}

/// A property whose value is appended after a composite switch's own value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SwitchArgument {
    /// Name of the switch whose value is appended.
    pub property: String,
    /// Whether generation fails when the property is not set.
    #[serde(default)]
    pub required: bool,
}

/// One resolved command-line option.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Switch {
    /// Unique, case-insensitive identifier.
    pub name: String,
    /// How the value is rendered.
    pub kind: SwitchKind,
    /// Token emitted when the switch is on (e.g. `/GR`).
    #[serde(default, rename = "switch")]
    pub switch_token: String,
    /// Token emitted when a boolean switch is off (e.g. `/GR-`).
    #[serde(default, rename = "reverse_switch")]
    pub reverse_switch_token: String,
    /// Raw value. Must agree with `kind`, see [`Switch::validate`].
    #[serde(default)]
    pub value: Option<SwitchValue>,
    /// Text placed between the token and its value, and before each argument value.
    #[serde(default)]
    pub separator: String,
    /// Joins list items after a single token. When absent, the token is repeated per item.
    #[serde(default)]
    pub item_separator: Option<String>,
    /// Properties appended after the value of a composite switch.
    #[serde(default)]
    pub arguments: Vec<SwitchArgument>,
    /// Switches this one supersedes, checked in order.
    #[serde(default)]
    pub overrides: Vec<OverrideRule>,
    /// Inclusive lower bound checked for integer switches when materialized.
    #[serde(default)]
    pub min: Option<i64>,
    /// Inclusive upper bound checked for integer switches when materialized.
    #[serde(default)]
    pub max: Option<i64>,
    /// Switch map: (logical value, token) pairs for enumeration switches.
    #[serde(default)]
    pub map: Vec<(String, String)>,
}

/// Structural problems that keep a switch out of a switch set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwitchError {
    /// The name is empty or blank.
    #[error("Switch name must not be empty.")]
    EmptyName,
    /// A boolean switch with both tokens empty.
    #[error("Boolean switch '{0}' has neither a switch nor a reverse switch token.")]
    MissingBooleanTokens(String),
    /// The kind needs a value and none was given.
    #[error("Switch '{name}' of kind {kind:?} requires a value.")]
    MissingValue {
        /// Switch name.
        name: String,
        /// Declared kind.
        kind: SwitchKind,
    },
    /// The value's type does not fit the kind.
    #[error("Switch '{name}' of kind {kind:?} cannot hold a {found} value.")]
    ValueKindMismatch {
        /// Switch name.
        name: String,
        /// Declared kind.
        kind: SwitchKind,
        /// Type of the value that was given.
        found: &'static str,
    },
    /// A switch with the same name (ignoring case) is already in the set.
    #[error("Switch '{0}' is already present in the switch set.")]
    Duplicate(String),
}

impl Switch {
    /// Creates a switch of the given kind with no tokens and no value.
    pub fn new(name: impl Into<String>, kind: SwitchKind) -> Self {
        Self {
            name: name.into(),
            kind,
            switch_token: String::new(),
            reverse_switch_token: String::new(),
            value: None,
            separator: String::new(),
            item_separator: None,
            arguments: Vec::new(),
            overrides: Vec::new(),
            min: None,
            max: None,
            map: Vec::new(),
        }
    }

    /// A boolean switch rendering `switch_token` when `value` is true,
    /// `reverse_switch_token` otherwise.
    pub fn boolean(
        name: impl Into<String>,
        switch_token: impl Into<String>,
        reverse_switch_token: impl Into<String>,
        value: bool,
    ) -> Self {
        let mut switch = Self::new(name, SwitchKind::Boolean);
        switch.switch_token = switch_token.into();
        switch.reverse_switch_token = reverse_switch_token.into();
        switch.value = Some(SwitchValue::Flag(value));
        switch
    }

    /// A switch rendering `switch_token` followed by one text value.
    pub fn string(
        name: impl Into<String>,
        switch_token: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut switch = Self::new(name, SwitchKind::String);
        switch.switch_token = switch_token.into();
        switch.value = Some(SwitchValue::Text(value.into()));
        switch
    }

    /// A switch rendering `switch_token` followed by a number.
    pub fn integer(name: impl Into<String>, switch_token: impl Into<String>, value: i64) -> Self {
        let mut switch = Self::new(name, SwitchKind::Integer);
        switch.switch_token = switch_token.into();
        switch.value = Some(SwitchValue::Number(value));
        switch
    }

    /// A switch rendering a list of values.
    pub fn string_array(
        name: impl Into<String>,
        switch_token: impl Into<String>,
        items: Vec<String>,
    ) -> Self {
        let mut switch = Self::new(name, SwitchKind::StringArray);
        switch.switch_token = switch_token.into();
        switch.value = Some(SwitchValue::List(items));
        switch
    }

    /// A switch rendering a list of file paths.
    pub fn item_array(
        name: impl Into<String>,
        switch_token: impl Into<String>,
        items: Vec<String>,
    ) -> Self {
        let mut switch = Self::new(name, SwitchKind::ItemArray);
        switch.switch_token = switch_token.into();
        switch.value = Some(SwitchValue::List(items));
        switch
    }

    /// An enumeration switch whose mapped token is already known.
    pub fn enumeration(name: impl Into<String>, mapped_token: impl Into<String>) -> Self {
        let mut switch = Self::new(name, SwitchKind::Enumeration);
        switch.switch_token = mapped_token.into();
        switch
    }

    /// A switch emitting `switch_token` whenever it is present.
    pub fn always_append(name: impl Into<String>, switch_token: impl Into<String>) -> Self {
        let mut switch = Self::new(name, SwitchKind::AlwaysAppend);
        switch.switch_token = switch_token.into();
        switch
    }

    /// Sets the text between the token and its value.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Joins list items after a single token instead of repeating the token.
    pub fn with_item_separator(mut self, separator: impl Into<String>) -> Self {
        self.item_separator = Some(separator.into());
        self
    }

    /// Adds an override rule, see [`OverrideRule`].
    pub fn with_override(
        mut self,
        own_token: impl Into<String>,
        target_token: impl Into<String>,
    ) -> Self {
        self.overrides.push(OverrideRule {
            own_token: own_token.into(),
            target_token: target_token.into(),
        });
        self
    }

    /// Adds an argument property of a composite switch.
    pub fn with_argument(mut self, property: impl Into<String>, required: bool) -> Self {
        self.arguments.push(SwitchArgument {
            property: property.into(),
            required,
        });
        self
    }

    /// The boolean state of a `Boolean` switch.
    pub fn boolean_value(&self) -> Option<bool> {
        match (self.kind, &self.value) {
            (SwitchKind::Boolean, Some(SwitchValue::Flag(b))) => Some(*b),
            _ => None,
        }
    }

    /// The token this switch currently stands for: the reverse token for a boolean
    /// switch that is off, the switch token otherwise.
    pub fn effective_token(&self) -> &str {
        if self.boolean_value() == Some(false) {
            &self.reverse_switch_token
        } else {
            &self.switch_token
        }
    }

    /// `effective_token` without its leading `/` or `-` characters.
    pub fn bare_token(&self) -> &str {
        strip_switch_prefix(self.effective_token())
    }

    /// Checks the structural invariants of the switch.
    pub fn validate(&self) -> Result<(), SwitchError> {
        if self.name.trim().is_empty() {
            return Err(SwitchError::EmptyName);
        }

        let mismatch = |value: &SwitchValue| SwitchError::ValueKindMismatch {
            name: self.name.clone(),
            kind: self.kind,
            found: value.type_name(),
        };
        let missing = || SwitchError::MissingValue {
            name: self.name.clone(),
            kind: self.kind,
        };

        match (self.kind, &self.value) {
            (SwitchKind::Boolean, Some(SwitchValue::Flag(_))) => {
                if self.switch_token.is_empty() && self.reverse_switch_token.is_empty() {
                    return Err(SwitchError::MissingBooleanTokens(self.name.clone()));
                }
                Ok(())
            }
            (SwitchKind::String, Some(SwitchValue::Text(_)))
            | (SwitchKind::Integer, Some(SwitchValue::Number(_)))
            | (SwitchKind::StringArray | SwitchKind::ItemArray, Some(SwitchValue::List(_)))
            | (SwitchKind::Enumeration, Some(SwitchValue::Text(_)) | None)
            | (SwitchKind::AlwaysAppend, None) => Ok(()),
            (_, Some(v)) => Err(mismatch(v)),
            (_, None) => Err(missing()),
        }
    }
}
