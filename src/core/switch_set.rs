// src/core/switch_set.rs

use crate::models::{Switch, SwitchError};
use indexmap::IndexMap;

/// The switches turned on for one invocation, keyed case-insensitively by name.
///
/// Insertion order is kept and survives removals; it is the emission order of
/// switches that the switch order list does not mention.
#[derive(Debug, Clone, Default)]
pub struct ActiveSwitchSet {
    switches: IndexMap<String, Switch>,
}

fn key_of(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl ActiveSwitchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a validated switch. A name already present (ignoring case) is rejected.
    pub fn insert(&mut self, switch: Switch) -> Result<(), SwitchError> {
        switch.validate()?;
        let key = key_of(&switch.name);
        if self.switches.contains_key(&key) {
            return Err(SwitchError::Duplicate(switch.name));
        }
        self.switches.insert(key, switch);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Switch> {
        self.switches.get(&key_of(name))
    }

    /// Answers "is this property set?".
    pub fn contains(&self, name: &str) -> bool {
        self.switches.contains_key(&key_of(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<Switch> {
        self.switches.shift_remove(&key_of(name))
    }

    /// Switches in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Switch> {
        self.switches.values()
    }

    pub fn len(&self) -> usize {
        self.switches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.switches.is_empty()
    }
}

impl TryFrom<Vec<Switch>> for ActiveSwitchSet {
    type Error = SwitchError;

    fn try_from(switches: Vec<Switch>) -> Result<Self, Self::Error> {
        let mut set = Self::new();
        for switch in switches {
            set.insert(switch)?;
        }
        Ok(set)
    }
}
