//! # Override Resolver
//!
//! Removes every active switch that another active switch declares as superseded.
//!
//! The scan runs over an unchanged view of the set and only collects names; removals
//! are applied afterwards. A switch that ends up removed still gets to apply its own
//! rules, because it was active when the scan looked at it.

use crate::core::{commons::tokens_match, switch_set::ActiveSwitchSet};
use std::collections::HashSet;

/// Computes the names (lowercased) of the switches superseded by others.
///
/// For each switch A and each of its rules whose `own_token` equals A's effective
/// token, the first other switch B whose effective token equals `target_token` is
/// marked. Only the first candidate is taken per rule.
pub fn find_superseded(switches: &ActiveSwitchSet) -> HashSet<String> {
    let mut superseded = HashSet::new();

    for owner in switches.iter() {
        for rule in &owner.overrides {
            if !tokens_match(&rule.own_token, owner.effective_token()) {
                continue;
            }

            let victim = switches.iter().find(|candidate| {
                !candidate.name.eq_ignore_ascii_case(&owner.name)
                    && tokens_match(&rule.target_token, candidate.effective_token())
            });

            if let Some(victim) = victim {
                log::trace!(
                    "Switch '{}' ({}) overrides '{}' ({}).",
                    owner.name,
                    owner.effective_token(),
                    victim.name,
                    victim.effective_token()
                );
                superseded.insert(victim.name.to_ascii_lowercase());
            }
        }
    }

    superseded
}

/// Removes every superseded switch from the set and returns how many were removed.
pub fn resolve_overrides(switches: &mut ActiveSwitchSet) -> usize {
    let superseded = find_superseded(switches);
    let mut removed = 0;
    for name in &superseded {
        if let Some(switch) = switches.remove(name) {
            log::debug!("Removed overridden switch '{}'.", switch.name);
            removed += 1;
        }
    }
    removed
}
