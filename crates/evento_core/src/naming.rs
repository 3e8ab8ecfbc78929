//! Event name to callback prop name mapping
//!
//! An event named `jump` is handled by the prop `onJump`. The mapping itself is
//! total and performs no validation; [`validate_event_name`] is the boundary
//! check the dispatcher applies in strict mode.

use crate::error::{EventoError, Result};

const PREFIX: &str = "on";

/// Map an event name to its callback prop name
///
/// Prefixes `on` and upper-cases the first character, leaving the rest
/// unchanged. Already capitalized names are not corrected, so `Jump` and
/// `jump` both map to `onJump`.
///
/// ```
/// use evento_core::naming::event_name_to_prop_name;
///
/// assert_eq!(event_name_to_prop_name("saveMario"), "onSaveMario");
/// ```
pub fn event_name_to_prop_name(event_name: &str) -> String {
    let mut chars = event_name.chars();
    let mut prop_name = String::with_capacity(PREFIX.len() + event_name.len());
    prop_name.push_str(PREFIX);
    if let Some(first) = chars.next() {
        prop_name.extend(first.to_uppercase());
        prop_name.push_str(chars.as_str());
    }
    prop_name
}

/// Recover the event name from a canonical callback prop name
///
/// Returns `None` for props that are not callbacks by convention
/// (`onclick`, `on`, `color`).
pub fn prop_name_to_event_name(prop_name: &str) -> Option<String> {
    if !is_callback_prop_name(prop_name) {
        return None;
    }
    let rest = &prop_name[PREFIX.len()..];
    let mut chars = rest.chars();
    let first = chars.next()?;
    let mut event_name = String::with_capacity(rest.len());
    event_name.extend(first.to_lowercase());
    event_name.push_str(chars.as_str());
    Some(event_name)
}

/// Check that `event_name` is lower-camel-case (`[a-z][A-Za-z0-9]*`)
///
/// On names that pass, [`event_name_to_prop_name`] is injective.
pub fn validate_event_name(event_name: &str) -> Result<()> {
    let invalid = |reason: &'static str| EventoError::InvalidEventName {
        name: event_name.to_string(),
        reason,
    };

    let mut chars = event_name.chars();
    match chars.next() {
        None => return Err(invalid("event name is empty")),
        Some(c) if c.is_ascii_uppercase() => {
            return Err(invalid("event name must start with a lowercase letter"));
        }
        Some(c) if !c.is_ascii_lowercase() => {
            return Err(invalid("event name must start with an ASCII letter"));
        }
        Some(_) => {}
    }

    if chars.all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(invalid("event name may only contain ASCII letters and digits"))
    }
}

/// Whether `prop_name` follows the `on[A-Z][A-Za-z0-9]*` callback convention
pub fn is_callback_prop_name(prop_name: &str) -> bool {
    let Some(rest) = prop_name.strip_prefix(PREFIX) else {
        return false;
    };
    let mut chars = rest.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}
