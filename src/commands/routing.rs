//! Component id routing
//!
//! Buttons and modals carry ids of the form `<command>_<suffix>`. The routing
//! key is everything before the first `_`; the suffix is opaque to routing and
//! may itself contain `_`.

/// Separator between the routing key and the opaque suffix
pub const ROUTING_SEPARATOR: char = '_';

/// Resolve the routing key of a component id (the whole id when it has no separator)
pub fn routing_key(component_id: &str) -> &str {
    component_id
        .split_once(ROUTING_SEPARATOR)
        .map_or(component_id, |(key, _)| key)
}

/// Build a component id that routes back to `command`
///
/// Returns `None` when `command` itself contains the separator, since the
/// resulting id would route to a truncated name.
pub fn component_id(command: &str, suffix: &str) -> Option<String> {
    if command.contains(ROUTING_SEPARATOR) {
        return None;
    }
    Some(format!("{command}{ROUTING_SEPARATOR}{suffix}"))
}
