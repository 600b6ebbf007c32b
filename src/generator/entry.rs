use std::collections::HashSet;
use tracing::warn;

use super::handler::HandlerPlan;

/// One line of the generated route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: String,
    pub handler_ident: String,
    pub target: String,
}

impl From<&HandlerPlan> for RouteEntry {
    fn from(plan: &HandlerPlan) -> Self {
        RouteEntry {
            path: plan.route.clone(),
            handler_ident: plan.handler_ident.clone(),
            target: plan.target.clone(),
        }
    }
}

/// Route table entries in handler order.
pub fn route_entries(plans: &[HandlerPlan]) -> Vec<RouteEntry> {
    plans.iter().map(RouteEntry::from).collect()
}

/// `handle_<snake_case name>`, de-duplicated with `_1`, `_2`, ...
///
/// Declared names are unique, but `GetInfo` and `get_info` share a snake form.
pub(crate) fn unique_handler_name(seen: &mut HashSet<String>, name: &str) -> String {
    let base = format!("handle_{}", to_snake_case(name));
    if seen.insert(base.clone()) {
        return base;
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{base}_{counter}");
        if seen.insert(candidate.clone()) {
            warn!(%name, handler = %candidate, "duplicate handler name");
            return candidate;
        }
        counter += 1;
    }
}

/// `GetInfo` -> `get_info`, `HTTPStatus` -> `http_status`, `get_info` unchanged.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
