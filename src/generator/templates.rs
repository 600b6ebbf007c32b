use askama::Template;

use super::entry::RouteEntry;
use super::handler::{DecodeField, HandlerPlan};

/// Template data for one handler function
#[derive(Template)]
#[template(path = "handler.rs.txt", escape = "none")]
pub struct HandlerTemplateData {
    pub route: String,
    pub target: String,
    pub handler_ident: String,
    pub fields: Vec<DecodeField>,
    pub args_binding: String,
    pub call: String,
    /// One of the [`ResultMapping`](super::handler::ResultMapping) kinds
    pub mapping: &'static str,
    pub fallible: bool,
    /// `r0` or `(r0, r1, ...)` for indexed mappings
    pub pattern: String,
    pub bindings: Vec<String>,
}

impl From<&HandlerPlan> for HandlerTemplateData {
    fn from(plan: &HandlerPlan) -> Self {
        let bindings = plan.mapping.bindings();
        let pattern = match bindings.as_slice() {
            [single] => single.clone(),
            many => format!("({})", many.join(", ")),
        };
        HandlerTemplateData {
            route: plan.route.clone(),
            target: plan.target.clone(),
            handler_ident: plan.handler_ident.clone(),
            fields: plan.fields.clone(),
            args_binding: plan.args_binding.clone(),
            call: plan.call.clone(),
            mapping: plan.mapping.kind(),
            fallible: plan.mapping.is_fallible(),
            pattern,
            bindings,
        }
    }
}

/// Template data for the generated server module
#[derive(Template)]
#[template(path = "main.rs.txt", escape = "none")]
pub struct MainRsTemplateData {
    pub version: &'static str,
    pub crate_ident: String,
    pub alias: String,
    /// Quoted string literal
    pub bind_addr: String,
    /// Rendered handler functions
    pub handlers: Vec<String>,
    pub routes: Vec<RouteEntry>,
}
