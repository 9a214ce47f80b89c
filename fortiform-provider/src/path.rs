//! API path templating
//!
//! Resource tables carry their collection path with `{param}` placeholders
//! (`/pm/config/{adom}/obj/system/dns-database/{database}/dns-entry`).

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("Missing path parameter '{param}' for {template}")]
    MissingParameter { template: String, param: String },
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_\-]+)\}").unwrap())
}

/// Names of the placeholders in a template, in order of appearance
pub fn parameters(template: &str) -> Vec<String> {
    placeholder()
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Substitute every placeholder from the parameters
pub fn render(template: &str, params: &BTreeMap<String, String>) -> Result<String, PathError> {
    if let Some(param) = parameters(template)
        .into_iter()
        .find(|p| !params.contains_key(p))
    {
        return Err(PathError::MissingParameter {
            template: template.to_string(),
            param,
        });
    }

    Ok(placeholder()
        .replace_all(template, |caps: &Captures| {
            params.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned())
}
