//! Scope resolution - Which ADOM a call goes to
//!
//! Every ADOM-scoped resource carries two meta attributes next to its
//! declared fields: `scopetype` (`inherit`, `adom` or `global`) and `adom`.

use std::fmt;
use std::str::FromStr;

use fortiform_core::{AttributeStore, LocalValue};
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;

/// Meta attribute selecting the scope of one resource
pub const SCOPETYPE_ATTRIBUTE: &str = "scopetype";
/// Meta attribute naming the ADOM when `scopetype = "adom"`
pub const ADOM_ATTRIBUTE: &str = "adom";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeType {
    /// Use the provider's ADOM
    #[default]
    Inherit,
    /// Use the resource's own `adom` attribute
    Adom,
    Global,
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeType::Inherit => write!(f, "inherit"),
            ScopeType::Adom => write!(f, "adom"),
            ScopeType::Global => write!(f, "global"),
        }
    }
}

impl FromStr for ScopeType {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "inherit" => Ok(ScopeType::Inherit),
            "adom" => Ok(ScopeType::Adom),
            "global" => Ok(ScopeType::Global),
            other => Err(ScopeError::InvalidScopeType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScopeError {
    #[error("Invalid scopetype '{0}', expected one of: inherit, adom, global")]
    InvalidScopeType(String),

    #[error("scopetype is 'adom' but no adom is set")]
    MissingAdom,
}

/// ADOM path segment for the provider-level ADOM: "global" when empty
pub fn provider_adom(adom: &str) -> String {
    if adom.is_empty() {
        "global".to_string()
    } else {
        format!("adom/{adom}")
    }
}

/// Resolve the ADOM path segment of a resource
pub fn adom_checking<S>(config: &ProviderConfig, store: &S) -> Result<String, ScopeError>
where
    S: AttributeStore + ?Sized,
{
    let scopetype = match meta_string(store, SCOPETYPE_ATTRIBUTE) {
        Some(s) => s.parse()?,
        None => config.scopetype,
    };

    match scopetype {
        ScopeType::Inherit => Ok(provider_adom(&config.adom)),
        ScopeType::Global => Ok("global".to_string()),
        ScopeType::Adom => match meta_string(store, ADOM_ATTRIBUTE) {
            Some(adom) => Ok(format!("adom/{adom}")),
            None => Err(ScopeError::MissingAdom),
        },
    }
}

/// Non-empty scalar meta attribute, rendered as a string
pub(crate) fn meta_string<S>(store: &S, name: &str) -> Option<String>
where
    S: AttributeStore + ?Sized,
{
    match store.get_ok(name) {
        Some(LocalValue::Scalar(s)) => Some(s.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortiform_core::{LocalTree, ResourceData, ResourceSpec};

    fn store_with<'a>(spec: &'a ResourceSpec, pairs: &[(&str, &str)]) -> ResourceData<'a> {
        let config: LocalTree = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), LocalValue::string(*v)))
            .collect();
        ResourceData::new(spec).with_config(config)
    }

    #[test]
    fn provider_adom_defaults_to_global() {
        assert_eq!(provider_adom(""), "global");
        assert_eq!(provider_adom("root"), "adom/root");
    }

    #[test]
    fn inherit_uses_provider_adom() {
        let spec = ResourceSpec::new("firewall_address", "name");
        let config = ProviderConfig {
            adom: "root".to_string(),
            ..ProviderConfig::default()
        };

        let store = store_with(&spec, &[]);
        assert_eq!(adom_checking(&config, &store).unwrap(), "adom/root");

        let store = store_with(&spec, &[("scopetype", "inherit")]);
        assert_eq!(adom_checking(&config, &store).unwrap(), "adom/root");

        let store = store_with(&spec, &[]);
        assert_eq!(
            adom_checking(&ProviderConfig::default(), &store).unwrap(),
            "global"
        );
    }

    #[test]
    fn explicit_scopes() {
        let spec = ResourceSpec::new("firewall_address", "name");
        let config = ProviderConfig::default();

        let store = store_with(&spec, &[("scopetype", "adom"), ("adom", "branch")]);
        assert_eq!(adom_checking(&config, &store).unwrap(), "adom/branch");

        let store = store_with(&spec, &[("scopetype", "global"), ("adom", "branch")]);
        assert_eq!(adom_checking(&config, &store).unwrap(), "global");

        let store = store_with(&spec, &[("scopetype", "adom")]);
        assert_eq!(adom_checking(&config, &store), Err(ScopeError::MissingAdom));

        let store = store_with(&spec, &[("scopetype", "tenant")]);
        assert_eq!(
            adom_checking(&config, &store),
            Err(ScopeError::InvalidScopeType("tenant".to_string()))
        );
    }

    #[test]
    fn scopetype_parses_and_displays() {
        assert_eq!("global".parse::<ScopeType>().unwrap(), ScopeType::Global);
        assert_eq!(ScopeType::Adom.to_string(), "adom");
        assert_eq!(ScopeType::default(), ScopeType::Inherit);
    }
}
