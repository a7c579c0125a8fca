//! Answer accumulation and per-module fan-out.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{error::DomainError, module::ModuleConfig};

/// Loaded modules keyed by their declared name.
///
/// A `BTreeMap` so that every downstream iteration (prompt order, fan-out,
/// serialisation) is deterministic.
pub type Modules = BTreeMap<String, ModuleConfig>;

/// One module's answered parameters, keyed by field.
pub type ModuleParameters = BTreeMap<String, String>;

/// Flat, append-only mapping from field to entered value.
///
/// Shared by every prompt of a run so later conditions can read earlier
/// answers. A field that was never asked (its condition was false) is simply
/// absent, which is distinct from an empty answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParameterValues(BTreeMap<String, String>);

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Record an answer. Existing answers are never overwritten.
    pub fn record(
        &mut self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DomainError> {
        let field = field.into();
        if self.0.contains_key(&field) {
            return Err(DomainError::AnswerAlreadyRecorded { field });
        }
        self.0.insert(field, value.into());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy out the answers for the given fields, skipping absent ones.
    pub fn select<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, String> {
        fields
            .into_iter()
            .filter_map(|f| self.0.get(f).map(|v| (f.to_string(), v.clone())))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Distribute the flat answer set back into per-module parameter sets.
///
/// A module receives an answered field only if it declares a parameter with
/// exactly that field name; answers nobody declared are dropped.
pub fn assign_module_parameters(
    modules: &Modules,
    answers: &ParameterValues,
) -> BTreeMap<String, ModuleParameters> {
    modules
        .iter()
        .map(|(name, module)| {
            let declared = module.parameter_fields();
            let params = answers
                .iter()
                .filter(|(field, _)| declared.contains(field))
                .map(|(field, value)| (field.to_string(), value.to_string()))
                .collect();
            (name.clone(), params)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::module::Parameter;

    fn modules(list: Vec<ModuleConfig>) -> Modules {
        list.into_iter().map(|m| (m.name.clone(), m)).collect()
    }

    #[test]
    fn shared_field_fans_out_to_every_declaring_module() {
        let modules = modules(vec![
            ModuleConfig::new("A").with_parameter(Parameter::new("region", "Region", "us-east-1")),
            ModuleConfig::new("B")
                .with_parameter(Parameter::new("region", "Region", "eu-west-1"))
                .with_parameter(Parameter::new("appName", "App name", "")),
        ]);
        let answers: ParameterValues = [("region", "us-west-2"), ("appName", "shop")]
            .into_iter()
            .collect();

        let assigned = assign_module_parameters(&modules, &answers);

        assert_eq!(assigned["A"].len(), 1);
        assert_eq!(assigned["A"]["region"], "us-west-2");
        assert_eq!(assigned["B"].len(), 2);
        assert_eq!(assigned["B"]["region"], "us-west-2");
        assert_eq!(assigned["B"]["appName"], "shop");
    }

    #[test]
    fn undeclared_answers_never_leak() {
        let modules = modules(vec![
            ModuleConfig::new("infra").with_parameter(Parameter::new("region", "Region", "")),
        ]);
        let answers: ParameterValues = [
            ("region", "us-east-2"),
            ("GithubRootOrg", "github.com/acme"),
            ("accessKeyId", "AKIA..."),
        ]
        .into_iter()
        .collect();

        let assigned = assign_module_parameters(&modules, &answers);
        let keys: Vec<_> = assigned["infra"].keys().cloned().collect();
        assert_eq!(keys, vec!["region".to_string()]);
    }

    #[test]
    fn unanswered_declared_fields_are_absent_not_empty() {
        let modules = modules(vec![
            ModuleConfig::new("web")
                .with_parameter(Parameter::new("domain", "Domain", "example.com"))
                .with_parameter(Parameter::new("cdn", "CDN", "")),
        ]);
        let answers: ParameterValues = [("domain", "acme.io")].into_iter().collect();

        let assigned = assign_module_parameters(&modules, &answers);
        assert!(!assigned["web"].contains_key("cdn"));
    }

    #[test]
    fn every_module_gets_an_entry_even_without_answers() {
        let modules = modules(vec![ModuleConfig::new("empty")]);
        let assigned = assign_module_parameters(&modules, &ParameterValues::new());
        assert!(assigned["empty"].is_empty());
    }

    #[test]
    fn record_is_append_only() {
        let mut answers = ParameterValues::new();
        answers.record("ShouldPushRepositories", "y").unwrap();

        let err = answers.record("ShouldPushRepositories", "n").unwrap_err();
        assert!(matches!(err, DomainError::AnswerAlreadyRecorded { .. }));
        assert_eq!(answers.get("ShouldPushRepositories"), Some("y"));
    }

    #[test]
    fn select_skips_absent_fields() {
        let answers: ParameterValues = [("a", "1"), ("b", "2")].into_iter().collect();
        let picked = answers.select(["a", "c"]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked["a"], "1");
    }
}
