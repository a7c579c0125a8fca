//! Variable substitution context for boilerplate files.

use std::collections::HashMap;

use chrono::{Datelike, Utc};

/// Context for template rendering.
///
/// A **Value Object** holding the variables substituted into `{{NAME}}`
/// placeholders. Immutable after creation; [`RenderContext::with_variable`]
/// consumes and returns a new instance.
///
/// ## Built-in Variables
///
/// | Variable | Example | Source |
/// |----------|---------|--------|
/// | `PROJECT_NAME` | "My Awesome App" | User input |
/// | `PROJECT_NAME_SNAKE` | "my_awesome_app" | Computed |
/// | `PROJECT_NAME_KEBAB` | "my-awesome-app" | Computed |
/// | `YEAR` | "2026" | System time |
/// | `STACKUP_VERSION` | "0.1.0" | Crate version |
#[derive(Debug, Clone)]
pub struct RenderContext {
    project_name: String,
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new(project_name: impl Into<String>) -> Self {
        let name = project_name.into();
        let mut vars = HashMap::new();

        vars.insert("PROJECT_NAME".to_string(), name.clone());
        vars.insert("PROJECT_NAME_SNAKE".to_string(), join_words(&name, '_'));
        vars.insert("PROJECT_NAME_KEBAB".to_string(), join_words(&name, '-'));
        vars.insert("YEAR".to_string(), Utc::now().year().to_string());
        vars.insert(
            "STACKUP_VERSION".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );

        Self {
            project_name: name,
            variables: vars,
        }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// Replace every `{{VARIABLE}}` placeholder.
    ///
    /// Unknown placeholders are left as-is.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        result
    }
}

/// Lowercase the words of `input` and join them with `sep`.
///
/// Word boundaries are whitespace, `-`, `_` and lower→upper transitions.
fn join_words(input: &str, sep: char) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in input.chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join(&sep.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_variables() {
        let ctx = RenderContext::new("my awesome project");

        assert_eq!(ctx.get("PROJECT_NAME"), Some("my awesome project"));
        assert_eq!(ctx.get("PROJECT_NAME_SNAKE"), Some("my_awesome_project"));
        assert_eq!(ctx.get("PROJECT_NAME_KEBAB"), Some("my-awesome-project"));
    }

    #[test]
    fn camel_case_is_split() {
        assert_eq!(join_words("MyApp", '_'), "my_app");
        assert_eq!(join_words("shop-API_v2", '-'), "shop-api-v2");
    }

    #[test]
    fn custom_variables_render() {
        let ctx = RenderContext::new("demo").with_variable("STACK", "EKS + Go + React");
        assert_eq!(ctx.render("{{PROJECT_NAME}} on {{STACK}}"), "demo on EKS + Go + React");
    }

    #[test]
    fn unknown_placeholders_are_preserved() {
        let ctx = RenderContext::new("demo");
        assert_eq!(ctx.render("{{NOPE}}"), "{{NOPE}}");
    }
}
