// file: src/utils/template.rs
// description: Placeholder substitution for configuration file text
// reference: Internal code standards

use crate::error::{Result, XchembkuError};
use regex::Regex;
use std::collections::BTreeMap;

const PLACEHOLDER_PATTERN: &str = r"\{([A-Za-z0-9_]+)\}";

/// Replaces `{name}` placeholders in configuration text before it is parsed.
#[derive(Debug, Clone, Default)]
pub struct ConfigTemplate {
    substitutions: BTreeMap<String, String>,
}

impl ConfigTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the placeholders every configuration gets: `{CWD}` and, when the
    /// configuration came from a file, `{configurator_directory}`.
    pub fn with_environment(configurator_directory: Option<&str>) -> Self {
        let mut template = Self::new();

        if let Ok(cwd) = std::env::current_dir() {
            template.substitute("CWD", cwd.display().to_string());
        }

        if let Some(directory) = configurator_directory {
            template.substitute("configurator_directory", directory);
        }

        template
    }

    pub fn substitute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.substitutions.insert(key.into(), value.into());
        self
    }

    pub fn substitute_all<'a>(
        &mut self,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> &mut Self {
        for (key, value) in pairs {
            self.substitute(key, value);
        }
        self
    }

    pub fn render(&self, text: &str) -> String {
        let mut result = text.to_string();

        for (key, value) in &self.substitutions {
            let placeholder = format!("{{{}}}", key);
            result = result.replace(&placeholder, value);
        }

        result
    }

    /// Placeholders still present after rendering, in order of appearance.
    pub fn unresolved(text: &str) -> Result<Vec<String>> {
        let placeholder = Regex::new(PLACEHOLDER_PATTERN)
            .map_err(|e| XchembkuError::Config(format!("Invalid placeholder pattern: {}", e)))?;

        Ok(placeholder
            .captures_iter(text)
            .map(|captures| captures[1].to_string())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_occurrence() {
        let mut template = ConfigTemplate::new();
        template.substitute("output_directory", "/tmp/out");

        let rendered = template.render("uri: {output_directory}/db\nlog: {output_directory}/log");

        assert_eq!(rendered, "uri: /tmp/out/db\nlog: /tmp/out/log");
    }

    #[test]
    fn test_substitute_all() {
        let mut template = ConfigTemplate::new();
        template.substitute_all([("a", "1"), ("b", "2")]);

        assert_eq!(template.render("{a}-{b}-{c}"), "1-2-{c}");
    }

    #[test]
    fn test_unresolved_ignores_yaml_flow_maps() {
        let text = "database: { uri: x }\nother: {missing}/y";
        assert_eq!(
            ConfigTemplate::unresolved(text).unwrap(),
            vec!["missing".to_string()]
        );
    }

    #[test]
    fn test_with_environment_sets_cwd() {
        let template = ConfigTemplate::with_environment(Some("/etc/xchembku"));
        let rendered = template.render("{configurator_directory}|{CWD}");

        assert!(rendered.starts_with("/etc/xchembku|"));
        assert!(!rendered.contains("{CWD}"));
    }
}
