//! Jinja environment setup for Viewforge

use crate::error::{JinjaError, JinjaResult};
use crate::functions::{make_ref_fn, make_var_fn, yaml_to_json};
use crate::resolver::RefResolver;
use minijinja::Environment;
use std::collections::HashMap;

/// Jinja templating environment for Viewforge
#[derive(Clone)]
pub struct JinjaEnvironment<'a> {
    env: Environment<'a>,
}

impl<'a> JinjaEnvironment<'a> {
    /// Create a new Jinja environment with variables from config
    pub fn new(vars: &HashMap<String, serde_yaml::Value>) -> Self {
        let mut env = Environment::new();

        // Convert YAML vars to JSON for the var function
        let json_vars: HashMap<String, serde_json::Value> = vars
            .iter()
            .map(|(k, v): (&String, &serde_yaml::Value)| (k.clone(), yaml_to_json(v)))
            .collect();

        env.add_function("var", make_var_fn(json_vars));

        Self { env }
    }

    /// Render a template with `ref()` resolved by `resolver`
    pub fn render_with_refs(&self, template: &str, resolver: RefResolver) -> JinjaResult<String> {
        let mut env = self.env.clone();
        env.add_function("ref", make_ref_fn(resolver));
        env.render_str(template, ()).map_err(JinjaError::from)
    }
}

impl Default for JinjaEnvironment<'_> {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}

#[cfg(test)]
#[path = "environment_test.rs"]
mod tests;
