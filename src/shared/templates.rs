//! Template engine for user-facing notification messages using Jinja2 syntax.
//!
//! English templates are compiled in. A deployment can override or add
//! locales by pointing [`TemplateEngine::with_override_dir`] at a directory
//! laid out as `<locale>/<name>.jinja`.

use minijinja::{Environment, Value};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Locale used when a template is missing for the configured one
pub const FALLBACK_LOCALE: &str = "en";

/// Built-in templates, keyed by `<locale>/<name>.jinja`
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "en/meeting_rescheduled.jinja",
        include_str!("../../templates/notifications/en/meeting_rescheduled.jinja"),
    ),
    (
        "en/summary_requested.jinja",
        include_str!("../../templates/notifications/en/summary_requested.jinja"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

pub struct TemplateEngine {
    env: Environment<'static>,
    locale: String,
}

impl TemplateEngine {
    /// Create an engine holding only the built-in templates.
    pub fn new(locale: impl Into<String>) -> Self {
        let mut env = Environment::new();
        for (name, source) in BUILTIN_TEMPLATES {
            if let Err(e) = env.add_template(name, source) {
                tracing::error!("Failed to compile built-in template {}: {}", name, e);
            }
        }

        Self {
            env,
            locale: locale.into(),
        }
    }

    /// Create an engine with the built-ins plus every `.jinja` file under `dir`.
    ///
    /// Files under `dir` replace built-ins of the same name. A missing
    /// directory is logged and otherwise ignored.
    pub fn with_override_dir(locale: impl Into<String>, dir: &Path) -> Self {
        let mut engine = Self::new(locale);
        if dir.exists() {
            load_templates_recursive(&mut engine.env, dir, dir);
        } else {
            tracing::warn!(
                "Notification template directory {} does not exist, using built-in templates",
                dir.display()
            );
        }
        engine
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Render `name` for the configured locale, falling back to English.
    pub fn render(&self, name: &str, ctx: &HashMap<&str, Value>) -> Result<String, TemplateError> {
        let localized = format!("{}/{}.jinja", self.locale, name);
        let template = match self.env.get_template(&localized) {
            Ok(template) => template,
            Err(_) => {
                let fallback = format!("{}/{}.jinja", FALLBACK_LOCALE, name);
                tracing::debug!(
                    "Template '{}' not found, falling back to '{}'",
                    localized,
                    fallback
                );
                self.env
                    .get_template(&fallback)
                    .map_err(|_| {
                        tracing::error!("No template named '{}' in any locale", name);
                        TemplateError::NotFound(name.to_string())
                    })?
            }
        };

        let render_ctx = Value::from_iter(ctx.iter().map(|(k, v)| (*k, v.clone())));

        template
            .render(render_ctx)
            .map(|s| s.trim().to_string())
            .map_err(|e| {
                tracing::error!("Failed to render template '{}': {}", name, e);
                TemplateError::RenderError(e.to_string())
            })
    }

    /// Render a template with a simpler string-only context.
    pub fn render_simple(
        &self,
        name: &str,
        ctx: &HashMap<&str, &str>,
    ) -> Result<String, TemplateError> {
        let value_ctx: HashMap<&str, Value> =
            ctx.iter().map(|(k, v)| (*k, Value::from(*v))).collect();

        self.render(name, &value_ctx)
    }

    /// Check if a template exists for the configured locale or the fallback
    pub fn template_exists(&self, name: &str) -> bool {
        [self.locale.as_str(), FALLBACK_LOCALE]
            .iter()
            .any(|locale| self.env.get_template(&format!("{}/{}.jinja", locale, name)).is_ok())
    }
}

/// Recursively load all .jinja templates from a directory
fn load_templates_recursive(env: &mut Environment<'static>, base_path: &Path, current_path: &Path) {
    if let Ok(entries) = std::fs::read_dir(current_path) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                load_templates_recursive(env, base_path, &path);
            } else if path.extension().is_some_and(|ext| ext == "jinja") {
                // Template names always use forward slashes
                if let Ok(relative) = path.strip_prefix(base_path) {
                    let template_name = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/");
                    if let Ok(content) = std::fs::read_to_string(&path) {
                        // Owned by the environment, dropped with the engine
                        if let Err(e) = env.add_template_owned(template_name.clone(), content) {
                            tracing::warn!("Failed to load template {}: {}", template_name, e);
                        } else {
                            tracing::debug!("Loaded template: {}", template_name);
                        }
                    }
                }
            }
        }
    }
}
