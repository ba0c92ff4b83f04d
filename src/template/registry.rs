use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{SceneError, SceneResult, TemplateError};
use crate::template::builtin;
use crate::template::model::{Template, TemplateSummary};

/// Catalog of named templates, in registration order.
#[derive(Clone, Debug, Default)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
    index: BTreeMap<String, usize>,
}

impl TemplateRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in templates.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for template in builtin::builtin_templates() {
            let registered = registry.register(template);
            debug_assert!(registered.is_ok(), "built-in template rejected: {registered:?}");
        }
        registry
    }

    /// Add a template. Ids must be non-empty and unique.
    pub fn register(&mut self, template: Template) -> Result<(), TemplateError> {
        if template.id.is_empty() {
            return Err(TemplateError::InvalidTemplate {
                template: template.name.clone(),
                reason: "registered templates need an id".to_string(),
            });
        }
        template.check()?;
        if self.index.contains_key(&template.id) {
            return Err(TemplateError::DuplicateTemplate(template.id));
        }
        self.index.insert(template.id.clone(), self.templates.len());
        self.templates.push(template);
        Ok(())
    }

    /// Look up a template by id.
    pub fn get(&self, id: &str) -> Option<&Template> {
        self.index.get(id).map(|&i| &self.templates[i])
    }

    /// Like [`get`](Self::get), but a missing id is a [`TemplateError::NotFound`].
    pub fn resolve(&self, id: &str) -> Result<&Template, TemplateError> {
        self.get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Templates carrying `tag`, in registration order.
    pub fn by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Template> + 'a {
        self.templates.iter().filter(move |t| t.has_tag(tag))
    }

    /// All templates, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    /// Summaries of all templates, or only those carrying `tag`.
    pub fn summaries(&self, tag: Option<&str>) -> Vec<TemplateSummary> {
        self.templates
            .iter()
            .filter(|t| tag.is_none_or(|tag| t.has_tag(tag)))
            .map(Template::summary)
            .collect()
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True if no template is registered.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Register every template from a JSON array file. Returns how many were added.
    ///
    /// The file is parsed completely before anything is registered; registration stops at the
    /// first rejected record.
    #[tracing::instrument(skip(self))]
    pub fn load_json(&mut self, path: &Path) -> SceneResult<usize> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SceneError::io("read templates", path, e))?;
        let templates: Vec<Template> = serde_json::from_str(&text)
            .with_context(|| format!("parse template registry {}", path.display()))?;

        let count = templates.len();
        for template in templates {
            self.register(template)?;
        }
        tracing::debug!(count, "loaded templates");
        Ok(count)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/registry.rs"]
mod tests;
