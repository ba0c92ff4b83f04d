use std::collections::BTreeSet;

use crate::foundation::error::TemplateError;
use crate::template::value::VariableKind;

/// A variable a template expects the caller to supply.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TemplateVariable {
    /// Placeholder name, written as `{{name}}` in the template code.
    pub name: String,
    /// Declared value type.
    #[serde(rename = "type")]
    pub kind: VariableKind,
    /// Human-readable hint.
    #[serde(default)]
    pub description: String,
}

/// A reusable scene template.
///
/// `code` is a region body: it is spliced between the scene generator's braces, or wrapped in
/// the configured boilerplate when a full document is generated.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Template {
    /// Registry key. May be empty for inline templates.
    #[serde(default)]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Free-form tags used for filtering.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Declared variables, checked in order during expansion.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<TemplateVariable>,
    /// Template body with `{{name}}` placeholders.
    pub code: String,
}

impl Template {
    /// Create a template with no description, tags or variables.
    pub fn new(id: impl Into<String>, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            tags: BTreeSet::new(),
            variables: Vec::new(),
            code: code.into(),
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Declare a variable.
    pub fn variable(
        mut self,
        name: impl Into<String>,
        kind: VariableKind,
        description: impl Into<String>,
    ) -> Self {
        self.variables.push(TemplateVariable {
            name: name.into(),
            kind,
            description: description.into(),
        });
        self
    }

    /// Id if set, otherwise the display name.
    pub fn label(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }

    /// Whether the template carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Check that variable names are non-empty and unique.
    pub fn check(&self) -> Result<(), TemplateError> {
        let mut seen = BTreeSet::new();
        for var in &self.variables {
            if var.name.is_empty() {
                return Err(TemplateError::InvalidTemplate {
                    template: self.label().to_string(),
                    reason: "variable name must not be empty".to_string(),
                });
            }
            if !seen.insert(var.name.as_str()) {
                return Err(TemplateError::DuplicateVariable {
                    template: self.label().to_string(),
                    name: var.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Listing view without the code.
    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            tags: self.tags.iter().cloned().collect(),
            variables: self.variables.clone(),
        }
    }
}

/// What `list_templates` returns for each template.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TemplateSummary {
    /// Registry key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Tags in sorted order.
    pub tags: Vec<String>,
    /// Declared variables.
    pub variables: Vec<TemplateVariable>,
}

/// Where `apply_template` gets its template from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateSource {
    /// A registered template, looked up by id.
    Id(String),
    /// A template supplied by the caller.
    Inline(Box<Template>),
}

impl From<&str> for TemplateSource {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<Template> for TemplateSource {
    fn from(template: Template) -> Self {
        Self::Inline(Box::new(template))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/model.rs"]
mod tests;
