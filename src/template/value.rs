use std::collections::BTreeMap;

/// Values supplied for a template expansion, keyed by variable name.
pub type TemplateValues = BTreeMap<String, TemplateValue>;

/// Declared type of a template variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// Text, rendered as a quoted string literal.
    String,
    /// Integer or floating-point number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// Sequence of arbitrary JSON values.
    Array,
}

impl VariableKind {
    /// Lowercase name used in errors and the registry format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
        }
    }
}

/// A value supplied for a template variable.
///
/// Deserializes from any JSON value; the variant is checked against the declared
/// [`VariableKind`] at expansion time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum TemplateValue {
    /// JSON `null`.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// Numeric value.
    Number(serde_json::Number),
    /// String value.
    String(String),
    /// Array value.
    Array(Vec<serde_json::Value>),
    /// Object value. Accepted for undeclared variables; never matches a declared kind.
    Object(serde_json::Map<String, serde_json::Value>),
}

impl TemplateValue {
    /// Name of this value's runtime type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Whether this value satisfies a declared variable kind.
    pub fn matches(&self, kind: VariableKind) -> bool {
        matches!(
            (kind, self),
            (VariableKind::String, Self::String(_))
                | (VariableKind::Number, Self::Number(_))
                | (VariableKind::Boolean, Self::Boolean(_))
                | (VariableKind::Array, Self::Array(_))
        )
    }

    /// Source-text literal for this value.
    ///
    /// Strings become double-quoted literals with quotes, backslashes and control characters
    /// escaped; everything else uses its compact JSON form, which is also a valid literal.
    pub fn to_literal(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::String(s) => serde_json::Value::String(s.clone()).to_string(),
            Self::Array(items) => serde_json::Value::Array(items.clone()).to_string(),
            Self::Object(map) => serde_json::Value::Object(map.clone()).to_string(),
        }
    }
}

impl From<serde_json::Value> for TemplateValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::Array(items),
            serde_json::Value::Object(map) => Self::Object(map),
        }
    }
}

impl From<TemplateValue> for serde_json::Value {
    fn from(value: TemplateValue) -> Self {
        match value {
            TemplateValue::Null => Self::Null,
            TemplateValue::Boolean(b) => Self::Bool(b),
            TemplateValue::Number(n) => Self::Number(n),
            TemplateValue::String(s) => Self::String(s),
            TemplateValue::Array(items) => Self::Array(items),
            TemplateValue::Object(map) => Self::Object(map),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for TemplateValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for TemplateValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<f64> for TemplateValue {
    // Non-finite numbers have no literal form and become null.
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n).map_or(Self::Null, Self::Number)
    }
}

/// Convert a JSON object into template values. Anything other than an object is rejected.
pub fn values_from_json(value: serde_json::Value) -> Result<TemplateValues, String> {
    match value {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(k, v)| (k, TemplateValue::from(v)))
            .collect()),
        serde_json::Value::Null => Ok(TemplateValues::new()),
        other => Err(format!(
            "template variables must be a JSON object, got {}",
            TemplateValue::from(other).type_name()
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/value.rs"]
mod tests;
