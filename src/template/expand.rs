use crate::foundation::error::TemplateError;
use crate::scene::boilerplate::SceneBoilerplate;
use crate::template::model::Template;
use crate::template::value::TemplateValues;

/// Shape of the text produced by [`expand_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpansionMode {
    /// The substituted body alone, ready to splice into an existing document.
    Region,
    /// The substituted body wrapped in the boilerplate as a complete document.
    FullDocument,
}

/// Type-check `values` against the template's declared variables and substitute placeholders.
///
/// Templates without declared variables pass through untouched. Otherwise every declared
/// variable must be present with a matching kind, checked in declaration order, and every
/// supplied value (declared or not) is substituted.
pub fn expand(template: &Template, values: &TemplateValues) -> Result<String, TemplateError> {
    if template.variables.is_empty() {
        return Ok(template.code.clone());
    }

    for var in &template.variables {
        let value = values
            .get(&var.name)
            .ok_or_else(|| TemplateError::MissingVariable {
                name: var.name.clone(),
            })?;
        if !value.matches(var.kind) {
            return Err(TemplateError::TypeMismatch {
                name: var.name.clone(),
                expected: var.kind.as_str(),
                found: value.type_name(),
            });
        }
    }

    Ok(substitute(&template.code, values))
}

/// [`expand`], then shape the result according to `mode`.
pub fn expand_with(
    template: &Template,
    values: &TemplateValues,
    mode: ExpansionMode,
    boilerplate: &SceneBoilerplate,
) -> Result<String, TemplateError> {
    let body = expand(template, values)?;
    Ok(match mode {
        ExpansionMode::Region => body,
        ExpansionMode::FullDocument => boilerplate.render(&body),
    })
}

/// Replace each `{{name}}` whose name is a key of `values` with the value's literal.
///
/// Single left-to-right pass: inserted literals are never rescanned, and anything that is not
/// an exact placeholder for a supplied key stays verbatim.
pub(crate) fn substitute(code: &str, values: &TemplateValues) -> String {
    let mut out = String::with_capacity(code.len());
    let mut rest = code;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        if let Some(close) = after.find("}}") {
            let name = &after[..close];
            if is_placeholder_name(name)
                && let Some(value) = values.get(name)
            {
                out.push_str(&value.to_literal());
                rest = &after[close + 2..];
                continue;
            }
        }
        // Not a placeholder here; the second brace may still open one.
        out.push('{');
        rest = &rest[open + 1..];
    }

    out.push_str(rest);
    out
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
#[path = "../../tests/unit/template/expand.rs"]
mod tests;
