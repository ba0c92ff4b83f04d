use super::*;
use crate::scene::boilerplate::SceneBoilerplate;
use crate::scene::document::SceneDocument;
use crate::syntax::validate::validate_document;
use crate::template::expand::{ExpansionMode, expand_with};
use crate::template::value::{TemplateValue, TemplateValues};

fn sample_values() -> TemplateValues {
    let mut values = TemplateValues::new();
    values.insert("value".into(), "Hello".into());
    values.insert("logoUrl".into(), "https://example.com/logo.png".into());
    values.insert(
        "data".into(),
        TemplateValue::from(serde_json::json!([
            {"label": "A", "value": 30},
            {"label": "B", "value": 50}
        ])),
    );
    values.insert("chartHeight".into(), 300.into());
    values.insert("barColor".into(), "#3498db".into());
    values
}

#[test]
fn ids_are_unique_and_stable() {
    let ids: Vec<String> = builtin_templates().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, ["text-reveal", "logo-animation", "data-visualization"]);
}

#[test]
fn every_builtin_expands_to_a_valid_document() {
    let bp = SceneBoilerplate::default();
    let values = sample_values();
    for template in builtin_templates() {
        template.check().unwrap();
        let doc = expand_with(&template, &values, ExpansionMode::FullDocument, &bp).unwrap();
        let v = validate_document(&doc);
        assert!(v.ok, "{}: {:?}", template.id, v.errors);
        SceneDocument::parse(doc).unwrap();
    }
}

#[test]
fn text_reveal_renders_a_quoted_string() {
    let template = &builtin_templates()[0];
    let body = expand_with(
        template,
        &sample_values(),
        ExpansionMode::Region,
        &SceneBoilerplate::default(),
    )
    .unwrap();
    assert!(body.contains("text={ \"Hello\" }"));
}

#[test]
fn every_builtin_registers() {
    let registry = crate::template::registry::TemplateRegistry::with_builtins();
    assert_eq!(registry.len(), builtin_templates().len());
}

#[test]
fn string_values_survive_quotes_newlines_and_backslashes() {
    let mut values = sample_values();
    values.insert(
        "value".into(),
        "He said \"hi\"\nnext line back\\slash".into(),
    );
    values.insert("barColor".into(), "rgb(1, 2, 3) \"x\"".into());

    let bp = SceneBoilerplate::default();
    for template in builtin_templates() {
        let doc = expand_with(&template, &values, ExpansionMode::FullDocument, &bp).unwrap();
        let v = validate_document(&doc);
        assert!(v.ok, "{}: {:?}", template.id, v.errors);
    }

    let body = expand_with(&builtin_templates()[0], &values, ExpansionMode::Region, &bp).unwrap();
    assert!(body.contains(r#"text={ "He said \"hi\"\nnext line back\\slash" }"#));
}
