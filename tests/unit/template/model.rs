use super::*;

#[test]
fn builder_collects_fields() {
    let t = Template::new("intro", "Intro", "yield;")
        .description("opening card")
        .tag("text")
        .tag("basic")
        .variable("title", VariableKind::String, "headline");
    assert_eq!(t.label(), "intro");
    assert!(t.has_tag("text"));
    assert!(!t.has_tag("chart"));

    let summary = t.summary();
    assert_eq!(summary.tags, vec!["basic".to_string(), "text".to_string()]);
    assert_eq!(summary.variables[0].name, "title");
}

#[test]
fn label_falls_back_to_name() {
    let t = Template::new("", "Scratch", "");
    assert_eq!(t.label(), "Scratch");
}

#[test]
fn duplicate_variables_are_rejected() {
    let t = Template::new("t", "T", "")
        .variable("a", VariableKind::String, "")
        .variable("a", VariableKind::Number, "");
    assert_eq!(
        t.check().unwrap_err(),
        TemplateError::DuplicateVariable {
            template: "t".to_string(),
            name: "a".to_string()
        }
    );
}

#[test]
fn empty_variable_names_are_rejected() {
    let t = Template::new("t", "T", "").variable("", VariableKind::String, "");
    assert!(matches!(
        t.check().unwrap_err(),
        TemplateError::InvalidTemplate { .. }
    ));
}

#[test]
fn deserializes_registry_records() {
    let t: Template = serde_json::from_str(
        r#"{
            "id": "text-reveal",
            "name": "Text Reveal",
            "tags": ["text"],
            "variables": [{ "name": "value", "type": "string" }],
            "code": "text={{value}}"
        }"#,
    )
    .unwrap();
    assert_eq!(t.variables[0].kind, VariableKind::String);
    assert_eq!(t.variables[0].description, "");
    assert!(t.check().is_ok());

    let inline: Template = serde_json::from_str(r#"{ "name": "x", "code": "" }"#).unwrap();
    assert!(inline.id.is_empty());
    assert!(inline.variables.is_empty());
}

#[test]
fn sources_convert_from_ids_and_templates() {
    assert_eq!(TemplateSource::from("a"), TemplateSource::Id("a".to_string()));
    let t = Template::new("", "x", "");
    assert_eq!(
        TemplateSource::from(t.clone()),
        TemplateSource::Inline(Box::new(t))
    );
}
