use super::*;
use crate::scene::document::SceneDocument;
use crate::template::value::{TemplateValue, VariableKind};

fn values(pairs: &[(&str, TemplateValue)]) -> TemplateValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn card() -> Template {
    Template::new("card", "Card", "<Txt text={{title}} fontSize={{size}} />")
        .variable("title", VariableKind::String, "")
        .variable("size", VariableKind::Number, "")
}

#[test]
fn substitutes_declared_variables() {
    let out = expand(
        &card(),
        &values(&[("title", "Hello".into()), ("size", 40.into())]),
    )
    .unwrap();
    assert_eq!(out, "<Txt text=\"Hello\" fontSize=40 />");
}

#[test]
fn missing_variables_are_reported_in_declaration_order() {
    let err = expand(&card(), &TemplateValues::new()).unwrap_err();
    assert_eq!(
        err,
        TemplateError::MissingVariable {
            name: "title".to_string()
        }
    );
}

#[test]
fn type_mismatch_names_both_kinds() {
    let err = expand(
        &card(),
        &values(&[("title", "Hi".into()), ("size", "30".into())]),
    )
    .unwrap_err();
    assert_eq!(
        err,
        TemplateError::TypeMismatch {
            name: "size".to_string(),
            expected: "number",
            found: "string"
        }
    );
    assert_eq!(err.to_string(), "variable size must be a number, got string");
}

#[test]
fn templates_without_variables_pass_through() {
    let t = Template::new("t", "T", "const a = {{ignored}};");
    let out = expand(&t, &values(&[("ignored", 1.into())])).unwrap();
    assert_eq!(out, "const a = {{ignored}};");
}

#[test]
fn undeclared_supplied_values_are_substituted_too() {
    let t = Template::new("t", "T", "f({{a}}, {{extra}}, {{unknown}});")
        .variable("a", VariableKind::Boolean, "");
    let out = expand(&t, &values(&[("a", true.into()), ("extra", "x".into())])).unwrap();
    assert_eq!(out, "f(true, \"x\", {{unknown}});");
}

#[test]
fn substituted_text_is_not_rescanned() {
    let t = Template::new("t", "T", "{{a}} {{b}}")
        .variable("a", VariableKind::String, "")
        .variable("b", VariableKind::String, "");
    let out = expand(&t, &values(&[("a", "{{b}}".into()), ("b", "B".into())])).unwrap();
    assert_eq!(out, "\"{{b}}\" \"B\"");
}

#[test]
fn names_must_match_exactly() {
    let vals = values(&[("val", 1.into())]);
    assert_eq!(substitute("{{value}} {{val}}", &vals), "{{value}} 1");
    assert_eq!(substitute("{{ val }}", &vals), "{{ val }}");
    assert_eq!(substitute("{{{val}}}", &vals), "{1}");
    assert_eq!(substitute("style={{ x: {{val}} }}", &vals), "style={{ x: 1 }}");
    assert_eq!(substitute("{{val", &vals), "{{val");
}

#[test]
fn strings_are_escaped() {
    let vals = values(&[("s", "a\"b\\c\n".into())]);
    assert_eq!(substitute("x={{s}}", &vals), r#"x="a\"b\\c\n""#);
}

#[test]
fn full_document_mode_wraps_in_boilerplate() {
    let bp = SceneBoilerplate::default();
    let t = card();
    let vals = values(&[("title", "Hello".into()), ("size", 40.into())]);

    let region = expand_with(&t, &vals, ExpansionMode::Region, &bp).unwrap();
    let doc = expand_with(&t, &vals, ExpansionMode::FullDocument, &bp).unwrap();
    assert!(doc.starts_with("/** @jsxImportSource"));

    let parsed = SceneDocument::parse(doc).unwrap();
    assert_eq!(parsed.region(), region);
}
