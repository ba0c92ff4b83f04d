use super::*;

const SCENE: &str = "import {makeScene2D} from '@revideo/2d';

export default makeScene2D('main', function* (view) {
  yield view.add(<Txt text={'hi'} />);
});
";

#[test]
fn empty_body_is_valid() {
    assert!(check_body("").is_ok());
    assert!(check_body("// only a comment").is_ok());
}

#[test]
fn body_errors_are_relative_to_the_code() {
    let errors = check_body("yield* waitFor(1);\nconst = 5;").unwrap_err();
    assert!(errors.iter().all(|e| e.offset >= "yield* waitFor(1);\n".len()));
    assert!(errors.iter().all(|e| e.offset <= "yield* waitFor(1);\nconst = 5;".len()));
}

#[test]
fn scene_body_ranges_exclude_braces() {
    let bodies = scene_bodies(SCENE, "makeScene2D").unwrap();
    assert_eq!(bodies.len(), 1);
    let body = bodies[0].clone();
    assert_eq!(&SCENE[body.start - 1..body.start], "{");
    assert_eq!(&SCENE[body.end..body.end + 1], "}");
    assert_eq!(
        SCENE[body].trim(),
        "yield view.add(<Txt text={'hi'} />);"
    );
}

#[test]
fn other_callees_and_plain_functions_are_ignored() {
    assert!(scene_bodies(SCENE, "makeProject").unwrap().is_empty());
    let src = "makeScene2D('main', function (view) {});";
    assert!(scene_bodies(src, "makeScene2D").unwrap().is_empty());
}

#[test]
fn deep_nesting_is_rejected_before_parsing() {
    let deep = format!("{}{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
    let errors = check_body(&deep).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].offset, MAX_NESTING);
    assert!(errors[0].message.contains("nesting deeper than"));

    let ok = format!("f{}1{};", "(".repeat(64), ")".repeat(64));
    assert!(check_body(&ok).is_ok());
}

#[test]
fn nesting_count_ignores_balanced_siblings() {
    let wide = "[1], ".repeat(MAX_NESTING * 2);
    assert_eq!(excessive_nesting(&wide), None);
}
