use super::*;

const TEXT_REVEAL_BODY: &str = r#"
	const textRef = createRef<Txt>();

	yield view.add(
		<Txt
			ref={textRef}
			text="moo"
			opacity={0}
			fontFamily={'Sans-Serif'}
			fontSize={40}
		/>
	);

	yield* textRef().opacity(1, 1);
"#;

const BAR_CHART_BODY: &str = r##"
	const data = [
		{ label: 'A', value: 30 },
		{ label: 'B', value: 50 },
	];
	const maxValue = Math.max(...data.map(d => d.value));
	const containerRef = createRef<Layout>();
	yield view.add(<Layout ref={containerRef} layout direction="row" gap={20} y={100} />);

	const bars = data.map((item) => {
		const barRef = createRef<Rect>();
		const height = (item.value / maxValue) * 300;
		containerRef().add(
			<Layout direction="column" gap={10}>
				<Rect ref={barRef} width={60} height={0} fill="#3498db" />
				<Txt text={item.label} fontSize={24} />
			</Layout>
		);
		return all(barRef().height(height, 0.8), barRef().opacity(1, 0.3));
	});

	for (const bar of bars) {
		yield* bar;
		yield* waitFor(0.2);
	}
"##;

#[test]
fn empty_input_is_valid() {
    let v = validate("");
    assert!(v.ok);
    assert!(v.errors.is_empty());
}

#[test]
fn scene_bodies_are_valid() {
    for src in [TEXT_REVEAL_BODY, BAR_CHART_BODY] {
        let v = validate(src);
        assert!(v.ok, "{:?}", v.errors);
    }
}

#[test]
fn unterminated_constructs_fail_with_positions() {
    let v = validate("const a = 'x;\n");
    assert!(!v.ok);
    assert!(
        v.errors.contains(&"1:11: Unterminated string".to_string()),
        "{:?}",
        v.errors
    );

    for src in [
        "yield view.add(\n  <Txt text=\"hi\" />\n",
        "const t = `abc",
        "/* never closed",
        "view.add(<Rect>)",
        "{ const x = [1, 2; }",
    ] {
        let v = validate(src);
        assert!(!v.ok, "{src}");
        assert!(!v.errors.is_empty(), "{src}");
    }
}

#[test]
fn grammar_errors_are_rejected() {
    for src in [
        "let x = ;",
        "const = 5;",
        "if x { }",
        "a b c",
        "yield* ;",
        "view.add(<Txt text=\"a\\\"b\" />);",
        "const total = 1 +;",
    ] {
        let v = validate(src);
        assert!(!v.ok, "{src} should be rejected");
        assert!(v.errors.iter().all(|e| e.starts_with("1:")), "{src}: {:?}", v.errors);
    }
}

#[test]
fn module_syntax_is_rejected_in_the_body() {
    let v = validate("import {Txt} from '@revideo/2d';\nyield view.add(<Txt/>);");
    assert!(!v.ok);
    assert_eq!(
        v.errors,
        vec!["1:1: 'import' is not allowed inside the scene body".to_string()]
    );

    let v = validate("if (ready) {\n  export const x = 1;\n}");
    assert!(!v.ok);
}

#[test]
fn closing_the_body_early_is_rejected() {
    let v = validate("}\nfunction* escape() {");
    assert!(!v.ok);
    assert_eq!(
        v.errors,
        vec!["1:1: '}' closes the scene body early".to_string()]
    );
}

#[test]
fn typescript_generics_are_accepted() {
    for src in [
        "const id = <T,>(x: T) => x;",
        "let f: <T>(x: T) => T = (x) => x;",
        "const pick = <T extends object>(value: T): T => value;",
        "const textRef = createRef<Txt>();",
        "const sizes: Array<number> = [1, 2];",
        "if (a < b && c > d) { yield* waitFor(1); }",
    ] {
        let v = validate(src);
        assert!(v.ok, "{src}: {:?}", v.errors);
    }
}

#[test]
fn redeclarations_are_rejected() {
    let v = validate("const a = 1;\nconst a = 2;");
    assert_eq!(
        v.errors,
        vec!["1:7: Identifier `a` has already been declared".to_string()]
    );
}

#[test]
fn whole_documents_are_checked_as_modules() {
    let doc = "import {makeScene2D} from '@revideo/2d';\n\nexport default makeScene2D('main', function* (view) {\n  yield;\n});\n";
    assert!(validate_document(doc).ok);
    assert!(!validate(doc).ok);

    let nested = doc.replace("yield;", "import x from 'y';");
    let v = validate_document(&nested);
    assert!(!v.ok);
    assert!(v.errors[0].starts_with("4:3: 'import' is only allowed"), "{:?}", v.errors);
}

#[test]
fn semantic_mistakes_are_not_syntax_errors() {
    assert!(validate("undefinedThing.doesNotExist(1, 2);").ok);
    assert!(validate("yield* 42;").ok);
}

#[test]
fn oversized_input_fails_closed() {
    let big = "a".repeat(MAX_SOURCE_BYTES + 1);
    let v = validate(&big);
    assert!(!v.ok);
    assert!(v.errors[0].contains("at most"));
}

#[test]
fn into_result_maps_to_validation_error() {
    assert!(validate("f(1)").into_result().is_ok());
    let err = validate("f(").into_result().unwrap_err();
    assert!(matches!(err, SceneError::Validation { ref errors } if !errors.is_empty()));
}

#[test]
fn validation_is_safe_to_share_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let src = if i % 2 == 0 { TEXT_REVEAL_BODY } else { "f(" };
                validate(src).ok
            })
        })
        .collect();
    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![true, false, true, false]);
}
