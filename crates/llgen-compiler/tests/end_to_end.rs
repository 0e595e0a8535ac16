//! End-to-end compile checks over the six scenarios a grammar author would
//! actually write.
//!
//! These exercise the whole pipeline (`driver::compile`), not just a single
//! stage, and assert on the emitted JS source's structure rather than
//! running it — there's no JS engine in this test binary, so each
//! assertion pins down the textual shape the runtime's `__require`/`__test`
//! contract depends on instead of the runtime behavior itself.

use llgen_compiler::compile;

#[test]
fn literal_grammar_requires_its_token_and_exports_the_rule() {
    let out = compile("export test :: `foo`").unwrap();
    assert_eq!(out.exports, vec!["test".to_string()]);
    assert!(out.source.contains(r#""lit_foo": /^foo/"#));
    assert!(out.source.contains(r#"this.__require("lit_foo").value;"#));
}

#[test]
fn regex_grammar_registers_the_pattern_as_its_own_token_name() {
    let out = compile(r"export test :: r`fo+`").unwrap();
    assert!(out.source.contains(r#""fo+": /^fo+/"#));
}

#[test]
fn sequence_result_is_the_last_named_binding() {
    let out = compile("export test :: [`foo`: first] [`bar`: second]").unwrap();
    // `first` is bound but not the final statement in the method, so no
    // rebind to `return`; `second` is the sequence's tail and does return.
    assert!(!out.source.contains("return first;"));
    assert!(out.source.contains("return second;"));
}

#[test]
fn peek_grammar_builds_one_test_closure_per_non_default_case() {
    let out = compile(
        "export test :: peek { \
            case `foo` => `foo` `bar` \
            case `baz` => `baz` `bat` \
            case _ => `default` \
         }",
    )
    .unwrap();
    assert!(out.source.contains("function __test_case_1()"));
    assert!(out.source.contains("function __test_case_2()"));
    assert!(!out.source.contains("__test_case_3"));
    assert!(out.source.contains("(function match() {"));
}

#[test]
fn chained_error_annotations_each_wrap_their_own_parser_in_try_catch() {
    let out = compile(
        r#"export test :: `foo` ! "Fooerror!" `bar` ! "Barerror!""#,
    )
    .unwrap();
    assert!(out.source.contains(r#"throw new Error("Fooerror!");"#));
    assert!(out.source.contains(r#"throw new Error("Barerror!");"#));
    // Each annotation guards only its own parser, not the whole sequence.
    assert_eq!(out.source.matches("try {").count(), 2);
}

#[test]
fn struct_construction_names_its_type_and_references_bound_fields() {
    let out = compile(
        "integer :: r`\\d+`\n\
         export test :: [integer: n] `/` [integer: d] as struct Node { numerator: n, denominator: d }",
    )
    .unwrap();
    assert!(out.source.contains(r#""numerator": n"#));
    assert!(out.source.contains(r#""denominator": d"#));
    assert!(out.source.contains(r#""_type": "Node""#));
}

#[test]
fn unexported_rule_is_rejected_as_a_standalone_entrypoint() {
    let out = compile("test :: `foo`").unwrap();
    assert!(out.with_standalone_entrypoint("test").is_err());
}

#[test]
fn exported_rule_is_accepted_as_a_standalone_entrypoint() {
    let out = compile("export test :: `foo`").unwrap();
    let out = out.with_standalone_entrypoint("test").unwrap();
    let source = out.into_source();
    assert!(source.contains("require(\"fs\").readFileSync(0, \"utf-8\")"));
    assert!(source.contains("exports.test(__input)"));
}
