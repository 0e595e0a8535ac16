use llgen_core::lex;

use super::emit_program;
use crate::analyze::decorate_program;
use crate::parser::parse;

fn emit_src(src: &str) -> super::EmitOutput {
    let tokens = lex(src).unwrap();
    let program = parse(&tokens).unwrap();
    let decorated = decorate_program(&program).unwrap();
    emit_program(&decorated).unwrap()
}

#[test]
fn literal_parser_emits_a_require_call_and_registers_its_token() {
    let out = emit_src("export test :: `foo`");
    assert!(out.parsers.contains(r#"this.__require("lit_foo").value;"#));
    assert!(out.tokens.render().contains(r#""lit_foo": /^foo/"#));
    assert_eq!(out.exports, vec!["test".to_string()]);
}

#[test]
fn unexported_def_does_not_appear_in_exports() {
    let out = emit_src("test :: `foo`");
    assert!(out.exports.is_empty());
}

#[test]
fn regex_parser_token_name_is_the_pattern_itself() {
    let out = emit_src(r"test :: r`fo+`");
    assert!(out.tokens.render().contains(r#""fo+": /^fo+/"#));
}

#[test]
fn top_level_def_body_ends_in_a_return() {
    let out = emit_src("test :: `foo`");
    assert!(out.parsers.contains("return this.__require"));
}

#[test]
fn named_as_the_outermost_expression_emits_a_rebind_to_return() {
    let out = emit_src("test :: [`foo`: x]");
    assert!(out.parsers.contains("return x;"));
}

#[test]
fn named_before_the_last_sequence_element_does_not_rebind() {
    // `x` is bound by a non-last sequence element (decorated `Ignore`) and
    // must not get a dead rebinding statement; `y` is last (`Return`) and
    // must.
    let out = emit_src("test :: [`foo`: x] [`bar`: y]");
    assert!(!out.parsers.contains("return x;"));
    assert!(out.parsers.contains("return y;"));
}

#[test]
fn peek_emits_one_test_closure_per_conditional_case_and_a_bare_default() {
    let out = emit_src(
        "test :: peek { case `foo` => `foo` case _ => `default` }",
    );
    assert!(out.parsers.contains("function __test_case_1()"));
    assert!(out.parsers.contains("this.__test(__test_case_1)"));
    assert!(!out.parsers.contains("__test_case_2"));
    assert!(out.parsers.contains("(function match() {"));
}

#[test]
fn error_annotation_wraps_parser_in_try_catch_with_the_message() {
    let out = emit_src(r#"test :: `foo` ! "custom message""#);
    assert!(out.parsers.contains("try {"));
    assert!(out.parsers.contains(r#"throw new Error("custom message");"#));
}

#[test]
fn debug_under_return_storage_uses_ret_as_the_temporary() {
    let out = emit_src("test :: debug(`foo`)");
    assert!(out.parsers.contains("console.log(JSON.stringify(ret));"));
    assert!(out.parsers.contains("return ret;"));
}

#[test]
fn struct_with_a_name_includes_a_reserved_type_field() {
    let out = emit_src(
        "integer :: r`\\d+`\ntest :: [integer: n] as struct Node { value: n }",
    );
    assert!(out.parsers.contains(r#""value": n"#));
    assert!(out.parsers.contains(r#""_type": "Node""#));
}

#[test]
fn var_in_parser_position_self_calls_the_method() {
    let out = emit_src("a :: `x`\ntest :: a");
    assert!(out.parsers.contains("this.a();"));
}

#[test]
fn invalid_regex_pattern_is_an_emit_error() {
    let tokens = lex(r"test :: r`(unclosed`").unwrap();
    let program = parse(&tokens).unwrap();
    let decorated = decorate_program(&program).unwrap();
    assert!(emit_program(&decorated).is_err());
}
