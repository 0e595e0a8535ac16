use indoc::indoc;
use llgen_core::{lex, Expr};

use super::parse;

fn parse_src(src: &str) -> llgen_core::Program {
    let tokens = lex(src).expect("lexing should succeed");
    parse(&tokens).expect("parsing should succeed")
}

#[test]
fn literal_parser_strips_delimiters_and_unescapes_backtick() {
    let program = parse_src(r"test :: `f\`oo`");
    let Expr::LiteralParser(ref literal) = program.defs[0].expr else {
        panic!("expected a literal parser");
    };
    assert_eq!(literal.lexeme, "f`oo");
}

#[test]
fn regex_parser_strips_the_r_prefix_and_delimiters() {
    let program = parse_src(r"test :: r`fo+`");
    let Expr::RegexParser(ref regex) = program.defs[0].expr else {
        panic!("expected a regex parser");
    };
    assert_eq!(regex.pattern, "fo+");
}

#[test]
fn export_keyword_is_optional_and_recorded() {
    let program = parse_src("export a :: `x`\nb :: `y`");
    assert!(program.defs[0].exported);
    assert!(!program.defs[1].exported);
}

#[test]
fn var_backs_off_when_immediately_followed_by_doublecolon() {
    // `first` is not a reference here — it's the start of the next `def`.
    let program = parse_src("a :: `x`\nfirst :: `y`");
    assert_eq!(program.defs.len(), 2);
    assert_eq!(program.defs[1].name, "first");
}

#[test]
fn sequence_is_right_associative_over_three_atoms() {
    let program = parse_src("test :: `a` `b` `c`");
    let Expr::Sequence(ref outer) = program.defs[0].expr else {
        panic!("expected a sequence");
    };
    assert!(matches!(*outer.first, Expr::LiteralParser(_)));
    assert!(matches!(*outer.second, Expr::Sequence(_)));
}

#[test]
fn named_binding_round_trips_name_and_offset() {
    let program = parse_src("test :: [`foo`: thing]");
    let Expr::Named(ref named) = program.defs[0].expr else {
        panic!("expected a named binding");
    };
    assert_eq!(named.name, "thing");
    assert!(matches!(*named.expr, Expr::LiteralParser(_)));
}

#[test]
fn peek_requires_at_least_one_case_and_allows_a_default() {
    let src = indoc! {r#"
        test :: peek {
            case `foo` => `foo`
            case _ => `default`
        }
    "#};
    let program = parse_src(src);
    let Expr::Peek(ref peek) = program.defs[0].expr else {
        panic!("expected a peek");
    };
    assert_eq!(peek.cases.len(), 2);
    assert!(peek.cases[0].test.is_some());
    assert!(peek.cases[1].test.is_none());
}

#[test]
fn peek_with_no_cases_is_rejected() {
    let tokens = lex("test :: peek { }").unwrap();
    assert!(parse(&tokens).is_err());
}

#[test]
fn suffix_operators_compose_in_either_order() {
    let program = parse_src(r#"test :: `x` ! "bad" as y"#);
    let Expr::As(ref as_node) = program.defs[0].expr else {
        panic!("expected an `as` wrapping an `!`");
    };
    assert!(matches!(*as_node.parser, Expr::Error(_)));
}

#[test]
fn error_annotations_attach_per_atom_in_a_sequence() {
    let program = parse_src(r#"test :: `foo` ! "Fooerror!" `bar` ! "Barerror!""#);
    let Expr::Sequence(ref seq) = program.defs[0].expr else {
        panic!("expected a sequence of two independently erroring atoms");
    };
    let Expr::Error(ref first) = *seq.first else {
        panic!("expected the first element to carry its own error message");
    };
    assert_eq!(first.message, "Fooerror!");
    let Expr::Error(ref second) = *seq.second else {
        panic!("expected the second element to carry its own error message");
    };
    assert_eq!(second.message, "Barerror!");
}

#[test]
fn error_message_is_unescaped() {
    let program = parse_src(r#"test :: `x` ! "a \"quoted\" word""#);
    let Expr::Error(ref err) = program.defs[0].expr else {
        panic!("expected an error annotation");
    };
    assert_eq!(err.message, "a \"quoted\" word");
}

#[test]
fn struct_construction_allows_a_trailing_comma() {
    let program = parse_src("test :: struct Node { numerator: n, denominator: d, }");
    let Expr::Struct(ref s) = program.defs[0].expr else {
        panic!("expected a struct");
    };
    assert_eq!(s.name.as_deref(), Some("Node"));
    assert_eq!(s.fields.get("numerator").map(String::as_str), Some("n"));
    assert_eq!(s.fields.get("denominator").map(String::as_str), Some("d"));
}

#[test]
fn anonymous_struct_has_no_name() {
    let program = parse_src("test :: struct { a: b }");
    let Expr::Struct(ref s) = program.defs[0].expr else {
        panic!("expected a struct");
    };
    assert!(s.name.is_none());
}

#[test]
fn leftover_tokens_after_a_complete_file_are_an_error() {
    // A dangling `::` can't start a fresh def, so parsing it must fail
    // rather than silently truncating the program.
    let tokens = lex("test :: `x`\n::").unwrap();
    assert!(parse(&tokens).is_err());
}

#[test]
fn empty_source_parses_to_an_empty_program() {
    let tokens = lex("   \n  ").unwrap();
    let program = parse(&tokens).unwrap();
    assert!(program.defs.is_empty());
}
