use super::compile;

#[test]
fn compile_renders_the_runtime_template_around_the_emitted_methods() {
    let emitted = compile("export test :: `foo`").unwrap();
    assert!(emitted.source.contains("class Parser {"));
    assert!(emitted.source.contains("__require"));
    assert!(emitted.source.contains("test() {"));
    assert!(emitted.source.contains("exports.test ="));
}

#[test]
fn compile_surfaces_a_lex_error() {
    let err = compile("test :: @").unwrap_err();
    assert!(matches!(err, super::DriverError::Lex(_)));
}

#[test]
fn compile_surfaces_an_analyze_error() {
    let err = compile("test :: nope").unwrap_err();
    assert!(matches!(err, super::DriverError::Analyze(_)));
}

#[test]
fn an_analyze_error_diagnostic_points_at_the_unresolved_names_offset() {
    let src = "test :: nope";
    let err = compile(src).unwrap_err();
    let diagnostic = err.diagnostic();
    assert_eq!(diagnostic.offset, src.find("nope").unwrap() as u32);
    let rendered = diagnostic.printer().source(src).render();
    assert!(rendered.contains("undefined name `nope`"));
}

#[test]
fn a_lex_error_diagnostic_points_at_the_bad_characters_offset() {
    let src = "test :: @";
    let err = compile(src).unwrap_err();
    let diagnostic = err.diagnostic();
    assert_eq!(diagnostic.offset, src.find('@').unwrap() as u32);
}

#[test]
fn standalone_entrypoint_must_be_exported() {
    let emitted = compile("test :: `foo`").unwrap();
    assert!(emitted.with_standalone_entrypoint("test").is_err());
}

#[test]
fn standalone_entrypoint_appends_a_stdin_reading_shim_when_exported() {
    let emitted = compile("export test :: `foo`").unwrap();
    let source = emitted.with_standalone_entrypoint("test").unwrap().into_source();
    assert!(source.contains("readFileSync(0, \"utf-8\")"));
    assert!(source.contains("console.log(JSON.stringify(exports.test(__input)));"));
}
