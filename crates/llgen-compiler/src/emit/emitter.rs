//! The code-generating walk over a decorated tree.
//!
//! Decoration already settled each node's *type* and its *decoration-time*
//! storage method (useful on its own — see `spec.md` §3's data model and
//! the tests in `analyze::decorate_tests`). Emission re-threads storage
//! top-down again rather than trusting that field verbatim, because one
//! node (`Debug`) needs a different storage for code generation than the
//! one it was decorated with: decoration passes the *inherited* storage
//! through to `Debug`'s child (so its type is whatever the caller wanted),
//! but emission always forces that same child into `Var(tmp)` so there's a
//! concrete local to print before forwarding it per the inherited storage.
//! Every other node re-threads storage identically to how it was decorated.

use indexmap::IndexMap;

use llgen_core::{
    ErrorAnnotation, Expr, LLType, LitStr, LiteralParser, Named, RegexParser, StorageMethod,
    Struct, Var,
};

use crate::analyze::{Decorated, DecoratedCase, DecoratedDef, DecoratedKind, DecoratedProgram};

use super::{EmitError, TokenTable};

const INDENT: &str = "    ";

/// Mutable state threaded through a single `Def`'s emission: the shared
/// token table (survives across every `Def`) and the scope built up by
/// `Named` nodes, reset at the start of each `Def` (its local bindings
/// don't leak into the next one).
pub struct Context {
    pub tokens: TokenTable,
    pub exports: Vec<String>,
    scope: IndexMap<String, LLType>,
}

impl Context {
    fn new() -> Self {
        Self {
            tokens: TokenTable::new(),
            exports: Vec::new(),
            scope: IndexMap::new(),
        }
    }
}

pub struct EmitOutput {
    pub parsers: String,
    pub tokens: TokenTable,
    pub exports: Vec<String>,
}

/// Emit every definition in `program`, in source order.
pub fn emit_program(program: &DecoratedProgram<'_>) -> Result<EmitOutput, EmitError> {
    let mut ctx = Context::new();
    let mut methods = Vec::with_capacity(program.defs.len());

    for def in &program.defs {
        if def.def.exported {
            ctx.exports.push(def.def.name.clone());
        }
        methods.push(emit_def(def, &mut ctx)?);
    }

    Ok(EmitOutput {
        parsers: methods.join("\n\n"),
        tokens: ctx.tokens,
        exports: ctx.exports,
    })
}

fn emit_def(def: &DecoratedDef<'_>, ctx: &mut Context) -> Result<String, EmitError> {
    ctx.scope.clear();
    let body_indent = format!("{INDENT}{INDENT}");
    let body = emit_expr(&def.body, ctx, &body_indent, &StorageMethod::Return)?;
    Ok(format!("{INDENT}{}() {{\n{body}\n{INDENT}}}", def.def.name))
}

/// Quote and escape `s` as a JS string literal.
fn js_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn emit_expr(
    decorated: &Decorated<'_>,
    ctx: &mut Context,
    indent: &str,
    storage: &StorageMethod,
) -> Result<String, EmitError> {
    match &decorated.kind {
        DecoratedKind::Leaf => emit_leaf(decorated, ctx, indent, storage),

        DecoratedKind::Sequence(a, b) => {
            let ea = emit_expr(a, ctx, indent, &StorageMethod::Ignore)?;
            let eb = emit_expr(b, ctx, indent, storage)?;
            Ok(format!("{ea}\n{eb}"))
        }

        DecoratedKind::Peek(cases) => emit_peek(cases, ctx, indent, storage),

        DecoratedKind::Named(inner) => emit_named(decorated, inner, ctx, indent, storage),

        DecoratedKind::As(parser, result) => {
            let ep = emit_expr(parser, ctx, indent, &StorageMethod::Ignore)?;
            let er = emit_expr(result, ctx, indent, storage)?;
            Ok(format!("{ep}\n{er}"))
        }

        DecoratedKind::Error(parser) => emit_error(decorated, parser, ctx, indent, storage),

        DecoratedKind::Debug(inner) => emit_debug(inner, ctx, indent, storage),
    }
}

fn emit_leaf(
    decorated: &Decorated<'_>,
    ctx: &mut Context,
    indent: &str,
    storage: &StorageMethod,
) -> Result<String, EmitError> {
    let prefix = storage.as_prefix();
    match decorated.expr {
        Expr::LiteralParser(LiteralParser { lexeme }) => {
            let token_name = ctx.tokens.insert_literal(lexeme);
            Ok(format!("{indent}{prefix}this.__require(\"{token_name}\").value;"))
        }

        Expr::RegexParser(RegexParser { pattern, offset }) => {
            let token_name = ctx.tokens.insert_regex(pattern, *offset)?;
            Ok(format!("{indent}{prefix}this.__require(\"{token_name}\").value;"))
        }

        Expr::LitStr(LitStr { value }) => Ok(format!("{indent}{prefix}{};", js_string_literal(value))),

        Expr::Var(Var { name, .. }) => match &decorated.ty {
            LLType::Parser(_) => Ok(format!("{indent}{prefix}this.{name}();")),
            _ => Ok(format!("{indent}{prefix}{name};")),
        },

        Expr::Struct(Struct { name, fields, offset }) => {
            let inner_indent = format!("{indent}{INDENT}");
            let mut parts = Vec::with_capacity(fields.len() + 1);
            for (field_name, value_name) in fields {
                if !ctx.scope.contains_key(value_name) {
                    return Err(EmitError::UnresolvedFieldReference {
                        field: field_name.clone(),
                        name: value_name.clone(),
                        offset: *offset,
                    });
                }
                parts.push(format!("\"{field_name}\": {value_name}"));
            }
            if let Some(type_name) = name {
                parts.push(format!("\"_type\": {}", js_string_literal(type_name)));
            }
            let body = parts.join(&format!(",\n{inner_indent}"));
            Ok(format!("{indent}{prefix}{{\n{inner_indent}{body}\n{indent}}}"))
        }

        other => unreachable!("leaf decoration over a composite node: {other:?}"),
    }
}

fn emit_peek(
    cases: &[DecoratedCase<'_>],
    ctx: &mut Context,
    indent: &str,
    storage: &StorageMethod,
) -> Result<String, EmitError> {
    let case_indent = format!("{indent}{INDENT}");
    let mut statements = String::new();

    for (i, case) in cases.iter().enumerate() {
        let i = i + 1;
        match &case.test {
            Some(test) => {
                let test_indent = format!("{case_indent}{INDENT}");
                let test_code = emit_expr(test, ctx, &test_indent, &StorageMethod::Ignore)?;
                let body_code = emit_expr(&case.body, ctx, &test_indent, storage)?;
                statements.push_str(&format!(
                    "{case_indent}function __test_case_{i}() {{\n{test_code}\n{case_indent}}}\n\
                     {case_indent}if (this.__test(__test_case_{i})) {{\n{body_code}\n{case_indent}}}\n"
                ));
            }
            None => {
                let body_code = emit_expr(&case.body, ctx, &case_indent, storage)?;
                statements.push_str(&body_code);
                statements.push('\n');
            }
        }
    }

    Ok(format!(
        "{indent}{}(function match() {{\n{statements}{indent}}}).call(this);",
        storage.as_prefix()
    ))
}

fn emit_named(
    decorated: &Decorated<'_>,
    inner: &Decorated<'_>,
    ctx: &mut Context,
    indent: &str,
    storage: &StorageMethod,
) -> Result<String, EmitError> {
    let Expr::Named(Named { name, .. }) = decorated.expr else {
        unreachable!("Named decoration kind implies an Expr::Named node");
    };

    let expr_code = emit_expr(inner, ctx, indent, &StorageMethod::Var(name.clone()))?;

    let bound_ty = match &inner.ty {
        LLType::Parser(ret) => (**ret).clone(),
        other => other.clone(),
    };
    ctx.scope.insert(name.clone(), bound_ty);

    let suffix = if *storage == StorageMethod::Ignore {
        String::new()
    } else {
        format!("\n{indent}{}{name};", storage.as_prefix())
    };
    Ok(format!("{expr_code}{suffix}"))
}

fn emit_error(
    decorated: &Decorated<'_>,
    parser: &Decorated<'_>,
    ctx: &mut Context,
    indent: &str,
    storage: &StorageMethod,
) -> Result<String, EmitError> {
    let Expr::Error(ErrorAnnotation { message, .. }) = decorated.expr else {
        unreachable!("Error decoration kind implies an Expr::Error node");
    };
    let inner_indent = format!("{indent}{INDENT}");
    let parser_code = emit_expr(parser, ctx, &inner_indent, storage)?;
    Ok(format!(
        "{indent}try {{\n{parser_code}\n{indent}}} catch (e) {{\n{inner_indent}throw new Error({});\n{indent}}}",
        js_string_literal(message)
    ))
}

fn emit_debug(
    inner: &Decorated<'_>,
    ctx: &mut Context,
    indent: &str,
    storage: &StorageMethod,
) -> Result<String, EmitError> {
    let (var_name, suffix) = match storage {
        StorageMethod::Ignore => ("__debug".to_string(), String::new()),
        StorageMethod::Return => ("ret".to_string(), format!("\n{indent}return ret;")),
        StorageMethod::Var(name) => (name.clone(), String::new()),
    };

    let inner_code = emit_expr(inner, ctx, indent, &StorageMethod::Var(var_name.clone()))?;
    Ok(format!(
        "{inner_code}\n{indent}console.log(JSON.stringify({var_name}));{suffix}"
    ))
}
