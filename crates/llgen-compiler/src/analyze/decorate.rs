//! The per-node decoration rules: one function per `Expr` variant, each
//! taking the node, the storage method inherited from its parent, and the
//! scope visible at that point, and returning the decorated node alongside
//! the scope visible to whatever comes *after* it in the same body (only
//! `Named` ever grows it).

use indexmap::IndexMap;

use llgen_core::{
    As, DebugExpr, ErrorAnnotation, Expr, LLType, LiteralParser, Named, Peek, PeekCase,
    RegexParser, Sequence, StorageMethod, Struct, Var,
};

use super::{AnalyzeError, Scope};

/// A decorated expression node: the source node it was built from, its
/// resolved type, the storage method the emitter should use for it, and
/// (for composite nodes) its already-decorated children.
pub struct Decorated<'a> {
    pub expr: &'a Expr,
    pub ty: LLType,
    pub storage: StorageMethod,
    pub kind: DecoratedKind<'a>,
}

pub enum DecoratedKind<'a> {
    Leaf,
    Sequence(Box<Decorated<'a>>, Box<Decorated<'a>>),
    Peek(Vec<DecoratedCase<'a>>),
    Named(Box<Decorated<'a>>),
    As(Box<Decorated<'a>>, Box<Decorated<'a>>),
    Error(Box<Decorated<'a>>),
    Debug(Box<Decorated<'a>>),
}

pub struct DecoratedCase<'a> {
    pub test: Option<Box<Decorated<'a>>>,
    pub body: Box<Decorated<'a>>,
}

/// Peel one `Parser` layer off a type, the way `Named` turns "a parser
/// producing X" into "X, the value the user's local name is bound to".
/// Used both by `Named` itself and by the top-level `Def` pass, since
/// referencing a rule by name must read exactly like referencing any other
/// parser expression.
pub(super) fn effective_return(ty: &LLType) -> LLType {
    match ty {
        LLType::Parser(ret) => (**ret).clone(),
        other => other.clone(),
    }
}

fn leaf<'a>(expr: &'a Expr, ty: LLType, storage: StorageMethod) -> Decorated<'a> {
    Decorated {
        expr,
        ty,
        storage,
        kind: DecoratedKind::Leaf,
    }
}

/// Decorate `expr` under the inherited `storage` method and `scope`,
/// returning the decorated node and the scope visible afterward (extended
/// only if `expr` contains a `Named`).
pub fn decorate<'a>(
    expr: &'a Expr,
    storage: StorageMethod,
    scope: &Scope,
) -> Result<(Decorated<'a>, Scope), AnalyzeError> {
    match expr {
        Expr::LiteralParser(LiteralParser { .. }) | Expr::RegexParser(RegexParser { .. }) => {
            Ok((leaf(expr, LLType::parser(LLType::String), storage), scope.clone()))
        }

        Expr::LitStr(_) => Ok((leaf(expr, LLType::String, storage), scope.clone())),

        Expr::Var(Var { name, offset }) => {
            let ty = scope
                .get(name)
                .cloned()
                .ok_or_else(|| AnalyzeError::UnresolvedName {
                    name: name.clone(),
                    offset: *offset,
                })?;
            Ok((leaf(expr, ty, storage), scope.clone()))
        }

        Expr::Sequence(Sequence { first, second }) => {
            let (da, scope1) = decorate(first, StorageMethod::Ignore, scope)?;
            let (db, scope2) = decorate(second, storage.clone(), &scope1)?;
            let ty = db.ty.clone();
            Ok((
                Decorated {
                    expr,
                    ty,
                    storage,
                    kind: DecoratedKind::Sequence(Box::new(da), Box::new(db)),
                },
                scope2,
            ))
        }

        Expr::Peek(Peek { cases, offset }) => {
            let mut decorated_cases = Vec::with_capacity(cases.len());
            let mut common_ty: Option<LLType> = None;

            for PeekCase { test, body } in cases {
                let (dtest, scope_for_body) = match test {
                    Some(test_expr) => {
                        let (dt, s) = decorate(test_expr, StorageMethod::Ignore, scope)?;
                        (Some(Box::new(dt)), s)
                    }
                    None => (None, scope.clone()),
                };
                let (dbody, _) = decorate(body, storage.clone(), &scope_for_body)?;

                match &common_ty {
                    None => common_ty = Some(dbody.ty.clone()),
                    Some(expected) if *expected != dbody.ty => {
                        return Err(AnalyzeError::PeekTypeMismatch { offset: *offset });
                    }
                    Some(_) => {}
                }

                decorated_cases.push(DecoratedCase {
                    test: dtest,
                    body: Box::new(dbody),
                });
            }

            let ty = common_ty.expect("peek requires at least one case");
            Ok((
                Decorated {
                    expr,
                    ty,
                    storage,
                    kind: DecoratedKind::Peek(decorated_cases),
                },
                scope.clone(),
            ))
        }

        Expr::Named(Named { expr: inner, name, .. }) => {
            let (dinner, scope1) = decorate(inner, StorageMethod::Var(name.clone()), scope)?;
            let bound_ty = effective_return(&dinner.ty);
            let mut scope2 = scope1;
            scope2.insert(name.clone(), bound_ty);
            let ty = dinner.ty.clone();
            Ok((
                Decorated {
                    expr,
                    ty,
                    storage,
                    kind: DecoratedKind::Named(Box::new(dinner)),
                },
                scope2,
            ))
        }

        Expr::As(As { parser, result }) => {
            let (dparser, scope1) = decorate(parser, StorageMethod::Ignore, scope)?;
            let (dresult, scope2) = decorate(result, storage.clone(), &scope1)?;
            let ty = dresult.ty.clone();
            Ok((
                Decorated {
                    expr,
                    ty,
                    storage,
                    kind: DecoratedKind::As(Box::new(dparser), Box::new(dresult)),
                },
                scope2,
            ))
        }

        Expr::Error(ErrorAnnotation { parser, .. }) => {
            let (dparser, scope1) = decorate(parser, storage.clone(), scope)?;
            let ty = dparser.ty.clone();
            Ok((
                Decorated {
                    expr,
                    ty,
                    storage,
                    kind: DecoratedKind::Error(Box::new(dparser)),
                },
                scope1,
            ))
        }

        Expr::Debug(DebugExpr { expr: inner }) => {
            let (dinner, scope1) = decorate(inner, storage.clone(), scope)?;
            let ty = dinner.ty.clone();
            Ok((
                Decorated {
                    expr,
                    ty,
                    storage,
                    kind: DecoratedKind::Debug(Box::new(dinner)),
                },
                scope1,
            ))
        }

        Expr::Struct(Struct { fields, .. }) => {
            // Field values are only *resolved* (their emitted JS reference
            // recovered) during emission; here we opportunistically look up
            // each field's current type for nodes that need `Struct`'s type
            // (e.g. a peek arm), but leave a missing name for emission to
            // reject rather than failing decoration on it.
            let mut field_types = IndexMap::with_capacity(fields.len());
            for (field_name, value_name) in fields {
                let field_ty = scope.get(value_name).cloned().unwrap_or(LLType::Null);
                field_types.insert(field_name.clone(), field_ty);
            }
            Ok((leaf(expr, LLType::Struct(field_types), storage), scope.clone()))
        }
    }
}
