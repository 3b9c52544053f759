use javelin_syntax::{NodeData, NodeId, TextRange, Ty, TypeRef};

use crate::checkers::class;
use crate::context::CheckContext;
use crate::diagnostics::{Diagnostic, ErrorCategory, ErrorPayload};
use crate::resolve::{ResolveOutcome, SymbolRef, TypeOutcome};

/// Condition expressions of `if`/`while`/`do-while`/`assert` and the
/// ternary operator must type as boolean. The caller picks the condition
/// child; `do-while` keeps it last.
pub(crate) fn check_condition_boolean(ctx: &mut CheckContext<'_>, condition: NodeId) {
    let tree = ctx.tree;
    let TypeOutcome::Known(ty) = ctx.resolver.expr_type(condition) else {
        return;
    };
    if !ty.is_boolean() {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Structural,
                "expr.condition.not.boolean",
                tree.range(condition),
                format!("incompatible types: expected 'boolean', found '{ty}'"),
            )
            .with_payload(ErrorPayload::Types {
                expected: "boolean".to_string(),
                actual: ty.to_string(),
            }),
        );
    }
}

pub(crate) fn check_array_access(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    let children = tree.children(node);
    let (Some(&array), Some(&index)) = (children.first(), children.get(1)) else {
        return;
    };
    if let TypeOutcome::Known(ty) = ctx.resolver.expr_type(array) {
        if !matches!(ty, Ty::Array(_) | Ty::Error) {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Structural,
                    "expr.array.type.expected",
                    tree.range(array),
                    format!("array type expected; found '{ty}'"),
                )
                .with_payload(ErrorPayload::Types {
                    expected: "array".to_string(),
                    actual: ty.to_string(),
                }),
            );
            return;
        }
    }
    if let TypeOutcome::Known(ty) = ctx.resolver.expr_type(index) {
        if !ty.is_int_convertible() {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Structural,
                    "expr.array.index.not.int",
                    tree.range(index),
                    format!("incompatible types: expected 'int', found '{ty}'"),
                )
                .with_payload(ErrorPayload::Types {
                    expected: "int".to_string(),
                    actual: ty.to_string(),
                }),
            );
        }
    }
}

pub(crate) fn check_method_call(
    ctx: &mut CheckContext<'_>,
    node: NodeId,
    name: &str,
    name_range: TextRange,
) {
    match ctx.resolver.resolve_reference(node) {
        ResolveOutcome::Unique(_) | ResolveOutcome::Deferred => {}
        ResolveOutcome::Unresolved => {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Resolution,
                    "expr.call.unresolved",
                    name_range,
                    format!("cannot resolve method '{name}'"),
                )
                .with_payload(ErrorPayload::Name {
                    name: name.to_string(),
                }),
            );
        }
        ResolveOutcome::Ambiguous(candidates) => {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Resolution,
                    "expr.call.ambiguous",
                    name_range,
                    format!("ambiguous method call to '{name}'"),
                )
                .with_payload(ErrorPayload::Candidates {
                    count: candidates.len(),
                }),
            );
        }
    }
}

/// Failed constructor references into abstract types are an instantiation
/// problem, not a resolution one; everything else failing here is.
pub(crate) fn check_method_reference(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    let NodeData::MethodRef {
        qualifier,
        name,
        is_constructor,
    } = tree.data(node)
    else {
        return;
    };
    match ctx.resolver.resolve_reference(node) {
        ResolveOutcome::Unique(_) | ResolveOutcome::Deferred => return,
        ResolveOutcome::Unresolved | ResolveOutcome::Ambiguous(_) => {}
    }
    if *is_constructor {
        match ctx.resolved_class(&qualifier.name) {
            ResolveOutcome::Deferred => return,
            ResolveOutcome::Unique(SymbolRef::Class(id)) => {
                let symbol = ctx.resolver.class(id);
                if symbol.kind.is_interface_like() || symbol.modifiers.is_abstract {
                    class::check_illegal_instantiation(ctx, id, qualifier.range);
                    return;
                }
            }
            _ => {}
        }
    }
    ctx.report(
        Diagnostic::new(
            ErrorCategory::Resolution,
            "expr.method.ref.unresolved",
            tree.range(node),
            format!("cannot resolve method reference '{name}'"),
        )
        .with_payload(ErrorPayload::Name { name: name.clone() }),
    );
}

/// `new Inner()` without an enclosing instance, written in a static
/// context and not qualified with an outer expression.
pub(crate) fn check_new_inner_in_static_context(
    ctx: &mut CheckContext<'_>,
    node: NodeId,
    ty: &TypeRef,
    qualified: bool,
) {
    if qualified {
        return;
    }
    let ResolveOutcome::Unique(SymbolRef::Class(id)) = ctx.resolved_class(&ty.name) else {
        return;
    };
    let symbol = ctx.resolver.class(id);
    // A local class declared in a static context captures no enclosing
    // instance; one declared in an instance context does, just like an
    // inner class.
    let needs_instance = if symbol.is_local {
        !symbol
            .decl
            .is_some_and(|decl_node| ctx.in_static_context(decl_node))
    } else {
        symbol.is_inner && !symbol.modifiers.is_static
    };
    let flavor = if symbol.is_local { "local" } else { "inner" };
    if needs_instance && ctx.in_static_context(node) {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Structural,
                "expr.new.inner.static",
                ty.range,
                format!(
                    "cannot instantiate {flavor} class '{}' from a static context",
                    ty.name
                ),
            )
            .with_payload(ErrorPayload::Name {
                name: ty.name.clone(),
            }),
        );
    }
}
