use javelin_syntax::{NodeData, NodeId, TypeRef};

use crate::context::{CheckContext, ThrownSet};
use crate::diagnostics::{Diagnostic, ErrorCategory, ErrorPayload};
use crate::resolve::{ResolveOutcome, TypeOutcome};

/// Exception inventory of one try statement, computed on first request
/// and cached on the walk context. Catch subtrees are excluded; resources
/// and the body both contribute.
pub(crate) fn thrown_set(ctx: &mut CheckContext<'_>, try_node: NodeId) -> ThrownSet {
    if let Some(cached) = ctx.thrown_cache.get(&try_node) {
        return cached.clone();
    }
    let tree = ctx.tree;
    let mut set = ThrownSet::default();
    for &child in tree.children(try_node) {
        if matches!(tree.data(child), NodeData::Catch { .. }) {
            continue;
        }
        collect_thrown(ctx, child, &mut set);
    }
    ctx.thrown_cache.insert(try_node, set.clone());
    set
}

fn collect_thrown(ctx: &mut CheckContext<'_>, root: NodeId, set: &mut ThrownSet) {
    let tree = ctx.tree;
    for node in tree.preorder(root) {
        match tree.data(node) {
            NodeData::Throw => {
                let Some(&expr) = tree.children(node).first() else {
                    continue;
                };
                match ctx.resolver.expr_type(expr) {
                    TypeOutcome::Known(ty) => match ty.class_name() {
                        Some(name) => push_thrown(set, name.to_string()),
                        None => set.has_unresolved = true,
                    },
                    TypeOutcome::Unknown | TypeOutcome::Deferred => set.has_unresolved = true,
                }
            }
            NodeData::Call { .. } => match ctx.resolver.resolve_reference(node) {
                ResolveOutcome::Unique(symbol) => {
                    let throws = ctx.resolver.method(symbol).map(|m| m.throws.clone());
                    match throws {
                        Some(throws) => {
                            for name in throws {
                                push_thrown(set, name);
                            }
                        }
                        None => set.has_unresolved = true,
                    }
                }
                ResolveOutcome::Unresolved
                | ResolveOutcome::Ambiguous(_)
                | ResolveOutcome::Deferred => set.has_unresolved = true,
            },
            _ => {}
        }
    }
}

fn push_thrown(set: &mut ThrownSet, name: String) {
    if !set.types.contains(&name) {
        set.types.push(name);
    }
}

/// A catch type fully covered by an earlier clause is unreachable.
pub(crate) fn check_exception_already_caught(
    ctx: &mut CheckContext<'_>,
    try_node: NodeId,
    catch_node: NodeId,
) {
    let tree = ctx.tree;
    let types = match tree.data(catch_node) {
        NodeData::Catch { types, .. } => types,
        _ => return,
    };
    let mut prior: Vec<&TypeRef> = Vec::new();
    for &clause in tree.children(try_node) {
        if clause == catch_node {
            break;
        }
        if let NodeData::Catch {
            types: clause_types, ..
        } = tree.data(clause)
        {
            prior.extend(clause_types);
        }
    }
    for caught in types {
        for earlier in &prior {
            match ctx.resolver.is_subtype(&caught.name, &earlier.name) {
                Err(_) => return,
                Ok(false) => {}
                Ok(true) => {
                    ctx.report(
                        Diagnostic::new(
                            ErrorCategory::ExceptionHandling,
                            "catch.already.caught",
                            caught.range,
                            format!("exception '{}' has already been caught", caught.name),
                        )
                        .with_payload(ErrorPayload::Name {
                            name: earlier.name.clone(),
                        }),
                    );
                    return;
                }
            }
        }
    }
}

/// Checked catch types must intersect the try block's inventory in either
/// subtype direction. The whole construct abstains once the inventory is
/// incomplete.
pub(crate) fn check_exception_thrown_in_try(
    ctx: &mut CheckContext<'_>,
    catch_node: NodeId,
    thrown: &ThrownSet,
) {
    if thrown.has_unresolved {
        return;
    }
    let tree = ctx.tree;
    let types = match tree.data(catch_node) {
        NodeData::Catch { types, .. } => types,
        _ => return,
    };
    for caught in types {
        match ctx.resolver.is_unchecked_exception(&caught.name) {
            Err(_) => return,
            Ok(true) => continue,
            Ok(false) => {}
        }
        let mut reachable = false;
        for thrown_name in &thrown.types {
            let downward = match ctx.resolver.is_subtype(thrown_name, &caught.name) {
                Err(_) => return,
                Ok(hit) => hit,
            };
            let upward = match ctx.resolver.is_subtype(&caught.name, thrown_name) {
                Err(_) => return,
                Ok(hit) => hit,
            };
            if downward || upward {
                reachable = true;
                break;
            }
        }
        if !reachable {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::ExceptionHandling,
                    "catch.never.thrown",
                    caught.range,
                    format!(
                        "exception '{}' is never thrown in the corresponding try block",
                        caught.name
                    ),
                )
                .with_payload(ErrorPayload::Thrown {
                    types: thrown.types.clone(),
                }),
            );
            return;
        }
    }
}

/// Multi-catch disjuncts must be pairwise unrelated.
pub(crate) fn check_multi_catch_disjoint(ctx: &mut CheckContext<'_>, catch_node: NodeId) {
    let tree = ctx.tree;
    let types = match tree.data(catch_node) {
        NodeData::Catch { types, .. } => types,
        _ => return,
    };
    for (position, first) in types.iter().enumerate() {
        for second in &types[position + 1..] {
            let forward = match ctx.resolver.is_subtype(&first.name, &second.name) {
                Err(_) => return,
                Ok(hit) => hit,
            };
            let backward = match ctx.resolver.is_subtype(&second.name, &first.name) {
                Err(_) => return,
                Ok(hit) => hit,
            };
            let (anchor, sub, sup) = if forward {
                (first, &first.name, &second.name)
            } else if backward {
                (second, &second.name, &first.name)
            } else {
                continue;
            };
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::ExceptionHandling,
                    "catch.multi.not.disjoint",
                    anchor.range,
                    format!(
                        "types in a multi-catch must be disjoint: '{sub}' is a subclass of '{sup}'"
                    ),
                )
                .with_payload(ErrorPayload::Types {
                    expected: sup.clone(),
                    actual: sub.clone(),
                }),
            );
            return;
        }
    }
}

pub(crate) fn check_label_target(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    let NodeData::Labeled { label, label_range } = tree.data(node) else {
        return;
    };
    let labelable = tree
        .children(node)
        .first()
        .is_some_and(|&body| tree.data(body).is_labelable());
    if !labelable {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Structural,
                "stmt.label.not.labelable",
                *label_range,
                format!("label '{label}' must be attached to a loop, switch or block"),
            )
            .with_payload(ErrorPayload::Name {
                name: label.clone(),
            }),
        );
    }
}

pub(crate) fn check_label_in_use(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    let NodeData::Labeled { label, label_range } = tree.data(node) else {
        return;
    };
    for up in tree.ancestors(node) {
        if let NodeData::Labeled { label: outer, .. } = tree.data(up) {
            if outer == label {
                ctx.report(
                    Diagnostic::new(
                        ErrorCategory::Structural,
                        "stmt.label.in.use",
                        *label_range,
                        format!("label '{label}' is already in use"),
                    )
                    .with_payload(ErrorPayload::Name {
                        name: label.clone(),
                    }),
                );
                return;
            }
        }
    }
}
