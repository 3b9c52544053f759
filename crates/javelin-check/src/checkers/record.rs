use javelin_syntax::{ClassDecl, ClassKind, MethodDecl, NodeData, NodeId, TypeRef};

use crate::context::CheckContext;
use crate::diagnostics::{Diagnostic, ErrorCategory, ErrorPayload};
use crate::resolve::IndexNotReady;

fn enclosing_record<'t>(ctx: &CheckContext<'t>, node: NodeId) -> Option<(NodeId, &'t ClassDecl)> {
    let class_node = ctx.enclosing_class(node)?;
    let decl = ctx.class_decl(class_node)?;
    (decl.kind == ClassKind::Record).then_some((class_node, decl))
}

/// Component types of the enclosing record, in declaration order.
fn record_components<'t>(ctx: &CheckContext<'t>, class_node: NodeId) -> Vec<(&'t String, &'t TypeRef)> {
    let tree = ctx.tree;
    tree.children(class_node)
        .iter()
        .filter_map(|&child| match tree.data(child) {
            NodeData::RecordComponent { name, ty } => Some((name, ty)),
            _ => None,
        })
        .collect()
}

pub(crate) fn check_record_header(ctx: &mut CheckContext<'_>, decl: &ClassDecl) {
    if decl.kind == ClassKind::Record && decl.record_header.is_none() {
        ctx.report(Diagnostic::new(
            ErrorCategory::Structural,
            "record.header.missing",
            decl.name_range,
            format!("record '{}' is missing its component list", decl.name),
        ));
    }
}

/// Reported on the second and later occurrences only, so a duplicated
/// name produces exactly one diagnostic per extra component.
pub(crate) fn check_component_duplicate(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    let NodeData::RecordComponent { name, .. } = tree.data(node) else {
        return;
    };
    for sibling in tree.siblings_before(node) {
        if let NodeData::RecordComponent { name: earlier, .. } = tree.data(sibling) {
            if earlier == name {
                ctx.report(
                    Diagnostic::new(
                        ErrorCategory::Structural,
                        "record.component.duplicate",
                        tree.range(node),
                        format!("record component '{name}' is already defined"),
                    )
                    .with_payload(ErrorPayload::Name { name: name.clone() }),
                );
                return;
            }
        }
    }
}

/// An explicitly declared accessor must return exactly the component type.
pub(crate) fn check_accessor_return_type(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    let NodeData::RecordComponent { name, ty } = tree.data(node) else {
        return;
    };
    let Some(class_node) = ctx.enclosing_class(node) else {
        return;
    };
    for &member in tree.children(class_node) {
        let NodeData::Method(method) = tree.data(member) else {
            continue;
        };
        if method.is_constructor || method.name != *name || !method.params.is_empty() {
            continue;
        }
        let Some(return_type) = &method.return_type else {
            continue;
        };
        if return_type.erased() != ty.erased() {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Structural,
                    "record.accessor.return",
                    method.name_range,
                    format!("accessor '{name}()' must return '{}'", ty.erased()),
                )
                .with_payload(ErrorPayload::Types {
                    expected: ty.erased(),
                    actual: return_type.erased(),
                }),
            );
        }
        return;
    }
}

/// Canonical (and compact) constructors: at least the record's own
/// visibility, no checked exceptions declared.
pub(crate) fn check_canonical_constructor(
    ctx: &mut CheckContext<'_>,
    node: NodeId,
    decl: &MethodDecl,
) {
    if !decl.is_constructor {
        return;
    }
    let Some((class_node, record)) = enclosing_record(ctx, node) else {
        return;
    };
    let canonical = decl.is_compact_constructor || {
        let components = record_components(ctx, class_node);
        let component_types: Vec<String> =
            components.iter().map(|(_, ty)| ty.erased()).collect();
        decl.erased_params() == component_types
    };
    if !canonical {
        return;
    }
    if decl.modifiers.visibility < record.modifiers.visibility {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Structural,
                "record.constructor.access",
                decl.name_range,
                format!(
                    "canonical constructor must be at least as accessible as record '{}'",
                    record.name
                ),
            )
            .with_payload(ErrorPayload::Signatures {
                found: decl.modifiers.visibility.display().to_string(),
                conflicting: record.modifiers.visibility.display().to_string(),
            }),
        );
        return;
    }
    for thrown in &decl.throws {
        match ctx.resolver.is_unchecked_exception(&thrown.name) {
            Err(IndexNotReady) => return,
            Ok(true) => continue,
            Ok(false) => {
                ctx.report(
                    Diagnostic::new(
                        ErrorCategory::Structural,
                        "record.constructor.throws",
                        thrown.range,
                        format!(
                            "canonical constructor cannot declare checked exception '{}'",
                            thrown.name
                        ),
                    )
                    .with_payload(ErrorPayload::Name {
                        name: thrown.name.clone(),
                    }),
                );
                return;
            }
        }
    }
}

/// Instance state lives in the header; instance fields and initializers
/// in the body are rejected.
pub(crate) fn check_instance_member(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    if enclosing_record(ctx, node).is_none() {
        return;
    }
    match tree.data(node) {
        NodeData::Field { name, modifiers, .. } if !modifiers.is_static => {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Structural,
                    "record.instance.field",
                    tree.range(node),
                    format!("instance field '{name}' is not allowed in a record"),
                )
                .with_payload(ErrorPayload::Name { name: name.clone() }),
            );
        }
        NodeData::Initializer { is_static: false } => {
            ctx.report(Diagnostic::new(
                ErrorCategory::Structural,
                "record.instance.initializer",
                tree.range(node),
                "instance initializers are not allowed in records",
            ));
        }
        _ => {}
    }
}
