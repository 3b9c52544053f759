use rustc_hash::FxHashSet;

use javelin_syntax::{
    AnnotationMemberDecl, ClassKind, LiteralKind, NodeData, NodeId, TypeRef,
};

use crate::context::CheckContext;
use crate::diagnostics::{Diagnostic, ErrorCategory, ErrorPayload};
use crate::resolve::{ClassId, ResolveOutcome, SymbolRef, TypeOutcome};

/// The applied name must resolve to an annotation type, and every named
/// attribute must match a declared member exactly once.
pub(crate) fn check_annotation(ctx: &mut CheckContext<'_>, node: NodeId, name: &TypeRef) {
    let id = match ctx.resolved_class(&name.name) {
        ResolveOutcome::Deferred => return,
        ResolveOutcome::Unresolved => {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Resolution,
                    "annotation.unresolved",
                    name.range,
                    format!("cannot resolve annotation '{}'", name.name),
                )
                .with_payload(ErrorPayload::Name {
                    name: name.name.clone(),
                }),
            );
            return;
        }
        ResolveOutcome::Unique(SymbolRef::Class(id)) => id,
        _ => return,
    };
    if ctx.resolver.class(id).kind != ClassKind::Annotation {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Annotation,
                "annotation.not.annotation.type",
                name.range,
                format!("'{}' is not an annotation type", name.name),
            )
            .with_payload(ErrorPayload::Name {
                name: name.name.clone(),
            }),
        );
        return;
    }
    check_attributes(ctx, node, id, name);
}

fn check_attributes(
    ctx: &mut CheckContext<'_>,
    node: NodeId,
    annotation: ClassId,
    name: &TypeRef,
) {
    let tree = ctx.tree;
    let mut seen: FxHashSet<String> = FxHashSet::default();
    for &child in tree.children(node) {
        let NodeData::NameValuePair {
            name: attribute,
            name_range,
        } = tree.data(child)
        else {
            continue;
        };
        let attribute = attribute.clone().unwrap_or_else(|| "value".to_string());
        if !seen.insert(attribute.clone()) {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Annotation,
                    "annotation.attribute.duplicate",
                    *name_range,
                    format!("duplicate attribute '{attribute}'"),
                )
                .with_payload(ErrorPayload::Name { name: attribute }),
            );
            return;
        }
        let declared = ctx
            .resolver
            .class(annotation)
            .methods
            .iter()
            .any(|member| member.is_annotation_member && member.name == attribute);
        if !declared {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Annotation,
                    "annotation.attribute.unknown",
                    *name_range,
                    format!(
                        "cannot resolve attribute '{attribute}' in annotation '{}'",
                        name.name
                    ),
                )
                .with_payload(ErrorPayload::Name { name: attribute }),
            );
            return;
        }
    }
}

/// Value-side check of one `name = value` pair, driven by the declared
/// member's erased return type.
pub(crate) fn check_name_value_pair(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    let NodeData::NameValuePair { name: attribute, .. } = tree.data(node) else {
        return;
    };
    let attribute = attribute.clone().unwrap_or_else(|| "value".to_string());
    let Some(parent) = tree.parent(node) else {
        return;
    };
    let NodeData::Annotation { name } = tree.data(parent) else {
        return;
    };
    let ResolveOutcome::Unique(SymbolRef::Class(id)) = ctx.resolved_class(&name.name) else {
        return;
    };
    let Some(expected) = ctx
        .resolver
        .class(id)
        .methods
        .iter()
        .find(|member| member.is_annotation_member && member.name == attribute)
        .and_then(|member| member.return_type.clone())
    else {
        return;
    };
    let Some(&value) = tree.children(node).first() else {
        return;
    };
    check_value_against(ctx, value, &expected);
}

/// Array-typed members accept both an initializer and a lone element;
/// everything else must match the erased member type.
fn check_value_against(ctx: &mut CheckContext<'_>, value: NodeId, expected: &str) {
    let tree = ctx.tree;
    if let Some(element) = expected.strip_suffix("[]") {
        if matches!(tree.data(value), NodeData::AnnotationArrayInit) {
            let elements: Vec<NodeId> = tree.children(value).to_vec();
            for element_node in elements {
                check_value_against(ctx, element_node, element);
                if ctx.has_error() {
                    return;
                }
            }
            return;
        }
        check_value_against(ctx, value, element);
        return;
    }
    if matches!(tree.data(value), NodeData::AnnotationArrayInit) {
        report_value_mismatch(ctx, value, expected, "array initializer");
        return;
    }
    let Some(actual) = value_type_name(ctx, value) else {
        return;
    };
    if actual != expected {
        report_value_mismatch(ctx, value, expected, &actual);
    }
}

/// Erased spelling of the value expression's type, `None` when it cannot
/// be established (the check abstains).
fn value_type_name(ctx: &mut CheckContext<'_>, value: NodeId) -> Option<String> {
    let tree = ctx.tree;
    match tree.data(value) {
        NodeData::Literal(data) => Some(
            match data.kind {
                LiteralKind::Int => "int",
                LiteralKind::Long => "long",
                LiteralKind::Float => "float",
                LiteralKind::Double => "double",
                LiteralKind::Char => "char",
                LiteralKind::String | LiteralKind::TextBlock => "String",
                LiteralKind::Bool => "boolean",
                LiteralKind::Null => return None,
            }
            .to_string(),
        ),
        NodeData::Annotation { name } => Some(name.name.clone()),
        _ => match ctx.resolver.expr_type(value) {
            TypeOutcome::Known(ty) => Some(ty.to_string()),
            TypeOutcome::Unknown | TypeOutcome::Deferred => None,
        },
    }
}

fn report_value_mismatch(ctx: &mut CheckContext<'_>, value: NodeId, expected: &str, actual: &str) {
    let range = ctx.tree.range(value);
    ctx.report(
        Diagnostic::new(
            ErrorCategory::Annotation,
            "annotation.value.type",
            range,
            format!("incompatible type: expected '{expected}', found '{actual}'"),
        )
        .with_payload(ErrorPayload::Types {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
    );
}

const VALID_MEMBER_CLASS_TYPES: [&str; 2] = ["String", "Class"];

/// Annotation members may return primitives, String, Class, enums, other
/// annotation types and single-dimension arrays thereof.
pub(crate) fn check_member_type(
    ctx: &mut CheckContext<'_>,
    decl: &AnnotationMemberDecl,
) {
    let ty = &decl.return_type;
    if ty.dims > 1 {
        report_invalid_member_type(ctx, ty);
        return;
    }
    if is_primitive_name(&ty.name) || VALID_MEMBER_CLASS_TYPES.contains(&ty.name.as_str()) {
        return;
    }
    let ResolveOutcome::Unique(SymbolRef::Class(id)) = ctx.resolved_class(&ty.name) else {
        return;
    };
    let kind = ctx.resolver.class(id).kind;
    if !matches!(kind, ClassKind::Enum | ClassKind::Annotation) {
        report_invalid_member_type(ctx, ty);
    }
}

fn is_primitive_name(name: &str) -> bool {
    matches!(
        name,
        "boolean" | "byte" | "short" | "char" | "int" | "long" | "float" | "double"
    )
}

fn report_invalid_member_type(ctx: &mut CheckContext<'_>, ty: &TypeRef) {
    ctx.report(
        Diagnostic::new(
            ErrorCategory::Annotation,
            "annotation.member.type.invalid",
            ty.range,
            format!("invalid type '{}' for annotation member", ty.erased()),
        )
        .with_payload(ErrorPayload::Name { name: ty.erased() }),
    );
}

pub(crate) fn check_member_default(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    let NodeData::AnnotationMember(decl) = tree.data(node) else {
        return;
    };
    if !decl.has_default {
        return;
    }
    let Some(&value) = tree.children(node).first() else {
        return;
    };
    check_value_against(ctx, value, &decl.return_type.erased());
}

/// An annotation member whose type is an annotation that, transitively,
/// contains a member of the declaring annotation's type.
pub(crate) fn check_cyclic_member_type(
    ctx: &mut CheckContext<'_>,
    node: NodeId,
    decl: &AnnotationMemberDecl,
) {
    let Some(class_node) = ctx.enclosing_class(node) else {
        return;
    };
    let Some(declaring) = ctx.class_decl(class_node).map(|class| class.name.clone()) else {
        return;
    };
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut queue = vec![decl.return_type.name.clone()];
    while let Some(name) = queue.pop() {
        if name == declaring {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Annotation,
                    "annotation.member.type.cyclic",
                    decl.return_type.range,
                    format!("cyclic annotation member type '{}'", decl.return_type.name),
                )
                .with_payload(ErrorPayload::Name { name }),
            );
            return;
        }
        if !visited.insert(name.clone()) {
            continue;
        }
        let Ok(resolved) = ctx.resolver.unique_class(&name) else {
            return;
        };
        let Some(id) = resolved else {
            continue;
        };
        let symbol = ctx.resolver.class(id);
        if symbol.kind != ClassKind::Annotation {
            continue;
        }
        let member_types: Vec<String> = symbol
            .methods
            .iter()
            .filter(|member| member.is_annotation_member)
            .filter_map(|member| member.return_type.clone())
            .map(|ty| ty.trim_end_matches("[]").to_string())
            .collect();
        queue.extend(member_types);
    }
}

/// A member may not redeclare a method inherited from the implicit
/// supertypes (`Object`, `Annotation`).
pub(crate) fn check_clashes_with_super(
    ctx: &mut CheckContext<'_>,
    node: NodeId,
    decl: &AnnotationMemberDecl,
) {
    let Some(class_node) = ctx.enclosing_class(node) else {
        return;
    };
    let Some(class_decl) = ctx.class_decl(class_node) else {
        return;
    };
    let mut queue: Vec<String> = class_decl
        .extends
        .iter()
        .chain(&class_decl.implements)
        .map(|super_ref| super_ref.name.clone())
        .collect();
    queue.push("Object".to_string());
    let mut visited: FxHashSet<String> = FxHashSet::default();
    while let Some(super_name) = queue.pop() {
        if !visited.insert(super_name.clone()) {
            continue;
        }
        let Ok(resolved) = ctx.resolver.unique_class(&super_name) else {
            return;
        };
        let Some(id) = resolved else {
            continue;
        };
        let symbol = ctx.resolver.class(id);
        let clashes = symbol.methods.iter().any(|method| {
            !method.is_annotation_member && method.name == decl.name && method.params.is_empty()
        });
        let supers: Vec<String> = symbol
            .supers
            .iter()
            .map(|super_ref| super_ref.name.clone())
            .collect();
        if clashes {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Annotation,
                    "annotation.member.clash",
                    decl.name_range,
                    format!("'{}()' clashes with '{super_name}.{}()'", decl.name, decl.name),
                )
                .with_payload(ErrorPayload::Signatures {
                    found: format!("{}()", decl.name),
                    conflicting: format!("{super_name}.{}()", decl.name),
                }),
            );
            return;
        }
        queue.extend(supers);
    }
}
