use rustc_hash::FxHashSet;

use javelin_syntax::{
    ClassDecl, ClassKind, MethodDecl, NodeData, NodeId, TextRange, TypeRef, Visibility,
};

use crate::context::CheckContext;
use crate::diagnostics::{Diagnostic, ErrorCategory, ErrorPayload};
use crate::resolve::{ClassId, IndexNotReady, ResolveOutcome, SymbolRef};

pub(crate) fn check_duplicate_class(ctx: &mut CheckContext<'_>, node: NodeId, decl: &ClassDecl) {
    if decl.is_anonymous {
        return;
    }
    let tree = ctx.tree;
    let Some(parent) = tree.parent(node) else {
        return;
    };
    let in_scope = matches!(
        tree.data(parent),
        NodeData::File { .. } | NodeData::Class(_)
    );
    if !in_scope {
        return;
    }
    for sibling in tree.siblings_before(node) {
        if let NodeData::Class(other) = tree.data(sibling) {
            if !other.is_anonymous && other.name == decl.name {
                ctx.report(
                    Diagnostic::new(
                        ErrorCategory::Structural,
                        "class.duplicate",
                        decl.name_range,
                        format!("duplicate class '{}'", decl.name),
                    )
                    .with_payload(ErrorPayload::Name {
                        name: decl.name.clone(),
                    }),
                );
                return;
            }
        }
    }
}

pub(crate) fn check_public_class_file_name(
    ctx: &mut CheckContext<'_>,
    node: NodeId,
    decl: &ClassDecl,
) {
    if decl.is_anonymous || decl.modifiers.visibility != Visibility::Public {
        return;
    }
    let tree = ctx.tree;
    let Some(parent) = tree.parent(node) else {
        return;
    };
    let NodeData::File { name: file_name } = tree.data(parent) else {
        return;
    };
    if decl.name != *file_name {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Structural,
                "class.public.file.name",
                decl.name_range,
                format!(
                    "public {} '{}' must be declared in a file named '{}'",
                    decl.kind.display(),
                    decl.name,
                    decl.name
                ),
            )
            .with_payload(ErrorPayload::Name {
                name: file_name.clone(),
            }),
        );
    }
}

/// Abstract methods declared directly on `class_node`, in document order.
fn declared_abstract_methods<'t>(
    ctx: &CheckContext<'t>,
    class_node: NodeId,
) -> Vec<&'t MethodDecl> {
    let tree = ctx.tree;
    tree.children(class_node)
        .iter()
        .filter_map(|&child| match tree.data(child) {
            NodeData::Method(method) if method.modifiers.is_abstract => Some(method),
            _ => None,
        })
        .collect()
}

pub(crate) fn check_class_must_be_abstract(
    ctx: &mut CheckContext<'_>,
    node: NodeId,
    decl: &ClassDecl,
) {
    if decl.kind != ClassKind::Class
        || decl.modifiers.is_abstract
        || decl.is_anonymous
    {
        return;
    }
    let abstract_methods = declared_abstract_methods(ctx, node);
    if let Some(method) = abstract_methods.first() {
        let signature = format!("{}({})", method.name, method.erased_params().join(", "));
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Structural,
                "class.must.be.abstract",
                decl.name_range,
                format!(
                    "class '{}' must be declared abstract or implement abstract method '{signature}'",
                    decl.name
                ),
            )
            .with_payload(ErrorPayload::Name { name: signature }),
        );
    }
}

pub(crate) fn check_enum_constant_abstract_methods(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    let NodeData::EnumConstant { name, has_body } = tree.data(node) else {
        return;
    };
    if *has_body {
        return;
    }
    let Some(class_node) = ctx.enclosing_class(node) else {
        return;
    };
    if ctx
        .class_decl(class_node)
        .is_none_or(|decl| decl.kind != ClassKind::Enum)
    {
        return;
    }
    let abstract_methods = declared_abstract_methods(ctx, class_node);
    if let Some(method) = abstract_methods.first() {
        let method_name = method.name.clone();
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Structural,
                "class.enum.constant.abstract",
                tree.range(node),
                format!(
                    "enum constant '{name}' must implement abstract method '{method_name}'"
                ),
            )
            .with_payload(ErrorPayload::Name { name: method_name }),
        );
    }
}

/// Visited-set ascent over the supertype chain; a name already on the
/// current path terminates the walk and is reported once.
pub(crate) fn check_cyclic_inheritance(ctx: &mut CheckContext<'_>, decl: &ClassDecl) {
    let mut on_path: FxHashSet<String> = FxHashSet::default();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    match ascend(ctx, &decl.name, &mut on_path, &mut visited) {
        Err(IndexNotReady) => {}
        Ok(Some(cycle)) => {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Inheritance,
                    "class.cyclic.inheritance",
                    decl.name_range,
                    format!("cyclic inheritance involving '{cycle}'"),
                )
                .with_payload(ErrorPayload::Name { name: cycle }),
            );
        }
        Ok(None) => {}
    }
}

fn ascend(
    ctx: &mut CheckContext<'_>,
    name: &str,
    on_path: &mut FxHashSet<String>,
    visited: &mut FxHashSet<String>,
) -> Result<Option<String>, IndexNotReady> {
    if !on_path.insert(name.to_string()) {
        return Ok(Some(name.to_string()));
    }
    if visited.insert(name.to_string()) {
        if let Some(id) = ctx.resolver.unique_class(name)? {
            let supers: Vec<String> = ctx
                .resolver
                .class(id)
                .supers
                .iter()
                .map(|super_ref| super_ref.name.clone())
                .collect();
            for super_name in supers {
                if let Some(cycle) = ascend(ctx, &super_name, on_path, visited)? {
                    on_path.remove(name);
                    return Ok(Some(cycle));
                }
            }
        }
    }
    on_path.remove(name);
    Ok(None)
}

pub(crate) fn check_extends_implements(ctx: &mut CheckContext<'_>, decl: &ClassDecl) {
    match decl.kind {
        ClassKind::Class => {
            if decl.extends.len() > 1 {
                ctx.report(Diagnostic::new(
                    ErrorCategory::Inheritance,
                    "class.extends.single",
                    decl.extends[1].range,
                    "class cannot extend multiple classes",
                ));
                return;
            }
            if let Some(super_ref) = decl.extends.first() {
                if check_extends_target(ctx, decl, super_ref) {
                    return;
                }
            }
            for implemented in &decl.implements {
                if check_implements_target(ctx, implemented) {
                    return;
                }
            }
        }
        ClassKind::Interface | ClassKind::Annotation => {
            if let Some(first) = decl.implements.first() {
                ctx.report(Diagnostic::new(
                    ErrorCategory::Structural,
                    "class.interface.implements",
                    first.range,
                    "interface cannot have an implements list",
                ));
                return;
            }
            for extended in &decl.extends {
                if check_implements_target(ctx, extended) {
                    return;
                }
            }
        }
        ClassKind::Enum | ClassKind::Record => {
            if let Some(first) = decl.extends.first() {
                ctx.report(Diagnostic::new(
                    ErrorCategory::Structural,
                    "class.extends.not.allowed",
                    first.range,
                    format!("{} cannot have an extends list", decl.kind.display()),
                ));
                return;
            }
            for implemented in &decl.implements {
                if check_implements_target(ctx, implemented) {
                    return;
                }
            }
        }
    }
}

/// Returns true once something was reported.
fn check_extends_target(
    ctx: &mut CheckContext<'_>,
    decl: &ClassDecl,
    super_ref: &TypeRef,
) -> bool {
    let ResolveOutcome::Unique(SymbolRef::Class(id)) = ctx.resolved_class(&super_ref.name) else {
        return false;
    };
    let symbol = ctx.resolver.class(id);
    let (kind, is_final) = (symbol.kind, symbol.modifiers.is_final);
    if kind != ClassKind::Class {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Inheritance,
                "class.extends.not.class",
                super_ref.range,
                format!("'{}' is not a class; cannot be extended here", super_ref.name),
            )
            .with_payload(ErrorPayload::Name {
                name: super_ref.name.clone(),
            }),
        );
        return true;
    }
    if is_final {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Inheritance,
                "class.extends.final",
                super_ref.range,
                format!(
                    "'{}' cannot inherit from final class '{}'",
                    decl.name, super_ref.name
                ),
            )
            .with_payload(ErrorPayload::Name {
                name: super_ref.name.clone(),
            }),
        );
        return true;
    }
    false
}

fn check_implements_target(ctx: &mut CheckContext<'_>, target: &TypeRef) -> bool {
    let ResolveOutcome::Unique(SymbolRef::Class(id)) = ctx.resolved_class(&target.name) else {
        return false;
    };
    if !ctx.resolver.class(id).kind.is_interface_like() {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Inheritance,
                "class.implements.not.interface",
                target.range,
                format!("'{}' is not an interface", target.name),
            )
            .with_payload(ErrorPayload::Name {
                name: target.name.clone(),
            }),
        );
        return true;
    }
    false
}

/// Both directions of the sealed contract seen from a subtype: it must be
/// admitted by every sealed supertype and must close the hierarchy itself.
pub(crate) fn check_sealed_super(ctx: &mut CheckContext<'_>, decl: &ClassDecl) {
    for super_ref in decl.extends.iter().chain(&decl.implements) {
        let ResolveOutcome::Unique(SymbolRef::Class(id)) = ctx.resolved_class(&super_ref.name)
        else {
            continue;
        };
        let symbol = ctx.resolver.class(id);
        if !symbol.modifiers.is_sealed {
            continue;
        }
        let permitted = symbol.permits.is_empty() || symbol.permits.contains(&decl.name);
        if !permitted {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Inheritance,
                    "class.sealed.not.permitted",
                    super_ref.range,
                    format!(
                        "'{}' is not allowed in the sealed hierarchy of '{}'",
                        decl.name, super_ref.name
                    ),
                )
                .with_payload(ErrorPayload::Name {
                    name: super_ref.name.clone(),
                }),
            );
            return;
        }
        if !decl.modifiers.closes_sealed_hierarchy() && !decl.is_anonymous {
            ctx.report(Diagnostic::new(
                ErrorCategory::Inheritance,
                "class.sealed.subtype.modifier",
                decl.name_range,
                format!(
                    "'{}' extends a sealed type and must be final, sealed or non-sealed",
                    decl.name
                ),
            ));
            return;
        }
    }
}

/// Permits-list consistency seen from the sealed class itself: every
/// permitted entry resolves and names a direct inheritor; every direct
/// inheritor is admitted, directly or through a sealed/non-sealed
/// intermediate.
pub(crate) fn check_sealed_inheritors(ctx: &mut CheckContext<'_>, node: NodeId, decl: &ClassDecl) {
    if !decl.modifiers.is_sealed {
        return;
    }
    for permit_ref in &decl.permits {
        match ctx.resolved_class(&permit_ref.name) {
            ResolveOutcome::Deferred => return,
            ResolveOutcome::Unresolved => {
                ctx.report(
                    Diagnostic::new(
                        ErrorCategory::Resolution,
                        "class.sealed.permits.unresolved",
                        permit_ref.range,
                        format!("cannot resolve permitted class '{}'", permit_ref.name),
                    )
                    .with_payload(ErrorPayload::Name {
                        name: permit_ref.name.clone(),
                    }),
                );
                return;
            }
            ResolveOutcome::Unique(SymbolRef::Class(id)) => {
                let direct = ctx
                    .resolver
                    .class(id)
                    .supers
                    .iter()
                    .any(|super_ref| super_ref.name == decl.name);
                if !direct {
                    ctx.report(
                        Diagnostic::new(
                            ErrorCategory::Inheritance,
                            "class.sealed.permits.indirect",
                            permit_ref.range,
                            format!(
                                "permitted class '{}' must directly extend or implement '{}'",
                                permit_ref.name, decl.name
                            ),
                        )
                        .with_payload(ErrorPayload::Name {
                            name: permit_ref.name.clone(),
                        }),
                    );
                    return;
                }
            }
            _ => {}
        }
    }
    if decl.permits.is_empty() {
        return;
    }
    let Some(class_id) = ctx.class_symbol_for(node) else {
        return;
    };
    let Ok(inheritors) = ctx.resolver.direct_inheritors(class_id) else {
        return;
    };
    for inheritor in inheritors {
        let name = ctx.resolver.class(inheritor).name.clone();
        match admitted(ctx, decl, &name) {
            Err(IndexNotReady) => return,
            Ok(true) => {}
            Ok(false) => {
                ctx.report(
                    Diagnostic::new(
                        ErrorCategory::Inheritance,
                        "class.sealed.inheritor.not.permitted",
                        decl.name_range,
                        format!(
                            "'{name}' is not allowed in the sealed hierarchy of '{}'",
                            decl.name
                        ),
                    )
                    .with_payload(ErrorPayload::Name { name }),
                );
                return;
            }
        }
    }
}

/// A subtype is admitted when it is named in the permits list, or when one
/// of its admitted supertypes is itself sealed or non-sealed (the
/// intermediate keeps the hierarchy closed or explicitly opts out).
fn admitted(
    ctx: &mut CheckContext<'_>,
    sealed: &ClassDecl,
    inheritor: &str,
) -> Result<bool, IndexNotReady> {
    if sealed.permits.iter().any(|permit| permit.name == inheritor) {
        return Ok(true);
    }
    let Some(id) = ctx.resolver.unique_class(inheritor)? else {
        return Ok(true);
    };
    let supers: Vec<String> = ctx
        .resolver
        .class(id)
        .supers
        .iter()
        .map(|super_ref| super_ref.name.clone())
        .collect();
    for super_name in supers {
        if super_name == sealed.name {
            continue;
        }
        let Some(super_id) = ctx.resolver.unique_class(&super_name)? else {
            continue;
        };
        let modifiers = ctx.resolver.class(super_id).modifiers;
        if (modifiers.is_sealed || modifiers.is_non_sealed)
            && admitted(ctx, sealed, &super_name)?
        {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn check_illegal_instantiation(
    ctx: &mut CheckContext<'_>,
    class: ClassId,
    anchor: TextRange,
) {
    let symbol = ctx.resolver.class(class);
    let name = symbol.name.clone();
    if symbol.kind.is_interface_like() || symbol.modifiers.is_abstract {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Structural,
                "class.instantiation.abstract",
                anchor,
                format!("'{name}' is abstract; cannot be instantiated"),
            )
            .with_payload(ErrorPayload::Name { name }),
        );
    }
}

pub(crate) fn check_anonymous_inherit(ctx: &mut CheckContext<'_>, base: &TypeRef) {
    let ResolveOutcome::Unique(SymbolRef::Class(id)) = ctx.resolved_class(&base.name) else {
        return;
    };
    let modifiers = ctx.resolver.class(id).modifiers;
    if modifiers.is_final {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Inheritance,
                "class.anonymous.extends.final",
                base.range,
                format!("anonymous class cannot inherit from final class '{}'", base.name),
            )
            .with_payload(ErrorPayload::Name {
                name: base.name.clone(),
            }),
        );
    } else if modifiers.is_sealed {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Inheritance,
                "class.anonymous.extends.sealed",
                base.range,
                format!("anonymous class cannot extend sealed class '{}'", base.name),
            )
            .with_payload(ErrorPayload::Name {
                name: base.name.clone(),
            }),
        );
    }
}

/// Constructors and initializers have no place in interface bodies.
pub(crate) fn check_member_allowed_in_interface(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    let Some(class_node) = ctx.enclosing_class(node) else {
        return;
    };
    let interface_like = ctx
        .class_decl(class_node)
        .is_some_and(|decl| decl.kind.is_interface_like());
    if !interface_like {
        return;
    }
    match tree.data(node) {
        NodeData::Method(method) if method.is_constructor => {
            ctx.report(Diagnostic::new(
                ErrorCategory::Structural,
                "class.interface.constructor",
                method.name_range,
                "constructors are not allowed in interfaces",
            ));
        }
        NodeData::Initializer { .. } => {
            ctx.report(Diagnostic::new(
                ErrorCategory::Structural,
                "class.interface.initializer",
                tree.range(node),
                "initializers are not allowed in interfaces",
            ));
        }
        _ => {}
    }
}
