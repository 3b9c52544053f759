use rustc_hash::{FxHashMap, FxHashSet};

use javelin_syntax::{ClassDecl, NodeData, NodeId, TypeRef};

use crate::context::CheckContext;
use crate::diagnostics::{Diagnostic, ErrorCategory, ErrorPayload};
use crate::feature::Feature;
use crate::resolve::{ResolveOutcome, SymbolRef, TypeOutcome};

pub(crate) fn check_type_parameter_list(ctx: &mut CheckContext<'_>, list_node: NodeId) {
    let tree = ctx.tree;
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for &child in tree.children(list_node) {
        let NodeData::TypeParameter { name, bounds } = tree.data(child) else {
            continue;
        };
        if !seen.insert(name.as_str()) {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Structural,
                    "generics.type.parameter.duplicate",
                    tree.range(child),
                    format!("duplicate type parameter '{name}'"),
                )
                .with_payload(ErrorPayload::Name { name: name.clone() }),
            );
            return;
        }
        for bound in bounds {
            if bound.name == *name {
                ctx.report(
                    Diagnostic::new(
                        ErrorCategory::Inheritance,
                        "generics.bound.cyclic",
                        bound.range,
                        format!("cyclic inheritance involving type parameter '{name}'"),
                    )
                    .with_payload(ErrorPayload::Name { name: name.clone() }),
                );
                return;
            }
            let ResolveOutcome::Unique(SymbolRef::Class(id)) = ctx.resolved_class(&bound.name)
            else {
                continue;
            };
            if ctx.resolver.class(id).modifiers.is_final {
                ctx.report(
                    Diagnostic::new(
                        ErrorCategory::Inheritance,
                        "generics.bound.final",
                        bound.range,
                        format!(
                            "type parameter '{name}' cannot be bounded by final class '{}'",
                            bound.name
                        ),
                    )
                    .with_payload(ErrorPayload::Name {
                        name: bound.name.clone(),
                    }),
                );
                return;
            }
        }
    }
}

/// Raw reference to a parameterized type. Import-like contexts predate
/// generics and stay exempt.
pub(crate) fn check_raw_type(ctx: &mut CheckContext<'_>, node: NodeId, ty: &TypeRef) {
    if !ty.is_raw() || !ctx.is_sufficient(Feature::Generics) {
        return;
    }
    let tree = ctx.tree;
    let legacy_context = tree
        .parent(node)
        .is_some_and(|parent| matches!(tree.data(parent), NodeData::StaticImport { .. }));
    if legacy_context {
        return;
    }
    let ResolveOutcome::Unique(SymbolRef::Class(id)) = ctx.resolved_class(&ty.name) else {
        return;
    };
    if ctx.resolver.class(id).type_params > 0 {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Structural,
                "generics.raw.use",
                ty.range,
                format!("raw use of parameterized type '{}'", ty.name),
            )
            .with_payload(ErrorPayload::Name {
                name: ty.name.clone(),
            }),
        );
    }
}

/// Diamond whose arguments the inference subsystem cannot reconstruct.
pub(crate) fn check_diamond_inference(ctx: &mut CheckContext<'_>, node: NodeId, ty: &TypeRef) {
    if !ty.is_diamond() {
        return;
    }
    match ctx.resolver.expr_type(node) {
        TypeOutcome::Known(_) | TypeOutcome::Deferred => {}
        TypeOutcome::Unknown => {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Structural,
                    "generics.diamond.not.inferable",
                    ty.range,
                    format!("cannot infer type arguments for '{}'", ty.name),
                )
                .with_payload(ErrorPayload::Name {
                    name: ty.name.clone(),
                }),
            );
        }
    }
}

fn rendered_args(type_ref: &TypeRef) -> Option<String> {
    let args = type_ref.args.as_ref()?;
    if args.is_empty() {
        return None;
    }
    let inner: Vec<String> = args.iter().map(|arg| arg.erased()).collect();
    Some(inner.join(", "))
}

/// One interface reachable twice through the supertype graph with
/// different written type arguments.
pub(crate) fn check_interface_multiple_inheritance(
    ctx: &mut CheckContext<'_>,
    decl: &ClassDecl,
) {
    let mut queue: Vec<TypeRef> = decl.extends.iter().chain(&decl.implements).cloned().collect();
    let mut seen_args: FxHashMap<String, String> = FxHashMap::default();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    while let Some(super_ref) = queue.pop() {
        if let Some(args) = rendered_args(&super_ref) {
            match seen_args.get(&super_ref.name) {
                Some(previous) if *previous != args => {
                    let previous = previous.clone();
                    ctx.report(
                        Diagnostic::new(
                            ErrorCategory::Inheritance,
                            "generics.interface.inherited.twice",
                            decl.name_range,
                            format!(
                                "'{}' cannot be inherited with different type arguments: '{previous}' and '{args}'",
                                super_ref.name
                            ),
                        )
                        .with_payload(ErrorPayload::Signatures {
                            found: args,
                            conflicting: previous,
                        }),
                    );
                    return;
                }
                Some(_) => {}
                None => {
                    seen_args.insert(super_ref.name.clone(), args);
                }
            }
        }
        if !visited.insert(super_ref.name.clone()) {
            continue;
        }
        match ctx.resolver.unique_class(&super_ref.name) {
            Err(_) => return,
            Ok(None) => {}
            Ok(Some(id)) => {
                queue.extend(ctx.resolver.class(id).supers.iter().cloned());
            }
        }
    }
}

/// Static imports demand a resolvable target class with a fully
/// accessible supertype closure; skipped inside named modules, where
/// readability rules take over.
pub(crate) fn check_static_import_supers(
    ctx: &mut CheckContext<'_>,
    class_ref: &TypeRef,
) {
    if ctx.module.is_some() {
        return;
    }
    let id = match ctx.resolved_class(&class_ref.name) {
        ResolveOutcome::Deferred => return,
        ResolveOutcome::Unresolved => {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Resolution,
                    "import.static.unresolved",
                    class_ref.range,
                    format!("cannot resolve class '{}'", class_ref.name),
                )
                .with_payload(ErrorPayload::Name {
                    name: class_ref.name.clone(),
                }),
            );
            return;
        }
        ResolveOutcome::Unique(SymbolRef::Class(id)) => id,
        _ => return,
    };
    let mut queue: Vec<String> = ctx
        .resolver
        .class(id)
        .supers
        .iter()
        .map(|super_ref| super_ref.name.clone())
        .collect();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    while let Some(super_name) = queue.pop() {
        if !visited.insert(super_name.clone()) {
            continue;
        }
        if super_name == "Object" {
            continue;
        }
        match ctx.resolver.resolve_class(&super_name) {
            ResolveOutcome::Deferred => return,
            ResolveOutcome::Unresolved => {
                ctx.report(
                    Diagnostic::new(
                        ErrorCategory::Resolution,
                        "import.static.super.inaccessible",
                        class_ref.range,
                        format!(
                            "supertype '{super_name}' of '{}' is not accessible",
                            class_ref.name
                        ),
                    )
                    .with_payload(ErrorPayload::Name { name: super_name }),
                );
                return;
            }
            ResolveOutcome::Unique(SymbolRef::Class(super_id)) => {
                queue.extend(
                    ctx.resolver
                        .class(super_id)
                        .supers
                        .iter()
                        .map(|super_ref| super_ref.name.clone()),
                );
            }
            _ => {}
        }
    }
}
