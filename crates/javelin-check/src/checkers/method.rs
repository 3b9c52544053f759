use rustc_hash::{FxHashMap, FxHashSet};

use javelin_syntax::{ClassKind, MethodDecl, NodeData, NodeId, Visibility};

use crate::context::CheckContext;
use crate::diagnostics::{Diagnostic, ErrorCategory, ErrorPayload};
use crate::resolve::{IndexNotReady, MethodSym, ResolveOutcome, SymbolRef};

/// Methods inherited from the supertype closure that share `name` and the
/// erased parameter list, paired with the owning class name.
fn inherited_matching(
    ctx: &mut CheckContext<'_>,
    class_node: NodeId,
    name: &str,
    params: &[String],
) -> Result<Vec<(String, MethodSym)>, IndexNotReady> {
    let Some(decl) = ctx.class_decl(class_node) else {
        return Ok(Vec::new());
    };
    let mut queue: Vec<String> = decl
        .extends
        .iter()
        .chain(&decl.implements)
        .map(|super_ref| super_ref.name.clone())
        .collect();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut found = Vec::new();
    while let Some(super_name) = queue.pop() {
        if !visited.insert(super_name.clone()) {
            continue;
        }
        let Some(id) = ctx.resolver.unique_class(&super_name)? else {
            continue;
        };
        let symbol = ctx.resolver.class(id);
        for method in &symbol.methods {
            if !method.is_constructor && method.name == name && method.params == params {
                found.push((super_name.clone(), method.clone()));
            }
        }
        queue.extend(symbol.supers.iter().map(|super_ref| super_ref.name.clone()));
    }
    Ok(found)
}

fn overridable(decl: &MethodDecl) -> bool {
    !decl.is_constructor && decl.modifiers.visibility != Visibility::Private
}

pub(crate) fn check_can_have_body(ctx: &mut CheckContext<'_>, node: NodeId, decl: &MethodDecl) {
    if !decl.has_body {
        return;
    }
    if decl.modifiers.is_abstract {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Structural,
                "method.abstract.body",
                decl.name_range,
                format!("abstract method '{}' cannot have a body", decl.name),
            )
            .with_payload(ErrorPayload::Name {
                name: decl.name.clone(),
            }),
        );
        return;
    }
    let in_interface = ctx
        .enclosing_class(node)
        .and_then(|class_node| ctx.class_decl(class_node))
        .is_some_and(|class| class.kind.is_interface_like());
    if in_interface
        && !decl.is_constructor
        && !decl.modifiers.is_default
        && !decl.modifiers.is_static
        && decl.modifiers.visibility != Visibility::Private
    {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Structural,
                "method.interface.body",
                decl.name_range,
                format!(
                    "interface method '{}' cannot have a body unless it is default, static or private",
                    decl.name
                ),
            )
            .with_payload(ErrorPayload::Name {
                name: decl.name.clone(),
            }),
        );
    }
}

pub(crate) fn check_must_have_body(ctx: &mut CheckContext<'_>, node: NodeId, decl: &MethodDecl) {
    if decl.has_body || decl.modifiers.is_abstract {
        return;
    }
    let in_interface = ctx
        .enclosing_class(node)
        .and_then(|class_node| ctx.class_decl(class_node))
        .is_some_and(|class| class.kind.is_interface_like());
    // Bodyless interface methods are implicitly abstract; default and
    // static ones are not and must come with a body.
    if in_interface && !decl.modifiers.is_default && !decl.modifiers.is_static {
        return;
    }
    ctx.report(
        Diagnostic::new(
            ErrorCategory::Structural,
            "method.missing.body",
            decl.name_range,
            format!("method '{}' must have a body or be declared abstract", decl.name),
        )
        .with_payload(ErrorPayload::Name {
            name: decl.name.clone(),
        }),
    );
}

pub(crate) fn check_varargs_well_formed(ctx: &mut CheckContext<'_>, decl: &MethodDecl) {
    let last = decl.params.len().saturating_sub(1);
    for (position, param) in decl.params.iter().enumerate() {
        if param.is_varargs && position != last {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Structural,
                    "method.varargs.not.last",
                    param.range,
                    format!("vararg parameter '{}' must be the last parameter", param.name),
                )
                .with_payload(ErrorPayload::Name {
                    name: param.name.clone(),
                }),
            );
            return;
        }
    }
}

pub(crate) fn check_static_override(ctx: &mut CheckContext<'_>, node: NodeId, decl: &MethodDecl) {
    if !overridable(decl) {
        return;
    }
    let Some(class_node) = ctx.enclosing_class(node) else {
        return;
    };
    let Ok(inherited) = inherited_matching(ctx, class_node, &decl.name, &decl.erased_params())
    else {
        return;
    };
    for (owner, super_method) in inherited {
        if decl.modifiers.is_static == super_method.modifiers.is_static {
            continue;
        }
        let message = if decl.modifiers.is_static {
            format!(
                "static method '{}' cannot hide instance method in '{owner}'",
                decl.name
            )
        } else {
            format!(
                "instance method '{}' cannot override static method in '{owner}'",
                decl.name
            )
        };
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Signature,
                "method.override.static.mismatch",
                decl.name_range,
                message,
            )
            .with_payload(ErrorPayload::Signatures {
                found: format!("{}({})", decl.name, decl.erased_params().join(", ")),
                conflicting: format!("{owner}.{}", super_method.erased_signature()),
            }),
        );
        return;
    }
}

pub(crate) fn check_overrides_final(ctx: &mut CheckContext<'_>, node: NodeId, decl: &MethodDecl) {
    if !overridable(decl) || decl.modifiers.is_static {
        return;
    }
    let Some(class_node) = ctx.enclosing_class(node) else {
        return;
    };
    let Ok(inherited) = inherited_matching(ctx, class_node, &decl.name, &decl.erased_params())
    else {
        return;
    };
    for (owner, super_method) in inherited {
        if super_method.modifiers.is_final {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Signature,
                    "method.override.final",
                    decl.name_range,
                    format!("'{}' cannot override final method in '{owner}'", decl.name),
                )
                .with_payload(ErrorPayload::Signatures {
                    found: format!("{}({})", decl.name, decl.erased_params().join(", ")),
                    conflicting: format!("{owner}.{}", super_method.erased_signature()),
                }),
            );
            return;
        }
    }
}

pub(crate) fn check_weaker_privileges(ctx: &mut CheckContext<'_>, node: NodeId, decl: &MethodDecl) {
    if !overridable(decl) || decl.modifiers.is_static {
        return;
    }
    let Some(class_node) = ctx.enclosing_class(node) else {
        return;
    };
    let Ok(inherited) = inherited_matching(ctx, class_node, &decl.name, &decl.erased_params())
    else {
        return;
    };
    for (owner, super_method) in inherited {
        if super_method.modifiers.is_static {
            continue;
        }
        if decl.modifiers.visibility < super_method.modifiers.visibility {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Signature,
                    "method.override.weaker.access",
                    decl.name_range,
                    format!(
                        "'{}' assigns weaker access privileges ('{}'); was '{}' in '{owner}'",
                        decl.name,
                        decl.modifiers.visibility.display(),
                        super_method.modifiers.visibility.display()
                    ),
                )
                .with_payload(ErrorPayload::Signatures {
                    found: decl.modifiers.visibility.display().to_string(),
                    conflicting: super_method.modifiers.visibility.display().to_string(),
                }),
            );
            return;
        }
    }
}

/// Overriding return type must equal the overridden one or be a subtype
/// of it (covariance over class types only).
pub(crate) fn check_incompatible_return(
    ctx: &mut CheckContext<'_>,
    node: NodeId,
    decl: &MethodDecl,
) {
    if !overridable(decl) || decl.modifiers.is_static {
        return;
    }
    let Some(own_return) = decl.return_type.as_ref().map(|ty| ty.erased()) else {
        return;
    };
    let Some(class_node) = ctx.enclosing_class(node) else {
        return;
    };
    let Ok(inherited) = inherited_matching(ctx, class_node, &decl.name, &decl.erased_params())
    else {
        return;
    };
    for (owner, super_method) in inherited {
        let Some(super_return) = super_method.return_type else {
            continue;
        };
        if super_method.modifiers.is_static || own_return == super_return {
            continue;
        }
        match ctx.resolver.is_subtype(&own_return, &super_return) {
            Err(IndexNotReady) => return,
            Ok(true) => continue,
            Ok(false) => {
                ctx.report(
                    Diagnostic::new(
                        ErrorCategory::Signature,
                        "method.override.return",
                        decl.name_range,
                        format!(
                            "'{own_return}' is not compatible with return type '{super_return}' in method overridden from '{owner}'"
                        ),
                    )
                    .with_payload(ErrorPayload::Types {
                        expected: super_return,
                        actual: own_return,
                    }),
                );
                return;
            }
        }
    }
}

/// Every checked exception declared here must fit under one declared by
/// each overridden method.
pub(crate) fn check_incompatible_throws(
    ctx: &mut CheckContext<'_>,
    node: NodeId,
    decl: &MethodDecl,
) {
    if !overridable(decl) || decl.modifiers.is_static || decl.throws.is_empty() {
        return;
    }
    let Some(class_node) = ctx.enclosing_class(node) else {
        return;
    };
    let Ok(inherited) = inherited_matching(ctx, class_node, &decl.name, &decl.erased_params())
    else {
        return;
    };
    for (owner, super_method) in inherited {
        if super_method.modifiers.is_static {
            continue;
        }
        for thrown in &decl.throws {
            match ctx.resolver.is_unchecked_exception(&thrown.name) {
                Err(IndexNotReady) => return,
                Ok(true) => continue,
                Ok(false) => {}
            }
            let mut covered = false;
            for declared in &super_method.throws {
                match ctx.resolver.is_subtype(&thrown.name, declared) {
                    Err(IndexNotReady) => return,
                    Ok(true) => {
                        covered = true;
                        break;
                    }
                    Ok(false) => {}
                }
            }
            if !covered {
                ctx.report(
                    Diagnostic::new(
                        ErrorCategory::Signature,
                        "method.override.throws",
                        thrown.range,
                        format!(
                            "overridden method in '{owner}' does not throw '{}'",
                            thrown.name
                        ),
                    )
                    .with_payload(ErrorPayload::Thrown {
                        types: super_method.throws.clone(),
                    }),
                );
                return;
            }
        }
    }
}

pub(crate) fn check_duplicate(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    let (name, name_range, params) = match tree.data(node) {
        NodeData::Method(decl) => (decl.name.clone(), decl.name_range, decl.erased_params()),
        NodeData::AnnotationMember(decl) => (decl.name.clone(), decl.name_range, Vec::new()),
        _ => return,
    };
    for sibling in tree.siblings_before(node) {
        let matches_sibling = match tree.data(sibling) {
            NodeData::Method(other) => other.name == name && other.erased_params() == params,
            NodeData::AnnotationMember(other) => other.name == name && params.is_empty(),
            _ => false,
        };
        if matches_sibling {
            let owner = tree
                .parent(node)
                .and_then(|class_node| ctx.class_decl(class_node))
                .map(|class| class.name.clone())
                .unwrap_or_default();
            let signature = format!("{name}({})", params.join(", "));
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Signature,
                    "method.duplicate",
                    name_range,
                    format!("'{signature}' is already defined in '{owner}'"),
                )
                .with_payload(ErrorPayload::Signatures {
                    found: signature.clone(),
                    conflicting: signature,
                }),
            );
            return;
        }
    }
}

pub(crate) fn check_throws_are_throwable(ctx: &mut CheckContext<'_>, decl: &MethodDecl) {
    for thrown in &decl.throws {
        let ResolveOutcome::Unique(SymbolRef::Class(_)) = ctx.resolved_class(&thrown.name) else {
            continue;
        };
        match ctx.resolver.is_subtype(&thrown.name, "Throwable") {
            Err(IndexNotReady) => return,
            Ok(true) => {}
            Ok(false) => {
                ctx.report(
                    Diagnostic::new(
                        ErrorCategory::Structural,
                        "method.throws.not.throwable",
                        thrown.range,
                        format!("incompatible types: '{}' is not a throwable type", thrown.name),
                    )
                    .with_payload(ErrorPayload::Types {
                        expected: "Throwable".to_string(),
                        actual: thrown.name.clone(),
                    }),
                );
                return;
            }
        }
    }
}

/// Two methods inherited from different supertypes with the same erased
/// signature but unrelated return types cannot coexist unless the class
/// overrides them. Reported once, on the class name.
pub(crate) fn check_override_equivalent_inherited(
    ctx: &mut CheckContext<'_>,
    class_node: NodeId,
) {
    let tree = ctx.tree;
    let Some(decl) = ctx.class_decl(class_node) else {
        return;
    };
    let locals: FxHashSet<(String, Vec<String>)> = tree
        .children(class_node)
        .iter()
        .filter_map(|&child| match tree.data(child) {
            NodeData::Method(method) if !method.is_constructor => {
                Some((method.name.clone(), method.erased_params()))
            }
            _ => None,
        })
        .collect();
    let supers: Vec<String> = decl
        .extends
        .iter()
        .chain(&decl.implements)
        .map(|super_ref| super_ref.name.clone())
        .collect();
    let name_range = decl.name_range;

    let mut seen: FxHashMap<(String, Vec<String>), (String, Option<String>)> =
        FxHashMap::default();
    for super_name in supers {
        let Ok(resolved) = ctx.resolver.unique_class(&super_name) else {
            return;
        };
        let Some(id) = resolved else {
            continue;
        };
        let methods: Vec<MethodSym> = ctx
            .resolver
            .class(id)
            .methods
            .iter()
            .filter(|method| {
                !method.is_constructor
                    && !method.modifiers.is_static
                    && method.modifiers.visibility != Visibility::Private
            })
            .cloned()
            .collect();
        for method in methods {
            let key = (method.name.clone(), method.params.clone());
            if locals.contains(&key) {
                continue;
            }
            match seen.get(&key).cloned() {
                None => {
                    seen.insert(key, (super_name.clone(), method.return_type.clone()));
                }
                Some((other_owner, other_return)) if other_owner != super_name => {
                    let compatible = match (&method.return_type, &other_return) {
                        (Some(a), Some(b)) => {
                            if a == b {
                                true
                            } else {
                                match (
                                    ctx.resolver.is_subtype(a, b),
                                    ctx.resolver.is_subtype(b, a),
                                ) {
                                    (Err(_), _) | (_, Err(_)) => return,
                                    (Ok(down), Ok(up)) => down || up,
                                }
                            }
                        }
                        (a, b) => a == b,
                    };
                    if !compatible {
                        ctx.report(
                            Diagnostic::new(
                                ErrorCategory::Signature,
                                "method.inherited.incompatible",
                                name_range,
                                format!(
                                    "methods '{}' from '{other_owner}' and '{super_name}' are inherited with incompatible return types",
                                    method.erased_signature()
                                ),
                            )
                            .with_payload(ErrorPayload::Signatures {
                                found: format!("{other_owner}.{}", method.erased_signature()),
                                conflicting: format!("{super_name}.{}", method.erased_signature()),
                            }),
                        );
                        return;
                    }
                }
                Some(_) => {}
            }
        }
    }
}
