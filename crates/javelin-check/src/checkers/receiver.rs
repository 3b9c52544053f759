use javelin_syntax::{NodeData, NodeId};

use crate::context::CheckContext;
use crate::diagnostics::{Diagnostic, ErrorCategory, ErrorPayload};

/// Receiver parameters name the type of `this`. They are only meaningful
/// on instance methods (typed as the enclosing class) and on inner-class
/// constructors (typed as the outer class, qualified with its name).
pub(crate) fn check_receiver(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    let NodeData::ReceiverParameter { ty, qualifier } = tree.data(node) else {
        return;
    };
    let range = tree.range(node);
    let Some(method_node) = ctx.enclosing_method(node) else {
        return;
    };
    let NodeData::Method(method) = tree.data(method_node) else {
        return;
    };
    if method.modifiers.is_static {
        ctx.report(Diagnostic::new(
            ErrorCategory::Structural,
            "receiver.static.context",
            range,
            "receiver parameter is not applicable in a static context",
        ));
        return;
    }
    let Some(class_node) = ctx.enclosing_class(method_node) else {
        return;
    };
    let Some(class_decl) = ctx.class_decl(class_node) else {
        return;
    };
    if method.is_constructor {
        if !class_decl.is_inner {
            ctx.report(Diagnostic::new(
                ErrorCategory::Structural,
                "receiver.constructor.not.inner",
                range,
                "receiver parameter is only allowed on inner class constructors",
            ));
            return;
        }
        let Some(outer_name) = ctx
            .enclosing_class(class_node)
            .and_then(|outer| ctx.class_decl(outer))
            .map(|outer| outer.name.clone())
        else {
            return;
        };
        if ty.name != outer_name {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Structural,
                    "receiver.type.mismatch",
                    ty.range,
                    format!("receiver type must be '{outer_name}'"),
                )
                .with_payload(ErrorPayload::Types {
                    expected: outer_name,
                    actual: ty.erased(),
                }),
            );
            return;
        }
        if qualifier.as_deref() != Some(outer_name.as_str()) {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Structural,
                    "receiver.qualifier",
                    range,
                    format!("receiver of an inner class constructor must be '{outer_name}.this'"),
                )
                .with_payload(ErrorPayload::Name { name: outer_name }),
            );
        }
        return;
    }
    if ty.name != class_decl.name {
        ctx.report(
            Diagnostic::new(
                ErrorCategory::Structural,
                "receiver.type.mismatch",
                ty.range,
                format!("receiver type must be '{}'", class_decl.name),
            )
            .with_payload(ErrorPayload::Types {
                expected: class_decl.name.clone(),
                actual: ty.erased(),
            }),
        );
        return;
    }
    if let Some(qualifier) = qualifier {
        if qualifier != &class_decl.name {
            ctx.report(
                Diagnostic::new(
                    ErrorCategory::Structural,
                    "receiver.qualifier",
                    range,
                    format!("receiver of an instance method must be '{}.this' or 'this'", class_decl.name),
                )
                .with_payload(ErrorPayload::Name {
                    name: qualifier.clone(),
                }),
            );
        }
    }
}
