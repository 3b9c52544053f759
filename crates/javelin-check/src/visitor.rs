//! Single-pass driver. One pre-order walk over the tree; on each node
//! the per-node flag is reset, then the checkers for that kind run in a
//! fixed order, every later one guarded by the flag. Feature gates come
//! first, structural shape checks next, resolution-dependent checks last,
//! so a gated construct is reported as unsupported rather than malformed
//! and resolution never masks a cheaper structural finding.

use javelin_syntax::{ClassDecl, MethodDecl, NodeData, NodeId};

use crate::checkers::{annotation, class, expr, generics, literal, method, receiver, record, stmt};
use crate::context::CheckContext;
use crate::feature::Feature;

pub(crate) fn run(ctx: &mut CheckContext<'_>) {
    let tree = ctx.tree;
    for node in tree.preorder(tree.root()) {
        ctx.enter_node();
        // Synthesized nodes are never checked; their children still are.
        if tree.node(node).synthetic {
            continue;
        }
        visit(ctx, node);
    }
}

fn visit(ctx: &mut CheckContext<'_>, node: NodeId) {
    let tree = ctx.tree;
    match tree.data(node) {
        NodeData::Class(decl) => visit_class(ctx, node, decl),
        NodeData::Method(decl) => visit_method(ctx, node, decl),
        NodeData::EnumConstant { .. } => {
            class::check_enum_constant_abstract_methods(ctx, node);
        }
        NodeData::Field { .. } => {
            record::check_instance_member(ctx, node);
        }
        NodeData::Initializer { .. } => {
            class::check_member_allowed_in_interface(ctx, node);
            if !ctx.has_error() {
                record::check_instance_member(ctx, node);
            }
        }
        NodeData::AnnotationMember(decl) => {
            let decl = decl.clone();
            annotation::check_member_type(ctx, &decl);
            if !ctx.has_error() {
                method::check_duplicate(ctx, node);
            }
            if !ctx.has_error() {
                annotation::check_cyclic_member_type(ctx, node, &decl);
            }
            if !ctx.has_error() {
                annotation::check_clashes_with_super(ctx, node, &decl);
            }
            if !ctx.has_error() {
                annotation::check_member_default(ctx, node);
            }
        }
        NodeData::ReceiverParameter { .. } => {
            ctx.check_feature(node, Feature::ReceiverParameters);
            if !ctx.has_error() {
                receiver::check_receiver(ctx, node);
            }
        }
        NodeData::TypeParameterList => {
            ctx.check_feature(node, Feature::Generics);
            if !ctx.has_error() {
                generics::check_type_parameter_list(ctx, node);
            }
        }
        NodeData::RecordComponent { .. } => {
            record::check_component_duplicate(ctx, node);
            if !ctx.has_error() {
                record::check_accessor_return_type(ctx, node);
            }
        }
        NodeData::TypeNode { ty } => {
            if ty.args.as_ref().is_some_and(|args| !args.is_empty()) {
                ctx.check_feature(node, Feature::Generics);
            }
            if !ctx.has_error() {
                generics::check_raw_type(ctx, node, ty);
            }
        }
        NodeData::Annotation { name } => {
            ctx.check_feature(node, Feature::Annotations);
            if !ctx.has_error() {
                annotation::check_annotation(ctx, node, name);
            }
        }
        NodeData::NameValuePair { .. } => {
            annotation::check_name_value_pair(ctx, node);
        }
        NodeData::StaticImport { class: target, .. } => {
            ctx.check_feature(node, Feature::StaticImports);
            if !ctx.has_error() {
                generics::check_static_import_supers(ctx, target);
            }
        }
        NodeData::Try => {
            let has_resources = tree
                .children(node)
                .iter()
                .any(|&child| matches!(tree.data(child), NodeData::Resource));
            if has_resources {
                ctx.check_feature(node, Feature::TryWithResources);
            }
        }
        NodeData::Catch { types, .. } => visit_catch(ctx, node, types.len()),
        NodeData::Labeled { .. } => {
            stmt::check_label_target(ctx, node);
            if !ctx.has_error() {
                stmt::check_label_in_use(ctx, node);
            }
        }
        NodeData::If | NodeData::While | NodeData::Assert | NodeData::Conditional => {
            if let Some(&condition) = tree.children(node).first() {
                expr::check_condition_boolean(ctx, condition);
            }
        }
        NodeData::DoWhile => {
            if let Some(&condition) = tree.children(node).last() {
                expr::check_condition_boolean(ctx, condition);
            }
        }
        NodeData::ForEach { .. } => {
            ctx.check_feature(node, Feature::ForEach);
        }
        NodeData::ArrayAccess => {
            expr::check_array_access(ctx, node);
        }
        NodeData::Call { name, name_range } => {
            expr::check_method_call(ctx, node, name, *name_range);
        }
        NodeData::MethodRef { .. } => {
            ctx.check_feature(node, Feature::MethodReferences);
            if !ctx.has_error() {
                expr::check_method_reference(ctx, node);
            }
        }
        NodeData::New {
            ty,
            has_anonymous_body,
            qualified,
        } => visit_new(ctx, node, ty, *has_anonymous_body, *qualified),
        NodeData::Literal(data) => {
            if data.kind == javelin_syntax::LiteralKind::TextBlock {
                ctx.check_feature(node, Feature::TextBlocks);
            }
            if !ctx.has_error() {
                literal::check_unicode_escapes(ctx, node, &data.text);
            }
            if !ctx.has_error() {
                literal::check_literal(ctx, node, data);
            }
        }
        NodeData::Comment { text, .. } => {
            literal::check_unclosed_comment(ctx, node, text);
            if !ctx.has_error() {
                literal::check_unicode_escapes(ctx, node, text);
            }
        }
        NodeData::Fragment { text } => {
            literal::check_unicode_escapes(ctx, node, text);
            if !ctx.has_error() {
                literal::check_fragment(ctx, node, text);
            }
        }
        NodeData::Switch { has_patterns } => {
            if *has_patterns {
                ctx.check_feature(node, Feature::PatternsInSwitch);
            }
        }
        NodeData::File { .. }
        | NodeData::TypeParameter { .. }
        | NodeData::AnnotationArrayInit
        | NodeData::Block
        | NodeData::Resource
        | NodeData::For
        | NodeData::Throw
        | NodeData::NameRef { .. } => {}
    }
}

fn visit_class(ctx: &mut CheckContext<'_>, node: NodeId, decl: &ClassDecl) {
    if decl.kind == javelin_syntax::ClassKind::Record {
        ctx.check_feature(node, Feature::Records);
    }
    if !ctx.has_error()
        && (decl.modifiers.is_sealed || decl.modifiers.is_non_sealed || !decl.permits.is_empty())
    {
        ctx.check_feature(node, Feature::SealedClasses);
    }
    if !ctx.has_error() {
        class::check_duplicate_class(ctx, node, decl);
    }
    if !ctx.has_error() {
        class::check_public_class_file_name(ctx, node, decl);
    }
    if !ctx.has_error() {
        record::check_record_header(ctx, decl);
    }
    if !ctx.has_error() {
        class::check_extends_implements(ctx, decl);
    }
    if !ctx.has_error() {
        class::check_cyclic_inheritance(ctx, decl);
    }
    if !ctx.has_error() {
        class::check_sealed_super(ctx, decl);
    }
    if !ctx.has_error() {
        class::check_sealed_inheritors(ctx, node, decl);
    }
    if !ctx.has_error() {
        class::check_class_must_be_abstract(ctx, node, decl);
    }
    if !ctx.has_error() {
        generics::check_interface_multiple_inheritance(ctx, decl);
    }
    if !ctx.has_error() {
        method::check_override_equivalent_inherited(ctx, node);
    }
}

fn visit_method(ctx: &mut CheckContext<'_>, node: NodeId, decl: &MethodDecl) {
    let in_interface = ctx
        .enclosing_class(node)
        .and_then(|class_node| ctx.class_decl(class_node))
        .is_some_and(|class| class.kind.is_interface_like());
    if decl.modifiers.is_default || (in_interface && decl.modifiers.is_static) {
        ctx.check_feature(node, Feature::ExtensionMethods);
    }
    if !ctx.has_error() && decl.params.iter().any(|param| param.is_varargs) {
        ctx.check_feature(node, Feature::Varargs);
    }
    if !ctx.has_error() {
        class::check_member_allowed_in_interface(ctx, node);
    }
    if !ctx.has_error() {
        method::check_can_have_body(ctx, node, decl);
    }
    if !ctx.has_error() {
        method::check_must_have_body(ctx, node, decl);
    }
    if !ctx.has_error() {
        method::check_varargs_well_formed(ctx, decl);
    }
    if !ctx.has_error() {
        method::check_duplicate(ctx, node);
    }
    if !ctx.has_error() {
        record::check_canonical_constructor(ctx, node, decl);
    }
    if !ctx.has_error() {
        method::check_throws_are_throwable(ctx, decl);
    }
    if !ctx.has_error() {
        method::check_static_override(ctx, node, decl);
    }
    if !ctx.has_error() {
        method::check_overrides_final(ctx, node, decl);
    }
    if !ctx.has_error() {
        method::check_weaker_privileges(ctx, node, decl);
    }
    if !ctx.has_error() {
        method::check_incompatible_return(ctx, node, decl);
    }
    if !ctx.has_error() {
        method::check_incompatible_throws(ctx, node, decl);
    }
}

fn visit_catch(ctx: &mut CheckContext<'_>, node: NodeId, disjuncts: usize) {
    if disjuncts > 1 {
        ctx.check_feature(node, Feature::MultiCatch);
    }
    if !ctx.has_error() {
        stmt::check_multi_catch_disjoint(ctx, node);
    }
    let tree = ctx.tree;
    let Some(try_node) = tree.parent(node) else {
        return;
    };
    if !matches!(tree.data(try_node), NodeData::Try) {
        return;
    }
    if !ctx.has_error() {
        stmt::check_exception_already_caught(ctx, try_node, node);
    }
    if !ctx.has_error() {
        let thrown = stmt::thrown_set(ctx, try_node);
        stmt::check_exception_thrown_in_try(ctx, node, &thrown);
    }
}

fn visit_new(
    ctx: &mut CheckContext<'_>,
    node: NodeId,
    ty: &javelin_syntax::TypeRef,
    has_anonymous_body: bool,
    qualified: bool,
) {
    if ty.is_diamond() {
        ctx.check_feature(node, Feature::Diamond);
        if !ctx.has_error() && has_anonymous_body {
            ctx.check_feature(node, Feature::DiamondWithAnonymous);
        }
    }
    if !ctx.has_error() {
        if has_anonymous_body {
            class::check_anonymous_inherit(ctx, ty);
        } else if let crate::resolve::ResolveOutcome::Unique(crate::resolve::SymbolRef::Class(
            id,
        )) = ctx.resolved_class(&ty.name)
        {
            class::check_illegal_instantiation(ctx, id, ty.range);
        }
    }
    if !ctx.has_error() {
        expr::check_new_inner_in_static_context(ctx, node, ty, qualified);
    }
    if !ctx.has_error() {
        generics::check_diamond_inference(ctx, node, ty);
    }
}
