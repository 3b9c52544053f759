mod common;

use javelin_syntax::{ClassKind, NodeData, TextRange, TreeBuilder, Visibility};

fn abstract_method(name: &str) -> NodeData {
    let mut method = common::named_method(name);
    method.modifiers.is_abstract = true;
    method.has_body = false;
    NodeData::Method(method)
}

#[test]
fn first_failing_check_masks_later_ones() {
    // A misnamed public class that would also have to be abstract: only
    // the earlier check reports.
    let mut builder = TreeBuilder::new();
    let method = builder.leaf(abstract_method("run"), TextRange::new(20, 40));
    let mut decl = common::named_class("Wrong", ClassKind::Class);
    decl.modifiers.visibility = Visibility::Public;
    let class = builder.node(NodeData::Class(decl), TextRange::new(0, 50), vec![method]);
    let tree = common::build_file(builder, vec![class]);

    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    assert_eq!(common::codes(&diagnostics), vec!["class.public.file.name"]);
}

#[test]
fn later_check_runs_when_earlier_ones_pass() {
    let mut builder = TreeBuilder::new();
    let method = builder.leaf(abstract_method("run"), TextRange::new(20, 40));
    let mut decl = common::named_class("Main", ClassKind::Class);
    decl.modifiers.visibility = Visibility::Public;
    let class = builder.node(NodeData::Class(decl), TextRange::new(0, 50), vec![method]);
    let tree = common::build_file(builder, vec![class]);

    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    assert_eq!(common::codes(&diagnostics), vec!["class.must.be.abstract"]);
}

#[test]
fn flag_resets_between_nodes() {
    // Two independently broken siblings each get their own diagnostic.
    let mut builder = TreeBuilder::new();
    let mut public_decl = common::named_class("Wrong", ClassKind::Class);
    public_decl.modifiers.visibility = Visibility::Public;
    let first = builder.leaf(NodeData::Class(public_decl), TextRange::new(0, 10));
    let second = builder.leaf(
        NodeData::Class(common::named_class("Wrong", ClassKind::Class)),
        TextRange::new(11, 21),
    );
    let tree = common::build_file(builder, vec![first, second]);

    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    assert_eq!(
        common::codes(&diagnostics),
        vec!["class.public.file.name", "class.duplicate"]
    );
}

#[test]
fn parent_error_does_not_mask_children() {
    let mut builder = TreeBuilder::new();
    let mut bad_param = common::named_method("f");
    bad_param.params = vec![
        javelin_syntax::ParamDecl {
            name: "xs".to_string(),
            ty: common::type_ref("int"),
            is_varargs: true,
            range: TextRange::new(25, 30),
        },
        javelin_syntax::ParamDecl {
            name: "y".to_string(),
            ty: common::type_ref("int"),
            is_varargs: false,
            range: TextRange::new(31, 36),
        },
    ];
    let method = builder.leaf(NodeData::Method(bad_param), TextRange::new(20, 40));
    let mut decl = common::named_class("Wrong", ClassKind::Class);
    decl.modifiers.visibility = Visibility::Public;
    let class = builder.node(NodeData::Class(decl), TextRange::new(0, 50), vec![method]);
    let tree = common::build_file(builder, vec![class]);

    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    assert_eq!(
        common::codes(&diagnostics),
        vec!["class.public.file.name", "method.varargs.not.last"]
    );
}

#[test]
fn synthetic_nodes_are_skipped_but_children_checked() {
    let mut builder = TreeBuilder::new();
    let first = builder.leaf(
        NodeData::Class(common::named_class("A", ClassKind::Class)),
        TextRange::new(0, 10),
    );
    let second = builder.leaf(
        NodeData::Class(common::named_class("A", ClassKind::Class)),
        TextRange::new(11, 21),
    );
    let wrapper = builder.synthetic(
        NodeData::Class(common::named_class("A", ClassKind::Class)),
        TextRange::new(22, 32),
        vec![],
    );
    let tree = common::build_file(builder, vec![first, second, wrapper]);

    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    // The synthetic third declaration reports nothing itself.
    assert_eq!(common::codes(&diagnostics), vec!["class.duplicate"]);
}
