mod common;

use javelin_syntax::{ClassKind, NodeData, TextRange, TreeBuilder};

#[test]
fn not_ready_index_suppresses_resolution_checks() {
    // An unresolvable call and an extends target that cannot be looked up
    // produce nothing while the index is warming up.
    let mut builder = TreeBuilder::new();
    let call = builder.leaf(
        NodeData::Call {
            name: "frobnicate".to_string(),
            name_range: TextRange::new(30, 40),
        },
        TextRange::new(30, 42),
    );
    let body = builder.node(NodeData::Block, TextRange::new(25, 45), vec![call]);
    let method_node = builder.node(
        NodeData::Method(common::named_method("run")),
        TextRange::new(20, 46),
        vec![body],
    );
    let mut decl = common::named_class("Main", ClassKind::Class);
    decl.extends.push(common::type_ref("Mystery"));
    let class = builder.node(
        NodeData::Class(decl),
        TextRange::new(0, 50),
        vec![method_node],
    );
    let tree = common::build_file(builder, vec![class]);

    let diagnostics = common::check(&tree, &common::FixtureIndex::not_ready());
    assert!(diagnostics.is_empty());
}

#[test]
fn structural_checks_still_run_while_deferred() {
    let mut builder = TreeBuilder::new();
    let throw = builder.leaf(NodeData::Throw, TextRange::new(10, 20));
    let labeled = builder.node(
        NodeData::Labeled {
            label: "here".to_string(),
            label_range: TextRange::new(4, 8),
        },
        TextRange::new(4, 20),
        vec![throw],
    );
    let tree = common::build_file(builder, vec![labeled]);

    let diagnostics = common::check(&tree, &common::FixtureIndex::not_ready());
    assert_eq!(common::codes(&diagnostics), vec!["stmt.label.not.labelable"]);
}

#[test]
fn ready_index_reports_what_deferred_suppressed() {
    let mut builder = TreeBuilder::new();
    let call = builder.leaf(
        NodeData::Call {
            name: "frobnicate".to_string(),
            name_range: TextRange::new(30, 40),
        },
        TextRange::new(30, 42),
    );
    let tree = common::build_file(builder, vec![call]);

    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    assert_eq!(common::codes(&diagnostics), vec!["expr.call.unresolved"]);
}
