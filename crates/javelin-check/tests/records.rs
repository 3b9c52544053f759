mod common;

use javelin_syntax::{ClassKind, NodeData, NodeId, TextRange, TreeBuilder, Visibility};

fn record_decl(name: &str) -> javelin_syntax::ClassDecl {
    let mut decl = common::named_class(name, ClassKind::Record);
    decl.record_header = Some(TextRange::new(6, 20));
    decl
}

fn component(builder: &mut TreeBuilder, name: &str, ty: &str, offset: usize) -> NodeId {
    builder.leaf(
        NodeData::RecordComponent {
            name: name.to_string(),
            ty: common::type_ref(ty),
        },
        TextRange::new(offset, offset + 5),
    )
}

#[test]
fn missing_record_header() {
    let mut builder = TreeBuilder::new();
    let class = builder.leaf(
        NodeData::Class(common::named_class("Point", ClassKind::Record)),
        TextRange::new(0, 30),
    );
    let tree = common::build_file(builder, vec![class]);
    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    assert_eq!(common::codes(&diagnostics), vec!["record.header.missing"]);
}

#[test]
fn duplicated_component_reports_exactly_once() {
    let mut builder = TreeBuilder::new();
    let first = component(&mut builder, "x", "int", 6);
    let second = component(&mut builder, "x", "int", 12);
    let class = builder.node(
        NodeData::Class(record_decl("Point")),
        TextRange::new(0, 30),
        vec![first, second],
    );
    let tree = common::build_file(builder, vec![class]);
    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    assert_eq!(
        common::codes(&diagnostics),
        vec!["record.component.duplicate"]
    );
}

#[test]
fn duplicate_component_does_not_stop_accessor_checking() {
    let mut builder = TreeBuilder::new();
    let first = component(&mut builder, "x", "int", 6);
    let second = component(&mut builder, "x", "int", 12);
    let mut accessor = common::named_method("x");
    accessor.return_type = Some(common::type_ref("long"));
    let method = builder.leaf(NodeData::Method(accessor), TextRange::new(21, 40));
    let class = builder.node(
        NodeData::Class(record_decl("Point")),
        TextRange::new(0, 50),
        vec![first, second, method],
    );
    let tree = common::build_file(builder, vec![class]);
    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    assert_eq!(
        common::codes(&diagnostics),
        vec!["record.accessor.return", "record.component.duplicate"]
    );
}

#[test]
fn accessor_must_return_the_component_type() {
    let mut builder = TreeBuilder::new();
    let x = component(&mut builder, "x", "int", 6);
    let mut accessor = common::named_method("x");
    accessor.return_type = Some(common::type_ref("long"));
    let method = builder.leaf(NodeData::Method(accessor), TextRange::new(21, 40));
    let class = builder.node(
        NodeData::Class(record_decl("Point")),
        TextRange::new(0, 50),
        vec![x, method],
    );
    let tree = common::build_file(builder, vec![class]);
    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    assert_eq!(common::codes(&diagnostics), vec!["record.accessor.return"]);
}

#[test]
fn matching_accessor_passes() {
    let mut builder = TreeBuilder::new();
    let x = component(&mut builder, "x", "int", 6);
    let mut accessor = common::named_method("x");
    accessor.return_type = Some(common::type_ref("int"));
    let method = builder.leaf(NodeData::Method(accessor), TextRange::new(21, 40));
    let class = builder.node(
        NodeData::Class(record_decl("Point")),
        TextRange::new(0, 50),
        vec![x, method],
    );
    let tree = common::build_file(builder, vec![class]);
    assert!(common::check(&tree, &common::FixtureIndex::new()).is_empty());
}

#[test]
fn instance_field_rejected_in_record_body() {
    let mut builder = TreeBuilder::new();
    let field = builder.leaf(
        NodeData::Field {
            name: "cache".to_string(),
            ty: common::type_ref("int"),
            modifiers: javelin_syntax::Modifiers::default(),
        },
        TextRange::new(21, 35),
    );
    let class = builder.node(
        NodeData::Class(record_decl("Point")),
        TextRange::new(0, 50),
        vec![field],
    );
    let tree = common::build_file(builder, vec![class]);
    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    assert_eq!(common::codes(&diagnostics), vec!["record.instance.field"]);
}

#[test]
fn static_field_is_fine_in_record_body() {
    let mut builder = TreeBuilder::new();
    let mut modifiers = javelin_syntax::Modifiers::default();
    modifiers.is_static = true;
    let field = builder.leaf(
        NodeData::Field {
            name: "ORIGIN".to_string(),
            ty: common::type_ref("int"),
            modifiers,
        },
        TextRange::new(21, 35),
    );
    let class = builder.node(
        NodeData::Class(record_decl("Point")),
        TextRange::new(0, 50),
        vec![field],
    );
    let tree = common::build_file(builder, vec![class]);
    assert!(common::check(&tree, &common::FixtureIndex::new()).is_empty());
}

#[test]
fn instance_initializer_rejected_in_record_body() {
    let mut builder = TreeBuilder::new();
    let initializer = builder.leaf(
        NodeData::Initializer { is_static: false },
        TextRange::new(21, 35),
    );
    let class = builder.node(
        NodeData::Class(record_decl("Point")),
        TextRange::new(0, 50),
        vec![initializer],
    );
    let tree = common::build_file(builder, vec![class]);
    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    assert_eq!(
        common::codes(&diagnostics),
        vec!["record.instance.initializer"]
    );
}

#[test]
fn compact_constructor_cannot_declare_checked_exceptions() {
    let mut builder = TreeBuilder::new();
    let x = component(&mut builder, "x", "int", 6);
    let mut ctor = common::named_method("Point");
    ctor.is_constructor = true;
    ctor.is_compact_constructor = true;
    ctor.throws.push(common::type_ref("IOException"));
    let ctor_node = builder.leaf(NodeData::Method(ctor), TextRange::new(21, 40));
    let class = builder.node(
        NodeData::Class(record_decl("Point")),
        TextRange::new(0, 50),
        vec![x, ctor_node],
    );
    let tree = common::build_file(builder, vec![class]);
    let diagnostics = common::check(&tree, &common::FixtureIndex::with_prelude());
    assert_eq!(common::codes(&diagnostics), vec!["record.constructor.throws"]);
}

#[test]
fn canonical_constructor_visibility_matches_the_record() {
    let mut builder = TreeBuilder::new();
    let x = component(&mut builder, "x", "int", 6);
    let mut ctor = common::named_method("Point");
    ctor.is_constructor = true;
    ctor.modifiers.visibility = Visibility::Private;
    ctor.params.push(javelin_syntax::ParamDecl {
        name: "x".to_string(),
        ty: common::type_ref("int"),
        is_varargs: false,
        range: TextRange::new(25, 30),
    });
    let ctor_node = builder.leaf(NodeData::Method(ctor), TextRange::new(21, 40));
    let mut decl = record_decl("Main");
    decl.modifiers.visibility = Visibility::Public;
    let class = builder.node(NodeData::Class(decl), TextRange::new(0, 50), vec![x, ctor_node]);
    let tree = common::build_file(builder, vec![class]);
    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    assert_eq!(common::codes(&diagnostics), vec!["record.constructor.access"]);
}

#[test]
fn non_canonical_constructor_is_unconstrained() {
    let mut builder = TreeBuilder::new();
    let x = component(&mut builder, "x", "int", 6);
    let mut ctor = common::named_method("Point");
    ctor.is_constructor = true;
    ctor.modifiers.visibility = Visibility::Private;
    let ctor_node = builder.leaf(NodeData::Method(ctor), TextRange::new(21, 40));
    let class = builder.node(
        NodeData::Class(record_decl("Point")),
        TextRange::new(0, 50),
        vec![x, ctor_node],
    );
    let tree = common::build_file(builder, vec![class]);
    assert!(common::check(&tree, &common::FixtureIndex::new()).is_empty());
}
