mod common;

use javelin_check::{ClassSymbol, ErrorPayload, SymbolRef};
use javelin_syntax::{ClassKind, NodeData, TextRange, TreeBuilder, Ty};

#[test]
fn if_condition_must_be_boolean() {
    let mut builder = TreeBuilder::new();
    let condition = builder.leaf(
        NodeData::NameRef {
            name: "count".to_string(),
        },
        TextRange::new(4, 9),
    );
    let then_branch = builder.leaf(NodeData::Block, TextRange::new(11, 13));
    let if_node = builder.node(
        NodeData::If,
        TextRange::new(0, 13),
        vec![condition, then_branch],
    );
    let tree = common::build_file(builder, vec![if_node]);

    let mut index = common::FixtureIndex::new();
    index.set_type(condition, Ty::Int);
    let diagnostics = common::check(&tree, &index);
    assert_eq!(
        common::codes(&diagnostics),
        vec!["expr.condition.not.boolean"]
    );
}

#[test]
fn do_while_condition_is_the_last_child() {
    let mut builder = TreeBuilder::new();
    let body = builder.leaf(NodeData::Block, TextRange::new(3, 10));
    let condition = builder.leaf(
        NodeData::NameRef {
            name: "count".to_string(),
        },
        TextRange::new(18, 23),
    );
    let do_node = builder.node(NodeData::DoWhile, TextRange::new(0, 25), vec![body, condition]);
    let tree = common::build_file(builder, vec![do_node]);

    let mut index = common::FixtureIndex::new();
    index.set_type(condition, Ty::Int);
    let diagnostics = common::check(&tree, &index);
    assert_eq!(
        common::codes(&diagnostics),
        vec!["expr.condition.not.boolean"]
    );
}

#[test]
fn untyped_condition_abstains() {
    let mut builder = TreeBuilder::new();
    let condition = builder.leaf(
        NodeData::NameRef {
            name: "flag".to_string(),
        },
        TextRange::new(4, 8),
    );
    let while_node = builder.node(NodeData::While, TextRange::new(0, 15), vec![condition]);
    let tree = common::build_file(builder, vec![while_node]);
    assert!(common::check(&tree, &common::FixtureIndex::new()).is_empty());
}

#[test]
fn array_access_needs_an_array() {
    let mut builder = TreeBuilder::new();
    let array = builder.leaf(
        NodeData::NameRef {
            name: "name".to_string(),
        },
        TextRange::new(0, 4),
    );
    let subscript = builder.leaf(
        NodeData::NameRef {
            name: "i".to_string(),
        },
        TextRange::new(5, 6),
    );
    let access = builder.node(
        NodeData::ArrayAccess,
        TextRange::new(0, 7),
        vec![array, subscript],
    );
    let tree = common::build_file(builder, vec![access]);

    let mut index = common::FixtureIndex::new();
    index.set_type(array, Ty::class("String"));
    index.set_type(subscript, Ty::Int);
    let diagnostics = common::check(&tree, &index);
    assert_eq!(common::codes(&diagnostics), vec!["expr.array.type.expected"]);
}

#[test]
fn array_index_must_promote_to_int() {
    let mut builder = TreeBuilder::new();
    let array = builder.leaf(
        NodeData::NameRef {
            name: "xs".to_string(),
        },
        TextRange::new(0, 2),
    );
    let subscript = builder.leaf(
        NodeData::NameRef {
            name: "i".to_string(),
        },
        TextRange::new(3, 4),
    );
    let access = builder.node(
        NodeData::ArrayAccess,
        TextRange::new(0, 5),
        vec![array, subscript],
    );
    let tree = common::build_file(builder, vec![access]);

    let mut index = common::FixtureIndex::new();
    index.set_type(array, Ty::array(Ty::Int));
    index.set_type(subscript, Ty::Long);
    let diagnostics = common::check(&tree, &index);
    assert_eq!(common::codes(&diagnostics), vec!["expr.array.index.not.int"]);
}

#[test]
fn char_index_is_accepted() {
    let mut builder = TreeBuilder::new();
    let array = builder.leaf(
        NodeData::NameRef {
            name: "xs".to_string(),
        },
        TextRange::new(0, 2),
    );
    let subscript = builder.leaf(
        NodeData::NameRef {
            name: "c".to_string(),
        },
        TextRange::new(3, 4),
    );
    let access = builder.node(
        NodeData::ArrayAccess,
        TextRange::new(0, 5),
        vec![array, subscript],
    );
    let tree = common::build_file(builder, vec![access]);

    let mut index = common::FixtureIndex::new();
    index.set_type(array, Ty::array(Ty::Int));
    index.set_type(subscript, Ty::Char);
    assert!(common::check(&tree, &index).is_empty());
}

#[test]
fn ambiguous_call_carries_the_candidate_count() {
    let mut index = common::FixtureIndex::new();
    let mut owner = ClassSymbol::new("Util", ClassKind::Class);
    owner.methods.push(common::method_sym("of"));
    owner.methods.push(common::method_sym("of"));
    let owner_id = index.add(owner);

    let mut builder = TreeBuilder::new();
    let call = builder.leaf(
        NodeData::Call {
            name: "of".to_string(),
            name_range: TextRange::new(0, 2),
        },
        TextRange::new(0, 6),
    );
    index.set_ref(
        call,
        vec![
            SymbolRef::Method {
                class: owner_id,
                index: 0,
            },
            SymbolRef::Method {
                class: owner_id,
                index: 1,
            },
        ],
    );
    let tree = common::build_file(builder, vec![call]);
    let diagnostics = common::check(&tree, &index);
    assert_eq!(common::codes(&diagnostics), vec!["expr.call.ambiguous"]);
    assert_eq!(diagnostics[0].payload, ErrorPayload::Candidates { count: 2 });
}

#[test]
fn constructor_reference_into_an_interface() {
    let mut index = common::FixtureIndex::new();
    index.add_simple("Runnable", ClassKind::Interface);

    let mut builder = TreeBuilder::new();
    let method_ref = builder.leaf(
        NodeData::MethodRef {
            qualifier: common::type_ref("Runnable"),
            name: "new".to_string(),
            is_constructor: true,
        },
        TextRange::new(0, 13),
    );
    let tree = common::build_file(builder, vec![method_ref]);
    let diagnostics = common::check(&tree, &index);
    assert_eq!(
        common::codes(&diagnostics),
        vec!["class.instantiation.abstract"]
    );
}

#[test]
fn plain_method_reference_that_resolves_nowhere() {
    let mut builder = TreeBuilder::new();
    let method_ref = builder.leaf(
        NodeData::MethodRef {
            qualifier: common::type_ref("Util"),
            name: "missing".to_string(),
            is_constructor: false,
        },
        TextRange::new(0, 13),
    );
    let tree = common::build_file(builder, vec![method_ref]);
    let diagnostics = common::check(&tree, &common::FixtureIndex::new());
    assert_eq!(
        common::codes(&diagnostics),
        vec!["expr.method.ref.unresolved"]
    );
}

#[test]
fn instantiating_an_abstract_class() {
    let mut index = common::FixtureIndex::new();
    let mut shape = ClassSymbol::new("Shape", ClassKind::Class);
    shape.modifiers.is_abstract = true;
    index.add(shape);

    let mut builder = TreeBuilder::new();
    let new_node = builder.leaf(
        NodeData::New {
            ty: common::type_ref("Shape"),
            has_anonymous_body: false,
            qualified: false,
        },
        TextRange::new(0, 15),
    );
    let tree = common::build_file(builder, vec![new_node]);
    let diagnostics = common::check(&tree, &index);
    assert_eq!(
        common::codes(&diagnostics),
        vec!["class.instantiation.abstract"]
    );
}

#[test]
fn anonymous_body_makes_the_abstract_class_instantiable() {
    let mut index = common::FixtureIndex::new();
    let mut shape = ClassSymbol::new("Shape", ClassKind::Class);
    shape.modifiers.is_abstract = true;
    index.add(shape);

    let mut builder = TreeBuilder::new();
    let new_node = builder.leaf(
        NodeData::New {
            ty: common::type_ref("Shape"),
            has_anonymous_body: true,
            qualified: false,
        },
        TextRange::new(0, 25),
    );
    let tree = common::build_file(builder, vec![new_node]);
    assert!(common::check(&tree, &index).is_empty());
}

#[test]
fn inner_class_instantiated_from_a_static_context() {
    let mut index = common::FixtureIndex::new();
    let mut inner = ClassSymbol::new("Inner", ClassKind::Class);
    inner.is_inner = true;
    index.add(inner);

    let mut builder = TreeBuilder::new();
    let new_node = builder.leaf(
        NodeData::New {
            ty: common::type_ref("Inner"),
            has_anonymous_body: false,
            qualified: false,
        },
        TextRange::new(30, 45),
    );
    let initializer = builder.node(
        NodeData::Initializer { is_static: true },
        TextRange::new(25, 50),
        vec![new_node],
    );
    let class = builder.node(
        NodeData::Class(common::named_class("Outer", ClassKind::Class)),
        TextRange::new(0, 60),
        vec![initializer],
    );
    let tree = common::build_file(builder, vec![class]);
    let diagnostics = common::check(&tree, &index);
    assert_eq!(common::codes(&diagnostics), vec!["expr.new.inner.static"]);
}

#[test]
fn local_class_of_an_instance_method_instantiated_from_a_static_context() {
    let mut builder = TreeBuilder::new();
    let mut helper_decl = common::named_class("Helper", ClassKind::Class);
    helper_decl.is_local = true;
    let helper = builder.leaf(NodeData::Class(helper_decl), TextRange::new(15, 24));
    let run = builder.node(
        NodeData::Method(common::named_method("run")),
        TextRange::new(10, 25),
        vec![helper],
    );
    let new_node = builder.leaf(
        NodeData::New {
            ty: common::type_ref("Helper"),
            has_anonymous_body: false,
            qualified: false,
        },
        TextRange::new(35, 47),
    );
    let initializer = builder.node(
        NodeData::Initializer { is_static: true },
        TextRange::new(30, 50),
        vec![new_node],
    );
    let class = builder.node(
        NodeData::Class(common::named_class("Outer", ClassKind::Class)),
        TextRange::new(0, 60),
        vec![run, initializer],
    );
    let tree = common::build_file(builder, vec![class]);

    let mut index = common::FixtureIndex::new();
    let mut helper_sym = ClassSymbol::new("Helper", ClassKind::Class);
    helper_sym.is_local = true;
    helper_sym.decl = Some(helper);
    index.add(helper_sym);
    let diagnostics = common::check(&tree, &index);
    assert_eq!(common::codes(&diagnostics), vec!["expr.new.inner.static"]);
}

#[test]
fn local_class_of_a_static_method_is_instantiable_there() {
    let mut builder = TreeBuilder::new();
    let mut helper_decl = common::named_class("Helper", ClassKind::Class);
    helper_decl.is_local = true;
    let helper = builder.leaf(NodeData::Class(helper_decl), TextRange::new(15, 24));
    let new_node = builder.leaf(
        NodeData::New {
            ty: common::type_ref("Helper"),
            has_anonymous_body: false,
            qualified: false,
        },
        TextRange::new(25, 37),
    );
    let mut main = common::named_method("main");
    main.modifiers.is_static = true;
    let method = builder.node(
        NodeData::Method(main),
        TextRange::new(10, 40),
        vec![helper, new_node],
    );
    let class = builder.node(
        NodeData::Class(common::named_class("Outer", ClassKind::Class)),
        TextRange::new(0, 50),
        vec![method],
    );
    let tree = common::build_file(builder, vec![class]);

    let mut index = common::FixtureIndex::new();
    let mut helper_sym = ClassSymbol::new("Helper", ClassKind::Class);
    helper_sym.is_local = true;
    helper_sym.decl = Some(helper);
    index.add(helper_sym);
    assert!(common::check(&tree, &index).is_empty());
}

#[test]
fn qualified_inner_instantiation_is_fine_anywhere() {
    let mut index = common::FixtureIndex::new();
    let mut inner = ClassSymbol::new("Inner", ClassKind::Class);
    inner.is_inner = true;
    index.add(inner);

    let mut builder = TreeBuilder::new();
    let new_node = builder.leaf(
        NodeData::New {
            ty: common::type_ref("Inner"),
            has_anonymous_body: false,
            qualified: true,
        },
        TextRange::new(30, 45),
    );
    let initializer = builder.node(
        NodeData::Initializer { is_static: true },
        TextRange::new(25, 50),
        vec![new_node],
    );
    let class = builder.node(
        NodeData::Class(common::named_class("Outer", ClassKind::Class)),
        TextRange::new(0, 60),
        vec![initializer],
    );
    let tree = common::build_file(builder, vec![class]);
    assert!(common::check(&tree, &index).is_empty());
}
