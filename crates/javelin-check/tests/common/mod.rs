#![allow(dead_code)]

use std::collections::HashMap;

use javelin_check::{
    CheckOptions, ClassId, ClassSymbol, Diagnostic, IndexNotReady, LanguageVersion, MethodSym,
    SymbolIndex, SymbolRef, collect_diagnostics,
};
use javelin_syntax::{
    ClassDecl, ClassKind, MethodDecl, NodeData, NodeId, SyntaxTree, TextRange, TreeBuilder, Ty,
    TypeRef,
};

/// Hand-assembled symbol index. Tests register class symbols, per-node
/// reference candidates and per-node expression types; flipping `ready`
/// off makes every query defer.
pub struct FixtureIndex {
    classes: Vec<ClassSymbol>,
    refs: HashMap<NodeId, Vec<SymbolRef>>,
    types: HashMap<NodeId, Ty>,
    ready: bool,
}

impl FixtureIndex {
    pub fn new() -> Self {
        FixtureIndex {
            classes: Vec::new(),
            refs: HashMap::new(),
            types: HashMap::new(),
            ready: true,
        }
    }

    pub fn not_ready() -> Self {
        FixtureIndex {
            ready: false,
            ..FixtureIndex::new()
        }
    }

    /// The throwable backbone every exception-handling test leans on.
    pub fn with_prelude() -> Self {
        let mut index = FixtureIndex::new();
        index.add(ClassSymbol::new("Object", ClassKind::Class));
        index.add(extending("Throwable", "Object"));
        index.add(extending("Exception", "Throwable"));
        index.add(extending("RuntimeException", "Exception"));
        index.add(extending("Error", "Throwable"));
        index.add(extending("IOException", "Exception"));
        index.add(extending("FileNotFoundException", "IOException"));
        index
    }

    pub fn add(&mut self, symbol: ClassSymbol) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(symbol);
        id
    }

    pub fn add_simple(&mut self, name: &str, kind: ClassKind) -> ClassId {
        self.add(ClassSymbol::new(name, kind))
    }

    pub fn set_ref(&mut self, node: NodeId, candidates: Vec<SymbolRef>) {
        self.refs.insert(node, candidates);
    }

    pub fn set_type(&mut self, node: NodeId, ty: Ty) {
        self.types.insert(node, ty);
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassSymbol {
        &mut self.classes[id.0 as usize]
    }
}

impl SymbolIndex for FixtureIndex {
    fn classes_named(&self, name: &str) -> Result<Vec<ClassId>, IndexNotReady> {
        if !self.ready {
            return Err(IndexNotReady);
        }
        Ok(self
            .classes
            .iter()
            .enumerate()
            .filter(|(_, symbol)| symbol.name == name)
            .map(|(index, _)| ClassId(index as u32))
            .collect())
    }

    fn class(&self, id: ClassId) -> &ClassSymbol {
        &self.classes[id.0 as usize]
    }

    fn resolve_reference(&self, node: NodeId) -> Result<Vec<SymbolRef>, IndexNotReady> {
        if !self.ready {
            return Err(IndexNotReady);
        }
        Ok(self.refs.get(&node).cloned().unwrap_or_default())
    }

    fn expr_type(&self, node: NodeId) -> Result<Option<Ty>, IndexNotReady> {
        if !self.ready {
            return Err(IndexNotReady);
        }
        Ok(self.types.get(&node).cloned())
    }

    fn direct_inheritors(&self, id: ClassId) -> Result<Vec<ClassId>, IndexNotReady> {
        if !self.ready {
            return Err(IndexNotReady);
        }
        let name = &self.classes[id.0 as usize].name;
        Ok(self
            .classes
            .iter()
            .enumerate()
            .filter(|(_, symbol)| symbol.supers.iter().any(|super_ref| super_ref.name == *name))
            .map(|(index, _)| ClassId(index as u32))
            .collect())
    }
}

fn extending(name: &str, super_name: &str) -> ClassSymbol {
    let mut symbol = ClassSymbol::new(name, ClassKind::Class);
    symbol.supers.push(type_ref(super_name));
    symbol
}

pub fn type_ref(name: &str) -> TypeRef {
    TypeRef::new(name, TextRange::empty(0))
}

pub fn method_sym(name: &str) -> MethodSym {
    MethodSym::new(name)
}

pub fn check(tree: &SyntaxTree, index: &FixtureIndex) -> Vec<Diagnostic> {
    check_at(tree, index, LanguageVersion::LATEST)
}

pub fn check_at(
    tree: &SyntaxTree,
    index: &FixtureIndex,
    version: LanguageVersion,
) -> Vec<Diagnostic> {
    let options = CheckOptions {
        version: Some(version),
        ..CheckOptions::default()
    };
    collect_diagnostics(tree, index, &options)
}

pub fn codes(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
    diagnostics.iter().map(|diagnostic| diagnostic.code).collect()
}

pub fn named_class(name: &str, kind: ClassKind) -> ClassDecl {
    ClassDecl::new(name, kind, TextRange::new(0, name.len()))
}

pub fn named_method(name: &str) -> MethodDecl {
    MethodDecl::new(name, TextRange::new(0, name.len()))
}

/// Wrap `children` in a file named `Main` and finish the tree.
pub fn build_file(mut builder: TreeBuilder, children: Vec<NodeId>) -> SyntaxTree {
    let file = builder.node(
        NodeData::File {
            name: "Main".to_string(),
        },
        TextRange::new(0, 1000),
        children,
    );
    builder.build(file)
}
