use rustc_hash::{FxHashMap, FxHashSet};

use javelin_syntax::{ClassKind, Modifiers, NodeId, Ty, TypeRef};

/// Transient "symbol index is not ready yet" signal from the external
/// resolution subsystem. Never an error: the adapter converts it to
/// [`ResolveOutcome::Deferred`] and callers abstain for this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexNotReady;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub u32);

/// A resolved candidate: a class, or the `index`-th method of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolRef {
    Class(ClassId),
    Method { class: ClassId, index: u32 },
}

/// Method facts the index exposes. Parameter and return types are erased
/// spellings; that is all the signature checks compare.
#[derive(Debug, Clone)]
pub struct MethodSym {
    pub name: String,
    pub params: Vec<String>,
    pub return_type: Option<String>,
    pub throws: Vec<String>,
    pub modifiers: Modifiers,
    pub has_body: bool,
    pub is_constructor: bool,
    pub is_annotation_member: bool,
}

impl MethodSym {
    pub fn new(name: impl Into<String>) -> Self {
        MethodSym {
            name: name.into(),
            params: Vec::new(),
            return_type: None,
            throws: Vec::new(),
            modifiers: Modifiers::default(),
            has_body: true,
            is_constructor: false,
            is_annotation_member: false,
        }
    }

    pub fn erased_signature(&self) -> String {
        format!("{}({})", self.name, self.params.join(", "))
    }
}

/// Class facts the index exposes.
#[derive(Debug, Clone)]
pub struct ClassSymbol {
    pub name: String,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    /// Direct supertypes, extends and implements together.
    pub supers: Vec<TypeRef>,
    pub permits: Vec<String>,
    /// Declared type-parameter count; non-zero makes raw references
    /// reportable.
    pub type_params: usize,
    pub methods: Vec<MethodSym>,
    pub is_inner: bool,
    pub is_local: bool,
    /// Back-link to the declaration node when the class lives in the
    /// currently checked file.
    pub decl: Option<NodeId>,
}

impl ClassSymbol {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        ClassSymbol {
            name: name.into(),
            kind,
            modifiers: Modifiers::default(),
            supers: Vec::new(),
            permits: Vec::new(),
            type_params: 0,
            methods: Vec::new(),
            is_inner: false,
            is_local: false,
            decl: None,
        }
    }
}

/// Narrow interface over the external symbol-resolution / type-inference
/// subsystem. Implementations return raw candidate lists; normalization
/// and caching happen in [`ResolverAdapter`].
pub trait SymbolIndex {
    fn classes_named(&self, name: &str) -> Result<Vec<ClassId>, IndexNotReady>;
    fn class(&self, id: ClassId) -> &ClassSymbol;
    /// Candidates for a reference-like node (calls, method references,
    /// name references).
    fn resolve_reference(&self, node: NodeId) -> Result<Vec<SymbolRef>, IndexNotReady>;
    /// Inferred type of an expression node, if the inference subsystem
    /// knows one.
    fn expr_type(&self, node: NodeId) -> Result<Option<Ty>, IndexNotReady>;
    fn direct_inheritors(&self, id: ClassId) -> Result<Vec<ClassId>, IndexNotReady>;
}

/// Normalized resolution result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Unique(SymbolRef),
    Ambiguous(Vec<SymbolRef>),
    Unresolved,
    /// Index not ready; abandon the current node's checks, report nothing.
    Deferred,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeOutcome {
    Known(Ty),
    Unknown,
    Deferred,
}

/// Per-walk wrapper around the symbol index: memoizes every query for the
/// duration of one traversal and guards class-name resolution against
/// re-entrant loops. One adapter per walk, never shared.
pub struct ResolverAdapter<'a> {
    index: &'a dyn SymbolIndex,
    by_name: FxHashMap<String, Result<Vec<ClassId>, IndexNotReady>>,
    by_node: FxHashMap<NodeId, ResolveOutcome>,
    types: FxHashMap<NodeId, TypeOutcome>,
    in_flight: FxHashSet<String>,
}

impl<'a> ResolverAdapter<'a> {
    pub fn new(index: &'a dyn SymbolIndex) -> Self {
        ResolverAdapter {
            index,
            by_name: FxHashMap::default(),
            by_node: FxHashMap::default(),
            types: FxHashMap::default(),
            in_flight: FxHashSet::default(),
        }
    }

    pub fn class(&self, id: ClassId) -> &ClassSymbol {
        self.index.class(id)
    }

    pub fn classes_named(&mut self, name: &str) -> Result<Vec<ClassId>, IndexNotReady> {
        if let Some(cached) = self.by_name.get(name) {
            return cached.clone();
        }
        // A name already being resolved further up the stack resolves to
        // nothing for the inner query instead of looping.
        if !self.in_flight.insert(name.to_string()) {
            return Ok(Vec::new());
        }
        let result = self.index.classes_named(name);
        self.in_flight.remove(name);
        self.by_name.insert(name.to_string(), result.clone());
        result
    }

    pub fn resolve_class(&mut self, name: &str) -> ResolveOutcome {
        match self.classes_named(name) {
            Err(IndexNotReady) => ResolveOutcome::Deferred,
            Ok(candidates) => match candidates.as_slice() {
                [] => ResolveOutcome::Unresolved,
                [only] => ResolveOutcome::Unique(SymbolRef::Class(*only)),
                _ => ResolveOutcome::Ambiguous(
                    candidates.iter().copied().map(SymbolRef::Class).collect(),
                ),
            },
        }
    }

    /// Unique class for `name`, if there is exactly one.
    pub fn unique_class(&mut self, name: &str) -> Result<Option<ClassId>, IndexNotReady> {
        match self.classes_named(name) {
            Err(IndexNotReady) => Err(IndexNotReady),
            Ok(candidates) => match candidates.as_slice() {
                [only] => Ok(Some(*only)),
                _ => Ok(None),
            },
        }
    }

    /// The class symbol a declaration node corresponds to. Prefers the
    /// candidate whose back-link matches the node.
    pub fn class_for_decl(
        &mut self,
        node: NodeId,
        name: &str,
    ) -> Result<Option<ClassId>, IndexNotReady> {
        let candidates = self.classes_named(name)?;
        let by_decl = candidates
            .iter()
            .copied()
            .find(|&id| self.index.class(id).decl == Some(node));
        Ok(by_decl.or_else(|| candidates.first().copied()))
    }

    pub fn resolve_reference(&mut self, node: NodeId) -> ResolveOutcome {
        if let Some(cached) = self.by_node.get(&node) {
            return cached.clone();
        }
        let outcome = match self.index.resolve_reference(node) {
            Err(IndexNotReady) => ResolveOutcome::Deferred,
            Ok(candidates) => match candidates.as_slice() {
                [] => ResolveOutcome::Unresolved,
                [only] => ResolveOutcome::Unique(*only),
                _ => ResolveOutcome::Ambiguous(candidates),
            },
        };
        self.by_node.insert(node, outcome.clone());
        outcome
    }

    pub fn expr_type(&mut self, node: NodeId) -> TypeOutcome {
        if let Some(cached) = self.types.get(&node) {
            return cached.clone();
        }
        let outcome = match self.index.expr_type(node) {
            Err(IndexNotReady) => TypeOutcome::Deferred,
            Ok(None) => TypeOutcome::Unknown,
            Ok(Some(ty)) => TypeOutcome::Known(ty),
        };
        self.types.insert(node, outcome.clone());
        outcome
    }

    pub fn method(&self, symbol: SymbolRef) -> Option<&MethodSym> {
        match symbol {
            SymbolRef::Method { class, index } => {
                self.index.class(class).methods.get(index as usize)
            }
            SymbolRef::Class(_) => None,
        }
    }

    /// Reflexive-transitive subtype test over class names, walking the
    /// supertype chain through the index. Unresolved links simply fail to
    /// establish the relation; a not-ready index propagates.
    pub fn is_subtype(&mut self, sub: &str, sup: &str) -> Result<bool, IndexNotReady> {
        if sub == sup || sup == "Object" || sup == "java.lang.Object" {
            return Ok(true);
        }
        let mut visited: FxHashSet<String> = FxHashSet::default();
        let mut stack = vec![sub.to_string()];
        while let Some(name) = stack.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }
            if name == sup {
                return Ok(true);
            }
            if let Some(id) = self.unique_class(&name)? {
                let supers: Vec<String> = self
                    .class(id)
                    .supers
                    .iter()
                    .map(|super_ref| super_ref.name.clone())
                    .collect();
                stack.extend(supers);
            }
        }
        Ok(false)
    }

    /// Exceptions outside the checked set: subtypes of RuntimeException or
    /// Error, or the top throwable types themselves.
    pub fn is_unchecked_exception(&mut self, name: &str) -> Result<bool, IndexNotReady> {
        if name == "Throwable" || name == "Exception" {
            return Ok(true);
        }
        Ok(self.is_subtype(name, "RuntimeException")? || self.is_subtype(name, "Error")?)
    }

    pub fn direct_inheritors(&mut self, id: ClassId) -> Result<Vec<ClassId>, IndexNotReady> {
        self.index.direct_inheritors(id)
    }
}
