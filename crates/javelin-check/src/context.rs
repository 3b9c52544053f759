use rustc_hash::FxHashMap;

use javelin_syntax::{ClassDecl, NodeData, NodeId, SyntaxTree};

use crate::diagnostics::{Diagnostic, ErrorCategory, ErrorPayload};
use crate::feature::{Feature, LanguageVersion};
use crate::resolve::{ClassId, ResolveOutcome, ResolverAdapter, SymbolRef};

/// Module the checked file belongs to, when any. Presence disables the
/// static-import supertype-accessibility checks.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    pub name: String,
}

/// Exception inventory of one try statement: everything thrown by the try
/// body and the resource initializers, unioned. Computed once per try and
/// reused for every catch clause.
#[derive(Debug, Clone, Default)]
pub struct ThrownSet {
    pub types: Vec<String>,
    /// A call inside the inventory failed to resolve; partial information
    /// produces false positives, so the whole construct is abandoned.
    pub has_unresolved: bool,
}

/// State of one tree walk: the per-node short-circuit flag, the resolver
/// cache and the try-block exception inventory. Created when a walk
/// starts, discarded when it ends, never shared between walks.
pub struct CheckContext<'a> {
    pub tree: &'a SyntaxTree,
    pub version: LanguageVersion,
    pub module: Option<&'a ModuleContext>,
    pub resolver: ResolverAdapter<'a>,
    pub(crate) thrown_cache: FxHashMap<NodeId, ThrownSet>,
    sink: &'a mut dyn FnMut(Diagnostic),
    has_error: bool,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        tree: &'a SyntaxTree,
        version: LanguageVersion,
        module: Option<&'a ModuleContext>,
        resolver: ResolverAdapter<'a>,
        sink: &'a mut dyn FnMut(Diagnostic),
    ) -> Self {
        CheckContext {
            tree,
            version,
            module,
            resolver,
            thrown_cache: FxHashMap::default(),
            sink,
            has_error: false,
        }
    }

    /// Emit one diagnostic and flip the per-node flag. The only write path
    /// to the sink.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        (self.sink)(diagnostic);
        self.has_error = true;
    }

    /// True once any checker flagged the node currently being visited.
    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// Driver-only: reset on entering each node so flag state never leaks
    /// across siblings.
    pub(crate) fn enter_node(&mut self) {
        self.has_error = false;
    }

    pub fn is_sufficient(&self, feature: Feature) -> bool {
        feature.is_sufficient(self.version)
    }

    /// Report `UNSUPPORTED_FEATURE` at `node` unless the active version
    /// permits `feature`. Callers sequence this before shape-validating
    /// gated syntax and skip further checks on failure.
    pub fn check_feature(&mut self, node: NodeId, feature: Feature) {
        if !self.is_sufficient(feature) {
            let message = format!(
                "{} are not supported at language version {:?}",
                feature.display(),
                self.version
            );
            self.report(
                Diagnostic::new(
                    ErrorCategory::UnsupportedFeature,
                    "feature.unsupported",
                    self.tree.range(node),
                    message,
                )
                .with_payload(ErrorPayload::Feature { feature }),
            );
        }
    }

    // ------------------------------------------------------------------
    // Tree helpers shared by the checkers.
    // ------------------------------------------------------------------

    pub fn enclosing_class(&self, node: NodeId) -> Option<NodeId> {
        self.tree
            .ancestors(node)
            .find(|&up| matches!(self.tree.data(up), NodeData::Class(_)))
    }

    pub fn enclosing_method(&self, node: NodeId) -> Option<NodeId> {
        self.tree
            .ancestors(node)
            .find(|&up| matches!(self.tree.data(up), NodeData::Method(_)))
    }

    pub fn class_decl(&self, node: NodeId) -> Option<&'a ClassDecl> {
        match self.tree.data(node) {
            NodeData::Class(decl) => Some(decl),
            _ => None,
        }
    }

    /// Symbol for the class declaration node, resolved through the
    /// adapter. `None` covers both unresolved and deferred; callers that
    /// need to distinguish go through the resolver directly.
    pub fn class_symbol_for(&mut self, class_node: NodeId) -> Option<ClassId> {
        let name = self.class_decl(class_node)?.name.clone();
        self.resolver.class_for_decl(class_node, &name).ok()?
    }

    /// True when `node` sits in a static context: a static method, a
    /// static initializer or a static field's initializer.
    pub fn in_static_context(&self, node: NodeId) -> bool {
        for up in self.tree.ancestors(node) {
            match self.tree.data(up) {
                NodeData::Method(method) => return method.modifiers.is_static,
                NodeData::Initializer { is_static } => return *is_static,
                NodeData::Field { modifiers, .. } => return modifiers.is_static,
                NodeData::Class(_) => return false,
                _ => {}
            }
        }
        false
    }

    /// Resolution outcome of a class-typed reference, ambiguity collapsed
    /// to "effectively absent" for structural checks.
    pub fn resolved_class(&mut self, name: &str) -> ResolveOutcome {
        self.resolver.resolve_class(name)
    }

    pub fn class_of(&mut self, symbol: SymbolRef) -> Option<ClassId> {
        match symbol {
            SymbolRef::Class(id) => Some(id),
            SymbolRef::Method { .. } => None,
        }
    }
}
