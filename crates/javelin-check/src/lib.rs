//! Single-pass semantic error checking over a parsed source tree.
//!
//! One call to [`check_file`] performs exactly one pre-order walk. Checks
//! run per node in a fixed order behind a short-circuit flag, so each
//! node reports at most one error and cheaper structural findings mask
//! later resolution-dependent ones. All symbol and type information comes
//! in through [`SymbolIndex`]; an index that is not ready defers the
//! affected checks silently instead of failing them.

mod checkers;
mod context;
mod diagnostics;
mod feature;
mod resolve;
mod visitor;

pub use context::{CheckContext, ModuleContext, ThrownSet};
pub use diagnostics::{Diagnostic, ErrorCategory, ErrorPayload};
pub use feature::{Feature, LanguageVersion, SdkVersion};
pub use resolve::{
    ClassId, ClassSymbol, IndexNotReady, MethodSym, ResolveOutcome, ResolverAdapter, SymbolIndex,
    SymbolRef, TypeOutcome,
};

use javelin_syntax::SyntaxTree;

/// Walk configuration. An explicit language version wins; otherwise the
/// SDK's version applies, and failing both, the latest supported one.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub version: Option<LanguageVersion>,
    pub sdk: Option<SdkVersion>,
    pub module: Option<ModuleContext>,
}

impl CheckOptions {
    pub fn effective_version(&self) -> LanguageVersion {
        self.version
            .or_else(|| self.sdk.map(SdkVersion::language_version))
            .unwrap_or(LanguageVersion::LATEST)
    }
}

/// Check one file, streaming diagnostics into `sink` in walk order.
///
/// Walk state (short-circuit flag, resolution caches, try-block exception
/// inventories) lives and dies with this call; nothing is shared between
/// walks.
pub fn check_file(
    tree: &SyntaxTree,
    index: &dyn SymbolIndex,
    options: &CheckOptions,
    sink: &mut dyn FnMut(Diagnostic),
) {
    let resolver = ResolverAdapter::new(index);
    let mut ctx = CheckContext::new(
        tree,
        options.effective_version(),
        options.module.as_ref(),
        resolver,
        sink,
    );
    visitor::run(&mut ctx);
}

/// Convenience wrapper collecting the diagnostics of one walk.
pub fn collect_diagnostics(
    tree: &SyntaxTree,
    index: &dyn SymbolIndex,
    options: &CheckOptions,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    check_file(tree, index, options, &mut |diagnostic| {
        out.push(diagnostic)
    });
    out
}
