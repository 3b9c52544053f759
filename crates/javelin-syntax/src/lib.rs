mod builder;
mod node;
mod span;
mod tree;
mod ty;

pub use builder::TreeBuilder;
pub use node::{
    AnnotationMemberDecl, ClassDecl, ClassKind, LiteralData, LiteralKind, MethodDecl, Modifiers,
    NodeData, ParamDecl, TypeRef, Visibility,
};
pub use span::TextRange;
pub use tree::{Ancestors, Node, NodeId, Preorder, SyntaxTree};
pub use ty::Ty;
