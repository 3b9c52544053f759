use crate::span::TextRange;

/// A syntactic type reference as written in source.
///
/// `args` distinguishes three spellings: `None` is a raw reference
/// (`List`), `Some(vec![])` is the diamond (`List<>`), and a non-empty
/// `Some` carries the written arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: String,
    pub args: Option<Vec<TypeRef>>,
    pub dims: u8,
    pub range: TextRange,
}

impl TypeRef {
    pub fn new(name: impl Into<String>, range: TextRange) -> Self {
        TypeRef {
            name: name.into(),
            args: None,
            dims: 0,
            range,
        }
    }

    pub fn with_args(mut self, args: Vec<TypeRef>) -> Self {
        self.args = Some(args);
        self
    }

    pub fn diamond(mut self) -> Self {
        self.args = Some(Vec::new());
        self
    }

    pub fn array(mut self, dims: u8) -> Self {
        self.dims = dims;
        self
    }

    pub fn is_raw(&self) -> bool {
        self.args.is_none()
    }

    pub fn is_diamond(&self) -> bool {
        matches!(&self.args, Some(args) if args.is_empty())
    }

    /// Erased spelling used for signature comparison: type arguments are
    /// dropped, array dimensions kept.
    pub fn erased(&self) -> String {
        let mut out = self.name.clone();
        for _ in 0..self.dims {
            out.push_str("[]");
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl ClassKind {
    pub fn is_interface_like(self) -> bool {
        matches!(self, ClassKind::Interface | ClassKind::Annotation)
    }

    pub fn display(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Record => "record",
            ClassKind::Annotation => "annotation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Visibility {
    Private,
    PackagePrivate,
    Protected,
    Public,
}

impl Visibility {
    pub fn display(self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::PackagePrivate => "package-private",
            Visibility::Protected => "protected",
            Visibility::Public => "public",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_static: bool,
    pub is_default: bool,
    pub is_sealed: bool,
    pub is_non_sealed: bool,
}

impl Default for Modifiers {
    fn default() -> Self {
        Modifiers {
            visibility: Visibility::PackagePrivate,
            is_abstract: false,
            is_final: false,
            is_static: false,
            is_default: false,
            is_sealed: false,
            is_non_sealed: false,
        }
    }
}

impl Modifiers {
    pub fn public() -> Self {
        Modifiers {
            visibility: Visibility::Public,
            ..Modifiers::default()
        }
    }

    /// sealed subtypes must pick exactly one of these.
    pub fn closes_sealed_hierarchy(&self) -> bool {
        self.is_final || self.is_sealed || self.is_non_sealed
    }
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub name_range: TextRange,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    pub extends: Vec<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub permits: Vec<TypeRef>,
    pub is_anonymous: bool,
    pub is_local: bool,
    pub is_inner: bool,
    /// Range of the record component list; `None` on a record means the
    /// header is missing entirely.
    pub record_header: Option<TextRange>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, kind: ClassKind, name_range: TextRange) -> Self {
        ClassDecl {
            name: name.into(),
            name_range,
            kind,
            modifiers: Modifiers::default(),
            extends: Vec::new(),
            implements: Vec::new(),
            permits: Vec::new(),
            is_anonymous: false,
            is_local: false,
            is_inner: false,
            record_header: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeRef,
    pub is_varargs: bool,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub name_range: TextRange,
    pub modifiers: Modifiers,
    pub is_constructor: bool,
    /// Compact record constructor: canonical, with the parameter list elided.
    pub is_compact_constructor: bool,
    pub return_type: Option<TypeRef>,
    pub params: Vec<ParamDecl>,
    pub throws: Vec<TypeRef>,
    pub type_params: Vec<String>,
    pub has_body: bool,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, name_range: TextRange) -> Self {
        MethodDecl {
            name: name.into(),
            name_range,
            modifiers: Modifiers::default(),
            is_constructor: false,
            is_compact_constructor: false,
            return_type: None,
            params: Vec::new(),
            throws: Vec::new(),
            type_params: Vec::new(),
            has_body: true,
        }
    }

    pub fn erased_params(&self) -> Vec<String> {
        self.params.iter().map(|p| p.ty.erased()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct AnnotationMemberDecl {
    pub name: String,
    pub name_range: TextRange,
    pub return_type: TypeRef,
    pub has_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    TextBlock,
    Bool,
    Null,
}

#[derive(Debug, Clone)]
pub struct LiteralData {
    pub kind: LiteralKind,
    /// Raw lexeme, quotes and suffixes included.
    pub text: String,
}

/// Kind-specific payload of one tree node. Children live on the node
/// itself, in document order; payloads hold only lexical attributes.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// One source file. `name` is the file name without extension.
    File { name: String },
    Class(ClassDecl),
    EnumConstant { name: String, has_body: bool },
    Field {
        name: String,
        ty: TypeRef,
        modifiers: Modifiers,
    },
    Initializer { is_static: bool },
    Method(MethodDecl),
    AnnotationMember(AnnotationMemberDecl),
    ReceiverParameter {
        ty: TypeRef,
        qualifier: Option<String>,
    },
    TypeParameterList,
    TypeParameter {
        name: String,
        bounds: Vec<TypeRef>,
    },
    RecordComponent { name: String, ty: TypeRef },
    /// An explicit type reference written in source (variable types,
    /// casts, import targets); anchors raw-type diagnostics.
    TypeNode { ty: TypeRef },
    Annotation { name: TypeRef },
    NameValuePair {
        name: Option<String>,
        name_range: TextRange,
    },
    AnnotationArrayInit,
    StaticImport { class: TypeRef, member: String },

    // Statements.
    Block,
    Try,
    Resource,
    Catch {
        param_name: String,
        /// One entry per multi-catch disjunct.
        types: Vec<TypeRef>,
    },
    Labeled {
        label: String,
        label_range: TextRange,
    },
    If,
    While,
    DoWhile,
    For,
    ForEach { param: ParamDecl },
    Switch {
        /// At least one case label is a type or record pattern.
        has_patterns: bool,
    },
    Assert,
    Throw,

    // Expressions.
    Conditional,
    Call {
        name: String,
        name_range: TextRange,
    },
    MethodRef {
        qualifier: TypeRef,
        name: String,
        is_constructor: bool,
    },
    New {
        ty: TypeRef,
        /// The expression carries an anonymous class body (a `Class`
        /// child marked anonymous).
        has_anonymous_body: bool,
        /// `outer.new Inner(..)`: enclosing instance supplied.
        qualified: bool,
    },
    ArrayAccess,
    NameRef { name: String },
    Literal(LiteralData),

    // Trivia the checker still inspects.
    Comment { text: String, is_doc: bool },
    /// String-template / interpolation fragment.
    Fragment { text: String },
}

impl NodeData {
    /// A statement a label may legally be attached to.
    pub fn is_labelable(&self) -> bool {
        matches!(
            self,
            NodeData::While
                | NodeData::DoWhile
                | NodeData::For
                | NodeData::ForEach { .. }
                | NodeData::Switch { .. }
                | NodeData::Block
                | NodeData::Labeled { .. }
        )
    }
}
