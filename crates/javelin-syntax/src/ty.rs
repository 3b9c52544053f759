use std::fmt;

/// A semantic type as produced by the external inference subsystem.
///
/// The checker never computes these itself; they arrive through the
/// resolution interface and absent types make type-dependent checks abstain.
#[derive(Debug, Clone, PartialEq)]
pub enum Ty {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Void,
    Null,
    Class { name: String, args: Vec<Ty> },
    Array(Box<Ty>),
    Error,
}

impl Ty {
    pub fn class(name: impl Into<String>) -> Ty {
        Ty::Class {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn array(elem: Ty) -> Ty {
        Ty::Array(Box::new(elem))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Ty::Boolean)
    }

    /// Usable as an array index after unary numeric promotion.
    pub fn is_int_convertible(&self) -> bool {
        matches!(self, Ty::Byte | Ty::Short | Ty::Char | Ty::Int)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Ty::Boolean
                | Ty::Byte
                | Ty::Short
                | Ty::Char
                | Ty::Int
                | Ty::Long
                | Ty::Float
                | Ty::Double
        )
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            Ty::Class { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Boolean => write!(f, "boolean"),
            Ty::Byte => write!(f, "byte"),
            Ty::Short => write!(f, "short"),
            Ty::Char => write!(f, "char"),
            Ty::Int => write!(f, "int"),
            Ty::Long => write!(f, "long"),
            Ty::Float => write!(f, "float"),
            Ty::Double => write!(f, "double"),
            Ty::Void => write!(f, "void"),
            Ty::Null => write!(f, "null"),
            Ty::Class { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (index, arg) in args.iter().enumerate() {
                        if index > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Ty::Array(elem) => write!(f, "{elem}[]"),
            Ty::Error => write!(f, "<error>"),
        }
    }
}
