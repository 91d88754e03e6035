//! Key kinds and key eligibility
//!
//! A key kind is accepted only when values of that kind have a stable
//! equality and a stable hash. Fixed-size composites inherit eligibility
//! from their elements.

pub mod parser;

use std::fmt;

use serde::Serialize;
use tracing::debug;

pub use parser::parse_key_kind;

/// Scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Int,
    Uint,
    Float,
    Bool,
    Char,
    #[serde(rename = "string")]
    Str,
}

impl Primitive {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" | "i8" | "i16" | "i32" | "i64" | "isize" => Some(Primitive::Int),
            "uint" | "u8" | "u16" | "u32" | "u64" | "usize" => Some(Primitive::Uint),
            "float" | "f32" | "f64" => Some(Primitive::Float),
            "bool" => Some(Primitive::Bool),
            "char" | "rune" => Some(Primitive::Char),
            "string" | "str" => Some(Primitive::Str),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Uint => "uint",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::Str => "string",
        }
    }
}

/// A candidate key type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Primitive(Primitive),
    /// Fixed-length array, `[T; N]`
    FixedArray { element: Box<KeyKind>, len: usize },
    /// Fixed-arity tuple or record, `(T, U)`
    Tuple(Vec<KeyKind>),
    /// Growable sequence, `[T]`
    Sequence(Box<KeyKind>),
    /// Another mapping, `map<K, V>`
    Mapping { key: Box<KeyKind>, value: Box<KeyKind> },
    /// Mutable set, `set<T>`
    Set(Box<KeyKind>),
    /// Handle compared by identity, `&T`
    Reference(Box<KeyKind>),
    /// Function value
    Function,
}

/// Structural class of a key kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KindClass {
    Primitive,
    CompositeFixedSize,
    CompositeVariableSize,
    ReferenceType,
    Function,
}

impl KindClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            KindClass::Primitive => "primitive",
            KindClass::CompositeFixedSize => "composite-fixed-size",
            KindClass::CompositeVariableSize => "composite-variable-size",
            KindClass::ReferenceType => "reference-type",
            KindClass::Function => "function",
        }
    }
}

/// Why a key kind was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    /// Mutable or identity-bearing composite with no stable hash
    Unhashable,
    /// No stable equality can be defined at all
    StructurallyInvalid,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::Unhashable => "unhashable",
            RejectReason::StructurallyInvalid => "structurally-invalid",
        }
    }
}

/// Outcome of a key eligibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum Eligibility {
    Accepted,
    Rejected(RejectReason),
}

impl Eligibility {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Eligibility::Accepted)
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Eligibility::Accepted => write!(f, "accepted"),
            Eligibility::Rejected(reason) => write!(f, "rejected:{}", reason.code()),
        }
    }
}

impl KeyKind {
    pub fn class(&self) -> KindClass {
        match self {
            KeyKind::Primitive(_) => KindClass::Primitive,
            KeyKind::FixedArray { .. } | KeyKind::Tuple(_) => KindClass::CompositeFixedSize,
            KeyKind::Sequence(_) | KeyKind::Mapping { .. } | KeyKind::Set(_) => {
                KindClass::CompositeVariableSize
            }
            KeyKind::Reference(_) => KindClass::ReferenceType,
            KeyKind::Function => KindClass::Function,
        }
    }

    /// Decide whether this kind may be used as a key.
    ///
    /// A fixed-size composite is rejected with the reason of its first
    /// ineligible element.
    pub fn eligibility(&self) -> Eligibility {
        let verdict = match self {
            KeyKind::Primitive(_) => Eligibility::Accepted,
            KeyKind::FixedArray { element, .. } => element.eligibility(),
            KeyKind::Tuple(fields) => fields
                .iter()
                .map(KeyKind::eligibility)
                .find(|e| !e.is_accepted())
                .unwrap_or(Eligibility::Accepted),
            KeyKind::Sequence(_) | KeyKind::Mapping { .. } | KeyKind::Set(_) => {
                Eligibility::Rejected(RejectReason::Unhashable)
            }
            // Identity of the referent is not a value; see DESIGN.md.
            KeyKind::Reference(_) => Eligibility::Rejected(RejectReason::Unhashable),
            KeyKind::Function => Eligibility::Rejected(RejectReason::StructurallyInvalid),
        };
        debug!(kind = %self, class = self.class().as_str(), %verdict, "key eligibility");
        verdict
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeyKind::Primitive(p) => write!(f, "{}", p.name()),
            KeyKind::FixedArray { element, len } => write!(f, "[{}; {}]", element, len),
            KeyKind::Tuple(fields) => {
                write!(f, "(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                if fields.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            KeyKind::Sequence(element) => write!(f, "[{}]", element),
            KeyKind::Mapping { key, value } => write!(f, "map<{}, {}>", key, value),
            KeyKind::Set(element) => write!(f, "set<{}>", element),
            KeyKind::Reference(inner) => write!(f, "&{}", inner),
            KeyKind::Function => write!(f, "fn"),
        }
    }
}

impl std::str::FromStr for KeyKind {
    type Err = crate::error_codes::ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_kind(s)
    }
}
