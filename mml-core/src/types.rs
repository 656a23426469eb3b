//! Core type system for MML.
//!
//! The language only knows three value types. `Unknown` is not a real
//! type: the checker assigns it to expressions whose error has already
//! been reported so that a single mistake does not cascade.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Type {
    Int,
    Float,
    Vec,
    #[default]
    Unknown,
}

impl Type {
    /// Int and Float are scalars.
    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_vec(self) -> bool {
        matches!(self, Type::Vec)
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Type::Unknown)
    }

    /// The name used for this type in MML source and in messages.
    pub fn name(self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Vec => "vec",
            Type::Unknown => "unknown",
        }
    }

    /// The C++ type a declaration of this type lowers to.
    pub fn cpp_name(self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Vec => "Vec",
            Type::Unknown => "auto",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
