//! Type descriptor representation
//!
//! A [`TypeDescriptor`] is the structural description of one type as the
//! host's introspection facility reports it. Descriptors never own their
//! children: every child is a [`TypeId`] into the [`TypeRegistry`] that owns
//! the descriptor, which is what lets a named struct refer back to itself.
//!
//! # Kinds
//!
//! - Named kinds: [`TypeDescriptor::Primitive`], [`TypeDescriptor::Named`],
//!   [`TypeDescriptor::Generic`]. These are rendered from their name alone.
//! - Structural kinds: pointers, slices, arrays, maps, channels, functions,
//!   structs and interfaces. These are always expanded.
//! - Sentinels: [`TypeDescriptor::EmptyInterface`] and
//!   [`TypeDescriptor::Opaque`].
//!
//! [`TypeRegistry`]: crate::registry::TypeRegistry

use bitflags::bitflags;

use crate::string_storage::StringId;

// ========== TypeId ==========

/// Opaque handle to a descriptor in a [`TypeRegistry`](crate::registry::TypeRegistry)
///
/// Handles are only meaningful for the registry that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    /// Creates a new TypeId (internal use only)
    pub(crate) fn new(id: usize) -> Self {
        TypeId(id)
    }

    /// Gets the raw index (for debugging)
    pub fn index(&self) -> usize {
        self.0
    }
}

// ========== Channel direction ==========

bitflags! {
    /// Direction of a channel type
    ///
    /// Bit values follow the host convention: receive is 1, send is 2 and a
    /// bidirectional channel carries both bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChanDir: u8 {
        /// `<-chan T`
        const RECV = 0b01;
        /// `chan<- T`
        const SEND = 0b10;
        /// `chan T`
        const BOTH = Self::RECV.bits() | Self::SEND.bits();
    }
}

impl ChanDir {
    /// Keyword prefix written before the element type
    pub fn prefix(self) -> &'static str {
        if self == ChanDir::RECV {
            "<-chan"
        } else if self == ChanDir::SEND {
            "chan<-"
        } else {
            "chan"
        }
    }
}

// ========== Composite records ==========

/// Field of an anonymous struct
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructField {
    /// Field name, `None` for an embedded member
    pub name: Option<StringId>,
    /// Field type
    pub ty: TypeId,
}

impl StructField {
    pub fn named(name: StringId, ty: TypeId) -> Self {
        StructField { name: Some(name), ty }
    }

    pub fn embedded(ty: TypeId) -> Self {
        StructField { name: None, ty }
    }
}

/// Method of an anonymous interface
///
/// The signature is kept as text (e.g. `"() string"`), the host already
/// formats it and it is written right after the method name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceMethod {
    pub name: StringId,
    pub signature: StringId,
}

/// Function signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuncType {
    /// Parameters in declaration order
    ///
    /// When `variadic` is set the last entry is already the element type of
    /// the repeated parameter, not a slice of it.
    pub params: Vec<TypeId>,
    /// Whether the last parameter is variadic
    pub variadic: bool,
    /// Results in declaration order
    pub results: Vec<TypeId>,
}

// ========== TypeDescriptor ==========

/// Structural description of a type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// Built-in type with no defining scope (`int`, `string`, `error`)
    Primitive(StringId),
    /// Type declared with an identifier in some scope
    ///
    /// The underlying descriptor lives in the registry's side table and is
    /// never part of the identity of a named type.
    Named {
        scope: StringId,
        name: StringId,
        /// Host-supplied disambiguator for locally scoped declarations
        local: Option<StringId>,
    },
    /// Instantiation of a generic named type
    Generic {
        scope: StringId,
        name: StringId,
        args: Vec<TypeId>,
        local: Option<StringId>,
    },
    /// `*T`
    Pointer(TypeId),
    /// `[]T`
    Slice(TypeId),
    /// `[N]T`
    Array { len: u64, elem: TypeId },
    /// `map[K]V`
    Map { key: TypeId, value: TypeId },
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan { dir: ChanDir, elem: TypeId },
    /// `func(params) results`
    Func(FuncType),
    /// Anonymous struct
    Struct(Vec<StructField>),
    /// Anonymous interface with at least one method
    Interface(Vec<InterfaceMethod>),
    /// Unconstrained "any" type
    EmptyInterface,
    /// Kind the stringifier does not model, carried in the host's own textual form
    Opaque(StringId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string_storage::StringStorage;

    #[test]
    fn test_chan_dir_prefixes() {
        assert_eq!(ChanDir::BOTH.prefix(), "chan");
        assert_eq!(ChanDir::RECV.prefix(), "<-chan");
        assert_eq!(ChanDir::SEND.prefix(), "chan<-");
        assert_eq!(ChanDir::RECV | ChanDir::SEND, ChanDir::BOTH);
    }

    #[test]
    fn test_struct_field_constructors() {
        let mut strings = StringStorage::new();
        let name = strings.intern("next");

        assert_eq!(StructField::embedded(TypeId::new(0)).name, None);
        assert_eq!(StructField::named(name, TypeId::new(0)).name, Some(name));
    }
}
