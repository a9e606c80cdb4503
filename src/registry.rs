//! Descriptor registry
//!
//! The registry owns every [`TypeDescriptor`] of a graph and hands out
//! [`TypeId`] handles. Anonymous descriptors are interned structurally, so two
//! requests for `[]*int` return the same handle. Named descriptors are
//! interned by identity (scope, name, disambiguator) and receive their
//! underlying type afterwards through [`TypeRegistry::set_underlying`]; this
//! two-step construction is how self-referential named types are built.
//!
//! # Example
//!
//! ```
//! use typestring::registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::new();
//! let node = registry.named("example.com/list", "Node");
//! let next = registry.pointer(node);
//! let body = registry.struct_type(&[(Some("next"), next)]);
//! assert!(registry.set_underlying(node, body));
//!
//! assert_eq!(registry.display(next).to_string(), "*example.com/list.Node");
//! ```

use std::collections::HashMap;

use crate::descriptor::{ChanDir, FuncType, InterfaceMethod, StructField, TypeDescriptor, TypeId};
use crate::stringify::TypeDisplay;
use crate::string_storage::{StringId, StringStorage};

/// Arena of interned type descriptors
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    /// Storage: TypeId -> TypeDescriptor
    types: Vec<TypeDescriptor>,
    /// Interning cache: TypeDescriptor -> TypeId
    cache: HashMap<TypeDescriptor, TypeId>,
    /// Underlying shape of named descriptors
    underlying: HashMap<TypeId, TypeId>,
    strings: StringStorage,
}

impl TypeRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a descriptor, returning its TypeId
    ///
    /// If an identical descriptor already exists, returns the existing TypeId.
    pub fn intern(&mut self, descriptor: TypeDescriptor) -> TypeId {
        if let Some(&type_id) = self.cache.get(&descriptor) {
            return type_id;
        }

        let type_id = TypeId::new(self.types.len());
        log::trace!("interned {:?} as #{}", descriptor, type_id.index());
        self.types.push(descriptor.clone());
        self.cache.insert(descriptor, type_id);
        type_id
    }

    /// Gets descriptor by ID
    ///
    /// # Panics
    ///
    /// Panics if the TypeId was produced by another registry and is out of
    /// range for this one.
    pub fn get(&self, type_id: TypeId) -> &TypeDescriptor {
        &self.types[type_id.index()]
    }

    /// Returns the number of unique descriptors in the registry
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Checks if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over every descriptor with its handle, in interning order
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDescriptor)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, descriptor)| (TypeId::new(index), descriptor))
    }

    pub fn strings(&self) -> &StringStorage {
        &self.strings
    }

    /// Resolves an interned name, scope or signature
    pub fn resolve_str(&self, id: StringId) -> &str {
        self.strings.resolve(id)
    }

    /// Returns a value whose `Display` output is the canonical type string
    pub fn display(&self, type_id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay::new(self, type_id)
    }

    // ========== Named kinds ==========

    /// Built-in type such as `int`, `string` or `error`
    pub fn primitive(&mut self, name: &str) -> TypeId {
        let name = self.strings.intern(name);
        self.intern(TypeDescriptor::Primitive(name))
    }

    /// Named type declared at module scope
    pub fn named(&mut self, scope: &str, name: &str) -> TypeId {
        self.named_with(scope, name, None)
    }

    /// Named type declared inside a function or block, with the host's disambiguator
    pub fn local_named(&mut self, scope: &str, name: &str, token: &str) -> TypeId {
        self.named_with(scope, name, Some(token))
    }

    fn named_with(&mut self, scope: &str, name: &str, token: Option<&str>) -> TypeId {
        let scope = self.strings.intern(scope);
        let name = self.strings.intern(name);
        let local = token.map(|t| self.strings.intern(t));
        self.intern(TypeDescriptor::Named { scope, name, local })
    }

    /// Instantiation of a generic type declared at module scope
    pub fn generic(&mut self, scope: &str, name: &str, args: Vec<TypeId>) -> TypeId {
        self.generic_with(scope, name, args, None)
    }

    /// Instantiation of a generic type declared inside a function or block
    pub fn local_generic(&mut self, scope: &str, name: &str, args: Vec<TypeId>, token: &str) -> TypeId {
        self.generic_with(scope, name, args, Some(token))
    }

    fn generic_with(
        &mut self,
        scope: &str,
        name: &str,
        args: Vec<TypeId>,
        token: Option<&str>,
    ) -> TypeId {
        let scope = self.strings.intern(scope);
        let name = self.strings.intern(name);
        let local = token.map(|t| self.strings.intern(t));
        self.intern(TypeDescriptor::Generic {
            scope,
            name,
            args,
            local,
        })
    }

    /// Attaches the underlying shape of a named descriptor
    ///
    /// Returns true if attached (or already attached to the same shape),
    /// false if `named` is not a named kind or already has a different
    /// underlying type.
    pub fn set_underlying(&mut self, named: TypeId, underlying: TypeId) -> bool {
        if !matches!(
            self.get(named),
            TypeDescriptor::Named { .. } | TypeDescriptor::Generic { .. }
        ) {
            return false;
        }

        match self.underlying.get(&named) {
            Some(&existing) => existing == underlying,
            None => {
                self.underlying.insert(named, underlying);
                true
            }
        }
    }

    /// Underlying shape of a named descriptor, if one was attached
    pub fn underlying(&self, named: TypeId) -> Option<TypeId> {
        self.underlying.get(&named).copied()
    }

    // ========== Structural kinds ==========

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.intern(TypeDescriptor::Pointer(elem))
    }

    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.intern(TypeDescriptor::Slice(elem))
    }

    pub fn array(&mut self, len: u64, elem: TypeId) -> TypeId {
        self.intern(TypeDescriptor::Array { len, elem })
    }

    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeDescriptor::Map { key, value })
    }

    pub fn chan(&mut self, dir: ChanDir, elem: TypeId) -> TypeId {
        self.intern(TypeDescriptor::Chan { dir, elem })
    }

    /// Function type
    ///
    /// With `variadic` set, the last entry of `params` is the element type of
    /// the repeated parameter.
    pub fn func(&mut self, params: Vec<TypeId>, variadic: bool, results: Vec<TypeId>) -> TypeId {
        debug_assert!(!variadic || !params.is_empty(), "variadic function without parameters");
        self.intern(TypeDescriptor::Func(FuncType {
            params,
            variadic,
            results,
        }))
    }

    /// Anonymous struct; a `None` or empty name marks an embedded field
    pub fn struct_type(&mut self, fields: &[(Option<&str>, TypeId)]) -> TypeId {
        let fields = fields
            .iter()
            .map(|&(name, ty)| match name {
                Some(name) if !name.is_empty() => StructField::named(self.strings.intern(name), ty),
                _ => StructField::embedded(ty),
            })
            .collect();
        self.intern(TypeDescriptor::Struct(fields))
    }

    /// Anonymous interface from `(method name, signature)` pairs
    ///
    /// An interface without methods is the empty interface.
    pub fn interface(&mut self, methods: &[(&str, &str)]) -> TypeId {
        if methods.is_empty() {
            return self.empty_interface();
        }

        let methods = methods
            .iter()
            .map(|&(name, signature)| InterfaceMethod {
                name: self.strings.intern(name),
                signature: self.strings.intern(signature),
            })
            .collect();
        self.intern(TypeDescriptor::Interface(methods))
    }

    pub fn empty_interface(&mut self) -> TypeId {
        self.intern(TypeDescriptor::EmptyInterface)
    }

    /// Kind carried in the host's own textual form
    pub fn opaque(&mut self, text: &str) -> TypeId {
        let text = self.strings.intern(text);
        self.intern(TypeDescriptor::Opaque(text))
    }
}
