//! Descriptor stringifier
//!
//! Turns a descriptor graph into the canonical type string, in declaration
//! syntax: `*[]*pkg.T`, `map[string]int`, `chan<- int`,
//! `func(int, ...string) (bool, error)`, `struct { a int; pkg.Base }`.
//!
//! Named kinds are checked before structural kinds and are rendered from their
//! scope and name alone. A named node is never expanded, so the walk
//! terminates on self-referential graphs without tracking visited nodes:
//! every cycle in a well-formed registry passes through a named node.
//!
//! Disambiguator tokens of locally scoped named types are written only while
//! rendering inside a generic instantiation's type arguments, matching the
//! host's own naming of instantiations (`pkg.Gen[pkg.T·1]`).

use std::fmt;

use crate::descriptor::{FuncType, InterfaceMethod, StructField, TypeDescriptor, TypeId};
use crate::registry::TypeRegistry;
use crate::string_storage::StringId;

/// Canonical string of the unconstrained "any" type
pub const EMPTY_INTERFACE: &str = "interface {}";

/// Canonical type string of `type_id`
pub fn stringify(registry: &TypeRegistry, type_id: TypeId) -> String {
    Stringifier { registry }.render(type_id, false)
}

/// Canonical string of the underlying shape of a named descriptor
///
/// Nested named types inside the underlying shape stay opaque. Returns `None`
/// when `type_id` is not named or no underlying shape was attached.
pub fn underlying_string(registry: &TypeRegistry, type_id: TypeId) -> Option<String> {
    registry
        .underlying(type_id)
        .map(|underlying| stringify(registry, underlying))
}

/// `Display` adapter returned by [`TypeRegistry::display`]
#[derive(Clone, Copy)]
pub struct TypeDisplay<'a> {
    registry: &'a TypeRegistry,
    type_id: TypeId,
}

impl<'a> TypeDisplay<'a> {
    pub(crate) fn new(registry: &'a TypeRegistry, type_id: TypeId) -> Self {
        TypeDisplay { registry, type_id }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify(self.registry, self.type_id))
    }
}

impl fmt::Debug for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.type_id.index(), self)
    }
}

struct Stringifier<'a> {
    registry: &'a TypeRegistry,
}

impl Stringifier<'_> {
    fn render(&self, type_id: TypeId, in_type_args: bool) -> String {
        match self.registry.get(type_id) {
            TypeDescriptor::Primitive(name) => self.text(*name).to_string(),
            TypeDescriptor::Named { scope, name, local } => {
                let mut out = self.qualified(*scope, *name);
                self.push_local(&mut out, *local, in_type_args);
                out
            }
            TypeDescriptor::Generic {
                scope,
                name,
                args,
                local,
            } => {
                let args: Vec<String> = args.iter().map(|&arg| self.render(arg, true)).collect();
                let mut out = format!("{}[{}]", self.qualified(*scope, *name), args.join(", "));
                self.push_local(&mut out, *local, in_type_args);
                out
            }
            TypeDescriptor::Pointer(elem) => format!("*{}", self.render(*elem, in_type_args)),
            TypeDescriptor::Slice(elem) => format!("[]{}", self.render(*elem, in_type_args)),
            TypeDescriptor::Array { len, elem } => {
                format!("[{}]{}", len, self.render(*elem, in_type_args))
            }
            TypeDescriptor::Map { key, value } => format!(
                "map[{}]{}",
                self.render(*key, in_type_args),
                self.render(*value, in_type_args)
            ),
            TypeDescriptor::Chan { dir, elem } => {
                format!("{} {}", dir.prefix(), self.render(*elem, in_type_args))
            }
            TypeDescriptor::Func(func) => self.func(func, in_type_args),
            TypeDescriptor::Struct(fields) => self.struct_body(fields, in_type_args),
            TypeDescriptor::Interface(methods) => self.interface_body(methods),
            TypeDescriptor::EmptyInterface => EMPTY_INTERFACE.to_string(),
            TypeDescriptor::Opaque(text) => self.text(*text).to_string(),
        }
    }

    fn text(&self, id: StringId) -> &str {
        self.registry.resolve_str(id)
    }

    fn qualified(&self, scope: StringId, name: StringId) -> String {
        let scope = self.text(scope);
        let name = self.text(name);
        if scope.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", scope, name)
        }
    }

    fn push_local(&self, out: &mut String, local: Option<StringId>, in_type_args: bool) {
        if let (Some(token), true) = (local, in_type_args) {
            out.push_str(self.text(token));
        }
    }

    fn func(&self, func: &FuncType, in_type_args: bool) -> String {
        let mut params: Vec<String> = func
            .params
            .iter()
            .map(|&param| self.render(param, in_type_args))
            .collect();

        // last param already holds the element type
        if func.variadic {
            if let Some(last) = params.last_mut() {
                last.insert_str(0, "...");
            }
        }

        let params = params.join(", ");
        match func.results.as_slice() {
            [] => format!("func({})", params),
            [result] => format!("func({}) {}", params, self.render(*result, in_type_args)),
            results => {
                let results: Vec<String> = results
                    .iter()
                    .map(|&result| self.render(result, in_type_args))
                    .collect();
                format!("func({}) ({})", params, results.join(", "))
            }
        }
    }

    fn struct_body(&self, fields: &[StructField], in_type_args: bool) -> String {
        if fields.is_empty() {
            return "struct {}".to_string();
        }

        let fields: Vec<String> = fields
            .iter()
            .map(|field| match field.name {
                Some(name) => format!("{} {}", self.text(name), self.render(field.ty, in_type_args)),
                None => self.render(field.ty, in_type_args),
            })
            .collect();
        format!("struct {{ {} }}", fields.join("; "))
    }

    fn interface_body(&self, methods: &[InterfaceMethod]) -> String {
        if methods.is_empty() {
            return EMPTY_INTERFACE.to_string();
        }

        let methods: Vec<String> = methods
            .iter()
            .map(|method| format!("{}{}", self.text(method.name), self.text(method.signature)))
            .collect();
        format!("interface {{ {} }}", methods.join("; "))
    }
}
