use std::collections::{BTreeMap, HashMap, HashSet};

use super::{Document, DocumentError, TypeEntry};
use crate::descriptor::TypeId;
use crate::limits::LoaderLimits;
use crate::registry::TypeRegistry;
use crate::stringify::{stringify, underlying_string};

/// Registry built from a document, addressable by document key
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    registry: TypeRegistry,
    ids: BTreeMap<String, TypeId>,
    roots: Vec<String>,
}

impl LoadedDocument {
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Handle of a document key
    pub fn get(&self, key: &str) -> Option<TypeId> {
        self.ids.get(key).copied()
    }

    /// Keys rendered by default, in output order
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Number of document entries
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Type string of a document key
    pub fn render(&self, key: &str) -> Option<String> {
        self.get(key).map(|id| stringify(&self.registry, id))
    }

    /// Underlying type string of a named document key
    pub fn render_underlying(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(|id| underlying_string(&self.registry, id))
    }
}

pub(super) fn load(document: &Document, limits: &LoaderLimits) -> Result<LoadedDocument, DocumentError> {
    check_entries(document, limits)?;

    let mut builder = Builder {
        document,
        limits,
        registry: TypeRegistry::new(),
        built: HashMap::new(),
        in_progress: HashSet::new(),
    };

    for key in document.types.keys() {
        builder.build(key, 0)?;
    }

    // Underlying types go in last: they may point back at the named type.
    for (key, entry) in &document.types {
        if let Some(underlying) = entry.underlying() {
            let named = builder.built[key.as_str()].0;
            let underlying = builder.built[underlying].0;
            if !builder.registry.set_underlying(named, underlying) {
                return Err(DocumentError::ConflictingDefinition { key: key.clone() });
            }
        }
    }

    let roots = if document.render.is_empty() {
        document.types.keys().cloned().collect()
    } else {
        for key in &document.render {
            if !document.types.contains_key(key) {
                return Err(DocumentError::UnknownRoot { key: key.clone() });
            }
        }
        document.render.clone()
    };

    let ids: BTreeMap<String, TypeId> = builder
        .built
        .iter()
        .map(|(key, (id, _))| (key.to_string(), *id))
        .collect();

    log::debug!(
        "loaded {} types into {} descriptors",
        ids.len(),
        builder.registry.len()
    );

    Ok(LoadedDocument {
        registry: builder.registry,
        ids,
        roots,
    })
}

/// Checks that need no graph walk
fn check_entries(document: &Document, limits: &LoaderLimits) -> Result<(), DocumentError> {
    for (key, entry) in &document.types {
        for identifier in entry.identifiers() {
            if identifier.len() > limits.max_identifier_length {
                return Err(DocumentError::IdentifierTooLong {
                    key: key.clone(),
                    length: identifier.len(),
                    limit: limits.max_identifier_length,
                });
            }
        }

        for reference in entry.references().into_iter().chain(entry.underlying()) {
            if !document.types.contains_key(reference) {
                return Err(DocumentError::unknown_reference(key, reference));
            }
        }

        match entry {
            TypeEntry::Primitive { name }
            | TypeEntry::Named { name, .. }
            | TypeEntry::Generic { name, .. }
                if name.is_empty() =>
            {
                return Err(DocumentError::EmptyName { key: key.clone() });
            }
            TypeEntry::Generic { args, .. } if args.is_empty() => {
                return Err(DocumentError::GenericWithoutArgs { key: key.clone() });
            }
            TypeEntry::Func {
                params,
                variadic: true,
                ..
            } if params.is_empty() => {
                return Err(DocumentError::VariadicWithoutParams { key: key.clone() });
            }
            _ => {}
        }
    }

    Ok(())
}

struct Builder<'a> {
    document: &'a Document,
    limits: &'a LoaderLimits,
    registry: TypeRegistry,
    /// key -> (handle, nesting height below the key)
    built: HashMap<&'a str, (TypeId, usize)>,
    in_progress: HashSet<&'a str>,
}

impl<'a> Builder<'a> {
    /// Builds `key` and everything it renders through, depth-first
    fn build(&mut self, key: &'a str, depth: usize) -> Result<(TypeId, usize), DocumentError> {
        if let Some(&built) = self.built.get(key) {
            return Ok(built);
        }

        if depth > self.limits.max_nesting_depth {
            return Err(self.too_deep(key));
        }

        if !self.in_progress.insert(key) {
            return Err(DocumentError::AnonymousCycle {
                key: key.to_string(),
            });
        }

        let document = self.document;
        let entry = &document.types[key];
        let mut children = Vec::new();
        let mut height = 0;
        for reference in entry.references() {
            let (id, child_height) = self.build(reference, depth + 1)?;
            children.push(id);
            height = height.max(child_height + 1);
        }

        if height > self.limits.max_nesting_depth {
            return Err(self.too_deep(key));
        }

        let id = self.intern(entry, &children);
        log::trace!("built '{}' as #{}", key, id.index());

        self.in_progress.remove(key);
        self.built.insert(key, (id, height));
        Ok((id, height))
    }

    /// Interns `entry` given the handles of its references, in `references()` order
    fn intern(&mut self, entry: &TypeEntry, children: &[TypeId]) -> TypeId {
        let registry = &mut self.registry;
        match entry {
            TypeEntry::Primitive { name } => registry.primitive(name),
            TypeEntry::Named {
                scope, name, local, ..
            } => match local {
                Some(token) => registry.local_named(scope, name, token),
                None => registry.named(scope, name),
            },
            TypeEntry::Generic {
                scope, name, local, ..
            } => match local {
                Some(token) => registry.local_generic(scope, name, children.to_vec(), token),
                None => registry.generic(scope, name, children.to_vec()),
            },
            TypeEntry::Pointer { .. } => registry.pointer(children[0]),
            TypeEntry::Slice { .. } => registry.slice(children[0]),
            TypeEntry::Array { len, .. } => registry.array(*len, children[0]),
            TypeEntry::Map { .. } => registry.map(children[0], children[1]),
            TypeEntry::Chan { dir, .. } => registry.chan((*dir).into(), children[0]),
            TypeEntry::Func {
                params, variadic, ..
            } => {
                let (params, results) = children.split_at(params.len());
                registry.func(params.to_vec(), *variadic, results.to_vec())
            }
            TypeEntry::Struct { fields } => {
                let fields: Vec<(Option<&str>, TypeId)> = fields
                    .iter()
                    .zip(children)
                    .map(|(field, &ty)| (field.name.as_deref(), ty))
                    .collect();
                registry.struct_type(&fields)
            }
            TypeEntry::Interface { methods } => {
                let methods: Vec<(&str, &str)> = methods
                    .iter()
                    .map(|m| (m.name.as_str(), m.signature.as_str()))
                    .collect();
                registry.interface(&methods)
            }
            TypeEntry::EmptyInterface => registry.empty_interface(),
            TypeEntry::Opaque { text } => registry.opaque(text),
        }
    }

    fn too_deep(&self, key: &str) -> DocumentError {
        DocumentError::NestingTooDeep {
            key: key.to_string(),
            limit: self.limits.max_nesting_depth,
        }
    }
}
