use std::collections::HashMap;

/// Unique identifier for an interned name or scope path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringId(usize);

/// String storage for deduplicating type names, scope paths and method signatures.
/// Scope paths repeat across most named descriptors of a registry, so every
/// descriptor stores a [`StringId`] instead of an owned `String`.
#[derive(Debug, Clone, Default)]
pub struct StringStorage {
    strings: Vec<String>,
    index: HashMap<String, StringId>,
}

impl StringStorage {
    /// Create a new empty string storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string and return its unique ID
    pub fn intern(&mut self, s: &str) -> StringId {
        if let Some(&id) = self.index.get(s) {
            return id;
        }

        let id = StringId(self.strings.len());
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), id);
        id
    }

    /// Get string content by ID
    pub fn resolve(&self, id: StringId) -> &str {
        &self.strings[id.0]
    }

    /// Get number of unique strings stored
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_interning() {
        let mut storage = StringStorage::new();

        let id1 = storage.intern("example.com/pkg");
        let id2 = storage.intern("Node");
        let id3 = storage.intern("example.com/pkg");

        assert_eq!(id1, id3);
        assert_ne!(id1, id2);
        assert_eq!(storage.resolve(id1), "example.com/pkg");
        assert_eq!(storage.resolve(id2), "Node");
    }

    #[test]
    fn test_deduplication() {
        let mut storage = StringStorage::new();

        storage.intern("int");
        storage.intern("string");
        storage.intern("int");
        storage.intern("bool");
        storage.intern("string");

        assert_eq!(storage.len(), 3);
    }

    #[test]
    fn test_empty_strings() {
        let mut storage = StringStorage::new();

        let id1 = storage.intern("");
        let id2 = storage.intern("");

        assert_eq!(id1, id2);
        assert_eq!(storage.resolve(id1), "");
        assert_eq!(storage.len(), 1);
    }
}
