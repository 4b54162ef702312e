//! Transition Cache
//!
//! Parsed documents keyed by normalized path. Entries are never evicted,
//! replaced or mutated for the life of the engine.

use std::collections::HashMap;

use fos_dom::Document;

/// Path-keyed store of parsed page snapshots
#[derive(Debug, Default)]
pub struct TransitionCache {
    entries: HashMap<String, Document>,
}

impl TransitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Independent copy of the document stored for `path`
    pub fn get(&self, path: &str) -> Option<Document> {
        self.entries.get(path).cloned()
    }

    /// Store `document` unless `path` already has an entry
    ///
    /// Returns whether the document was inserted.
    pub fn put(&mut self, path: &str, document: Document) -> bool {
        use std::collections::hash_map::Entry;

        match self.entries.entry(path.to_string()) {
            Entry::Occupied(_) => {
                tracing::debug!("Cache already holds {}", path);
                false
            }
            Entry::Vacant(slot) => {
                tracing::debug!("Cached {}", path);
                slot.insert(document);
                true
            }
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str) -> Document {
        let mut doc = Document::new("http://localhost/");
        doc.set_title(title);
        doc
    }

    #[test]
    fn test_get_returns_copy() {
        let mut cache = TransitionCache::new();
        cache.put("/about", page("About"));

        let mut copy = cache.get("/about").unwrap();
        copy.set_title("Changed");

        assert_eq!(cache.get("/about").unwrap().title(), "About");
    }

    #[test]
    fn test_first_insert_wins() {
        let mut cache = TransitionCache::new();
        assert!(cache.put("/a", page("first")));
        assert!(!cache.put("/a", page("second")));
        assert_eq!(cache.get("/a").unwrap().title(), "first");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_entry() {
        let cache = TransitionCache::new();
        assert!(cache.get("/nope").is_none());
        assert!(!cache.contains("/nope"));
        assert!(cache.is_empty());
    }
}
