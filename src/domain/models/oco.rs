//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the one-cancels-other (OCO) linkage between two resting orders
// as a standalone symmetric map keyed by order id, rather than intrusive pointers on
// Order itself — this keeps Order value-semantic and avoids any cycle bookkeeping.
//
// | Component    | Description                                                        |
// |--------------|---------------------------------------------------------------------|
// | OcoRegistry  | Symmetric bidirectional id <-> id map with non-destructive lookup.  |
//--------------------------------------------------------------------------------------------------

use std::collections::HashMap;

/// Bidirectional id <-> id map expressing cancel-on-fill linkage between two orders.
#[derive(Debug, Default)]
pub struct OcoRegistry {
    links: HashMap<String, String>,
}

impl OcoRegistry {
    pub fn new() -> Self {
        Self { links: HashMap::new() }
    }

    /// Stores both directions of the link (`a -> b` and `b -> a`).
    pub fn insert(&mut self, a: &str, b: &str) {
        self.links.insert(a.to_string(), b.to_string());
        self.links.insert(b.to_string(), a.to_string());
    }

    /// Non-destructive lookup of the sibling id. Repeated calls return the same
    /// answer until `purge` removes the link.
    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.links.get(id).map(String::as_str)
    }

    /// Removes both directions of any link involving `id`. Idempotent.
    pub fn purge(&mut self, id: &str) {
        if let Some(sibling) = self.links.remove(id) {
            self.links.remove(&sibling);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_stores_both_directions() {
        let mut reg = OcoRegistry::new();
        reg.insert("a", "b");
        assert_eq!(reg.lookup("a"), Some("b"));
        assert_eq!(reg.lookup("b"), Some("a"));
    }

    #[test]
    fn purge_removes_both_directions() {
        let mut reg = OcoRegistry::new();
        reg.insert("a", "b");
        reg.purge("a");
        assert_eq!(reg.lookup("a"), None);
        assert_eq!(reg.lookup("b"), None);
        assert!(reg.is_empty());
    }

    #[test]
    fn lookup_is_idempotent_until_purged() {
        let mut reg = OcoRegistry::new();
        reg.insert("a", "b");
        assert_eq!(reg.lookup("a"), Some("b"));
        assert_eq!(reg.lookup("a"), Some("b"));
    }
}
