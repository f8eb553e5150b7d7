//! Rendered-page cache for the customer-facing listing pages.
//!
//! Product mutations publish invalidations through [`CacheInvalidator`]
//! instead of reaching into framework globals, so the cache layer stays an
//! explicit dependency of the services that dirty it.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Seam through which services invalidate cached pages.
pub trait CacheInvalidator {
    /// Drop the cached page for the given path, if any.
    fn invalidate(&self, path: &str);
}

/// In-process cache of rendered HTML keyed by request path.
#[derive(Default)]
pub struct PageCache {
    pages: RwLock<HashMap<String, String>>,
}

impl PageCache {
    /// Return the cached page for `path`, if present.
    pub fn get(&self, path: &str) -> Option<String> {
        self.pages.read().get(path).cloned()
    }

    /// Cache the rendered page for `path`.
    pub fn store(&self, path: &str, html: String) {
        self.pages.write().insert(path.to_string(), html);
    }
}

impl CacheInvalidator for PageCache {
    fn invalidate(&self, path: &str) {
        self.pages.write().remove(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_invalidates_pages() {
        let cache = PageCache::default();
        assert_eq!(cache.get("/"), None);

        cache.store("/", "<html>home</html>".to_string());
        assert_eq!(cache.get("/").as_deref(), Some("<html>home</html>"));

        cache.invalidate("/");
        assert_eq!(cache.get("/"), None);
    }

    #[test]
    fn invalidation_is_scoped_to_one_path() {
        let cache = PageCache::default();
        cache.store("/", "home".to_string());
        cache.store("/products", "products".to_string());

        cache.invalidate("/products");
        assert_eq!(cache.get("/").as_deref(), Some("home"));
        assert_eq!(cache.get("/products"), None);
    }
}
