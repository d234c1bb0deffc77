//! Cache of parsed templates.
//!
//! Parsing is cheap but not free; applications that render the same templates
//! repeatedly can share one [`FormatCache`] between formatters and threads. Entries
//! are keyed by the parser settings and the raw template, so templates parsed under
//! different syntaxes never collide.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::format::Format;
use crate::parser::Parser;
use crate::settings::ParserSettings;
use crate::Result;

type Entries = HashMap<ParserSettings, HashMap<String, Arc<Format>>>;

/// A thread-safe map from `(parser settings, template)` to its parsed [`Format`].
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use smart_format::{FormatCache, ParserSettings};
///
/// let cache = FormatCache::new();
/// let settings = ParserSettings::default();
///
/// let first = cache.get_or_parse("Hello {Name}", &settings).unwrap();
/// let second = cache.get_or_parse("Hello {Name}", &settings).unwrap();
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct FormatCache {
    entries: RwLock<Entries>,
    max_entries: Option<usize>,
}

impl FormatCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the number of stored templates. Once full, new templates are still
    /// parsed but no longer stored.
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Returns the cached tree for `template`, parsing and storing it on a miss.
    ///
    /// Parse failures are returned and never cached.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed template, see [`Parser::parse`].
    pub fn get_or_parse(&self, template: &str, settings: &ParserSettings) -> Result<Arc<Format>> {
        {
            let entries = self.entries.read();
            if let Some(format) = entries.get(settings).and_then(|m| m.get(template)) {
                log::debug!("format cache hit for {:?}", template);
                return Ok(Arc::clone(format));
            }
        }

        log::debug!("format cache miss for {:?}", template);
        let parsed = Arc::new(Parser::new(settings).parse(template)?);

        let mut entries = self.entries.write();
        let stored: usize = entries.values().map(HashMap::len).sum();
        let present = entries
            .get(settings)
            .is_some_and(|m| m.contains_key(template));
        if !present && self.max_entries.is_some_and(|max| stored >= max) {
            log::debug!("format cache full ({} entries), not storing", stored);
            return Ok(parsed);
        }

        // Another thread may have stored the same template while we were parsing
        let format = entries
            .entry(settings.clone())
            .or_default()
            .entry(template.to_string())
            .or_insert(parsed);
        Ok(Arc::clone(format))
    }

    /// Returns the number of stored templates across all parser settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every stored template.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_are_part_of_the_key() {
        let cache = FormatCache::new();
        let braces = ParserSettings::default();
        let angles = ParserSettings::default().with_delimiters('<', '>');

        let a = cache.get_or_parse("<0> {0}", &braces).unwrap();
        let b = cache.get_or_parse("<0> {0}", &angles).unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.placeholders().next().unwrap().raw_text(), "{0}");
        assert_eq!(b.placeholders().next().unwrap().raw_text(), "<0>");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_parse_errors_are_not_cached() {
        let cache = FormatCache::new();
        assert!(cache.get_or_parse("{oops", &ParserSettings::default()).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_max_entries() {
        let cache = FormatCache::new().with_max_entries(1);
        let settings = ParserSettings::default();

        cache.get_or_parse("one", &settings).unwrap();
        let two = cache.get_or_parse("two", &settings).unwrap();
        assert_eq!(two.raw_text(), "two");
        assert_eq!(cache.len(), 1);

        // Stored entries keep being served
        let first = cache.get_or_parse("one", &settings).unwrap();
        let again = cache.get_or_parse("one", &settings).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_clear() {
        let cache = FormatCache::new();
        cache.get_or_parse("x", &ParserSettings::default()).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_parses_share_one_tree() {
        let cache = Arc::new(FormatCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache
                        .get_or_parse("{a:{b}|{c}}", &ParserSettings::default())
                        .unwrap()
                })
            })
            .collect();

        let formats: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(formats.iter().all(|f| Arc::ptr_eq(f, &formats[0])));
        assert_eq!(cache.len(), 1);
    }
}
