//! Font handle cache.

use std::collections::HashMap;
use std::sync::Arc;

use jitmark_layout::{FontWeight, TextStyle};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tracing::debug;

/// Identity of a font face: the part of a [`TextStyle`] that selects a face
/// rather than a size or color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontKey {
    pub family: Option<String>,
    pub weight: FontWeight,
    pub italic: bool,
}

impl FontKey {
    pub fn new(family: Option<String>, weight: FontWeight, italic: bool) -> Self {
        Self {
            family,
            weight,
            italic,
        }
    }
}

impl From<&TextStyle> for FontKey {
    fn from(style: &TextStyle) -> Self {
        // Blank family names select the default face like `None` does.
        let family = style
            .font_family
            .as_deref()
            .map(str::trim)
            .filter(|family| !family.is_empty())
            .map(str::to_string);
        Self::new(family, style.weight, style.italic)
    }
}

/// Read-through cache of font handles keyed by [`FontKey`].
///
/// Hits take a shared read lock. A miss takes the upgradable lock and checks
/// again before loading, so concurrent first use of a key constructs exactly
/// one handle. Handles are immutable and shared as `Arc`.
pub struct FontCache<F> {
    fonts: RwLock<HashMap<FontKey, Arc<F>>>,
}

impl<F> FontCache<F> {
    pub fn new() -> Self {
        Self {
            fonts: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the handle for `key`, creating it with `load` on first use.
    pub fn get_or_insert_with(&self, key: &FontKey, load: impl FnOnce(&FontKey) -> F) -> Arc<F> {
        if let Some(font) = self.fonts.read().get(key) {
            return Arc::clone(font);
        }

        let fonts = self.fonts.upgradable_read();
        if let Some(font) = fonts.get(key) {
            return Arc::clone(font);
        }

        debug!(
            "Loading font face (family: {:?}, weight: {}, italic: {})",
            key.family,
            key.weight.value(),
            key.italic
        );
        let font = Arc::new(load(key));
        RwLockUpgradableReadGuard::upgrade(fonts).insert(key.clone(), Arc::clone(&font));
        font
    }

    pub fn contains(&self, key: &FontKey) -> bool {
        self.fonts.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fonts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.read().is_empty()
    }
}

impl<F> Default for FontCache<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> std::fmt::Debug for FontCache<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCache")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jitmark_layout::ColorRgba;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_key_from_style() {
        let style = TextStyle::new(ColorRgba::BLACK)
            .with_font_family("  Consolas ")
            .with_weight(FontWeight::Bold)
            .with_font_size(40.0);
        assert_eq!(
            FontKey::from(&style),
            FontKey::new(Some("Consolas".to_string()), FontWeight::Bold, false)
        );

        let blank = TextStyle::new(ColorRgba::WHITE).with_font_family(" ");
        assert_eq!(FontKey::from(&blank).family, None);
    }

    #[test]
    fn test_size_and_color_share_a_face() {
        let a = TextStyle::new(ColorRgba::BLACK).with_font_size(12.0);
        let b = TextStyle::new(ColorRgba::WHITE).with_font_size(30.0);
        assert_eq!(FontKey::from(&a), FontKey::from(&b));
    }

    #[test]
    fn test_get_or_insert_loads_once() {
        let cache = FontCache::new();
        let key = FontKey::new(None, FontWeight::Normal, false);
        let loads = AtomicUsize::new(0);

        let first = cache.get_or_insert_with(&key, |_| {
            loads.fetch_add(1, Ordering::SeqCst);
            7u32
        });
        let second = cache.get_or_insert_with(&key, |_| {
            loads.fetch_add(1, Ordering::SeqCst);
            8u32
        });

        assert_eq!(*first, 7);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_hits_share_the_read_lock() {
        let cache = FontCache::new();
        let key = FontKey::new(None, FontWeight::Bold, false);
        let first = cache.get_or_insert_with(&key, |_| 1u8);

        let _reader = cache.fonts.read();
        let hit = cache.get_or_insert_with(&key, |_| unreachable!("already cached"));
        assert!(Arc::ptr_eq(&first, &hit));
        assert!(cache.contains(&key));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_first_use() {
        let cache = Arc::new(FontCache::new());
        let loads = Arc::new(AtomicUsize::new(0));
        let key = FontKey::new(Some("Mono".to_string()), FontWeight::SemiBold, true);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let loads = Arc::clone(&loads);
                let key = key.clone();
                thread::spawn(move || {
                    cache.get_or_insert_with(&key, |_| {
                        loads.fetch_add(1, Ordering::SeqCst);
                        String::from("face")
                    })
                })
            })
            .collect();

        let fonts: Vec<Arc<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(fonts.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
        assert!(cache.contains(&key));
    }
}
