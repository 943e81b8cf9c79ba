//! Scoped preview handles.
//!
//! Showing a picked file or picture needs an object URL. Each URL is owned by
//! a [`PreviewUrl`] and revoked when that handle is dropped, so superseded or
//! torn-down previews never accumulate.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use uuid::Uuid;

use crate::models::CandidateFile;

#[derive(Debug, Default)]
struct Registry {
    live: Mutex<HashSet<String>>,
}

impl Registry {
    fn live(&self) -> MutexGuard<'_, HashSet<String>> {
        // A poisoned set is still a valid set of URLs.
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Issues preview URLs and tracks which are still live.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Registry>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, file: &CandidateFile) -> PreviewUrl {
        let url = format!("blob:{}", Uuid::new_v4());
        self.inner.live().insert(url.clone());
        debug!(file = %file.name, %url, "Preview created");
        PreviewUrl {
            url,
            registry: self.inner.clone(),
        }
    }

    pub fn live_count(&self) -> usize {
        self.inner.live().len()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.inner.live().contains(url)
    }
}

/// A live preview URL, revoked on drop.
#[derive(Debug)]
pub struct PreviewUrl {
    url: String,
    registry: Arc<Registry>,
}

impl PreviewUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewUrl {
    fn drop(&mut self) {
        self.registry.live().remove(&self.url);
        debug!(url = %self.url, "Preview revoked");
    }
}

/// Holds at most one preview; replacing it revokes the previous URL.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    current: Option<PreviewUrl>,
}

impl PreviewSlot {
    pub fn replace(&mut self, registry: &PreviewRegistry, file: &CandidateFile) -> &str {
        self.current.insert(registry.create(file)).as_str()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn url(&self) -> Option<&str> {
        self.current.as_ref().map(PreviewUrl::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picture(name: &str) -> CandidateFile {
        CandidateFile::new(name, "image/png", vec![1u8; 8])
    }

    #[test]
    fn test_drop_revokes() {
        let registry = PreviewRegistry::new();
        let url = registry.create(&picture("a.png"));
        let raw = url.as_str().to_string();
        assert!(raw.starts_with("blob:"));
        assert!(registry.is_live(&raw));

        drop(url);
        assert!(!registry.is_live(&raw));
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_replace_revokes_previous() {
        let registry = PreviewRegistry::new();
        let mut slot = PreviewSlot::default();

        let first = slot.replace(&registry, &picture("a.png")).to_string();
        let second = slot.replace(&registry, &picture("b.png")).to_string();

        assert_ne!(first, second);
        assert!(!registry.is_live(&first));
        assert!(registry.is_live(&second));
        assert_eq!(registry.live_count(), 1);

        slot.clear();
        assert_eq!(registry.live_count(), 0);
        assert_eq!(slot.url(), None);
    }

    #[test]
    fn test_dropping_slot_revokes() {
        let registry = PreviewRegistry::new();
        {
            let mut slot = PreviewSlot::default();
            slot.replace(&registry, &picture("a.png"));
            assert_eq!(registry.live_count(), 1);
        }
        assert_eq!(registry.live_count(), 0);
    }
}
