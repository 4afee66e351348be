use shared::storage::Storage;

/// `localStorage`-backed implementation of the durable key/value
/// contract. Write failures (quota, private mode) are swallowed: the
/// in-memory state stays authoritative for the rest of the session.
#[derive(Debug, Clone)]
pub struct WebStorage {
    inner: web_sys::Storage,
}

impl WebStorage {
    pub fn new() -> Option<Self> {
        let inner = web_sys::window()?.local_storage().ok()??;
        Some(Self { inner })
    }
}

impl Storage for WebStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let _ = self.inner.set_item(key, value);
    }

    fn remove(&self, key: &str) {
        let _ = self.inner.remove_item(key);
    }
}

/// Mirrors the persisted theme onto the document root as a `dark` class.
pub fn apply_theme(dark: bool) {
    let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element());
    if let Some(root) = root {
        let classes = root.class_list();
        if dark {
            let _ = classes.add_1("dark");
        } else {
            let _ = classes.remove_1("dark");
        }
    }
}
