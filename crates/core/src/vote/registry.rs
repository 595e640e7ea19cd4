use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

/// Process-wide mapping from opaque vote selectors to the option text they
/// stand for.
///
/// Entries are only ever added (by the session builder) and never removed;
/// the registry lives as long as the process. Every selector that can appear
/// in the message log as a vote click was registered here first.
#[derive(Debug, Default)]
pub struct SelectorRegistry {
    options: RwLock<HashMap<String, String>>,
}

impl SelectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `option_text` under a fresh selector and returns the
    /// selector. Selectors are unique for the lifetime of the registry,
    /// including under concurrent registration.
    pub fn register(&self, option_text: &str) -> String {
        let mut options = self.options.write().expect("selector registry lock poisoned");
        loop {
            let selector = format!("vote:{}", Uuid::new_v4().simple());
            if options.contains_key(&selector) {
                continue;
            }
            options.insert(selector.clone(), option_text.to_owned());
            return selector;
        }
    }

    /// Resolves a selector back to its option text. Unknown selectors
    /// resolve to `None`; the tally engine skips them silently.
    pub fn resolve(&self, selector: &str) -> Option<String> {
        self.options.read().expect("selector registry lock poisoned").get(selector).cloned()
    }

    pub fn len(&self) -> usize {
        self.options.read().expect("selector registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
