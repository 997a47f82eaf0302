//! Browser history abstraction.

use std::sync::Mutex;

/// The host's history bar. None of these calls trigger a dispatch.
pub trait History: Send + Sync {
    /// Raw token currently shown in the history bar.
    fn current(&self) -> String;

    /// Push a new entry.
    fn new_item(&self, raw: &str);

    /// Overwrite the current entry.
    fn replace_item(&self, raw: &str);
}

/// In-memory history used by tests and the command-line host.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<String>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.entries.lock().expect("history mutex poisoned")
    }
}

impl History for MemoryHistory {
    fn current(&self) -> String {
        self.lock().last().cloned().unwrap_or_default()
    }

    fn new_item(&self, raw: &str) {
        self.lock().push(raw.to_string());
    }

    fn replace_item(&self, raw: &str) {
        let mut entries = self.lock();
        match entries.last_mut() {
            Some(last) => *last = raw.to_string(),
            None => entries.push(raw.to_string()),
        }
    }
}
