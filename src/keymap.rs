//! Context-scoped key → command routing.
//!
//! A [`CommandRouter`] owns one key table per named context plus the reserved
//! `global` table. Lookups consult `global` first, then the active context.
//! The router only resolves names; it never executes anything itself.

use std::collections::HashMap;

mod command;
mod defaults;

pub use self::command::{Command, UnknownCommand};
pub use self::defaults::{
    BROWSE, COMPARE, IMAGES, apply_overrides, default_keymaps, install_default_keymaps,
};

pub const GLOBAL: &str = "global";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeymapError {
    #[error("the `global` context cannot be unregistered")]
    GlobalIsPermanent,

    #[error("the `global` context is always consulted and cannot be made active")]
    GlobalNotActivatable,

    #[error("unknown command `{command}` bound to `{key}` in context `{context}`")]
    UnknownCommand {
        context: String,
        key: String,
        command: String,
    },
}

/// A raw key press delivered by an input source.
///
/// `key` is a key name such as `"s"`, `"?"`, `"arrowleft"` or `"space"`.
/// When the router resolves a command for the press it marks the default
/// action as prevented; unmatched presses are left alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    default_prevented: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub type KeyTable<C> = HashMap<String, C>;

#[derive(Clone, Debug)]
pub struct CommandRouter<C> {
    contexts: HashMap<String, KeyTable<C>>,
    active: Option<String>,
}

impl<C> Default for CommandRouter<C> {
    fn default() -> Self {
        Self {
            contexts: HashMap::new(),
            active: None,
        }
    }
}

fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

impl<C: Clone> CommandRouter<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `mapping` for `context`, replacing any previous table wholesale.
    pub fn register_context<K, I>(&mut self, context: &str, mapping: I)
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, C)>,
    {
        let table: KeyTable<C> = mapping
            .into_iter()
            .map(|(k, c)| (normalize_key(k.as_ref()), c))
            .collect();
        tracing::debug!(context, keys = table.len(), "register key context");
        self.contexts.insert(context.to_string(), table);
    }

    pub fn unregister_context(&mut self, context: &str) -> Result<(), KeymapError> {
        if context == GLOBAL {
            return Err(KeymapError::GlobalIsPermanent);
        }
        self.contexts.remove(context);
        Ok(())
    }

    /// Makes `context` the live non-global context; `None` leaves only global
    /// shortcuts active. The context does not need to be registered yet.
    pub fn set_active_context(&mut self, context: Option<&str>) -> Result<(), KeymapError> {
        if context == Some(GLOBAL) {
            return Err(KeymapError::GlobalNotActivatable);
        }
        self.active = context.map(str::to_string);
        Ok(())
    }

    pub fn active_context(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_registered(&self, context: &str) -> bool {
        self.contexts.contains_key(context)
    }

    pub fn bindings(&self, context: &str) -> Option<&KeyTable<C>> {
        self.contexts.get(context)
    }

    /// Resolves a key name to a command; `None` means no match.
    pub fn dispatch(&self, raw_key: &str) -> Option<C> {
        let key = normalize_key(raw_key);

        if let Some(cmd) = self.contexts.get(GLOBAL).and_then(|t| t.get(&key)) {
            return Some(cmd.clone());
        }

        let active = self.active.as_deref()?;
        self.contexts
            .get(active)
            .and_then(|t| t.get(&key))
            .cloned()
    }

    /// Like [`dispatch`](Self::dispatch), but suppresses the event's default
    /// action when a command resolves.
    pub fn handle(&self, event: &mut KeyPress) -> Option<C> {
        let cmd = self.dispatch(&event.key)?;
        event.prevent_default();
        Some(cmd)
    }

    /// Drains an input source, emitting every resolved command to `sink`.
    ///
    /// `sink` receives the router so handlers can switch contexts mid-stream.
    /// Returns the number of events that resolved.
    pub fn pump<S, F>(&mut self, source: S, mut sink: F) -> usize
    where
        S: IntoIterator<Item = KeyPress>,
        F: FnMut(&mut Self, C),
    {
        let mut hits = 0;
        for mut event in source {
            if let Some(cmd) = self.handle(&mut event) {
                hits += 1;
                sink(self, cmd);
            }
        }
        hits
    }
}

#[cfg(test)]
#[path = "tests/keymap_tests.rs"]
mod tests;
