//! Document visual-mode flag and the runtime color-scheme query.
//!
//! SYSTEM CONTEXT
//! ==============
//! External stylesheets key dark styling off a class on the root element.
//! The theme middleware and initializer are the only writers of that class.
//!
//! TRADE-OFFS
//! ==========
//! The preference query is infallible by signature: a browser that cannot
//! answer is treated as not preferring dark.

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

use std::cell::RefCell;
use std::collections::BTreeSet;

#[cfg(feature = "hydrate")]
use tracing::warn;

#[cfg(feature = "hydrate")]
const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// Errors produced while touching the document root.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// No document or root element is reachable.
    #[error("document root unavailable")]
    Unavailable,

    /// The class list rejected the update.
    #[error("class list update failed: {0}")]
    ClassList(String),
}

/// The root element whose class list carries the visual-mode flag.
pub trait DocumentRoot {
    fn set_class(&self, class: &str, present: bool) -> Result<(), DocumentError>;
    fn has_class(&self, class: &str) -> Result<bool, DocumentError>;
}

/// "Does the user prefer dark mode" as reported by the runtime.
pub trait ColorSchemeQuery {
    fn prefers_dark(&self) -> bool;
}

/// In-memory root element.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    classes: RefCell<BTreeSet<String>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().iter().cloned().collect()
    }
}

impl DocumentRoot for MemoryDocument {
    fn set_class(&self, class: &str, present: bool) -> Result<(), DocumentError> {
        let mut classes = self.classes.borrow_mut();
        if present {
            classes.insert(class.to_owned());
        } else {
            classes.remove(class);
        }
        Ok(())
    }

    fn has_class(&self, class: &str) -> Result<bool, DocumentError> {
        Ok(self.classes.borrow().contains(class))
    }
}

/// A preference fixed at construction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixedPreference(pub bool);

impl ColorSchemeQuery for FixedPreference {
    fn prefers_dark(&self) -> bool {
        self.0
    }
}

/// `document.documentElement` of the current window.
#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserDocument;

#[cfg(feature = "hydrate")]
fn document_element() -> Result<web_sys::Element, DocumentError> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|doc| doc.document_element())
        .ok_or(DocumentError::Unavailable)
}

#[cfg(feature = "hydrate")]
impl DocumentRoot for BrowserDocument {
    fn set_class(&self, class: &str, present: bool) -> Result<(), DocumentError> {
        let class_list = document_element()?.class_list();
        let result = if present { class_list.add_1(class) } else { class_list.remove_1(class) };
        result.map_err(|e| DocumentError::ClassList(format!("{e:?}")))
    }

    fn has_class(&self, class: &str) -> Result<bool, DocumentError> {
        Ok(document_element()?.class_list().contains(class))
    }
}

/// `matchMedia("(prefers-color-scheme: dark)")`.
#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserPreference;

#[cfg(feature = "hydrate")]
impl ColorSchemeQuery for BrowserPreference {
    fn prefers_dark(&self) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        match window.match_media(PREFERS_DARK_QUERY) {
            Ok(Some(mq)) => mq.matches(),
            Ok(None) => false,
            Err(e) => {
                warn!(error = ?e, "prefers-color-scheme query failed");
                false
            }
        }
    }
}
