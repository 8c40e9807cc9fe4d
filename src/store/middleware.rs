//! Dispatch observers.
//!
//! DESIGN
//! ======
//! Middleware runs after the slice transition has been applied, in install
//! order, and sees the post-transition state. It can perform side effects but
//! cannot alter or block the dispatch.

#[cfg(test)]
#[path = "middleware_test.rs"]
mod middleware_test;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{Action, RootState};
use crate::util::dark_mode;
use crate::util::document::DocumentRoot;
use crate::util::storage::KeyValueStorage;

/// An observer inserted into the dispatch path.
pub trait Middleware {
    fn after_reduce(&self, action: &Action, state: &RootState);
}

/// Persists theme changes and reconciles the document dark-mode class.
pub struct ThemeMiddleware {
    storage: Rc<dyn KeyValueStorage>,
    document: Rc<dyn DocumentRoot>,
    storage_key: String,
    dark_class: String,
}

impl ThemeMiddleware {
    pub fn new(
        storage: Rc<dyn KeyValueStorage>,
        document: Rc<dyn DocumentRoot>,
        storage_key: impl Into<String>,
        dark_class: impl Into<String>,
    ) -> Self {
        Self { storage, document, storage_key: storage_key.into(), dark_class: dark_class.into() }
    }
}

impl Middleware for ThemeMiddleware {
    fn after_reduce(&self, action: &Action, _state: &RootState) {
        let Some(theme) = action.theme_change() else {
            return;
        };
        dark_mode::persist(self.storage.as_ref(), &self.storage_key, theme);
        dark_mode::apply(self.document.as_ref(), &self.dark_class, theme);
    }
}

/// Ring buffer of recently dispatched action types, newest last.
#[derive(Debug)]
pub struct ActionLog {
    capacity: usize,
    entries: RefCell<VecDeque<&'static str>>,
}

impl ActionLog {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, entries: RefCell::new(VecDeque::with_capacity(capacity)) }
    }

    pub fn entries(&self) -> Vec<&'static str> {
        self.entries.borrow().iter().copied().collect()
    }
}

impl Middleware for ActionLog {
    fn after_reduce(&self, action: &Action, _state: &RootState) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.borrow_mut();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(action.type_name());
    }
}
