//  Library for the Voice Chain interpreter.
// Copyright (C) 2019 Charles Johnson
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

use crate::value::Value;
use std::collections::{HashMap, HashSet};

/// The mutable scope threaded through the steps of one chain execution.
///
/// An environment may overlay a parent. Lookups fall through to the parent
/// but writes always stay in the overlay, so a nested chain can read
/// everything its caller bound without being able to change it.
#[derive(Debug, Default)]
pub struct Environment<'p> {
    bindings: HashMap<String, Value>,
    parent: Option<&'p Environment<'p>>,
}

impl<'p> Environment<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays a new scope on top of this one.
    pub fn child(&self) -> Environment<'_> {
        Environment {
            bindings: HashMap::new(),
            parent: Some(self),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.bindings
            .get(key)
            .or_else(|| self.parent.and_then(|p| p.get(key)))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.bindings.insert(key.into(), value.into());
    }

    /// Binds `value` under `key` unless the key is already visible. Returns
    /// whether the binding was made.
    pub fn set_if_unbound(&mut self, key: &str, value: &Value) -> bool {
        if self.contains(key) {
            false
        } else {
            self.set(key, value.clone());
            true
        }
    }

    /// The first of `keys` that is bound to something other than `Absent`.
    pub fn first_of(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .find(|value| !value.is_absent())
    }

    /// Keys bound directly in this scope, not in any parent.
    pub fn local_keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Every visible key, including those of parents.
    pub fn keys(&self) -> HashSet<&str> {
        let mut keys =
            self.parent.map(|parent| parent.keys()).unwrap_or_default();
        keys.extend(self.local_keys());
        keys
    }
}

impl From<HashMap<String, Value>> for Environment<'_> {
    fn from(bindings: HashMap<String, Value>) -> Self {
        Self {
            bindings,
            parent: None,
        }
    }
}
