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

use crate::{
    environment::Environment,
    errors::{ChainError, ChainResult},
    value::Value,
};
use std::{
    collections::HashMap,
    fmt::{self, Debug},
    rc::Rc,
};

/// A native function that can be called from a step of a chain.
///
/// A primitive reads its arguments from the environment it is given and may
/// write to it, but that environment is an overlay that is discarded once
/// the primitive returns. Its result is the only thing the chain sees.
/// Errors and panics are turned into `Value::Absent` by the evaluator.
pub trait Primitive {
    fn call(&self, env: &mut Environment<'_>) -> ChainResult<Value>;
}

impl<F> Primitive for F
where
    F: Fn(&mut Environment<'_>) -> ChainResult<Value>,
{
    fn call(&self, env: &mut Environment<'_>) -> ChainResult<Value> {
        self(env)
    }
}

/// Named primitives available to chains.
#[derive(Clone, Default)]
pub struct PrimitiveRegistry {
    primitives: HashMap<String, Rc<dyn Primitive>>,
}

impl Debug for PrimitiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveRegistry")
            .field("primitives", &self.names())
            .finish()
    }
}

impl PrimitiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a primitive, replacing any primitive with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, primitive: F)
    where
        F: Fn(&mut Environment<'_>) -> ChainResult<Value> + 'static,
    {
        self.primitives.insert(name.into(), Rc::new(primitive));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Primitive> {
        self.primitives.get(name).map(|primitive| &**primitive)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.primitives.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> =
            self.primitives.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// The first non-absent value bound under any of `keys`.
pub fn argument<'e>(
    env: &'e Environment<'_>,
    keys: &[&str],
) -> ChainResult<&'e Value> {
    env.first_of(keys)
        .ok_or_else(|| ChainError::invalid_input(keys[0], "missing"))
}

/// Like `argument` but rendered as text. Lists and maps are refused.
pub fn text_argument(env: &Environment<'_>, keys: &[&str]) -> ChainResult<String> {
    match argument(env, keys)? {
        Value::List(_) | Value::Map(_) => {
            Err(ChainError::invalid_input(keys[0], "expected text"))
        },
        value => Ok(value.to_string()),
    }
}
