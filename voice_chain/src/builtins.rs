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
    config::Config,
    constants::{INPUT, LAST},
    environment::Environment,
    errors::{ChainError, ChainResult},
    primitives::{argument, text_argument, PrimitiveRegistry},
    value::Value,
    zeros::find_zeros_primitive,
};
use std::{fs, path::Path};

const TEXT_KEYS: [&str; 3] = [LAST, INPUT, "line"];
const PATH_KEYS: [&str; 4] = ["path", "file", INPUT, LAST];

impl PrimitiveRegistry {
    /// A registry holding the built-in primitives.
    pub fn with_builtins(config: &Config) -> Self {
        let mut registry = Self::new();
        registry.register("identity", identity);
        registry.register("trim", |env| map_text(env, |s| s.trim().to_string()));
        registry.register("upper", |env| map_text(env, str::to_uppercase));
        registry.register("lower", |env| map_text(env, str::to_lowercase));
        registry.register("length", length);
        let root = config.root.clone();
        registry.register("read_file", move |env| read_file(&root, env));
        let settings = config.zero_search.clone();
        registry.register("find_zeros", move |env| {
            find_zeros_primitive(&settings, env)
        });
        registry
    }
}

fn identity(env: &mut Environment<'_>) -> ChainResult<Value> {
    Ok(env.first_of(&[LAST, INPUT]).cloned().unwrap_or_default())
}

fn map_text(
    env: &mut Environment<'_>,
    f: impl Fn(&str) -> String,
) -> ChainResult<Value> {
    text_argument(env, &TEXT_KEYS).map(|text| Value::from(f(&text)))
}

fn length(env: &mut Environment<'_>) -> ChainResult<Value> {
    match argument(env, &TEXT_KEYS)? {
        Value::Str(s) => Ok(Value::from(s.chars().count())),
        Value::List(items) => Ok(Value::from(items.len())),
        Value::Map(map) => Ok(Value::from(map.len())),
        _ => Err(ChainError::invalid_input(LAST, "expected text or a collection")),
    }
}

fn read_file(root: &Path, env: &mut Environment<'_>) -> ChainResult<Value> {
    let path = root.join(text_argument(env, &PATH_KEYS)?);
    fs::read_to_string(&path)
        .map(Value::from)
        .map_err(|e| ChainError::io(&path, &e))
}
