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
    constants::{DEFAULT_EXTENSION, DEFAULT_ROOT},
    zeros::ZeroSearch,
};
use std::path::{Path, PathBuf};

/// How a `Context` finds its definition files and tunes its built-ins.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory searched for definition files. Relative paths given to
    /// `read_file` are resolved against it too.
    pub root: PathBuf,
    /// Extension, without the dot, of the files loaded from `root`.
    pub extension: String,
    /// Whether the first execution loads every definition file under `root`.
    pub lazy_load: bool,
    pub zero_search: ZeroSearch,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            extension: DEFAULT_EXTENSION.to_string(),
            lazy_load: true,
            zero_search: ZeroSearch::default(),
        }
    }
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub const fn without_lazy_load(mut self) -> Self {
        self.lazy_load = false;
        self
    }

    /// Whether `path` is a definition file by its extension.
    pub fn is_definition_file(&self, path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .map_or(false, |extension| extension == self.extension.as_str())
    }
}
