//  Test helpers for the Voice Chain interpreter.
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

#[macro_use]
extern crate lazy_static;
pub extern crate proptest;

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

// Checks if a string could name a voice without colliding with a builtin.
#[macro_export]
macro_rules! assume_identifier {
    ($a:ident) => {
        $crate::proptest::prop_assume!($crate::is_plain_identifier(&$a));
        $crate::proptest::prop_assume!(!$crate::RESERVED_NAMES.contains($a.as_str()));
    };
}

// Checks if all strings could each name a voice
#[macro_export]
macro_rules! assume_identifiers {
	($($a:ident),*) => ($($crate::assume_identifier!($a);)*)
}

// Common pattern in tests where a voice is declared and must be found again.
#[macro_export]
macro_rules! declare_voice {
    ($cont:ident, $name:expr, $body:expr) => {
        $cont.load_str(&format!("voice {} / {}", $name, $body));
    };
}

// Saves having to construct a new `HashSet` each time.
lazy_static! {
    pub static ref RESERVED_NAMES: HashSet<&'static str> = {
        let mut names = HashSet::new();
        for name in &[
            "identity", "trim", "upper", "lower", "length", "read_file",
            "find_zeros", "last", "input", "path", "file", "line", "true",
            "false", "def", "voice", "include",
        ] {
            names.insert(*name);
        }
        names
    };
}

pub fn is_plain_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .map_or(false, |first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A temporary directory of definition files, removed on drop.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `contents` to `name` under the root, creating parent
    /// directories as needed.
    pub fn write(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }
}
