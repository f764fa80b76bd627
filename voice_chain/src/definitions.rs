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
    declaration::{parse_line, Declaration},
    errors::{ChainError, ChainResult},
    value::Value,
};
use log::{debug, warn};
use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

/// What a voice stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceBody {
    /// A terminal value.
    Literal(Value),
    /// Unevaluated chain text, parsed each time the voice is executed.
    Chain(String),
}

/// A named chain or literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub name: String,
    /// Names that receive the caller's last result when the voice is entered.
    pub parameters: Vec<String>,
    pub body: VoiceBody,
}

impl Voice {
    pub fn literal(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            body: VoiceBody::Literal(value.into()),
        }
    }

    pub fn chain(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            body: VoiceBody::Chain(text.into()),
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = parameters;
        self
    }
}

/// A named list of fields. Only documentation, never checked against values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub fields: Vec<String>,
}

/// Voices and definitions read from declarative text.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DefinitionStore {
    voices: HashMap<String, Voice>,
    definitions: HashMap<String, Definition>,
    /// Canonical paths of every file loaded so far.
    visited: HashSet<PathBuf>,
    /// Includes that could not be loaded.
    warnings: Vec<ChainError>,
}

impl DefinitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a definition file and everything it includes. A file that was
    /// already loaded is skipped. Includes that cannot be read are skipped
    /// with a warning but the file itself must be readable.
    pub fn load(&mut self, path: impl AsRef<Path>) -> ChainResult<()> {
        let path = path.as_ref();
        let canonical =
            path.canonicalize().map_err(|e| ChainError::io(path, &e))?;
        if self.visited.contains(&canonical) {
            debug!("{} is already loaded", canonical.display());
            return Ok(());
        }
        let text = fs::read_to_string(&canonical)
            .map_err(|e| ChainError::io(path, &e))?;
        self.visited.insert(canonical.clone());
        debug!("Loading {}", canonical.display());
        let base = canonical.parent().unwrap_or_else(|| Path::new(""));
        self.load_str(&text, base);
        Ok(())
    }

    /// Loads declarative text that did not come from a file. Includes are
    /// resolved against `base`.
    pub fn load_str(&mut self, text: &str, base: &Path) {
        for declaration in text.lines().filter_map(parse_line) {
            match declaration {
                Declaration::Voice(voice) => self.insert_voice(voice),
                Declaration::Definition(definition) => {
                    self.insert_definition(definition)
                },
                Declaration::Include(relative) => {
                    let target = base.join(&relative);
                    if let Err(e) = self.load(&target) {
                        warn!("Skipping include: {}", e);
                        self.warnings.push(ChainError::MissingDefinition {
                            name: target.display().to_string(),
                        });
                    }
                },
            }
        }
    }

    /// Adds a voice, replacing any voice with the same name.
    pub fn insert_voice(&mut self, voice: Voice) {
        self.voices.insert(voice.name.clone(), voice);
    }

    pub fn insert_definition(&mut self, definition: Definition) {
        self.definitions.insert(definition.name.clone(), definition);
    }

    pub fn lookup(&self, name: &str) -> Option<&Voice> {
        self.voices.get(name)
    }

    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn voice_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> =
            self.voices.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.values()
    }

    pub fn has_loaded(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .canonicalize()
            .map_or(false, |canonical| self.visited.contains(&canonical))
    }

    pub fn warnings(&self) -> &[ChainError] {
        &self.warnings
    }

    /// Keeps a load failure so the next execution can report it.
    pub fn record(&mut self, error: ChainError) {
        warn!("{}", error);
        self.warnings.push(error);
    }

    pub fn take_warnings(&mut self) -> Vec<ChainError> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::{DefinitionStore, Voice, VoiceBody};
    use crate::{errors::ChainError, value::Value};
    use std::path::Path;

    #[test]
    fn last_voice_with_a_name_wins() {
        let mut store = DefinitionStore::new();
        store.load_str(
            "voice a / \"first\"\nvoice a / \"second\"",
            Path::new("."),
        );
        assert_eq!(
            store.lookup("a").map(|v| &v.body),
            Some(&VoiceBody::Literal(Value::from("second")))
        );
    }

    #[test]
    fn definitions_are_carried() {
        let mut store = DefinitionStore::new();
        store.load_str("def point { x, y }", Path::new("."));
        assert_eq!(
            store.definition("point").map(|d| d.fields.clone()),
            Some(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn missing_include_is_a_warning() {
        let mut store = DefinitionStore::new();
        store.load_str(
            "include does/not/exist.voices\nvoice after / 1",
            Path::new("/nonexistent"),
        );
        assert!(store.lookup("after").is_some());
        assert!(matches!(
            store.warnings(),
            [ChainError::MissingDefinition { .. }]
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut store = DefinitionStore::new();
        assert!(matches!(
            store.load("/nonexistent/file.voices"),
            Err(ChainError::Io { .. })
        ));
    }

    #[test]
    fn voice_names_are_sorted() {
        let mut store = DefinitionStore::new();
        store.insert_voice(Voice::literal("b", 1));
        store.insert_voice(Voice::chain("a", "{b}"));
        assert_eq!(store.voice_names(), vec!["a", "b"]);
    }
}
