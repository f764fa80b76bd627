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

extern crate test_voice_chain;
extern crate voice_chain;

use std::collections::HashMap;
use test_voice_chain::Fixture;
use voice_chain::{
    ChainError, Config, Context, Definition, DefinitionStore, Value, VoiceBody,
};

#[test]
fn loading_twice_changes_nothing() {
    let fixture = Fixture::new().unwrap();
    let main = fixture
        .write(
            "main.voices",
            "include shared.voices\nvoice a / {upper}\ndef point { x, y }",
        )
        .unwrap();
    fixture.write("shared.voices", "voice b / 2").unwrap();
    let mut store = DefinitionStore::new();
    store.load(&main).unwrap();
    let once = store.clone();
    store.load(&main).unwrap();
    assert_eq!(store, once);
    assert_eq!(store.voice_names(), vec!["a", "b"]);
    assert!(store.has_loaded(fixture.root().join("shared.voices")));
}

#[test]
fn mutual_includes_load_each_file_once() {
    let fixture = Fixture::new().unwrap();
    let a = fixture
        .write("a.voices", "include b.voices\nvoice from_a / 1")
        .unwrap();
    fixture
        .write("b.voices", "include a.voices\nvoice from_b / 2")
        .unwrap();
    let mut store = DefinitionStore::new();
    store.load(&a).unwrap();
    assert_eq!(store.voice_names(), vec!["from_a", "from_b"]);
    assert!(store.warnings().is_empty());
}

#[test]
fn missing_include_is_skipped() {
    let fixture = Fixture::new().unwrap();
    let main = fixture
        .write("main.voices", "include nowhere.voices\nvoice kept / 'yes'")
        .unwrap();
    let mut store = DefinitionStore::new();
    store.load(&main).unwrap();
    assert_eq!(
        store.lookup("kept").map(|voice| &voice.body),
        Some(&VoiceBody::Literal(Value::from("yes")))
    );
    assert!(matches!(
        store.warnings(),
        [ChainError::MissingDefinition { .. }]
    ));
}

#[test]
fn unreadable_root_file_is_an_error() {
    let fixture = Fixture::new().unwrap();
    let mut store = DefinitionStore::new();
    assert!(matches!(
        store.load(fixture.root().join("absent.voices")),
        Err(ChainError::Io { .. })
    ));
}

#[test]
fn context_loads_root_directory_on_first_use() {
    let fixture = Fixture::new().unwrap();
    fixture
        .write("greetings.voices", "voice hello / {'hello' -> upper}")
        .unwrap();
    fixture.write("notes.txt", "voice ignored / 1").unwrap();
    let mut context = Context::new(fixture.root());
    assert!(context.store().voice_names().is_empty());
    assert_eq!(
        context.execute_voice("hello", HashMap::new()),
        Value::from("HELLO")
    );
    assert_eq!(context.store().voice_names(), vec!["hello"]);
    fixture.write("late.voices", "voice late / 1").unwrap();
    assert_eq!(context.execute_voice("late", HashMap::new()), Value::Absent);
}

#[test]
fn read_file_is_relative_to_root() {
    let fixture = Fixture::new().unwrap();
    fixture.write("motd.txt", "  welcome back \n").unwrap();
    fixture
        .write("files.voices", "voice motd / {read_file -> trim}")
        .unwrap();
    let mut context = Context::new(fixture.root());
    let mut inputs = HashMap::new();
    inputs.insert("path".to_string(), Value::from("motd.txt"));
    assert_eq!(
        context.execute_voice("motd", inputs),
        Value::from("welcome back")
    );
}

#[test]
fn custom_extension_selects_definition_files() {
    let fixture = Fixture::new().unwrap();
    fixture
        .write("shapes.chain", "def point { x, y }\nvoice origin / 0")
        .unwrap();
    fixture.write("ignored.voices", "voice ignored / 1").unwrap();
    let config = Config::new(fixture.root()).with_extension(".chain");
    assert_eq!(config.extension, "chain");
    let mut context = Context::with_config(config);
    assert_eq!(
        context.execute_voice("origin", HashMap::new()),
        Value::from(0)
    );
    assert_eq!(context.execute_voice("ignored", HashMap::new()), Value::Absent);
    assert_eq!(context.config().root.as_path(), fixture.root());
    let definitions: Vec<&Definition> = context.store().definitions().collect();
    assert_eq!(
        definitions,
        vec![&Definition {
            name: "point".into(),
            fields: vec!["x".into(), "y".into()],
        }]
    );
}
