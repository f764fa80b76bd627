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
    constants::INPUT,
    definitions::{DefinitionStore, VoiceBody},
    environment::Environment,
    errors::{ChainError, ChainResult},
    evaluator::Evaluator,
    primitives::PrimitiveRegistry,
    resolver::Resolver,
    trace::Trace,
    value::Value,
};
use log::{debug, info};
use std::{collections::HashMap, fs, path::Path};

/// The result of one top-level execution together with every warning raised
/// while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub value: Value,
    pub warnings: Vec<ChainError>,
}

/// Owns the definitions and primitives that voices are executed against.
#[derive(Debug, Clone)]
pub struct Context {
    config: Config,
    store: DefinitionStore,
    primitives: PrimitiveRegistry,
    defaults_loaded: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl Context {
    /// A context that reads definition files from `root` on first use.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_config(Config::new(root.as_ref()))
    }

    pub fn with_config(config: Config) -> Self {
        let primitives = PrimitiveRegistry::with_builtins(&config);
        Self {
            defaults_loaded: !config.lazy_load,
            config,
            store: DefinitionStore::new(),
            primitives,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &DefinitionStore {
        &self.store
    }

    pub fn primitives(&self) -> &PrimitiveRegistry {
        &self.primitives
    }

    /// Loads one definition file and whatever it includes.
    pub fn load(&mut self, path: impl AsRef<Path>) -> ChainResult<()> {
        self.store.load(path)
    }

    /// Adds voices and definitions written in `text`. Includes are resolved
    /// against the configured root.
    pub fn load_str(&mut self, text: &str) {
        let root = self.config.root.clone();
        self.store.load_str(text, &root);
    }

    /// Registers `primitive` under `name`, replacing any primitive of that
    /// name. Voices of the same name still take precedence.
    pub fn register_primitive<F>(&mut self, name: impl Into<String>, primitive: F)
    where
        F: Fn(&mut Environment<'_>) -> ChainResult<Value> + 'static,
    {
        self.primitives.register(name, primitive);
    }

    /// Loads every definition file directly under the configured root, in
    /// file name order. Only the first call does anything.
    pub fn load_defaults(&mut self) {
        if self.defaults_loaded {
            return;
        }
        self.defaults_loaded = true;
        let root = self.config.root.clone();
        let entries = match fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(e) => {
                self.store.record(ChainError::io(&root, &e));
                return;
            },
        };
        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| self.config.is_definition_file(path))
            .collect();
        paths.sort();
        info!("Loading {} definition files from {:?}", paths.len(), root);
        for path in paths {
            if let Err(e) = self.store.load(&path) {
                self.store.record(e);
            }
        }
    }

    /// Executes the voice `name` with `inputs` as its environment. Failures
    /// never escape: a missing voice or a failing step yields `Value::Absent`.
    pub fn execute_voice(
        &mut self,
        name: &str,
        inputs: HashMap<String, Value>,
    ) -> Value {
        self.execute_voice_traced(name, inputs).value
    }

    /// Like `execute_voice` but also reports what went wrong along the way.
    pub fn execute_voice_traced(
        &mut self,
        name: &str,
        inputs: HashMap<String, Value>,
    ) -> Execution {
        self.load_defaults();
        let mut trace = Trace::default();
        trace.extend(self.store.take_warnings());
        let value = match self.store.lookup(name).cloned() {
            None => {
                trace.warn(ChainError::MissingDefinition {
                    name: name.to_string(),
                });
                Value::Absent
            },
            Some(voice) => match voice.body {
                VoiceBody::Literal(value) => value,
                VoiceBody::Chain(chain) => {
                    let mut env = Environment::from(inputs);
                    let seed = env.get(INPUT).cloned().unwrap_or_default();
                    for parameter in &voice.parameters {
                        env.set_if_unbound(parameter, &seed);
                    }
                    let mut evaluator = Evaluator::new(Resolver::new(
                        &self.store,
                        &self.primitives,
                    ));
                    let value = evaluator.execute_voice_chain(
                        &voice.name,
                        &chain,
                        &mut env,
                        seed,
                    );
                    trace.extend(evaluator.into_trace().into_warnings());
                    value
                },
            },
        };
        debug!("execute_voice({:?}) = {:?}", name, value);
        Execution {
            value,
            warnings: trace.into_warnings(),
        }
    }

    /// Runs chain text that is not stored under any voice name.
    pub fn execute_chain(
        &mut self,
        chain: &str,
        inputs: HashMap<String, Value>,
    ) -> Execution {
        self.load_defaults();
        let mut trace = Trace::default();
        trace.extend(self.store.take_warnings());
        let mut env = Environment::from(inputs);
        let seed = env.get(INPUT).cloned().unwrap_or_default();
        let mut evaluator =
            Evaluator::new(Resolver::new(&self.store, &self.primitives));
        let value = evaluator.execute(chain, &mut env, seed);
        trace.extend(evaluator.into_trace().into_warnings());
        Execution {
            value,
            warnings: trace.into_warnings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Context;
    use crate::{config::Config, errors::ChainError, value::Value};
    use maplit::hashmap;
    use std::collections::HashMap;

    fn context(text: &str) -> Context {
        let mut context =
            Context::with_config(Config::new("/nonexistent").without_lazy_load());
        context.load_str(text);
        context
    }

    #[test]
    fn missing_voice_is_absent() {
        let mut context = context("");
        let execution = context.execute_voice_traced("nothing", HashMap::new());
        assert_eq!(execution.value, Value::Absent);
        assert_eq!(
            execution.warnings,
            vec![ChainError::MissingDefinition {
                name: "nothing".into()
            }]
        );
    }

    #[test]
    fn literal_voice_returns_its_value() {
        let mut context = context("voice greeting / \"hello\"");
        assert_eq!(
            context.execute_voice("greeting", HashMap::new()),
            Value::from("hello")
        );
    }

    #[test]
    fn input_seeds_the_chain() {
        let mut context = context("voice shout / {upper}");
        let inputs = hashmap! {"input".to_string() => Value::from("hey")};
        assert_eq!(context.execute_voice("shout", inputs), Value::from("HEY"));
    }

    #[test]
    fn parameters_default_to_the_input() {
        let mut context = context("voice echo(word) / {word -> upper}");
        let inputs = hashmap! {"input".to_string() => Value::from("hi")};
        assert_eq!(context.execute_voice("echo", inputs), Value::from("HI"));
        let inputs = hashmap! {
            "input".to_string() => Value::from("hi"),
            "word".to_string() => Value::from("there"),
        };
        assert_eq!(context.execute_voice("echo", inputs), Value::from("THERE"));
    }

    #[test]
    fn registered_primitives_are_callable() {
        let mut context = context("voice answer / {forty_two}");
        context.register_primitive("forty_two", |_| Ok(Value::from(42)));
        assert_eq!(
            context.execute_voice("answer", HashMap::new()),
            Value::from(42)
        );
    }

    #[test]
    fn unreadable_root_is_a_warning() {
        let mut context = Context::new("/nonexistent/voice_chain_root");
        let execution = context.execute_chain("{'x'}", HashMap::new());
        assert_eq!(execution.value, Value::from("x"));
        assert!(matches!(execution.warnings[..], [ChainError::Io { .. }]));
    }
}
