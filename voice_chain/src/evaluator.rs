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
    constants::{INPUT, LAST, PRIMITIVE_ALIASES},
    environment::Environment,
    errors::ChainError,
    parser::parse_chain,
    resolver::{ResolvedStep, Resolver},
    trace::Trace,
    value::Value,
};
use log::debug;
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

/// Runs chains step by step. One `Evaluator` serves one top-level call and
/// everything that call recurses into.
#[derive(Debug)]
pub struct Evaluator<'r> {
    resolver: Resolver<'r>,
    /// Voices currently being executed, outermost first.
    call_stack: Vec<String>,
    trace: Trace,
}

impl<'r> Evaluator<'r> {
    pub fn new(resolver: Resolver<'r>) -> Self {
        Self {
            resolver,
            call_stack: Vec::new(),
            trace: Trace::default(),
        }
    }

    pub fn into_trace(self) -> Trace {
        self.trace
    }

    /// Executes the chain of the voice `name` unless that voice is already
    /// being executed further up the stack.
    pub fn execute_voice_chain(
        &mut self,
        name: &str,
        chain: &str,
        env: &mut Environment<'_>,
        seed: Value,
    ) -> Value {
        if self.call_stack.iter().any(|active| active == name) {
            self.trace.warn(ChainError::CycleDetected {
                voice: name.to_string(),
            });
            return Value::Absent;
        }
        self.call_stack.push(name.to_string());
        let result = self.execute(chain, env, seed);
        self.call_stack.pop();
        result
    }

    /// Runs every step of `chain` in order. The previous result starts as
    /// `seed` and `env["last"]` always holds the result of the latest step.
    pub fn execute(
        &mut self,
        chain: &str,
        env: &mut Environment<'_>,
        seed: Value,
    ) -> Value {
        let mut last = seed;
        env.set(LAST, last.clone());
        for token in parse_chain(chain) {
            let step = self.resolver.resolve(&token, env);
            let result = self.evaluate(&step, env, &last);
            debug!("{} => {:?}", token, result);
            env.set(LAST, result.clone());
            last = result;
        }
        last
    }

    fn evaluate(
        &mut self,
        step: &ResolvedStep,
        env: &mut Environment<'_>,
        last: &Value,
    ) -> Value {
        match step {
            ResolvedStep::Compound(alternatives) => {
                self.route(alternatives, env, last)
            },
            ResolvedStep::InputBound {
                value, ..
            }
            | ResolvedStep::VoiceLiteral {
                value, ..
            }
            | ResolvedStep::Literal(value) => value.clone(),
            ResolvedStep::VoiceChain {
                name,
                parameters,
                chain,
            } => self.enter_voice(name, parameters, chain, env, last),
            ResolvedStep::PrimitiveCall {
                name,
            } => self.call_primitive(name, env, last),
            ResolvedStep::Bind {
                name,
            } => {
                if last.is_absent() {
                    self.trace.warn(ChainError::UnresolvedToken {
                        token: name.clone(),
                    });
                    Value::from(name.as_str())
                } else {
                    env.set(name.as_str(), last.clone());
                    last.clone()
                }
            },
            ResolvedStep::Unresolved {
                token,
            } => {
                self.trace.warn(ChainError::UnresolvedToken {
                    token: token.clone(),
                });
                Value::from(token.as_str())
            },
            ResolvedStep::Empty => Value::Absent,
        }
    }

    // First-success routing: the first alternative that is neither absent nor
    // an empty string wins. A bare name that resolves to nothing is a failed
    // alternative here, not an assignment.
    fn route(
        &mut self,
        alternatives: &[ResolvedStep],
        env: &mut Environment<'_>,
        last: &Value,
    ) -> Value {
        let mut results = Vec::with_capacity(alternatives.len());
        for alternative in alternatives {
            let result = match alternative {
                ResolvedStep::Bind {
                    name: token,
                }
                | ResolvedStep::Unresolved {
                    token,
                } => {
                    self.trace.warn(ChainError::UnresolvedToken {
                        token: token.clone(),
                    });
                    Value::Absent
                },
                _ => self.evaluate(alternative, env, last),
            };
            if !result.is_vacant() {
                return result;
            }
            results.push(result);
        }
        combine(results)
    }

    // The nested chain sees the caller's bindings through an overlay. Only its
    // result comes back.
    fn enter_voice(
        &mut self,
        name: &str,
        parameters: &[String],
        chain: &str,
        env: &mut Environment<'_>,
        last: &Value,
    ) -> Value {
        let mut child = env.child();
        child.set(INPUT, last.clone());
        for parameter in parameters {
            child.set(parameter.as_str(), last.clone());
        }
        self.execute_voice_chain(name, chain, &mut child, last.clone())
    }

    fn call_primitive(
        &mut self,
        name: &str,
        env: &mut Environment<'_>,
        last: &Value,
    ) -> Value {
        let primitive = match self.resolver.primitives().get(name) {
            Some(primitive) => primitive,
            None => {
                self.trace.warn(ChainError::MissingDefinition {
                    name: name.to_string(),
                });
                return Value::Absent;
            },
        };
        let mut call_env = env.child();
        for alias in PRIMITIVE_ALIASES.iter() {
            call_env.set_if_unbound(alias, last);
        }
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| primitive.call(&mut call_env)));
        match outcome {
            Ok(Ok(value)) => value,
            Ok(Err(error)) => {
                self.trace.warn(ChainError::PrimitiveFailure {
                    name: name.to_string(),
                    message: error.to_string(),
                });
                Value::Absent
            },
            Err(payload) => {
                self.trace.warn(ChainError::PrimitiveFailure {
                    name: name.to_string(),
                    message: panic_message(&*payload),
                });
                Value::Absent
            },
        }
    }
}

/// What a compound step gives when no alternative won outright. Every
/// result is absent or an empty string by then.
pub fn combine(results: Vec<Value>) -> Value {
    let present: Vec<Value> =
        results.into_iter().filter(|r| !r.is_absent()).collect();
    if present.is_empty() {
        return Value::Absent;
    }
    let numbers: Option<Vec<f64>> = present.iter().map(Value::as_f64).collect();
    if let Some(numbers) = numbers {
        return Value::from(numbers.iter().sum::<f64>());
    }
    let strings: Option<Vec<&str>> = present.iter().map(Value::as_str).collect();
    if let Some(strings) = strings {
        return Value::from(strings.concat());
    }
    present.into_iter().next().unwrap_or_default()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panicked".to_string())
}
