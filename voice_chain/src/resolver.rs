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
    definitions::{DefinitionStore, VoiceBody},
    environment::Environment,
    lexer::{Category, Lexeme},
    parser::split_alternatives,
    primitives::PrimitiveRegistry,
    value::Value,
};
use log::debug;

/// What a step token denotes, decided before anything is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedStep {
    /// Two or more `+` alternatives, tried in order.
    Compound(Vec<ResolvedStep>),
    /// A key already bound in the environment.
    InputBound {
        name: String,
        value: Value,
    },
    /// A voice whose body is chain text.
    VoiceChain {
        name: String,
        parameters: Vec<String>,
        chain: String,
    },
    /// A voice whose body is a terminal value.
    VoiceLiteral {
        name: String,
        value: Value,
    },
    /// A registered primitive, called later with the live environment.
    PrimitiveCall {
        name: String,
    },
    /// A quoted string, a number or a boolean written in the chain.
    Literal(Value),
    /// A bare identifier that names nothing. It receives the previous result.
    Bind {
        name: String,
    },
    /// Anything else. Evaluates to its own text.
    Unresolved {
        token: String,
    },
    Empty,
}

/// Resolves tokens against one store and one registry. Neither changes while
/// a `Resolver` borrows them.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    store: &'r DefinitionStore,
    primitives: &'r PrimitiveRegistry,
}

impl<'r> Resolver<'r> {
    pub const fn new(
        store: &'r DefinitionStore,
        primitives: &'r PrimitiveRegistry,
    ) -> Self {
        Self {
            store,
            primitives,
        }
    }

    pub const fn store(&self) -> &'r DefinitionStore {
        self.store
    }

    pub const fn primitives(&self) -> &'r PrimitiveRegistry {
        self.primitives
    }

    pub fn resolve(&self, token: &str, env: &Environment<'_>) -> ResolvedStep {
        let alternatives = split_alternatives(token);
        let step = if alternatives.len() > 1 {
            ResolvedStep::Compound(
                alternatives
                    .iter()
                    .map(|alternative| self.resolve_single(alternative, env))
                    .collect(),
            )
        } else {
            self.resolve_single(token.trim(), env)
        };
        debug!("resolve({:?}) = {:?}", token, step);
        step
    }

    // Inputs shadow voices, voices shadow primitives, and only then is the
    // token read as a literal.
    fn resolve_single(&self, token: &str, env: &Environment<'_>) -> ResolvedStep {
        if let Some(value) = env.get(token) {
            return ResolvedStep::InputBound {
                name: token.to_string(),
                value: value.clone(),
            };
        }
        if let Some(voice) = self.store.lookup(token) {
            return match &voice.body {
                VoiceBody::Chain(chain) => ResolvedStep::VoiceChain {
                    name: voice.name.clone(),
                    parameters: voice.parameters.clone(),
                    chain: chain.clone(),
                },
                VoiceBody::Literal(value) => ResolvedStep::VoiceLiteral {
                    name: voice.name.clone(),
                    value: value.clone(),
                },
            };
        }
        if self.primitives.contains(token) {
            return ResolvedStep::PrimitiveCall {
                name: token.to_string(),
            };
        }
        let lexeme = Lexeme::new(token);
        match lexeme.category {
            Category::Empty => ResolvedStep::Empty,
            Category::Identifier => ResolvedStep::Bind {
                name: token.to_string(),
            },
            Category::Other => ResolvedStep::Unresolved {
                token: token.to_string(),
            },
            Category::Quoted | Category::Number | Category::Boolean => lexeme
                .literal()
                .map_or_else(
                    || ResolvedStep::Unresolved {
                        token: token.to_string(),
                    },
                    ResolvedStep::Literal,
                ),
        }
    }
}
