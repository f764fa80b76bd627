/*  Library for the Voice Chain interpreter.
    Copyright (C) 2019 Charles Johnson

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program. If not, see <http://www.gnu.org/licenses/>.
*/

//! # Interpreter for voice chains
//! A voice is a named value. Its body is either a terminal value or a chain
//! such as `{read_file -> trim -> upper}`: steps separated by `->` that are run
//! left to right, each step receiving the result of the one before it.
//!
//! A step token is resolved, in order of precedence, as a key bound in the
//! current environment, the name of another voice, the name of a registered
//! primitive, or a literal. A step of the form `a + b + c` tries each
//! alternative in turn and keeps the first result that is neither absent nor
//! an empty string.
//!
//! Voices are declared in line-oriented definition files that a `Context`
//! loads from its root directory the first time it executes anything.
//! Failures never escape an execution. A missing voice, a failing primitive
//! or a cycle between voices yields `Value::Absent` and is reported as a
//! warning.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use voice_chain::{Config, Context, Value};
//!
//! let mut context = Context::with_config(Config::new(".").without_lazy_load());
//! context.load_str("voice shout / {trim -> upper}");
//! context.load_str("voice greeting / \"hello\"");
//!
//! // The input seeds the chain
//! let mut inputs = HashMap::new();
//! inputs.insert("input".to_string(), Value::from("  hey "));
//! assert_eq!(context.execute_voice("shout", inputs), Value::from("HEY"));
//!
//! // Literal voices evaluate to their value
//! assert_eq!(
//!     context.execute_voice("greeting", HashMap::new()),
//!     Value::from("hello")
//! );
//!
//! // Unknown voices are absent rather than errors
//! assert_eq!(context.execute_voice("missing", HashMap::new()), Value::Absent);
//!
//! // The first alternative that gives something wins
//! let execution =
//!     context.execute_chain("{\"\" + \"\" + \"hello\"}", HashMap::new());
//! assert_eq!(execution.value, Value::from("hello"));
//! ```

/// Primitives every new `Context` starts with.
mod builtins;

/// Where definition files live and how the built-ins are tuned.
mod config;

/// Names and tuning values shared across the interpreter.
mod constants;

/// The owner of definitions and primitives, and the entry point for executing voices.
mod context;

/// Single lines of the definition file format.
mod declaration;

/// Voices, field definitions and the store that loads them.
mod definitions;

/// Layered key-value bindings that steps read from and write to.
mod environment;

/// The ways an execution can go wrong. None of them escape `Context`.
mod errors;

/// Runs chains step by step.
mod evaluator;

/// Classifies single step tokens.
mod lexer;

/// Splits chain text into step tokens.
mod parser;

/// Native functions callable from chains.
mod primitives;

/// Decides what each step token denotes.
mod resolver;

/// Recovered failures of one execution.
mod trace;

/// The values that flow between steps.
mod value;

/// Root finding for Dirichlet-style series built from a spectrum.
pub mod zeros;

pub use config::Config;
pub use context::{Context, Execution};
pub use declaration::{parse_line, Declaration};
pub use definitions::{Definition, DefinitionStore, Voice, VoiceBody};
pub use environment::Environment;
pub use errors::{ChainError, ChainResult};
pub use evaluator::{combine, Evaluator};
pub use lexer::{Category, Lexeme};
pub use parser::{is_chain_text, parse_chain, split_alternatives};
pub use primitives::{argument, text_argument, Primitive, PrimitiveRegistry};
pub use resolver::{ResolvedStep, Resolver};
pub use trace::Trace;
pub use value::Value;
pub use zeros::{find_zeros, DirichletSeries, Zero, ZeroSearch};
