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

use thiserror::Error;

pub type ChainResult<T> = Result<T, ChainError>;

/// All the expected ways a step of a chain could fail.
///
/// None of these ever escape `Context::execute_voice`. They are recovered
/// where they happen and kept in the `Trace` of the execution.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum ChainError {
    /// When a referenced voice, primitive or file does not exist.
    #[error("No definition found for `{name}`")]
    MissingDefinition {
        name: String,
    },
    /// When a native function failed internally.
    #[error("Primitive `{name}` failed: {message}")]
    PrimitiveFailure {
        name: String,
        message: String,
    },
    /// When a step token matches nothing known.
    #[error("Could not resolve `{token}`")]
    UnresolvedToken {
        token: String,
    },
    /// When a voice invokes itself, directly or through other voices.
    #[error("Voice `{voice}` invokes itself")]
    CycleDetected {
        voice: String,
    },
    #[error("Could not read `{path}`: {message}")]
    Io {
        path: String,
        message: String,
    },
    /// When a primitive receives an argument it cannot use.
    #[error("Invalid `{key}`: {reason}")]
    InvalidInput {
        key: String,
        reason: String,
    },
}

impl ChainError {
    pub fn io(path: impl AsRef<std::path::Path>, error: &std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            message: error.to_string(),
        }
    }

    pub fn invalid_input(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
