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

use crate::errors::ChainError;
use log::warn;

/// Failures that were recovered during an execution instead of being raised.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Trace {
    warnings: Vec<ChainError>,
}

impl Trace {
    pub fn warn(&mut self, error: ChainError) {
        warn!("{}", error);
        self.warnings.push(error);
    }

    pub fn into_warnings(self) -> Vec<ChainError> {
        self.warnings
    }
}

impl Extend<ChainError> for Trace {
    fn extend<I: IntoIterator<Item = ChainError>>(&mut self, errors: I) {
        self.warnings.extend(errors);
    }
}
