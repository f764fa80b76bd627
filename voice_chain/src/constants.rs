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

/// Separator between the steps of a chain.
pub const STEP_SEPARATOR: &str = "->";
/// Separator between the alternatives of a compound step.
pub const ALTERNATIVE_SEPARATOR: char = '+';

/// Environment key holding the result of the most recent step.
pub const LAST: &str = "last";
/// Environment key holding the value a chain was entered with.
pub const INPUT: &str = "input";

/// Keys that receive the previous result before a primitive is called, if
/// they are not already bound.
pub const PRIMITIVE_ALIASES: [&str; 4] = [INPUT, "path", "file", "line"];

pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_EXTENSION: &str = "voices";

pub const COMMENT_MARKERS: [&str; 2] = ["#", "//"];

pub const CRITICAL_LINE: f64 = 0.5;
pub const ZERO_SEARCH_SAMPLES: usize = 512;
pub const NEWTON_ITERATIONS: usize = 32;
pub const ZERO_TOLERANCE: f64 = 1e-9;
pub const DEDUP_TOLERANCE: f64 = 1e-6;
pub const DEFAULT_REGION: (f64, f64) = (0.0, 50.0);
