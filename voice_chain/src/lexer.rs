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

use crate::value::Value;

#[derive(Debug, PartialEq)]
pub struct Lexeme<'a> {
    pub text: &'a str,
    pub category: Category,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Category {
    Empty,
    /// Text wrapped in matching single or double quotes.
    Quoted,
    Number,
    Boolean,
    /// Letters, digits and underscores, not starting with a digit.
    Identifier,
    Other,
}

impl<'a> Lexeme<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            category: categorise(text),
        }
    }

    /// The value written by a literal lexeme. `None` for identifiers and
    /// anything else that has to be looked up.
    pub fn literal(&self) -> Option<Value> {
        match self.category {
            Category::Quoted => {
                Some(Value::from(&self.text[1..self.text.len() - 1]))
            },
            Category::Number => self.text.parse::<f64>().ok().map(Value::from),
            Category::Boolean => Some(Value::from(self.text == "true")),
            Category::Empty | Category::Identifier | Category::Other => None,
        }
    }
}

fn categorise(text: &str) -> Category {
    if text.is_empty() {
        Category::Empty
    } else if is_quoted(text) {
        Category::Quoted
    } else if is_number(text) {
        Category::Number
    } else if text == "true" || text == "false" {
        Category::Boolean
    } else if is_identifier(text) {
        Category::Identifier
    } else {
        Category::Other
    }
}

fn is_quoted(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) => {
            open == close && (open == '"' || open == '\'')
        },
        _ => false,
    }
}

// Excludes words such as `inf` and `NaN` that `f64` would otherwise accept.
fn is_number(text: &str) -> bool {
    let digits = text.trim_start_matches(|c| c == '-' || c == '+');
    digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && digits.chars().any(|c| c.is_ascii_digit())
        && text.parse::<f64>().is_ok()
}

/// ASCII letters, digits and underscores, not starting with a digit.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .map_or(false, |first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
