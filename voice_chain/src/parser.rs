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

use crate::constants::{ALTERNATIVE_SEPARATOR, STEP_SEPARATOR};
use log::debug;

/// Splits chain text into its step tokens.
///
/// One leading `{` and one trailing `}` are stripped, then the body is split
/// on `->`. Nested chains are never written inline, they are referenced by
/// voice name, so no brace matching is needed. An empty body gives a single
/// empty token.
pub fn parse_chain(text: &str) -> Vec<String> {
    let body = strip_braces(text.trim());
    let tokens: Vec<String> = split_outside_quotes(body, STEP_SEPARATOR)
        .into_iter()
        .map(|piece| piece.trim().to_string())
        .collect();
    debug!("parse_chain({:?}) = {:?}", text, tokens);
    tokens
}

/// Splits one step into the alternatives of a compound expression. A step
/// without `+` gives a single alternative. The `+` of an exponent such as
/// `1e+2` does not split.
pub fn split_alternatives(token: &str) -> Vec<String> {
    let mut separator = [0; 4];
    split_outside_quotes(token, ALTERNATIVE_SEPARATOR.encode_utf8(&mut separator))
        .into_iter()
        .map(|piece| piece.trim().to_string())
        .collect()
}

pub fn is_chain_text(text: &str) -> bool {
    let text = text.trim();
    text.starts_with('{') && text.ends_with('}')
}

fn strip_braces(text: &str) -> &str {
    let text = text.strip_prefix('{').unwrap_or(text);
    text.strip_suffix('}').unwrap_or(text)
}

// A quote only opens a literal at the start of a piece, so apostrophes inside
// bare words never suppress splitting. Unbalanced quotes give a plain split.
fn split_outside_quotes<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    split_quoted(text, separator).unwrap_or_else(|| split_plain(text, separator))
}

fn split_quoted<'a>(text: &'a str, separator: &str) -> Option<Vec<&'a str>> {
    let mut pieces = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut skip_until = 0;
    for (index, letter) in text.char_indices() {
        if index < skip_until {
            continue;
        }
        match quote {
            Some(q) => {
                if q == letter {
                    quote = None;
                }
            },
            None if (letter == '"' || letter == '\'')
                && text[start..index].trim().is_empty() =>
            {
                quote = Some(letter)
            },
            None => {
                if is_separator_at(text, start, index, separator) {
                    pieces.push(&text[start..index]);
                    start = index + separator.len();
                    skip_until = start;
                }
            },
        }
    }
    if quote.is_some() {
        return None;
    }
    pieces.push(&text[start..]);
    Some(pieces)
}

fn split_plain<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut index = 0;
    while let Some(offset) = text[index..].find(separator) {
        let at = index + offset;
        index = at + separator.len();
        if is_separator_at(text, start, at, separator) {
            pieces.push(&text[start..at]);
            start = index;
        }
    }
    pieces.push(&text[start..]);
    pieces
}

// A `+` between the mantissa and the exponent of a number such as `1e+2`
// belongs to the number.
fn is_separator_at(
    text: &str,
    start: usize,
    index: usize,
    separator: &str,
) -> bool {
    if !text[index..].starts_with(separator) {
        return false;
    }
    if separator != "+" {
        return true;
    }
    let piece = text[start..index].trim_start();
    let exponent_follows =
        text[index + 1..].starts_with(|c: char| c.is_ascii_digit());
    !(exponent_follows && is_mantissa(piece))
}

fn is_mantissa(piece: &str) -> bool {
    match piece.strip_suffix(|c| c == 'e' || c == 'E') {
        Some(mantissa) => {
            mantissa
                .trim_start_matches('-')
                .starts_with(|c: char| c.is_ascii_digit() || c == '.')
                && mantissa.parse::<f64>().is_ok()
        },
        None => false,
    }
}
