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
    constants::COMMENT_MARKERS,
    definitions::{Definition, Voice},
    lexer::{is_identifier, Category, Lexeme},
    parser::is_chain_text,
    value::Value,
};
use log::debug;

/// One recognised line of a definition file.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Definition(Definition),
    Voice(Voice),
    Include(String),
}

/// Reads a single line. Blank lines, comments and malformed lines give `None`.
pub fn parse_line(line: &str) -> Option<Declaration> {
    let line = line.trim();
    if line.is_empty()
        || COMMENT_MARKERS.iter().any(|marker| line.starts_with(marker))
    {
        return None;
    }
    let (keyword, rest) = split_keyword(line);
    let declaration = match keyword {
        "def" => parse_definition(rest),
        "voice" => parse_voice(rest),
        "include" => parse_include(rest),
        _ => None,
    };
    if declaration.is_none() {
        debug!("Skipping malformed line: {}", line);
    }
    declaration
}

fn split_keyword(line: &str) -> (&str, &str) {
    line.find(char::is_whitespace)
        .map_or((line, ""), |i| (&line[..i], line[i..].trim_start()))
}

// def <name> { <fields> }
fn parse_definition(rest: &str) -> Option<Declaration> {
    let (name, fields) = match rest.find('{') {
        Some(open) => {
            let close = rest.rfind('}')?;
            if close < open {
                return None;
            }
            (rest[..open].trim(), &rest[open + 1..close])
        },
        None => (rest.trim(), ""),
    };
    if !is_identifier(name) {
        return None;
    }
    Some(Declaration::Definition(Definition {
        name: name.to_string(),
        fields: fields
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .map(String::from)
            .collect(),
    }))
}

// voice <name> / <body> or voice <name>(<parameters>) / <body>
fn parse_voice(rest: &str) -> Option<Declaration> {
    let slash = rest.find('/')?;
    let (name, parameters) = parse_voice_head(rest[..slash].trim())?;
    let body = rest[slash + 1..].trim();
    let voice = if is_chain_text(body) {
        Voice::chain(name, body)
    } else {
        let lexeme = Lexeme::new(body);
        match lexeme.category {
            Category::Empty => return None,
            _ => Voice::literal(
                name,
                lexeme.literal().unwrap_or_else(|| Value::from(body)),
            ),
        }
    };
    Some(Declaration::Voice(voice.with_parameters(parameters)))
}

fn parse_voice_head(head: &str) -> Option<(&str, Vec<String>)> {
    let (name, parameters) = match head.find('(') {
        Some(open) => {
            let inner = head[open + 1..].strip_suffix(')')?;
            let parameters = inner
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect::<Vec<_>>();
            if !parameters.iter().all(|p| is_identifier(p)) {
                return None;
            }
            (head[..open].trim(), parameters)
        },
        None => (head, Vec::new()),
    };
    if name.is_empty() || name.contains(char::is_whitespace) {
        None
    } else {
        Some((name, parameters))
    }
}

fn parse_include(rest: &str) -> Option<Declaration> {
    let path = rest.trim().trim_matches(|c| c == '"' || c == '\'');
    if path.is_empty() {
        None
    } else {
        Some(Declaration::Include(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_line, Declaration};
    use crate::{
        definitions::{Definition, Voice},
        value::Value,
    };

    #[test]
    fn chain_voice() {
        assert_eq!(
            parse_line("voice greet / {name -> upper}"),
            Some(Declaration::Voice(Voice::chain("greet", "{name -> upper}")))
        );
    }

    #[test]
    fn literal_voices() {
        assert_eq!(
            parse_line("voice motto / \"keep going\""),
            Some(Declaration::Voice(Voice::literal("motto", "keep going")))
        );
        assert_eq!(
            parse_line("voice answer / 42"),
            Some(Declaration::Voice(Voice::literal("answer", 42)))
        );
        assert_eq!(
            parse_line("voice unit / metres"),
            Some(Declaration::Voice(Voice::literal(
                "unit",
                Value::from("metres")
            )))
        );
    }

    #[test]
    fn voice_with_parameters() {
        assert_eq!(
            parse_line("voice scale(x, factor) / {x -> identity}"),
            Some(Declaration::Voice(
                Voice::chain("scale", "{x -> identity}")
                    .with_parameters(vec!["x".into(), "factor".into()])
            ))
        );
        assert_eq!(parse_line("voice scale(x y) / {x}"), None);
    }

    #[test]
    fn definition_fields() {
        assert_eq!(
            parse_line("def cell { mass, volume density }"),
            Some(Declaration::Definition(Definition {
                name: "cell".into(),
                fields: vec!["mass".into(), "volume".into(), "density".into()],
            }))
        );
    }

    #[test]
    fn include_strips_quotes() {
        assert_eq!(
            parse_line("include \"shared/core.voices\""),
            Some(Declaration::Include("shared/core.voices".into()))
        );
    }

    #[test]
    fn comments_and_malformed_lines_are_skipped() {
        assert_eq!(parse_line("# voice a / 1"), None);
        assert_eq!(parse_line("// voice a / 1"), None);
        assert_eq!(parse_line("voice missing_slash {a}"), None);
        assert_eq!(parse_line("voice empty /"), None);
        assert_eq!(parse_line("compose a b"), None);
        assert_eq!(parse_line("   "), None);
    }
}
