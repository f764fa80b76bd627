// IVoice: Interactive Shell for Voice Chains.
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

extern crate linefeed;
extern crate log;
extern crate simple_logger;
extern crate voice_chain;

use linefeed::{Interface, ReadResult};
use log::Level;
use std::{collections::HashMap, env, io, str::FromStr};
use voice_chain::{is_chain_text, Context, Execution, Lexeme, Value};

fn main() -> io::Result<()> {
    let level = env::var("RUST_LOG")
        .ok()
        .and_then(|level| Level::from_str(&level).ok())
        .unwrap_or(Level::Warn);
    if let Err(e) = simple_logger::init_with_level(level) {
        eprintln!("{}", e);
    }
    let root = env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let reader = Interface::new("IVoice")?;
    println!("IVoice Copyright (C) 2019 Charles Johnson.\nThis program comes with ABSOLUTELY NO WARRANTY.\nThis is free software, and you are welcome to redistribute it under certain\nconditions; visit https://www.gnu.org/licenses/gpl-3.0.en.html for more details.");
    reader.set_prompt(">>> ")?;
    let mut shell = Shell::new(Context::new(&root));
    println!(
        "Voices are read from {}",
        shell.context.config().root.display()
    );
    while let ReadResult::Input(input) = reader.read_line()? {
        if !input.trim().is_empty() {
            reader.add_history(input.clone());
        }
        println!("{}", shell.respond(&input));
    }
    println!("Exiting");
    Ok(())
}

struct Shell {
    context: Context,
    show_trace: bool,
}

impl Shell {
    fn new(context: Context) -> Self {
        Self {
            context,
            show_trace: false,
        }
    }

    fn respond(&mut self, line: &str) -> String {
        let line = line.trim();
        let (command, rest) = line
            .find(char::is_whitespace)
            .map_or((line, ""), |i| (&line[..i], line[i..].trim()));
        match command {
            "" => String::new(),
            ":voices" => {
                self.context.load_defaults();
                self.context.store().voice_names().join("\n")
            },
            ":defs" => {
                self.context.load_defaults();
                let mut definitions: Vec<String> = self
                    .context
                    .store()
                    .definitions()
                    .map(|d| format!("{}: {}", d.name, d.fields.join(", ")))
                    .collect();
                definitions.sort();
                definitions.join("\n")
            },
            ":load" => match self.context.load(rest) {
                Ok(()) => String::new(),
                Err(e) => e.to_string(),
            },
            ":trace" => {
                self.show_trace = !self.show_trace;
                format!("trace {}", if self.show_trace { "on" } else { "off" })
            },
            _ if is_chain_text(line) => {
                let execution = self.context.execute_chain(line, HashMap::new());
                self.render(execution)
            },
            name => {
                let execution =
                    self.context.execute_voice_traced(name, parse_inputs(rest));
                self.render(execution)
            },
        }
    }

    fn render(&self, execution: Execution) -> String {
        let mut output = execution.value.to_string();
        if self.show_trace {
            for warning in &execution.warnings {
                output.push_str(&format!("\n  warning: {}", warning));
            }
        }
        output
    }
}

// `key=value` pairs separated by whitespace. A value is read as a literal
// when it looks like one and as plain text otherwise.
fn parse_inputs(text: &str) -> HashMap<String, Value> {
    text.split_whitespace()
        .filter_map(|pair| {
            let equals = pair.find('=')?;
            let (key, value) = (&pair[..equals], &pair[equals + 1..]);
            let value = Lexeme::new(value)
                .literal()
                .unwrap_or_else(|| Value::from(value));
            Some((key.to_string(), value))
        })
        .collect()
}
