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

#[macro_use]
extern crate maplit;
#[macro_use]
extern crate proptest;
#[macro_use]
extern crate test_voice_chain;
extern crate voice_chain;

use std::collections::HashMap;
use voice_chain::{
    parse_chain, ChainError, ChainResult, Config, Context, Environment, Value,
};

fn context() -> Context {
    Context::with_config(Config::new(".").without_lazy_load())
}

fn inputs(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

proptest! {
    // Separators and surrounding whitespace never end up in a step token.
    #[test]
    fn parser_round_trip(
        a in "[a-z_][a-z0-9_]{0,8}",
        b in "[a-z_][a-z0-9_]{0,8}",
        c in "[a-z_][a-z0-9_]{0,8}",
        space in " {0,3}",
    ) {
        let chain = format!("{{{}{s}->{s}{}{s}->{s}{}}}", a, b, c, s = space);
        prop_assert_eq!(parse_chain(&chain), vec![a, b, c]);
    }
    // A bare name that resolves to nothing evaluates to itself.
    #[test]
    fn unknown_name_is_its_own_text(name in "[a-z_][a-z0-9_]{0,8}") {
        assume_identifier!(name);
        let mut cont = context();
        let execution = cont.execute_chain(&format!("{{{}}}", name), HashMap::new());
        prop_assert_eq!(execution.value, Value::from(name.as_str()));
        prop_assert_eq!(
            execution.warnings,
            vec![ChainError::UnresolvedToken { token: name }]
        );
    }
    // Calling one voice from another gives what calling it directly gives.
    #[test]
    fn nested_voice_matches_direct_call(
        outer in "[a-z_][a-z0-9_]{0,8}",
        inner in "[a-z_][a-z0-9_]{0,8}",
        word in "[a-z]{1,8}",
    ) {
        assume_identifiers!(outer, inner);
        prop_assume!(outer != inner);
        let mut cont = context();
        declare_voice!(cont, inner, "{upper}");
        declare_voice!(cont, outer, format!("{{{}}}", inner));
        let direct = cont.execute_voice(&inner, inputs(&[("input", Value::from(word.as_str()))]));
        let nested = cont.execute_voice(&outer, inputs(&[("input", Value::from(word.as_str()))]));
        prop_assert_eq!(nested, direct);
    }
}

#[test]
fn inputs_shadow_primitives() {
    let mut cont = context();
    cont.register_primitive("x", |_| Ok(Value::from(1)));
    let execution = cont.execute_chain("{x}", inputs(&[("x", Value::from(2))]));
    assert_eq!(execution.value, Value::from(2));
    assert_eq!(cont.execute_chain("{x}", HashMap::new()).value, Value::from(1));
}

#[test]
fn apostrophe_in_a_bare_step_stays_in_that_step() {
    let mut cont = context();
    let execution = cont.execute_chain("{'abc' -> it's -> upper}", HashMap::new());
    assert_eq!(execution.value, Value::from("IT'S"));
    assert_eq!(
        execution.warnings,
        vec![ChainError::UnresolvedToken {
            token: "it's".into()
        }]
    );
}

#[test]
fn exponent_sign_is_not_an_alternative() {
    let mut cont = context();
    let execution = cont.execute_chain("{1e+2}", HashMap::new());
    assert_eq!(execution.value, Value::from(100.0));
    assert!(execution.warnings.is_empty());
}

#[test]
fn voices_shadow_primitives() {
    let mut cont = context();
    cont.load_str("voice upper / 'not a primitive'");
    assert_eq!(
        cont.execute_chain("{'abc' -> upper}", HashMap::new()).value,
        Value::from("not a primitive")
    );
}

#[test]
fn first_success_routing() {
    let mut cont = context();
    assert_eq!(
        cont.execute_chain("{\"\" + \"\" + \"hello\"}", HashMap::new()).value,
        Value::from("hello")
    );
    assert_eq!(
        cont.execute_chain("{'' + ''}", HashMap::new()).value,
        Value::from("")
    );
}

#[test]
fn unmatched_alternatives_fall_through() {
    let mut cont = context();
    cont.load_str("voice nickname / {alias + 'friend'}");
    let execution = cont.execute_voice_traced("nickname", HashMap::new());
    assert_eq!(execution.value, Value::from("friend"));
    assert_eq!(
        execution.warnings,
        vec![ChainError::UnresolvedToken {
            token: "alias".into()
        }]
    );
    let named = cont.execute_voice(
        "nickname",
        inputs(&[("alias", Value::from("Bea"))]),
    );
    assert_eq!(named, Value::from("Bea"));
}

#[test]
fn bare_name_binds_the_previous_result() {
    let mut cont = context();
    let execution = cont.execute_chain(
        "{'quiet' -> word -> upper -> word}",
        HashMap::new(),
    );
    assert_eq!(execution.value, Value::from("quiet"));
    assert!(execution.warnings.is_empty());
}

#[test]
fn failing_primitives_are_absent() {
    let mut cont = context();
    cont.register_primitive("refuse", |_| -> ChainResult<Value> {
        Err(ChainError::invalid_input("input", "refused"))
    });
    cont.register_primitive("explode", |_| -> ChainResult<Value> {
        panic!("exploded")
    });
    let refused = cont.execute_chain("{'a' -> refuse}", HashMap::new());
    assert_eq!(refused.value, Value::Absent);
    assert!(matches!(
        refused.warnings[..],
        [ChainError::PrimitiveFailure { .. }]
    ));
    let exploded = cont.execute_chain("{'a' -> explode}", HashMap::new());
    assert_eq!(exploded.value, Value::Absent);
    assert_eq!(
        exploded.warnings,
        vec![ChainError::PrimitiveFailure {
            name: "explode".into(),
            message: "exploded".into(),
        }]
    );
    assert_eq!(
        cont.execute_chain("{'a' -> explode + 'b'}", HashMap::new()).value,
        Value::from("b")
    );
}

#[test]
fn calls_do_not_leak_into_each_other() {
    let mut cont = context();
    cont.load_str("voice remember / {stash}\nvoice recall / {stash}");
    assert_eq!(
        cont.execute_voice("remember", inputs(&[("input", Value::from("secret"))])),
        Value::from("secret")
    );
    assert_eq!(
        cont.execute_voice("recall", HashMap::new()),
        Value::from("stash")
    );
}

#[test]
fn primitive_writes_are_discarded() {
    let mut cont = context();
    cont.register_primitive("scribble", |env: &mut Environment<'_>| {
        env.set("scribbled", true);
        Ok(Value::from("done"))
    });
    let execution =
        cont.execute_chain("{scribble -> scribbled}", HashMap::new());
    assert_eq!(execution.value, Value::from("done"));
}

#[test]
fn cycles_are_cut() {
    let mut cont = context();
    cont.load_str("voice ping / {pong}\nvoice pong / {ping}");
    let execution = cont.execute_voice_traced("ping", HashMap::new());
    assert_eq!(execution.value, Value::Absent);
    assert_eq!(
        execution.warnings,
        vec![ChainError::CycleDetected {
            voice: "ping".into()
        }]
    );
}

#[test]
fn self_reference_is_a_cycle() {
    let mut cont = context();
    cont.load_str("voice again / {'x' -> again + 'fallback'}");
    let execution = cont.execute_voice_traced("again", HashMap::new());
    assert_eq!(execution.value, Value::from("fallback"));
    assert!(matches!(
        execution.warnings[..],
        [ChainError::CycleDetected { .. }]
    ));
}

#[test]
fn child_bindings_stay_in_the_child() {
    let parent: Environment<'_> = hashmap! {
        "shared".to_string() => Value::from(1),
    }
    .into();
    let mut child = parent.child();
    child.set("local", 2);
    child.set("shared", 3);
    assert_eq!(child.get("shared"), Some(&Value::from(3)));
    assert_eq!(parent.get("shared"), Some(&Value::from(1)));
    assert_eq!(parent.get("local"), None);
}
