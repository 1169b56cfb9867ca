//! Matching precedence across fixed keys, patterns, and the catch-all.

use waymark_engine::{CompiledOptions, Goto, OptionRecord, PatternSpec};

fn goto(name: &str) -> Goto {
    Goto::Node(name.to_string())
}

#[test]
fn numeric_selection_ignores_description_content() {
    let options = vec![
        OptionRecord::auto("First choice", goto("a")),
        OptionRecord::auto("2 misleading text 3", goto("b")),
        OptionRecord::auto("Third", goto("c")),
    ];
    let compiled = CompiledOptions::build(&options).unwrap();
    assert_eq!(compiled.resolve("1").unwrap(), 0);
    assert_eq!(compiled.resolve("2").unwrap(), 1);
    assert_eq!(compiled.resolve("3").unwrap(), 2);
}

#[test]
fn alias_tuple_matches_all_cases() {
    let options = vec![OptionRecord::named(
        ["Attack", "a", "att"],
        Some("Swing away"),
        goto("fight"),
    )];
    let compiled = CompiledOptions::build(&options).unwrap();
    for input in ["Attack", "attack", "a", "att", "ATT"] {
        assert_eq!(compiled.resolve(input).unwrap(), 0, "input {input:?}");
    }
}

#[test]
fn fixed_keys_beat_patterns_and_default() {
    let options = vec![
        OptionRecord::named(["5"], None, goto("fixed")),
        OptionRecord::pattern(PatternSpec::new("[0-9]+"), goto("pattern")),
        OptionRecord::default_catchall(goto("fallback")),
    ];
    let compiled = CompiledOptions::build(&options).unwrap();
    assert_eq!(compiled.resolve("5").unwrap(), 0);
    assert_eq!(compiled.resolve("6").unwrap(), 1);
    assert_eq!(compiled.resolve("six").unwrap(), 2);
}

#[test]
fn earlier_pattern_shadows_later_ones() {
    let options = vec![
        OptionRecord::pattern(PatternSpec::new("*"), goto("wide")),
        OptionRecord::pattern(PatternSpec::new("exact"), goto("narrow")),
    ];
    let compiled = CompiledOptions::build(&options).unwrap();
    // Even the exact text of the later pattern resolves to the earlier one.
    assert_eq!(compiled.resolve("exact").unwrap(), 0);
}

#[test]
fn empty_then_digits_then_catchall() {
    let options = vec![
        OptionRecord::pattern(PatternSpec::new(""), goto("node2")),
        OptionRecord::pattern(PatternSpec::new("[0-9]+"), goto("countnode")),
        OptionRecord::pattern(PatternSpec::new("*"), goto("node3")),
    ];
    let compiled = CompiledOptions::build(&options).unwrap();
    assert_eq!(compiled.resolve("").unwrap(), 0);
    assert_eq!(compiled.resolve("42").unwrap(), 1);
    assert_eq!(compiled.resolve("hello").unwrap(), 2);
}

#[test]
fn input_is_trimmed_before_matching() {
    let options = vec![OptionRecord::named(["go"], None, goto("a"))];
    let compiled = CompiledOptions::build(&options).unwrap();
    assert_eq!(compiled.resolve("  go  ").unwrap(), 0);
}
