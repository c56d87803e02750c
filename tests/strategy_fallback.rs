//! The chain is a fixed-priority cascade: inputs the strict structured
//! strategy cannot handle must still convert through a later strategy.

use phpjson::{locate, normalize::normalize, parse, ScalarValue};

#[test]
fn unterminated_literal_falls_through_to_the_tokenizer() {
    // No balanced close, so no span for the structured strategy, but the
    // anchor position is enough for the forward scan.
    let input = "return [\n'a' => 'b',\n'c' => 'd',\n";
    assert!(locate::locate_span(&normalize(input)).is_none());

    let record = parse(input).unwrap();
    assert_eq!(record.get("a"), Some(&ScalarValue::Str("b".to_string())));
    assert_eq!(record.get("c"), Some(&ScalarValue::Str("d".to_string())));
}

#[test]
fn anchorless_pairs_fall_through_to_the_line_machine() {
    // Neither the span locator nor the loose anchors match, so the first
    // two strategies are out; the line-oriented state machine enters the
    // array state on the first arrow and picks up the pairs.
    let input = "'a' => 'b',\n'c' => 'd',\n";
    let cleaned = normalize(input);
    assert!(locate::locate_span(&cleaned).is_none());
    assert!(locate::anchor_offset(&cleaned).is_none());

    let record = parse(input).unwrap();
    assert_eq!(record.len(), 2);
    assert_eq!(record.get("c"), Some(&ScalarValue::Str("d".to_string())));
}

#[test]
fn single_line_anchorless_nested_value_reaches_the_global_scan() {
    // One line, no anchor, and a nested value: the line machine only
    // accepts quoted values, so this is satisfied by the final
    // nested-aware global scan.
    let input = "'menu' => ['home' => 'Home']";
    let record = parse(input).unwrap();
    assert_eq!(
        record.get("menu"),
        Some(&ScalarValue::Nested("'home' => 'Home'".to_string()))
    );
}

#[test]
fn conventional_variable_assignment_parses_end_to_end() {
    let input = "<?php\n$translations = array(\n'yes' => 'Ja',\n'no' => 'Nein'\n);";
    let record = parse(input).unwrap();
    let keys: Vec<&str> = record.keys().collect();
    assert_eq!(keys, vec!["yes", "no"]);
}
