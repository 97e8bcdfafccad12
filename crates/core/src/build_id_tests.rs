// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_well_formed_id() {
    let id = BuildId::parse("240101.123.4").unwrap();
    assert_eq!(id.date, "240101");
    assert_eq!(id.random, "123");
    assert_eq!(id.counter, 4);
}

#[yare::parameterized(
    too_few_parts = { "240101.123" },
    too_many_parts = { "240101.123.4.5" },
    non_integer_counter = { "240101.123.abc" },
    empty_string = { "" },
)]
fn rejects_malformed_input(raw: &str) {
    assert!(BuildId::parse(raw).is_err());
}

#[test]
fn render_is_inverse_of_parse() {
    let raw = "240101.123.4";
    let id = BuildId::parse(raw).unwrap();
    assert_eq!(id.render(), raw);
}

#[test]
fn next_with_none_generates_counter_one() {
    let id = BuildId::next("240102", None);
    assert_eq!(id.date, "240102");
    assert_eq!(id.counter, 1);
    assert_eq!(id.random.len(), 3);
}

#[test]
fn next_same_date_increments_counter_and_keeps_random() {
    let prev = BuildId::parse("240101.123.4").unwrap();
    let next = BuildId::next("240101", Some(&prev));
    assert_eq!(next, BuildId::parse("240101.123.5").unwrap());
}

#[test]
fn next_different_date_resets_counter_with_fresh_random() {
    let prev = BuildId::parse("240101.123.4").unwrap();
    let next = BuildId::next("240102", Some(&prev));
    assert_eq!(next.date, "240102");
    assert_eq!(next.counter, 1);
    // Not guaranteed different from prev.random, but must still be 3 digits.
    assert_eq!(next.random.len(), 3);
}
