// End-to-end replace behaviour through the public operation surface
// WHY: Each testable property of the engine is checked on realistic prose, not only unit inputs

use swapmark::engine::ReplaceEngine;
use swapmark::{apply, normalize, replace, RuleSet};

#[path = "integration/fixtures/mod.rs"]
mod fixtures;
use fixtures::*;

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::{assert_golden_text, settings_with};

fn plain(rules: RuleSet, text: &str) -> (String, usize) {
    let (annotated, count) = apply(&rules, text).expect("replace should succeed");
    (annotated.plain_text(), count)
}

#[test]
fn test_dialogue_golden_output() {
    let rules = RuleSet::new("default")
        .with_flags(false, true)
        .with_rule("he", "she")
        .with_rule("cat", "fox");
    let settings = settings_with(rules);

    let output = replace(&settings, "default", DIALOGUE_TEXT).expect("replace should succeed");
    assert_golden_text(&output.plain_text, DIALOGUE_EXPECTED, "dialogue");
    assert_eq!(output.match_count, 5);
}

#[test]
fn test_vietnamese_golden_output() {
    let rules = RuleSet::new("vi").with_flags(false, true).with_rule("em", "cô ấy");
    let settings = settings_with(rules);

    let output = replace(&settings, "vi", VIETNAMESE_TEXT).expect("replace should succeed");
    assert_eq!(output.plain_text, VIETNAMESE_EXPECTED);
    assert_eq!(output.match_count, 3);
}

#[test]
fn test_longest_match_precedence() {
    let rules = RuleSet::new("m")
        .with_flags(true, false)
        .with_rule("ab", "X")
        .with_rule("abc", "Y");
    assert_eq!(plain(rules, "abc"), ("Y".to_string(), 1));
}

#[test]
fn test_whole_word_boundary() {
    let rules = RuleSet::new("m").with_flags(false, true).with_rule("cat", "dog");
    assert_eq!(plain(rules.clone(), "concatenate"), ("concatenate".to_string(), 0));
    assert_eq!(plain(rules, "the cat ran"), ("the dog ran".to_string(), 1));
}

#[test]
fn test_case_preservation() {
    let rules = RuleSet::new("m").with_rule("hello", "hi");
    assert_eq!(plain(rules.clone(), "HELLO world").0, "HI world");
    assert_eq!(plain(rules, "Hello world").0, "Hi world");
}

#[test]
fn test_context_capitalization() {
    let rules = RuleSet::new("m").with_rule("he", "she");
    assert_eq!(plain(rules, "Stop. he left.").0, "Stop. She left.");
}

#[test]
fn test_match_case_keeps_replacement_literal() {
    let rules = RuleSet::new("m").with_flags(true, false).with_rule("he", "she");
    // "He" does not match case-sensitively, "he" after the period stays lowercase
    assert_eq!(plain(rules, "He ran. he hid.").0, "He ran. she hid.");
}

#[test]
fn test_segments_cover_source_exactly_once() {
    let rules = RuleSet::new("m")
        .with_rule("he", "she")
        .with_rule("cat", "fox")
        .with_rule("e", "")
        .with_rule("the", "a");
    let (annotated, count) = apply(&rules, DIALOGUE_TEXT).expect("replace should succeed");
    let normalized = normalize(DIALOGUE_TEXT);
    annotated.verify(&normalized).expect("segments should tile the source");
    assert_eq!(annotated.replaced_count(), count);

    let covered: usize = annotated.segments().iter().map(|s| s.source().len()).sum();
    assert_eq!(covered, normalized.len());
}

#[test]
fn test_markup_highlights_each_replacement() {
    let rules = RuleSet::new("default").with_rule("cat", "<fox>");
    let settings = settings_with(rules);
    let output = replace(&settings, "default", "a cat & a CAT").expect("replace should succeed");
    assert_eq!(
        output.markup,
        "a <mark class=\"hl-yellow\">&lt;fox&gt;</mark> &amp; a <mark class=\"hl-yellow\">&lt;FOX&gt;</mark>"
    );
    assert_eq!(output.plain_text, "a <fox> & a <FOX>");
}

#[test]
fn test_engine_reuse_across_inputs() {
    let rules = RuleSet::new("m").with_flags(false, true).with_rule("colour", "color");
    let engine = ReplaceEngine::compile(&rules);

    let first = engine.run("Colour me blue").expect("first run");
    let second = engine.run("no match here").expect("second run");
    assert_eq!(first.text.plain_text(), "Color me blue");
    assert_eq!(second.match_count, 0);
    assert_eq!(second.text.plain_text(), "no match here");
}

#[test]
fn test_blank_lines_collapsed_in_plain_output() {
    let rules = RuleSet::new("default").with_rule("x", "y");
    let settings = settings_with(rules);
    let output = replace(&settings, "default", "x\n\n\n\nx").expect("replace should succeed");
    assert_eq!(output.plain_text, "Y\n\nY");
}

#[test]
fn test_unusable_rule_skipped_others_applied() {
    // Far beyond the pattern size limit once case folding expands every character
    let oversized = "\u{1EC7}".repeat(400_000);
    let rules = RuleSet::new("default")
        .with_rule(oversized.as_str(), "never")
        .with_rule("cat", "dog");
    let settings = settings_with(rules);

    let output = replace(&settings, "default", "a cat").expect("valid rule should still run");
    assert_eq!(output.plain_text, "a dog");
    assert_eq!(output.match_count, 1);
    assert_eq!(output.skipped_rules.len(), 1);
    assert_eq!(output.skipped_rules[0].kind(), swapmark::ErrorKind::InvalidRule);
    assert!(output.skipped_rules[0].is_skippable());
}
