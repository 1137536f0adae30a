// WHY: the find/replace core is a pure function of (RuleSet, text); persistence lives elsewhere
// Rules run longest-find-first over Plain segments only, so replacements never feed later rules

use std::ops::Range;

use tracing::{debug, warn};

pub mod casing;
pub mod matcher;
pub mod segments;

pub use casing::derive_case;
pub use matcher::{is_word_char, LiteralMatcher};
pub use segments::{AnnotatedText, Segment, SegmentKind};

use segments::{first_char, last_char, tail_context};

use crate::error::Error;
use crate::normalize::normalize;
use crate::rules::{Rule, RuleSet};

/// Non-whitespace characters of preceding context handed to the capitalization policy
const CONTEXT_CHARS: usize = 2;

/// A usable rule with its normalized find and compiled matcher
#[derive(Debug, Clone)]
struct CompiledRule {
    find: String,
    replace: String,
    matcher: LiteralMatcher,
}

/// Hits recorded for one rule during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHits {
    pub find: String,
    pub replace: String,
    pub count: usize,
}

/// Everything a replace run produced
#[derive(Debug, Clone)]
pub struct ReplaceReport {
    pub text: AnnotatedText,
    pub match_count: usize,
    /// One entry per applied rule, in application order
    pub hits: Vec<RuleHits>,
    /// Rules that could not be compiled and were left out of the run
    pub skipped: Vec<Error>,
}

/// Compiled form of a rule set, reusable across inputs
#[derive(Debug, Clone)]
pub struct ReplaceEngine {
    mode: String,
    match_case: bool,
    whole_word: bool,
    rules: Vec<CompiledRule>,
    skipped: Vec<Error>,
}

impl ReplaceEngine {
    /// Normalize, filter, order and compile the rules of `rule_set`
    /// A rule that fails to compile is recorded in `skipped`; the rest still run
    pub fn compile(rule_set: &RuleSet) -> Self {
        let mut rules = Vec::with_capacity(rule_set.pairs.len());
        let mut skipped = Vec::new();

        for Rule { find, replace } in &rule_set.pairs {
            let find = normalize(find);
            if find.is_empty() {
                continue;
            }
            match LiteralMatcher::compile(&find, rule_set.match_case) {
                Ok(matcher) => rules.push(CompiledRule {
                    find,
                    replace: replace.clone(),
                    matcher,
                }),
                Err(e) => {
                    warn!(mode = %rule_set.name, find = %find, error = %e, "Skipping unusable rule");
                    skipped.push(e);
                }
            }
        }

        // WHY: stable sort keeps insertion order among equal lengths
        rules.sort_by_key(|rule| std::cmp::Reverse(rule.find.chars().count()));

        debug!(
            mode = %rule_set.name,
            usable = rules.len(),
            skipped = skipped.len(),
            "Compiled rule set"
        );

        Self {
            mode: rule_set.name.clone(),
            match_case: rule_set.match_case,
            whole_word: rule_set.whole_word,
            rules,
            skipped,
        }
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn usable_rules(&self) -> usize {
        self.rules.len()
    }

    pub fn skipped(&self) -> &[Error] {
        &self.skipped
    }

    /// Normalized finds in application order
    pub fn application_order(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.find.as_str())
    }

    /// Apply every rule to `source`
    pub fn run(&self, source: &str) -> Result<ReplaceReport, Error> {
        if source.is_empty() {
            return Err(Error::EmptyInput);
        }
        if self.rules.is_empty() {
            return Err(Error::NoRules {
                mode: self.mode.clone(),
            });
        }

        let normalized = normalize(source);
        let mut text = AnnotatedText::new(normalized.as_str());
        let mut hits = Vec::with_capacity(self.rules.len());
        let mut match_count = 0;

        for rule in &self.rules {
            let count = self.apply_rule(rule, &mut text);
            match_count += count;
            hits.push(RuleHits {
                find: rule.find.clone(),
                replace: rule.replace.clone(),
                count,
            });
        }

        text.verify(&normalized)?;

        debug!(
            mode = %self.mode,
            matches = match_count,
            segments = text.len(),
            "Replace run complete"
        );

        Ok(ReplaceReport {
            text,
            match_count,
            hits,
            skipped: self.skipped.clone(),
        })
    }

    /// Rewrite every acceptable occurrence of one rule in a single left-to-right pass
    ///
    /// Same result as restarting the scan after each replacement: only the Plain run right
    /// before a new replacement can change its whole-word outcome, and it is rescanned.
    fn apply_rule(&self, rule: &CompiledRule, text: &mut AnnotatedText) -> usize {
        let mut old = text.take_segments();
        let source = text.source();
        let mut out: Vec<Segment> = Vec::with_capacity(old.len());
        let mut count = 0;

        for index in 0..old.len() {
            if old[index].is_replaced() {
                out.push(std::mem::take(&mut old[index]));
                continue;
            }
            let span = old[index].source();
            let right = first_char(old[index + 1..].iter().map(|s| s.text(source)));
            count += self.rewrite_run(rule, source, span, right, &mut out);
        }

        text.set_segments(out);
        count
    }

    /// Rewrite one Plain run `span`; `right` is the first character after it
    fn rewrite_run(
        &self,
        rule: &CompiledRule,
        source: &str,
        span: Range<usize>,
        right: Option<char>,
        out: &mut Vec<Segment>,
    ) -> usize {
        let mut count = 0;
        // Start of the part of this run not yet moved into `out`
        let mut pending = span.start;

        while let Some(hit) = self.first_acceptable(rule, source, pending..span.end, pending, right, out) {
            let replacement = self.replacement_for(rule, source, pending, &hit, out);
            // Highest position first
            let mut accepted = vec![(hit, replacement)];

            loop {
                let limit = accepted[accepted.len() - 1].0.start;
                let after = following_char(source, &accepted, span.end, right);
                let Some(found) = self.first_acceptable(rule, source, pending..limit, pending, after, out) else {
                    break;
                };
                let replacement = self.replacement_for(rule, source, pending, &found, out);
                accepted.push((found, replacement));
            }

            for (range, replacement) in accepted.into_iter().rev() {
                if range.start > pending {
                    out.push(Segment::plain(pending..range.start));
                }
                pending = range.end;
                out.push(Segment::replaced(replacement, range));
                count += 1;
            }
        }

        if pending < span.end {
            out.push(Segment::plain(pending..span.end));
        }
        count
    }

    /// First occurrence inside `search` that passes the whole-word check
    ///
    /// `pending..` is still unmoved source text; anything before it lives in `out`.
    /// `right` is the character following `search.end`.
    fn first_acceptable(
        &self,
        rule: &CompiledRule,
        source: &str,
        search: Range<usize>,
        pending: usize,
        right: Option<char>,
        out: &[Segment],
    ) -> Option<Range<usize>> {
        let mut from = search.start;
        while let Some(found) = rule.matcher.find_in(source, from..search.end) {
            if !self.whole_word || is_bounded(source, &found, pending, search.end, right, out) {
                return Some(found);
            }
            // Rejected: resume one character past the rejected start
            let step = source[found.start..].chars().next().map_or(1, char::len_utf8);
            from = found.start + step;
        }
        None
    }

    fn replacement_for(
        &self,
        rule: &CompiledRule,
        source: &str,
        pending: usize,
        found: &Range<usize>,
        out: &[Segment],
    ) -> String {
        let preceding = std::iter::once(&source[pending..found.start])
            .chain(out.iter().rev().map(|s| s.text(source)));
        let context = tail_context(preceding, CONTEXT_CHARS);
        derive_case(&source[found.clone()], &rule.replace, self.match_case, &context)
    }
}

/// Neither neighbour of `found` is a word character
fn is_bounded(
    source: &str,
    found: &Range<usize>,
    pending: usize,
    limit: usize,
    right: Option<char>,
    out: &[Segment],
) -> bool {
    let before = if found.start > pending {
        source[pending..found.start].chars().next_back()
    } else {
        last_char(out.iter().rev().map(|s| s.text(source)))
    };
    let after = if found.end < limit {
        source[found.end..limit].chars().next()
    } else {
        right
    };
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// First character after the lowest entry of `accepted` (kept highest position first)
fn following_char(
    source: &str,
    accepted: &[(Range<usize>, String)],
    span_end: usize,
    right: Option<char>,
) -> Option<char> {
    for (index, (range, replacement)) in accepted.iter().enumerate().rev() {
        if let Some(ch) = replacement.chars().next() {
            return Some(ch);
        }
        let gap_end = if index == 0 { span_end } else { accepted[index - 1].0.start };
        if let Some(ch) = source[range.end..gap_end].chars().next() {
            return Some(ch);
        }
    }
    right
}

/// Apply `rules` to `source`, returning the annotated result and the number of replacements
pub fn apply(rules: &RuleSet, source: &str) -> Result<(AnnotatedText, usize), Error> {
    let report = ReplaceEngine::compile(rules).run(source)?;
    Ok((report.text, report.match_count))
}
