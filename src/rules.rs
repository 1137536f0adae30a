// WHY: rule sets are the only long-lived data; their serde layout matches the persisted settings file

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// One find/replace pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub find: String,
    /// Empty replacement deletes the match
    #[serde(default)]
    pub replace: String,
}

impl Rule {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// A rule takes part in matching only when its normalized find is non-empty
    pub fn is_usable(&self) -> bool {
        !normalize(&self.find).is_empty()
    }
}

/// Named collection of rules plus the two matching flags (a "mode")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    /// Key of this set in the settings map; not serialized inside the set itself
    #[serde(skip)]
    pub name: String,
    /// Insertion order is display order and CSV order
    #[serde(default)]
    pub pairs: Vec<Rule>,
    #[serde(default)]
    pub match_case: bool,
    #[serde(default)]
    pub whole_word: bool,
}

impl RuleSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_flags(mut self, match_case: bool, whole_word: bool) -> Self {
        self.match_case = match_case;
        self.whole_word = whole_word;
        self
    }

    pub fn with_rule(mut self, find: impl Into<String>, replace: impl Into<String>) -> Self {
        self.pairs.push(Rule::new(find, replace));
        self
    }

    /// Append a rule at the end of the list
    pub fn push(&mut self, find: impl Into<String>, replace: impl Into<String>) {
        self.pairs.push(Rule::new(find, replace));
    }

    /// Replace all pairs, dropping entries whose find is empty
    pub fn set_pairs<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = Rule>,
    {
        self.pairs = pairs.into_iter().filter(|rule| !rule.find.is_empty()).collect();
    }

    pub fn usable_rules(&self) -> impl Iterator<Item = &Rule> {
        self.pairs.iter().filter(|rule| rule.is_usable())
    }

    pub fn has_usable_rules(&self) -> bool {
        self.usable_rules().next().is_some()
    }
}
