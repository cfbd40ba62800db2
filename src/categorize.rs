// Best-effort grouping of common names by keyword, and a rough score for
// how "everyday" a name sounds. Neither is a classifier: a name is matched
// against keyword lists in a fixed order and the first hit wins, so
// "wolf fish" lands under Mammals and "sea snake" under Snakes only because
// of that order. Names with no keyword fall into Other.

use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Mammals,
    Fish,
    Birds,
    Reptiles,
    Snakes,
    Plants,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Mammals,
        Category::Fish,
        Category::Birds,
        Category::Reptiles,
        Category::Snakes,
        Category::Plants,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Mammals => "mammals",
            Category::Fish => "fish",
            Category::Birds => "birds",
            Category::Reptiles => "reptiles",
            Category::Snakes => "snakes",
            Category::Plants => "plants",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checked top to bottom.
const KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Mammals,
        &["wolf", "canid", "bear", "deer", "whale", "dolphin", "zebra", "horse", "bat"],
    ),
    (Category::Fish, &["fish", "eel", "shark", "trout", "salmon"]),
    (Category::Snakes, &["snake", "viper", "python", "cobra", "rattler"]),
    (
        Category::Birds,
        &["eagle", "hawk", "owl", "penguin", "sparrow", "duck", "heron"],
    ),
    (
        Category::Reptiles,
        &["lizard", "turtle", "tortoise", "gecko", "iguana", "crocodile", "alligator"],
    ),
    (Category::Plants, &["berry", "willow", "grass", "fern", "oak"]),
];

/// Bucket for a single name. Matching is by substring, so "batfish" is a
/// mammal and "oak toad" is a plant.
pub fn categorize(name: &str) -> Category {
    let name = name.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| name.contains(w)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// Non-empty buckets in `Category` order, each sorted and de-duplicated.
pub fn organize<S: AsRef<str>>(names: &[S]) -> Vec<(Category, Vec<String>)> {
    let mut buckets: Vec<(Category, BTreeSet<String>)> = Category::ALL
        .iter()
        .map(|&c| (c, BTreeSet::new()))
        .collect();
    for name in names {
        let category = categorize(name.as_ref());
        if let Some((_, set)) = buckets.iter_mut().find(|(c, _)| *c == category) {
            set.insert(name.as_ref().to_string());
        }
    }
    buckets
        .into_iter()
        .filter(|(_, set)| !set.is_empty())
        .map(|(c, set)| (c, set.into_iter().collect()))
        .collect()
}

const COMMON_REGIONS: &[&str] = &["north american", "american", "european", "asian", "african"];
const SPECIALIST_TERMS: &[&str] = &[
    "dwarf", "spotted", "striped", "lesser", "greater", "eastern", "western", "southern",
    "northern",
];

/// Higher means more likely to be the name someone meant. Regional and
/// "common" names score up; qualifiers, possessives and long names score
/// down.
pub fn name_priority(name: &str) -> i32 {
    let name = name.to_lowercase();
    let mut score = 0;

    if COMMON_REGIONS.iter().any(|r| name.contains(r)) {
        score += 5;
    }
    if name.contains("common") {
        score += 10;
    }
    if SPECIALIST_TERMS.iter().any(|t| name.contains(t)) {
        score -= 3;
    }
    if name.contains('\'') {
        score -= 5;
    }

    let words = name.split_whitespace().count() as i32;
    score - (words - 1).max(0) * 2
}

/// Index of the highest-priority name; ties go to the earliest.
pub fn suggested<S: AsRef<str>>(names: &[S]) -> Option<usize> {
    names
        .iter()
        .enumerate()
        .max_by_key(|(i, n)| (name_priority(n.as_ref()), std::cmp::Reverse(*i)))
        .map(|(i, _)| i)
}
