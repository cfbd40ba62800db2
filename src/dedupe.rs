// Collapse near-duplicate common names before they are shown as choices.
//
// Three passes run in order over the input:
// 1. case-insensitive exact duplicates keep their first occurrence;
// 2. a name ending in "s" is dropped when the name minus that "s" is also
//    present;
// 3. a name that is a strict substring of a longer surviving name is dropped.

use std::collections::HashSet;

/// Indices into `names` of the entries that survive deduplication, in
/// input order. Callers holding richer records use these to map a displayed
/// name back to the record it came from.
pub fn dedupe_indices<S: AsRef<str>>(names: &[S]) -> Vec<usize> {
    let lowered: Vec<String> = names.iter().map(|n| n.as_ref().to_lowercase()).collect();

    let mut seen = HashSet::new();
    let unique: Vec<usize> = (0..lowered.len())
        .filter(|&i| seen.insert(lowered[i].as_str()))
        .collect();

    let singular_survivors: Vec<usize> = unique
        .iter()
        .copied()
        .filter(|&i| match lowered[i].strip_suffix('s') {
            Some(singular) => !seen.contains(singular),
            None => true,
        })
        .collect();

    singular_survivors
        .iter()
        .copied()
        .filter(|&i| {
            let name = &lowered[i];
            !singular_survivors.iter().any(|&j| {
                let other = &lowered[j];
                j != i && other.len() > name.len() && other.contains(name.as_str())
            })
        })
        .collect()
}

/// Deduplicated copy of `names`, original casing preserved.
pub fn dedupe_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    dedupe_indices(names)
        .into_iter()
        .map(|i| names[i].as_ref().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn wolf_batch() {
        // "Wolves" is not "Wolf" plus an "s", so it stays; "Wolf" is inside
        // "Gray Wolf" and goes.
        let names = ["Wolf", "wolf", "Wolves", "Gray Wolf"];
        assert_eq!(dedupe_names(&names), vec!["Wolves", "Gray Wolf"]);
    }

    #[rstest]
    #[case::empty(&[], &[])]
    #[case::single(&["Bald Eagle"], &["Bald Eagle"])]
    #[case::case_duplicates(&["Zebra", "ZEBRA", "zebra"], &["Zebra"])]
    #[case::plural(&["Horses", "Horse"], &["Horse"])]
    #[case::plural_kept_without_singular(&["Moose", "Elk"], &["Moose", "Elk"])]
    #[case::substring(&["Eagle", "Bald Eagle", "Golden Eagle"], &["Bald Eagle", "Golden Eagle"])]
    #[case::substring_ignores_case(&["eagle", "Bald EAGLE"], &["Bald EAGLE"])]
    #[case::unrelated_order_kept(&["Lion", "Tiger", "Bear"], &["Lion", "Tiger", "Bear"])]
    fn dedupes(#[case] input: &[&str], #[case] expected: &[&str]) {
        assert_eq!(dedupe_names(input), expected.to_vec());
    }

    #[test]
    fn dropped_plural_does_not_shadow_its_singular() {
        // "Cat" is a substring of "Cats", but "Cats" is already gone by the
        // time substrings are checked.
        assert_eq!(dedupe_names(&["Cats", "Cat"]), vec!["Cat"]);
    }

    #[test]
    fn indices_point_at_first_occurrence() {
        let names = ["wolf", "Red Fox", "WOLF", "red fox"];
        assert_eq!(dedupe_indices(&names), vec![0, 1]);
    }
}
