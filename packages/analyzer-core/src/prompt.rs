//! Assessment prompt built from category counts.

use crate::aggregate::CategoryCount;
use crate::types::RESERVED_ALL_LABEL;

/// Place wording used when no place name is given.
const DEFAULT_PLACE: &str = "the village";

/// Summary line used when there is nothing to list.
const NO_FACILITIES: &str = "no facilities found";

/// `"<category>: <count>"` lines in mapping order, reserved label dropped.
pub fn summary_lines(counts: &CategoryCount) -> Vec<String> {
    counts
        .iter()
        .filter(|(label, _)| *label != RESERVED_ALL_LABEL)
        .map(|(label, n)| format!("{}: {}", label, n))
        .collect()
}

/// Assessment question for the counts, naming no specific place.
pub fn build_prompt(counts: &CategoryCount) -> String {
    build_prompt_for(DEFAULT_PLACE, counts)
}

/// Assessment question for the counts around `place`.
pub fn build_prompt_for(place: &str, counts: &CategoryCount) -> String {
    let lines = summary_lines(counts);
    let summary = if lines.is_empty() {
        NO_FACILITIES.to_string()
    } else {
        lines.join("\n")
    };

    format!(
        "What is the degree of digitalization, smartness, rural development, or similar in {} with these facilities:\n{}\nWhat can we do to improve it? Do you have any suggestions?",
        place, summary
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_counts_in_order() {
        let counts: CategoryCount = [("school", 2), ("cafe", 1)].into_iter().collect();
        let prompt = build_prompt(&counts);

        let lines: Vec<_> = prompt.lines().collect();
        let school = lines.iter().position(|l| *l == "school: 2").unwrap();
        let cafe = lines.iter().position(|l| *l == "cafe: 1").unwrap();
        assert!(school < cafe);
        assert!(prompt.starts_with("What is the degree of digitalization"));
        assert!(prompt.ends_with("Do you have any suggestions?"));
    }

    #[test]
    fn test_prompt_never_contains_reserved_label() {
        let counts: CategoryCount = [("all", 7), ("bank", 1)].into_iter().collect();
        let prompt = build_prompt(&counts);
        assert!(!prompt.lines().any(|l| l.starts_with("all:")));
        assert!(!prompt.contains("all"));
        assert!(prompt.contains("bank: 1"));
    }

    #[test]
    fn test_prompt_names_place() {
        let counts: CategoryCount = [("cafe", 3)].into_iter().collect();
        let prompt = build_prompt_for("Ossana", &counts);
        assert!(prompt.contains("similar in Ossana with these facilities:\ncafe: 3\n"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let counts: CategoryCount = [("cafe", 3), ("bank", 2)].into_iter().collect();
        assert_eq!(build_prompt(&counts), build_prompt(&counts.clone()));
    }

    #[test]
    fn test_prompt_with_no_counts() {
        let prompt = build_prompt(&CategoryCount::new());
        assert!(prompt.contains("facilities:\nno facilities found\n"));
    }
}
