use std::path::PathBuf;

use filetrigger::types::EmptyPatternPolicy;
use filetrigger::watch::{EventFilter, RawEvent, RawEventKind};
use proptest::prelude::*;

const ROOT: &str = "/watch";

fn filter(patterns: Vec<String>, policy: EmptyPatternPolicy) -> EventFilter {
    EventFilter::new(ROOT, patterns, policy, &[]).expect("filter without excludes")
}

fn file_name() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,12}(\\.[a-z]{1,4})?"
}

fn suffix() -> impl Strategy<Value = String> {
    "\\.[a-z]{1,4}"
}

fn kind() -> impl Strategy<Value = RawEventKind> {
    prop_oneof![
        Just(RawEventKind::Created),
        Just(RawEventKind::Modified),
        Just(RawEventKind::Deleted),
        Just(RawEventKind::Other),
    ]
}

proptest! {
    #[test]
    fn accepted_paths_are_returned_unchanged(
        name in file_name(),
        patterns in prop::collection::vec(suffix(), 0..4),
    ) {
        let f = filter(patterns, EmptyPatternPolicy::Everything);
        let path = PathBuf::from(ROOT).join(&name);
        if let Some(accepted) = f.accept(&RawEvent::created(&path)) {
            prop_assert_eq!(accepted, path);
        }
    }

    #[test]
    fn acceptance_matches_suffix_rule(
        name in file_name(),
        patterns in prop::collection::vec(suffix(), 1..4),
    ) {
        let f = filter(patterns.clone(), EmptyPatternPolicy::Nothing);
        let path = PathBuf::from(ROOT).join(&name);
        let expected = patterns.iter().any(|p| name.ends_with(p.as_str()));
        prop_assert_eq!(f.accept(&RawEvent::created(&path)).is_some(), expected);
    }

    #[test]
    fn only_created_files_pass(
        name in file_name(),
        kind in kind(),
        is_directory in any::<bool>(),
    ) {
        let f = filter(Vec::new(), EmptyPatternPolicy::Everything);
        let event = RawEvent::new(kind, PathBuf::from(ROOT).join(&name), is_directory);
        let expected = kind == RawEventKind::Created && !is_directory;
        prop_assert_eq!(f.accept(&event).is_some(), expected);
    }

    #[test]
    fn empty_pattern_set_with_nothing_policy_rejects_all(name in file_name()) {
        let f = filter(Vec::new(), EmptyPatternPolicy::Nothing);
        prop_assert!(f.accept(&RawEvent::created(PathBuf::from(ROOT).join(&name))).is_none());
    }
}
