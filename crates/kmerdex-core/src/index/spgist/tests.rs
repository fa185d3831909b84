//! Tests for the trie callbacks.

use proptest::prelude::*;

use super::*;
use crate::error::Error;
use crate::kmer::Kmer;
use crate::qkmer::QueryPattern;

fn km(s: &str) -> Kmer {
    s.parse().expect("valid kmer")
}

fn kmers(items: &[&str]) -> Vec<Kmer> {
    items.iter().map(|s| km(s)).collect()
}

fn pat(s: &str) -> QueryPattern {
    s.parse().expect("valid pattern")
}

fn sym(c: u8) -> NodeLabel {
    NodeLabel::Symbol(c)
}

/// Follows one key through a freshly split node and returns the leaf verdict.
fn descend_split(out: &PickSplitOut, i: usize, queries: &[Predicate]) -> Option<LeafConsistentOut> {
    let root = ReconstructionBuffer::new();
    let matches = inner_consistent(&InnerConsistentIn {
        reconstructed: &root,
        level: 0,
        prefix: out.prefix.as_ref(),
        labels: &out.labels,
        queries,
    });
    let child = matches
        .into_iter()
        .find(|m| m.node_index == out.map_tuples_to_nodes[i])?;
    Some(leaf_consistent(&LeafConsistentIn {
        reconstructed: &child.reconstructed,
        level: child.reconstructed.len(),
        leaf_suffix: &out.leaf_tuples[i],
        queries,
    }))
}

fn scan(keys: &[Kmer], queries: &[Predicate]) -> Vec<Kmer> {
    let out = pick_split(keys, None);
    (0..keys.len())
        .filter_map(|i| descend_split(&out, i, queries))
        .filter(|leaf| leaf.matched)
        .map(|leaf| leaf.leaf_value)
        .collect()
}

// ========== Configure ==========

#[test]
fn test_configure_declares_types() {
    let config = configure();

    assert_eq!(config.label_type, ValueType::Int16);
    assert_eq!(config.prefix_type, ValueType::Kmer);
    assert_eq!(config.leaf_type, ValueType::Kmer);
    assert!(config.can_return_data);
    assert!(!config.long_values_ok);
}

// ========== Labels ==========

#[test]
fn test_label_order_matches_integer_encoding() {
    let labels = [NodeLabel::AllTheSame, NodeLabel::Stop, sym(b'A'), sym(b'T')];

    assert!(labels.windows(2).all(|w| w[0] < w[1]));
    assert!(labels.windows(2).all(|w| w[0].to_i16() < w[1].to_i16()));
}

#[test]
fn test_label_i16_encoding() {
    for label in [NodeLabel::AllTheSame, NodeLabel::Stop, sym(b'G')] {
        assert_eq!(NodeLabel::from_i16(label.to_i16()), Some(label));
    }
    assert_eq!(NodeLabel::from_i16(-3), None);
    assert_eq!(NodeLabel::from_i16(i16::from(b'N')), None);
    assert_eq!(NodeLabel::from_i16(i16::from(b'a')), None);
    assert_eq!(NodeLabel::from_i16(300), None);
}

// ========== Pick Split ==========

#[test]
fn test_pick_split_common_prefix_and_labels() {
    let keys = kmers(&["ACGTAC", "ACGTTT", "ACAAAA"]);

    let out = pick_split(&keys, None);

    assert_eq!(out.prefix, Some(km("AC")));
    assert_eq!(out.labels, vec![sym(b'A'), sym(b'G')]);
    assert_eq!(out.map_tuples_to_nodes, vec![1, 1, 0]);
    assert_eq!(out.leaf_tuples, kmers(&["TAC", "TTT", "AAA"]));
}

#[test]
fn test_pick_split_key_ending_at_prefix_gets_stop() {
    let keys = kmers(&["ACG", "ACGT", "ACGA"]);

    let out = pick_split(&keys, None);

    assert_eq!(out.prefix, Some(km("ACG")));
    assert_eq!(out.labels, vec![NodeLabel::Stop, sym(b'A'), sym(b'T')]);
    assert_eq!(out.map_tuples_to_nodes, vec![0, 2, 1]);
    assert!(out.leaf_tuples.iter().all(Kmer::is_empty));
}

#[test]
fn test_pick_split_no_common_prefix() {
    let keys = kmers(&["TTTT", "ACGT", "ACGA"]);

    let out = pick_split(&keys, None);

    assert_eq!(out.prefix, None);
    assert_eq!(out.prefix_len(), 0);
    assert_eq!(out.n_nodes(), 2);
    assert_eq!(out.leaf_tuples, kmers(&["TTT", "CGT", "CGA"]));
}

#[test]
fn test_pick_split_respects_prefix_cap() {
    let keys = kmers(&["ACGTAC", "ACGTTT"]);

    let out = pick_split(&keys, Some(2));

    assert_eq!(out.prefix, Some(km("AC")));
    assert_eq!(out.labels, vec![sym(b'G')]);
    assert_eq!(out.leaf_tuples, kmers(&["TAC", "TTT"]));
}

#[test]
fn test_pick_split_empty_key_only() {
    let out = pick_split(&[Kmer::empty()], None);

    assert_eq!(out.prefix, None);
    assert_eq!(out.labels, vec![NodeLabel::Stop]);
    assert_eq!(out.leaf_tuples, vec![Kmer::empty()]);
}

#[test]
#[should_panic(expected = "zero keys")]
fn test_pick_split_panics_on_empty_input() {
    let _ = pick_split(&[], None);
}

// ========== Choose ==========

#[test]
fn test_choose_match_node_consumes_prefix_and_label() {
    let prefix = km("ACG");
    let labels = [sym(b'A'), sym(b'T')];
    let node = InnerNodeView {
        prefix: Some(&prefix),
        labels: &labels,
        all_the_same: false,
    };

    let result = choose(&km("ACGTTC"), 0, &node);

    assert_eq!(
        result,
        ChooseResult::MatchNode {
            node_index: 1,
            level_add: 4,
            rest: km("TC"),
        }
    );
}

#[test]
fn test_choose_match_stop_adds_no_symbol() {
    let prefix = km("GG");
    let labels = [NodeLabel::Stop, sym(b'C')];
    let node = InnerNodeView {
        prefix: Some(&prefix),
        labels: &labels,
        all_the_same: false,
    };

    let result = choose(&km("TTGG"), 2, &node);

    assert_eq!(
        result,
        ChooseResult::MatchNode {
            node_index: 0,
            level_add: 2,
            rest: Kmer::empty(),
        }
    );
}

#[test]
fn test_choose_add_node_at_sorted_position() {
    let labels = [sym(b'A'), sym(b'T')];
    let node = InnerNodeView {
        prefix: None,
        labels: &labels,
        all_the_same: false,
    };

    assert_eq!(
        choose(&km("GAT"), 0, &node),
        ChooseResult::AddNode {
            label: sym(b'G'),
            insert_at: 1,
        }
    );
    assert_eq!(
        choose(&km("ACGT"), 4, &node),
        ChooseResult::AddNode {
            label: NodeLabel::Stop,
            insert_at: 0,
        }
    );
}

#[test]
fn test_choose_splits_on_prefix_mismatch() {
    let prefix = km("ACG");
    let labels = [sym(b'A')];
    let node = InnerNodeView {
        prefix: Some(&prefix),
        labels: &labels,
        all_the_same: false,
    };

    let result = choose(&km("AGG"), 0, &node);

    assert_eq!(
        result,
        ChooseResult::SplitTuple(SplitTuple {
            prefix_prefix: Some(km("A")),
            prefix_labels: vec![sym(b'C')],
            child_node_index: 0,
            postfix_prefix: Some(km("G")),
        })
    );
}

#[test]
fn test_choose_split_without_common_symbols() {
    let prefix = km("AC");
    let labels = [sym(b'A')];
    let node = InnerNodeView {
        prefix: Some(&prefix),
        labels: &labels,
        all_the_same: false,
    };

    let result = choose(&km("TT"), 0, &node);

    assert_eq!(
        result,
        ChooseResult::SplitTuple(SplitTuple {
            prefix_prefix: None,
            prefix_labels: vec![sym(b'A')],
            child_node_index: 0,
            postfix_prefix: Some(km("C")),
        })
    );
}

#[test]
fn test_choose_split_when_key_ends_inside_prefix() {
    let prefix = km("AC");
    let labels = [sym(b'A')];
    let node = InnerNodeView {
        prefix: Some(&prefix),
        labels: &labels,
        all_the_same: false,
    };

    let result = choose(&km("A"), 0, &node);

    assert_eq!(
        result,
        ChooseResult::SplitTuple(SplitTuple {
            prefix_prefix: Some(km("A")),
            prefix_labels: vec![sym(b'C')],
            child_node_index: 0,
            postfix_prefix: None,
        })
    );
}

#[test]
fn test_choose_uniform_node_splits_before_adding() {
    let prefix = km("AC");
    let labels = [sym(b'G')];
    let node = InnerNodeView {
        prefix: Some(&prefix),
        labels: &labels,
        all_the_same: true,
    };

    let result = choose(&km("ACT"), 0, &node);

    assert_eq!(
        result,
        ChooseResult::SplitTuple(SplitTuple {
            prefix_prefix: Some(km("AC")),
            prefix_labels: vec![NodeLabel::AllTheSame],
            child_node_index: 0,
            postfix_prefix: None,
        })
    );
}

#[test]
fn test_choose_uniform_node_still_matches_existing_label() {
    let labels = [sym(b'G')];
    let node = InnerNodeView {
        prefix: None,
        labels: &labels,
        all_the_same: true,
    };

    assert!(matches!(
        choose(&km("GA"), 0, &node),
        ChooseResult::MatchNode { node_index: 0, .. }
    ));
}

#[test]
fn test_choose_after_uniform_split_adds_node() {
    let labels = [NodeLabel::AllTheSame];
    let node = InnerNodeView {
        prefix: None,
        labels: &labels,
        all_the_same: false,
    };

    assert_eq!(
        choose(&km("T"), 0, &node),
        ChooseResult::AddNode {
            label: sym(b'T'),
            insert_at: 1,
        }
    );
}

#[test]
#[should_panic(expected = "zero labels")]
fn test_choose_panics_on_empty_labels() {
    let node = InnerNodeView {
        prefix: None,
        labels: &[],
        all_the_same: false,
    };
    let _ = choose(&km("A"), 0, &node);
}

#[test]
#[should_panic(expected = "strictly ascending")]
fn test_choose_panics_on_unsorted_labels() {
    let labels = [sym(b'T'), sym(b'A')];
    let node = InnerNodeView {
        prefix: None,
        labels: &labels,
        all_the_same: false,
    };
    let _ = choose(&km("A"), 0, &node);
}

// ========== Predicates ==========

#[test]
fn test_predicate_from_strategy() {
    assert_eq!(
        Predicate::from_strategy(1, "acgt").expect("equal"),
        Predicate::Equal(km("ACGT"))
    );
    assert_eq!(
        Predicate::from_strategy(2, "AC").expect("prefix"),
        Predicate::StartsWith(km("AC"))
    );
    assert_eq!(
        Predicate::from_strategy(3, "ACN").expect("contains"),
        Predicate::Contains(pat("ACN"))
    );
    assert_eq!(
        Predicate::from_strategy(3, "ACN").expect("contains").strategy(),
        StrategyNumber::Contains
    );
}

#[test]
fn test_predicate_unknown_strategy_rejected() {
    let err = Predicate::from_strategy(7, "ACGT").unwrap_err();

    assert!(matches!(err, Error::UnknownStrategy(7)));
}

#[test]
fn test_predicate_bad_argument_rejected() {
    assert!(Predicate::from_strategy(1, "ACNT").is_err());
    assert!(Predicate::from_strategy(3, "ACXT").is_err());
}

#[test]
fn test_predicate_prefix_rules() {
    let equal = Predicate::Equal(km("AC"));
    let prefix = Predicate::StartsWith(km("AC"));
    let contains = Predicate::Contains(pat("AN"));

    // Longer partial than the query.
    assert!(!equal.is_consistent_prefix(b"ACG", 0));
    assert!(prefix.is_consistent_prefix(b"ACG", 0));
    assert!(!contains.is_consistent_prefix(b"ACG", 0));

    // Mismatch in the overlap.
    assert!(!equal.is_consistent_prefix(b"AG", 0));
    assert!(!prefix.is_consistent_prefix(b"AG", 0));
    assert!(contains.is_consistent_prefix(b"AG", 0));
    assert!(!contains.is_consistent_prefix(b"TG", 0));
}

#[test]
fn test_predicate_skips_verified_symbols() {
    let equal = Predicate::Equal(km("AC"));

    assert!(equal.is_consistent_prefix(b"TC", 1));
}

#[test]
fn test_contains_prefix_rule_skips_verified_symbols() {
    let contains = Predicate::Contains(pat("ARN"));

    // Position 0 was accepted at an ancestor, only `G` against `R` is checked.
    assert!(contains.is_consistent_prefix(b"TG", 1));
    assert!(!contains.is_consistent_prefix(b"TC", 1));
    assert!(contains.overlap_matches(b"TTTT", 3));
}

#[test]
fn test_contains_overlap_agrees_with_pattern_partial_match() {
    let pattern = pat("RYWN");
    let contains = Predicate::Contains(pattern);

    for partial in [&b"AC"[..], b"GTA", b"ACC", b"CT", b"GCTAA", b""] {
        for from in 0..=partial.len() {
            assert_eq!(
                contains.overlap_matches(partial, from),
                pattern.matches_prefix_from(partial, from),
                "partial {:?} from {from}",
                std::str::from_utf8(partial).unwrap()
            );
        }
    }
}

#[test]
fn test_predicate_json_shape() {
    let json = serde_json::to_string(&Predicate::StartsWith(km("ACG"))).expect("serialize");

    assert_eq!(json, r#"{"op":"starts_with","value":"ACG"}"#);
    let back: Predicate = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, Predicate::StartsWith(km("ACG")));
}

// ========== Consistency ==========

#[test]
fn test_equality_example() {
    let keys = kmers(&["ACGT", "ACGA", "TTTT"]);

    let found = scan(&keys, &[Predicate::Equal(km("ACGT"))]);

    assert_eq!(found, kmers(&["ACGT"]));
}

#[test]
fn test_prefix_example() {
    let keys = kmers(&["ACGTAC", "ACGTTT", "ACAAAA"]);

    let mut found = scan(&keys, &[Predicate::StartsWith(km("ACGT"))]);
    found.sort();

    assert_eq!(found, kmers(&["ACGTAC", "ACGTTT"]));
}

#[test]
fn test_wildcard_example() {
    let keys = kmers(&["ACGTAT", "ACGCAT"]);

    let found = scan(&keys, &[Predicate::Contains(pat("ACGWWW"))]);

    assert_eq!(found, kmers(&["ACGTAT"]));
}

#[test]
fn test_inner_consistent_prunes_mismatching_labels() {
    let prefix = km("AC");
    let labels = [NodeLabel::Stop, sym(b'A'), sym(b'G')];
    let root = ReconstructionBuffer::new();

    let matches = inner_consistent(&InnerConsistentIn {
        reconstructed: &root,
        level: 0,
        prefix: Some(&prefix),
        labels: &labels,
        queries: &[Predicate::StartsWith(km("ACG"))],
    });

    // Stop survives: "AC" does not contradict "ACG", the leaf decides.
    let slots: Vec<usize> = matches.iter().map(|m| m.node_index).collect();
    assert_eq!(slots, vec![0, 2]);
    assert_eq!(matches[0].level_add, 2);
    assert_eq!(matches[1].level_add, 3);
    assert_eq!(matches[1].reconstructed.as_bytes(), b"ACG");
}

#[test]
fn test_inner_consistent_short_query_prunes_longer_paths() {
    let labels = [NodeLabel::Stop, sym(b'A')];
    let parent = ReconstructionBuffer::from_kmer(&km("AC"));

    let matches = inner_consistent(&InnerConsistentIn {
        reconstructed: &parent,
        level: 2,
        prefix: None,
        labels: &labels,
        queries: &[Predicate::Equal(km("AC"))],
    });

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].node_index, 0);
    assert_eq!(matches[0].level_add, 0);
}

#[test]
fn test_inner_consistent_empty_queries_visits_all() {
    let labels = [NodeLabel::AllTheSame, sym(b'C'), sym(b'T')];
    let root = ReconstructionBuffer::new();

    let matches = inner_consistent(&InnerConsistentIn {
        reconstructed: &root,
        level: 0,
        prefix: None,
        labels: &labels,
        queries: &[],
    });

    assert_eq!(matches.len(), 3);
    assert!(matches[0].reconstructed.is_empty());
}

#[test]
fn test_inner_consistent_branches_own_buffers() {
    let labels = [sym(b'A'), sym(b'C')];
    let parent = ReconstructionBuffer::from_kmer(&km("G"));

    let matches = inner_consistent(&InnerConsistentIn {
        reconstructed: &parent,
        level: 1,
        prefix: None,
        labels: &labels,
        queries: &[],
    });

    assert_eq!(matches[0].reconstructed.as_bytes(), b"GA");
    assert_eq!(matches[1].reconstructed.as_bytes(), b"GC");
    assert_eq!(parent.as_bytes(), b"G");
}

#[test]
fn test_leaf_consistent_exact_and_never_rechecks() {
    let parent = ReconstructionBuffer::from_kmer(&km("AC"));
    let suffix = km("GT");

    let hit = leaf_consistent(&LeafConsistentIn {
        reconstructed: &parent,
        level: 2,
        leaf_suffix: &suffix,
        queries: &[Predicate::Equal(km("ACGT"))],
    });
    let miss = leaf_consistent(&LeafConsistentIn {
        reconstructed: &parent,
        level: 2,
        leaf_suffix: &suffix,
        queries: &[Predicate::Equal(km("ACG"))],
    });

    assert!(hit.matched);
    assert_eq!(hit.leaf_value, km("ACGT"));
    assert!(!hit.recheck);
    assert!(!miss.matched);
    assert!(!miss.recheck);
}

#[test]
fn test_leaf_consistent_contains_requires_equal_length() {
    let parent = ReconstructionBuffer::new();
    let suffix = km("ACG");

    let out = leaf_consistent(&LeafConsistentIn {
        reconstructed: &parent,
        level: 0,
        leaf_suffix: &suffix,
        queries: &[Predicate::Contains(pat("ACGN"))],
    });

    assert!(!out.matched);
}

#[test]
fn test_reconstruction_buffer_push_and_extend() {
    let mut buffer = ReconstructionBuffer::new();
    buffer.extend_from_slice(b"ACG");
    buffer.push(b'T');

    assert_eq!(buffer.len(), 4);
    assert_eq!(buffer.to_kmer(), km("ACGT"));
}

#[test]
#[should_panic(expected = "reconstruction overflow")]
fn test_reconstruction_buffer_overflow_panics() {
    let mut buffer = ReconstructionBuffer::from_kmer(&km(&"A".repeat(32)));
    buffer.push(b'C');
}

// ========== Properties ==========

fn arb_keys() -> impl Strategy<Value = Vec<Kmer>> {
    prop::collection::vec("[ACGT]{0,12}", 1..40)
        .prop_map(|v| v.iter().map(|s| km(s)).collect())
}

proptest! {
    #[test]
    fn prop_pick_split_rebuilds_each_key(keys in arb_keys(), cap in prop::option::of(1usize..8)) {
        let out = pick_split(&keys, cap);

        for (i, key) in keys.iter().enumerate() {
            let mut rebuilt = ReconstructionBuffer::new();
            if let Some(prefix) = &out.prefix {
                rebuilt.extend_from_slice(prefix.as_bytes());
            }
            if let Some(symbol) = out.labels[out.map_tuples_to_nodes[i]].symbol() {
                rebuilt.push(symbol);
            }
            rebuilt.extend_from_slice(out.leaf_tuples[i].as_bytes());
            prop_assert_eq!(rebuilt.to_kmer(), *key);
        }
    }

    #[test]
    fn prop_pick_split_labels_strictly_ascending(keys in arb_keys()) {
        let out = pick_split(&keys, None);

        prop_assert!(!out.labels.is_empty());
        prop_assert!(out.labels.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(out.labels.iter().filter(|l| **l == NodeLabel::Stop).count() <= 1);
        prop_assert!(out.map_tuples_to_nodes.iter().all(|&n| n < out.n_nodes()));
    }

    #[test]
    fn prop_descent_never_loses_a_match(
        keys in arb_keys(),
        pick in any::<prop::sample::Index>(),
        cut in 0usize..13,
        mask in any::<u16>(),
    ) {
        let out = pick_split(&keys, None);
        let i = pick.index(keys.len());
        let key = keys[i];

        let wildcard: Vec<u8> = key
            .as_bytes()
            .iter()
            .enumerate()
            .map(|(pos, &s)| if mask & (1 << pos) != 0 { b'N' } else { s })
            .collect();
        let queries = [
            Predicate::Equal(key),
            Predicate::StartsWith(key.prefix(cut)),
            Predicate::Contains(QueryPattern::new(&wildcard).expect("valid pattern")),
        ];

        for query in queries {
            let leaf = descend_split(&out, i, std::slice::from_ref(&query));
            prop_assert!(leaf.is_some(), "pruned a matching key for {:?}", query);
            let leaf = leaf.expect("checked above");
            prop_assert!(leaf.matched);
            prop_assert_eq!(leaf.leaf_value, key);
        }
    }
}
