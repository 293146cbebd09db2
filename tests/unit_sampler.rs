// Unit tests for the pair sampler.
//
// Covers interleaving order, the count rule (exact, subsample, oversized,
// negative), topic isolation and the hard failure cases. Every random draw
// uses a seeded StdRng so results are reproducible.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use steerpairs::pairs::error::PairError;
use steerpairs::pairs::sampler::{
    build_pairs, build_random_string_pairs, interleave_negatives, Pair, TopicId, TopicPool,
};

fn pool(entries: &[(TopicId, &[&str])]) -> TopicPool {
    entries
        .iter()
        .map(|(tid, reps)| (*tid, reps.iter().map(|s| s.to_string()).collect()))
        .collect()
}

fn example_pool() -> TopicPool {
    pool(&[(1, &["p1", "p2"]), (2, &["n1"]), (3, &["n2", "n3"])])
}

fn all_example_pairs() -> HashSet<Pair> {
    ["p1", "p2"]
        .iter()
        .flat_map(|p| ["n1", "n2", "n3"].iter().map(move |n| Pair::new(*p, *n)))
        .collect()
}

// ============================================================
// Interleaving
// ============================================================

#[test]
fn interleave_round_robin_by_position() {
    let p = pool(&[
        (1, &["pos"]),
        (10, &["A0", "A1", "A2"]),
        (20, &["B0"]),
        (30, &["C0", "C1"]),
    ]);
    assert_eq!(
        interleave_negatives(&p, 1),
        vec!["A0", "B0", "C0", "A1", "C1", "A2"]
    );
}

#[test]
fn interleave_follows_pool_order_not_key_order() {
    let p = pool(&[(9, &["x0", "x1"]), (1, &["pos"]), (2, &["y0"])]);
    assert_eq!(interleave_negatives(&p, 1), vec!["x0", "y0", "x1"]);
}

#[test]
fn interleave_ignores_empty_topics() {
    let p = pool(&[(1, &["pos"]), (2, &[]), (3, &["c0"])]);
    assert_eq!(interleave_negatives(&p, 1), vec!["c0"]);
}

#[test]
fn interleave_example_pool() {
    assert_eq!(interleave_negatives(&example_pool(), 1), vec!["n1", "n2", "n3"]);
}

// ============================================================
// Count rule
// ============================================================

#[test]
fn exact_total_returns_every_candidate_in_order() {
    let mut rng = StdRng::seed_from_u64(1);
    let set = build_pairs(&example_pool(), 1, 6, &mut rng).unwrap();
    assert_eq!(set.total_candidates, 6);
    assert_eq!(
        set.pairs,
        vec![
            Pair::new("p1", "n1"),
            Pair::new("p1", "n2"),
            Pair::new("p1", "n3"),
            Pair::new("p2", "n1"),
            Pair::new("p2", "n2"),
            Pair::new("p2", "n3"),
        ]
    );
}

#[test]
fn exact_total_never_reorders_for_any_seed() {
    let enumerated = build_pairs(&example_pool(), 1, 100, &mut StdRng::seed_from_u64(0))
        .unwrap()
        .pairs;
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let set = build_pairs(&example_pool(), 1, 6, &mut rng).unwrap();
        assert_eq!(set.pairs, enumerated, "seed {seed} shuffled an exact-total request");
        // The generator was not advanced, so no random draw happened.
        let untouched: u64 = StdRng::seed_from_u64(seed).random();
        assert_eq!(rng.random::<u64>(), untouched);
    }
}

#[test]
fn oversized_target_returns_everything_once() {
    let mut rng = StdRng::seed_from_u64(2);
    let set = build_pairs(&example_pool(), 1, 100, &mut rng).unwrap();
    assert_eq!(set.len(), 6);
    let unique: HashSet<Pair> = set.pairs.iter().cloned().collect();
    assert_eq!(unique, all_example_pairs());
}

#[test]
fn subsample_has_exact_length_and_distinct_valid_pairs() {
    let valid = all_example_pairs();
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let set = build_pairs(&example_pool(), 1, 4, &mut rng).unwrap();
        assert_eq!(set.len(), 4, "seed {seed}");
        let unique: HashSet<&Pair> = set.pairs.iter().collect();
        assert_eq!(unique.len(), 4, "seed {seed} produced duplicates");
        assert!(set.pairs.iter().all(|p| valid.contains(p)));
    }
}

#[test]
fn every_target_up_to_total_is_respected() {
    for target in 0..=6 {
        let mut rng = StdRng::seed_from_u64(target as u64);
        let set = build_pairs(&example_pool(), 1, target, &mut rng).unwrap();
        assert_eq!(set.len() as i64, target);
    }
}

#[test]
fn negative_target_yields_empty_set() {
    let mut rng = StdRng::seed_from_u64(3);
    let set = build_pairs(&example_pool(), 1, -5, &mut rng).unwrap();
    assert!(set.is_empty());
    assert_eq!(set.total_candidates, 6);
}

#[test]
fn same_seed_same_sample() {
    let a = build_pairs(&example_pool(), 1, 3, &mut StdRng::seed_from_u64(99)).unwrap();
    let b = build_pairs(&example_pool(), 1, 3, &mut StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn subsample_covers_every_candidate_across_seeds() {
    // With uniform draws, 200 single-pair samples from 6 candidates should
    // hit all of them.
    let mut seen = HashSet::new();
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let set = build_pairs(&example_pool(), 1, 1, &mut rng).unwrap();
        seen.extend(set.pairs);
    }
    assert_eq!(seen, all_example_pairs());
}

// ============================================================
// Topic isolation
// ============================================================

#[test]
fn negatives_never_come_from_positive_topic() {
    let p = pool(&[
        (4, &["a", "b", "c"]),
        (5, &["d", "e"]),
        (6, &["f"]),
        (7, &["g", "h", "i", "j"]),
    ]);
    let positives: HashSet<&str> = ["d", "e"].into_iter().collect();
    let others: HashSet<&str> = ["a", "b", "c", "f", "g", "h", "i", "j"].into_iter().collect();

    let mut rng = StdRng::seed_from_u64(5);
    let set = build_pairs(&p, 5, 7, &mut rng).unwrap();
    assert_eq!(set.total_candidates, 16);
    for pair in &set.pairs {
        assert!(positives.contains(pair.positive.as_str()));
        assert!(others.contains(pair.negative.as_str()));
    }
}

#[test]
fn duplicate_source_strings_produce_duplicate_pairs() {
    let p = pool(&[(1, &["p"]), (2, &["n"]), (3, &["n"])]);
    let mut rng = StdRng::seed_from_u64(0);
    let set = build_pairs(&p, 1, 10, &mut rng).unwrap();
    assert_eq!(set.pairs, vec![Pair::new("p", "n"), Pair::new("p", "n")]);
}

// ============================================================
// Failures
// ============================================================

#[test]
fn empty_positive_topic_fails() {
    let p = pool(&[(1, &[]), (2, &["n"])]);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        build_pairs(&p, 1, 5, &mut rng),
        Err(PairError::EmptyPositiveSet(1))
    );
}

#[test]
fn all_other_topics_empty_fails() {
    let p = pool(&[(1, &["p"]), (2, &[]), (3, &[])]);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(build_pairs(&p, 1, 5, &mut rng), Err(PairError::NoNegatives(1)));
}

#[test]
fn single_topic_pool_has_no_negatives() {
    let p = pool(&[(1, &["p"])]);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(build_pairs(&p, 1, 5, &mut rng), Err(PairError::NoNegatives(1)));
}

#[test]
fn hard_errors_win_over_negative_target() {
    let p = pool(&[(1, &[]), (2, &["n"])]);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        build_pairs(&p, 1, -1, &mut rng),
        Err(PairError::EmptyPositiveSet(1))
    );
}

#[test]
fn unknown_topic_fails() {
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        build_pairs(&example_pool(), 42, 5, &mut rng),
        Err(PairError::UnknownTopic(42))
    );
}

// ============================================================
// Random-string pairing
// ============================================================

#[test]
fn random_string_pairs_ignore_other_topics() {
    let p = pool(&[(1, &["alpha", "beta"])]);
    let mut rng = StdRng::seed_from_u64(11);
    let set = build_random_string_pairs(&p, 1, 3, &mut rng).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.total_candidates, 2);
    for pair in &set.pairs {
        assert!(pair.positive == "alpha" || pair.positive == "beta");
        assert_eq!(pair.negative.chars().count(), pair.positive.chars().count());
    }
}

#[test]
fn random_string_pairs_match_each_positive_length() {
    let p = pool(&[(1, &["abc", "hello world", "ü"])]);
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let set = build_random_string_pairs(&p, 1, 100, &mut rng).unwrap();
        assert_eq!(set.total_candidates, 3);
        let mismatched: Vec<&Pair> = set
            .pairs
            .iter()
            .filter(|pair| pair.negative.chars().count() != pair.positive.chars().count())
            .collect();
        assert!(mismatched.is_empty(), "seed {seed}: {mismatched:?}");
    }
}

#[test]
fn random_string_pairs_need_positives() {
    let p = pool(&[(1, &[]), (2, &["n"])]);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        build_random_string_pairs(&p, 1, 3, &mut rng),
        Err(PairError::EmptyPositiveSet(1))
    );
}
