use devrank::rank::default_tiers;
use devrank::{ActivityStatistics, RankEngine};
use proptest::prelude::*;

fn stats(counts: [u64; 6]) -> ActivityStatistics {
    ActivityStatistics {
        total_commits: counts[0],
        total_pull_requests: counts[1],
        total_issues: counts[2],
        total_reviews: counts[3],
        total_stars_earned: counts[4],
        followers: counts[5],
        ..Default::default()
    }
}

fn tier_index(label: &str) -> usize {
    default_tiers()
        .iter()
        .position(|t| t.label == label)
        .expect("label comes from the default table")
}

fn counts() -> impl Strategy<Value = [u64; 6]> {
    prop::array::uniform6(0u64..5_000)
}

proptest! {
    #[test]
    fn test_rank_is_deterministic(counts in counts()) {
        let engine = RankEngine::default();
        let input = stats(counts);
        prop_assert_eq!(engine.compute_rank(&input), engine.compute_rank(&input.clone()));
    }

    #[test]
    fn test_score_and_tier_are_monotonic(counts in counts(), field in 0usize..6, extra in 1u64..1_000) {
        let engine = RankEngine::default();
        let before = engine.compute_rank(&stats(counts));

        let mut raised = counts;
        raised[field] += extra;
        let after = engine.compute_rank(&stats(raised));

        prop_assert!(after.score >= before.score);
        prop_assert!(tier_index(&after.rank) >= tier_index(&before.rank));
    }

    #[test]
    fn test_score_lands_in_exactly_one_tier(score in 0u64..10_000) {
        let engine = RankEngine::default();
        let result = engine.rank_for_score(score);
        let tiers = default_tiers();
        let index = tier_index(&result.rank);

        prop_assert!(tiers[index].min_score <= score);
        match tiers.get(index + 1) {
            Some(next) => {
                prop_assert!(score < next.min_score);
                prop_assert_eq!(result.next_rank.as_deref(), Some(next.label.as_str()));
                prop_assert_eq!(result.next_rank_threshold, next.min_score);
                prop_assert!(result.progress_percent < 100);
            }
            None => {
                prop_assert!(result.next_rank.is_none());
                prop_assert_eq!(result.next_rank_threshold, 0);
                prop_assert_eq!(result.progress_percent, 100);
            }
        }
    }

    #[test]
    fn test_huge_counts_saturate(counts in prop::array::uniform6(any::<u64>())) {
        let result = RankEngine::default().compute_rank(&stats(counts));
        prop_assert!(result.progress_percent <= 100);
    }
}

#[test]
fn test_tier_boundaries() {
    let engine = RankEngine::default();

    let below = engine.rank_for_score(49);
    assert_eq!(below.rank, "C");
    assert_eq!(below.next_rank.as_deref(), Some("B"));
    assert_eq!(below.progress_percent, 98);

    let at = engine.rank_for_score(50);
    assert_eq!(at.rank, "B");
    assert_eq!(at.progress_percent, 0);

    let top = engine.rank_for_score(2000);
    assert_eq!(top.rank, "S+");
    assert!(top.is_max_tier());
}

#[test]
fn test_worked_example() {
    let result = RankEngine::default().compute_rank(&stats([10, 5, 2, 0, 20, 3]));
    assert_eq!(result.score, 120);
    assert_eq!(result.rank, "B+");
    assert_eq!(result.next_rank.as_deref(), Some("A"));
    assert_eq!(result.next_rank_threshold, 200);
    assert_eq!(result.progress_percent, 20);
}
