use bounded_merge::block_merge::sort_by_rounds;
use bounded_merge::checked::first_unsorted;
use bounded_merge::presort::{presort_blocks, with_indices};
use bounded_merge::{BlockSorter, MergeArity, Merger, Scored, SortOrder};
use proptest::prelude::*;

/// Sorted descending runs drawn from a small value range so ties are common.
fn runs_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(0u8..8, 0..12), 2..=4).prop_map(|mut runs| {
        for run in &mut runs {
            run.sort_by(|a, b| b.cmp(a));
        }
        runs
    })
}

fn arity_strategy() -> impl Strategy<Value = MergeArity> {
    prop_oneof![
        Just(MergeArity::Two),
        Just(MergeArity::Three),
        Just(MergeArity::Four)
    ]
}

/// Stable reference merge: (value, run, position) ordered by value descending, then run, then
/// position.
fn reference_merge(runs: &[Vec<u8>], capacity: usize) -> Vec<(u8, usize)> {
    let mut all: Vec<(u8, usize, usize)> = runs
        .iter()
        .enumerate()
        .flat_map(|(r, run)| run.iter().enumerate().map(move |(p, &v)| (v, r, p)))
        .collect();
    all.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
    all.truncate(capacity);
    all.into_iter().map(|(v, r, _)| (v, r)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn merge_matches_stable_reference(runs in runs_strategy(), extra in 0usize..6, cut in 0usize..40) {
        let total: usize = runs.iter().map(Vec::len).sum();
        let capacity = (cut % (total + extra + 1)).max(1);
        let slices: Vec<&[u8]> = runs.iter().map(Vec::as_slice).collect();
        let merger = Merger::new(SortOrder::Descending);

        let result = merger.merge(&slices, capacity, true).unwrap();
        let consumed = result.consumed.unwrap();
        let expected = reference_merge(&runs, capacity);

        prop_assert_eq!(result.output.len(), capacity.min(total));
        prop_assert_eq!(
            result.output.clone(),
            expected.iter().map(|&(v, _)| v).collect::<Vec<_>>()
        );
        prop_assert!(first_unsorted(&SortOrder::Descending, &result.output).is_none());
        for (i, run) in runs.iter().enumerate() {
            prop_assert!(consumed[i] <= run.len());
            prop_assert_eq!(consumed[i], expected.iter().filter(|&&(_, r)| r == i).count());
            if total <= capacity {
                prop_assert_eq!(consumed[i], run.len());
            }
        }
        prop_assert_eq!(consumed.total(), result.output.len());

        let again = merger.merge(&slices, capacity, true).unwrap();
        prop_assert_eq!(again, result);
    }

    #[test]
    fn chunked_stream_equals_one_shot(runs in runs_strategy(), chunk in 1usize..7) {
        let slices: Vec<&[u8]> = runs.iter().map(Vec::as_slice).collect();
        let merger = Merger::new(SortOrder::Descending);
        let whole = merger.merge(&slices, usize::MAX, false).unwrap().output;
        let pieces: Vec<u8> = merger.stream(&slices, chunk).unwrap().flatten().collect();
        prop_assert_eq!(pieces, whole);
    }

    #[test]
    fn suspension_stops_at_first_drained_run(runs in runs_strategy(), capacity in 1usize..40) {
        let slices: Vec<&[u8]> = runs.iter().map(Vec::as_slice).collect();
        let result = Merger::new(SortOrder::Descending)
            .merge_until_exhausted(&slices, capacity)
            .unwrap();
        let consumed = result.consumed.unwrap();
        prop_assert_eq!(consumed.total(), result.output.len());

        let drained = runs
            .iter()
            .enumerate()
            .filter(|(i, run)| !run.is_empty() && consumed[*i] == run.len())
            .count();
        let any_input = runs.iter().any(|run| !run.is_empty());
        if any_input && result.output.len() < capacity {
            prop_assert_eq!(drained, 1);
        }
        prop_assert!(drained <= 1);
    }

    #[test]
    fn sort_blocks_sorts_and_is_idempotent(
        mut data in prop::collection::vec(any::<i16>(), 0..300),
        block_len in 1usize..9,
        arity in arity_strategy(),
    ) {
        let merger = Merger::new(SortOrder::Ascending).with_max_arity(arity);
        let sorter = BlockSorter::new(merger);
        let len = data.len();
        let mut expected = data.clone();
        expected.sort();

        presort_blocks(&mut data, block_len, &SortOrder::Ascending).unwrap();
        let mut by_rounds = data.clone();
        sorter.sort_blocks(&mut data, block_len, len).unwrap();
        prop_assert_eq!(&data, &expected);

        let once = data.clone();
        sorter.sort_blocks(&mut data, block_len, len).unwrap();
        prop_assert_eq!(&data, &once);

        sort_by_rounds(&merger, &mut by_rounds, block_len).unwrap();
        prop_assert_eq!(by_rounds, expected);
    }

    #[test]
    fn top_k_is_stable_prefix(
        values in prop::collection::vec(0u8..16, 0..400),
        block_len in 1usize..40,
        k in 0usize..450,
        arity in arity_strategy(),
    ) {
        let mut scored = with_indices(&values).unwrap();
        let mut expected = scored.clone();
        expected.sort_by(|a, b| b.value.cmp(&a.value));
        expected.truncate(k);

        presort_blocks(&mut scored, block_len, &SortOrder::Descending).unwrap();
        let sorter = BlockSorter::new(Merger::new(SortOrder::Descending).with_max_arity(arity));
        let len = scored.len();
        let top: Vec<Scored<u8>> = sorter.top_k(&mut scored, block_len, len, k).unwrap();
        prop_assert_eq!(top, expected);
    }

    #[test]
    fn top_k_of_everything_is_full_sort(
        values in prop::collection::vec(any::<u32>(), 1..200),
        block_len in 1usize..17,
    ) {
        let sorter = BlockSorter::new(Merger::new(SortOrder::Descending));
        let mut a = values.clone();
        presort_blocks(&mut a, block_len, &SortOrder::Descending).unwrap();
        let mut b = a.clone();
        let len = a.len();

        let top = sorter.top_k(&mut a, block_len, len, len).unwrap();
        sorter.sort_blocks(&mut b, block_len, len).unwrap();
        prop_assert_eq!(top, b);
    }
}
