//! Suffix forest construction and greedy pattern selection
//!
//! The forest is a bounded set of independently built suffix tries, one
//! per suffix offset. Every trie proposes candidates (nodes shared by at
//! least two rows); the selector scores them, greedily fixes the best
//! one, removes its rows from further candidacy and repeats until no
//! candidate scores positive. Selection is deterministic: ties fall back
//! to row coverage, then to the lexicographically smallest column
//! sequence, then to trie/node order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;
use num_traits::Num;
use rayon::prelude::*;

use crate::error::Result;
use crate::matrix::CompressionConfig;
use crate::symbolize::RowSequence;
use crate::trie::SuffixTrie;

/// Scoring policy for pattern candidates
///
/// Injectable so tests can drive the selector with a custom objective.
pub trait ScorePolicy: Sync {
    /// Score of a pattern of `pattern_len` entries shared by
    /// `shared_rows` rows. Only candidates with positive score are
    /// eligible for selection.
    fn score(&self, shared_rows: usize, pattern_len: usize) -> i64;
}

/// The default scoring objective
///
/// `lambda * (shared_rows - 1) * pattern_len` is the weighted number of
/// entries factoring the pattern out saves; the subtracted
/// `pattern_len` is the cost of storing the pattern's literal entries
/// once.
#[derive(Debug, Clone, Copy)]
pub struct LambdaScore {
    /// Sharing weight (the `l` parameter)
    pub lambda: usize,
}

impl ScorePolicy for LambdaScore {
    fn score(&self, shared_rows: usize, pattern_len: usize) -> i64 {
        debug_assert!(shared_rows >= 1);
        self.lambda as i64 * (shared_rows as i64 - 1) * pattern_len as i64 - pattern_len as i64
    }
}

/// One pattern fixed by the selector
///
/// The literal entries are stored once; `rows` lists the original rows
/// inheriting them. Row sets are disjoint across the selected patterns.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedPattern<T> {
    /// Column indices of the pattern, ascending
    pub cols: Vec<usize>,

    /// Values aligned with `cols`, shared exactly by every member row
    pub values: Vec<T>,

    /// Original row ids inheriting the pattern, ascending
    pub rows: Vec<usize>,
}

/// Build the candidate forest: `n_tries` independent tries, trie `i`
/// indexing every row with its last `i` symbols dropped
///
/// Tries own their nodes exclusively, so they are built on separate
/// worker threads.
pub fn build_forest<T>(sequences: &[RowSequence<T>], n_tries: usize) -> Result<Vec<SuffixTrie>>
where
    T: Copy + Num + Sync,
{
    (0..n_tries)
        .into_par_iter()
        .map(|offset| {
            let mut trie = SuffixTrie::new(offset);
            for (row, sequence) in sequences.iter().enumerate() {
                trie.insert(row, &sequence.cols)?;
            }
            Ok(trie)
        })
        .collect()
}

/// Discover and select the pattern set for a symbolized matrix
///
/// Builds the forest, runs the selector with the default scoring
/// objective and releases the trie memory before returning. An empty
/// pattern set is a valid outcome for inputs without repeated row
/// structure.
pub fn discover_patterns<T>(
    sequences: &[RowSequence<T>],
    config: &CompressionConfig,
) -> Result<Vec<SelectedPattern<T>>>
where
    T: Copy + Num + Send + Sync,
{
    let tries = build_forest(sequences, config.n_tries)?;
    debug!(
        "built {} candidate tries over {} rows",
        tries.len(),
        sequences.len()
    );

    let policy = LambdaScore {
        lambda: config.lambda,
    };
    let selected = select_patterns(&tries, sequences, &policy, config.max_patterns);
    debug!("selected {} patterns", selected.len());

    Ok(selected)
}

/// Greedy priority-queue selection over the candidates of every trie
///
/// Entries are re-evaluated lazily: a popped entry whose rows were
/// partially covered since it was scored is re-scored and pushed back
/// instead of being accepted with stale data. Selection stops when the
/// queue runs dry, no candidate scores positive, or the optional
/// `max_patterns` budget is reached.
pub fn select_patterns<T>(
    tries: &[SuffixTrie],
    sequences: &[RowSequence<T>],
    policy: &dyn ScorePolicy,
    max_patterns: Option<usize>,
) -> Vec<SelectedPattern<T>>
where
    T: Copy + Num,
{
    let mut covered = vec![false; sequences.len()];
    let mut heap = BinaryHeap::new();

    for (trie_index, trie) in tries.iter().enumerate() {
        for candidate in trie.candidates() {
            if let Some((score, class)) = evaluate(trie, candidate.node, sequences, &covered, policy)
            {
                if score > 0 {
                    heap.push(HeapEntry {
                        score,
                        coverage: class.len(),
                        cols: trie.pattern_cols(candidate.node),
                        trie: trie_index,
                        node: candidate.node,
                    });
                }
            }
        }
    }

    let mut selected = Vec::new();

    while let Some(entry) = heap.pop() {
        if max_patterns.is_some_and(|limit| selected.len() >= limit) {
            break;
        }

        let trie = &tries[entry.trie];
        let Some((score, rows)) = evaluate(trie, entry.node, sequences, &covered, policy) else {
            continue;
        };
        if score <= 0 {
            continue;
        }
        if score != entry.score || rows.len() != entry.coverage {
            // Stale: coverage changed since this entry was scored
            heap.push(HeapEntry {
                score,
                coverage: rows.len(),
                ..entry
            });
            continue;
        }

        let depth = trie.node(entry.node).depth();
        let values = segment_values(&sequences[rows[0]], trie.offset(), depth).to_vec();
        for &row in &rows {
            covered[row] = true;
        }
        debug!(
            "pattern of {} entries shared by {} rows (score {})",
            depth,
            rows.len(),
            score
        );

        let cols = entry.cols;
        selected.push(SelectedPattern {
            cols: cols.clone(),
            values,
            rows,
        });

        // The node may hold further value-agreement classes among the
        // rows still uncovered
        if let Some((next_score, next_class)) =
            evaluate(trie, entry.node, sequences, &covered, policy)
        {
            if next_score > 0 {
                heap.push(HeapEntry {
                    score: next_score,
                    coverage: next_class.len(),
                    cols,
                    trie: entry.trie,
                    node: entry.node,
                });
            }
        }
    }

    selected
}

/// Re-score a trie node against the current covered-row set
///
/// Surviving member rows are partitioned into classes agreeing on the
/// segment's values; the largest class (first on ties) is the node's
/// current proposal. Returns None when fewer than two rows agree.
fn evaluate<T>(
    trie: &SuffixTrie,
    node: usize,
    sequences: &[RowSequence<T>],
    covered: &[bool],
    policy: &dyn ScorePolicy,
) -> Option<(i64, Vec<usize>)>
where
    T: Copy + Num,
{
    let depth = trie.node(node).depth();
    let offset = trie.offset();

    let mut remaining: Vec<usize> = trie
        .node(node)
        .rows()
        .iter()
        .copied()
        .filter(|&row| !covered[row])
        .collect();
    if remaining.len() < 2 {
        return None;
    }

    let mut best: Vec<usize> = Vec::new();
    while remaining.len() > best.len() {
        let reference = segment_values(&sequences[remaining[0]], offset, depth);
        let (class, rest): (Vec<usize>, Vec<usize>) = remaining
            .into_iter()
            .partition(|&row| segment_values(&sequences[row], offset, depth) == reference);
        if class.len() > best.len() {
            best = class;
        }
        remaining = rest;
    }

    if best.len() < 2 {
        return None;
    }
    let score = policy.score(best.len(), depth);
    Some((score, best))
}

/// The values a row carries over the segment a node of `depth`
/// represents in a trie of `offset`
fn segment_values<T>(sequence: &RowSequence<T>, offset: usize, depth: usize) -> &[T] {
    let end = sequence.len() - offset;
    &sequence.values[end - depth..end]
}

/// Heap entry for the greedy selector
///
/// Ordered by score, then row coverage, then lexicographically smallest
/// column sequence, then stable trie/node position.
#[derive(Debug, Clone)]
struct HeapEntry {
    score: i64,
    coverage: usize,
    cols: Vec<usize>,
    trie: usize,
    node: usize,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then(self.coverage.cmp(&other.coverage))
            .then_with(|| other.cols.cmp(&self.cols))
            .then(other.trie.cmp(&self.trie))
            .then(other.node.cmp(&self.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}
