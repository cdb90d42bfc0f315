//! Page-sequence transformations.
//!
//! Every function takes the current page order as a slice of opaque handles
//! and returns a fresh `Vec` with the new order. Handles are cloned, never
//! inspected. Ranges and anchors are re-checked against the slice they are
//! applied to, so an invalid request yields an error and no output.

use tracing::debug;

use super::range::{Anchor, MoveAlternatives, PageRange, Side};
use crate::error::{Error, Result};

/// A block of pages to splice into a destination.
///
/// The anchor is expressed in the coordinates of the destination *before*
/// any block of the same operation has been inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion<T> {
    pub block: Vec<T>,
    pub anchor: Anchor,
}

impl<T> Insertion<T> {
    pub const fn new(block: Vec<T>, anchor: Anchor) -> Self {
        Self { block, anchor }
    }
}

/// Pages inside `range`, in their original order.
pub fn extract<T: Clone>(pages: &[T], range: PageRange) -> Result<Vec<T>> {
    let range = range.check(pages.len())?;
    Ok(pages[range.indices()].to_vec())
}

/// Pages outside `range`, in their original order.
pub fn remove<T: Clone>(pages: &[T], range: PageRange) -> Result<Vec<T>> {
    let range = range.check(pages.len())?;
    Ok(stationary(pages, range))
}

fn stationary<T: Clone>(pages: &[T], range: PageRange) -> Vec<T> {
    let indices = range.indices();
    let mut kept = Vec::with_capacity(pages.len() - range.len());
    kept.extend_from_slice(&pages[..*indices.start()]);
    kept.extend_from_slice(&pages[*indices.end() + 1..]);
    kept
}

/// Whether moving `range` next to `anchor` would reproduce the input order.
pub fn is_no_op(range: PageRange, anchor: Anchor) -> bool {
    range.contains(anchor.page)
        || (anchor.side == Side::After && anchor.page + 1 == range.start())
        || (anchor.side == Side::Before && anchor.page == range.end() + 1)
}

/// Move the block `range` so it sits on `anchor.side` of page `anchor.page`.
///
/// The anchor refers to the original numbering. Requests that would leave
/// the order unchanged are rejected with [`Error::NoOpRejected`].
pub fn move_block<T: Clone>(pages: &[T], range: PageRange, anchor: Anchor) -> Result<Vec<T>> {
    let length = pages.len();
    let range = range.check(length)?;
    let anchor = anchor.check(length)?;

    if is_no_op(range, anchor) {
        debug!("Rejecting no-op move of pages {} {}", range, anchor);
        return Err(Error::NoOpRejected {
            start: range.start(),
            end: range.end(),
            side: anchor.side,
            anchor: anchor.page,
            alternatives: MoveAlternatives::around(range, length),
        });
    }

    let block = &pages[range.indices()];
    let mut reordered = stationary(pages, range);

    // The anchor lies outside the block, so either all block pages precede
    // it or none do.
    let shifted = if anchor.page > range.end() {
        range.len()
    } else {
        0
    };
    let mut index = anchor.page - 1 - shifted;
    if anchor.side == Side::After {
        index += 1;
    }

    reordered.splice(index..index, block.iter().cloned());
    Ok(reordered)
}

/// Splice `block` into `destination` next to `anchor`.
pub fn insert<T: Clone>(destination: &[T], block: &[T], anchor: Anchor) -> Result<Vec<T>> {
    let anchor = anchor.check(destination.len())?;
    let at = anchor.insertion_index();

    let mut expanded = Vec::with_capacity(destination.len() + block.len());
    expanded.extend_from_slice(&destination[..at]);
    expanded.extend_from_slice(block);
    expanded.extend_from_slice(&destination[at..]);
    Ok(expanded)
}

/// Splice several blocks into `destination`, in order.
///
/// All anchors are checked against the original destination first. Each
/// splice is then shifted right by the pages already inserted at or before
/// its own insertion point, so later anchors keep pointing at the pages
/// they were chosen for.
pub fn insert_blocks<T: Clone>(destination: &[T], insertions: &[Insertion<T>]) -> Result<Vec<T>> {
    if insertions.is_empty() {
        return Err(Error::EmptyInput("insert"));
    }

    let original_len = destination.len();
    for insertion in insertions {
        insertion.anchor.check(original_len)?;
    }

    let extra: usize = insertions.iter().map(|i| i.block.len()).sum();
    let mut initial = Vec::with_capacity(original_len + extra);
    initial.extend_from_slice(destination);

    let (_, expanded) = insertions.iter().fold(
        (Vec::<(usize, usize)>::with_capacity(insertions.len()), initial),
        |(mut landed, mut pages), insertion| {
            let point = insertion.anchor.insertion_index();
            let offset: usize = landed
                .iter()
                .filter(|(at, _)| *at <= point)
                .map(|(_, len)| len)
                .sum();
            let at = point + offset;

            pages.splice(at..at, insertion.block.iter().cloned());
            landed.push((point, insertion.block.len()));
            (landed, pages)
        },
    );

    Ok(expanded)
}

/// Concatenate documents in list order.
pub fn merge<T: Clone, D: AsRef<[T]>>(documents: &[D]) -> Result<Vec<T>> {
    if documents.is_empty() {
        return Err(Error::EmptyInput("merge"));
    }

    let total = documents.iter().map(|d| d.as_ref().len()).sum();
    let mut merged = Vec::with_capacity(total);
    for document in documents {
        merged.extend_from_slice(document.as_ref());
    }
    Ok(merged)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pages::range::validate;

    fn doc(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    fn range(length: usize, start: usize, end: usize) -> PageRange {
        validate(length, start, end).unwrap()
    }

    #[test]
    fn test_extract_inner_range() {
        let pages = doc(10);
        assert_eq!(extract(&pages, range(10, 3, 5)).unwrap(), vec![3, 4, 5]);
    }

    #[test]
    fn test_extract_whole_document_is_identity() {
        let pages = doc(6);
        assert_eq!(extract(&pages, range(6, 1, 6)).unwrap(), pages);
    }

    #[test]
    fn test_extract_rejects_range_for_longer_document() {
        let pages = doc(3);
        let err = extract(&pages, range(10, 2, 5)).unwrap_err();
        assert!(matches!(err, Error::Bounds { what: "end", .. }));
    }

    #[test]
    fn test_remove_inner_range() {
        let pages = doc(10);
        assert_eq!(
            remove(&pages, range(10, 3, 5)).unwrap(),
            vec![1, 2, 6, 7, 8, 9, 10]
        );
    }

    #[test]
    fn test_remove_whole_document_is_empty() {
        let pages = doc(4);
        assert!(remove(&pages, range(4, 1, 4)).unwrap().is_empty());
    }

    #[test]
    fn test_extract_and_remove_partition() {
        let n = 8;
        let pages = doc(n);
        for start in 1..=n {
            for end in start..=n {
                let r = range(n, start, end);
                let inside = extract(&pages, r).unwrap();
                let outside = remove(&pages, r).unwrap();
                assert_eq!(inside.len(), end - start + 1);
                assert_eq!(outside.len(), n - (end - start + 1));

                // Head, block and tail reassemble the original order.
                let mut rebuilt = outside[..start - 1].to_vec();
                rebuilt.extend(&inside);
                rebuilt.extend(&outside[start - 1..]);
                assert_eq!(rebuilt, pages);
            }
        }
    }

    #[test]
    fn test_move_block_after_anchor() {
        let pages = doc(10);
        let moved = move_block(&pages, range(10, 1, 2), Anchor::after(5)).unwrap();
        assert_eq!(moved, vec![3, 4, 5, 1, 2, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_move_block_before_earlier_anchor() {
        let pages = doc(10);
        let moved = move_block(&pages, range(10, 8, 10), Anchor::before(2)).unwrap();
        assert_eq!(moved, vec![1, 8, 9, 10, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_move_block_to_front_and_back() {
        let pages = doc(5);
        let front = move_block(&pages, range(5, 4, 5), Anchor::before(1)).unwrap();
        assert_eq!(front, vec![4, 5, 1, 2, 3]);

        let back = move_block(&pages, range(5, 1, 1), Anchor::after(5)).unwrap();
        assert_eq!(back, vec![2, 3, 4, 5, 1]);
    }

    #[test]
    fn test_move_single_page_after_next_page() {
        let pages = doc(10);
        let moved = move_block(&pages, range(10, 1, 1), Anchor::after(2)).unwrap();
        assert_eq!(moved, vec![2, 1, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_move_rejects_single_page_back_into_place() {
        let pages = doc(10);
        let err = move_block(&pages, range(10, 1, 1), Anchor::before(2)).unwrap_err();
        assert!(matches!(
            err,
            Error::NoOpRejected {
                start: 1,
                end: 1,
                side: Side::Before,
                anchor: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_move_rejects_anchor_inside_block() {
        let pages = doc(10);
        for anchor in 3..=6 {
            for side in [Side::Before, Side::After] {
                let err =
                    move_block(&pages, range(10, 3, 6), Anchor::new(anchor, side)).unwrap_err();
                assert!(matches!(err, Error::NoOpRejected { .. }));
            }
        }
    }

    #[test]
    fn test_move_rejects_adjacent_anchors() {
        let pages = doc(10);
        let err = move_block(&pages, range(10, 4, 6), Anchor::after(3)).unwrap_err();
        let Error::NoOpRejected { alternatives, .. } = &err else {
            panic!("expected NoOpRejected, got {err:?}");
        };
        assert_eq!(alternatives.below, Some(2));
        assert_eq!(alternatives.above, Some(8));

        let err = move_block(&pages, range(10, 4, 6), Anchor::before(7)).unwrap_err();
        assert!(matches!(err, Error::NoOpRejected { .. }));
    }

    #[test]
    fn test_move_accepts_adjacent_anchor_on_far_side() {
        let pages = doc(10);
        let moved = move_block(&pages, range(10, 4, 6), Anchor::before(3)).unwrap();
        assert_eq!(moved, vec![1, 2, 4, 5, 6, 3, 7, 8, 9, 10]);

        let moved = move_block(&pages, range(10, 4, 6), Anchor::after(7)).unwrap();
        assert_eq!(moved, vec![1, 2, 3, 7, 4, 5, 6, 8, 9, 10]);
    }

    #[test]
    fn test_no_op_predicate_matches_result() {
        let n = 6;
        let pages = doc(n);
        for start in 1..=n {
            for end in start..=n {
                for page in 1..=n {
                    for side in [Side::Before, Side::After] {
                        let r = range(n, start, end);
                        let anchor = Anchor::new(page, side);
                        match move_block(&pages, r, anchor) {
                            Ok(moved) => {
                                assert_ne!(moved, pages, "{r} {anchor} should change order");
                                let mut sorted = moved.clone();
                                sorted.sort_unstable();
                                assert_eq!(sorted, pages);
                            }
                            Err(Error::NoOpRejected { .. }) => assert!(is_no_op(r, anchor)),
                            Err(e) => panic!("unexpected error {e}"),
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_move_inverse_restores_order() {
        let pages = doc(10);
        // Pages 2-3 go after page 7; they now sit at positions 6-7 and the
        // original page 1 is still first, so moving them after page 1 undoes it.
        let moved = move_block(&pages, range(10, 2, 3), Anchor::after(7)).unwrap();
        assert_eq!(moved, vec![1, 4, 5, 6, 7, 2, 3, 8, 9, 10]);
        let restored = move_block(&moved, range(10, 6, 7), Anchor::after(1)).unwrap();
        assert_eq!(restored, pages);
    }

    #[test]
    fn test_move_anchor_out_of_bounds() {
        let pages = doc(5);
        let err = move_block(&pages, range(5, 1, 2), Anchor::after(6)).unwrap_err();
        assert!(matches!(err, Error::Bounds { what: "anchor", .. }));
    }

    #[test]
    fn test_insert_after_anchor() {
        let destination: Vec<String> = doc(10).iter().map(ToString::to_string).collect();
        let block = vec!["A".to_string(), "B".to_string()];
        let expanded = insert(&destination, &block, Anchor::after(5)).unwrap();
        assert_eq!(
            expanded,
            vec!["1", "2", "3", "4", "5", "A", "B", "6", "7", "8", "9", "10"]
        );
        assert_eq!(expanded.len(), 12);
    }

    #[test]
    fn test_insert_at_edges() {
        let destination = doc(3);
        assert_eq!(
            insert(&destination, &[9], Anchor::before(1)).unwrap(),
            vec![9, 1, 2, 3]
        );
        assert_eq!(
            insert(&destination, &[9], Anchor::after(3)).unwrap(),
            vec![1, 2, 3, 9]
        );
    }

    #[test]
    fn test_insert_rejects_anchor_outside_destination() {
        let destination = doc(3);
        assert!(insert(&destination, &[9], Anchor::after(4)).is_err());
        assert!(insert(&destination, &[9], Anchor::before(0)).is_err());
        assert!(insert(&Vec::<usize>::new(), &[9], Anchor::before(1)).is_err());
    }

    #[test]
    fn test_insert_blocks_accumulates_offsets() {
        let destination = doc(5);
        let insertions = vec![
            Insertion::new(vec![100, 101], Anchor::after(2)),
            Insertion::new(vec![200], Anchor::before(4)),
            Insertion::new(vec![300], Anchor::after(5)),
        ];
        let expanded = insert_blocks(&destination, &insertions).unwrap();
        assert_eq!(expanded, vec![1, 2, 100, 101, 3, 200, 4, 5, 300]);
    }

    #[test]
    fn test_insert_blocks_order_independent_for_distinct_points() {
        let destination = doc(5);
        let a = Insertion::new(vec![100], Anchor::after(1));
        let b = Insertion::new(vec![200, 201], Anchor::before(5));
        let forward = insert_blocks(&destination, &[a.clone(), b.clone()]).unwrap();
        let backward = insert_blocks(&destination, &[b, a]).unwrap();
        assert_eq!(forward, vec![1, 100, 2, 3, 4, 200, 201, 5]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_insert_blocks_same_point_keeps_request_order() {
        let destination = doc(3);
        let insertions = vec![
            Insertion::new(vec![100], Anchor::after(1)),
            Insertion::new(vec![200], Anchor::before(2)),
        ];
        let expanded = insert_blocks(&destination, &insertions).unwrap();
        assert_eq!(expanded, vec![1, 100, 200, 2, 3]);
    }

    #[test]
    fn test_insert_blocks_validates_all_anchors_first() {
        let destination = doc(3);
        let insertions = vec![
            Insertion::new(vec![100, 101], Anchor::after(3)),
            // Valid against the expanded sequence, not against the original.
            Insertion::new(vec![200], Anchor::after(5)),
        ];
        let err = insert_blocks(&destination, &insertions).unwrap_err();
        assert!(matches!(err, Error::Bounds { what: "anchor", page: 5, .. }));
    }

    #[test]
    fn test_insert_blocks_empty() {
        let err = insert_blocks::<usize>(&doc(3), &[]).unwrap_err();
        assert!(matches!(err, Error::EmptyInput("insert")));
    }

    #[test]
    fn test_merge_in_order() {
        let merged = merge(&[vec![1, 2, 3], vec![4, 5]]).unwrap();
        assert_eq!(merged, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_merge_single_and_empty_documents() {
        assert_eq!(merge(&[vec![1, 2]]).unwrap(), vec![1, 2]);
        assert_eq!(merge(&[vec![], vec![7]]).unwrap(), vec![7]);
        let err = merge::<usize, Vec<usize>>(&[]).unwrap_err();
        assert!(matches!(err, Error::EmptyInput("merge")));
    }
}
