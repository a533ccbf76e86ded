//! In-memory sort of one run's buffer.

use crate::record::{Field, Record};

/// Stable recursive merge sort by `field`
///
/// On ties the left half wins, so equal records keep their input order.
pub fn merge_sort(records: &mut [Record], field: Field) {
    if records.len() <= 1 {
        return;
    }
    let mid = records.len() / 2;
    merge_sort(&mut records[..mid], field);
    merge_sort(&mut records[mid..], field);
    merge(records, mid, field);
}

/// Merge the sorted halves `[..mid]` and `[mid..]` in place
fn merge(records: &mut [Record], mid: usize, field: Field) {
    let left = records[..mid].to_vec();
    let right = records[mid..].to_vec();

    let (mut i, mut j) = (0, 0);
    for slot in records.iter_mut() {
        let take_left = j == right.len() || (i < left.len() && !right[j].less_than(&left[i], field));
        if take_left {
            *slot = left[i].clone();
            i += 1;
        } else {
            *slot = right[j].clone();
            j += 1;
        }
    }
}
