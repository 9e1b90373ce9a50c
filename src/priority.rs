//! Orderings built on `StructureKind::priority`.
//!
//! All orderings are stable: entries that tie on both priority and the
//! secondary key keep their enumeration order.

use crate::room::*;
use std::cmp::Ordering;

/// Compare `a_num / a_den` with `b_num / b_den` exactly. A zero denominator
/// counts as a fraction of zero.
pub fn compare_fractions(a_num: u32, a_den: u32, b_num: u32, b_den: u32) -> Ordering {
    let (a_num, a_den) = if a_den == 0 { (0, 1) } else { (a_num, a_den) };
    let (b_num, b_den) = if b_den == 0 { (0, 1) } else { (b_num, b_den) };

    (a_num as u64 * b_den as u64).cmp(&(b_num as u64 * a_den as u64))
}

/// Higher priority first, then most complete first.
pub fn construction_order(a: &ConstructionEntry, b: &ConstructionEntry) -> Ordering {
    b.kind
        .priority()
        .cmp(&a.kind.priority())
        .then_with(|| compare_fractions(b.progress, b.progress_total, a.progress, a.progress_total))
}

/// Higher priority first, then most damaged first.
pub fn repair_order(a: &Structure, b: &Structure) -> Ordering {
    b.kind
        .priority()
        .cmp(&a.kind.priority())
        .then_with(|| compare_fractions(a.hits, a.hits_max, b.hits, b.hits_max))
}

pub fn order_construction(entries: &mut [ConstructionEntry]) {
    entries.sort_by(construction_order);
}

pub fn order_repair(structures: &mut [Structure]) {
    structures.sort_by(repair_order);
}
