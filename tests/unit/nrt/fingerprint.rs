use super::*;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::ids::CompositionId;
use crate::nrt::table::{CompositionSnapshot, SimulationFrame};

fn table(frames: &[(u64, bool)], generation: u64) -> SimulationTable {
    let mut t = SimulationTable::new(Fps::new(30, 1).unwrap(), generation);
    for &(frame, is_visible) in frames {
        let mut f = SimulationFrame::default();
        f.snapshots.push(CompositionSnapshot {
            composition: CompositionId(0),
            frame: FrameIndex(frame),
            is_visible,
        });
        t.push(f);
    }
    t
}

#[test]
fn same_table_same_fingerprint() {
    let t = table(&[(1, true), (2, true)], 1);
    assert_eq!(fingerprint_table(&t), fingerprint_table(&t.clone()));
}

#[test]
fn generation_does_not_affect_fingerprint() {
    assert_eq!(
        fingerprint_table(&table(&[(1, true)], 1)),
        fingerprint_table(&table(&[(1, true)], 7))
    );
}

#[test]
fn visibility_and_truncation_change_fingerprint() {
    let a = table(&[(1, true)], 1);
    let b = table(&[(1, false)], 1);
    assert_ne!(fingerprint_table(&a), fingerprint_table(&b));

    let mut c = a.clone();
    c.mark_truncated();
    assert_ne!(fingerprint_table(&a), fingerprint_table(&c));
}

#[test]
fn display_is_32_hex_digits() {
    let s = fingerprint_table(&table(&[], 0)).to_string();
    assert_eq!(s.len(), 32);
    assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
}
