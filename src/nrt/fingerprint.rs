use crate::nrt::table::SimulationTable;

/// 128-bit digest of a simulation table, stable across runs and platforms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TableFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for TableFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Hash the frame rate, truncation flag and every recorded snapshot.
///
/// The generation stamp is left out, so rebuilding the same schedule yields the same digest.
pub fn fingerprint_table(table: &SimulationTable) -> TableFingerprint {
    let mut h = PairHasher::new();

    let fps = table.fps();
    h.write_u64(u64::from(fps.num));
    h.write_u64(u64::from(fps.den));
    h.write_u8(u8::from(table.truncated()));

    h.write_u64(table.len() as u64);
    for frame in table.frames() {
        h.write_u64(frame.snapshots.len() as u64);
        for snap in &frame.snapshots {
            h.write_u64(u64::from(snap.composition.0));
            h.write_u64(snap.frame.0);
            h.write_u8(u8::from(snap.is_visible));
        }
    }

    h.finish()
}

struct PairHasher {
    a: Fnv1a64,
    b: Fnv1a64,
}

impl PairHasher {
    fn new() -> Self {
        Self {
            a: Fnv1a64(0xcbf29ce484222325),
            b: Fnv1a64(0x9ae16a3b2f90404f),
        }
    }

    fn write_u8(&mut self, v: u8) {
        self.a.write_bytes(&[v]);
        self.b.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        let bytes = v.to_le_bytes();
        self.a.write_bytes(&bytes);
        self.b.write_bytes(&bytes);
    }

    fn finish(self) -> TableFingerprint {
        TableFingerprint {
            hi: self.a.0,
            lo: self.b.0,
        }
    }
}

#[derive(Clone, Copy)]
struct Fnv1a64(u64);

impl Fnv1a64 {
    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(0x100000001b3);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nrt/fingerprint.rs"]
mod tests;
