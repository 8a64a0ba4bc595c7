//! Deduplication and reassembly of a coordinate batch.

use std::collections::HashMap;

use crate::coord::Coordinate;
use crate::elevation::ElevationSample;

/// A request batch split into its unique coordinates.
///
/// `slots[i]` is the index into `unique` for input position `i`, so every
/// repeat of a coordinate shares one resolution.
#[derive(Debug, Clone)]
pub(crate) struct Batch {
    unique: Vec<Coordinate>,
    slots: Vec<usize>,
}

impl Batch {
    pub(crate) fn new(coords: &[Coordinate]) -> Self {
        let mut index: HashMap<Coordinate, usize> = HashMap::with_capacity(coords.len());
        let mut unique = Vec::new();

        let slots = coords
            .iter()
            .map(|coord| {
                *index.entry(*coord).or_insert_with(|| {
                    unique.push(*coord);
                    unique.len() - 1
                })
            })
            .collect();

        Self { unique, slots }
    }

    pub(crate) fn unique(&self) -> &[Coordinate] {
        &self.unique
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Walks the input order and emits the sample resolved for each position.
    ///
    /// Positions whose coordinate has no result yet are skipped, which is
    /// what an expired request reports.
    pub(crate) fn reassemble(&self, results: &[Option<ElevationSample>]) -> Vec<ElevationSample> {
        self.slots
            .iter()
            .filter_map(|&slot| results.get(slot).cloned().flatten())
            .collect()
    }
}
