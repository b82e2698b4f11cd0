use std::collections::BTreeMap;

use crate::foundation::{
    core::Point,
    error::{ReplayError, ReplayResult},
};

/// The controlled agent's pose in one take.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SelfState {
    pub coordinates: Point,
    pub heading: f64, // radians, never scaled
}

/// One placed tree or bush.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VegetationState {
    pub coordinates: Point,
    pub kind: String, // type code, resolved through `TreeCatalog`
    pub radius: f64,
}

/// Scene state of a single take, already in scene units.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SimulationFrame {
    pub robot: SelfState,
    pub path: Vec<Point>,
    pub vegetation: BTreeMap<String, VegetationState>, // keyed by entity id
}

/// Every take of a run, in file order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Trace {
    pub frames: Vec<SimulationFrame>,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, take: usize) -> ReplayResult<&SimulationFrame> {
        self.frames.get(take).ok_or(ReplayError::TakeOutOfRange {
            take,
            len: self.frames.len(),
        })
    }

    /// Take following `take`, if any.
    pub fn next_frame(&self, take: usize) -> Option<&SimulationFrame> {
        self.frames.get(take.checked_add(1)?)
    }
}
