use std::collections::BTreeSet;

use crate::{
    config::PathStyle,
    foundation::{
        core::{Euler, Point, Vec3},
        error::ReplayResult,
    },
    scene::adapter::{BoxSpec, CylinderSpec, MaterialId, ObjectId, SceneAdapter},
};

/// Box spanning one polyline edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneSegment {
    /// Edge index: the segment runs from waypoint `index` to `index + 1`.
    pub index: usize,
    pub center: Point,
    pub length: f64,
    pub heading: f64,
}

/// Disc at an interior waypoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneJoint {
    /// Waypoint index, never the first or last.
    pub index: usize,
    pub center: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LanePiece {
    Segment(LaneSegment),
    Joint(LaneJoint),
}

/// Pieces approximating a thick ribbon along `points`, in build order: each interior
/// joint comes right before the segment leaving it.
///
/// Fewer than two points plan nothing.
pub fn plan_lane(points: &[Point]) -> Vec<LanePiece> {
    let mut pieces = Vec::with_capacity((2 * points.len()).saturating_sub(3));
    for (index, pair) in points.windows(2).enumerate() {
        let (start, end) = (pair[0], pair[1]);
        if index > 0 {
            pieces.push(LanePiece::Joint(LaneJoint {
                index,
                center: start,
            }));
        }
        pieces.push(LanePiece::Segment(LaneSegment {
            index,
            center: start.midpoint(end),
            length: start.distance(end),
            heading: (end - start).atan2(),
        }));
    }
    pieces
}

impl LaneSegment {
    pub fn to_box(&self, style: &PathStyle) -> BoxSpec {
        BoxSpec {
            name: format!("{}Rect.{:03}", style.prefix, self.index),
            // Thicker than the joints so the seams stay covered.
            dimensions: Vec3::new(self.length, style.width, style.thickness * 1.5),
            location: Vec3::on_ground(self.center, 0.0),
            rotation: Euler::yaw(self.heading),
        }
    }
}

impl LaneJoint {
    pub fn to_cylinder(&self, style: &PathStyle) -> CylinderSpec {
        CylinderSpec {
            name: format!("{}Circle.{:03}", style.prefix, self.index),
            radius: style.width / 2.0,
            depth: style.thickness,
            location: Vec3::on_ground(self.center, 0.0),
        }
    }
}

/// Delete the previous ribbon and build a new one along `points`.
///
/// Stale pieces are the ones tracked in `previous` plus anything whose name carries the
/// path prefix. Every segment after the first subtracts only the segment right before it.
/// Returns the created handles in build order.
pub fn rebuild_path<S: SceneAdapter + ?Sized>(
    scene: &mut S,
    style: &PathStyle,
    material: MaterialId,
    previous: &[ObjectId],
    points: &[Point],
) -> ReplayResult<Vec<ObjectId>> {
    delete_path(scene, style, previous)?;

    let plan = plan_lane(points);
    let mut created = Vec::with_capacity(plan.len());
    let mut prev_segment: Option<ObjectId> = None;
    for piece in &plan {
        let id = match piece {
            LanePiece::Joint(joint) => scene.create_cylinder(&joint.to_cylinder(style))?,
            LanePiece::Segment(segment) => {
                let id = scene.create_box(&segment.to_box(style))?;
                if let Some(prev) = prev_segment {
                    scene.subtract(id, prev)?;
                }
                prev_segment = Some(id);
                id
            }
        };
        scene.append_material(id, material)?;
        created.push(id);
    }

    tracing::debug!(
        waypoints = points.len(),
        pieces = created.len(),
        "rebuilt path"
    );
    Ok(created)
}

/// Remove every path piece, tracked or left over from an earlier run.
pub fn delete_path<S: SceneAdapter + ?Sized>(
    scene: &mut S,
    style: &PathStyle,
    previous: &[ObjectId],
) -> ReplayResult<()> {
    let live: BTreeSet<ObjectId> = scene.objects().into_iter().collect();
    let mut stale: Vec<ObjectId> = previous
        .iter()
        .copied()
        .filter(|id| live.contains(id))
        .collect();
    for id in scene.find_prefixed(&style.prefix) {
        if !stale.contains(&id) {
            stale.push(id);
        }
    }
    if !stale.is_empty() {
        scene.delete(&stale)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/replay/path.rs"]
mod tests;
