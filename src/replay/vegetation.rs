use std::collections::BTreeSet;

use crate::{
    animation::ease::Ease,
    catalog::TreeCatalog,
    foundation::{
        core::{FrameIndex, Vec3, Visibility},
        error::ReplayResult,
    },
    replay::bootstrap::TemplateRegistry,
    scene::adapter::{Mutation, ObjectId, SceneAdapter},
    trace::model::SimulationFrame,
};

/// Delete the clones of an earlier take.
///
/// Besides the tracked handles this sweeps any rendered object named after a catalog
/// basename that is not a template, which is what a previous process leaves behind.
/// Leftovers match by name prefix: `Oak_Leaves.004` is swept, `Old_Oak_Leaves` is not.
pub fn delete_clones<S: SceneAdapter + ?Sized>(
    scene: &mut S,
    catalog: &TreeCatalog,
    registry: &TemplateRegistry,
    previous: &[ObjectId],
) -> ReplayResult<usize> {
    let tracked: BTreeSet<ObjectId> = previous.iter().copied().collect();
    let mut stale = Vec::new();
    for id in scene.objects() {
        if registry.contains(id) {
            continue;
        }
        if tracked.contains(&id) {
            stale.push(id);
            continue;
        }
        let info = scene.info(id)?;
        if info.visibility.render && catalog.basename_of(&info.name).is_some() {
            stale.push(id);
        }
    }
    if !stale.is_empty() {
        scene.delete(&stale)?;
    }
    Ok(stale.len())
}

/// Replace the visible vegetation with one clone per entity in `frame`.
///
/// Entities are placed in id order. An unknown type code stops the pass; clones placed
/// before it stay in the scene and are swept by the next call.
pub fn reclone_vegetation<S: SceneAdapter + ?Sized>(
    scene: &mut S,
    frame: &SimulationFrame,
    catalog: &TreeCatalog,
    registry: &TemplateRegistry,
    previous: &[ObjectId],
    reveal_frames: Option<u64>,
) -> ReplayResult<Vec<ObjectId>> {
    let removed = delete_clones(scene, catalog, registry, previous)?;

    let mut clones = Vec::with_capacity(frame.vegetation.len());
    for (entity, state) in &frame.vegetation {
        let template = registry.resolve(catalog, &state.kind).inspect_err(|err| {
            tracing::warn!(entity = %entity, %err, "cannot place vegetation");
        })?;
        let id = scene.clone_object(template, Vec3::on_ground(state.coordinates, 0.0))?;
        match reveal_frames {
            Some(n) => {
                scene.insert_keyframe(
                    id,
                    FrameIndex(0),
                    Mutation::SetVisibility(Visibility::HIDDEN),
                    Ease::Constant,
                )?;
                scene.insert_keyframe(
                    id,
                    FrameIndex(n),
                    Mutation::SetVisibility(Visibility::SHOWN),
                    Ease::Constant,
                )?;
            }
            None => scene.apply(id, Mutation::SetVisibility(Visibility::SHOWN))?,
        }
        clones.push(id);
    }

    tracing::debug!(removed, placed = clones.len(), "recloned vegetation");
    Ok(clones)
}

#[cfg(test)]
#[path = "../../tests/unit/replay/vegetation.rs"]
mod tests;
