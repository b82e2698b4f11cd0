use std::collections::{BTreeMap, BTreeSet};

use crate::{
    catalog::TreeCatalog,
    config::{LightConfig, ReplayConfig},
    foundation::{
        core::{Point, Visibility},
        error::{ReplayError, ReplayResult},
    },
    replay::robot::RobotRig,
    scene::adapter::{CameraSpec, LightKind, LightSpec, MeshFormat, Mutation, ObjectId, SceneAdapter},
};

/// Handles of the objects created once per scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastHandles {
    pub camera: ObjectId,
    pub sun: ObjectId,
    pub fill_light: ObjectId,
    pub floor: ObjectId,
    pub robot: ObjectId,
}

/// Hidden vegetation prototypes known to this session.
///
/// Filled by importing the bundle, or recovered from a scene that already holds the
/// templates. Visibility alone never makes an object a template.
#[derive(Clone, Debug, Default)]
pub struct TemplateRegistry {
    by_basename: BTreeMap<String, ObjectId>,
    templates: BTreeSet<ObjectId>,
    loaded: bool,
}

impl TemplateRegistry {
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.templates.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.templates.iter().copied()
    }

    pub fn get(&self, basename: &str) -> Option<ObjectId> {
        self.by_basename.get(basename).copied()
    }

    /// Template to clone for a trace type code.
    pub fn resolve(&self, catalog: &TreeCatalog, code: &str) -> ReplayResult<ObjectId> {
        let basename = catalog.basename_for(code)?;
        self.get(basename).ok_or_else(|| ReplayError::MissingTemplate {
            code: code.to_string(),
            basename: basename.to_string(),
        })
    }

    fn covers(&self, catalog: &TreeCatalog) -> bool {
        catalog.basenames().all(|b| self.by_basename.contains_key(b))
    }

    fn insert(&mut self, id: ObjectId, basename: Option<&str>) {
        self.templates.insert(id);
        if let Some(b) = basename {
            self.by_basename.entry(b.to_string()).or_insert(id);
        }
    }
}

/// Make sure camera, lights, floor, robot and vegetation templates exist, creating only
/// what is missing. Safe to call any number of times.
pub fn ensure_cast<S: SceneAdapter + ?Sized>(
    scene: &mut S,
    config: &ReplayConfig,
    registry: &mut TemplateRegistry,
) -> ReplayResult<CastHandles> {
    let camera = match scene.find(&config.camera.name) {
        Some(id) => id,
        None => {
            tracing::debug!(name = %config.camera.name, "creating camera");
            scene.create_camera(&CameraSpec {
                name: config.camera.name.clone(),
                location: config.camera.location,
                rotation: config.camera.rotation,
            })?
        }
    };
    let floor = match scene.find(&config.floor.name) {
        Some(id) => id,
        None => {
            tracing::debug!(name = %config.floor.name, "creating floor");
            scene.create_plane(&config.floor.name, config.floor.size)?
        }
    };
    let robot = ensure_robot(scene, config)?;
    let sun = ensure_light(scene, &config.sun, LightKind::Sun)?;
    let fill_light = ensure_light(scene, &config.fill_light, LightKind::Point)?;
    import_templates(scene, config, registry, false)?;

    Ok(CastHandles {
        camera,
        sun,
        fill_light,
        floor,
        robot,
    })
}

fn ensure_light<S: SceneAdapter + ?Sized>(
    scene: &mut S,
    light: &LightConfig,
    kind: LightKind,
) -> ReplayResult<ObjectId> {
    if let Some(id) = scene.find(&light.name) {
        return Ok(id);
    }
    tracing::debug!(name = %light.name, ?kind, "creating light");
    scene.create_light(&LightSpec {
        name: light.name.clone(),
        kind,
        energy: light.energy,
        location: light.location,
        rotation: light.rotation,
    })
}

fn ensure_robot<S: SceneAdapter + ?Sized>(
    scene: &mut S,
    config: &ReplayConfig,
) -> ReplayResult<ObjectId> {
    let robot = &config.robot;
    if let Some(id) = scene.find(&robot.name) {
        return Ok(id);
    }

    let imported = scene.import_mesh(&config.robot_path, MeshFormat::Fbx)?;
    let Some(&id) = imported.first() else {
        return Err(ReplayError::scene(format!(
            "robot model '{}' imported no objects",
            config.robot_path.display()
        )));
    };
    // Rigs ship with their own demo actions.
    scene.clear_animation(id)?;
    scene.rename(id, &robot.name)?;
    let [x, y] = robot.start;
    RobotRig::new(id, robot).set_position(scene, Point::new(x, y), robot.start_heading)?;
    tracing::info!(path = %config.robot_path.display(), "imported robot");
    Ok(id)
}

/// Import the vegetation bundle as hidden templates, unless this session already holds
/// them or can recover every catalog template from the scene. `force` always re-imports.
///
/// Each catalog basename maps to the first imported object whose name starts with it;
/// that object's geometry is shifted by the basename's origin offset once, here.
pub fn import_templates<S: SceneAdapter + ?Sized>(
    scene: &mut S,
    config: &ReplayConfig,
    registry: &mut TemplateRegistry,
    force: bool,
) -> ReplayResult<()> {
    let catalog = &config.catalog;
    if !force {
        if registry.is_loaded() {
            return Ok(());
        }
        let recovered = recover_templates(scene, catalog)?;
        if recovered.covers(catalog) {
            tracing::info!(templates = recovered.len(), "reusing vegetation templates");
            *registry = TemplateRegistry {
                loaded: true,
                ..recovered
            };
            return Ok(());
        }
    }

    let ids = scene.import_mesh(&config.trees_path, MeshFormat::Obj)?;
    let mut fresh = TemplateRegistry {
        loaded: true,
        ..TemplateRegistry::default()
    };
    let mut names = Vec::with_capacity(ids.len());
    for &id in &ids {
        scene.apply(id, Mutation::SetVisibility(Visibility::HIDDEN))?;
        names.push((id, scene.info(id)?.name));
        fresh.insert(id, None);
    }

    for basename in catalog.basenames() {
        let Some(&(id, _)) = names.iter().find(|(_, n)| n.starts_with(basename)) else {
            tracing::warn!(basename, "vegetation bundle has no object for basename");
            continue;
        };
        if let Some(offset) = catalog.origin_for(basename) {
            scene.translate_geometry(id, offset)?;
        }
        fresh.insert(id, Some(basename));
    }

    tracing::info!(
        path = %config.trees_path.display(),
        objects = ids.len(),
        "imported vegetation templates"
    );
    *registry = fresh;
    Ok(())
}

/// Delete every template set in the scene: the ones `registry` holds and any recoverable
/// from an earlier process. Leaves `registry` empty and unloaded.
pub fn discard_templates<S: SceneAdapter + ?Sized>(
    scene: &mut S,
    catalog: &TreeCatalog,
    registry: &mut TemplateRegistry,
) -> ReplayResult<usize> {
    let live: BTreeSet<ObjectId> = scene.objects().into_iter().collect();
    let mut stale: BTreeSet<ObjectId> = registry.ids().filter(|id| live.contains(id)).collect();
    stale.extend(recover_templates(scene, catalog)?.ids());
    let stale: Vec<ObjectId> = stale.into_iter().collect();
    if !stale.is_empty() {
        scene.delete(&stale)?;
    }
    *registry = TemplateRegistry::default();
    tracing::debug!(deleted = stale.len(), "discarded vegetation templates");
    Ok(stale.len())
}

/// Hidden-from-render objects named after a catalog basename.
fn recover_templates<S: SceneAdapter + ?Sized>(
    scene: &S,
    catalog: &TreeCatalog,
) -> ReplayResult<TemplateRegistry> {
    let mut recovered = TemplateRegistry::default();
    for id in scene.objects() {
        let info = scene.info(id)?;
        if info.visibility.render {
            continue;
        }
        if let Some(basename) = catalog.basename_of(&info.name) {
            recovered.insert(id, Some(basename));
        }
    }
    Ok(recovered)
}

#[cfg(test)]
#[path = "../../tests/unit/replay/bootstrap.rs"]
mod tests;
