use std::f64::consts::FRAC_PI_2;

use super::*;
use crate::{
    foundation::core::{Euler, Vec3},
    scene::{adapter::ObjectKind, memory::MemoryScene},
};

const BUNDLE: [&str; 9] = [
    "Bottom_Trunk",
    "Bark___1_Pine",
    "Mossy_Tree",
    "Bark___0_Birch",
    "Walnut_Leaves",
    "Bark___S_Spruce",
    "Sonnerat_Palm",
    "Oak_Leaves",
    "Leaves_Extra",
];

fn scene_for(cfg: &ReplayConfig) -> MemoryScene {
    MemoryScene::new()
        .with_bundle(cfg.trees_path.clone(), BUNDLE)
        .with_bundle(cfg.robot_path.clone(), ["Armature"])
}

#[test]
fn ensure_cast_builds_the_scene_once() {
    let cfg = ReplayConfig::default();
    let mut scene = scene_for(&cfg);
    let mut registry = TemplateRegistry::default();

    let first = ensure_cast(&mut scene, &cfg, &mut registry).unwrap();
    let len = scene.len();
    assert_eq!(len, 5 + BUNDLE.len());

    let second = ensure_cast(&mut scene, &cfg, &mut registry).unwrap();
    assert_eq!(first, second);
    assert_eq!(scene.len(), len);
    for name in ["Camera", "Sun", "Diffuse", "Floor", "Robot", "Oak_Leaves"] {
        assert_eq!(scene.count_named(name), 1, "{name}");
    }
    assert_eq!(scene.active_camera(), Some(first.camera));
}

#[test]
fn robot_is_renamed_and_placed_at_start_pose() {
    let cfg = ReplayConfig::default();
    let mut scene = scene_for(&cfg);
    let cast = ensure_cast(&mut scene, &cfg, &mut TemplateRegistry::default()).unwrap();

    let robot = scene.object(cast.robot).unwrap();
    assert_eq!(robot.name, "Robot");
    assert_eq!(robot.location, Vec3::new(20.0, -10.0, 3.2));
    assert_eq!(
        robot.rotation,
        Euler::new(0.0, FRAC_PI_2, (-30.0f64).to_radians())
    );
    assert!(robot.animation.is_empty());
    assert!(scene.find("Armature").is_none());
}

#[test]
fn lights_follow_config() {
    let cfg = ReplayConfig::default();
    let mut scene = scene_for(&cfg);
    let cast = ensure_cast(&mut scene, &cfg, &mut TemplateRegistry::default()).unwrap();

    let sun = scene.info(cast.sun).unwrap();
    assert_eq!(sun.kind, ObjectKind::Light(LightKind::Sun));
    assert_eq!(sun.rotation, Euler::new(0.0, 0.9, 0.9));
    let fill = scene.info(cast.fill_light).unwrap();
    assert_eq!(fill.kind, ObjectKind::Light(LightKind::Point));
    assert_eq!(fill.location, scene.info(cast.camera).unwrap().location);
}

#[test]
fn templates_are_hidden_and_offset_once() {
    let cfg = ReplayConfig::default();
    let mut scene = scene_for(&cfg);
    let mut registry = TemplateRegistry::default();
    ensure_cast(&mut scene, &cfg, &mut registry).unwrap();
    ensure_cast(&mut scene, &cfg, &mut registry).unwrap();

    assert_eq!(registry.len(), BUNDLE.len());
    for name in BUNDLE {
        let id = scene.find(name).unwrap();
        assert!(registry.contains(id));
        assert_eq!(scene.info(id).unwrap().visibility, Visibility::HIDDEN);
    }
    let trunk = registry.get("Bottom_T").unwrap();
    assert_eq!(scene.info(trunk).unwrap().name, "Bottom_Trunk");
    assert_eq!(
        scene.object(trunk).unwrap().geometry_offset,
        Vec3::new(40.0, 0.0, 0.0)
    );
    let extra = scene.find("Leaves_Extra").unwrap();
    assert_eq!(scene.object(extra).unwrap().geometry_offset, Vec3::ZERO);
}

#[test]
fn fresh_registry_recovers_templates_without_importing() {
    let cfg = ReplayConfig::default();
    let mut scene = scene_for(&cfg);
    let mut first = TemplateRegistry::default();
    ensure_cast(&mut scene, &cfg, &mut first).unwrap();
    let len = scene.len();

    let mut second = TemplateRegistry::default();
    ensure_cast(&mut scene, &cfg, &mut second).unwrap();
    assert_eq!(scene.len(), len);
    assert!(second.is_loaded());
    for basename in cfg.catalog.basenames() {
        assert_eq!(second.get(basename), first.get(basename), "{basename}");
    }
}

#[test]
fn incomplete_recovery_reimports_the_bundle() {
    let cfg = ReplayConfig::default();
    let mut scene = scene_for(&cfg);
    let mut first = TemplateRegistry::default();
    ensure_cast(&mut scene, &cfg, &mut first).unwrap();
    let oak = first.get("Oak_Leav").unwrap();
    scene.delete(&[oak]).unwrap();
    let len = scene.len();

    let mut second = TemplateRegistry::default();
    ensure_cast(&mut scene, &cfg, &mut second).unwrap();
    assert_eq!(scene.len(), len + BUNDLE.len());
    assert_eq!(scene.count_named("Oak_Leaves"), 1);
    let trunk = second.get("Bottom_T").unwrap();
    assert_ne!(Some(trunk), first.get("Bottom_T"));
    assert_eq!(scene.info(trunk).unwrap().name, "Bottom_Trunk.001");
}

#[test]
fn force_import_always_imports() {
    let cfg = ReplayConfig::default();
    let mut scene = scene_for(&cfg);
    let mut registry = TemplateRegistry::default();
    import_templates(&mut scene, &cfg, &mut registry, false).unwrap();
    import_templates(&mut scene, &cfg, &mut registry, true).unwrap();
    assert_eq!(scene.len(), 2 * BUNDLE.len());
    assert_eq!(registry.len(), BUNDLE.len());
}

#[test]
fn discard_removes_templates_the_registry_never_saw() {
    let cfg = ReplayConfig::default();
    let mut scene = scene_for(&cfg);
    let mut first = TemplateRegistry::default();
    import_templates(&mut scene, &cfg, &mut first, false).unwrap();

    let mut fresh = TemplateRegistry::default();
    let deleted = discard_templates(&mut scene, &cfg.catalog, &mut fresh).unwrap();
    assert_eq!(deleted, cfg.catalog.basenames().count());
    for basename in cfg.catalog.basenames() {
        assert!(scene.object(first.get(basename).unwrap()).is_none(), "{basename}");
    }
    // Not named after a basename, so never a template.
    assert_eq!(scene.count_named("Leaves_Extra"), 1);
    assert!(!fresh.is_loaded());
}

#[test]
fn resolve_distinguishes_unknown_codes_from_missing_templates() {
    let cfg = ReplayConfig::default();
    let mut scene = MemoryScene::new().with_bundle(cfg.trees_path.clone(), ["Bottom_Trunk"]);
    let mut registry = TemplateRegistry::default();
    import_templates(&mut scene, &cfg, &mut registry, false).unwrap();

    let trunk = registry.resolve(&cfg.catalog, "C").unwrap();
    assert_eq!(scene.info(trunk).unwrap().name, "Bottom_Trunk");
    assert!(matches!(
        registry.resolve(&cfg.catalog, "Z"),
        Err(ReplayError::UnknownTreeType { code }) if code == "Z"
    ));
    assert!(matches!(
        registry.resolve(&cfg.catalog, "L"),
        Err(ReplayError::MissingTemplate { code, basename }) if code == "L" && basename == "Oak_Leav"
    ));
}

#[test]
fn empty_robot_model_is_an_error() {
    let cfg = ReplayConfig::default();
    let mut scene = MemoryScene::new()
        .with_bundle(cfg.trees_path.clone(), BUNDLE)
        .with_bundle(cfg.robot_path.clone(), Vec::<String>::new());
    let err = ensure_cast(&mut scene, &cfg, &mut TemplateRegistry::default()).unwrap_err();
    assert!(matches!(err, ReplayError::Scene(_)));
}
