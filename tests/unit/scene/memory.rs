use super::*;

fn box_spec(name: &str) -> BoxSpec {
    BoxSpec {
        name: name.to_string(),
        dimensions: Vec3::new(1.0, 1.0, 1.0),
        location: Vec3::ZERO,
        rotation: Euler::IDENTITY,
    }
}

#[test]
fn duplicate_names_get_numeric_suffixes() {
    let mut scene = MemoryScene::new();
    let a = scene.create_box(&box_spec("Crate")).unwrap();
    let b = scene.create_box(&box_spec("Crate")).unwrap();
    let c = scene.create_box(&box_spec("Crate.001")).unwrap();
    assert_eq!(scene.info(a).unwrap().name, "Crate");
    assert_eq!(scene.info(b).unwrap().name, "Crate.001");
    assert_eq!(scene.info(c).unwrap().name, "Crate.002");
}

#[test]
fn suffix_stripping_only_touches_digits() {
    assert_eq!(strip_numeric_suffix("Tree.004"), "Tree");
    assert_eq!(strip_numeric_suffix("Tree.v2"), "Tree.v2");
    assert_eq!(strip_numeric_suffix("Tree"), "Tree");
    assert_eq!(strip_numeric_suffix(".001"), ".001");
}

#[test]
fn find_is_exact_and_prefix_is_ordered() {
    let mut scene = MemoryScene::new();
    let a = scene.create_box(&box_spec("Path_Rect.000")).unwrap();
    let b = scene.create_box(&box_spec("Path_Circle.001")).unwrap();
    scene.create_box(&box_spec("Floor")).unwrap();
    assert_eq!(scene.find("Path_Rect.000"), Some(a));
    assert_eq!(scene.find("Path_Rect"), None);
    assert_eq!(scene.find_prefixed("Path_"), vec![a, b]);
}

#[test]
fn camera_becomes_active_until_deleted() {
    let mut scene = MemoryScene::new();
    let cam = scene
        .create_camera(&CameraSpec {
            name: "Camera".to_string(),
            location: Vec3::new(0.0, 0.0, 10.0),
            rotation: Euler::IDENTITY,
        })
        .unwrap();
    assert_eq!(scene.active_camera(), Some(cam));
    scene.delete(&[cam]).unwrap();
    assert_eq!(scene.active_camera(), None);
    assert!(scene.is_empty());
}

#[test]
fn declared_bundle_imports_in_order() {
    let mut scene = MemoryScene::new().with_bundle("trees.obj", ["Oak_Leaves", "Mossy_Tree"]);
    let ids = scene
        .import_mesh(Path::new("trees.obj"), MeshFormat::Obj)
        .unwrap();
    let names: Vec<String> = ids.iter().map(|id| scene.info(*id).unwrap().name).collect();
    assert_eq!(names, vec!["Oak_Leaves", "Mossy_Tree"]);
}

#[test]
fn obj_names_are_read_from_file() {
    let dir = PathBuf::from("target").join("memory_scene_obj");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("two.obj");
    std::fs::write(&path, "# bundle\no Bark___Sycamore\nv 0 0 0\no Oak_Leaves\nv 1 1 1\n").unwrap();

    let mut scene = MemoryScene::new();
    let ids = scene.import_mesh(&path, MeshFormat::Obj).unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(scene.info(ids[0]).unwrap().name, "Bark___Sycamore");
}

#[test]
fn missing_mesh_files_are_errors() {
    let mut scene = MemoryScene::new();
    assert!(
        scene
            .import_mesh(Path::new("no/such/bundle.obj"), MeshFormat::Obj)
            .is_err()
    );
    let err = scene
        .import_mesh(Path::new("rigs/DRON 001.fbx"), MeshFormat::Fbx)
        .unwrap_err();
    assert!(err.to_string().contains("DRON 001.fbx"), "{err}");
    assert!(scene.is_empty());
}

#[test]
fn fbx_imports_one_object_named_after_the_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/DRON 001.fbx");
    let mut scene = MemoryScene::new();
    let ids = scene.import_mesh(&path, MeshFormat::Fbx).unwrap();
    assert_eq!(ids.len(), 1);
    assert_eq!(scene.info(ids[0]).unwrap().name, "DRON 001");
}

#[test]
fn clone_copies_state_but_not_animation() {
    let mut scene = MemoryScene::new();
    let src = scene.create_box(&box_spec("Oak")).unwrap();
    scene.translate_geometry(src, Vec3::new(-50.0, 0.0, 0.0)).unwrap();
    scene
        .insert_keyframe(
            src,
            FrameIndex(0),
            Mutation::SetVisibility(Visibility::HIDDEN),
            Ease::Linear,
        )
        .unwrap();

    let copy = scene.clone_object(src, Vec3::new(3.0, 4.0, 0.0)).unwrap();
    let o = scene.object(copy).unwrap();
    assert_eq!(o.name, "Oak.001");
    assert_eq!(o.location, Vec3::new(3.0, 4.0, 0.0));
    assert_eq!(o.geometry_offset, Vec3::new(-50.0, 0.0, 0.0));
    assert_eq!(o.visibility, Visibility::HIDDEN);
    assert_eq!(o.cloned_from, Some(src));
    assert!(o.animation.is_empty());
}

#[test]
fn keyframes_apply_and_sample() {
    let mut scene = MemoryScene::new();
    let id = scene.create_box(&box_spec("Robot")).unwrap();
    for (f, x) in [(0, 0.0), (10, 10.0)] {
        scene
            .insert_keyframe(
                id,
                FrameIndex(f),
                Mutation::SetLocation(Vec3::new(x, 0.0, 0.0)),
                Ease::Linear,
            )
            .unwrap();
    }
    let o = scene.object(id).unwrap();
    assert_eq!(o.location, Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(
        o.animation.location.sample(FrameIndex(5)),
        Some(Vec3::new(5.0, 0.0, 0.0))
    );

    scene.clear_animation(id).unwrap();
    assert!(scene.object(id).unwrap().animation.is_empty());
}

#[test]
fn deleting_a_cutter_drops_the_boolean() {
    let mut scene = MemoryScene::new();
    let a = scene.create_box(&box_spec("A")).unwrap();
    let b = scene.create_box(&box_spec("B")).unwrap();
    assert!(scene.subtract(b, b).is_err());
    scene.subtract(b, a).unwrap();
    assert_eq!(scene.object(b).unwrap().subtractions, vec![a]);
    scene.delete(&[a]).unwrap();
    assert!(scene.object(b).unwrap().subtractions.is_empty());
}

#[test]
fn unknown_ids_are_scene_errors() {
    let mut scene = MemoryScene::new();
    let ghost = ObjectId::from_u64(42);
    assert!(matches!(
        scene.apply(ghost, Mutation::SetLocation(Vec3::ZERO)),
        Err(ReplayError::Scene(_))
    ));
    assert!(scene.delete(&[ghost]).is_err());
    assert!(scene.append_material(ghost, MaterialId(0)).is_err());
}

#[test]
fn materials_must_exist_before_use() {
    let mut scene = MemoryScene::new();
    let id = scene.create_plane("Floor", 250.0).unwrap();
    assert!(scene.append_material(id, MaterialId(7)).is_err());
    let m = scene
        .create_material("lane", Color::rgba(0.8, 0.04, 0.04, 1.0))
        .unwrap();
    scene.append_material(id, m).unwrap();
    assert_eq!(scene.object(id).unwrap().materials, vec![m]);
}

#[test]
fn renders_are_recorded_or_fail_on_demand() {
    let mut scene = MemoryScene::new();
    scene.render_animation(Path::new("out/take_00.mp4")).unwrap();
    scene.set_fail_renders(true);
    assert!(scene.render_animation(Path::new("out/take_01.mp4")).is_err());
    assert_eq!(scene.renders(), &[PathBuf::from("out/take_00.mp4")]);
}

#[test]
fn rename_keeps_names_unique() {
    let mut scene = MemoryScene::new();
    scene.create_box(&box_spec("Robot")).unwrap();
    let other = scene.create_box(&box_spec("DRON")).unwrap();
    scene.rename(other, "Robot").unwrap();
    assert_eq!(scene.info(other).unwrap().name, "Robot.001");
    scene.rename(other, "Robot.001").unwrap();
    assert_eq!(scene.info(other).unwrap().name, "Robot.001");
}

#[test]
fn snapshot_serializes() {
    let mut scene = MemoryScene::new();
    scene.create_plane("Floor", 250.0).unwrap();
    let json = serde_json::to_string(&scene.snapshot()).unwrap();
    assert!(json.contains("\"Floor\""));
}
