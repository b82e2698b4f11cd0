use super::*;
use crate::foundation::core::{Euler, Visibility};

fn lines(bytes: &[u8]) -> Vec<serde_json::Value> {
    std::str::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn every_call_becomes_one_tagged_line() {
    let mut scene = JournalScene::new(MemoryScene::new(), Vec::new());
    let floor = scene.create_plane("Floor", 250.0).unwrap();
    scene
        .apply(floor, Mutation::SetVisibility(Visibility::HIDDEN))
        .unwrap();
    scene.delete(&[floor]).unwrap();
    assert_eq!(scene.written(), 3);

    let (mirror, out) = scene.finish().unwrap();
    assert!(mirror.is_empty());
    let cmds = lines(&out);
    assert_eq!(cmds[0]["op"], "create_plane");
    assert_eq!(cmds[0]["name"], "Floor");
    assert_eq!(cmds[1]["op"], "apply");
    assert_eq!(cmds[1]["mutation"]["set_visibility"]["render"], false);
    assert_eq!(cmds[2]["op"], "delete");
    assert_eq!(cmds[2]["ids"][0], floor.as_u64());
}

#[test]
fn rejected_calls_are_not_written() {
    let mut scene = JournalScene::new(MemoryScene::new(), Vec::new());
    let ghost = ObjectId::from_u64(9);
    assert!(
        scene
            .apply(ghost, Mutation::SetRotation(Euler::IDENTITY))
            .is_err()
    );
    assert_eq!(scene.written(), 0);
}

#[test]
fn import_lists_ids_in_file_order() {
    let mirror = MemoryScene::new().with_bundle("trees.obj", ["Oak_Leaves", "Walnut_Leaf"]);
    let mut scene = JournalScene::new(mirror, Vec::new());
    let ids = scene
        .import_mesh(Path::new("trees.obj"), MeshFormat::Obj)
        .unwrap();
    assert_eq!(scene.mirror().len(), 2);

    let (_, out) = scene.finish().unwrap();
    let cmds = lines(&out);
    assert_eq!(cmds[0]["op"], "import_mesh");
    assert_eq!(cmds[0]["format"], "obj");
    assert_eq!(cmds[0]["ids"][1], ids[1].as_u64());
}

#[test]
fn rename_reports_the_assigned_name() {
    let mut scene = JournalScene::new(MemoryScene::new(), Vec::new());
    scene.create_plane("Robot", 1.0).unwrap();
    let rig = scene.create_plane("DRON 001", 1.0).unwrap();
    scene.rename(rig, "Robot").unwrap();
    let (_, out) = scene.finish().unwrap();
    let cmds = lines(&out);
    assert_eq!(cmds[2]["op"], "rename");
    assert_eq!(cmds[2]["name"], "Robot.001");
}

#[test]
fn keyframes_carry_frame_and_ease() {
    let mut scene = JournalScene::new(MemoryScene::new(), Vec::new());
    let id = scene.create_plane("Robot", 1.0).unwrap();
    scene
        .insert_keyframe(
            id,
            FrameIndex(3),
            Mutation::SetLocation(Vec3::new(1.0, 2.0, 3.2)),
            Ease::InOutCubic,
        )
        .unwrap();
    let (mirror, out) = scene.finish().unwrap();
    let cmds = lines(&out);
    assert_eq!(cmds[1]["op"], "insert_keyframe");
    assert_eq!(cmds[1]["frame"], 3);
    assert_eq!(cmds[1]["ease"], "in_out_cubic");
    assert_eq!(
        mirror.object(id).unwrap().animation.location.keys().len(),
        1
    );
}
