//! Dronereel replays ground-robot simulation traces as keyframed scenes in an external
//! 3D engine.
//!
//! A trace holds one take per line: the robot pose, its planned path and the vegetation
//! around it. For each take the replay rebuilds a lane ribbon along the path, poses the
//! robot, reclones the vegetation from hidden templates and keys the move toward the
//! next take. The engine is reached through [`SceneAdapter`]:
//!
//! - [`MemoryScene`] keeps the scene in process (tests, dry runs)
//! - [`JournalScene`] streams every call as one JSON command per line for an engine-side shim
//!
//! Start from a [`ReplayConfig`], create a [`ReplaySession`] and call
//! [`ReplaySession::create_animation`] or [`ReplaySession::render_take`] per take.
#![forbid(unsafe_code)]

mod animation;
mod catalog;
mod config;
mod foundation;
mod replay;
mod scene;
mod trace;

pub use crate::animation::ease::Ease;
pub use crate::animation::keyframes::{Keyframe, Lerp, Track};
pub use crate::catalog::TreeCatalog;
pub use crate::config::{
    CameraConfig, FloorConfig, LightConfig, PathStyle, ReplayConfig, RobotConfig,
};
pub use crate::foundation::core::{
    Color, Euler, Fps, FrameIndex, Point, Timeline, Vec3, Visibility,
};
pub use crate::foundation::error::{ReplayError, ReplayResult};
pub use crate::replay::bootstrap::{
    CastHandles, TemplateRegistry, discard_templates, ensure_cast, import_templates,
};
pub use crate::replay::path::{
    LaneJoint, LanePiece, LaneSegment, delete_path, plan_lane, rebuild_path,
};
pub use crate::replay::robot::{RobotRig, heading_between};
pub use crate::replay::session::{
    ReplaySession, SessionState, TakeReport, Transition, take_output_path,
};
pub use crate::replay::vegetation::{delete_clones, reclone_vegetation};
pub use crate::scene::adapter::{
    BoxSpec, CameraSpec, CylinderSpec, LightKind, LightSpec, MaterialId, MeshFormat, Mutation,
    ObjectId, ObjectInfo, ObjectKind, SceneAdapter,
};
pub use crate::scene::journal::{JournalScene, SceneCommand};
pub use crate::scene::memory::{Material, MemoryScene, ObjectAnimation, SceneObject, SceneSnapshot};
pub use crate::trace::loader::{load_trace, parse_trace};
pub use crate::trace::model::{SelfState, SimulationFrame, Trace, VegetationState};
