use std::path::{Path, PathBuf};

use crate::{
    config::ReplayConfig,
    foundation::{
        core::{FrameIndex, Point, Timeline},
        error::{ReplayError, ReplayResult},
    },
    replay::{
        bootstrap::{self, CastHandles, TemplateRegistry},
        path::rebuild_path,
        robot::{RobotRig, heading_between},
        vegetation::reclone_vegetation,
    },
    scene::adapter::{MaterialId, ObjectId, SceneAdapter},
    trace::{loader, model::Trace},
};

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "state", content = "take", rename_all = "snake_case")]
pub enum SessionState {
    /// No trace cached yet.
    Uninitialized,
    Loaded,
    /// The scene holds this take.
    RenderTake(usize),
    Done,
}

/// Keys scheduled from one take to the next.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Transition {
    pub from: Point,
    pub to: Point,
    pub from_heading: f64,
    pub to_heading: f64,
    pub timeline: Timeline,
}

/// What [`ReplaySession::create_animation`] put in the scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TakeReport {
    pub take: usize,
    pub path_pieces: usize,
    pub clones: usize,
    /// `None` for the last take, which only holds a pose.
    pub transition: Option<Transition>,
}

/// Drives one scene through the takes of a trace.
///
/// All state that survives between takes lives here: the cached trace, the cast and
/// template handles, and the path pieces and clones of the current take.
#[derive(Debug)]
pub struct ReplaySession<S: SceneAdapter> {
    config: ReplayConfig,
    scene: S,
    state: SessionState,
    trace: Option<Trace>,
    registry: TemplateRegistry,
    cast: Option<CastHandles>,
    material: Option<MaterialId>,
    path_pieces: Vec<ObjectId>,
    clones: Vec<ObjectId>,
}

impl<S: SceneAdapter> ReplaySession<S> {
    pub fn new(config: ReplayConfig, scene: S) -> ReplayResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            scene,
            state: SessionState::Uninitialized,
            trace: None,
            registry: TemplateRegistry::default(),
            cast: None,
            material: None,
            path_pieces: Vec::new(),
            clones: Vec::new(),
        })
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn into_scene(self) -> S {
        self.scene
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn cast(&self) -> Option<CastHandles> {
        self.cast
    }

    /// Clones placed by the latest take.
    pub fn clones(&self) -> &[ObjectId] {
        &self.clones
    }

    /// Path pieces built by the latest take.
    pub fn path_pieces(&self) -> &[ObjectId] {
        &self.path_pieces
    }

    /// Number of takes in the cached trace; `None` before a trace is loaded.
    pub fn take_count(&self) -> Option<usize> {
        self.trace.as_ref().map(Trace::len)
    }

    /// Load `path` with the configured scale, replacing any cached trace.
    pub fn load_trace(&mut self, path: &Path) -> ReplayResult<usize> {
        let trace = loader::load_trace(path, self.config.scale)?;
        Ok(self.set_trace(trace))
    }

    /// Cache an already parsed trace, replacing any previous one.
    pub fn set_trace(&mut self, trace: Trace) -> usize {
        let len = trace.len();
        self.trace = Some(trace);
        if self.state == SessionState::Uninitialized {
            self.state = SessionState::Loaded;
        }
        len
    }

    /// Create whatever part of the cast is missing. With `clear`, wipe the scene first.
    pub fn bootstrap(&mut self, clear: bool) -> ReplayResult<CastHandles> {
        self.ensure_active()?;
        if clear {
            tracing::info!("clearing scene");
            self.scene.clear()?;
            self.registry = TemplateRegistry::default();
            self.path_pieces.clear();
            self.clones.clear();
        }
        let cast = bootstrap::ensure_cast(&mut self.scene, &self.config, &mut self.registry)?;
        self.cast = Some(cast);
        Ok(cast)
    }

    /// Replace the vegetation templates with a fresh import of the bundle.
    pub fn force_import(&mut self) -> ReplayResult<()> {
        self.ensure_active()?;
        bootstrap::discard_templates(&mut self.scene, &self.config.catalog, &mut self.registry)?;
        bootstrap::import_templates(&mut self.scene, &self.config, &mut self.registry, true)
    }

    /// Put take `take` into the scene: lane ribbon, robot pose and vegetation, plus the
    /// transition keys toward the next take when there is one.
    #[tracing::instrument(skip(self))]
    pub fn create_animation(&mut self, take: usize) -> ReplayResult<TakeReport> {
        self.ensure_active()?;
        if self.trace.is_none() {
            let path = self.config.trace_path.clone();
            self.load_trace(&path)?;
        }
        let (frame, next) = {
            let trace = self
                .trace
                .as_ref()
                .ok_or_else(|| ReplayError::validation("no trace loaded"))?;
            let frame = trace.frame(take)?.clone();
            let next = trace.next_frame(take).map(|f| f.robot);
            (frame, next)
        };
        let cast = match self.cast {
            Some(cast) => cast,
            None => self.bootstrap(false)?,
        };
        let material = self.lane_material()?;

        self.path_pieces = rebuild_path(
            &mut self.scene,
            &self.config.path,
            material,
            &self.path_pieces,
            &frame.path,
        )?;

        let rig = RobotRig::new(cast.robot, &self.config.robot);
        self.scene.clear_animation(cast.robot)?;
        rig.set_position(&mut self.scene, frame.robot.coordinates, frame.robot.heading)?;

        let previous = std::mem::take(&mut self.clones);
        self.clones = reclone_vegetation(
            &mut self.scene,
            &frame,
            &self.config.catalog,
            &self.registry,
            &previous,
            self.config.vegetation_reveal_frames,
        )?;

        let transition = match next {
            Some(next) => {
                let timeline = Timeline::new(
                    FrameIndex(0),
                    FrameIndex(self.config.robot.total_frames()),
                    self.config.fps()?,
                )?;
                self.scene.setup_timeline(timeline)?;
                let to_heading = heading_between(frame.robot.coordinates, next.coordinates);
                rig.create_rotation(&mut self.scene, frame.robot.heading, to_heading)?;
                rig.create_translation(&mut self.scene, frame.robot.coordinates, next.coordinates)?;
                Some(Transition {
                    from: frame.robot.coordinates,
                    to: next.coordinates,
                    from_heading: frame.robot.heading,
                    to_heading,
                    timeline,
                })
            }
            None => None,
        };

        self.state = SessionState::RenderTake(take);
        let report = TakeReport {
            take,
            path_pieces: self.path_pieces.len(),
            clones: self.clones.len(),
            transition,
        };
        tracing::info!(
            path_pieces = report.path_pieces,
            clones = report.clones,
            animated = report.transition.is_some(),
            "take ready"
        );
        Ok(report)
    }

    /// Build take `take` and render it to `output_dir/take_NN.mp4`.
    ///
    /// A failed render is logged and reported as `Ok(false)`; the session stays usable.
    pub fn render_take(&mut self, take: usize, output_dir: &Path) -> ReplayResult<bool> {
        self.create_animation(take)?;
        let output = take_output_path(output_dir, take);
        match self.scene.render_animation(&output) {
            Ok(()) => {
                tracing::info!(take, output = %output.display(), "rendered take");
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(take, output = %output.display(), %err, "render failed");
                Ok(false)
            }
        }
    }

    /// Mark the session finished; later take calls are rejected.
    pub fn finish(&mut self) -> SessionState {
        self.state = SessionState::Done;
        self.state
    }

    fn ensure_active(&self) -> ReplayResult<()> {
        if self.state == SessionState::Done {
            return Err(ReplayError::validation("replay session is finished"));
        }
        Ok(())
    }

    fn lane_material(&mut self) -> ReplayResult<MaterialId> {
        if let Some(m) = self.material {
            return Ok(m);
        }
        let name = format!("{}Material", self.config.path.prefix);
        let m = self.scene.create_material(&name, self.config.path.color)?;
        self.material = Some(m);
        Ok(m)
    }
}

/// `take_07.mp4` inside `dir`.
pub fn take_output_path(dir: &Path, take: usize) -> PathBuf {
    dir.join(format!("take_{take:02}.mp4"))
}

#[cfg(test)]
#[path = "../../tests/unit/replay/session.rs"]
mod tests;
