use crate::{
    config::RobotConfig,
    foundation::{
        core::{Euler, FrameIndex, Point, Vec3},
        error::ReplayResult,
    },
    scene::adapter::{Mutation, ObjectId, SceneAdapter},
};

/// Yaw that faces from `from` toward `to`.
pub fn heading_between(from: Point, to: Point) -> f64 {
    (to - from).atan2()
}

/// Places and animates the robot rig on the ground plane.
#[derive(Clone, Copy, Debug)]
pub struct RobotRig<'a> {
    pub id: ObjectId,
    pub config: &'a RobotConfig,
}

impl<'a> RobotRig<'a> {
    pub fn new(id: ObjectId, config: &'a RobotConfig) -> Self {
        Self { id, config }
    }

    pub fn location(&self, coords: Point) -> Vec3 {
        Vec3::on_ground(coords, self.config.height)
    }

    pub fn rotation(&self, heading: f64) -> Euler {
        Euler::new(0.0, self.config.pitch, heading)
    }

    /// Jump straight to a pose.
    pub fn set_position<S: SceneAdapter + ?Sized>(
        &self,
        scene: &mut S,
        coords: Point,
        heading: f64,
    ) -> ReplayResult<()> {
        scene.apply(self.id, Mutation::SetLocation(self.location(coords)))?;
        scene.apply(self.id, Mutation::SetRotation(self.rotation(heading)))
    }

    /// Turn from `from` to `to` over the first `rotation_frames`.
    pub fn create_rotation<S: SceneAdapter + ?Sized>(
        &self,
        scene: &mut S,
        from: f64,
        to: f64,
    ) -> ReplayResult<()> {
        let keys = [
            (FrameIndex(0), from),
            (FrameIndex(self.config.rotation_frames), to),
        ];
        for (frame, heading) in keys {
            scene.insert_keyframe(
                self.id,
                frame,
                Mutation::SetRotation(self.rotation(heading)),
                self.config.ease,
            )?;
        }
        Ok(())
    }

    /// Hold at `from` through the rotation window, then drive to `to`.
    pub fn create_translation<S: SceneAdapter + ?Sized>(
        &self,
        scene: &mut S,
        from: Point,
        to: Point,
    ) -> ReplayResult<()> {
        let keys = [
            (FrameIndex(self.config.rotation_frames), from),
            (FrameIndex(self.config.total_frames()), to),
        ];
        for (frame, coords) in keys {
            scene.insert_keyframe(
                self.id,
                frame,
                Mutation::SetLocation(self.location(coords)),
                self.config.ease,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/replay/robot.rs"]
mod tests;
