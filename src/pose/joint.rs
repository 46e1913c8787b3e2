//! Landmark and frame definitions
//!
//! Joint names follow the 33-point body topology used by common pose
//! models. Frames arrive as JSON maps keyed by the snake_case name.

use std::collections::HashMap;
use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// A position in the coordinate space of the source frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean length
    pub fn norm(self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Self) -> Self::Output {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Named anatomical landmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointName {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl std::fmt::Display for JointName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Debug gives the variant name, which is what we want in logs
        write!(f, "{:?}", self)
    }
}

/// A single landmark as reported for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub position: Point3,
    /// Estimator certainty in [0, 1]
    pub confidence: f32,
}

impl Joint {
    pub fn new(position: Point3, confidence: f32) -> Self {
        Self { position, confidence }
    }
}

/// All landmarks reported for one instant; any of them may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame {
    joints: HashMap<JointName, Joint>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a landmark
    pub fn insert(&mut self, name: JointName, joint: Joint) -> &mut Self {
        self.joints.insert(name, joint);
        self
    }

    pub fn get(&self, name: JointName) -> Option<&Joint> {
        self.joints.get(&name)
    }

    pub fn remove(&mut self, name: JointName) -> Option<Joint> {
        self.joints.remove(&name)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

impl FromIterator<(JointName, Joint)> for Frame {
    fn from_iter<I: IntoIterator<Item = (JointName, Joint)>>(iter: I) -> Self {
        Self {
            joints: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_math() {
        let a = Point3::new(3.0, 4.0, 12.0);
        let b = Point3::new(0.0, 0.0, 0.0);
        assert_eq!((a - b).norm(), 13.0);
        assert_eq!(a.dot(Point3::new(1.0, 0.0, 0.0)), 3.0);
    }

    #[test]
    fn test_frame_deserialization() {
        let json = r#"{
            "left_shoulder": {"position": {"x": 0.1, "y": 0.2, "z": 0.0}, "confidence": 0.9},
            "right_wrist": {"position": {"x": 0.5, "y": 0.6, "z": -0.1}, "confidence": 0.4}
        }"#;
        let frame: Frame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.get(JointName::LeftShoulder).unwrap().confidence, 0.9);
        assert_eq!(
            frame.get(JointName::RightWrist).unwrap().position,
            Point3::new(0.5, 0.6, -0.1)
        );
        assert!(frame.get(JointName::Nose).is_none());
    }

    #[test]
    fn test_unknown_joint_is_rejected() {
        let json = r#"{"left_tail": {"position": {"x": 0, "y": 0, "z": 0}, "confidence": 1}}"#;
        assert!(serde_json::from_str::<Frame>(json).is_err());
    }

    #[test]
    fn test_frame_from_iter() {
        let joint = Joint::new(Point3::default(), 1.0);
        let frame: Frame = [(JointName::Nose, joint), (JointName::LeftHip, joint)]
            .into_iter()
            .collect();
        assert_eq!(frame.len(), 2);
        assert!(!frame.is_empty());
    }
}
