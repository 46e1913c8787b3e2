//! Pose input types and joint geometry
//!
//! A `Frame` is whatever the external pose model reported for one camera
//! image: named landmarks with a 3D position and a confidence score.

pub mod angle;
mod joint;

pub use angle::{angle, try_angle};
pub use joint::{Frame, Joint, JointName, Point3};
