//! Frame builders shared by unit tests

use crate::pose::{Frame, Joint, JointName, Point3};

/// Place one arm so the elbow angle is `deg`, elbow at `(origin_x, 0, 0)`
fn add_arm(
    frame: &mut Frame,
    [shoulder, elbow, wrist]: [JointName; 3],
    origin_x: f32,
    deg: f32,
    confidence: f32,
) {
    let rad = deg.to_radians();
    frame
        .insert(
            shoulder,
            Joint::new(Point3::new(origin_x, 1.0, 0.0), confidence),
        )
        .insert(elbow, Joint::new(Point3::new(origin_x, 0.0, 0.0), confidence))
        .insert(
            wrist,
            Joint::new(
                Point3::new(origin_x + rad.sin(), rad.cos(), 0.0),
                confidence,
            ),
        );
}

/// A frame with both arms at the given elbow angles, all joints at `confidence`
pub(crate) fn frame_with(left_deg: f32, right_deg: f32, confidence: f32) -> Frame {
    let mut frame = Frame::new();
    add_arm(
        &mut frame,
        [JointName::LeftShoulder, JointName::LeftElbow, JointName::LeftWrist],
        -1.0,
        left_deg,
        confidence,
    );
    add_arm(
        &mut frame,
        [JointName::RightShoulder, JointName::RightElbow, JointName::RightWrist],
        1.0,
        right_deg,
        confidence,
    );
    frame
}
