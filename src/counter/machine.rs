//! Core repetition state machine
//!
//! Consumes one frame at a time, gates it on landmark availability and
//! confidence, and moves between Neutral, Up and Down based on both elbow
//! angles. Entering Up from Down or Neutral is the only counting event.

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use crate::events::RepEvent;
use crate::pose::{try_angle, Frame, Joint, JointName};

use super::Thresholds;

/// Joints every frame must carry with sufficient confidence
const REQUIRED_JOINTS: [JointName; 6] = [
    JointName::LeftShoulder,
    JointName::LeftElbow,
    JointName::LeftWrist,
    JointName::RightShoulder,
    JointName::RightElbow,
    JointName::RightWrist,
];

/// Bilateral arm posture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureState {
    /// Nothing classified yet
    #[default]
    Neutral,
    /// Both arms extended
    Up,
    /// Both arms bent
    Down,
}

impl std::fmt::Display for PostureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostureState::Neutral => write!(f, "Neutral"),
            PostureState::Up => write!(f, "Up"),
            PostureState::Down => write!(f, "Down"),
        }
    }
}

/// Work items for [`RepStateMachine::run`]
#[derive(Debug, Clone)]
pub enum Command {
    Frame(Frame),
    Reset,
}

/// Why a frame was ignored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    /// A required landmark was not reported
    MissingJoint(JointName),
    /// A required landmark was reported below the confidence threshold
    LowConfidence { joint: JointName, confidence: f32 },
}

/// Result of feeding one frame to the machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Frame failed a gate; state untouched
    Skipped(SkipReason),
    /// Frame was evaluated but caused no transition
    ///
    /// `candidate` is the posture the angles pointed at, or `None` when
    /// they fell in the dead zone, the arms disagreed, or the geometry was
    /// degenerate.
    Held { candidate: Option<PostureState> },
    /// Posture changed
    Transitioned {
        from: PostureState,
        to: PostureState,
        counted: bool,
    },
}

impl FrameOutcome {
    /// Whether this frame incremented the counter
    pub fn counted(&self) -> bool {
        matches!(self, FrameOutcome::Transitioned { counted: true, .. })
    }
}

/// The state machine that turns frames into a repetition count
///
/// Not internally synchronized: callers must not run `process_frame` or
/// `reset` concurrently. [`RepStateMachine::run`] provides a single owner
/// fed through a channel.
pub struct RepStateMachine {
    thresholds: Thresholds,
    posture: PostureState,
    count: u32,
    /// Channel for emitting change notifications
    event_tx: broadcast::Sender<RepEvent>,
}

impl RepStateMachine {
    /// Create a new state machine in `Neutral` with a zero count
    pub fn new(thresholds: Thresholds, event_tx: broadcast::Sender<RepEvent>) -> Self {
        Self {
            thresholds,
            posture: PostureState::Neutral,
            count: 0,
            event_tx,
        }
    }

    /// Rebuild with new thresholds, starting over from `Neutral`
    pub fn with_thresholds(self, thresholds: Thresholds) -> Self {
        info!(?thresholds, "rebuilding state machine with new thresholds");
        let machine = Self::new(thresholds, self.event_tx);
        machine.emit(RepEvent::CounterReset);
        machine
    }

    /// Current repetition count
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Current posture state
    pub fn posture(&self) -> PostureState {
        self.posture
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Run the state machine, processing commands until the channel closes
    pub async fn run(&mut self, mut command_rx: mpsc::Receiver<Command>) {
        info!(thresholds = ?self.thresholds, "state machine started in Neutral state");

        while let Some(command) = command_rx.recv().await {
            match command {
                Command::Frame(frame) => {
                    self.process_frame(&frame);
                }
                Command::Reset => self.reset(),
            }
        }

        info!(count = self.count, "state machine stopped");
    }

    /// Evaluate one frame and advance the posture state
    pub fn process_frame(&mut self, frame: &Frame) -> FrameOutcome {
        let joints = match self.gate(frame) {
            Ok(joints) => joints,
            Err(reason) => {
                debug!(?reason, posture = %self.posture, "frame skipped");
                return FrameOutcome::Skipped(reason);
            }
        };

        let [l_shoulder, l_elbow, l_wrist, r_shoulder, r_elbow, r_wrist] = joints;
        let left = try_angle(l_shoulder.position, l_elbow.position, l_wrist.position);
        let right = try_angle(r_shoulder.position, r_elbow.position, r_wrist.position);

        let candidate = match (left, right) {
            (Some(left), Some(right)) => self.classify(left, right),
            // Zero-length limb segment: treat like the dead zone
            _ => None,
        };

        debug!(?left, ?right, ?candidate, posture = %self.posture, "frame evaluated");

        match (self.posture, candidate) {
            (PostureState::Neutral | PostureState::Down, Some(PostureState::Up)) => {
                let from = self.posture;
                self.transition_to(PostureState::Up);
                self.count = self.count.saturating_add(1);
                info!(count = self.count, "repetition counted");
                self.emit(RepEvent::RepCounted { count: self.count });
                FrameOutcome::Transitioned {
                    from,
                    to: PostureState::Up,
                    counted: true,
                }
            }
            (PostureState::Up, Some(PostureState::Down)) => {
                self.transition_to(PostureState::Down);
                FrameOutcome::Transitioned {
                    from: PostureState::Up,
                    to: PostureState::Down,
                    counted: false,
                }
            }
            _ => FrameOutcome::Held { candidate },
        }
    }

    /// Clear the count and return to `Neutral`
    pub fn reset(&mut self) {
        info!(count = self.count, posture = %self.posture, "counter reset");
        self.count = 0;
        self.posture = PostureState::Neutral;
        self.emit(RepEvent::CounterReset);
    }

    /// Availability check, then confidence check, over the six arm joints
    fn gate<'a>(&self, frame: &'a Frame) -> Result<[&'a Joint; 6], SkipReason> {
        let get = move |name| frame.get(name).ok_or(SkipReason::MissingJoint(name));
        let joints = [
            get(REQUIRED_JOINTS[0])?,
            get(REQUIRED_JOINTS[1])?,
            get(REQUIRED_JOINTS[2])?,
            get(REQUIRED_JOINTS[3])?,
            get(REQUIRED_JOINTS[4])?,
            get(REQUIRED_JOINTS[5])?,
        ];

        for (name, joint) in REQUIRED_JOINTS.iter().zip(joints) {
            // Negated so a NaN confidence fails the gate
            if !(joint.confidence >= self.thresholds.min_confidence) {
                return Err(SkipReason::LowConfidence {
                    joint: *name,
                    confidence: joint.confidence,
                });
            }
        }

        Ok(joints)
    }

    /// Both arms must agree; anything else is the dead zone
    fn classify(&self, left: f32, right: f32) -> Option<PostureState> {
        let t = &self.thresholds;
        if left > t.up_angle_deg && right > t.up_angle_deg {
            Some(PostureState::Up)
        } else if left < t.down_angle_deg && right < t.down_angle_deg {
            Some(PostureState::Down)
        } else {
            None
        }
    }

    /// Perform a posture transition
    fn transition_to(&mut self, new_posture: PostureState) {
        let old_posture = self.posture;

        info!(
            from = %old_posture,
            to = %new_posture,
            "posture transition"
        );

        self.posture = new_posture;
        self.emit(RepEvent::PostureChanged {
            from: old_posture,
            to: new_posture,
        });
    }

    fn emit(&self, event: RepEvent) {
        debug!(%event, "emitting event");
        // No subscribers is fine; the count is still readable
        let _ = self.event_tx.send(event);
    }
}
