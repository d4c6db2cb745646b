use serde::{Deserialize, Serialize};

/// Watched fraction at which a lesson counts as completed.
pub const COMPLETION_THRESHOLD: f64 = 0.90;

/// Periodic samples are emitted at whole-second positions divisible by this.
pub const SAMPLE_INTERVAL_SEC: i64 = 10;

/// A single progress write for a lesson.
///
/// `position_sec` and `completed` are both optional: an update only
/// overwrites the fields it carries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub lesson_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_sec: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Decides when playback position should be reported.
///
/// Players call [`tick`](Self::tick) on every time update (typically a few
/// times per second); the sampler turns that stream into coarse periodic
/// updates, a one-shot completion update when the 90% threshold is first
/// crossed, and an unconditional completion on [`ended`](Self::ended).
#[derive(Debug)]
pub struct PlaybackSampler {
    lesson_id: i32,
    last_sampled_sec: Option<i64>,
    completion_sent: bool,
}

impl PlaybackSampler {
    pub fn new(lesson_id: i32) -> Self {
        Self {
            lesson_id,
            last_sampled_sec: None,
            completion_sent: false,
        }
    }

    /// Resume a sampler for a lesson already marked completed, so the
    /// threshold update is not re-sent on replay.
    pub fn resumed(lesson_id: i32, completed: bool) -> Self {
        Self {
            lesson_id,
            last_sampled_sec: None,
            completion_sent: completed,
        }
    }

    pub fn completion_sent(&self) -> bool {
        self.completion_sent
    }

    /// Observe a playback position. Returns an update to send, if any.
    pub fn tick(&mut self, position_sec: f64, duration_sec: f64) -> Option<ProgressUpdate> {
        if !duration_sec.is_finite() || duration_sec <= 0.0 || !position_sec.is_finite() {
            return None;
        }

        let whole = position_sec.floor() as i64;
        let reached = position_sec / duration_sec >= COMPLETION_THRESHOLD;

        // Threshold crossing fires immediately, independent of the cadence,
        // so completion is not missed between samples.
        if reached && !self.completion_sent {
            self.completion_sent = true;
            self.last_sampled_sec = Some(whole);
            return Some(ProgressUpdate {
                lesson_id: self.lesson_id,
                position_sec: Some(clamp_sec(whole)),
                completed: Some(true),
            });
        }

        // Coarse periodic sample: at most one update per interval boundary.
        if whole >= 0 && whole % SAMPLE_INTERVAL_SEC == 0 && self.last_sampled_sec != Some(whole) {
            self.last_sampled_sec = Some(whole);
            return Some(ProgressUpdate {
                lesson_id: self.lesson_id,
                position_sec: Some(clamp_sec(whole)),
                completed: Some(reached),
            });
        }

        None
    }

    /// The video signalled it has ended: always report completion.
    pub fn ended(&mut self) -> ProgressUpdate {
        self.completion_sent = true;
        ProgressUpdate {
            lesson_id: self.lesson_id,
            position_sec: None,
            completed: Some(true),
        }
    }
}

fn clamp_sec(sec: i64) -> i32 {
    sec.clamp(0, i32::MAX as i64) as i32
}
