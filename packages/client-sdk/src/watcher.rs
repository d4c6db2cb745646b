use common::progress::{PlaybackSampler, ProgressUpdate};

use crate::client::{ApiClient, ProgressState};
use crate::error::ClientError;

/// Reports lesson playback to the server as the player runs.
///
/// Sampling decisions live in [`PlaybackSampler`]; this type only ships the
/// updates. Reporting is best-effort: a failed write is logged and dropped,
/// never surfaced to the player. The next sample carries a fresh position
/// anyway, and `completed` is sticky server-side, so nothing is lost that a
/// later update can't recover.
pub struct LessonWatcher {
    client: ApiClient,
    sampler: PlaybackSampler,
}

impl LessonWatcher {
    /// Fetch the stored state for a lesson and resume from it.
    pub async fn load(client: ApiClient, lesson_id: i32) -> Result<(Self, ProgressState), ClientError> {
        let state = client.get_progress(lesson_id).await?;
        let watcher = Self {
            client,
            sampler: PlaybackSampler::resumed(lesson_id, state.completed),
        };
        Ok((watcher, state))
    }

    /// Start watching a lesson with no stored state.
    pub fn new(client: ApiClient, lesson_id: i32) -> Self {
        Self {
            client,
            sampler: PlaybackSampler::new(lesson_id),
        }
    }

    /// Observe a playback position, reporting when the sampler says so.
    pub async fn tick(&mut self, position_sec: f64, duration_sec: f64) {
        if let Some(update) = self.sampler.tick(position_sec, duration_sec) {
            self.report(update).await;
        }
    }

    /// The video ended: report completion.
    pub async fn ended(&mut self) {
        let update = self.sampler.ended();
        self.report(update).await;
    }

    async fn report(&self, update: ProgressUpdate) {
        if let Err(e) = self.client.post_progress(&update).await {
            tracing::warn!(lesson_id = update.lesson_id, "progress report failed: {e}");
        }
    }
}
