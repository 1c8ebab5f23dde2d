//! Destination for finished-game results.

use std::sync::mpsc;

use snake_core::state::GameResult;

/// Consumer for finished-game results. The game loop submits each
/// result exactly once; abandoned games never reach the sink.
pub trait ResultSink: Send {
    fn submit(&self, result: GameResult);
}

/// Forwards results over a channel, e.g. to a leaderboard uploader.
pub struct ChannelSink {
    tx: mpsc::Sender<GameResult>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<GameResult>) -> Self {
        Self { tx }
    }
}

impl ResultSink for ChannelSink {
    fn submit(&self, result: GameResult) {
        if self.tx.send(result).is_err() {
            log::warn!("result receiver dropped, discarding game result");
        }
    }
}

/// Logs results and drops them, for embeddings without a leaderboard.
pub struct LogSink;

impl ResultSink for LogSink {
    fn submit(&self, result: GameResult) {
        log::info!(
            "game finished: {} scored {} in {:.1}s",
            result.player_name,
            result.score,
            result.duration
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_sink_delivers_results() {
        let (tx, rx) = mpsc::channel();
        let sink = ChannelSink::new(tx);
        sink.submit(GameResult {
            player_name: "Alice".into(),
            score: 9,
            duration: 12.0,
            max_length: 8,
            food_eaten: 4,
            bonuses_eaten: 1,
        });
        let result = rx.try_recv().unwrap();
        assert_eq!(result.score, 9);
    }

    #[test]
    fn channel_sink_tolerates_a_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let sink = ChannelSink::new(tx);
        sink.submit(GameResult {
            player_name: "Alice".into(),
            score: 1,
            duration: 1.0,
            max_length: 4,
            food_eaten: 1,
            bonuses_eaten: 0,
        });
    }
}
