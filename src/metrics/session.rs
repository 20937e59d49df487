use std::time::{Duration, Instant};

/// Statistics across the games of one process run
///
/// The clock only runs while a game is being played; it freezes at game over
/// so the overlay keeps showing how long the last game lasted.
pub struct SessionStats {
    pub games_played: u32,
    pub best_score: u32,
    pub elapsed: Duration,
    running_since: Option<Instant>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            games_played: 0,
            best_score: 0,
            elapsed: Duration::ZERO,
            running_since: None,
        }
    }

    /// Refresh the elapsed time of the running game
    pub fn update(&mut self) {
        if let Some(start) = self.running_since {
            self.elapsed = start.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.running_since = Some(Instant::now());
        self.elapsed = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.running_since = None;
        self.games_played += 1;
        self.best_score = self.best_score.max(final_score);
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
