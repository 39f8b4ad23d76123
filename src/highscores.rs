//! Match history
//!
//! Finished matches are handed to a [`ScorePort`]. [`MatchHistory`] keeps the
//! most recent ones and persists them to LocalStorage on wasm32.

use serde::{Deserialize, Serialize};

use crate::sim::{Difficulty, PlayerId, Score};

/// Maximum number of finished matches to keep
pub const MAX_MATCH_RECORDS: usize = 10;

/// A single finished match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub score: Score,
    pub winner: PlayerId,
    /// Opponent difficulty, `None` for two human players
    pub difficulty: Option<Difficulty>,
    /// Unix timestamp (ms) when the match ended
    pub timestamp: f64,
}

/// Fire-and-forget sink for finished matches
pub trait ScorePort {
    fn record_match(&mut self, record: MatchRecord);
}

/// Port that forgets every match
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl ScorePort for Discard {
    fn record_match(&mut self, _record: MatchRecord) {}
}

/// Recent match list, newest first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchHistory {
    pub entries: Vec<MatchRecord>,
}

impl MatchHistory {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "jelly_volley_matches";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a finished match, dropping the oldest beyond the cap
    pub fn push(&mut self, record: MatchRecord) {
        self.entries.insert(0, record);
        self.entries.truncate(MAX_MATCH_RECORDS);
    }

    /// Matches won by the human on the left
    pub fn wins(&self) -> usize {
        self.entries
            .iter()
            .filter(|r| r.winner == PlayerId::One)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&MatchRecord> {
        self.entries.first()
    }

    /// Load match history from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<MatchHistory>(&json) {
                    Ok(history) => {
                        log::info!("Loaded {} match records", history.entries.len());
                        return history;
                    }
                    Err(e) => log::warn!("Discarding unreadable match history: {}", e),
                }
            }
        }

        log::info!("No match history found, starting fresh");
        Self::new()
    }

    /// Save match history to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Match history saved ({} entries)", self.entries.len());
            }
        } else {
            log::warn!("LocalStorage unavailable, match history not saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl ScorePort for MatchHistory {
    fn record_match(&mut self, record: MatchRecord) {
        self.push(record);
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(winner: PlayerId, timestamp: f64) -> MatchRecord {
        MatchRecord {
            score: Score {
                player1: 7,
                player2: 3,
            },
            winner,
            difficulty: Some(Difficulty::Medium),
            timestamp,
        }
    }

    #[test]
    fn test_newest_first_and_capped() {
        let mut history = MatchHistory::new();
        for i in 0..(MAX_MATCH_RECORDS + 3) {
            history.record_match(record(PlayerId::One, i as f64));
        }
        assert_eq!(history.entries.len(), MAX_MATCH_RECORDS);
        assert_eq!(history.latest().map(|r| r.timestamp), Some(12.0));
        assert_eq!(history.entries.last().map(|r| r.timestamp), Some(3.0));
    }

    #[test]
    fn test_win_count() {
        let mut history = MatchHistory::new();
        assert!(history.is_empty());
        history.push(record(PlayerId::One, 1.0));
        history.push(record(PlayerId::Two, 2.0));
        history.push(record(PlayerId::One, 3.0));
        assert_eq!(history.wins(), 2);
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut history = MatchHistory::new();
        history.push(record(PlayerId::Two, 42.0));
        let json = serde_json::to_string(&history).unwrap();
        let back: MatchHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries, history.entries);
    }
}
