use std::collections::BTreeMap;

use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

/// Minimum best score that lets a user review an exam and places them on
/// its leaderboard.
pub const QUALIFYING_SCORE: f64 = 80.0;

/// Shape of a `user_scores` value as it sits in the document store.
///
/// Older documents hold a bare whole-exam percentage; newer ones hold the
/// structured form. Both are read, only the structured form is written.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StoredScore {
    Legacy(f64),
    Structured {
        #[serde(default)]
        total: f64,
        #[serde(default)]
        parts: BTreeMap<String, f64>,
    },
}

/// Per-user best-score state for one exam.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreRecord {
    pub total: f64,
    pub parts: BTreeMap<usize, f64>,
}

impl ScoreRecord {
    /// Keeps the best score for `index`, then recomputes `total` as the
    /// rounded mean over all `part_count` parts with unanswered parts
    /// counted as zero. An exam without parts takes the raw score and
    /// leaves `parts` untouched.
    pub fn record_part(&mut self, index: usize, score: f64, part_count: usize) {
        if part_count == 0 {
            self.total = score;
            return;
        }

        let best = self.parts.get(&index).copied().unwrap_or(0.0);
        if score > best {
            self.parts.insert(index, score);
        }

        let sum: f64 = (0..part_count)
            .map(|i| self.parts.get(&i).copied().unwrap_or(0.0))
            .sum();
        self.total = round_half_up(sum / part_count as f64);
    }

    pub fn record_whole_exam(&mut self, score: f64) {
        if score > self.total {
            self.total = score;
        }
    }

    pub fn qualifies(&self) -> bool {
        self.total >= QUALIFYING_SCORE
    }
}

// Halves round toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

impl From<StoredScore> for ScoreRecord {
    fn from(stored: StoredScore) -> Self {
        match stored {
            StoredScore::Legacy(total) => ScoreRecord {
                total,
                parts: BTreeMap::new(),
            },
            StoredScore::Structured { total, parts } => {
                let parts = parts
                    .into_iter()
                    .filter_map(|(key, score)| match key.parse::<usize>() {
                        Ok(index) => Some((index, score)),
                        Err(_) => {
                            log::warn!("Dropping part score with non-numeric key '{}'", key);
                            None
                        }
                    })
                    .collect();
                ScoreRecord { total, parts }
            }
        }
    }
}

impl From<&ScoreRecord> for StoredScore {
    fn from(record: &ScoreRecord) -> Self {
        StoredScore::Structured {
            total: record.total,
            parts: record
                .parts
                .iter()
                .map(|(index, score)| (index.to_string(), *score))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, SimpleObject)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub score: f64,
}
