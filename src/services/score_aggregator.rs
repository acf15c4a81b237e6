use crate::errors::{AppError, AppResult};
use crate::models::domain::Exam;

/// Where a submitted score applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartIndex {
    WholeExam,
    Part(usize),
}

impl PartIndex {
    /// Wire value clients send for a whole-exam submission.
    pub const WHOLE_EXAM_SENTINEL: i64 = -1;

    pub fn from_raw(raw: Option<i64>) -> AppResult<Self> {
        match raw {
            None | Some(Self::WHOLE_EXAM_SENTINEL) => Ok(PartIndex::WholeExam),
            Some(index) if index >= 0 => Ok(PartIndex::Part(index as usize)),
            Some(index) => Err(AppError::InvalidArgument(format!(
                "Part index {} is not valid",
                index
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreOutcome {
    pub high_score: f64,
    pub submitted_count: i64,
}

pub struct ScoreAggregator;

impl ScoreAggregator {
    /// Applies one submission to the exam in memory. Nothing is changed
    /// when the submission is rejected.
    pub fn submit(
        exam: &mut Exam,
        user_id: &str,
        score: f64,
        part: PartIndex,
    ) -> AppResult<ScoreOutcome> {
        if !score.is_finite() {
            return Err(AppError::InvalidArgument(
                "Score must be a finite number".to_string(),
            ));
        }

        let part_count = exam.parts.len();
        if let PartIndex::Part(index) = part {
            if part_count > 0 && index >= part_count {
                return Err(AppError::InvalidArgument(format!(
                    "Part index {} is out of range for an exam with {} parts",
                    index, part_count
                )));
            }
        }

        exam.submitted_count += 1;

        let mut record = exam.score_record(user_id).unwrap_or_default();
        match part {
            PartIndex::Part(index) => record.record_part(index, score, part_count),
            PartIndex::WholeExam => record.record_whole_exam(score),
        }
        exam.store_score_record(user_id, &record);

        Ok(ScoreOutcome {
            high_score: record.total,
            submitted_count: exam.submitted_count,
        })
    }

    /// Best known score for a user, zero when they never submitted.
    pub fn best_score(exam: &Exam, user_id: &str) -> f64 {
        exam.score_record(user_id)
            .map(|record| record.total)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{ScoreRecord, StoredScore};
    use crate::test_utils::fixtures::exam_with_parts;

    const SCORES: [f64; 6] = [0.0, 12.0, 49.5, 60.0, 87.0, 100.0];

    #[test]
    fn part_index_parsing() {
        assert_eq!(PartIndex::from_raw(None).unwrap(), PartIndex::WholeExam);
        assert_eq!(PartIndex::from_raw(Some(-1)).unwrap(), PartIndex::WholeExam);
        assert_eq!(PartIndex::from_raw(Some(3)).unwrap(), PartIndex::Part(3));
        assert!(matches!(
            PartIndex::from_raw(Some(-2)),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn two_part_scenario_reaches_review_threshold() {
        let mut exam = exam_with_parts(2);

        ScoreAggregator::submit(&mut exam, "u1", 100.0, PartIndex::Part(0)).unwrap();
        let outcome = ScoreAggregator::submit(&mut exam, "u1", 60.0, PartIndex::Part(1)).unwrap();

        assert_eq!(outcome.high_score, 80.0);
        assert_eq!(outcome.submitted_count, 2);
        assert!(exam.score_record("u1").unwrap().qualifies());
    }

    #[test]
    fn lower_whole_exam_score_does_not_replace_best() {
        let mut exam = exam_with_parts(0);

        ScoreAggregator::submit(&mut exam, "u1", 50.0, PartIndex::WholeExam).unwrap();
        let outcome = ScoreAggregator::submit(&mut exam, "u1", 40.0, PartIndex::WholeExam).unwrap();

        assert_eq!(outcome.high_score, 50.0);
    }

    #[test]
    fn legacy_record_is_migrated_before_part_update() {
        let mut exam = exam_with_parts(2);
        exam.user_scores
            .insert("u1".to_string(), StoredScore::Legacy(90.0));

        let migrated = exam.score_record("u1").unwrap();
        assert_eq!(migrated.total, 90.0);
        assert!(migrated.parts.is_empty());

        let outcome = ScoreAggregator::submit(&mut exam, "u1", 70.0, PartIndex::Part(0)).unwrap();

        assert_eq!(outcome.high_score, 35.0);
        match exam.user_scores.get("u1").unwrap() {
            StoredScore::Structured { total, parts } => {
                assert_eq!(*total, 35.0);
                assert_eq!(parts.get("0"), Some(&70.0));
            }
            StoredScore::Legacy(_) => panic!("record should be rewritten structured"),
        }
    }

    #[test]
    fn legacy_record_whole_exam_keeps_higher_legacy_total() {
        let mut exam = exam_with_parts(0);
        exam.user_scores
            .insert("u1".to_string(), StoredScore::Legacy(90.0));

        let outcome = ScoreAggregator::submit(&mut exam, "u1", 70.0, PartIndex::WholeExam).unwrap();
        assert_eq!(outcome.high_score, 90.0);
    }

    #[test]
    fn submitted_count_counts_every_attempt() {
        let mut exam = exam_with_parts(1);

        for _ in 0..3 {
            ScoreAggregator::submit(&mut exam, "same-user", 10.0, PartIndex::Part(0)).unwrap();
        }
        ScoreAggregator::submit(&mut exam, "other-user", 10.0, PartIndex::WholeExam).unwrap();

        assert_eq!(exam.submitted_count, 4);
    }

    #[test]
    fn out_of_range_part_is_rejected_without_side_effects() {
        let mut exam = exam_with_parts(2);

        let result = ScoreAggregator::submit(&mut exam, "u1", 90.0, PartIndex::Part(2));

        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
        assert_eq!(exam.submitted_count, 0);
        assert!(exam.user_scores.is_empty());
    }

    #[test]
    fn non_finite_score_is_rejected() {
        let mut exam = exam_with_parts(1);

        for score in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = ScoreAggregator::submit(&mut exam, "u1", score, PartIndex::Part(0));
            assert!(matches!(result, Err(AppError::InvalidArgument(_))));
        }
        assert_eq!(exam.submitted_count, 0);
    }

    #[test]
    fn part_submission_on_exam_without_parts_uses_raw_score() {
        let mut exam = exam_with_parts(0);

        let outcome = ScoreAggregator::submit(&mut exam, "u1", 64.0, PartIndex::Part(0)).unwrap();
        assert_eq!(outcome.high_score, 64.0);
    }

    #[test]
    fn part_submission_on_exam_without_parts_leaves_part_map_empty() {
        let mut exam = exam_with_parts(0);

        let outcome =
            ScoreAggregator::submit(&mut exam, "u1", 55.0, PartIndex::Part(1_000_000)).unwrap();

        assert_eq!(outcome.high_score, 55.0);
        match exam.user_scores.get("u1").unwrap() {
            StoredScore::Structured { total, parts } => {
                assert_eq!(*total, 55.0);
                assert!(parts.is_empty());
            }
            StoredScore::Legacy(_) => panic!("record should be rewritten structured"),
        }
    }

    #[test]
    fn score_sent_before_parts_existed_is_not_counted_later() {
        let mut exam = exam_with_parts(0);
        ScoreAggregator::submit(&mut exam, "u1", 90.0, PartIndex::Part(1)).unwrap();

        exam.parts = exam_with_parts(2).parts;
        let outcome = ScoreAggregator::submit(&mut exam, "u1", 40.0, PartIndex::Part(0)).unwrap();

        assert_eq!(outcome.high_score, 20.0);
    }

    #[test]
    fn whole_exam_on_zero_part_exam_is_max_of_previous_and_new() {
        for &first in &SCORES {
            for &second in &SCORES {
                let mut exam = exam_with_parts(0);
                ScoreAggregator::submit(&mut exam, "u1", first, PartIndex::WholeExam).unwrap();
                let outcome =
                    ScoreAggregator::submit(&mut exam, "u1", second, PartIndex::WholeExam).unwrap();

                assert_eq!(outcome.high_score, first.max(second));
            }
        }
    }

    #[test]
    fn repeated_part_submissions_keep_the_maximum() {
        // every ordered sequence of three scores drawn from SCORES
        for &a in &SCORES {
            for &b in &SCORES {
                for &c in &SCORES {
                    let mut exam = exam_with_parts(3);
                    for score in [a, b, c] {
                        ScoreAggregator::submit(&mut exam, "u1", score, PartIndex::Part(1))
                            .unwrap();
                    }

                    let record = exam.score_record("u1").unwrap();
                    let stored = record.parts.get(&1).copied().unwrap_or(0.0);
                    assert_eq!(stored, a.max(b).max(c), "sequence {:?}", [a, b, c]);
                }
            }
        }
    }

    #[test]
    fn total_is_rounded_zero_filled_mean_over_all_parts() {
        for part_count in 1..=4usize {
            // every subset of parts, each answered with a score picked by position
            for mask in 0u32..(1 << part_count) {
                let mut exam = exam_with_parts(part_count);
                let mut expected_sum = 0.0;
                let mut last = None;

                for index in 0..part_count {
                    if mask & (1 << index) == 0 {
                        continue;
                    }
                    let score = SCORES[(index + mask as usize) % SCORES.len()];
                    expected_sum += score;
                    last = Some(
                        ScoreAggregator::submit(&mut exam, "u1", score, PartIndex::Part(index))
                            .unwrap(),
                    );
                }

                if let Some(outcome) = last {
                    let mean = expected_sum / part_count as f64;
                    let expected = if mean.fract() >= 0.5 {
                        mean.ceil()
                    } else {
                        mean.floor()
                    };
                    assert_eq!(
                        outcome.high_score, expected,
                        "parts={} mask={:b}",
                        part_count, mask
                    );
                }
            }
        }
    }

    #[test]
    fn best_score_reads_either_representation() {
        let mut exam = exam_with_parts(1);
        exam.user_scores
            .insert("legacy".to_string(), StoredScore::Legacy(81.0));
        exam.store_score_record(
            "structured",
            &ScoreRecord {
                total: 64.0,
                ..Default::default()
            },
        );

        assert_eq!(ScoreAggregator::best_score(&exam, "legacy"), 81.0);
        assert_eq!(ScoreAggregator::best_score(&exam, "structured"), 64.0);
        assert_eq!(ScoreAggregator::best_score(&exam, "nobody"), 0.0);
    }
}
