use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::mock_test::{MockTestEntry, STATUS_COMPLETED};

pub struct GradingService;

impl GradingService {
    /// Grades the embedded entry list against the caller-supplied answers
    /// and the stored answer key. A question the caller never answered
    /// stays `None` and counts as incorrect; correctness is exact string
    /// equality. Returns the graded entries and the correct count.
    pub fn grade(
        entries: &[MockTestEntry],
        answers: &HashMap<Uuid, Option<String>>,
        answer_key: &HashMap<Uuid, String>,
    ) -> (Vec<MockTestEntry>, i32) {
        let mut correct_count = 0;
        let graded = entries
            .iter()
            .map(|entry| {
                let selected = answers.get(&entry.question_id).cloned().flatten();
                let is_correct = match (&selected, answer_key.get(&entry.question_id)) {
                    (Some(sel), Some(key)) => sel == key,
                    _ => false,
                };
                if is_correct {
                    correct_count += 1;
                }
                MockTestEntry {
                    question_id: entry.question_id,
                    selected_answer: selected,
                    is_correct,
                    time_taken: entry.time_taken,
                }
            })
            .collect();
        (graded, correct_count)
    }

    /// Integer percentage, rounded half away from zero; 0 for an empty test.
    pub fn score(correct: i32, total: i32) -> i32 {
        if total <= 0 {
            return 0;
        }
        ((correct as f64 / total as f64) * 100.0).round() as i32
    }

    /// A completed test is frozen; grading it again is rejected.
    pub fn ensure_submittable(status: &str) -> Result<()> {
        if status == STATUS_COMPLETED {
            return Err(Error::InvalidState("Test already submitted".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(n: usize) -> (Vec<MockTestEntry>, Vec<Uuid>) {
        let ids: Vec<Uuid> = (0..n).map(|_| Uuid::new_v4()).collect();
        let entries = ids.iter().map(|id| MockTestEntry::unanswered(*id)).collect();
        (entries, ids)
    }

    fn key_for(ids: &[Uuid]) -> HashMap<Uuid, String> {
        ids.iter().map(|id| (*id, "A".to_string())).collect()
    }

    #[test]
    fn two_of_five_scores_forty() {
        let (entries, ids) = fixture(5);
        let answer_key = key_for(&ids);
        // correct, wrong, missing, correct, wrong
        let mut answers: HashMap<Uuid, Option<String>> = HashMap::new();
        answers.insert(ids[0], Some("A".to_string()));
        answers.insert(ids[1], Some("B".to_string()));
        answers.insert(ids[3], Some("A".to_string()));
        answers.insert(ids[4], Some("C".to_string()));

        let (graded, correct) = GradingService::grade(&entries, &answers, &answer_key);
        assert_eq!(correct, 2);
        assert_eq!(GradingService::score(correct, 5), 40);
        assert!(graded[0].is_correct);
        assert!(!graded[1].is_correct);
        assert!(!graded[2].is_correct);
        assert_eq!(graded[2].selected_answer, None);
        assert!(graded[3].is_correct);
        assert!(!graded[4].is_correct);
    }

    #[test]
    fn all_correct_scores_one_hundred() {
        let (entries, ids) = fixture(4);
        let answer_key = key_for(&ids);
        let answers: HashMap<Uuid, Option<String>> =
            ids.iter().map(|id| (*id, Some("A".to_string()))).collect();
        let (_, correct) = GradingService::grade(&entries, &answers, &answer_key);
        assert_eq!(correct, 4);
        assert_eq!(GradingService::score(correct, 4), 100);
    }

    #[test]
    fn no_answers_scores_zero() {
        let (entries, ids) = fixture(3);
        let (graded, correct) =
            GradingService::grade(&entries, &HashMap::new(), &key_for(&ids));
        assert_eq!(correct, 0);
        assert_eq!(GradingService::score(correct, 3), 0);
        assert!(graded.iter().all(|e| !e.is_correct));
    }

    #[test]
    fn an_explicit_null_answer_counts_incorrect() {
        let (entries, ids) = fixture(1);
        let mut answers = HashMap::new();
        answers.insert(ids[0], None);
        let (graded, correct) = GradingService::grade(&entries, &answers, &key_for(&ids));
        assert_eq!(correct, 0);
        assert_eq!(graded[0].selected_answer, None);
    }

    #[test]
    fn score_rounds_half_up_and_stays_in_range() {
        assert_eq!(GradingService::score(1, 3), 33);
        assert_eq!(GradingService::score(2, 3), 67);
        assert_eq!(GradingService::score(1, 8), 13);
        assert_eq!(GradingService::score(0, 0), 0);
        for correct in 0..=7 {
            let s = GradingService::score(correct, 7);
            assert!((0..=100).contains(&s));
            let expected = ((correct as f64 / 7.0) * 100.0).round() as i32;
            assert_eq!(s, expected);
        }
    }

    #[test]
    fn completed_tests_cannot_be_resubmitted() {
        assert!(GradingService::ensure_submittable("pending").is_ok());
        assert!(GradingService::ensure_submittable("in-progress").is_ok());
        let err = GradingService::ensure_submittable("completed").unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }
}
