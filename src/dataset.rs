use crate::model::{
    Assignment, AssignmentItem, Course, CourseProject, ItemKind, JoinRecord, Module, ModuleQuiz,
    Student, StudentAssignmentAttempt, StudentProjectSubmission, StudentQuizAttempt,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

const QUIZ_MAX_SCORE: f64 = 100.0;
const SCORE_EPSILON: f64 = 1e-6;

/// The whole read-only object graph behind both dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub course: Course,
    pub students: Vec<Student>,
    pub project: CourseProject,
    #[serde(default)]
    pub quiz_attempts: Vec<StudentQuizAttempt>,
    #[serde(default)]
    pub assignment_attempts: Vec<StudentAssignmentAttempt>,
    #[serde(default)]
    pub project_submissions: Vec<StudentProjectSubmission>,
}

#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("quiz {attempt} question {question}: total {total} != correctness {correctness} + reasoning {reasoning}")]
    QuestionTotal {
        attempt: u32,
        question: u32,
        total: f64,
        correctness: f64,
        reasoning: f64,
    },
    #[error("quiz {attempt} in {module}: score {score} outside 0..={max}")]
    QuizScoreRange {
        module: String,
        attempt: u32,
        score: f64,
        max: f64,
    },
    #[error("{module}: attempt number {number} is not a unique 1-based ordinal")]
    AttemptOrdinal { module: String, number: u32 },
    #[error("{module}: assignment {assignment} present but hasAssignment is false")]
    UnexpectedAssignment { module: String, assignment: String },
    #[error("duplicate student id {0}")]
    DuplicateStudent(String),
    #[error("quiz record {student}/{quiz}: try number {number} is not a unique 1-based ordinal")]
    TryOrdinal {
        student: String,
        quiz: String,
        number: u32,
    },
    #[error("{kind} record {student}/{item}: score {score} outside 0..={max}")]
    RecordScoreRange {
        kind: &'static str,
        student: String,
        item: String,
        score: f64,
        max: f64,
    },
}

/// A (student, item) pair whose join-table coverage is not exactly one row.
/// `orphan` pairs name a student or item missing from the roster or catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageGap {
    pub kind: ItemKind,
    pub student_id: String,
    pub item_id: String,
    pub records: usize,
    pub orphan: bool,
}

impl Dataset {
    pub fn load_json(path: &Path) -> anyhow::Result<Dataset> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?;
        let ds: Dataset = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse dataset {}", path.display()))?;
        ds.validate()
            .with_context(|| format!("invalid dataset {}", path.display()))?;
        Ok(ds)
    }

    pub fn validate(&self) -> Result<(), DatasetError> {
        for module in &self.course.modules {
            let mut seen = HashSet::new();
            for quiz in &module.quizzes {
                if quiz.attempt_number == 0 || !seen.insert(quiz.attempt_number) {
                    return Err(DatasetError::AttemptOrdinal {
                        module: module.id.clone(),
                        number: quiz.attempt_number,
                    });
                }
                if quiz.total_score < 0.0 || quiz.total_score > quiz.max_score {
                    return Err(DatasetError::QuizScoreRange {
                        module: module.id.clone(),
                        attempt: quiz.id,
                        score: quiz.total_score,
                        max: quiz.max_score,
                    });
                }
                for q in &quiz.questions {
                    if (q.correctness_score + q.reasoning_score - q.total).abs() > SCORE_EPSILON {
                        return Err(DatasetError::QuestionTotal {
                            attempt: quiz.id,
                            question: q.id,
                            total: q.total,
                            correctness: q.correctness_score,
                            reasoning: q.reasoning_score,
                        });
                    }
                }
            }
            if let (false, Some(a)) = (module.has_assignment, module.assignment.as_ref()) {
                return Err(DatasetError::UnexpectedAssignment {
                    module: module.id.clone(),
                    assignment: a.id.clone(),
                });
            }
        }

        let mut ids = HashSet::new();
        for s in &self.students {
            if !ids.insert(s.id.as_str()) {
                return Err(DatasetError::DuplicateStudent(s.id.clone()));
            }
        }

        for rec in self.join_records(ItemKind::Quiz) {
            let Some(history) = rec.history() else {
                continue;
            };
            let mut seen = HashSet::new();
            for t in history.attempts() {
                if t.attempt_number == 0 || !seen.insert(t.attempt_number) {
                    return Err(DatasetError::TryOrdinal {
                        student: rec.student_id().to_string(),
                        quiz: rec.item_id().to_string(),
                        number: t.attempt_number,
                    });
                }
            }
        }

        for kind in [ItemKind::Quiz, ItemKind::Assignment, ItemKind::Project] {
            for rec in self.join_records(kind) {
                let Some(scored) = rec.scored() else {
                    continue;
                };
                if scored.score < 0.0 || scored.score > scored.max_score {
                    return Err(DatasetError::RecordScoreRange {
                        kind: kind.as_str(),
                        student: rec.student_id().to_string(),
                        item: rec.item_id().to_string(),
                        score: scored.score,
                        max: scored.max_score,
                    });
                }
            }
        }
        Ok(())
    }

    /// Quizzes the teacher can pick: every module with at least one attempt.
    pub fn module_quizzes(&self) -> Vec<ModuleQuiz> {
        self.course
            .modules
            .iter()
            .filter(|m| !m.quizzes.is_empty())
            .map(|m| ModuleQuiz {
                id: m.id.clone(),
                module_id: m.id.clone(),
                module_name: m.name.clone(),
                max_score: QUIZ_MAX_SCORE,
            })
            .collect()
    }

    pub fn assignments(&self) -> Vec<AssignmentItem> {
        self.course
            .modules
            .iter()
            .filter(|m| m.has_assignment)
            .filter_map(|m| {
                m.assignment.as_ref().map(|a| AssignmentItem {
                    id: a.id.clone(),
                    module_id: m.id.clone(),
                    module_name: m.name.clone(),
                    name: a.title.clone(),
                    max_score: a.max_grade,
                })
            })
            .collect()
    }

    pub fn item_ids(&self, kind: ItemKind) -> Vec<String> {
        match kind {
            ItemKind::Quiz => self.module_quizzes().into_iter().map(|q| q.id).collect(),
            ItemKind::Assignment => self.assignments().into_iter().map(|a| a.id).collect(),
            ItemKind::Project => vec![self.project.id.clone()],
        }
    }

    pub fn join_records(&self, kind: ItemKind) -> Box<dyn Iterator<Item = JoinRecord<'_>> + '_> {
        match kind {
            ItemKind::Quiz => Box::new(self.quiz_attempts.iter().map(JoinRecord::Quiz)),
            ItemKind::Assignment => {
                Box::new(self.assignment_attempts.iter().map(JoinRecord::Assignment))
            }
            ItemKind::Project => {
                Box::new(self.project_submissions.iter().map(JoinRecord::Project))
            }
        }
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    pub fn module(&self, module_id: &str) -> Option<&Module> {
        self.course.modules.iter().find(|m| m.id == module_id)
    }

    pub fn assignment(&self, assignment_id: &str) -> Option<(&Module, &Assignment)> {
        self.course.modules.iter().find_map(|m| {
            m.assignment
                .as_ref()
                .filter(|a| a.id == assignment_id)
                .map(|a| (m, a))
        })
    }

    /// Pairs from roster x catalogue with zero rows (missing) or more than one,
    /// followed by rows whose student or item is unknown.
    pub fn coverage_gaps(&self) -> Vec<CoverageGap> {
        let mut out = Vec::new();
        for kind in [ItemKind::Quiz, ItemKind::Assignment, ItemKind::Project] {
            let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
            for rec in self.join_records(kind) {
                *counts.entry((rec.student_id(), rec.item_id())).or_insert(0) += 1;
            }
            let item_ids = self.item_ids(kind);
            for item_id in &item_ids {
                for s in &self.students {
                    let n = counts
                        .get(&(s.id.as_str(), item_id.as_str()))
                        .copied()
                        .unwrap_or(0);
                    if n != 1 {
                        out.push(CoverageGap {
                            kind,
                            student_id: s.id.clone(),
                            item_id: item_id.clone(),
                            records: n,
                            orphan: false,
                        });
                    }
                }
            }
            for (&(student_id, item_id), &n) in &counts {
                let known_student = self.student(student_id).is_some();
                let known_item = item_ids.iter().any(|i| i == item_id);
                if !(known_student && known_item) {
                    out.push(CoverageGap {
                        kind,
                        student_id: student_id.to_string(),
                        item_id: item_id.to_string(),
                        records: n,
                        orphan: true,
                    });
                }
            }
        }
        out
    }

    /// `coverage_gaps`, with one warning logged per gap.
    pub fn report_coverage_gaps(&self) -> Vec<CoverageGap> {
        let gaps = self.coverage_gaps();
        for g in &gaps {
            warn!(
                kind = g.kind.as_str(),
                student = %g.student_id,
                item = %g.item_id,
                records = g.records,
                orphan = g.orphan,
                "join table coverage gap"
            );
        }
        gaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn fixture() -> Dataset {
        mock::dataset().expect("mock dataset")
    }

    #[test]
    fn mock_dataset_is_valid_and_fully_covered() {
        let ds = fixture();
        assert_eq!(ds.validate(), Ok(()));
        assert!(ds.coverage_gaps().is_empty());
    }

    #[test]
    fn catalogues_follow_course_modules() {
        let ds = fixture();
        let quizzes = ds.module_quizzes();
        assert_eq!(quizzes.len(), 5);
        assert!(quizzes.iter().all(|q| q.id != "module-6"));
        let assignments = ds.assignments();
        let ids = assignments.iter().map(|a| a.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["assign-2", "assign-3", "assign-5"]);
        assert_eq!(ds.item_ids(ItemKind::Project), vec!["project-1".to_string()]);
    }

    #[test]
    fn validate_rejects_bad_question_total() {
        let mut ds = fixture();
        ds.course.modules[0].quizzes[0].questions[0].total += 1.0;
        assert!(matches!(
            ds.validate(),
            Err(DatasetError::QuestionTotal { .. })
        ));
    }

    #[test]
    fn validate_rejects_repeated_attempt_ordinal() {
        let mut ds = fixture();
        ds.course.modules[1].quizzes[1].attempt_number = 1;
        assert_eq!(
            ds.validate(),
            Err(DatasetError::AttemptOrdinal {
                module: "module-2".into(),
                number: 1
            })
        );
    }

    #[test]
    fn validate_rejects_assignment_without_flag() {
        let mut ds = fixture();
        ds.course.modules[1].has_assignment = false;
        assert!(matches!(
            ds.validate(),
            Err(DatasetError::UnexpectedAssignment { .. })
        ));
    }

    #[test]
    fn coverage_reports_missing_and_duplicate_rows() {
        let mut ds = fixture();
        ds.quiz_attempts.retain(|r| !(r.student_id == "student-4" && r.quiz_id == "module-1"));
        let dup = ds.project_submissions[0].clone();
        ds.project_submissions.push(dup);

        let gaps = ds.coverage_gaps();
        assert_eq!(gaps.len(), 2);
        assert!(gaps.contains(&CoverageGap {
            kind: ItemKind::Quiz,
            student_id: "student-4".into(),
            item_id: "module-1".into(),
            records: 0,
            orphan: false,
        }));
        assert!(gaps.iter().any(|g| g.kind == ItemKind::Project && g.records == 2));
    }

    #[test]
    fn load_json_round_trips_the_fixture() {
        let ds = fixture();
        let path = std::env::temp_dir().join(format!(
            "vedad-dataset-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        std::fs::write(&path, serde_json::to_string(&ds).expect("serialize")).expect("write");
        let loaded = Dataset::load_json(&path).expect("load");
        assert_eq!(loaded, ds);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn stored_percentage_cannot_contradict_the_score() {
        let ds = fixture();
        let mut raw = serde_json::to_value(&ds).expect("serialize");
        let rows = raw["assignmentAttempts"].as_array_mut().expect("rows");
        let row = rows
            .iter_mut()
            .find(|r| r["studentId"] == "student-4" && r["assignmentId"] == "assign-3")
            .expect("student-4 assign-3");
        row["outcome"]["percentage"] = serde_json::json!(99.0);

        let loaded: Dataset = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(loaded.validate(), Ok(()));
        let scored = loaded
            .join_records(ItemKind::Assignment)
            .find(|r| r.student_id() == "student-4" && r.item_id() == "assign-3")
            .and_then(|r| r.scored())
            .expect("scored");
        assert_eq!(scored.score, 65.0);
        assert_eq!(scored.percentage, 65.0);
    }

    #[test]
    fn validate_rejects_repeated_try_ordinal() {
        let ds = fixture();
        let mut raw = serde_json::to_value(&ds).expect("serialize");
        let rows = raw["quizAttempts"].as_array_mut().expect("rows");
        let row = rows
            .iter_mut()
            .find(|r| r["studentId"] == "student-3" && r["quizId"] == "module-1")
            .expect("student-3 module-1");
        row["outcome"]["attempts"][2]["attemptNumber"] = serde_json::json!(2);

        let loaded: Dataset = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(
            loaded.validate(),
            Err(DatasetError::TryOrdinal {
                student: "student-3".into(),
                quiz: "module-1".into(),
                number: 2,
            })
        );
    }

    #[test]
    fn coverage_reports_rows_for_unknown_students_and_items() {
        let mut ds = fixture();
        let mut stray = ds.assignment_attempts[0].clone();
        stray.student_id = "student-9".into();
        ds.assignment_attempts.push(stray);
        let mut unknown_item = ds.project_submissions[0].clone();
        unknown_item.project_id = "project-2".into();
        ds.project_submissions.push(unknown_item);

        let gaps = ds.coverage_gaps();
        assert_eq!(gaps.len(), 2);
        assert!(gaps.iter().all(|g| g.orphan && g.records == 1));
        assert!(gaps.contains(&CoverageGap {
            kind: ItemKind::Assignment,
            student_id: "student-9".into(),
            item_id: "assign-2".into(),
            records: 1,
            orphan: true,
        }));
        assert!(gaps
            .iter()
            .any(|g| g.kind == ItemKind::Project && g.item_id == "project-2"));
    }
}
