use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub question_text: String,
    pub options: Vec<String>,
    pub user_answer: String,
    pub correct_answer: String,
    pub correctness_score: f64,
    pub reasoning_score: f64,
    pub total: f64,
    pub max_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementArea {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: u32,
    pub attempt_number: u32,
    pub title: String,
    pub date: DateTime<Utc>,
    pub total_score: f64,
    pub max_score: f64,
    pub questions: Vec<Question>,
    pub performance_patterns: Vec<String>,
    pub areas_for_improvement: Vec<ImprovementArea>,
    pub overall_feedback: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub submitted_at: DateTime<Utc>,
    pub grade: f64,
    pub max_grade: f64,
    pub reasoning_score: f64,
    pub max_reasoning_score: f64,
    pub feedback: String,
    pub question_text: String,
    pub user_answer: String,
}

/// A course unit. An empty `quizzes` list means the learner has not attempted
/// the module quiz yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub quizzes: Vec<QuizAttempt>,
    pub has_assignment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<Assignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
    pub overall_progress: f64,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleQuiz {
    pub id: String,
    pub module_id: String,
    pub module_name: String,
    pub max_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentItem {
    pub id: String,
    pub module_id: String,
    pub module_name: String,
    pub name: String,
    pub max_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProject {
    pub id: String,
    pub name: String,
    pub max_score: f64,
}

/// A scored, dated result. `percentage` is always derived from the score
/// and never set independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ScoredWire")]
pub struct Scored {
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub date: NaiveDate,
}

impl Scored {
    pub fn new(score: f64, max_score: f64, date: NaiveDate) -> Self {
        Self {
            score,
            max_score,
            percentage: percent_of(score, max_score),
            date,
        }
    }
}

/// Incoming shape of `Scored`; any stored percentage is ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredWire {
    score: f64,
    max_score: f64,
    date: NaiveDate,
}

impl From<ScoredWire> for Scored {
    fn from(w: ScoredWire) -> Self {
        Scored::new(w.score, w.max_score, w.date)
    }
}

pub fn percent_of(score: f64, max_score: f64) -> f64 {
    if max_score > 0.0 {
        100.0 * score / max_score
    } else {
        0.0
    }
}

/// One try at a quiz, as seen from the teacher matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "QuizTryWire")]
pub struct QuizTry {
    pub attempt_number: u32,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub date: NaiveDate,
}

impl QuizTry {
    pub fn new(attempt_number: u32, score: f64, max_score: f64, date: NaiveDate) -> Self {
        Self {
            attempt_number,
            score,
            max_score,
            percentage: percent_of(score, max_score),
            date,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizTryWire {
    attempt_number: u32,
    score: f64,
    max_score: f64,
    date: NaiveDate,
}

impl From<QuizTryWire> for QuizTry {
    fn from(w: QuizTryWire) -> Self {
        QuizTry::new(w.attempt_number, w.score, w.max_score, w.date)
    }
}

/// Non-empty attempt history with its best try resolved at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuizHistoryWire", into = "QuizHistoryWire")]
pub struct QuizHistory {
    attempts: Vec<QuizTry>,
    best: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizHistoryWire {
    attempts: Vec<QuizTry>,
    #[serde(default, skip_deserializing)]
    best_score: f64,
    #[serde(default, skip_deserializing)]
    best_percentage: f64,
}

impl TryFrom<QuizHistoryWire> for QuizHistory {
    type Error = String;

    fn try_from(wire: QuizHistoryWire) -> Result<Self, Self::Error> {
        QuizHistory::new(wire.attempts)
            .ok_or_else(|| "an attempted quiz must list at least one attempt".to_string())
    }
}

impl From<QuizHistory> for QuizHistoryWire {
    fn from(h: QuizHistory) -> Self {
        let best_score = h.best_score();
        let best_percentage = h.best_percentage();
        QuizHistoryWire {
            attempts: h.attempts,
            best_score,
            best_percentage,
        }
    }
}

impl QuizHistory {
    /// Returns `None` for an empty history; ties keep the earliest try.
    pub fn new(mut attempts: Vec<QuizTry>) -> Option<Self> {
        if attempts.is_empty() {
            return None;
        }
        attempts.sort_by_key(|a| a.attempt_number);
        let mut best = 0;
        for (i, a) in attempts.iter().enumerate() {
            if a.score > attempts[best].score {
                best = i;
            }
        }
        Some(Self { attempts, best })
    }

    pub fn attempts(&self) -> &[QuizTry] {
        &self.attempts
    }

    pub fn best(&self) -> &QuizTry {
        &self.attempts[self.best]
    }

    pub fn best_score(&self) -> f64 {
        self.best().score
    }

    pub fn best_percentage(&self) -> f64 {
        self.best().percentage
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum QuizOutcome {
    NotAttempted,
    Attempted(QuizHistory),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Submission {
    NotSubmitted,
    Submitted(Scored),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuizAttempt {
    pub student_id: String,
    pub quiz_id: String,
    pub module_id: String,
    pub outcome: QuizOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssignmentAttempt {
    pub student_id: String,
    pub assignment_id: String,
    pub module_id: String,
    pub outcome: Submission,
}

/// Projects are course-scoped, so there is no module id here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProjectSubmission {
    pub student_id: String,
    pub project_id: String,
    pub outcome: Submission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Quiz,
    Assignment,
    Project,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Quiz => "quiz",
            ItemKind::Assignment => "assignment",
            ItemKind::Project => "project",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "quiz" => Some(ItemKind::Quiz),
            "assignment" => Some(ItemKind::Assignment),
            "project" => Some(ItemKind::Project),
            _ => None,
        }
    }
}

/// A borrowed join-table row of any of the three kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JoinRecord<'a> {
    Quiz(&'a StudentQuizAttempt),
    Assignment(&'a StudentAssignmentAttempt),
    Project(&'a StudentProjectSubmission),
}

impl<'a> JoinRecord<'a> {
    pub fn kind(&self) -> ItemKind {
        match self {
            JoinRecord::Quiz(_) => ItemKind::Quiz,
            JoinRecord::Assignment(_) => ItemKind::Assignment,
            JoinRecord::Project(_) => ItemKind::Project,
        }
    }

    pub fn student_id(&self) -> &'a str {
        match *self {
            JoinRecord::Quiz(r) => &r.student_id,
            JoinRecord::Assignment(r) => &r.student_id,
            JoinRecord::Project(r) => &r.student_id,
        }
    }

    pub fn item_id(&self) -> &'a str {
        match *self {
            JoinRecord::Quiz(r) => &r.quiz_id,
            JoinRecord::Assignment(r) => &r.assignment_id,
            JoinRecord::Project(r) => &r.project_id,
        }
    }

    pub fn module_id(&self) -> Option<&'a str> {
        match *self {
            JoinRecord::Quiz(r) => Some(&r.module_id),
            JoinRecord::Assignment(r) => Some(&r.module_id),
            JoinRecord::Project(_) => None,
        }
    }

    pub fn attempted(&self) -> bool {
        self.scored().is_some()
    }

    /// Normalized result; for quizzes this is the best try.
    pub fn scored(&self) -> Option<Scored> {
        match *self {
            JoinRecord::Quiz(r) => match &r.outcome {
                QuizOutcome::NotAttempted => None,
                QuizOutcome::Attempted(h) => {
                    let best = h.best();
                    Some(Scored {
                        score: best.score,
                        max_score: best.max_score,
                        percentage: best.percentage,
                        date: best.date,
                    })
                }
            },
            JoinRecord::Assignment(r) => submitted(&r.outcome),
            JoinRecord::Project(r) => submitted(&r.outcome),
        }
    }

    pub fn history(&self) -> Option<&'a QuizHistory> {
        match *self {
            JoinRecord::Quiz(r) => match &r.outcome {
                QuizOutcome::Attempted(h) => Some(h),
                QuizOutcome::NotAttempted => None,
            },
            _ => None,
        }
    }
}

fn submitted(s: &Submission) -> Option<Scored> {
    match s {
        Submission::NotSubmitted => None,
        Submission::Submitted(v) => Some(v.clone()),
    }
}
