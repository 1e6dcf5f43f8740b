use crate::bands::{classify, BandPolicy, ScoreBand};
use crate::model::{Course, Module, Question, QuizAttempt, Student};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Students averaging below this are flagged at-risk.
pub const AT_RISK_THRESHOLD: f64 = 70.0;

/// Half-up rounding to a whole number: `floor(x + 0.5)`.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

fn mean(sum: f64, count: usize) -> f64 {
    if count > 0 {
        sum / count as f64
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub total_quizzes: usize,
    pub avg_quiz_score: i64,
    pub total_assignments: usize,
    pub avg_assignment_score: i64,
    pub modules_completed: usize,
    pub total_modules: usize,
    pub completion_rate: i64,
}

pub fn student_stats(course: &Course) -> StudentStats {
    let quizzes = course
        .modules
        .iter()
        .flat_map(|m| m.quizzes.iter())
        .collect::<Vec<_>>();
    let grades = course
        .modules
        .iter()
        .filter(|m| m.has_assignment)
        .filter_map(|m| m.assignment.as_ref().map(|a| a.grade))
        .collect::<Vec<_>>();

    let total_quizzes = quizzes.len();
    let avg_quiz_score = if total_quizzes > 0 {
        round_half_up(mean(
            quizzes.iter().map(|q| q.total_score).sum(),
            total_quizzes,
        ))
    } else {
        0
    };
    let total_assignments = grades.len();
    let avg_assignment_score = if total_assignments > 0 {
        round_half_up(mean(grades.iter().sum(), total_assignments))
    } else {
        0
    };

    let modules_completed = course
        .modules
        .iter()
        .filter(|m| !m.quizzes.is_empty())
        .count();
    let total_modules = course.modules.len();
    let completion_rate = if total_modules > 0 {
        round_half_up(100.0 * modules_completed as f64 / total_modules as f64)
    } else {
        0
    };

    StudentStats {
        total_quizzes,
        avg_quiz_score,
        total_assignments,
        avg_assignment_score,
        modules_completed,
        total_modules,
        completion_rate,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassOverview {
    pub total_students: usize,
    pub avg_class_score: i64,
    pub avg_progress: i64,
    pub at_risk_count: usize,
}

pub fn class_overview(students: &[Student]) -> ClassOverview {
    let n = students.len();
    ClassOverview {
        total_students: n,
        avg_class_score: round_half_up(mean(students.iter().map(|s| s.average_score).sum(), n)),
        avg_progress: round_half_up(mean(students.iter().map(|s| s.overall_progress).sum(), n)),
        at_risk_count: students
            .iter()
            .filter(|s| is_at_risk(s))
            .count(),
    }
}

pub fn is_at_risk(student: &Student) -> bool {
    student.average_score < AT_RISK_THRESHOLD
}

/// Best quiz result of a module. `NotAttempted` is distinct from a real zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ModuleBest {
    NotAttempted,
    Best { score: f64, attempts: usize },
}

impl ModuleBest {
    pub fn score(&self) -> Option<f64> {
        match self {
            ModuleBest::NotAttempted => None,
            ModuleBest::Best { score, .. } => Some(*score),
        }
    }
}

pub fn module_best(module: &Module) -> ModuleBest {
    let best = module
        .quizzes
        .iter()
        .map(|q| q.total_score)
        .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))));
    match best {
        Some(score) => ModuleBest::Best {
            score,
            attempts: module.quizzes.len(),
        },
        None => ModuleBest::NotAttempted,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub id: String,
    pub name: String,
    pub attempt_count: usize,
    pub best: ModuleBest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_band: Option<ScoreBand>,
    pub has_assignment: bool,
    pub assignment_submitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_attempt_at: Option<DateTime<Utc>>,
}

pub fn module_summary(module: &Module) -> ModuleSummary {
    let best = module_best(module);
    ModuleSummary {
        id: module.id.clone(),
        name: module.name.clone(),
        attempt_count: module.quizzes.len(),
        best,
        best_band: best.score().map(|s| classify(BandPolicy::Module, s)),
        has_assignment: module.has_assignment,
        assignment_submitted: module.has_assignment && module.assignment.is_some(),
        last_attempt_at: latest_attempt(module).map(|q| q.date),
    }
}

/// The last attempt in series order, flagged "latest" in the module view.
pub fn latest_attempt(module: &Module) -> Option<&QuizAttempt> {
    module.quizzes.iter().max_by_key(|q| q.attempt_number)
}

pub fn correct_answers(quiz: &QuizAttempt) -> usize {
    quiz.questions
        .iter()
        .filter(|q| is_correct(q))
        .count()
}

pub fn is_correct(q: &Question) -> bool {
    q.user_answer == q.correct_answer
}

/// Mean reasoning sub-score on its 0..=5 scale, expressed as a percentage.
pub fn avg_reasoning_percent(quiz: &QuizAttempt) -> i64 {
    if quiz.questions.is_empty() {
        return 0;
    }
    let sum: f64 = quiz.questions.iter().map(|q| q.reasoning_score).sum();
    round_half_up(mean(sum, quiz.questions.len()) * 20.0)
}

pub fn question_percent(q: &Question) -> f64 {
    crate::model::percent_of(q.total, q.max_score)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionState {
    Correct,
    WrongChoice,
    Neutral,
}

/// Options are matched to answers by their leading letter ("B. ...").
pub fn option_state(q: &Question, option: &str) -> OptionState {
    if option.starts_with(q.correct_answer.as_str()) {
        OptionState::Correct
    } else if !is_correct(q) && option.starts_with(q.user_answer.as_str()) {
        OptionState::WrongChoice
    } else {
        OptionState::Neutral
    }
}
