use crate::bands::{classify, matrix_band, BandPolicy, ScoreBand};
use crate::calc::{self, ModuleSummary};
use crate::dataset::Dataset;
use crate::model::{ItemKind, JoinRecord, QuizTry, Student, Submission};
use chrono::NaiveDate;
use serde::Serialize;

/// First join row for `(student_id, item_id)` in the table selected by
/// `kind`. Uniqueness is not checked here; see `Dataset::coverage_gaps`.
pub fn student_data<'a>(
    ds: &'a Dataset,
    student_id: &str,
    item_id: &str,
    kind: ItemKind,
) -> Option<JoinRecord<'a>> {
    ds.join_records(kind)
        .find(|r| r.student_id() == student_id && r.item_id() == item_id)
}

pub fn attempted_count(ds: &Dataset, item_id: &str, kind: ItemKind) -> usize {
    ds.join_records(kind)
        .filter(|r| r.item_id() == item_id && r.attempted())
        .count()
}

/// Roster students with no attempted row for the item, missing rows included.
pub fn not_attempted_count(
    ds: &Dataset,
    roster: &[Student],
    item_id: &str,
    kind: ItemKind,
) -> usize {
    roster
        .iter()
        .filter(|s| {
            !student_data(ds, &s.id, item_id, kind)
                .map(|r| r.attempted())
                .unwrap_or(false)
        })
        .count()
}

/// Case-insensitive substring match on name or email, in roster order.
/// The query is matched as typed; a blank query returns everyone.
pub fn search_students<'a>(students: &'a [Student], query: &str) -> Vec<&'a Student> {
    if query.trim().is_empty() {
        return students.iter().collect();
    }
    let needle = query.to_lowercase();
    students
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&needle) || s.email.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|part| part.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Display form used in the matrix, e.g. `Dec 12, 2024`.
pub fn display_date(d: NaiveDate) -> String {
    d.format("%b %-d, %Y").to_string()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCard {
    pub id: String,
    pub name: String,
    pub email: String,
    pub initials: String,
    pub enrolled_courses: Vec<String>,
    pub overall_progress: f64,
    pub average_score: f64,
    pub score_band: ScoreBand,
    pub at_risk: bool,
}

pub fn student_card(s: &Student) -> StudentCard {
    StudentCard {
        id: s.id.clone(),
        name: s.name.clone(),
        email: s.email.clone(),
        initials: initials(&s.name),
        enrolled_courses: s.enrolled_courses.clone(),
        overall_progress: s.overall_progress,
        average_score: s.average_score,
        score_band: classify(BandPolicy::Roster, s.average_score),
        at_risk: calc::is_at_risk(s),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    pub student: StudentCard,
    pub attempted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub max_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<ScoreBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attempts: Vec<QuizTry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Matrix {
    pub kind: ItemKind,
    pub item_id: String,
    pub title: String,
    pub subtitle: String,
    pub max_score: f64,
    pub attempted_count: usize,
    pub not_attempted_count: usize,
    pub rows: Vec<MatrixRow>,
}

/// Performance matrix for one item; `None` when the item is not in the catalogue.
pub fn matrix(ds: &Dataset, kind: ItemKind, item_id: &str) -> Option<Matrix> {
    let (title, subtitle, max_score) = match kind {
        ItemKind::Quiz => {
            let q = ds.module_quizzes().into_iter().find(|q| q.id == item_id)?;
            (
                format!("{} Quiz", q.module_name),
                "Best score across all attempts".to_string(),
                q.max_score,
            )
        }
        ItemKind::Assignment => {
            let a = ds.assignments().into_iter().find(|a| a.id == item_id)?;
            (a.name, a.module_name, a.max_score)
        }
        ItemKind::Project => {
            if ds.project.id != item_id {
                return None;
            }
            (
                ds.project.name.clone(),
                ds.course.name.clone(),
                ds.project.max_score,
            )
        }
    };

    let rows = ds
        .students
        .iter()
        .map(|s| {
            let rec = student_data(ds, &s.id, item_id, kind);
            let scored = rec.and_then(|r| r.scored());
            MatrixRow {
                student: student_card(s),
                attempted: scored.is_some(),
                score: scored.as_ref().map(|v| v.score),
                max_score,
                percentage: scored.as_ref().map(|v| v.percentage),
                band: matrix_band(scored.as_ref().map(|v| v.percentage)),
                date: scored.as_ref().map(|v| display_date(v.date)),
                attempts: rec
                    .and_then(|r| r.history())
                    .map(|h| h.attempts().to_vec())
                    .unwrap_or_default(),
            }
        })
        .collect::<Vec<_>>();

    Some(Matrix {
        kind,
        item_id: item_id.to_string(),
        title,
        subtitle,
        max_score,
        attempted_count: rows.iter().filter(|r| r.attempted).count(),
        not_attempted_count: not_attempted_count(ds, &ds.students, item_id, kind),
        rows,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub student: StudentCard,
    pub quizzes_attempted: usize,
    pub quiz_tries: usize,
    pub assignments_submitted: usize,
    pub project_submitted: bool,
    pub modules: Vec<ModuleSummary>,
}

pub fn student_profile(ds: &Dataset, student_id: &str) -> Option<StudentProfile> {
    let student = ds.student(student_id)?;
    let quizzes = ds
        .join_records(ItemKind::Quiz)
        .filter(|r| r.student_id() == student_id)
        .filter_map(|r| r.history())
        .collect::<Vec<_>>();
    let assignments_submitted = ds
        .join_records(ItemKind::Assignment)
        .filter(|r| r.student_id() == student_id && r.attempted())
        .count();
    let project_submitted = ds
        .project_submissions
        .iter()
        .any(|p| p.student_id == student_id && matches!(p.outcome, Submission::Submitted(_)));

    Some(StudentProfile {
        student: student_card(student),
        quizzes_attempted: quizzes.len(),
        quiz_tries: quizzes.iter().map(|h| h.attempts().len()).sum(),
        assignments_submitted,
        project_submitted,
        modules: ds.course.modules.iter().map(calc::module_summary).collect(),
    })
}
