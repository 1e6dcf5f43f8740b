use crate::bands::{classify, BandPolicy};
use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::helpers::{not_found, required_str, required_u32};
use crate::ipc::types::{AppState, Request};
use crate::model::{percent_of, Module, QuizAttempt};
use serde_json::json;

fn course_header(state: &AppState) -> serde_json::Value {
    json!({
        "id": state.dataset.course.id,
        "name": state.dataset.course.name,
    })
}

fn attempt_row(module: &Module, quiz: &QuizAttempt) -> serde_json::Value {
    let latest = calc::latest_attempt(module).map(|q| q.id);
    json!({
        "id": quiz.id,
        "attemptNumber": quiz.attempt_number,
        "title": quiz.title,
        "date": quiz.date,
        "totalScore": quiz.total_score,
        "maxScore": quiz.max_score,
        "duration": quiz.duration,
        "band": classify(BandPolicy::Module, percent_of(quiz.total_score, quiz.max_score)),
        "isLatest": latest == Some(quiz.id),
    })
}

fn handle_student_stats(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "course": course_header(state),
            "stats": calc::student_stats(&state.dataset.course),
        }),
    )
}

fn handle_course_modules(state: &mut AppState, req: &Request) -> serde_json::Value {
    let modules = state
        .dataset
        .course
        .modules
        .iter()
        .map(calc::module_summary)
        .collect::<Vec<_>>();
    ok(
        &req.id,
        json!({
            "course": course_header(state),
            "modules": modules,
        }),
    )
}

fn handle_module_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let module_id = match required_str(req, "moduleId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(module) = state.dataset.module(&module_id) else {
        return not_found(req, "module", &module_id);
    };

    let attempts = module
        .quizzes
        .iter()
        .map(|q| attempt_row(module, q))
        .collect::<Vec<_>>();
    let assignment = module.assignment.as_ref().map(|a| {
        json!({
            "id": a.id,
            "title": a.title,
            "submittedAt": a.submitted_at,
            "grade": a.grade,
            "maxGrade": a.max_grade,
            "band": classify(BandPolicy::Module, percent_of(a.grade, a.max_grade)),
        })
    });

    ok(
        &req.id,
        json!({
            "module": calc::module_summary(module),
            "attempts": attempts,
            "assignment": assignment,
        }),
    )
}

fn handle_quiz_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let module_id = match required_str(req, "moduleId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let quiz_id = match required_u32(req, "quizId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(module) = state.dataset.module(&module_id) else {
        return not_found(req, "module", &module_id);
    };
    let Some(quiz) = module.quizzes.iter().find(|q| q.id == quiz_id) else {
        return not_found(req, "quiz", &quiz_id.to_string());
    };

    let questions = quiz
        .questions
        .iter()
        .map(|q| {
            let options = q
                .options
                .iter()
                .map(|o| json!({ "text": o, "state": calc::option_state(q, o) }))
                .collect::<Vec<_>>();
            json!({
                "id": q.id,
                "questionText": q.question_text,
                "userAnswer": q.user_answer,
                "correctAnswer": q.correct_answer,
                "correct": calc::is_correct(q),
                "correctnessScore": q.correctness_score,
                "reasoningScore": q.reasoning_score,
                "total": q.total,
                "maxScore": q.max_score,
                "percent": calc::question_percent(q),
                "options": options,
            })
        })
        .collect::<Vec<_>>();

    ok(
        &req.id,
        json!({
            "moduleId": module.id,
            "moduleName": module.name,
            "attempt": attempt_row(module, quiz),
            "correctAnswers": calc::correct_answers(quiz),
            "questionCount": quiz.questions.len(),
            "avgReasoningScore": calc::avg_reasoning_percent(quiz),
            "performancePatterns": quiz.performance_patterns,
            "areasForImprovement": quiz.areas_for_improvement,
            "overallFeedback": quiz.overall_feedback,
            "questions": questions,
        }),
    )
}

fn handle_assignment_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let assignment_id = match required_str(req, "assignmentId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some((module, a)) = state.dataset.assignment(&assignment_id) else {
        return not_found(req, "assignment", &assignment_id);
    };
    let grade_percent = percent_of(a.grade, a.max_grade);

    ok(
        &req.id,
        json!({
            "moduleId": module.id,
            "moduleName": module.name,
            "assignment": a,
            "gradePercent": calc::round_half_up(grade_percent),
            "gradeBand": classify(BandPolicy::Roster, grade_percent),
            "cardBand": classify(BandPolicy::Module, grade_percent),
            "reasoningPercent": calc::round_half_up(percent_of(
                a.reasoning_score,
                a.max_reasoning_score,
            )),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "student.stats" => Some(handle_student_stats(state, req)),
        "course.modules" => Some(handle_course_modules(state, req)),
        "module.open" => Some(handle_module_open(state, req)),
        "quiz.open" => Some(handle_quiz_open(state, req)),
        "assignment.open" => Some(handle_assignment_open(state, req)),
        _ => None,
    }
}
