mod test_support;

use serde_json::json;
use test_support::{error_code, request, request_ok, spawn_sidecar};

#[test]
fn student_stats_round_half_up_over_the_fixture() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let result = request_ok(&mut stdin, &mut reader, "1", "student.stats", json!({}));
    let stats = &result["stats"];
    assert_eq!(result["course"]["name"].as_str(), Some("Generative AI"));
    assert_eq!(stats["totalQuizzes"].as_u64(), Some(9));
    assert_eq!(stats["avgQuizScore"].as_i64(), Some(82));
    assert_eq!(stats["totalAssignments"].as_u64(), Some(3));
    assert_eq!(stats["avgAssignmentScore"].as_i64(), Some(85));
    assert_eq!(stats["modulesCompleted"].as_u64(), Some(5));
    assert_eq!(stats["totalModules"].as_u64(), Some(6));
    assert_eq!(stats["completionRate"].as_i64(), Some(83));
}

#[test]
fn course_modules_separate_not_attempted_from_best() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let result = request_ok(&mut stdin, &mut reader, "1", "course.modules", json!({}));
    let modules = result["modules"].as_array().expect("modules");
    assert_eq!(modules.len(), 6);

    let m2 = &modules[1];
    assert_eq!(m2["id"].as_str(), Some("module-2"));
    assert_eq!(m2["best"]["status"].as_str(), Some("best"));
    assert_eq!(m2["best"]["score"].as_f64(), Some(91.0));
    assert_eq!(m2["best"]["attempts"].as_u64(), Some(3));
    assert_eq!(m2["bestBand"].as_str(), Some("success"));
    assert_eq!(m2["assignmentSubmitted"].as_bool(), Some(true));

    let m6 = &modules[5];
    assert_eq!(m6["best"]["status"].as_str(), Some("notAttempted"));
    assert!(m6.get("bestBand").is_none());
    assert!(m6.get("lastAttemptAt").is_none());
    assert_eq!(m6["attemptCount"].as_u64(), Some(0));
}

#[test]
fn module_open_flags_latest_attempt_and_assignment_band() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "module.open",
        json!({ "moduleId": "module-2" }),
    );
    let attempts = result["attempts"].as_array().expect("attempts");
    assert_eq!(attempts.len(), 3);
    assert_eq!(attempts[0]["band"].as_str(), Some("warning"));
    assert_eq!(attempts[1]["band"].as_str(), Some("primary"));
    assert_eq!(attempts[2]["isLatest"].as_bool(), Some(true));
    assert_eq!(attempts[2]["id"].as_u64(), Some(203));
    assert!(attempts[..2]
        .iter()
        .all(|a| a["isLatest"].as_bool() == Some(false)));

    assert_eq!(result["assignment"]["id"].as_str(), Some("assign-2"));
    assert_eq!(result["assignment"]["band"].as_str(), Some("success"));

    let plain = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "module.open",
        json!({ "moduleId": "module-1" }),
    );
    assert!(plain["assignment"].is_null());

    let missing = request(
        &mut stdin,
        &mut reader,
        "3",
        "module.open",
        json!({ "moduleId": "module-42" }),
    );
    assert_eq!(error_code(&missing), Some("not_found"));
    assert_eq!(missing["error"]["details"]["id"].as_str(), Some("module-42"));
}

#[test]
fn quiz_open_scores_questions_and_marks_options() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "quiz.open",
        json!({ "moduleId": "module-1", "quizId": 101 }),
    );
    assert_eq!(result["correctAnswers"].as_u64(), Some(3));
    assert_eq!(result["questionCount"].as_u64(), Some(5));
    assert_eq!(result["avgReasoningScore"].as_i64(), Some(64));
    assert_eq!(result["attempt"]["band"].as_str(), Some("primary"));
    assert_eq!(result["attempt"]["isLatest"].as_bool(), Some(false));

    let q2 = &result["questions"][1];
    assert_eq!(q2["correct"].as_bool(), Some(false));
    assert_eq!(q2["percent"].as_f64(), Some(30.0));
    let states = q2["options"]
        .as_array()
        .expect("options")
        .iter()
        .map(|o| o["state"].as_str().unwrap_or_default().to_string())
        .collect::<Vec<_>>();
    assert_eq!(states, vec!["wrongChoice", "neutral", "correct", "neutral"]);

    let q1 = &result["questions"][0];
    assert_eq!(q1["correct"].as_bool(), Some(true));
    assert!(q1["options"]
        .as_array()
        .expect("options")
        .iter()
        .all(|o| o["state"].as_str() != Some("wrongChoice")));

    // String ids are accepted too.
    let by_string = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "quiz.open",
        json!({ "moduleId": "module-1", "quizId": "102" }),
    );
    assert_eq!(by_string["attempt"]["isLatest"].as_bool(), Some(true));

    let wrong_module = request(
        &mut stdin,
        &mut reader,
        "3",
        "quiz.open",
        json!({ "moduleId": "module-2", "quizId": 101 }),
    );
    assert_eq!(error_code(&wrong_module), Some("not_found"));

    let bad = request(
        &mut stdin,
        &mut reader,
        "4",
        "quiz.open",
        json!({ "moduleId": "module-1" }),
    );
    assert_eq!(error_code(&bad), Some("bad_params"));
}

#[test]
fn assignment_open_uses_roster_and_module_bands() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "assignment.open",
        json!({ "assignmentId": "assign-3" }),
    );
    assert_eq!(result["moduleId"].as_str(), Some("module-3"));
    assert_eq!(
        result["assignment"]["title"].as_str(),
        Some("CNN Architecture Design")
    );
    assert_eq!(result["gradePercent"].as_i64(), Some(78));
    assert_eq!(result["gradeBand"].as_str(), Some("primary"));
    assert_eq!(result["cardBand"].as_str(), Some("primary"));
    assert_eq!(result["reasoningPercent"].as_i64(), Some(76));

    let missing = request(
        &mut stdin,
        &mut reader,
        "2",
        "assignment.open",
        json!({ "assignmentId": "assign-4" }),
    );
    assert_eq!(error_code(&missing), Some("not_found"));
}
