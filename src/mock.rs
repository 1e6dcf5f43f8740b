//! Built-in fixture standing in for the course database.

use crate::dataset::Dataset;
use crate::model::{
    Assignment, Course, CourseProject, ImprovementArea, Module, Question, QuizAttempt,
    QuizHistory, QuizOutcome, QuizTry, Scored, Student, StudentAssignmentAttempt,
    StudentProjectSubmission, StudentQuizAttempt, Submission,
};
use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};

const QUIZ_MAX: f64 = 100.0;
const PROJECT_ID: &str = "project-1";

/// Per-question (correctness, reasoning) sub-scores, cycled across attempts.
const QUESTION_PATTERNS: [[(f64, f64); 5]; 3] = [
    [(5.0, 5.0), (5.0, 4.0), (0.0, 2.0), (5.0, 5.0), (5.0, 4.0)],
    [(5.0, 4.0), (5.0, 5.0), (2.0, 1.0), (5.0, 4.0), (5.0, 5.0)],
    [(5.0, 5.0), (1.0, 2.0), (5.0, 4.0), (5.0, 5.0), (2.0, 0.0)],
];

/// (module number, module name, quiz scores, assignment override)
type ModuleRow = (u32, &'static str, &'static [f64], Option<(&'static str, f64, f64)>);

const MODULES: &[ModuleRow] = &[
    (1, "Module 1: Introduction to AI", &[72.0, 84.0], None),
    (
        2,
        "Module 2: Deep Learning Foundations",
        &[68.0, 79.0, 91.0],
        Some(("Deep Learning Implementation Project", 85.0, 42.0)),
    ),
    (
        3,
        "Module 3: Neural Network Architectures",
        &[88.0],
        Some(("CNN Architecture Design", 78.0, 38.0)),
    ),
    (4, "Module 4: Transformers & Attention", &[75.0, 86.0], None),
    (
        5,
        "Module 5: Generative Models",
        &[93.0],
        Some(("GAN Implementation", 92.0, 46.0)),
    ),
    (6, "Module 6: Large Language Models", &[], None),
];

/// (student, quiz/module, tries as (score, day of December 2024))
const QUIZ_TRIES: &[(&str, &str, &[(f64, u32)])] = &[
    ("student-1", "module-1", &[(70.0, 12), (85.0, 15)]),
    ("student-2", "module-1", &[(70.0, 16)]),
    ("student-3", "module-1", &[(80.0, 10), (88.0, 12), (92.0, 14)]),
    ("student-4", "module-1", &[]),
    ("student-5", "module-1", &[(78.0, 17)]),
    ("student-1", "module-2", &[(75.0, 16), (88.0, 18)]),
    ("student-2", "module-2", &[]),
    ("student-3", "module-2", &[(90.0, 15), (95.0, 17)]),
    ("student-4", "module-2", &[(55.0, 18), (62.0, 20)]),
    ("student-5", "module-2", &[(80.0, 19)]),
    ("student-1", "module-3", &[(82.0, 20)]),
    ("student-2", "module-3", &[(68.0, 21), (75.0, 22)]),
    ("student-3", "module-3", &[(91.0, 19)]),
    ("student-4", "module-3", &[]),
    ("student-5", "module-3", &[]),
    ("student-1", "module-4", &[(79.0, 23)]),
    ("student-2", "module-4", &[]),
    ("student-3", "module-4", &[(87.0, 22), (93.0, 24)]),
    ("student-4", "module-4", &[]),
    ("student-5", "module-4", &[(71.0, 23)]),
    ("student-1", "module-5", &[(90.0, 26)]),
    ("student-2", "module-5", &[]),
    ("student-3", "module-5", &[(94.0, 25)]),
    ("student-4", "module-5", &[]),
    ("student-5", "module-5", &[]),
];

/// (student, assignment, module, submission as (score, day of December 2024))
const ASSIGNMENT_SUBMISSIONS: &[(&str, &str, &str, Option<(f64, u32)>)] = &[
    ("student-1", "assign-2", "module-2", Some((85.0, 20))),
    ("student-2", "assign-2", "module-2", Some((72.0, 21))),
    ("student-3", "assign-2", "module-2", Some((94.0, 19))),
    ("student-4", "assign-2", "module-2", None),
    ("student-5", "assign-2", "module-2", Some((80.0, 22))),
    ("student-1", "assign-3", "module-3", Some((78.0, 22))),
    ("student-2", "assign-3", "module-3", None),
    ("student-3", "assign-3", "module-3", Some((90.0, 21))),
    ("student-4", "assign-3", "module-3", Some((65.0, 24))),
    ("student-5", "assign-3", "module-3", None),
    ("student-1", "assign-5", "module-5", Some((92.0, 23))),
    ("student-2", "assign-5", "module-5", None),
    ("student-3", "assign-5", "module-5", Some((96.0, 22))),
    ("student-4", "assign-5", "module-5", None),
    ("student-5", "assign-5", "module-5", Some((88.0, 24))),
];

const PROJECT_SUBMISSIONS: &[(&str, Option<(f64, u32)>)] = &[
    ("student-1", Some((90.0, 24))),
    ("student-2", Some((78.0, 24))),
    ("student-3", Some((95.0, 23))),
    ("student-4", None),
    ("student-5", None),
];

pub fn dataset() -> anyhow::Result<Dataset> {
    let modules = MODULES
        .iter()
        .map(|&(n, name, scores, assignment)| -> anyhow::Result<Module> {
            Ok(Module {
                id: format!("module-{}", n),
                name: name.to_string(),
                quizzes: quiz_series(n, scores)?,
                has_assignment: assignment.is_some(),
                assignment: match assignment {
                    Some((title, grade, reasoning)) => Some(Assignment {
                        id: format!("assign-{}", n),
                        title: title.to_string(),
                        grade,
                        reasoning_score: reasoning,
                        ..sample_assignment()?
                    }),
                    None => None,
                },
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let quiz_attempts = QUIZ_TRIES
        .iter()
        .map(|&(student, quiz, tries)| -> anyhow::Result<StudentQuizAttempt> {
            let tries = tries
                .iter()
                .enumerate()
                .map(|(i, &(score, d))| -> anyhow::Result<QuizTry> {
                    Ok(QuizTry::new(i as u32 + 1, score, QUIZ_MAX, dec(d)?))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok(StudentQuizAttempt {
                student_id: student.to_string(),
                quiz_id: quiz.to_string(),
                module_id: quiz.to_string(),
                outcome: match QuizHistory::new(tries) {
                    Some(h) => QuizOutcome::Attempted(h),
                    None => QuizOutcome::NotAttempted,
                },
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let assignment_attempts = ASSIGNMENT_SUBMISSIONS
        .iter()
        .map(|&(student, assignment, module, sub)| -> anyhow::Result<StudentAssignmentAttempt> {
            Ok(StudentAssignmentAttempt {
                student_id: student.to_string(),
                assignment_id: assignment.to_string(),
                module_id: module.to_string(),
                outcome: submission(sub)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let project_submissions = PROJECT_SUBMISSIONS
        .iter()
        .map(|&(student, sub)| -> anyhow::Result<StudentProjectSubmission> {
            Ok(StudentProjectSubmission {
                student_id: student.to_string(),
                project_id: PROJECT_ID.to_string(),
                outcome: submission(sub)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Dataset {
        course: Course {
            id: "course-1".to_string(),
            name: "Generative AI".to_string(),
            modules,
        },
        students: students(),
        project: CourseProject {
            id: PROJECT_ID.to_string(),
            name: "Final Capstone Project: Build a Generative AI Application".to_string(),
            max_score: 100.0,
        },
        quiz_attempts,
        assignment_attempts,
        project_submissions,
    })
}

fn submission(sub: Option<(f64, u32)>) -> anyhow::Result<Submission> {
    Ok(match sub {
        Some((score, d)) => Submission::Submitted(Scored::new(score, 100.0, dec(d)?)),
        None => Submission::NotSubmitted,
    })
}

fn dec(day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 12, day).ok_or_else(|| anyhow!("invalid fixture day {}", day))
}

fn at(month: u32, day: u32, hour: u32, minute: u32) -> anyhow::Result<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(2025, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .map(|n| n.and_utc())
        .ok_or_else(|| anyhow!("invalid fixture timestamp 2025-{}-{} {}:{}", month, day, hour, minute))
}

fn quiz_series(module_number: u32, scores: &[f64]) -> anyhow::Result<Vec<QuizAttempt>> {
    let bank = sample_questions();
    scores
        .iter()
        .enumerate()
        .map(|(idx, &score)| -> anyhow::Result<QuizAttempt> {
            let i = idx as u32 + 1;
            let pattern = &QUESTION_PATTERNS[((module_number + i) % 3) as usize];
            let questions = bank
                .iter()
                .zip(pattern.iter())
                .map(|(q, &(correctness, reasoning))| Question {
                    user_answer: if correctness >= 5.0 {
                        q.correct_answer.clone()
                    } else {
                        wrong_choice(&q.correct_answer)
                    },
                    correctness_score: correctness,
                    reasoning_score: reasoning,
                    total: correctness + reasoning,
                    ..q.clone()
                })
                .collect();
            Ok(QuizAttempt {
                id: module_number * 100 + i,
                attempt_number: i,
                title: format!("Module {} Quiz - Attempt {}", module_number, i),
                date: at(9, 10 + i, 11, 30 + i * 5)?,
                total_score: score.min(QUIZ_MAX),
                max_score: QUIZ_MAX,
                questions,
                performance_patterns: vec![
                    "Strong understanding of core concepts".to_string(),
                    if i > 1 {
                        "Improvement in problem-solving approach".to_string()
                    } else {
                        "Initial assessment completed".to_string()
                    },
                    if score > 80.0 {
                        "Excellent grasp of material".to_string()
                    } else {
                        "Room for improvement identified".to_string()
                    },
                ],
                areas_for_improvement: vec![
                    ImprovementArea {
                        title: "Gradient Concepts".to_string(),
                        description: "Review backpropagation and gradient flow".to_string(),
                    },
                    ImprovementArea {
                        title: "Optimization Techniques".to_string(),
                        description: "Study different optimizer behaviors".to_string(),
                    },
                ],
                overall_feedback: if score > 80.0 {
                    "Excellent performance! You've demonstrated a strong understanding of the core concepts.".to_string()
                } else {
                    "Good effort! Focus on reviewing the highlighted areas to improve your understanding.".to_string()
                },
                duration: format!("{} min", 8 + (module_number * 3 + i) % 7),
            })
        })
        .collect()
}

fn wrong_choice(correct: &str) -> String {
    if correct == "A" { "B" } else { "A" }.to_string()
}

fn question(id: u32, text: &str, options: [&str; 4], correct: &str) -> Question {
    Question {
        id,
        question_text: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        user_answer: correct.to_string(),
        correct_answer: correct.to_string(),
        correctness_score: 5.0,
        reasoning_score: 5.0,
        total: 10.0,
        max_score: 10.0,
    }
}

fn sample_questions() -> Vec<Question> {
    vec![
        question(
            1,
            "What is the primary function of a neural network's activation function?",
            [
                "A. To add linearity to the model",
                "B. To introduce non-linearity allowing complex pattern learning",
                "C. To reduce the number of parameters",
                "D. To speed up training",
            ],
            "B",
        ),
        question(
            2,
            "Which optimizer is known for adaptive learning rates?",
            ["A. SGD", "B. Momentum", "C. Adam", "D. Batch Gradient Descent"],
            "C",
        ),
        question(
            3,
            "What is the vanishing gradient problem?",
            [
                "A. When gradients become too large",
                "B. When gradients become extremely small during backpropagation",
                "C. When the model overfits",
                "D. When the learning rate is too high",
            ],
            "B",
        ),
        question(
            4,
            "What does 'epoch' mean in machine learning?",
            [
                "A. One pass through the entire training dataset",
                "B. One gradient update",
                "C. One batch of data",
                "D. One neuron activation",
            ],
            "A",
        ),
        question(
            5,
            "Which technique helps prevent overfitting?",
            [
                "A. Increasing model complexity",
                "B. Dropout regularization",
                "C. Removing validation data",
                "D. Using larger batches only",
            ],
            "B",
        ),
    ]
}

fn sample_assignment() -> anyhow::Result<Assignment> {
    Ok(Assignment {
        id: "assign-1".to_string(),
        title: "Deep Learning Implementation Project".to_string(),
        submitted_at: at(9, 15, 14, 30)?,
        grade: 85.0,
        max_grade: 100.0,
        reasoning_score: 42.0,
        max_reasoning_score: 50.0,
        feedback: "Excellent implementation of the neural network architecture. Your code is well-structured and the documentation is comprehensive. Consider optimizing the training loop for better performance.".to_string(),
        question_text: "Implement a multi-layer perceptron (MLP) from scratch using only NumPy. Your implementation should include forward propagation, backpropagation, and gradient descent optimization. Train your model on the provided dataset and analyze the results.".to_string(),
        user_answer: "Submitted: neural_network.py, report.pdf (2 files)".to_string(),
    })
}

fn students() -> Vec<Student> {
    let rows: [(&str, &str, &str, &[&str], f64, f64); 5] = [
        ("student-1", "Alice Johnson", "alice.johnson@university.edu", &["Generative AI", "Machine Learning Basics"], 85.0, 88.0),
        ("student-2", "Bob Smith", "bob.smith@university.edu", &["Generative AI"], 72.0, 76.0),
        ("student-3", "Carol Davis", "carol.davis@university.edu", &["Generative AI", "Data Science"], 95.0, 94.0),
        ("student-4", "David Brown", "david.brown@university.edu", &["Generative AI"], 60.0, 65.0),
        ("student-5", "Eva Martinez", "eva.martinez@university.edu", &["Generative AI", "Deep Learning Advanced"], 78.0, 82.0),
    ];
    rows.iter()
        .map(|&(id, name, email, courses, progress, avg)| Student {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            enrolled_courses: courses.iter().map(|c| c.to_string()).collect(),
            overall_progress: progress,
            average_score: avg,
        })
        .collect()
}
