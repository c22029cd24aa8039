//! Test fixtures for Canvas API responses
//!
//! Realistic sample payloads from the Canvas REST API for use in tests.

use serde_json::json;

// Wiki pages of a small course, as returned by `GET /courses/:id/pages/:url`
pub fn sample_pages() -> serde_json::Value {
  json!([
    {
      "title": "Intro",
      "url": "intro",
      "page_id": 101,
      "published": true,
      "body": "<p>Welcome to <strong>Biology 101</strong>.</p>"
    },
    {
      "title": "Syllabus",
      "url": "syllabus",
      "page_id": 102,
      "published": true,
      "body": "<h2>Grading</h2><ul><li>Labs: 40%</li><li>Exams: 60%</li></ul>"
    },
    {
      "title": "Lab Safety",
      "url": "lab-safety",
      "page_id": 103,
      "published": false,
      "body": null
    }
  ])
}

// Assignment groups of the course
pub fn sample_assignment_groups() -> serde_json::Value {
  json!([
    { "id": 1, "name": "Homework", "position": 1, "group_weight": 40.0 },
    { "id": 2, "name": "Quizzes", "position": 2, "group_weight": 60.0 }
  ])
}

// Assignments of the "Quizzes" group, in their current order
pub fn sample_quiz_assignments() -> serde_json::Value {
  json!([
    {
      "id": 11,
      "name": "banana",
      "position": 1,
      "points_possible": 10.0,
      "due_at": "2025-02-01T23:59:00Z",
      "submission_types": ["online_quiz"],
      "grading_type": "points",
      "published": true,
      "description": "<p>Quiz on fruit anatomy.</p>"
    },
    {
      "id": 12,
      "name": "Apple",
      "position": 2,
      "points_possible": 10.0,
      "due_at": null,
      "submission_types": ["online_quiz"],
      "grading_type": "points",
      "published": true,
      "description": null
    },
    {
      "id": 13,
      "name": "cherry",
      "position": 3,
      "points_possible": 5.0,
      "submission_types": ["online_upload"],
      "grading_type": "pass_fail",
      "published": false
    }
  ])
}
