//! 作业与课程的统计汇总
//!
//! `submission_status` 从选课一侧出发做外连接，没有提交的学生同样会出现在结果中。

use std::collections::HashMap;

use crate::models::{
    enrollments::{
        entities::EnrollmentRole,
        responses::{EnrollmentSummary, Participant, ParticipantGroups},
    },
    submissions::{
        entities::{Submission, SubmissionStatus},
        responses::{AssignmentSummary, SubmissionStatusRow},
    },
};

pub const NOT_SUBMITTED: &str = "not_submitted";

/// 按状态统计未删除的提交，pending = total - graded
pub fn assignment_summary(submissions: &[Submission]) -> AssignmentSummary {
    let mut summary = AssignmentSummary::default();
    for submission in submissions {
        match submission.status {
            SubmissionStatus::Deleted => continue,
            SubmissionStatus::Submitted => summary.submitted += 1,
            SubmissionStatus::Late => summary.late += 1,
            SubmissionStatus::Graded => summary.graded += 1,
        }
        summary.total += 1;
    }
    summary.pending = summary.total - summary.graded;
    summary
}

/// 每个学生身份的选课记录对应一行
pub fn submission_status(
    participants: &[Participant],
    submissions: &[Submission],
) -> Vec<SubmissionStatusRow> {
    let by_student: HashMap<i64, &Submission> = submissions
        .iter()
        .filter(|s| s.status != SubmissionStatus::Deleted)
        .map(|s| (s.student_id, s))
        .collect();

    participants
        .iter()
        .filter(|p| p.role == EnrollmentRole::Student)
        .map(|p| match by_student.get(&p.user.id) {
            Some(s) => SubmissionStatusRow {
                student: p.user.clone(),
                status: s.status.to_string(),
                submission_id: Some(s.id),
                submitted_at: Some(s.submitted_at),
                is_late: s.is_late,
                grade: s.grade,
            },
            None => SubmissionStatusRow {
                student: p.user.clone(),
                status: NOT_SUBMITTED.to_string(),
                submission_id: None,
                submitted_at: None,
                is_late: false,
                grade: None,
            },
        })
        .collect()
}

/// 参与者按课程角色分组
pub fn group_participants(participants: Vec<Participant>) -> ParticipantGroups {
    let (teachers, students) = participants
        .into_iter()
        .partition(|p| p.role == EnrollmentRole::Teacher);
    ParticipantGroups { teachers, students }
}

pub fn enrollment_summary(course_id: i64, participants: &[Participant]) -> EnrollmentSummary {
    let teachers = participants
        .iter()
        .filter(|p| p.role == EnrollmentRole::Teacher)
        .count() as i64;
    let total = participants.len() as i64;
    EnrollmentSummary {
        course_id,
        teachers,
        students: total - teachers,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserBrief;
    use chrono::Utc;

    fn participant(user_id: i64, role: EnrollmentRole) -> Participant {
        Participant {
            enrollment_id: user_id * 10,
            role,
            user: UserBrief {
                id: user_id,
                username: format!("user{user_id}"),
                display_name: None,
                email: format!("user{user_id}@example.com"),
            },
            enrolled_at: Utc::now(),
        }
    }

    fn submission(id: i64, student_id: i64, status: SubmissionStatus) -> Submission {
        Submission {
            id,
            assignment_id: 1,
            student_id,
            text_answer: Some("answer".into()),
            files: vec![],
            status,
            is_late: status == SubmissionStatus::Late,
            grade: (status == SubmissionStatus::Graded).then_some(90.0),
            feedback: None,
            graded_by: None,
            graded_at: None,
            submitted_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn summary_partitions_live_submissions() {
        let subs = vec![
            submission(1, 11, SubmissionStatus::Submitted),
            submission(2, 12, SubmissionStatus::Late),
            submission(3, 13, SubmissionStatus::Graded),
            submission(4, 14, SubmissionStatus::Deleted),
        ];
        assert_eq!(
            assignment_summary(&subs),
            AssignmentSummary {
                total: 3,
                submitted: 1,
                late: 1,
                graded: 1,
                pending: 2,
            }
        );
        assert_eq!(assignment_summary(&[]), AssignmentSummary::default());
    }

    #[test]
    fn status_enumerates_from_enrollments() {
        let participants = vec![
            participant(11, EnrollmentRole::Student),
            participant(12, EnrollmentRole::Student),
            participant(13, EnrollmentRole::Student),
            participant(99, EnrollmentRole::Teacher),
        ];
        let subs = vec![submission(1, 12, SubmissionStatus::Graded)];

        let rows = submission_status(&participants, &subs);
        assert_eq!(rows.len(), 3);
        let missing: Vec<_> = rows.iter().filter(|r| r.status == NOT_SUBMITTED).collect();
        assert_eq!(missing.len(), 2);
        assert!(missing.iter().all(|r| r.grade.is_none()));

        let graded = rows.iter().find(|r| r.student.id == 12).unwrap();
        assert_eq!(graded.status, "graded");
        assert_eq!(graded.grade, Some(90.0));
    }

    #[test]
    fn deleted_submission_counts_as_not_submitted() {
        let participants = vec![participant(11, EnrollmentRole::Student)];
        let subs = vec![submission(1, 11, SubmissionStatus::Deleted)];
        let rows = submission_status(&participants, &subs);
        assert_eq!(rows[0].status, NOT_SUBMITTED);
    }

    #[test]
    fn summary_counts_roles() {
        let participants = vec![
            participant(1, EnrollmentRole::Teacher),
            participant(2, EnrollmentRole::Student),
            participant(3, EnrollmentRole::Student),
        ];
        let summary = enrollment_summary(5, &participants);
        assert_eq!((summary.teachers, summary.students, summary.total), (1, 2, 3));

        let groups = group_participants(participants);
        assert_eq!(groups.teachers.len(), 1);
        assert_eq!(groups.students.len(), 2);
    }
}
