use crate::access::DenyReason;
use crate::errors::{LmsError, Result};
use crate::models::{enrollments::entities::EnrollmentRole, users::entities::GlobalRole};

/// 选课角色必须与用户的全局角色一致
pub fn check_role_matches(global: GlobalRole, requested: EnrollmentRole) -> Result<()> {
    if global == requested.required_global_role() {
        Ok(())
    } else {
        Err(LmsError::validation_with_reason(
            "role_mismatch",
            format!("A {global} account cannot be enrolled as {requested}"),
        ))
    }
}

/// 移除最后一名教师会让课程失去教师
pub fn check_removal(removed: EnrollmentRole, teacher_count: u64) -> Result<()> {
    if removed == EnrollmentRole::Teacher && teacher_count <= 1 {
        return Err(DenyReason::LastTeacher.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_cannot_be_enrolled_as_teacher() {
        let err = check_role_matches(GlobalRole::Student, EnrollmentRole::Teacher).unwrap_err();
        assert_eq!(err.reason(), "role_mismatch");
        assert!(check_role_matches(GlobalRole::Manager, EnrollmentRole::Student).is_err());
        assert!(check_role_matches(GlobalRole::Teacher, EnrollmentRole::Teacher).is_ok());
        assert!(check_role_matches(GlobalRole::Student, EnrollmentRole::Student).is_ok());
    }

    #[test]
    fn last_teacher_is_protected() {
        assert_eq!(
            check_removal(EnrollmentRole::Teacher, 1)
                .unwrap_err()
                .reason(),
            "last_teacher"
        );
        assert!(check_removal(EnrollmentRole::Teacher, 2).is_ok());
        assert!(check_removal(EnrollmentRole::Student, 0).is_ok());
    }
}
