//! 选课存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::courses::Entity as Courses;
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments, Model};
use crate::entity::users::{Entity as Users, Model as UserModel};
use crate::errors::Result;
use crate::lifecycle::enrollment::check_removal;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    enrollments::{
        entities::{Enrollment, EnrollmentRole},
        requests::EnrollmentListParams,
        responses::{MyEnrollment, Participant},
    },
    users::entities::UserBrief,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

// 选课记录与用户拼成参与者，用户缺失的记录丢弃
fn into_participant((enrollment, user): (Model, Option<UserModel>)) -> Option<Participant> {
    let user = user?.into_user();
    let enrollment = enrollment.into_enrollment();
    Some(Participant {
        enrollment_id: enrollment.id,
        role: enrollment.role,
        user: UserBrief::from(&user),
        enrolled_at: enrollment.enrolled_at,
    })
}

impl SeaOrmStorage {
    /// 选课，(user, course) 重复时由唯一索引返回 Conflict
    pub async fn enroll_impl(
        &self,
        user_id: i64,
        course_id: i64,
        role: EnrollmentRole,
        enrolled_by: i64,
    ) -> Result<Enrollment> {
        let model = ActiveModel {
            user_id: Set(user_id),
            course_id: Set(course_id),
            role: Set(role.to_string()),
            enrolled_by: Set(enrolled_by),
            enrolled_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_err("选课失败"))?;

        Ok(result.into_enrollment())
    }

    /// 获取用户在课程中的选课记录
    pub async fn get_enrollment_impl(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(
                Condition::all()
                    .add(Column::UserId.eq(user_id))
                    .add(Column::CourseId.eq(course_id)),
            )
            .one(&self.db)
            .await
            .map_err(db_err("查询选课记录失败"))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 分页列出课程参与者
    pub async fn list_enrollments_with_pagination_impl(
        &self,
        course_id: i64,
        params: EnrollmentListParams,
    ) -> Result<PaginatedResponse<Participant>> {
        let (page, size) = params.pagination.normalized();

        let mut select = Enrollments::find().filter(Column::CourseId.eq(course_id));
        if let Some(role) = params.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        let paginator = select
            .order_by_asc(Column::Role)
            .order_by_asc(Column::EnrolledAt)
            .find_also_related(Users)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询选课总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_err("查询选课页数失败"))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询选课列表失败"))?;

        Ok(PaginatedResponse {
            items: rows.into_iter().filter_map(into_participant).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 课程全部参与者
    pub async fn list_participants_impl(&self, course_id: i64) -> Result<Vec<Participant>> {
        let rows = Enrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::EnrolledAt)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(db_err("查询课程参与者失败"))?;

        Ok(rows.into_iter().filter_map(into_participant).collect())
    }

    /// 用户的选课及对应课程
    pub async fn list_user_enrollments_impl(&self, user_id: i64) -> Result<Vec<MyEnrollment>> {
        let rows = Enrollments::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::EnrolledAt)
            .find_also_related(Courses)
            .all(&self.db)
            .await
            .map_err(db_err("查询用户选课失败"))?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, course)| {
                Some(MyEnrollment {
                    course: course?.into_course(),
                    enrollment: enrollment.into_enrollment(),
                })
            })
            .collect())
    }

    /// 退课
    ///
    /// 先对课程的教师选课行加排他锁再计数：并发移除两名教师时，后到的事务等待
    /// 前者提交，重新读取后只能看到剩下的一名教师。SQLite 没有行锁，
    /// 写事务本身串行执行。
    pub async fn remove_enrollment_impl(&self, user_id: i64, course_id: i64) -> Result<bool> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let teachers = Enrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Role.eq(EnrollmentRole::Teacher.to_string()))
            .lock_exclusive()
            .all(&txn)
            .await
            .map_err(db_err("锁定课程教师失败"))?;

        let Some(existing) = Enrollments::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::CourseId.eq(course_id))
            .one(&txn)
            .await
            .map_err(db_err("查询选课记录失败"))?
        else {
            return Ok(false);
        };

        check_removal(existing.into_enrollment().role, teachers.len() as u64)?;

        Enrollments::delete_many()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::CourseId.eq(course_id))
            .exec(&txn)
            .await
            .map_err(db_err("退课失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(true)
    }
}
