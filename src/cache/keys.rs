//! 缓存键
//!
//! - 列表：`{kind}:list:{scope}:{role}:{page}:{size}`
//! - 汇总：`{kind}:list:{scope}:{role}`
//! - 按 id 的前缀 `{kind}:{id}:` 在写操作后一并删除
//! - 令牌解析结果：`actor:{token}`
//!
//! 前缀以 `:` 结尾，避免 `course:1:` 误删 `course:12:`。

use crate::access::EntityKind;
use crate::models::users::entities::GlobalRole;

pub fn list_key(kind: EntityKind, scope: &str, role: GlobalRole, page: u64, size: u64) -> String {
    format!(
        "{}:list:{}:{}:{}:{}",
        kind.as_str(),
        scope,
        role.as_str(),
        page,
        size
    )
}

/// 不分页的汇总结果，与列表共用失效前缀
pub fn aggregate_key(kind: EntityKind, scope: &str, role: GlobalRole) -> String {
    format!("{}:list:{}:{}", kind.as_str(), scope, role.as_str())
}

pub fn entity_prefix(kind: EntityKind, id: i64) -> String {
    format!("{}:{}:", kind.as_str(), id)
}

pub fn list_prefix(kind: EntityKind) -> String {
    format!("{}:list:", kind.as_str())
}

/// 已验证令牌对应的请求方，停用用户时整体清除
pub const ACTOR_PREFIX: &str = "actor:";

pub fn actor_key(token: &str) -> String {
    format!("{ACTOR_PREFIX}{token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_fall_under_their_prefixes() {
        let list = list_key(EntityKind::Lesson, "module:3", GlobalRole::Teacher, 1, 10);
        assert_eq!(list, "lesson:list:module:3:teacher:1:10");
        assert!(list.starts_with(&list_prefix(EntityKind::Lesson)));
        assert!(!list.starts_with(&list_prefix(EntityKind::Module)));

        let summary = aggregate_key(EntityKind::Submission, "assignment:7:summary", GlobalRole::Admin);
        assert_eq!(summary, "submission:list:assignment:7:summary:admin");
        assert!(summary.starts_with(&list_prefix(EntityKind::Submission)));
    }

    #[test]
    fn entity_prefix_does_not_match_longer_ids() {
        let prefix = entity_prefix(EntityKind::Course, 1);
        assert_eq!(prefix, "course:1:");
        assert!("course:1:student".starts_with(&prefix));
        assert!(!"course:12:student".starts_with(&prefix));
        // 列表键不会被按 id 前缀误删
        assert!(!list_prefix(EntityKind::Course).starts_with(&prefix));
    }
}
