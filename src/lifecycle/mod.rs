//! 生命周期规则（纯函数，`now` 由调用方注入）
//!
//! - `deadline`：截止时间的唯一判定来源
//! - `submission`：提交的创建 / 修改 / 评分 / 删除状态机
//! - `publish`：课程与作业的发布开关、作业的截止与满分校验
//! - `enrollment`：选课角色匹配与最后一名教师保护

pub mod deadline;
pub mod enrollment;
pub mod publish;
pub mod submission;
