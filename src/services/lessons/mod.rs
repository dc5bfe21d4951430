//! 课时：挂在单元下，按 order 排序；内容为文本、视频链接或附件至少其一

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

pub use create::create_lesson;
pub use delete::delete_lesson;
pub use get::get_lesson;
pub use list::list_lessons;
pub use update::{set_lesson_active, update_lesson};

use crate::errors::{LmsError, Result};
use crate::utils::validate::{check, validate_video_link};

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// 课时至少携带文本、视频链接或文件之一
pub(crate) fn require_content(
    text_content: Option<&str>,
    video_link: Option<&str>,
    file_count: usize,
) -> Result<()> {
    if has_text(text_content) || has_text(video_link) || file_count > 0 {
        return Ok(());
    }
    Err(LmsError::validation_with_reason(
        "missing_content",
        "A lesson needs text content, a video link or at least one file",
    ))
}

pub(crate) fn check_video_link(video_link: Option<&str>) -> Result<()> {
    match video_link {
        Some(link) if !link.trim().is_empty() => {
            check("invalid_video_link", validate_video_link(link))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_requires_any_source() {
        assert_eq!(
            require_content(None, Some("  "), 0).unwrap_err().reason(),
            "missing_content"
        );
        assert!(require_content(Some("Read chapter 1"), None, 0).is_ok());
        assert!(require_content(None, Some("https://v.example.com/1"), 0).is_ok());
        assert!(require_content(None, None, 1).is_ok());
    }

    #[test]
    fn video_link_checked_only_when_present() {
        assert!(check_video_link(None).is_ok());
        assert!(check_video_link(Some("")).is_ok());
        assert_eq!(
            check_video_link(Some("not a link")).unwrap_err().reason(),
            "invalid_video_link"
        );
    }
}
