use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{LmsError, Result};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

// 院系代码与课程代码：字母数字开头，可含 - 与 _
static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{1,31}$").expect("Invalid code regex"));

pub fn validate_username(username: &str) -> std::result::Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> std::result::Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_code(code: &str) -> std::result::Result<(), &'static str> {
    if !CODE_RE.is_match(code) {
        return Err("Code must be 2-32 letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_video_link(link: &str) -> std::result::Result<(), &'static str> {
    let link = link.trim();
    if !(link.starts_with("http://") || link.starts_with("https://")) || link.contains(' ') {
        return Err("Video link must be an http(s) URL");
    }
    Ok(())
}

/// 必填文本字段：去除首尾空白后不能为空
pub fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LmsError::validation_with_reason(
            "missing_field",
            format!("{field} is required"),
        ));
    }
    Ok(())
}

/// 把 `&'static str` 形式的校验结果转成带原因码的 Validation 错误
pub fn check(reason: &'static str, result: std::result::Result<(), &'static str>) -> Result<()> {
    result.map_err(|msg| LmsError::validation_with_reason(reason, msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("way_too_long_username").is_err());
        assert!(validate_username("bad name").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice@example").is_err());
        assert!(validate_email("alice.example.com").is_err());
    }

    #[test]
    fn test_code_rules() {
        assert!(validate_code("CS101").is_ok());
        assert!(validate_code("math-2").is_ok());
        assert!(validate_code("-CS").is_err());
        assert!(validate_code("C").is_err());
        assert!(validate_code("CS 101").is_err());
    }

    #[test]
    fn test_video_link() {
        assert!(validate_video_link("https://videos.example.com/v/1").is_ok());
        assert!(validate_video_link("ftp://videos.example.com/v/1").is_err());
        assert!(validate_video_link("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_check_attaches_reason() {
        let err = check("invalid_email", validate_email("nope")).unwrap_err();
        assert_eq!(err.reason(), "invalid_email");
        assert!(require_text("title", "  ").is_err());
        assert!(require_text("title", "Intro").is_ok());
    }
}
