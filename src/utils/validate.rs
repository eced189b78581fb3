use once_cell::sync::Lazy;
use regex::Regex;

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S(.*\S)?$").expect("Invalid name regex"));

/// 课题/小组名称校验
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    // 名称长度校验：1 <= x <= 128
    if name.is_empty() || name.chars().count() > 128 {
        return Err("Name length must be between 1 and 128 characters");
    }
    // 名称不能以空白开头或结尾
    if !NAME_RE.is_match(name) {
        return Err("Name must not start or end with whitespace");
    }
    Ok(())
}

/// 评语长度校验
pub fn validate_feedback_summary(text: &str) -> Result<(), &'static str> {
    if text.chars().count() > 2000 {
        return Err("Feedback summary must not exceed 2000 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_name() {
        assert!(validate_name("嵌入式系统综合实践").is_ok());
        assert!(validate_name("Project Alpha").is_ok());
        assert!(validate_name("a").is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(validate_name("").is_err());
    }

    #[test]
    fn test_surrounding_whitespace_rejected() {
        assert!(validate_name(" padded").is_err());
        assert!(validate_name("padded ").is_err());
    }

    #[test]
    fn test_overlong_name_rejected() {
        let name = "x".repeat(129);
        assert!(validate_name(&name).is_err());
    }

    #[test]
    fn test_feedback_summary_limit() {
        assert!(validate_feedback_summary(&"好".repeat(2000)).is_ok());
        assert!(validate_feedback_summary(&"好".repeat(2001)).is_err());
    }
}
