//! HTTP Handlers
//!
//! 每个 handler 接收 `(Arc<AppState>, RequestContext)`:
//! 位置参数来自路由占位符, 请求体为原始字节。
//! 校验失败在 handler 边界立即返回, 不再向下传播。

pub mod auth;
pub mod user;

use crate::infrastructure::http::error::ApiError;

/// 解析路径中的用户 id; 非数字 → 400
pub(crate) fn parse_user_id(param: Option<&String>) -> Result<i64, ApiError> {
    param
        .and_then(|p| p.parse::<i64>().ok())
        .ok_or_else(|| ApiError::BadRequest("ID de usuario inválido.".to_string()))
}

/// 最小可用的邮箱格式校验: 单个 `@`, 两侧非空, 域名含 `.` 且无空白
pub(crate) fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.split('.').count() >= 2 && domain.split('.').all(|p| !p.is_empty())
}

/// 取非空字符串字段, 缺失或为空返回 None
pub(crate) fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id(Some(&"42".to_string())).unwrap(), 42);
        assert!(parse_user_id(Some(&"abc".to_string())).is_err());
        assert!(parse_user_id(Some(&"1.5".to_string())).is_err());
        assert!(parse_user_id(None).is_err());
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.com"));
        assert!(!is_valid_email("sin-arroba"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana@exam ple.com"));
        assert!(!is_valid_email("ana@example..com"));
        assert!(!is_valid_email("ana@@example.com"));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(&Some("ana".to_string())), Some("ana"));
        assert_eq!(non_empty(&Some("  ana ".to_string())), Some("ana"));
        assert_eq!(non_empty(&Some("   ".to_string())), None);
        assert_eq!(non_empty(&None), None);
    }
}
