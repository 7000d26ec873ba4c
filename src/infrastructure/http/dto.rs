//! HTTP DTOs
//!
//! 请求体缺字段与非法 JSON 同样落在 "字段为空" 的校验分支,
//! 所以请求 DTO 的字段都是 `Option` 且实现 `Default`。

use serde::{Deserialize, Serialize};

use crate::application::ports::UserRecord;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// 没有提供任何可更新字段
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

// ============================================================================
// Responses
// ============================================================================

/// 对外的用户视图; 密码哈希永不序列化
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// 登录成功响应中内嵌的用户摘要
#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: LoginUser,
}

/// 创建类操作的响应: 消息 + 新行 id
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_user_response_omits_password_hash() {
        let record = UserRecord {
            id: 1,
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$2b$04$secreto".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&UserResponse::from(record)).unwrap();
        assert!(!json.contains("secreto"));
        assert!(!json.contains("password"));
        assert!(json.contains("\"username\":\"ana\""));
    }

    #[test]
    fn test_request_defaults_on_invalid_json() {
        let req: RegisterRequest = serde_json::from_slice(b"not json").unwrap_or_default();
        assert!(req.username.is_none());
        assert!(req.email.is_none());
        assert!(req.password.is_none());
    }

    #[test]
    fn test_update_request_is_empty() {
        assert!(UpdateUserRequest::default().is_empty());

        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"email": "a@b.com"}"#).unwrap();
        assert!(!req.is_empty());
    }
}
