//! Auth Handlers - 注册 / 登录 / 注销

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;

use super::{is_valid_email, non_empty, parse_user_id};
use crate::application::ports::NewUser;
use crate::infrastructure::http::dto::{CreatedResponse, LoginRequest, LoginResponse, LoginUser, RegisterRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::response;
use crate::infrastructure::http::router::RequestContext;
use crate::infrastructure::http::state::AppState;

/// POST /api/register
pub async fn register(state: Arc<AppState>, cx: RequestContext) -> Result<Response, ApiError> {
    let data: RegisterRequest = serde_json::from_slice(&cx.body).unwrap_or_default();

    let (Some(username), Some(email), Some(password)) = (
        non_empty(&data.username),
        non_empty(&data.email),
        data.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Nombre de usuario, email y contraseña son requeridos.".to_string(),
        ));
    };

    if !is_valid_email(email) {
        return Err(ApiError::BadRequest("Email inválido.".to_string()));
    }

    if state
        .user_repo
        .exists(Some(username), Some(email), None)
        .await?
    {
        return Err(ApiError::Conflict(
            "El nombre de usuario o el email ya están en uso.".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::Internal(format!("Error al registrar el usuario: {}", e)))?;

    let new_user = NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash,
    };

    // 并发注册同名用户时唯一约束兜底, Duplicate 仍翻译为 409
    let id = state.user_repo.create(&new_user).await?;

    tracing::info!(user_id = id, username = %new_user.username, "User registered");

    Ok(response::json(
        StatusCode::CREATED,
        &CreatedResponse {
            message: "Usuario registrado exitosamente.".to_string(),
            id,
        },
    ))
}

/// POST /api/login
pub async fn login(state: Arc<AppState>, cx: RequestContext) -> Result<Response, ApiError> {
    let data: LoginRequest = serde_json::from_slice(&cx.body).unwrap_or_default();

    let (Some(email), Some(password)) = (
        non_empty(&data.email),
        data.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Email y contraseña son requeridos.".to_string(),
        ));
    };

    if !is_valid_email(email) {
        return Err(ApiError::BadRequest("Email inválido.".to_string()));
    }

    let user = state.user_repo.find_by_email(email).await?;

    // 用户不存在与密码错误返回同一个 401, 不泄露账户是否存在
    let Some(user) = user else {
        return Err(ApiError::Unauthorized("Credenciales inválidas.".to_string()));
    };

    let verified = bcrypt::verify(password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("Error al verificar la contraseña: {}", e)))?;

    if !verified {
        return Err(ApiError::Unauthorized("Credenciales inválidas.".to_string()));
    }

    tracing::info!(user_id = user.id, "User logged in");

    Ok(response::json(
        StatusCode::OK,
        &LoginResponse {
            message: "Inicio de sesión exitoso.".to_string(),
            user: LoginUser {
                id: user.id,
                username: user.username,
                email: user.email,
            },
        },
    ))
}

/// POST /api/logout/{id}
///
/// 占位实现: 没有会话存储, 只校验 id 形状后应答成功
pub async fn logout(_state: Arc<AppState>, cx: RequestContext) -> Result<Response, ApiError> {
    let id = parse_user_id(cx.params.first())?;

    tracing::debug!(user_id = id, "Logout requested (no-op)");

    Ok(response::message(
        StatusCode::OK,
        "Sesión cerrada exitosamente.",
    ))
}
