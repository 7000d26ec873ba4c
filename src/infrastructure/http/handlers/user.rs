//! User CRUD Handlers

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;

use super::{is_valid_email, non_empty, parse_user_id};
use crate::application::ports::{NewUser, RepositoryError, UserChanges};
use crate::infrastructure::http::dto::{
    CreatedResponse, RegisterRequest, UpdateUserRequest, UserResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::response;
use crate::infrastructure::http::router::RequestContext;
use crate::infrastructure::http::state::AppState;

/// GET /api/users
pub async fn get_all_users(state: Arc<AppState>, _cx: RequestContext) -> Result<Response, ApiError> {
    let users = state.user_repo.find_all().await?;

    if users.is_empty() {
        return Err(ApiError::NotFound("No hay usuarios registrados.".to_string()));
    }

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(response::json(StatusCode::OK, &users))
}

/// GET /api/users/{id}
pub async fn get_user(state: Arc<AppState>, cx: RequestContext) -> Result<Response, ApiError> {
    let id = parse_user_id(cx.params.first())?;

    let user = state
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuario no encontrado.".to_string()))?;

    Ok(response::json(StatusCode::OK, &UserResponse::from(user)))
}

/// POST /api/users
pub async fn create_user(state: Arc<AppState>, cx: RequestContext) -> Result<Response, ApiError> {
    let data: RegisterRequest = serde_json::from_slice(&cx.body).unwrap_or_default();

    let (Some(username), Some(email), Some(password)) = (
        non_empty(&data.username),
        non_empty(&data.email),
        data.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Todos los campos son requeridos.".to_string(),
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
            "El nombre de usuario o el correo electrónico ya están en uso.".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::Internal(format!("Error al crear el usuario: {}", e)))?;

    let id = state
        .user_repo
        .create(&NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await?;

    tracing::info!(user_id = id, "User created");

    Ok(response::json(
        StatusCode::CREATED,
        &CreatedResponse {
            message: "Usuario creado exitosamente.".to_string(),
            id,
        },
    ))
}

/// PUT /api/users/{id}
pub async fn update_user(state: Arc<AppState>, cx: RequestContext) -> Result<Response, ApiError> {
    let id = parse_user_id(cx.params.first())?;

    let data: UpdateUserRequest = serde_json::from_slice(&cx.body).unwrap_or_default();
    if data.is_empty() {
        return Err(ApiError::BadRequest(
            "No se proporcionaron datos para actualizar.".to_string(),
        ));
    }

    if let Some(email) = non_empty(&data.email) {
        if !is_valid_email(email) {
            return Err(ApiError::BadRequest("Email inválido.".to_string()));
        }
    }

    // 唯一性检查排除被更新的这一行
    let username = non_empty(&data.username);
    let email = non_empty(&data.email);
    if (username.is_some() || email.is_some())
        && state.user_repo.exists(username, email, Some(id)).await?
    {
        return Err(ApiError::Conflict(
            "El nombre de usuario o el correo electrónico ya están en uso.".to_string(),
        ));
    }

    let password_hash = match data.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => Some(
            bcrypt::hash(password, bcrypt::DEFAULT_COST)
                .map_err(|e| ApiError::Internal(format!("Error al actualizar el usuario: {}", e)))?,
        ),
        None => None,
    };

    let changes = UserChanges {
        username: username.map(str::to_string),
        email: email.map(str::to_string),
        password_hash,
    };

    match state.user_repo.update(id, &changes).await {
        Ok(()) => {}
        Err(RepositoryError::NotFound(_)) => {
            return Err(ApiError::NotFound("Usuario no encontrado.".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = id, "User updated");

    Ok(response::message(
        StatusCode::OK,
        "Usuario actualizado exitosamente.",
    ))
}

/// DELETE /api/users/{id}
pub async fn delete_user(state: Arc<AppState>, cx: RequestContext) -> Result<Response, ApiError> {
    let id = parse_user_id(cx.params.first())?;

    match state.user_repo.delete(id).await {
        Ok(()) => {}
        Err(RepositoryError::NotFound(_)) => {
            return Err(ApiError::NotFound("Usuario no encontrado.".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = id, "User deleted");

    Ok(response::message(
        StatusCode::OK,
        "Usuario eliminado exitosamente.",
    ))
}
