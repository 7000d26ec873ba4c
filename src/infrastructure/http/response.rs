//! Response Emitter
//!
//! 统一的 JSON 响应构造。每个函数返回一个终结的 `Response`,
//! 调用方用 `Result` + `?` 短路, 发出响应后不再有后续处理。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// 序列化任意负载为 JSON 响应体
pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Response {
    (status, Json(payload)).into_response()
}

/// `{"message": ...}` 信封（handler 层成功/失败通道）
pub fn message(status: StatusCode, msg: &str) -> Response {
    json(status, &json!({ "message": msg }))
}

/// `{"error": ...}` 信封（分发器自身的失败通道）
pub fn routing_error(status: StatusCode, msg: &str) -> Response {
    json(status, &json!({ "error": msg }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_message_envelope() {
        let resp = message(StatusCode::CREATED, "hecho");
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "message": "hecho" }));
    }

    #[tokio::test]
    async fn test_routing_error_envelope() {
        let resp = routing_error(StatusCode::NOT_FOUND, "Ruta no encontrada.");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "error": "Ruta no encontrada." }));
    }
}
