use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// 201 Created + JSON, with `Location` pointing at the new resource.
pub fn created_json<T: serde::Serialize>(location: &str, value: T) -> Response {
    let mut resp = (StatusCode::CREATED, Json(value)).into_response();
    if let Ok(v) = HeaderValue::from_str(location) {
        resp.headers_mut().insert(header::LOCATION, v);
    }
    resp
}

/// 204 No Content
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_sets_location() {
        let resp = created_json("/api/user/7", serde_json::json!({ "id": 7 }));
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()[header::LOCATION], "/api/user/7");
    }

    #[test]
    fn no_content_has_status_204() {
        assert_eq!(no_content().status(), StatusCode::NO_CONTENT);
    }
}
