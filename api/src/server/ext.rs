use axum::{
    response::{IntoResponse, Response as AxumResponse},
    Json,
};

use crate::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> AxumResponse {
        let status = self.status();
        let mut body = Json(self).into_response();
        *body.status_mut() = status;
        body
    }
}
