use actix_web::{HttpResponse, ResponseError};
use eyre::Report;
use thiserror::Error;

use crate::models::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Internal Server Error: {0}")]
    InternalEyreError(#[from] Report),

    #[error("Internal Server Error: {0}")]
    InternalError(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad Gateway: {0}")]
    BadGateway(String),
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::InternalError(msg) => {
                HttpResponse::InternalServerError().json(ApiResponse::<()>::error(msg.clone()))
            }
            ApiError::InternalEyreError(err) => HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error(format!("{:?}", err))),
            ApiError::NotFound(msg) => {
                HttpResponse::NotFound().json(ApiResponse::<()>::error(msg.clone()))
            }
            ApiError::BadRequest(msg) => {
                HttpResponse::BadRequest().json(ApiResponse::<()>::error(msg.clone()))
            }
            ApiError::Conflict(msg) => {
                HttpResponse::Conflict().json(ApiResponse::<()>::error(msg.clone()))
            }
            ApiError::BadGateway(msg) => {
                HttpResponse::BadGateway().json(ApiResponse::<()>::error(msg.clone()))
            }
        }
    }
}
