//! Stateless HTTP request builder and response checker for the student API.
//!
//! # Design
//! `StudentClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The host executes the actual HTTP round-trip in between, keeping the core
//! deterministic and free of I/O dependencies.
//!
//! Mutations resolve to the raw response: the backend answers them with an
//! empty body, and callers only care that the status was 2xx.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{InfoResource, NewStudent, Student, StudentId};

const STUDENTS: &str = "api/v1/students";
const API_ROOT: &str = "api/v1";

/// Synchronous, stateless client for the student API.
#[derive(Debug, Clone)]
pub struct StudentClient {
    base_url: String,
}

impl StudentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if self.base_url.is_empty() {
            path.to_string()
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    pub fn build_list_students(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.url(STUDENTS),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_student(&self, input: &NewStudent) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.url(STUDENTS),
            headers: json_headers(),
            body: Some(body),
        })
    }

    /// The id goes in the path and in the body.
    pub fn build_update_student(&self, student: &Student) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(student).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.url(&format!("{STUDENTS}/{}", student.id)),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_delete_student(&self, id: StudentId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.url(&format!("{STUDENTS}/{id}")),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_info(&self, info_path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.info_url(info_path),
            headers: Vec::new(),
            body: None,
        }
    }

    fn info_url(&self, info_path: &str) -> String {
        self.url(&format!("{API_ROOT}/{}", info_path.trim_start_matches('/')))
    }

    pub fn parse_list_students(&self, response: HttpResponse) -> Result<Vec<Student>, ApiError> {
        let response = check_status(response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_create_student(&self, response: HttpResponse) -> Result<HttpResponse, ApiError> {
        check_status(response)
    }

    pub fn parse_update_student(&self, response: HttpResponse) -> Result<HttpResponse, ApiError> {
        check_status(response)
    }

    pub fn parse_delete_student(&self, response: HttpResponse) -> Result<HttpResponse, ApiError> {
        check_status(response)
    }

    /// Resolve the info resource to the URL it was served from.
    pub fn parse_info(&self, info_path: &str, response: HttpResponse) -> Result<InfoResource, ApiError> {
        let response = check_status(response)?;
        let url = response
            .url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.info_url(info_path));
        Ok(InfoResource {
            url,
            description: response.body,
        })
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

/// Pass 2xx responses through; wrap everything else in `ApiError::Status`.
pub fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status { response })
    }
}
