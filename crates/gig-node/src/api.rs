//! Client for the Gig Node marketplace REST API.
//!
//! Talks to the `/api/jobs` and `/api/users` routes of a running
//! marketplace backend. All calls are async and meant to be driven from a
//! worker thread via [`run_blocking`].

use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    #[serde(rename = "One-time")]
    OneTime,
}

impl ProjectType {
    pub fn label(self) -> &'static str {
        match self {
            ProjectType::FullTime => "Full-time",
            ProjectType::PartTime => "Part-time",
            ProjectType::Contract => "Contract",
            ProjectType::OneTime => "One-time",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Full-time" => Some(ProjectType::FullTime),
            "Part-time" => Some(ProjectType::PartTime),
            "Contract" => Some(ProjectType::Contract),
            "One-time" => Some(ProjectType::OneTime),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Crypto,
    Fiat,
    Hybrid,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Crypto => "Crypto",
            PaymentMethod::Fiat => "Fiat",
            PaymentMethod::Hybrid => "Hybrid",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Crypto" => Some(PaymentMethod::Crypto),
            "Fiat" => Some(PaymentMethod::Fiat),
            "Hybrid" => Some(PaymentMethod::Hybrid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Open => "Open",
            JobStatus::InProgress => "In Progress",
            JobStatus::Completed => "Completed",
            JobStatus::Cancelled => "Cancelled",
        }
    }
}

/// A job listing as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub project_type: ProjectType,
    pub skills: Vec<String>,
    pub budget: f64,
    pub payment_method: PaymentMethod,
    pub status: JobStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Payload for creating a job; the backend assigns id and status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobPost {
    pub title: String,
    pub description: String,
    pub project_type: ProjectType,
    pub skills: Vec<String>,
    pub budget: f64,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenameUserBody<'a> {
    user_id: &'a str,
    new_username: &'a str,
}

/// Mutating user routes wrap the affected record in an envelope.
#[derive(Debug, Deserialize)]
struct UserEnvelope {
    #[allow(dead_code)]
    message: String,
    user: User,
}

#[derive(Clone)]
pub struct MarketplaceClient {
    base_url: String,
    client: reqwest::Client,
}

impl MarketplaceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn fetch_jobs(&self) -> Result<Vec<JobPost>> {
        let url = format!("{}/api/jobs", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .wrap_err_with(|| format!("GET {url} failed"))?;
        let response = check_status(response).await?;
        response.json().await.wrap_err("invalid job list payload")
    }

    pub async fn create_job(&self, job: &NewJobPost) -> Result<JobPost> {
        let url = format!("{}/api/jobs", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(job)
            .send()
            .await
            .wrap_err_with(|| format!("POST {url} failed"))?;
        let response = check_status(response).await?;
        response.json().await.wrap_err("invalid job payload")
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        let url = format!("{}/api/users", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .wrap_err_with(|| format!("GET {url} failed"))?;
        let response = check_status(response).await?;
        response.json().await.wrap_err("invalid user list payload")
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        let url = format!("{}/api/users", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(user)
            .send()
            .await
            .wrap_err_with(|| format!("POST {url} failed"))?;
        let response = check_status(response).await?;
        response.json().await.wrap_err("invalid user payload")
    }

    pub async fn rename_user(&self, user_id: &str, new_username: &str) -> Result<User> {
        let url = format!("{}/api/users", self.base_url);
        let body = RenameUserBody {
            user_id,
            new_username,
        };
        let response = self
            .client
            .patch(&url)
            .json(&body)
            .send()
            .await
            .wrap_err_with(|| format!("PATCH {url} failed"))?;
        let response = check_status(response).await?;
        let envelope: UserEnvelope = response.json().await.wrap_err("invalid user payload")?;
        Ok(envelope.user)
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<User> {
        let url = format!("{}/api/users", self.base_url);
        let response = self
            .client
            .delete(&url)
            .query(&[("userId", user_id)])
            .send()
            .await
            .wrap_err_with(|| format!("DELETE {url} failed"))?;
        let response = check_status(response).await?;
        let envelope: UserEnvelope = response.json().await.wrap_err("invalid user payload")?;
        Ok(envelope.user)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(eyre!("marketplace API returned {status}: {body}"));
    }
    Ok(response)
}

/// Drives a marketplace future to completion on the calling thread.
pub fn run_blocking<T, F>(future: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to start async runtime")?;
    runtime.block_on(future)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_post_deserializes_backend_shape() {
        let raw = serde_json::json!({
            "_id": "64f000000000000000000001",
            "title": "Build a landing page",
            "description": "Responsive marketing site",
            "projectType": "One-time",
            "skills": ["html", "css"],
            "budget": 1500.0,
            "paymentMethod": "Crypto",
            "status": "Open",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z"
        });
        let job: JobPost = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(job.project_type, ProjectType::OneTime);
        assert_eq!(job.payment_method, PaymentMethod::Crypto);
        assert_eq!(job.status, JobStatus::Open);
        assert_eq!(job.skills, vec!["html", "css"]);
    }

    #[test]
    fn new_job_serializes_camel_case() {
        let job = NewJobPost {
            title: "Audit".into(),
            description: "Contract review".into(),
            project_type: ProjectType::Contract,
            skills: vec!["solidity".into()],
            budget: 4000.0,
            payment_method: PaymentMethod::Hybrid,
        };
        let value = serde_json::to_value(&job).expect("serialize");
        assert_eq!(value["projectType"], "Contract");
        assert_eq!(value["paymentMethod"], "Hybrid");
        assert!(value.get("status").is_none());
    }

    #[test]
    fn labels_round_trip() {
        for label in ["Full-time", "Part-time", "Contract", "One-time"] {
            let parsed = ProjectType::from_label(label).expect("known label");
            assert_eq!(parsed.label(), label);
        }
        assert!(ProjectType::from_label("Freelance").is_none());
        assert!(PaymentMethod::from_label("Barter").is_none());
    }
}
