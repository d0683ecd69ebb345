//! API models

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Credentials sent to `/login` and `/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub sesid: String,
    #[serde(deserialize_with = "string_or_number")]
    pub userid: String,
}

/// Register response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub sesid: String,
}

/// Build/runtime strategy selected by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ProjectType {
    #[default]
    Static,
    NodeJs,
    Go,
    Unknown(i64),
}

impl From<i64> for ProjectType {
    fn from(value: i64) -> Self {
        match value {
            0 => ProjectType::Static,
            1 => ProjectType::NodeJs,
            2 => ProjectType::Go,
            other => ProjectType::Unknown(other),
        }
    }
}

impl From<ProjectType> for i64 {
    fn from(value: ProjectType) -> Self {
        match value {
            ProjectType::Static => 0,
            ProjectType::NodeJs => 1,
            ProjectType::Go => 2,
            ProjectType::Unknown(other) => other,
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectType::Static => "Static",
            ProjectType::NodeJs => "Node.js",
            ProjectType::Go => "Go",
            ProjectType::Unknown(_) => "Unknown",
        };
        f.write_str(label)
    }
}

/// Environment variable attached to a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    #[serde(rename = "Key", alias = "key")]
    pub key: String,

    #[serde(rename = "Value", alias = "value", default)]
    pub value: String,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A deployment as stored by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Deployment {
    #[serde(rename = "ID", deserialize_with = "string_or_number")]
    pub id: String,
    pub clone_url: String,
    pub branch: String,
    pub port: u16,
    pub sub_domain: String,
    pub repo_name: String,
    pub project_path: String,
    pub project_type: ProjectType,
    #[serde(deserialize_with = "null_as_default")]
    pub env_vars: Vec<EnvVar>,
}

/// `GET /deployments/{userid}` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub deployments: Vec<Deployment>,
}

/// `GET /deployment/{id}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentResponse {
    pub deployment: Deployment,
}

/// `POST /deploy` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeploymentRequest {
    pub clone_url: String,
    pub repo_name: String,
    pub branch: String,
    pub subdomain: String,
    pub port: u16,
    pub envs: Vec<EnvVar>,
}

/// Runtime metrics of a deployment's container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerStats {
    /// CPU usage in percent
    pub cpu_usage: f64,
    /// Bytes
    pub memory_usage: u64,
    /// Bytes
    pub memory_limit: u64,
    /// Bytes received
    pub network_rx: u64,
    /// Bytes sent
    pub network_tx: u64,
    pub status: String,
}

impl ContainerStats {
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}

/// `GET /deployment/{id}/stats` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub stats: ContainerStats,
}

/// `GET /deployment/{id}/logs` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<String>,
}

/// Variable as sent to `POST /env/{id}`, which takes lowercase field names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEnvVar {
    pub key: String,
    pub value: String,
}

impl From<EnvVar> for NewEnvVar {
    fn from(var: EnvVar) -> Self {
        Self {
            key: var.key,
            value: var.value,
        }
    }
}

/// `POST /env/{id}` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddEnvRequest {
    pub envs: Vec<NewEnvVar>,
}

/// `PUT /env/{id}/{key}` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEnvRequest {
    pub value: String,
}

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// The human readable `message` field, if set
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    /// Whatever the body says about the failure, `error` first
    pub fn summary(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|e| !e.is_empty())
            .or_else(|| self.message())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    UInt(u64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::UInt(n) => n.to_string(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
