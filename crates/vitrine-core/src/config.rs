//! Configuration module
//!
//! Configuration is read once at startup from the environment. Every value has a
//! default except the remote store credentials, which `validate` insists on when the
//! Cloudinary backend is selected.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_CLOUDINARY_API_BASE, DEFAULT_MEDIA_FOLDER_ROOT, MIB, MULTI_UPLOAD_MAX_BYTES,
    MULTI_UPLOAD_MAX_FILES, MULTI_UPLOAD_MAX_IMAGES, MULTI_UPLOAD_MAX_VIDEOS,
    SINGLE_UPLOAD_MAX_BYTES,
};
use crate::store_types::StoreBackend;

const SERVER_PORT: u16 = 5000;
const JSON_BODY_LIMIT_BYTES: usize = 10 * MIB;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const REQUEST_TIMEOUT_SECS: u64 = 300;
const CLOUDINARY_UPLOAD_TIMEOUT_SECS: u64 = 120;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub json_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub request_timeout_secs: u64,
}

/// Quotas enforced by the upload limiter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadLimitsConfig {
    pub single_max_bytes: usize,
    pub multi_max_bytes: usize,
    pub multi_max_images: usize,
    pub multi_max_videos: usize,
    pub multi_max_files: usize,
}

impl Default for UploadLimitsConfig {
    fn default() -> Self {
        Self {
            single_max_bytes: SINGLE_UPLOAD_MAX_BYTES,
            multi_max_bytes: MULTI_UPLOAD_MAX_BYTES,
            multi_max_images: MULTI_UPLOAD_MAX_IMAGES,
            multi_max_videos: MULTI_UPLOAD_MAX_VIDEOS,
            multi_max_files: MULTI_UPLOAD_MAX_FILES,
        }
    }
}

impl UploadLimitsConfig {
    /// Largest request body a multi-file upload can legitimately produce.
    pub fn max_request_bytes(&self) -> usize {
        let files = self.multi_max_files.max(1);
        (self.multi_max_bytes.saturating_mul(files)).max(self.single_max_bytes) + MIB
    }
}

/// Credentials and endpoint of the Cloudinary account
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
    pub upload_timeout_secs: u64,
}

impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .finish()
    }
}

impl CloudinaryConfig {
    /// Parse `cloudinary://<api_key>:<api_secret>@<cloud_name>`.
    pub fn from_url(url: &str) -> Result<Self, anyhow::Error> {
        let rest = url
            .strip_prefix("cloudinary://")
            .ok_or_else(|| anyhow::anyhow!("CLOUDINARY_URL must start with cloudinary://"))?;
        let (credentials, cloud_name) = rest
            .rsplit_once('@')
            .ok_or_else(|| anyhow::anyhow!("CLOUDINARY_URL is missing the cloud name"))?;
        let (api_key, api_secret) = credentials
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("CLOUDINARY_URL is missing the API secret"))?;

        if cloud_name.is_empty() || api_key.is_empty() || api_secret.is_empty() {
            return Err(anyhow::anyhow!("CLOUDINARY_URL has empty components"));
        }

        Ok(Self {
            cloud_name: cloud_name.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            api_base: DEFAULT_CLOUDINARY_API_BASE.to_string(),
            upload_timeout_secs: CLOUDINARY_UPLOAD_TIMEOUT_SECS,
        })
    }
}

/// Media service configuration
#[derive(Clone, Debug)]
pub struct MediaServiceConfig {
    pub base: BaseConfig,
    pub store_backend: StoreBackend,
    pub cloudinary: Option<CloudinaryConfig>,
    pub media_folder_root: String,
    pub upload_limits: UploadLimitsConfig,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config(pub Box<MediaServiceConfig>);

impl Config {
    fn as_media(&self) -> &MediaServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        // A missing .env file is the normal case outside development
        let _ = dotenvy::dotenv();
        let config = MediaServiceConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_media().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_media().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.as_media().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.as_media().base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_media().base.cors_origins
    }

    pub fn json_body_limit_bytes(&self) -> usize {
        self.as_media().base.json_body_limit_bytes
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_media().base.http_concurrency_limit
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.as_media().base.request_timeout_secs
    }

    pub fn store_backend(&self) -> StoreBackend {
        self.as_media().store_backend
    }

    pub fn cloudinary(&self) -> Option<&CloudinaryConfig> {
        self.as_media().cloudinary.as_ref()
    }

    pub fn media_folder_root(&self) -> &str {
        &self.as_media().media_folder_root
    }

    pub fn upload_limits(&self) -> &UploadLimitsConfig {
        &self.as_media().upload_limits
    }
}

/// Read `key` through `lookup` and parse it, falling back to `default` when the
/// variable is unset, empty or unparseable.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl MediaServiceConfig {
    /// Build configuration from a key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = non_empty(&lookup, "ENVIRONMENT")
            .or_else(|| non_empty(&lookup, "NODE_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let mut cors_origins: Vec<String> = non_empty(&lookup, "CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(client_url) = non_empty(&lookup, "CLIENT_URL") {
            if !cors_origins.contains(&client_url) {
                cors_origins.push(client_url);
            }
        }

        let store_backend = match non_empty(&lookup, "MEDIA_STORE") {
            Some(value) => value.parse()?,
            None => StoreBackend::Cloudinary,
        };

        let cloudinary = Self::cloudinary_from_lookup(&lookup)?;

        let defaults = UploadLimitsConfig::default();
        let upload_limits = UploadLimitsConfig {
            single_max_bytes: parse_or(&lookup, "SINGLE_UPLOAD_MAX_BYTES", defaults.single_max_bytes),
            multi_max_bytes: parse_or(&lookup, "MULTI_UPLOAD_MAX_BYTES", defaults.multi_max_bytes),
            multi_max_images: parse_or(&lookup, "MULTI_UPLOAD_MAX_IMAGES", defaults.multi_max_images),
            multi_max_videos: parse_or(&lookup, "MULTI_UPLOAD_MAX_VIDEOS", defaults.multi_max_videos),
            multi_max_files: parse_or(&lookup, "MULTI_UPLOAD_MAX_FILES", defaults.multi_max_files),
        };

        let config = MediaServiceConfig {
            base: BaseConfig {
                server_port: parse_or(&lookup, "PORT", SERVER_PORT),
                environment,
                cors_origins,
                json_body_limit_bytes: parse_or(&lookup, "JSON_BODY_LIMIT_BYTES", JSON_BODY_LIMIT_BYTES),
                http_concurrency_limit: parse_or(&lookup, "HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT)
                    .max(1),
                request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", REQUEST_TIMEOUT_SECS)
                    .max(1),
            },
            store_backend,
            cloudinary,
            media_folder_root: non_empty(&lookup, "MEDIA_FOLDER_ROOT")
                .unwrap_or_else(|| DEFAULT_MEDIA_FOLDER_ROOT.to_string()),
            upload_limits,
        };

        config.validate()?;
        Ok(config)
    }

    fn cloudinary_from_lookup<F>(lookup: &F) -> Result<Option<CloudinaryConfig>, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cloudinary = match (
            non_empty(lookup, "CLOUDINARY_CLOUD_NAME"),
            non_empty(lookup, "CLOUDINARY_API_KEY"),
            non_empty(lookup, "CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
                api_base: DEFAULT_CLOUDINARY_API_BASE.to_string(),
                upload_timeout_secs: CLOUDINARY_UPLOAD_TIMEOUT_SECS,
            }),
            _ => match non_empty(lookup, "CLOUDINARY_URL") {
                Some(url) => Some(CloudinaryConfig::from_url(&url)?),
                None => None,
            },
        };

        if let Some(ref mut c) = cloudinary {
            if let Some(api_base) = non_empty(lookup, "CLOUDINARY_API_BASE") {
                c.api_base = api_base.trim_end_matches('/').to_string();
            }
            c.upload_timeout_secs = parse_or(
                lookup,
                "CLOUDINARY_UPLOAD_TIMEOUT_SECS",
                CLOUDINARY_UPLOAD_TIMEOUT_SECS,
            )
            .max(1);
        }

        Ok(cloudinary)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.store_backend == StoreBackend::Cloudinary && self.cloudinary.is_none() {
            return Err(anyhow::anyhow!(
                "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET (or CLOUDINARY_URL) must be set when using the cloudinary media store"
            ));
        }

        let limits = &self.upload_limits;
        if limits.single_max_bytes == 0 || limits.multi_max_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }
        if limits.multi_max_files == 0 {
            return Err(anyhow::anyhow!("MULTI_UPLOAD_MAX_FILES must be greater than zero"));
        }
        if self.media_folder_root.contains("..") {
            return Err(anyhow::anyhow!("MEDIA_FOLDER_ROOT must not contain '..'"));
        }

        Ok(())
    }
}
