//! Configuration validation
//!
//! Catches values that parse but cannot work before anything connects.

use anyhow::Result;
use pictor_core::Config;

pub fn validate_config(config: &Config) -> Result<()> {
    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Set specific allowed origins via CORS_ORIGINS."
        ));
    }

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    if config.media_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Media host timeout cannot be 0"));
    }

    if config.request_deadline_seconds() == 0 {
        return Err(anyhow::anyhow!("Request deadline cannot be 0"));
    }

    if config.request_deadline_seconds() < config.media_timeout_seconds() {
        tracing::warn!(
            request_deadline_seconds = config.request_deadline_seconds(),
            media_timeout_seconds = config.media_timeout_seconds(),
            "Request deadline is shorter than the media host timeout"
        );
    }

    if config.max_upload_size_bytes() == 0 {
        return Err(anyhow::anyhow!("Max upload size cannot be 0"));
    }

    if config.is_production() && config.ensure_schema() {
        tracing::warn!("ENSURE_SCHEMA is enabled in production");
    }

    tracing::debug!("Configuration validation passed");
    Ok(())
}
