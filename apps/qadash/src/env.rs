//! Required environment variables: API endpoints and tokens for the two
//! deployed environments plus object-storage credentials.

use crate::error::{Error, Result};
use log::{error, info};

pub const REQUIRED_VARIABLES: [&str; 11] = [
    "F8A_API_URL_STAGE",
    "F8A_API_URL_PROD",
    "F8A_JOB_API_URL_STAGE",
    "F8A_JOB_API_URL_PROD",
    "RECOMMENDER_API_TOKEN_STAGE",
    "RECOMMENDER_API_TOKEN_PROD",
    "JOB_API_TOKEN_STAGE",
    "JOB_API_TOKEN_PROD",
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "S3_REGION_NAME",
];

#[derive(Debug, Clone)]
/// Endpoints and tokens of one deployed environment.
pub struct ApiEndpoints {
    pub core_api_url: String,
    pub core_api_token: String,
    pub jobs_api_url: String,
    pub jobs_api_token: String,
}

#[derive(Debug, Clone)]
pub struct StorageCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

#[derive(Debug, Clone)]
pub struct EnvSettings {
    pub stage: ApiEndpoints,
    pub prod: ApiEndpoints,
    pub storage: StorageCredentials,
}

/// Check every required variable using `lookup`, logging each one.
///
/// All variables are checked before failing so the operator sees the full
/// list of missing names at once.
pub fn check_environment_with<F>(lookup: F) -> Result<EnvSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = Vec::new();
    for name in REQUIRED_VARIABLES {
        info!("Checking: {} environment variable existence", name);
        if lookup(name).is_none() {
            error!("{} environment variable has to be specified", name);
            missing.push(name.to_string());
        }
    }
    if !missing.is_empty() {
        return Err(Error::MissingEnv(missing));
    }
    let get = |name: &str| lookup(name).unwrap_or_default();
    Ok(EnvSettings {
        stage: ApiEndpoints {
            core_api_url: get("F8A_API_URL_STAGE"),
            core_api_token: get("RECOMMENDER_API_TOKEN_STAGE"),
            jobs_api_url: get("F8A_JOB_API_URL_STAGE"),
            jobs_api_token: get("JOB_API_TOKEN_STAGE"),
        },
        prod: ApiEndpoints {
            core_api_url: get("F8A_API_URL_PROD"),
            core_api_token: get("RECOMMENDER_API_TOKEN_PROD"),
            jobs_api_url: get("F8A_JOB_API_URL_PROD"),
            jobs_api_token: get("JOB_API_TOKEN_PROD"),
        },
        storage: StorageCredentials {
            access_key_id: get("AWS_ACCESS_KEY_ID"),
            secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            region: get("S3_REGION_NAME"),
        },
    })
}

/// Check the process environment.
pub fn check_environment() -> Result<EnvSettings> {
    check_environment_with(|name| std::env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<String, String> {
        REQUIRED_VARIABLES
            .iter()
            .map(|n| (n.to_string(), format!("value-of-{}", n)))
            .collect()
    }

    #[test]
    fn test_all_present() {
        let env = full_env();
        let settings = check_environment_with(|n| env.get(n).cloned()).unwrap();
        assert_eq!(settings.stage.core_api_url, "value-of-F8A_API_URL_STAGE");
        assert_eq!(settings.prod.jobs_api_token, "value-of-JOB_API_TOKEN_PROD");
        assert_eq!(settings.storage.region, "value-of-S3_REGION_NAME");
    }

    #[test]
    fn test_every_missing_variable_is_reported() {
        let mut env = full_env();
        env.remove("F8A_API_URL_PROD");
        env.remove("S3_REGION_NAME");
        match check_environment_with(|n| env.get(n).cloned()) {
            Err(Error::MissingEnv(names)) => {
                assert_eq!(names, vec!["F8A_API_URL_PROD", "S3_REGION_NAME"]);
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }
}
