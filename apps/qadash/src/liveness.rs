//! Liveness and auth-token probes for the core and jobs APIs of one
//! deployed environment, plus smoke-test job links.
//!
//! Every probe is independent. A failed request is logged and counts as
//! unavailable/invalid; nothing here aborts the run.

use crate::ci::{CiJobs, JobStatuses};
use crate::env::ApiEndpoints;
use crate::http::Transport;
use crate::models::results::SmokeTest;
use crate::models::Liveness;
use log::{info, warn};

pub const ENVIRONMENTS: [&str; 2] = ["stage", "production"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    Core,
    Jobs,
}

impl ApiKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Core => "core API",
            Self::Jobs => "jobs API",
        }
    }
}

/// One API surface of one environment.
pub struct ApiProbe<'a> {
    kind: ApiKind,
    url: &'a str,
    token: &'a str,
    transport: &'a dyn Transport,
}

impl<'a> ApiProbe<'a> {
    pub fn new(kind: ApiKind, url: &'a str, token: &'a str, transport: &'a dyn Transport) -> Self {
        Self {
            kind,
            url,
            token,
            transport,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), path)
    }

    /// The readiness endpoint answers with a 2xx status.
    pub fn is_api_running(&self) -> bool {
        let url = self.endpoint("/api/v1/readiness");
        match self.transport.get(&url, &[]) {
            Ok(resp) => resp.is_success(),
            Err(e) => {
                warn!("{} readiness: {}", self.kind.label(), e);
                false
            }
        }
    }

    /// The token is accepted by an endpoint that requires authorization.
    ///
    /// The core API takes a bearer token and is judged only on 401/403;
    /// the jobs API takes an `auth-token` header and must answer 2xx.
    pub fn check_auth_token_validity(&self) -> bool {
        let result = match self.kind {
            ApiKind::Core => {
                let bearer = format!("Bearer {}", self.token);
                self.transport
                    .get(
                        &self.endpoint("/api/v1/user-intent"),
                        &[("Authorization", bearer.as_str())],
                    )
                    .map(|r| r.status != 401 && r.status != 403)
            }
            ApiKind::Jobs => self
                .transport
                .get(&self.endpoint("/api/v1/jobs"), &[("auth-token", self.token)])
                .map(|r| r.is_success()),
        };
        result.unwrap_or_else(|e| {
            warn!("{} token check: {}", self.kind.label(), e);
            false
        })
    }
}

fn report(check: &str, ok: bool) {
    if ok {
        info!("{}: ok", check);
    } else {
        warn!("{}: failed", check);
    }
}

/// Probe both APIs of one environment.
pub fn check_system(
    transport: &dyn Transport,
    endpoints: &ApiEndpoints,
    environment: &str,
) -> Liveness {
    let core = ApiProbe::new(
        ApiKind::Core,
        &endpoints.core_api_url,
        &endpoints.core_api_token,
        transport,
    );
    let jobs = ApiProbe::new(
        ApiKind::Jobs,
        &endpoints.jobs_api_url,
        &endpoints.jobs_api_token,
        transport,
    );

    info!("Checking: core API and jobs API endpoints ({})", environment);
    let core_api_available = core.is_api_running();
    let jobs_api_available = jobs.is_api_running();
    report(
        &format!("{} system availability", environment),
        core_api_available && jobs_api_available,
    );

    let core_api_auth_token = core.check_auth_token_validity();
    report(
        &format!("{} core API authorization token", environment),
        core_api_auth_token,
    );
    let jobs_api_auth_token = jobs.check_auth_token_validity();
    report(
        &format!("{} jobs API authorization token", environment),
        jobs_api_auth_token,
    );

    Liveness {
        core_api_available,
        jobs_api_available,
        core_api_auth_token,
        jobs_api_auth_token,
    }
}

/// Smoke-test job link and status for every environment.
pub fn smoke_tests(jobs: &CiJobs<'_>, statuses: &JobStatuses) -> Vec<SmokeTest> {
    ENVIRONMENTS
        .iter()
        .map(|env| SmokeTest {
            environment: env.to_string(),
            job: jobs.smoke_test_link(env, statuses),
        })
        .collect()
}
