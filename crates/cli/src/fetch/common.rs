//! Shared infrastructure for the fleet API connector:
//! - `FetchClient` — blocking HTTP client with retry / backoff / error
//!   classification
//! - `Credentials` — flag > env > error resolution; secrets never live in
//!   the job config

use std::thread;
use std::time::Duration;

use crate::exit_codes;
use crate::CliError;

// ── Constants ───────────────────────────────────────────────────────

pub(crate) const MAX_RETRIES: u32 = 3;
pub(crate) const USER_AGENT: &str = concat!("fleetrecon/", env!("CARGO_PKG_VERSION"));

const USERNAME_ENV: &str = "FLEETRECON_API_USERNAME";
const PASSWORD_ENV: &str = "FLEETRECON_API_PASSWORD";
const BASIC_AUTH_ENV: &str = "FLEETRECON_API_BASIC_AUTH";

// ── Credentials ─────────────────────────────────────────────────────

/// Fleet API credentials: login username/password plus the static Basic
/// authorization token the login endpoint requires.
pub(crate) struct Credentials {
    pub username: String,
    pub password: String,
    pub basic_auth: String,
}

impl Credentials {
    pub(crate) fn resolve(
        username: Option<String>,
        password: Option<String>,
        basic_auth: Option<String>,
    ) -> Result<Self, CliError> {
        Ok(Self {
            username: resolve_credential(username, USERNAME_ENV, "API username", "--username")?,
            password: resolve_credential(password, PASSWORD_ENV, "API password", "--password")?,
            basic_auth: resolve_credential(
                basic_auth,
                BASIC_AUTH_ENV,
                "login authorization token",
                "--basic-auth",
            )?,
        })
    }
}

/// Flag > environment > error.
fn resolve_credential(
    flag: Option<String>,
    env_var: &str,
    what: &str,
    flag_name: &str,
) -> Result<String, CliError> {
    if let Some(value) = flag {
        if !value.is_empty() {
            return Ok(value);
        }
    }
    match std::env::var(env_var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(CliError {
            code: exit_codes::EXIT_FETCH_AUTH,
            message: format!("{what} not provided"),
            hint: Some(format!("pass {flag_name} or set {env_var}")),
        }),
    }
}

// ── FetchClient ─────────────────────────────────────────────────────

/// Blocking HTTP client that handles retry, backoff, and error
/// classification. Callers pass a request-building closure which is invoked
/// once per attempt with the underlying client.
pub(crate) struct FetchClient {
    pub(crate) http: reqwest::blocking::Client,
    source_name: String,
}

impl FetchClient {
    pub(crate) fn new(source_name: &str) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            source_name: source_name.to_string(),
        }
    }

    /// Make a request with retry + exponential backoff. Auth failures
    /// (401/403) and other client errors fail immediately; 429 and 5xx are
    /// retried, as are transport errors.
    pub(crate) fn request_with_retry(
        &self,
        build_request: impl Fn(&reqwest::blocking::Client) -> reqwest::blocking::RequestBuilder,
    ) -> Result<serde_json::Value, CliError> {
        match self.run_request(&build_request, false)? {
            Some(body) => Ok(body),
            None => Err(self.upstream_error("empty response".into())),
        }
    }

    /// Like [`Self::request_with_retry`], but a 404 resolves to `Ok(None)`
    /// instead of an error (used by per-id lookups).
    pub(crate) fn request_with_retry_404(
        &self,
        build_request: impl Fn(&reqwest::blocking::Client) -> reqwest::blocking::RequestBuilder,
    ) -> Result<Option<serde_json::Value>, CliError> {
        self.run_request(&build_request, true)
    }

    fn run_request(
        &self,
        build_request: &dyn Fn(&reqwest::blocking::Client) -> reqwest::blocking::RequestBuilder,
        missing_ok: bool,
    ) -> Result<Option<serde_json::Value>, CliError> {
        let mut backoff_secs = 1u64;
        let mut last_transport_error = String::new();

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                thread::sleep(Duration::from_secs(backoff_secs));
                backoff_secs *= 2;
            }

            let response = match build_request(&self.http).send() {
                Ok(resp) => resp,
                Err(e) => {
                    last_transport_error = e.to_string();
                    continue;
                }
            };

            let status = response.status().as_u16();

            if status == 401 || status == 403 {
                return Err(CliError {
                    code: exit_codes::EXIT_FETCH_AUTH,
                    message: format!("{} auth failed ({status})", self.source_name),
                    hint: Some("check the API credentials".into()),
                });
            }
            if missing_ok && status == 404 {
                return Ok(None);
            }
            if status == 429 || status >= 500 {
                last_transport_error = format!("HTTP {status}");
                continue;
            }
            if !(200..300).contains(&status) {
                return Err(self.upstream_error(format!("unexpected HTTP {status}")));
            }

            let body: serde_json::Value = response
                .json()
                .map_err(|e| self.upstream_error(format!("invalid JSON body: {e}")))?;
            return Ok(Some(body));
        }

        Err(CliError {
            code: exit_codes::EXIT_FETCH_NETWORK,
            message: format!(
                "{} unreachable after {} attempts: {last_transport_error}",
                self.source_name,
                MAX_RETRIES + 1,
            ),
            hint: None,
        })
    }

    fn upstream_error(&self, detail: String) -> CliError {
        CliError {
            code: exit_codes::EXIT_FETCH_UPSTREAM,
            message: format!("{}: {detail}", self.source_name),
            hint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_environment() {
        let value =
            resolve_credential(Some("from-flag".into()), "FLEETRECON_TEST_UNSET", "x", "--x")
                .unwrap();
        assert_eq!(value, "from-flag");
    }

    #[test]
    fn missing_credential_names_the_env_var() {
        let err =
            resolve_credential(None, "FLEETRECON_TEST_UNSET", "API username", "--username")
                .unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_FETCH_AUTH);
        assert!(err.hint.unwrap().contains("FLEETRECON_TEST_UNSET"));
    }
}
