//! Fleet API connector: token login, active-vehicle download, and the
//! per-label color lookup backing the report's font annotation.

use fleetrecon_engine::config::ApiConfig;
use fleetrecon_engine::{LabelColorSource, LookupError, Rgb};
use fleetrecon_table::Table;

use crate::CliError;

use super::common::{Credentials, FetchClient};

pub(crate) struct FleetApiClient {
    client: FetchClient,
    base_url: String,
    login_path: String,
    vehicles_path: String,
    labels_path: String,
    credentials: Credentials,
}

impl FleetApiClient {
    pub(crate) fn new(api: &ApiConfig, credentials: Credentials) -> Self {
        Self {
            client: FetchClient::new("fleet API"),
            base_url: api.base_url.clone(),
            login_path: api.login_path.clone(),
            vehicles_path: api.vehicles_path.clone(),
            labels_path: api.labels_path.clone(),
            credentials,
        }
    }

    /// Exchange the login credentials for a bearer token.
    pub(crate) fn login(&self) -> Result<String, CliError> {
        let url = format!("{}{}", self.base_url, self.login_path);
        let payload = serde_json::json!({
            "username": self.credentials.username,
            "password": self.credentials.password,
        });

        let body = self.client.request_with_retry(|http| {
            http.post(&url)
                .header("Authorization", format!("Basic {}", self.credentials.basic_auth))
                .json(&payload)
        })?;

        body["oauth"]["access_token"]
            .as_str()
            .map(|token| token.to_string())
            .ok_or_else(|| CliError {
                code: crate::exit_codes::EXIT_FETCH_UPSTREAM,
                message: "login response missing oauth.access_token".into(),
                hint: None,
            })
    }

    /// Download the active-vehicle dataset as a table.
    pub(crate) fn fetch_vehicles(&self, token: &str) -> Result<Table, CliError> {
        let url = format!("{}{}", self.base_url, self.vehicles_path);
        let body = self
            .client
            .request_with_retry(|http| http.get(&url).bearer_auth(token))?;

        match body {
            serde_json::Value::Array(records) => Ok(Table::from_json_records(records)),
            _ => Err(CliError {
                code: crate::exit_codes::EXIT_FETCH_UPSTREAM,
                message: "vehicle response is not a JSON array".into(),
                hint: None,
            }),
        }
    }

    /// Label-color lookups share this client and the given bearer token.
    pub(crate) fn label_colors<'a>(&'a self, token: String) -> LabelColors<'a> {
        LabelColors { api: self, token }
    }
}

/// HTTP-backed [`LabelColorSource`]. Unknown labels and labels without a
/// usable `colorCode` resolve to `None`; transport failures surface as
/// recoverable lookup errors so annotation can skip the id.
pub(crate) struct LabelColors<'a> {
    api: &'a FleetApiClient,
    token: String,
}

impl LabelColorSource for LabelColors<'_> {
    fn label_color(&self, label_id: &str) -> Result<Option<Rgb>, LookupError> {
        let url = format!("{}{}/{label_id}", self.api.base_url, self.api.labels_path);
        let body = self
            .api
            .client
            .request_with_retry_404(|http| http.get(&url).bearer_auth(&self.token))
            .map_err(|e| LookupError(e.message))?;

        Ok(body.as_ref().and_then(extract_color_code))
    }
}

/// Pull `colorCode` out of a label response. The endpoint answers with
/// either a single object or a one-element array.
fn extract_color_code(body: &serde_json::Value) -> Option<Rgb> {
    let record = match body {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    parse_color_code(record["colorCode"].as_str()?)
}

/// Parse `#RRGGBB` (with or without the leading `#`) into a packed RGB.
fn parse_color_code(code: &str) -> Option<Rgb> {
    let hex = code.strip_prefix('#').unwrap_or(code);
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn test_credentials() -> Credentials {
        Credentials {
            username: "365".into(),
            password: "1".into(),
            basic_auth: "dGVzdDp0ZXN0".into(),
        }
    }

    fn client_for(server: &MockServer) -> FleetApiClient {
        let api = ApiConfig {
            base_url: server.base_url(),
            login_path: "/login".into(),
            vehicles_path: "/vehicles/select/active".into(),
            labels_path: "/labels".into(),
        };
        FleetApiClient::new(&api, test_credentials())
    }

    #[test]
    fn login_token_flows_into_vehicle_request() {
        let server = MockServer::start();
        let login = server.mock(|when, then| {
            when.method(POST)
                .path("/login")
                .header("authorization", "Basic dGVzdDp0ZXN0")
                .json_body(serde_json::json!({"username": "365", "password": "1"}));
            then.status(200)
                .json_body(serde_json::json!({"oauth": {"access_token": "tok-1"}}));
        });
        let vehicles = server.mock(|when, then| {
            when.method(GET)
                .path("/vehicles/select/active")
                .header("authorization", "Bearer tok-1");
            then.status(200).json_body(serde_json::json!([
                {"kurzname": "V1", "hu": "2022-01-01"},
                {"kurzname": "V2", "gruppe": "G1"},
            ]));
        });

        let client = client_for(&server);
        let token = client.login().unwrap();
        let table = client.fetch_vehicles(&token).unwrap();

        login.assert();
        vehicles.assert();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.columns(), &["kurzname", "hu", "gruppe"]);
    }

    #[test]
    fn rejected_credentials_fail_without_retry() {
        let server = MockServer::start();
        let login = server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(401);
        });

        let err = client_for(&server).login().unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_FETCH_AUTH);
        login.assert_hits(1);
    }

    #[test]
    fn server_errors_are_retried() {
        let server = MockServer::start();
        let flaky = server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(500);
        });

        let client = client_for(&server);
        let err = client.login().unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_FETCH_NETWORK);
        flaky.assert_hits((crate::fetch::common::MAX_RETRIES + 1) as usize);
    }

    #[test]
    fn missing_token_is_an_upstream_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(200).json_body(serde_json::json!({"status": "ok"}));
        });

        let err = client_for(&server).login().unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_FETCH_UPSTREAM);
    }

    #[test]
    fn unknown_label_resolves_to_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/labels/99");
            then.status(404);
        });

        let client = client_for(&server);
        let labels = client.label_colors("tok".into());
        assert_eq!(labels.label_color("99").unwrap(), None);
    }

    #[test]
    fn label_color_parses_color_code() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/labels/10")
                .header("authorization", "Bearer tok");
            then.status(200)
                .json_body(serde_json::json!([{"id": 10, "colorCode": "#fca09d"}]));
        });

        let client = client_for(&server);
        let labels = client.label_colors("tok".into());
        assert_eq!(labels.label_color("10").unwrap(), Some(0xFCA09D));
    }

    #[test]
    fn malformed_color_code_is_skipped() {
        assert_eq!(parse_color_code("#fff"), None);
        assert_eq!(parse_color_code("zzzzzz"), None);
        assert_eq!(parse_color_code("00ff00"), Some(0x00FF00));
    }
}
