//! Job configuration. Loaded from TOML and passed explicitly into the
//! pipeline entry points; there is no ambient global state, so tests can
//! drive the pipeline with any column layout.

use serde::Deserialize;

use crate::error::PipelineError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    pub columns: ColumnsConfig,
    pub local: LocalConfig,
    pub api: ApiConfig,
    pub output: OutputConfig,
}

/// Column roles in the two vehicle datasets. The defaults are the fleet
/// system's actual schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnsConfig {
    /// Natural identifier shared by both sources.
    pub join_key: String,
    /// Inspection date; rows without it are incomplete.
    pub inspection_date: String,
    /// Sort/grouping attribute.
    pub group: String,
    /// Label classification ids (font-color trigger).
    pub label_ids: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            join_key: "kurzname".into(),
            inspection_date: "hu".into(),
            group: "gruppe".into(),
            label_ids: "labelIds".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalConfig {
    /// Path of the local vehicle export (semicolon-delimited CSV).
    pub file: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            file: "resources/vehicles.csv".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub base_url: String,
    pub login_path: String,
    pub vehicles_path: String,
    pub labels_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.baubuddy.de".into(),
            login_path: "/index.php/login".into(),
            vehicles_path: "/dev/index.php/v1/vehicles/select/active".into(),
            labels_path: "/dev/index.php/v1/labels".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving the timestamped report files.
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "output_data".into(),
        }
    }
}

impl JobConfig {
    pub fn from_toml(input: &str) -> Result<Self, PipelineError> {
        let config: JobConfig =
            toml::from_str(input).map_err(|e| PipelineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        let named = [
            ("columns.join_key", &self.columns.join_key),
            ("columns.inspection_date", &self.columns.inspection_date),
            ("columns.group", &self.columns.group),
            ("columns.label_ids", &self.columns.label_ids),
            ("local.file", &self.local.file),
            ("output.dir", &self.output.dir),
        ];
        for (field, value) in named {
            if value.is_empty() {
                return Err(PipelineError::ConfigValidation(format!(
                    "{field} must not be empty"
                )));
            }
        }

        // The join key is never a collision candidate; letting it double as
        // the date or group column would corrupt the merge.
        for (field, value) in [
            ("columns.inspection_date", &self.columns.inspection_date),
            ("columns.group", &self.columns.group),
        ] {
            if value == &self.columns.join_key {
                return Err(PipelineError::ConfigValidation(format!(
                    "{field} must differ from columns.join_key '{}'",
                    self.columns.join_key
                )));
            }
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(PipelineError::ConfigValidation(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        Ok(())
    }
}
