use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use scorefill_core::document::HighlightColor;
use scorefill_core::models::template::TemplateGender;
use scorefill_export::options::FillOptions;
use scorefill_instruments::schema::ExtractionSchema;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorefillConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Template sections, concatenated in this order.
    #[serde(default)]
    pub sections: Vec<TemplateSection>,
    #[serde(default)]
    pub highlight: HighlightColor,
    #[serde(default)]
    pub superscript_ordinals: Option<bool>,
    /// Instrument id → extraction schema replacing the built-in one.
    #[serde(default)]
    pub schema_overrides: BTreeMap<String, ExtractionSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateSection {
    Fixed { path: PathBuf },
    Gendered { male: PathBuf, female: PathBuf },
}

impl TemplateSection {
    pub fn path_for(&self, gender: TemplateGender) -> &Path {
        match (self, gender) {
            (TemplateSection::Fixed { path }, _) => path,
            (TemplateSection::Gendered { male, .. }, TemplateGender::Male) => male,
            (TemplateSection::Gendered { female, .. }, TemplateGender::Female) => female,
        }
    }

    fn resolve_against(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        match self {
            TemplateSection::Fixed { path } => join(path),
            TemplateSection::Gendered { male, female } => {
                join(male);
                join(female);
            }
        }
    }
}

impl ScorefillConfig {
    pub fn fill_options(&self) -> FillOptions {
        FillOptions {
            highlight: self.highlight,
            superscript_ordinals: self
                .superscript_ordinals
                .unwrap_or(FillOptions::default().superscript_ordinals),
        }
    }

    /// Template paths for one report, in section order.
    pub fn template_paths(&self, gender: TemplateGender) -> Vec<PathBuf> {
        self.sections
            .iter()
            .map(|s| s.path_for(gender).to_path_buf())
            .collect()
    }
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("scorefill").join("config.json"))
}

/// Load and migrate a config file. Relative template paths are resolved
/// against the directory holding the file.
pub fn load_config(path: &Path) -> eyre::Result<ScorefillConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    let mut config = parse_config(&contents)?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for section in &mut config.sections {
        section.resolve_against(base);
    }

    tracing::debug!(
        path = %path.display(),
        sections = config.sections.len(),
        "config loaded"
    );
    Ok(config)
}

/// Parse config JSON of any known version.
pub fn parse_config(contents: &str) -> eyre::Result<ScorefillConfig> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    Ok(serde_json::from_value(migrated)?)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update scorefill."
        ));
    }

    // v0 → v1: flat template keys become an ordered section list
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;

        let male = obj.remove("male_template");
        let female = obj.remove("female_template");
        let wisc = obj.remove("wisc_template");

        let mut sections = Vec::new();
        match (male, female) {
            (Some(male), Some(female)) => sections.push(serde_json::json!({
                "type": "gendered",
                "male": male,
                "female": female,
            })),
            (Some(only), None) | (None, Some(only)) => {
                sections.push(serde_json::json!({ "type": "fixed", "path": only }))
            }
            (None, None) => {}
        }
        if let Some(wisc) = wisc {
            sections.push(serde_json::json!({ "type": "fixed", "path": wisc }));
        }

        obj.entry("sections")
            .or_insert(serde_json::Value::Array(sections));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (template keys to sections)");
    }

    Ok(json)
}
