use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Selects between the two pronoun variants of a gendered template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateGender {
    #[default]
    Male,
    Female,
}

impl fmt::Display for TemplateGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateGender::Male => f.write_str("male"),
            TemplateGender::Female => f.write_str("female"),
        }
    }
}

impl FromStr for TemplateGender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(TemplateGender::Male),
            "female" | "f" => Ok(TemplateGender::Female),
            other => Err(CoreError::UnknownGender(other.to_string())),
        }
    }
}
