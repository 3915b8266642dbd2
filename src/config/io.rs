//! Opslag en inlezen van configuratiebestanden (JSON).
//!
//! Inladen is alles-of-niets: een bestand dat structureel niet klopt wordt in
//! zijn geheel geweigerd zodat de zittende sessiestaat intact blijft.
//! Achtergebleven payloadvelden binnen een vlakconfiguratie zijn daarentegen
//! goedaardig en worden bij het normaliseren opgeruimd.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::chain::ChainConfiguration;

/// Result-type voor bestands-I/O van configuraties.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Beschrijft fouten bij het lezen of schrijven van een configuratiebestand.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Het document kon niet als JSON gelezen of geschreven worden.
    #[error("JSON-fout: {0}")]
    Json(#[from] serde_json::Error),
    /// Het document is wel JSON maar structureel ongeldig.
    #[error("ongeldige configuratie: {0}")]
    Invalid(String),
}

/// Het bestandsformaat: de kettingconfiguratie plus de geordende lijst
/// modelreferenties die de schakellijst bepaalt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedConfiguration {
    pub chain_config: ChainConfiguration,
    pub model_urls: Vec<String>,
}

impl SavedConfiguration {
    /// Serialiseert naar het JSON-bestandsformaat.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Leest en valideert een configuratiebestand. De kettingconfiguratie
    /// wordt genormaliseerd en moet in lengte overeenkomen met de
    /// modellijst.
    pub fn from_json(input: &str) -> ConfigResult<Self> {
        let parsed: Self = serde_json::from_str(input)?;

        if parsed.model_urls.is_empty() {
            return Err(ConfigError::Invalid(
                "modellijst is leeg; een ketting heeft minimaal één schakel".to_owned(),
            ));
        }

        let chain_config = parsed.chain_config.normalized().ok_or_else(|| {
            ConfigError::Invalid(
                "kettinglengte en schakellijst spreken elkaar tegen".to_owned(),
            )
        })?;

        if chain_config.chain_length != parsed.model_urls.len() {
            return Err(ConfigError::Invalid(format!(
                "configuratie beschrijft {} schakels maar de modellijst telt er {}",
                chain_config.chain_length,
                parsed.model_urls.len()
            )));
        }

        Ok(Self {
            chain_config,
            model_urls: parsed.model_urls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SavedConfiguration};
    use crate::config::chain::ChainConfiguration;
    use crate::config::material::Material;

    fn sample() -> SavedConfiguration {
        SavedConfiguration {
            chain_config: ChainConfiguration::create_default(2).set_material(1, Material::Gold),
            model_urls: vec!["part1".to_owned(), "part3".to_owned()],
        }
    }

    #[test]
    fn round_trip_is_identity() {
        let saved = sample();
        let json = saved.to_json().expect("serialiseer bestand");
        let back = SavedConfiguration::from_json(&json).expect("parse bestand");
        assert_eq!(saved, back);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            SavedConfiguration::from_json("{ dit is geen json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let mut saved = sample();
        saved.model_urls.push("part2".to_owned());
        let json = saved.to_json().expect("serialiseer bestand");

        assert!(matches!(
            SavedConfiguration::from_json(&json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn empty_model_list_is_rejected() {
        let json = r#"{ "chainConfig": { "chainLength": 1, "links": [] }, "modelUrls": [] }"#;
        assert!(matches!(
            SavedConfiguration::from_json(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_surface_keys_are_filled_on_load() {
        let json = r##"{
            "chainConfig": {
                "chainLength": 1,
                "links": [{ "material": "gold", "surfaces": { "top1": { "type": "empty" } } }]
            },
            "modelUrls": ["part1"]
        }"##;

        let saved = SavedConfiguration::from_json(json).expect("parse bestand");
        let link = &saved.chain_config.links[0];
        assert_eq!(link.surfaces.len(), 4);
        assert_eq!(link.material, Material::Gold);
    }
}
