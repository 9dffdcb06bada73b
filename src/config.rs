//! Run configuration, loadable from TOML.
//!
//! All fields have defaults, so an empty file (or no file) is a valid
//! configuration. Command-line flags override file values.
//!
//! ## Example
//!
//! ```toml
//! [input]
//! concept-column = "Concept"
//!
//! [graph]
//! method = "adjusted"
//! synonyms = "max"
//! missing-data = "ignore"
//!
//! [community]
//! method = "louvain"
//! seed = 42
//!
//! [search]
//! strategy = "adaptive"
//! initial-value = 0.5
//! increment = 0.05
//! ```

use crate::error::GrapeError;
use crate::synthesis::SynthesisOptions;
use clap::ValueEnum;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// How pairwise weights are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GraphMethod {
    /// Policy-driven concept similarity mixed by proximity/sharing weights
    #[default]
    Adjusted,
    /// Share of commonly attested concepts with a shared cognate set
    Unadjusted,
}

/// Aggregation of per-pair overlap when a language has synonyms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SynonymPolicy {
    #[default]
    Average,
    Min,
    Max,
}

/// Treatment of a concept one of two languages has no data for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MissingDataPolicy {
    /// Concept counts as completely dissimilar
    #[default]
    #[serde(alias = "max_dist")]
    MaxDistance,
    /// Concept counts as identical
    Identical,
    /// Concept is left out of the average
    Ignore,
}

/// Community detection algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CommunityMethod {
    /// Stochastic, seedable
    #[default]
    Louvain,
    /// Deterministic greedy modularity
    Greedy,
}

/// Resolution search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStrategy {
    #[default]
    Fixed,
    Dynamic,
    Adaptive,
}

/// Field delimiter of the cognate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Delimiter {
    /// Sniffed from the header line
    #[default]
    Auto,
    Tab,
    Comma,
    Semicolon,
}

// =#========================================================================#=
// SECTIONS
// =#========================================================================#=
/// Input table layout. The table is read as UTF-8.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct InputConfig {
    pub language_column: String,
    pub concept_column: String,
    pub cognateset_column: String,
    pub delimiter: Delimiter,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            language_column: "Language".to_string(),
            concept_column: "Parameter".to_string(),
            cognateset_column: "Cognateset".to_string(),
            delimiter: Delimiter::Auto,
        }
    }
}

/// Graph construction.
///
/// `synonyms` and `missing-data` are only meaningful for the adjusted
/// method; leaving them unset uses the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GraphConfig {
    pub method: GraphMethod,
    pub synonyms: Option<SynonymPolicy>,
    pub missing_data: Option<MissingDataPolicy>,
    pub proximity_weight: f64,
    pub sharing_factor: f64,
    /// Zero out weights at or below this value before community detection
    pub prune_threshold: Option<f64>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            method: GraphMethod::Adjusted,
            synonyms: None,
            missing_data: None,
            proximity_weight: 0.8,
            sharing_factor: 0.2,
            prune_threshold: None,
        }
    }
}

impl GraphConfig {
    pub fn synonym_policy(&self) -> SynonymPolicy {
        self.synonyms.unwrap_or_default()
    }

    pub fn missing_data_policy(&self) -> MissingDataPolicy {
        self.missing_data.unwrap_or_default()
    }
}

/// Community detection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CommunityConfig {
    pub method: CommunityMethod,
    /// Seed for stochastic methods; unseeded runs are not reproducible
    pub seed: Option<u64>,
}

/// Resolution search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SearchConfig {
    pub strategy: SearchStrategy,
    /// Start resolution; defaults to 0 for fixed, 0.1 otherwise
    pub initial_value: Option<f64>,
    /// Fixed and adaptive step size
    pub increment: f64,
    /// Dynamic multiplicative growth per step
    pub growth_factor: f64,
    /// Adaptive target community count; defaults to the number of languages
    pub target: Option<usize>,
    /// Adaptive lower bound on resolution
    pub floor: f64,
    pub max_iterations: usize,
    /// Dynamic: unchanged community counts in a row that mean convergence
    pub patience: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            strategy: SearchStrategy::Fixed,
            initial_value: None,
            increment: 0.1,
            growth_factor: 1.1,
            target: None,
            floor: 1e-3,
            max_iterations: 200,
            patience: 3,
        }
    }
}

impl SearchConfig {
    /// Start resolution for the configured strategy.
    pub fn initial_value(&self) -> f64 {
        self.initial_value.unwrap_or(match self.strategy {
            SearchStrategy::Fixed => 0.0,
            SearchStrategy::Dynamic | SearchStrategy::Adaptive => 0.1,
        })
    }

    /// Checks that the selected strategy can move the resolution.
    ///
    /// # Errors
    /// `GrapeError::Configuration` naming the offending key.
    pub fn validate(&self) -> Result<(), GrapeError> {
        let initial = self.initial_value();
        check_non_negative("initial-value", initial)?;
        if self.max_iterations == 0 {
            return Err(config_error("max-iterations must be at least 1".to_string()));
        }
        match self.strategy {
            SearchStrategy::Fixed => check_positive("increment", self.increment)?,
            SearchStrategy::Dynamic => {
                check_positive("initial-value", initial)?;
                if !(self.growth_factor.is_finite() && self.growth_factor > 1.0) {
                    return Err(config_error(format!(
                        "growth-factor must be greater than 1, got {}",
                        self.growth_factor
                    )));
                }
                if self.patience == 0 {
                    return Err(config_error("patience must be at least 1".to_string()));
                }
            }
            SearchStrategy::Adaptive => {
                check_positive("increment", self.increment)?;
                check_positive("floor", self.floor)?;
                if self.target == Some(0) {
                    return Err(config_error("target must be at least 1".to_string()));
                }
            }
        }
        Ok(())
    }
}

// =#========================================================================#=
// GRAPE CONFIG
// =#========================================================================#=
/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrapeConfig {
    pub input: InputConfig,
    pub graph: GraphConfig,
    pub community: CommunityConfig,
    pub search: SearchConfig,
    pub synthesis: SynthesisOptions,
}

impl GrapeConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, GrapeError> {
        toml::from_str(text).map_err(|e| GrapeError::Configuration(e.to_string()))
    }

    /// Reads a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GrapeError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks everything that does not depend on the data.
    ///
    /// # Errors
    /// [GrapeError::Configuration] describing the first problem found.
    pub fn validate(&self) -> Result<(), GrapeError> {
        let graph = &self.graph;
        if graph.method == GraphMethod::Unadjusted {
            if let Some(policy) = graph.synonyms {
                return Err(config_error(format!(
                    "synonym policy {:?} is not supported by the unadjusted graph method",
                    policy
                )));
            }
            if let Some(policy) = graph.missing_data {
                return Err(config_error(format!(
                    "missing-data policy {:?} is not supported by the unadjusted graph method",
                    policy
                )));
            }
        }
        check_non_negative("proximity-weight", graph.proximity_weight)?;
        check_non_negative("sharing-factor", graph.sharing_factor)?;
        if let Some(threshold) = graph.prune_threshold {
            check_non_negative("prune-threshold", threshold)?;
        }
        if graph.method == GraphMethod::Adjusted {
            if graph.proximity_weight == graph.sharing_factor {
                warn!("proximity-weight equals sharing-factor, every adjusted weight will be identical");
            }
            if (graph.proximity_weight + graph.sharing_factor - 1.0).abs() > 1e-9 {
                warn!("proximity-weight and sharing-factor do not sum to 1, weights may leave [0, 1]");
            }
        }

        self.search.validate()?;
        check_positive("synthesis scale", self.synthesis.scale)?;
        check_positive("synthesis epsilon", self.synthesis.epsilon)?;
        Ok(())
    }

    /// Checks the parts that depend on the number of languages.
    pub fn validate_for(&self, num_languages: usize) -> Result<(), GrapeError> {
        self.validate()?;
        if self.search.strategy == SearchStrategy::Adaptive {
            if let Some(target) = self.search.target {
                if target > num_languages {
                    return Err(config_error(format!(
                        "target {} exceeds the number of languages ({})",
                        target, num_languages
                    )));
                }
            }
        }
        Ok(())
    }
}

fn config_error(message: String) -> GrapeError {
    GrapeError::Configuration(message)
}

fn check_non_negative(name: &str, value: f64) -> Result<(), GrapeError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(config_error(format!("{} must be finite and non-negative, got {}", name, value)))
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), GrapeError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(config_error(format!("{} must be finite and positive, got {}", name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = GrapeConfig::from_toml_str("").unwrap();
        assert_eq!(config, GrapeConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sections_parse() {
        let config = GrapeConfig::from_toml_str(
            r#"
            [input]
            concept-column = "Concept"
            delimiter = "tab"

            [graph]
            synonyms = "max"
            missing-data = "ignore"

            [community]
            method = "greedy"

            [search]
            strategy = "adaptive"
            initial-value = 0.5
            target = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.input.concept_column, "Concept");
        assert_eq!(config.input.delimiter, Delimiter::Tab);
        assert_eq!(config.graph.synonym_policy(), SynonymPolicy::Max);
        assert_eq!(config.graph.missing_data_policy(), MissingDataPolicy::Ignore);
        assert_eq!(config.community.method, CommunityMethod::Greedy);
        assert_eq!(config.search.strategy, SearchStrategy::Adaptive);
        assert_eq!(config.search.initial_value(), 0.5);
        assert!(config.validate_for(4).is_ok());
        assert!(config.validate_for(3).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            GrapeConfig::from_toml_str("[graph]\nweighting = 3"),
            Err(GrapeError::Configuration(_))
        ));
    }

    #[test]
    fn test_unadjusted_with_policy_rejected() {
        let mut config = GrapeConfig::default();
        config.graph.method = GraphMethod::Unadjusted;
        assert!(config.validate().is_ok());

        config.graph.synonyms = Some(SynonymPolicy::Min);
        assert!(matches!(config.validate(), Err(GrapeError::Configuration(_))));
    }

    #[test]
    fn test_dynamic_needs_growth() {
        let mut config = GrapeConfig::default();
        config.search.strategy = SearchStrategy::Dynamic;
        assert!(config.validate().is_ok());

        config.search.growth_factor = 1.0;
        assert!(config.validate().is_err());

        config.search.growth_factor = 1.5;
        config.search.initial_value = Some(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = GrapeConfig::default();
        config.graph.proximity_weight = -0.1;
        assert!(config.validate().is_err());
    }
}
