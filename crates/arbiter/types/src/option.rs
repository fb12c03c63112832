//! Candidate actions the proxy pathway may select between.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Impact key every option must carry: relative economic effect.
pub const IMPACT_ECONOMY: &str = "economy";
/// Impact key every option must carry: ecological horizon in years.
pub const IMPACT_ECOLOGY_YEARS: &str = "ecology_years";

/// A candidate intervention with its ethical and impact metrics.
///
/// Immutable once built. `friction`, `reversibility`, `minimality`,
/// `fairness_idx` and `igr_score` are all in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOption")]
pub struct InterventionOption {
    id: String,
    description: String,
    impact: BTreeMap<String, f64>,
    friction: f64,
    reversibility: f64,
    minimality: f64,
    fairness_idx: f64,
    igr_score: f64,
    ethics_tags: Vec<String>,
}

#[derive(Deserialize)]
struct RawOption {
    id: String,
    #[serde(default)]
    description: String,
    impact: BTreeMap<String, f64>,
    friction: f64,
    reversibility: f64,
    minimality: f64,
    fairness_idx: f64,
    igr_score: f64,
    #[serde(default)]
    ethics_tags: Vec<String>,
}

impl TryFrom<RawOption> for InterventionOption {
    type Error = TypesError;

    fn try_from(raw: RawOption) -> Result<Self, Self::Error> {
        let mut builder = InterventionOption::builder(raw.id)
            .description(raw.description)
            .friction(raw.friction)
            .reversibility(raw.reversibility)
            .minimality(raw.minimality)
            .fairness_idx(raw.fairness_idx)
            .igr_score(raw.igr_score);
        for (key, value) in raw.impact {
            builder = builder.impact(key, value);
        }
        for tag in raw.ethics_tags {
            builder = builder.ethics_tag(tag);
        }
        builder.build()
    }
}

impl InterventionOption {
    pub fn builder(id: impl Into<String>) -> InterventionOptionBuilder {
        InterventionOptionBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn impact(&self) -> &BTreeMap<String, f64> {
        &self.impact
    }

    pub fn economy(&self) -> f64 {
        self.impact[IMPACT_ECONOMY]
    }

    pub fn ecology_years(&self) -> f64 {
        self.impact[IMPACT_ECOLOGY_YEARS]
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    pub fn reversibility(&self) -> f64 {
        self.reversibility
    }

    pub fn minimality(&self) -> f64 {
        self.minimality
    }

    pub fn fairness_idx(&self) -> f64 {
        self.fairness_idx
    }

    pub fn igr_score(&self) -> f64 {
        self.igr_score
    }

    pub fn ethics_tags(&self) -> &[String] {
        &self.ethics_tags
    }
}

/// Builder for [`InterventionOption`]. Validation happens in [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct InterventionOptionBuilder {
    id: String,
    description: String,
    impact: BTreeMap<String, f64>,
    friction: f64,
    reversibility: f64,
    minimality: f64,
    fairness_idx: f64,
    igr_score: f64,
    ethics_tags: Vec<String>,
}

impl InterventionOptionBuilder {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            impact: BTreeMap::new(),
            friction: 0.0,
            reversibility: 0.0,
            minimality: 0.0,
            fairness_idx: 0.0,
            igr_score: 0.0,
            ethics_tags: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn impact(mut self, key: impl Into<String>, value: f64) -> Self {
        self.impact.insert(key.into(), value);
        self
    }

    /// Set both required impact keys at once.
    pub fn economy_ecology(self, economy: f64, ecology_years: f64) -> Self {
        self.impact(IMPACT_ECONOMY, economy)
            .impact(IMPACT_ECOLOGY_YEARS, ecology_years)
    }

    pub fn friction(mut self, value: f64) -> Self {
        self.friction = value;
        self
    }

    pub fn reversibility(mut self, value: f64) -> Self {
        self.reversibility = value;
        self
    }

    pub fn minimality(mut self, value: f64) -> Self {
        self.minimality = value;
        self
    }

    pub fn fairness_idx(mut self, value: f64) -> Self {
        self.fairness_idx = value;
        self
    }

    pub fn igr_score(mut self, value: f64) -> Self {
        self.igr_score = value;
        self
    }

    pub fn ethics_tag(mut self, tag: impl Into<String>) -> Self {
        self.ethics_tags.push(tag.into());
        self
    }

    pub fn build(self) -> Result<InterventionOption, TypesError> {
        let malformed = |reason: String| TypesError::MalformedOption {
            option_id: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(malformed("option id is empty".into()));
        }

        for key in [IMPACT_ECONOMY, IMPACT_ECOLOGY_YEARS] {
            match self.impact.get(key) {
                None => return Err(malformed(format!("missing impact key {key:?}"))),
                Some(value) if !value.is_finite() => {
                    return Err(malformed(format!("impact {key:?} is not finite")))
                }
                Some(_) => {}
            }
        }
        if let Some((key, _)) = self.impact.iter().find(|(_, v)| !v.is_finite()) {
            return Err(malformed(format!("impact {key:?} is not finite")));
        }

        let unit_metrics = [
            ("friction", self.friction),
            ("reversibility", self.reversibility),
            ("minimality", self.minimality),
            ("fairness_idx", self.fairness_idx),
            ("igr_score", self.igr_score),
        ];
        for (name, value) in unit_metrics {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(malformed(format!("{name} {value} outside [0, 1]")));
            }
        }

        Ok(InterventionOption {
            id: self.id,
            description: self.description,
            impact: self.impact,
            friction: self.friction,
            reversibility: self.reversibility,
            minimality: self.minimality,
            fairness_idx: self.fairness_idx,
            igr_score: self.igr_score,
            ethics_tags: self.ethics_tags,
        })
    }
}
