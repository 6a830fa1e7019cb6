//! Content catalog loading and validation.
//!
//! Scenario content is authored in YAML and deserialized straight into
//! [`ContentCatalog`]. Structural problems are caught here, before any
//! simulation exists, so a bad content file fails at startup instead of
//! mid-game. Dangling region or flag references inside effects are *not*
//! rejected: they degrade to skipped effects at run time.

use std::collections::BTreeSet;
use std::path::Path;

use singularity_types::{
    ContentCatalog, Effect, EventDefinition, FactionId, ProgressMetric, ResourceType,
};
use tracing::info;

/// Errors that can occur when loading or validating content.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the content file from disk.
    #[error("failed to read content file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse content YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A faction has no setup block.
    #[error("no setup for faction {0}")]
    MissingFaction(FactionId),

    /// A faction has more than one setup block.
    #[error("faction {0} is set up more than once")]
    DuplicateFaction(FactionId),

    /// A resource appears where the faction's vocabulary does not allow it.
    #[error("{faction} cannot hold {resource:?} ({context})")]
    ForeignResource {
        /// The faction.
        faction: FactionId,
        /// The offending resource.
        resource: ResourceType,
        /// Where it was found.
        context: String,
    },

    /// Two definitions share an id.
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId {
        /// Kind of definition (action, event, region).
        kind: &'static str,
        /// The repeated id.
        id: String,
    },

    /// An event definition is malformed.
    #[error("event `{event}` is invalid: {message}")]
    InvalidEvent {
        /// The event id.
        event: String,
        /// What is wrong with it.
        message: String,
    },

    /// A starting amount or cost is negative or not finite.
    #[error("invalid amount {value} for {context}")]
    InvalidAmount {
        /// Where the amount was found.
        context: String,
        /// The amount.
        value: f64,
    },

    /// A starting value exceeds the scenario's authored maximum.
    #[error("{context} starts at {value}, above the limit {limit}")]
    AboveLimit {
        /// Where the value was found.
        context: String,
        /// The starting value.
        value: f64,
        /// The authored maximum.
        limit: f64,
    },

    /// The scenario allows zero turns.
    #[error("scenario max_turns must be at least 1")]
    ZeroTurnLimit,
}

impl From<serde_yml::Error> for CatalogError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Load and validate a catalog from a YAML file.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file cannot be read, or any error
/// from [`parse_catalog`].
pub fn load_catalog(path: &Path) -> Result<ContentCatalog, CatalogError> {
    let contents = std::fs::read_to_string(path)?;
    let catalog = parse_catalog(&contents)?;
    info!(
        path = %path.display(),
        scenario = %catalog.scenario.name,
        actions = catalog.actions.len(),
        events = catalog.events.len(),
        regions = catalog.regions.len(),
        "Content catalog loaded"
    );
    Ok(catalog)
}

/// Parse and validate a catalog from a YAML string.
///
/// # Errors
///
/// Returns [`CatalogError::Yaml`] for malformed YAML, or any error from
/// [`validate_catalog`].
pub fn parse_catalog(yaml: &str) -> Result<ContentCatalog, CatalogError> {
    let catalog: ContentCatalog = serde_yml::from_str(yaml)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Check a catalog for structural problems.
///
/// # Errors
///
/// Returns the first [`CatalogError`] found.
pub fn validate_catalog(catalog: &ContentCatalog) -> Result<(), CatalogError> {
    if catalog.scenario.max_turns == 0 {
        return Err(CatalogError::ZeroTurnLimit);
    }
    validate_factions(catalog)?;
    validate_scenario_amounts(catalog)?;
    validate_regions(catalog)?;
    validate_actions(catalog)?;
    validate_events(catalog)?;
    Ok(())
}

fn validate_factions(catalog: &ContentCatalog) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for setup in &catalog.factions {
        if !seen.insert(setup.faction) {
            return Err(CatalogError::DuplicateFaction(setup.faction));
        }
        let context = format!("{} setup", setup.faction);
        for (&resource, &amount) in &setup.resources {
            check_vocabulary(setup.faction, resource, &context)?;
            check_amount(amount, || format!("{context} {resource:?}"))?;
        }
        let meter_max = catalog.scenario.limits.meter_max;
        for (meter, &amount) in &setup.meters {
            check_amount(amount, || format!("{context} {meter:?}"))?;
            if amount > meter_max {
                return Err(CatalogError::AboveLimit {
                    context: format!("{context} {meter:?}"),
                    value: amount,
                    limit: meter_max,
                });
            }
        }
    }
    for faction in FactionId::ALL {
        if !seen.contains(&faction) {
            return Err(CatalogError::MissingFaction(faction));
        }
    }
    Ok(())
}

fn validate_scenario_amounts(catalog: &ContentCatalog) -> Result<(), CatalogError> {
    let scenario = &catalog.scenario;
    for metric in ProgressMetric::ALL {
        check_amount(scenario.limits.cap(metric), || {
            format!("{} limit", metric.short_name())
        })?;
        if let Some(&amount) = scenario.starting_progress.get(&metric) {
            check_amount(amount, || format!("starting {}", metric.short_name()))?;
        }
    }
    check_amount(scenario.limits.meter_max, || String::from("meter limit"))?;
    for (market, &amount) in &scenario.markets {
        check_amount(amount, || format!("market {market}"))?;
    }
    Ok(())
}

fn validate_regions(catalog: &ContentCatalog) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for region in &catalog.regions {
        if !seen.insert(&region.id) {
            return Err(CatalogError::DuplicateId {
                kind: "region",
                id: region.id.to_string(),
            });
        }
        for (stat, &amount) in &region.stats {
            check_amount(amount, || format!("region {} {stat:?}", region.id))?;
        }
    }
    Ok(())
}

fn validate_actions(catalog: &ContentCatalog) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for action in &catalog.actions {
        if !seen.insert(&action.id) {
            return Err(CatalogError::DuplicateId {
                kind: "action",
                id: action.id.to_string(),
            });
        }
        let context = format!("cost of action `{}`", action.id);
        for (&resource, &amount) in &action.cost {
            check_vocabulary(action.faction, resource, &context)?;
            check_amount(amount, || context.clone())?;
        }
        check_effects(&action.effects, &format!("action `{}`", action.id))?;
    }
    Ok(())
}

fn validate_events(catalog: &ContentCatalog) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for event in &catalog.events {
        if !seen.insert(&event.id) {
            return Err(CatalogError::DuplicateId {
                kind: "event",
                id: event.id.to_string(),
            });
        }
        validate_event(event)?;
    }
    Ok(())
}

fn validate_event(event: &EventDefinition) -> Result<(), CatalogError> {
    let invalid = |message: String| CatalogError::InvalidEvent {
        event: event.id.to_string(),
        message,
    };
    if !event.weight.is_finite() || event.weight <= 0.0 {
        return Err(invalid(format!("weight {} must be positive", event.weight)));
    }
    if event.options.is_empty() {
        return Err(invalid(String::from("has no options")));
    }
    if let Some(max) = event.max_turn.filter(|&max| max < event.min_turn) {
        return Err(invalid(format!(
            "min_turn {} is after max_turn {max}",
            event.min_turn
        )));
    }
    for option in &event.options {
        check_effects(
            &option.effects,
            &format!("event `{}` option `{}`", event.id, option.label),
        )?;
    }
    Ok(())
}

fn check_effects(effects: &[Effect], context: &str) -> Result<(), CatalogError> {
    for effect in effects {
        if let Effect::AddResource {
            faction, resource, ..
        } = effect
        {
            check_vocabulary(*faction, *resource, context)?;
        }
    }
    Ok(())
}

fn check_vocabulary(
    faction: FactionId,
    resource: ResourceType,
    context: &str,
) -> Result<(), CatalogError> {
    if faction.uses_resource(resource) {
        Ok(())
    } else {
        Err(CatalogError::ForeignResource {
            faction,
            resource,
            context: context.to_owned(),
        })
    }
}

fn check_amount(value: f64, context: impl FnOnce() -> String) -> Result<(), CatalogError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidAmount {
            context: context(),
            value,
        })
    }
}
