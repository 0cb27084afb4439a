//! Two-pass enrichment pipeline: a search pass materializes every entity's
//! results before the extraction pass builds any prompt.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::llm::CompletionProvider;
use crate::serp::{SearchProvider, SearchRecord};
use crate::template::expand;

/// Inputs for one enrichment run.
#[derive(Debug, Clone)]
pub struct RunInput {
    /// Unique non-empty entity values, in source order.
    pub entities: Vec<String>,
    /// Search query template; `{column}` is bound to the entity.
    pub query_template: String,
    /// Column name substituted into the query template.
    pub column: String,
    /// Extraction prompt template.
    pub prompt_template: String,
    /// Placeholder name substituted into the prompt template. Independent of
    /// `column`: prompts conventionally use `{company}` whatever the column
    /// is called.
    pub prompt_placeholder: String,
    /// Pause after every search call, to respect provider rate limits.
    pub search_delay: Duration,
}

/// One extracted fact. Only entities with a non-empty extraction produce a
/// record; failed entities are omitted rather than recorded as null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub entity: String,
    pub extracted_info: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Search,
    Extraction,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Search => "search",
            Phase::Extraction => "extraction",
        })
    }
}

/// Why an entity degraded during the run. A search failure does not drop the
/// entity by itself (it proceeds with zero results); an extraction failure
/// drops it from the final table.
#[derive(Debug)]
pub struct EntityFailure {
    pub entity: String,
    pub phase: Phase,
    pub reason: String,
}

#[derive(Debug)]
pub struct RunReport {
    pub table: Vec<ExtractionRecord>,
    pub search_records: Vec<SearchRecord>,
    pub failures: Vec<EntityFailure>,
}

/// Missing required inputs, checked before any external call is made. These
/// are the only fatal errors; everything downstream is per-entity.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no entities to process")]
    NoEntities,

    #[error("query template is empty")]
    EmptyQueryTemplate,

    #[error("extraction prompt is empty")]
    EmptyPromptTemplate,
}

pub async fn run(
    search: &impl SearchProvider,
    llm: &impl CompletionProvider,
    input: &RunInput,
) -> Result<RunReport, PipelineError> {
    if input.entities.is_empty() {
        return Err(PipelineError::NoEntities);
    }
    if input.query_template.trim().is_empty() {
        return Err(PipelineError::EmptyQueryTemplate);
    }
    if input.prompt_template.trim().is_empty() {
        return Err(PipelineError::EmptyPromptTemplate);
    }

    let mut failures = Vec::new();

    let mut search_records: Vec<SearchRecord> = Vec::new();
    for entity in &input.entities {
        let query = expand(&input.query_template, &input.column, entity);
        info!(entity = %entity, query = %query, "searching");
        match search.search(entity, &query).await {
            Ok(records) => search_records.extend(records),
            Err(e) => {
                warn!(entity = %entity, error = %e, "search failed, entity proceeds with zero results");
                failures.push(EntityFailure {
                    entity: entity.clone(),
                    phase: Phase::Search,
                    reason: e.to_string(),
                });
            }
        }
        tokio::time::sleep(input.search_delay).await;
    }
    info!(hits = search_records.len(), "search pass complete");

    let mut table = Vec::new();
    for entity in &input.entities {
        let context = aggregate(&search_records, entity);
        let instruction = expand(&input.prompt_template, &input.prompt_placeholder, entity);
        info!(entity = %entity, context_chars = context.len(), "extracting");
        match llm.extract(&instruction, &context).await {
            Ok(extracted_info) => table.push(ExtractionRecord {
                entity: entity.clone(),
                extracted_info,
            }),
            Err(e) => {
                warn!(entity = %entity, error = %e, "extraction failed, entity omitted from table");
                failures.push(EntityFailure {
                    entity: entity.clone(),
                    phase: Phase::Extraction,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        rows = table.len(),
        failures = failures.len(),
        "run complete"
    );
    Ok(RunReport {
        table,
        search_records,
        failures,
    })
}
