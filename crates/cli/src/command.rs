use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gridcarve_extract::{
    closure, repair, BoundaryBfs, CarveReport, ClosureConfig, ClosureReport, OwnershipClassifier,
    RepairReport, SeedIndex,
};
use gridcarve_io::{
    load_allow_list, read_model, write_model, AllowListSpec, ColumnFilter, ModelDocument,
};
use gridcarve_model::{Element, ReferenceGraph};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "gridcarve",
    version,
    about = "Carve utility-scoped submodels out of a flat CIM/RDF grid model"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract a target utility's submodel via ownership labeling
    /// (multi-source BFS with boundary classification)
    Carve(CarveArgs),
    /// Extract an incremental submodel via category-gated joins from the
    /// allow-listed substations
    Incremental(IncrementalArgs),
    /// Inject elements a reduced file references but does not contain,
    /// pulling them transitively from the full model
    Repair(RepairArgs),
}

#[derive(Args)]
pub struct CarveArgs {
    /// Full source model (RDF/XML)
    #[arg(long)]
    pub model: PathBuf,

    #[command(flatten)]
    pub allow: AllowListArgs,

    /// Element category resolved against the allow-list names
    #[arg(long, default_value = "Substation")]
    pub seed_kind: String,

    /// Extracted submodel destination
    #[arg(long)]
    pub output: PathBuf,

    /// Write a JSON run report
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Args)]
pub struct IncrementalArgs {
    /// Full source model (RDF/XML)
    #[arg(long)]
    pub model: PathBuf,

    #[command(flatten)]
    pub allow: AllowListArgs,

    /// Element category resolved against the allow-list names
    #[arg(long, default_value = "Substation")]
    pub seed_kind: String,

    /// Relation excluded from seed-reference propagation; repeatable.
    /// Defaults to Substation.Region when not given.
    #[arg(long = "exclude-relation")]
    pub exclude_relations: Vec<String>,

    /// Extracted submodel destination
    #[arg(long)]
    pub output: PathBuf,

    /// Write a JSON run report
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Args)]
pub struct RepairArgs {
    /// The already-reduced model to repair
    #[arg(long)]
    pub partial: PathBuf,

    /// Full source model the missing elements are copied from
    #[arg(long)]
    pub model: PathBuf,

    /// Repaired model destination
    #[arg(long)]
    pub output: PathBuf,

    /// Write a JSON run report
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Args)]
pub struct AllowListArgs {
    /// Allow-list CSV with the target-owner names
    #[arg(long)]
    pub allowlist: PathBuf,

    /// Header of the name column
    #[arg(long, default_value = "ERCOT SUB NAME")]
    pub name_column: String,

    /// Header of an optional row-filter column
    #[arg(long, requires = "filter_value")]
    pub filter_column: Option<String>,

    /// Value rows must carry in the filter column
    #[arg(long, requires = "filter_column")]
    pub filter_value: Option<String>,
}

impl AllowListArgs {
    fn spec(&self) -> AllowListSpec {
        let filter = match (&self.filter_column, &self.filter_value) {
            (Some(column), Some(value)) => Some(ColumnFilter {
                column: column.clone(),
                value: value.clone(),
            }),
            _ => None,
        };
        AllowListSpec {
            name_column: self.name_column.clone(),
            filter,
        }
    }
}

pub fn run_carve(args: CarveArgs) -> Result<()> {
    let allow = load_allow_list(&args.allow.allowlist, &args.allow.spec())
        .with_context(|| format!("loading allow-list {}", args.allow.allowlist.display()))?;
    let (envelope, graph) = load_graph(&args.model)?;

    let index = SeedIndex::build(&graph, &args.seed_kind);
    let seeds = index.all_ids();
    let (targets, missing_names) = index.match_names(&allow.names);

    let outcome = BoundaryBfs.classify(&graph, &seeds, &targets);

    let selected: Vec<&Element> = graph
        .elements()
        .iter()
        .filter(|el| {
            el.id
                .as_deref()
                .is_some_and(|id| outcome.extraction.contains(id))
        })
        .collect();
    write_model(&args.output, &envelope.0, &envelope.1, &selected)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let report = CarveReport::new(
        allow.names.len(),
        seeds.len(),
        targets.len(),
        &missing_names,
        &outcome,
    );
    log::info!(
        "Carve done: {}/{} target names matched, {} elements extracted ({} boundary)",
        report.targets_matched,
        report.allow_list_names,
        report.extracted,
        report.boundary
    );
    emit_report(args.report.as_deref(), &report)
}

pub fn run_incremental(args: IncrementalArgs) -> Result<()> {
    let allow = load_allow_list(&args.allow.allowlist, &args.allow.spec())
        .with_context(|| format!("loading allow-list {}", args.allow.allowlist.display()))?;
    let (envelope, graph) = load_graph(&args.model)?;

    let mut config = ClosureConfig {
        seed_kind: args.seed_kind.clone(),
        ..ClosureConfig::default()
    };
    if !args.exclude_relations.is_empty() {
        config.excluded_relations = args.exclude_relations.iter().cloned().collect();
    }

    let outcome = closure(&graph, &allow.names, &config);

    let selected: Vec<&Element> = graph
        .elements()
        .iter()
        .enumerate()
        .filter(|(position, el)| {
            outcome.anonymous.contains(position)
                || el
                    .id
                    .as_deref()
                    .is_some_and(|id| outcome.extraction.contains(id))
        })
        .map(|(_, el)| el)
        .collect();
    write_model(&args.output, &envelope.0, &envelope.1, &selected)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let report = ClosureReport::new(allow.names.len(), &outcome);
    log::info!(
        "Incremental done: {}/{} names matched, {} elements extracted",
        report.seeds_matched,
        report.allow_list_names,
        report.extracted
    );
    emit_report(args.report.as_deref(), &report)
}

pub fn run_repair(args: RepairArgs) -> Result<()> {
    let (envelope, partial) = load_graph(&args.partial)?;
    let (_, full) = load_graph(&args.model)?;

    let outcome = repair(&partial, &full);

    let selected: Vec<&Element> = outcome.repaired.elements().iter().collect();
    write_model(&args.output, &envelope.0, &envelope.1, &selected)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let report = RepairReport::new(&outcome);
    log::info!(
        "Repair done: {} injected over {} levels, {} unresolved",
        report.injected,
        report.level_counts.len(),
        report.unresolved
    );
    if !report.unresolved_sample.is_empty() {
        log::warn!("Unresolved references:");
        for id in &report.unresolved_sample {
            log::warn!("   - {id}");
        }
        if report.unresolved_omitted > 0 {
            log::warn!("   ... ({} more)", report.unresolved_omitted);
        }
    }
    emit_report(args.report.as_deref(), &report)
}

type Envelope = (String, Vec<(String, String)>);

fn load_graph(path: &Path) -> Result<(Envelope, ReferenceGraph)> {
    let ModelDocument {
        root_tag,
        root_attrs,
        elements,
    } = read_model(path).with_context(|| format!("reading model {}", path.display()))?;
    Ok(((root_tag, root_attrs), ReferenceGraph::from_elements(elements)))
}

fn emit_report<T: Serialize>(path: Option<&Path>, report: &T) -> Result<()> {
    if let Some(path) = path {
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Report written to {}", path.display());
    }
    Ok(())
}
