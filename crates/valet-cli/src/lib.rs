//! Valet CLI
//!
//! `valet extract <file.html>` prints the records bound in a document as JSON.
//! `valet apply <file.html> <records.json>` writes records into a document and
//! prints the resulting HTML.
//!
//! Both commands attach one engine to `<body>`; `--root <target>` rebinds it
//! (`@parent`, `@root`, or an element id) and `--config <file.json>` loads a
//! `BindConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use valet_bind::{BindConfig, EngineId, Page, Record};
use valet_html::HtmlSerializer;

/// Extract and apply microdata records on HTML files
#[derive(Debug, Parser)]
#[command(name = "valet", author, version, about, long_about = None)]
pub struct Cli {
    /// Rebind the engine: `@parent`, `@root`, or an element id
    #[arg(long, global = true, value_name = "TARGET")]
    pub root: Option<String>,

    /// Binding configuration (JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do with the document
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the records bound in an HTML file as JSON
    Extract {
        /// HTML input
        input: PathBuf,
    },
    /// Write JSON records into an HTML file and print the result
    Apply {
        /// HTML input
        input: PathBuf,
        /// JSON object mapping item ids to records
        records: PathBuf,
    },
}

impl Cli {
    /// Execute the command and return what should be printed
    pub fn run(&self) -> Result<String> {
        let config = match &self.config {
            Some(path) => {
                BindConfig::from_json(&read(path)?)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => BindConfig::default(),
        };
        let root = self.root.as_deref();

        match &self.command {
            Command::Extract { input } => extract(&read(input)?, root, config),
            Command::Apply { input, records } => {
                let html = read(input)?;
                apply(&html, &read(records)?, root, config)
            }
        }
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Load `html` into a page with one engine on `<body>`
fn bound_page(html: &str, root: Option<&str>, config: BindConfig) -> Result<(Page, EngineId)> {
    let document = valet_html::parse(html).context("parsing HTML")?;
    let body = document
        .body()
        .ok_or_else(|| anyhow!("document has no body"))?;

    let mut page = Page::new(document);
    let engine = page.attach(body, config);
    if let Some(target) = root {
        page.bind(engine, target)
            .with_context(|| format!("binding to {target:?}"))?;
    }
    Ok((page, engine))
}

/// Records bound in `html`, as pretty JSON keyed by item id
pub fn extract(html: &str, root: Option<&str>, config: BindConfig) -> Result<String> {
    let (page, engine) = bound_page(html, root, config)?;
    let records: BTreeMap<&str, &Record> = page.engine(engine)?.records().collect();
    tracing::info!("extracted {} record(s)", records.len());
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Write the records in `records_json` (an object keyed by item id) into `html`
pub fn apply(html: &str, records_json: &str, root: Option<&str>, config: BindConfig) -> Result<String> {
    let records: BTreeMap<String, Record> =
        serde_json::from_str(records_json).context("parsing records")?;
    let (mut page, engine) = bound_page(html, root, config)?;

    for (item_id, record) in records {
        if page.engine(engine)?.scope(&item_id).is_none() {
            tracing::warn!("no scope for {}, record not written", item_id);
        }
        page.set(engine, &item_id, record)?;
    }

    let mut document = page.into_document();
    let reflected = document.tree_mut().reflect_values()?;
    tracing::debug!("reflected {} form value(s) into markup", reflected);
    Ok(HtmlSerializer::with_shadow_roots().serialize_inner(document.tree(), document.tree().root()))
}
