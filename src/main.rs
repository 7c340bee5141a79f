//! cushion-calc - CLI for fabric consumption and SKU generation.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cushion_calc::batch::{Batch, ItemQuery, SortDirection, SortKey};
use cushion_calc::config::{
    parse_positive, CalcConfig, FabricKind, AUDIT_EXIT_STATUS, FABRIC_WIDTHS,
};
use cushion_calc::detect::{DimensionDetector, KeywordTable};
use cushion_calc::engine::{calculate_all_widths, calculate_consumption, ensure_formula_audit};
use cushion_calc::generator::{export_rows, sku_csv_text, write_csv, write_json, ExportFormat};
use cushion_calc::model::CalculationResult;
use cushion_calc::sku::{
    generate_sku_items, validate_family, ArticleName, Finish, SkuVersion, KNOWN_FAMILIES,
};
use cushion_calc::store::{load_history, save_batch};
use cushion_calc::{process_file_with, CalcError, CushionItem};

/// Fabric consumption calculator for cushion covers and SKU code generator.
#[derive(Parser, Debug)]
#[command(name = "cushion-calc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Plain fabric: allow rotating plates when it saves fabric (default)
    #[arg(long, global = true, conflicts_with = "patterned")]
    plain: bool,

    /// Patterned fabric: never rotate plates
    #[arg(long, global = true)]
    patterned: bool,

    /// SKU algorithm version (v2, v3, v3.1)
    #[arg(long, global = true, default_value = "v3.1", value_parser = parse_sku_version)]
    sku_version: SkuVersion,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute one cushion on one fabric width, or on every standard width
    Calc {
        /// Cushion width (cm)
        #[arg(long, value_parser = parse_measure)]
        width: f64,

        /// Cushion height (cm)
        #[arg(long, value_parser = parse_measure)]
        height: f64,

        /// Fabric width (cm); all standard widths when omitted
        #[arg(long, value_parser = parse_measure)]
        fabric_width: Option<f64>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute every row of a spreadsheet and export the results
    Batch(BatchArgs),

    /// Save batches to, or reload them from, the history file
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Generate SKU codes, one per description line
    Sku {
        /// Family code prefix (e.g. CNSM)
        #[arg(short, long)]
        family: String,

        /// File with one description per line (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the CODIGO;DESCRIPCION;FAMILIA listing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compose an article name: FAMILY WxH FINISH FABRIC COLOR
    Article {
        /// Family (COJ, FUN, REL, COL, PLA)
        #[arg(long, default_value = "COJ")]
        family: String,

        #[arg(long, default_value = "")]
        width: String,

        #[arg(long, default_value = "")]
        height: String,

        /// Finish (S/VIVO, C/VIVO, PESTAÑA, CREMALLERA)
        #[arg(long, default_value = "S/VIVO", value_parser = parse_finish)]
        finish: Finish,

        #[arg(long, default_value = "")]
        fabric: String,

        #[arg(long, default_value = "")]
        color: String,
    },

    /// Run the formula audit only
    Audit,
}

#[derive(ClapArgs, Debug)]
struct BatchArgs {
    /// Input file (.xlsx, .xls, .ods, .csv or .json)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (.csv or .json); defaults to <input>_consumo.csv
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with extra width/height keywords
    #[arg(long)]
    keywords: Option<PathBuf>,

    /// Only export rows matching this text or WxH size
    #[arg(long)]
    search: Option<String>,

    /// Sort exported rows: "area" or a fabric width such as 280
    #[arg(long)]
    sort: Option<String>,

    /// Sort in descending order
    #[arg(long)]
    desc: bool,

    /// Validate only, don't write output
    #[arg(long)]
    validate: bool,
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// Compute a spreadsheet and append it to the history
    Save {
        #[arg(short, long)]
        input: PathBuf,

        /// History file
        #[arg(long, default_value = "history.json")]
        file: PathBuf,

        /// Batch name; defaults to "Lote <timestamp>"
        #[arg(long)]
        name: Option<String>,
    },

    /// Reload the history, recompute it and export it
    Load {
        /// History file
        #[arg(long, default_value = "history.json")]
        file: PathBuf,

        /// Output file (.csv or .json); stdout as JSON when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy)]
enum OutputKind {
    Csv,
    Json,
}

fn parse_measure(s: &str) -> std::result::Result<f64, CalcError> {
    parse_positive("measure", s)
}

fn parse_sku_version(s: &str) -> std::result::Result<SkuVersion, String> {
    SkuVersion::from_label(s).ok_or_else(|| format!("unknown SKU version '{s}'"))
}

fn parse_finish(s: &str) -> std::result::Result<Finish, String> {
    Finish::from_label(s).ok_or_else(|| format!("unknown finish '{s}'"))
}

fn parse_sort(s: &str) -> Result<SortKey> {
    if s.eq_ignore_ascii_case("area") {
        return Ok(SortKey::Dimensions);
    }
    let width: u32 = s
        .parse()
        .with_context(|| format!("Invalid sort key '{s}'"))?;
    if !FABRIC_WIDTHS.contains(&width) {
        anyhow::bail!("{width} is not a standard fabric width");
    }
    Ok(SortKey::Consumption(width))
}

fn load_detector(keywords: Option<&Path>) -> Result<DimensionDetector> {
    let Some(path) = keywords else {
        return Ok(DimensionDetector::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let extra: KeywordTable = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse keywords in {}", path.display()))?;
    Ok(DimensionDetector::new(
        &KeywordTable::default().extended_with(extra),
    ))
}

fn write_export(
    items: &[&CushionItem],
    output: Option<&Path>,
    fallback: OutputKind,
) -> Result<()> {
    let rows = export_rows(items.iter().copied());

    match output {
        Some(path) => {
            let format = ExportFormat::from_path(path)?;
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            match format {
                ExportFormat::Csv => write_csv(&rows, file)?,
                ExportFormat::Json => write_json(&rows, file)?,
            }
            info!("Generated: {}", path.display());
        }
        None => {
            let stdout = io::stdout().lock();
            match fallback {
                OutputKind::Csv => write_csv(&rows, stdout)?,
                OutputKind::Json => write_json(&rows, stdout)?,
            }
        }
    }
    Ok(())
}

fn print_result(result: &CalculationResult) {
    if result.is_valid {
        println!(
            "{:>4} cm  {:>2} plates  {:>4} cushions/strip  {:>7.2} cm  {:.4} m  ({})",
            result.fabric_width,
            result.plates_per_row,
            result.cushions_per_strip,
            result.consumption_cm,
            result.consumption_m,
            result.orientation
        );
    } else {
        println!("{:>4} cm  does not fit", result.fabric_width);
    }
}

fn run_calc(
    width: f64,
    height: f64,
    fabric_width: Option<f64>,
    json: bool,
    fabric: FabricKind,
) -> Result<()> {
    let results: Vec<CalculationResult> = match fabric_width {
        Some(fw) => vec![calculate_consumption(width, height, fw, fabric)],
        None => calculate_all_widths(width, height, fabric)
            .into_values()
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("Cushion {width}x{height} cm, {fabric} fabric");
        for result in &results {
            print_result(result);
        }
    }
    Ok(())
}

fn run_batch(args: BatchArgs, config: &CalcConfig) -> Result<()> {
    let detector = load_detector(args.keywords.as_deref())?;
    let (batch, validation) = process_file_with(&args.input, config, &detector)
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    for err in &validation.errors {
        error!("{}", err);
    }
    if !validation.passed {
        anyhow::bail!("Validation failed");
    }
    if args.validate {
        info!("Validation passed");
        return Ok(());
    }

    let query = ItemQuery {
        search: args.search,
        sort: args
            .sort
            .as_deref()
            .map(parse_sort)
            .transpose()?
            .map(|key| {
                let direction = if args.desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                (key, direction)
            }),
        ..Default::default()
    };
    let selected = query.apply(&batch.items);
    info!("Exporting {} of {} item(s)", selected.len(), batch.items.len());

    let output = args.output.unwrap_or_else(|| {
        let stem = args
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        args.input.with_file_name(format!("{stem}_consumo.csv"))
    });
    write_export(&selected, Some(&output), OutputKind::Csv)
}

fn run_history(action: HistoryAction, config: &CalcConfig) -> Result<()> {
    match action {
        HistoryAction::Save { input, file, name } => {
            let (batch, validation): (Batch, _) = cushion_calc::process_file(&input, config)
                .with_context(|| format!("Failed to process {}", input.display()))?;
            if !validation.passed {
                for err in &validation.errors {
                    error!("{}", err);
                }
                anyhow::bail!("Nothing to save");
            }
            let name = name.unwrap_or_else(|| {
                format!("Lote {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))
            });
            save_batch(&file, &batch.items, &name)
                .with_context(|| format!("Failed to save history to {}", file.display()))?;
        }
        HistoryAction::Load { file, output } => {
            let items = load_history(&file, config.fabric)
                .with_context(|| format!("Failed to load history from {}", file.display()))?;
            if items.is_empty() {
                warn!("No saved data in {}", file.display());
                return Ok(());
            }
            info!("Loaded {} item(s), recomputed as {} fabric", items.len(), config.fabric);
            let refs: Vec<&CushionItem> = items.iter().collect();
            write_export(&refs, output.as_deref(), OutputKind::Json)?;
        }
    }
    Ok(())
}

fn run_sku(
    family: &str,
    input: Option<&Path>,
    output: Option<&Path>,
    version: SkuVersion,
) -> Result<()> {
    validate_family(family)?;

    let text = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("Failed to read stdin")?,
    };

    let items = generate_sku_items(&text, family, version);
    for item in items.iter().filter(|i| !i.is_length_valid()) {
        warn!("Code {} exceeds the length limit", item.code);
    }
    info!("Generated {} code(s) with SKU {}", items.len(), version);

    let listing = sku_csv_text(&items)?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{listing}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Generated: {}", path.display());
        }
        None => writeln!(io::stdout(), "{listing}")?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    // Nothing runs if the formulas drifted
    if let Err(err) = ensure_formula_audit() {
        error!("STRICT_AUDIT_MISMATCH ({}): {}", err.code_value(), err);
        std::process::exit(AUDIT_EXIT_STATUS);
    }

    let fabric = FabricKind::from_patterned(args.patterned && !args.plain);
    let config = CalcConfig::new(fabric).with_sku_version(args.sku_version);

    match args.command {
        Command::Calc {
            width,
            height,
            fabric_width,
            json,
        } => run_calc(width, height, fabric_width, json, config.fabric),
        Command::Batch(batch_args) => run_batch(batch_args, &config),
        Command::History { action } => run_history(action, &config),
        Command::Sku {
            family,
            input,
            output,
        } => run_sku(&family, input.as_deref(), output.as_deref(), config.sku_version),
        Command::Article {
            family,
            width,
            height,
            finish,
            fabric,
            color,
        } => {
            if !KNOWN_FAMILIES
                .iter()
                .any(|(code, _)| code.eq_ignore_ascii_case(&family))
            {
                warn!("Family {} is not one of the standard families", family);
            }
            let name = ArticleName {
                width,
                height,
                finish: Some(finish),
                fabric,
                color,
                ..ArticleName::new(family)
            };
            println!("{name}");
            Ok(())
        }
        Command::Audit => {
            info!("Formulas match the reference cases");
            Ok(())
        }
    }
}
