//! CLI argument definitions for Data Dashboard Studio.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use dds_model::{AggregateOptions, ChartKind, SortOrder};

#[derive(Parser)]
#[command(
    name = "dds",
    version,
    about = "Data Dashboard Studio - summarise CSV data into charts and dashboards",
    long_about = "Import CSV files, group and total their columns, and arrange the\n\
                  results as charts on dashboards.\n\n\
                  Everything is saved as JSON under the store directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the saved data sources, summaries, charts and dashboards.
    #[arg(long = "store", value_name = "DIR", default_value = ".dds", global = true)]
    pub store: PathBuf,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import and manage data sources.
    #[command(subcommand)]
    Source(SourceCommand),

    /// Manage custom fields computed from expressions.
    #[command(subcommand)]
    Field(FieldCommand),

    /// Group a data source by one column and total another.
    Aggregate(AggregateArgs),

    /// Save aggregations for reuse.
    #[command(subcommand)]
    Summary(SummaryCommand),

    /// Draw saved summaries.
    #[command(subcommand)]
    Chart(ChartCommand),

    /// Arrange charts on a grid.
    #[command(subcommand)]
    Dashboard(DashboardCommand),
}

#[derive(Subcommand)]
pub enum SourceCommand {
    /// Import a CSV file with a header row.
    Import {
        #[arg(value_name = "CSV")]
        path: PathBuf,

        /// Name of the data source (default: file name without extension).
        #[arg(long)]
        name: Option<String>,
    },

    /// List data sources.
    List,

    /// Show a data source's columns and first rows.
    Show {
        id: String,

        /// Number of rows to preview.
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },

    /// Remove a data source with its summaries, charts and widgets.
    Remove { id: String },

    /// Rename a data source.
    Rename { id: String, name: String },
}

#[derive(Subcommand)]
pub enum FieldCommand {
    /// Add a custom field to a data source.
    ///
    /// Expressions reference columns by name or as [Column Name] and may
    /// use arithmetic, comparisons, `&` for concatenation and functions
    /// such as round, upper and if.
    Add {
        source: String,
        name: String,
        expression: String,
    },

    /// Remove a custom field.
    Remove { source: String, name: String },

    /// Evaluate an expression on the first rows without saving it.
    Check {
        source: String,
        expression: String,

        /// Number of rows to evaluate.
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
}

/// Options controlling how group keys are formed.
#[derive(Args, Clone, Copy)]
pub struct GroupingArgs {
    /// Treat group keys that differ only in case as the same key.
    #[arg(long = "normalize-case")]
    pub normalize_case: bool,

    /// Give rows with a blank group cell the key of the row above.
    #[arg(long = "fill-down")]
    pub fill_down: bool,
}

impl GroupingArgs {
    pub fn options(self) -> AggregateOptions {
        AggregateOptions::new()
            .with_normalize_case(self.normalize_case)
            .with_fill_down(self.fill_down)
    }
}

#[derive(Parser)]
pub struct AggregateArgs {
    /// Data source id.
    pub source: String,

    /// Column whose values become the group keys.
    #[arg(long = "group", value_name = "COLUMN")]
    pub group: String,

    /// Column to sum (or count, when it holds no numbers). Repeat for a
    /// side-by-side summary.
    #[arg(long = "value", value_name = "COLUMN", required = true)]
    pub value: Vec<String>,

    #[command(flatten)]
    pub grouping: GroupingArgs,

    /// Display order.
    #[arg(long = "sort", value_enum, default_value = "key-asc")]
    pub sort: SortArg,

    /// Show only the first N groups.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// Also write every group, in key order, to a CSV file.
    #[arg(long = "export", value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum SummaryCommand {
    /// Save a summary of a data source.
    Create {
        name: String,

        /// Data source id.
        #[arg(long = "source")]
        source: String,

        #[arg(long = "group", value_name = "COLUMN")]
        group: String,

        #[arg(long = "value", value_name = "COLUMN")]
        value: String,

        #[command(flatten)]
        grouping: GroupingArgs,
    },

    /// List saved summaries.
    List,

    /// Run a saved summary.
    Show {
        id: String,

        #[arg(long = "sort", value_enum, default_value = "key-asc")]
        sort: SortArg,

        #[arg(long = "limit", value_name = "N")]
        limit: Option<usize>,
    },

    /// Remove a summary with its charts and widgets.
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum ChartCommand {
    /// Create a chart from a saved summary.
    Create {
        title: String,

        /// Summary id.
        #[arg(long = "summary")]
        summary: String,

        #[arg(long = "kind", value_enum, default_value = "bar")]
        kind: ChartKindArg,

        #[arg(long = "sort", value_enum, default_value = "value-desc")]
        sort: SortArg,

        /// Keep only the first N points after sorting.
        #[arg(long = "limit", value_name = "N")]
        limit: Option<usize>,
    },

    /// List charts.
    List,

    /// Draw a chart.
    Show { id: String },

    /// Remove a chart and the widgets showing it.
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum DashboardCommand {
    /// Create an empty dashboard.
    Create { name: String },

    /// Place a chart on a dashboard.
    Add {
        dashboard: String,
        chart: String,

        /// Grid column (0-11).
        #[arg(long, default_value_t = 0)]
        x: u32,

        /// Grid row (default: below the existing widgets).
        #[arg(long)]
        y: Option<u32>,

        /// Width in grid columns.
        #[arg(long, default_value_t = 6)]
        w: u32,

        /// Height in grid rows.
        #[arg(long, default_value_t = 4)]
        h: u32,
    },

    /// Remove the widget at INDEX (as shown by `dashboard show`).
    RemoveWidget { dashboard: String, index: usize },

    /// List dashboards.
    List,

    /// Draw every chart on a dashboard.
    Show { id: String },

    /// Remove a dashboard.
    Remove { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    KeyAsc,
    KeyDesc,
    ValueAsc,
    ValueDesc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::KeyAsc => SortOrder::KeyAsc,
            SortArg::KeyDesc => SortOrder::KeyDesc,
            SortArg::ValueAsc => SortOrder::ValueAsc,
            SortArg::ValueDesc => SortOrder::ValueDesc,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ChartKindArg {
    Bar,
    Line,
    Pie,
    Table,
}

impl From<ChartKindArg> for ChartKind {
    fn from(arg: ChartKindArg) -> Self {
        match arg {
            ChartKindArg::Bar => ChartKind::Bar,
            ChartKindArg::Line => ChartKind::Line,
            ChartKindArg::Pie => ChartKind::Pie,
            ChartKindArg::Table => ChartKind::Table,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
