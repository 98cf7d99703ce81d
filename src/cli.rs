//! The command line interface for exploring the listings.
use crate::dataset::Dataset;
use crate::listing::{Month, Region};
use crate::log;
use crate::output::{OutputFormat, Report};
use crate::query::{PriceRange, QueryEngine};
use crate::settings::Settings;
use crate::view::View;
use ::log::{debug, info};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for exploring the listings.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Options for reading the dataset and writing results
    #[command(flatten)]
    opts: DatasetOpts,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for reading the dataset and writing results
#[derive(Args, Default)]
pub struct DatasetOpts {
    /// Path to the listings file [default: from settings, else airbnb.csv]
    #[arg(short, long, global = true)]
    pub dataset: Option<PathBuf>,
    /// How to format the results
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// The dashboard pages, with the selections for each.
#[derive(Subcommand)]
pub enum ViewCommands {
    /// Describe the dataset.
    Intro,
    /// Show the best rated listings for a region, month and price range.
    Search {
        /// The autonomous community to search in (e.g. "Cataluña").
        region: Region,
        /// The month to search in (e.g. "Julio").
        month: Month,
        /// The lowest acceptable price per night.
        #[arg(long, default_value_t = 200.0)]
        min_price: f64,
        /// The highest acceptable price per night.
        #[arg(long, default_value_t = 500.0)]
        max_price: f64,
        /// How many listings to show [default: from settings, else 20]
        #[arg(short, long)]
        top: Option<usize>,
        /// Also list the rating and price of every listing in the region and month.
        #[arg(long)]
        all_prices: bool,
    },
    /// Compare mean prices across autonomous communities and months.
    Compare,
    /// Compare how prices are distributed in different months.
    MonthDistribution {
        /// The months to compare.
        #[arg(required = true)]
        months: Vec<Month>,
    },
    /// Compare how prices are distributed in different autonomous communities for one month.
    RegionDistribution {
        /// The month to compare prices for.
        month: Month,
        /// The autonomous communities to compare.
        #[arg(required = true)]
        regions: Vec<Region>,
    },
    /// Show the mean price in each month for the given autonomous communities.
    TimeSeries {
        /// The autonomous communities to compare.
        #[arg(required = true)]
        regions: Vec<Region>,
    },
    /// Show the mean price in each autonomous community for one month.
    Map {
        /// The month to show prices for.
        month: Month,
    },
}

impl ViewCommands {
    /// Convert into a [`View`], checking the user's selections
    pub fn into_view(self, settings: &Settings) -> Result<View> {
        let view = match self {
            Self::Intro => View::Intro,
            Self::Search {
                region,
                month,
                min_price,
                max_price,
                top,
                all_prices,
            } => View::Search {
                region,
                month,
                price_range: PriceRange::new(min_price, max_price)?,
                top: top.unwrap_or(settings.top_n),
                all_prices,
            },
            Self::Compare => View::GeneralComparison,
            Self::MonthDistribution { months } => View::MonthDistribution { months },
            Self::RegionDistribution { month, regions } => {
                View::RegionDistribution { month, regions }
            }
            Self::TimeSeries { regions } => View::TimeSeries { regions },
            Self::Map { month } => View::Map { month },
        };

        Ok(view)
    }
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Dashboard pages.
    #[command(flatten)]
    View(ViewCommands),
    /// Check that the dataset can be loaded.
    Validate,
    /// Manage the bundled example datasets.
    Example {
        /// The available subcommands for managing example datasets.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Manage program settings.
    Settings {
        /// The available subcommands for managing settings.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self, opts: &DatasetOpts) -> Result<()> {
        match self {
            Self::View(command) => {
                handle_view_command(command, opts, None, &mut io::stdout().lock())
            }
            Self::Validate => handle_validate_command(opts.dataset.as_deref(), None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ rental-explorer --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute(&cli.opts)
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Load the dataset from the given path, or the one named in the settings
fn load_dataset(dataset_path: Option<&Path>, settings: &Settings) -> Result<Dataset> {
    let dataset_path = dataset_path.unwrap_or(&settings.dataset_path);
    Dataset::from_path(dataset_path).context("Failed to load dataset.")
}

/// Handle one of the dashboard page commands, writing the results to `out`.
pub fn handle_view_command<W: Write>(
    command: ViewCommands,
    opts: &DatasetOpts,
    settings: Option<Settings>,
    out: &mut W,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger
    log::init(&settings.log_level).context("Failed to initialise logging.")?;

    // Check the selections before loading anything
    let view = command.into_view(&settings)?;

    let dataset = load_dataset(opts.dataset.as_deref(), &settings)?;
    let engine = QueryEngine::new(&dataset);
    debug!("Showing page: {}", view.title());

    let mut report = Report::new(opts.format, out);
    view.render(&engine, &mut report)?;

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(
    dataset_path: Option<&Path>,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger
    log::init(&settings.log_level).context("Failed to initialise logging.")?;

    // Load/validate the dataset
    let dataset = load_dataset(dataset_path, &settings)?;
    info!(
        "Dataset validation successful: {} listings across {} regions and {} months",
        dataset.len(),
        dataset.regions().len(),
        dataset.months().len()
    );

    Ok(())
}
