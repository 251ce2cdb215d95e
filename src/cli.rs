//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for browsing and instantiating personas.

use clap::{Parser, Subcommand};

use gettsim_personas::persona::LinspaceParameter;

/// gettsim-personas - Example households for GETTSIM
///
/// Lists the bundled personas, instantiates them at a policy date and prints
/// their input data and target names as JSON.
#[derive(Parser, Debug)]
#[command(name = "gettsim-personas")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "GETTSIM_PERSONAS_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List bundled personas
    List {
        /// Only list personas available at this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Instantiate a persona and print it as JSON
    Show {
        /// Persona path, e.g. einkommensteuer_sozialabgaben.couple_1_child
        path: String,

        /// Date at which the policy environment is set up (YYYY-MM-DD)
        #[arg(short, long)]
        policy_date: String,

        /// Date at which derived inputs such as birth years are evaluated
        #[arg(short, long)]
        evaluation_date: Option<String>,

        /// Gross monthly wage per person: BOTTOM:TOP for a range, VALUE for a constant
        #[arg(long, num_args = 1.., value_parser = clap::value_parser!(LinspaceParameter))]
        bruttolohn: Vec<LinspaceParameter>,

        /// Number of grid points when --bruttolohn is given
        #[arg(short, long, default_value = "10", requires = "bruttolohn")]
        n_points: usize,
    },

    /// Instantiate a persona and overwrite inputs with data from a JSON file
    Upsert {
        /// Persona path
        path: String,

        /// Date at which the policy environment is set up (YYYY-MM-DD)
        #[arg(short, long)]
        policy_date: String,

        /// Date at which derived inputs are evaluated
        #[arg(short, long)]
        evaluation_date: Option<String>,

        /// JSON file holding a nested tree of columns
        #[arg(short, long)]
        data: String,
    },

    /// Instantiate every persona for every year and check the results
    Validate {
        /// First year to check (defaults to config)
        #[arg(long)]
        start_year: Option<i32>,

        /// Last year to check, inclusive (defaults to config)
        #[arg(long)]
        end_year: Option<i32>,
    },

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate,
}
