use std::path::PathBuf;

use clap::Parser;
use datadiff_engine::Alignment;

#[derive(Parser, Debug)]
#[command(
    name = "datadiff",
    about = "Structural diff of two JSON or TOML documents",
    version
)]
pub struct Cli {
    /// The original document
    pub old: PathBuf,
    /// The changed document
    pub new: PathBuf,

    /// Input format; `auto` picks by file extension
    #[arg(long, default_value = "auto")]
    pub format: InputFormat,

    /// Unchanged items kept around each change
    #[arg(short = 'U', long)]
    pub context: Option<usize>,

    /// Sequence alignment algorithm
    #[arg(long)]
    pub algorithm: Option<AlgorithmArg>,

    /// Maximum nesting depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// TOML file with engine settings; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Auto,
    Json,
    Toml,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum AlgorithmArg {
    Lcs,
    Myers,
    Patience,
}

impl From<AlgorithmArg> for Alignment {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Lcs => Self::Lcs,
            AlgorithmArg::Myers => Self::Myers,
            AlgorithmArg::Patience => Self::Patience,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}
