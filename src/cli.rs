use std::path::PathBuf;

use clap::Parser;
use gridfetch_plan::CrosswordType;

/// Sydney Morning Herald crossword downloader.
#[derive(Parser)]
#[command(
    name = "gridfetch",
    version,
    about = "Download Sydney Morning Herald crosswords as Across Lite .puz files"
)]
pub struct Cli {
    /// Crossword types to download.
    #[arg(value_enum, num_args = 1.., default_value = "cryptic")]
    pub types: Vec<CrosswordType>,

    /// Single date or inclusive range in the form START:END. Accepts most
    /// formats; defaults to today in Sydney.
    #[arg(short, long)]
    pub date: Option<String>,

    /// Output directory, or filename when a single crossword is requested.
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_types_and_range() {
        let cli = Cli::try_parse_from([
            "gridfetch",
            "cryptic",
            "quick",
            "--date",
            "1/2/2025:5/2/2025",
            "-o",
            "puzzles",
        ])
        .unwrap();
        assert_eq!(cli.types, vec![CrosswordType::Cryptic, CrosswordType::Quick]);
        assert_eq!(cli.date.as_deref(), Some("1/2/2025:5/2/2025"));
        assert_eq!(cli.output, PathBuf::from("puzzles"));
    }

    #[test]
    fn defaults_to_cryptic_today_here() {
        let cli = Cli::try_parse_from(["gridfetch"]).unwrap();
        assert_eq!(cli.types, vec![CrosswordType::Cryptic]);
        assert_eq!(cli.date, None);
        assert_eq!(cli.output, PathBuf::from("."));
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(Cli::try_parse_from(["gridfetch", "sudoku"]).is_err());
    }
}
