use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "citemd")]
#[command(version)]
#[command(about = "Turn the citations in a library backup into Markdown notes", long_about = None)]
#[command(after_help = "Examples:\n  \
  citemd reader-2024-05-01.bak     print notes from a disguised backup\n  \
  citemd -l library.zip            list what the archive contains\n  \
  RUST_LOG=citemd=debug citemd x.zip   trace each conversion step")]
pub struct Cli {
    /// Backup archive (.zip, or a .bak that is a renamed zip); only the first is converted
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// List archive entries instead of converting
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// More log output (-vv => debug)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "citemd=info,warn",
            (false, _) => "citemd=debug,info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_extra_files() {
        let cli = Cli::try_parse_from(["citemd", "a.bak", "b.zip"]).unwrap();
        assert_eq!(cli.files.len(), 2);
        assert!(!cli.list);
    }

    #[test]
    fn requires_a_file() {
        assert!(Cli::try_parse_from(["citemd"]).is_err());
    }

    #[test]
    fn verbosity_picks_log_filter() {
        let cli = Cli::try_parse_from(["citemd", "a.zip"]).unwrap();
        assert_eq!(cli.default_log_filter(), "warn");

        let cli = Cli::try_parse_from(["citemd", "-vv", "a.zip"]).unwrap();
        assert_eq!(cli.default_log_filter(), "citemd=debug,info");

        let cli = Cli::try_parse_from(["citemd", "-q", "a.zip"]).unwrap();
        assert_eq!(cli.default_log_filter(), "error");
    }
}
