use clap::Parser;
use std::path::PathBuf;

use watersteg::batch::RunOptions;
use watersteg::config::expand_path;

#[derive(Parser)]
#[command(name = "watersteg")]
#[command(
    author,
    version,
    about = "Apply a watermark and steganographic data to an image or a group of images",
    after_help = "The destination path must exist. Check an output with: steghide extract -sf <file>"
)]
pub struct Cli {
    /// Input file or input directory. Wildcards accepted
    #[arg(long)]
    pub source: String,

    /// Output path
    #[arg(long, default_value = ".")]
    pub destpath: String,

    /// Steghide passphrase
    #[arg(long)]
    pub passphrase: String,

    /// Message embedded by steghide and drawn as the watermark
    #[arg(long)]
    pub message: String,

    /// Overlay image composited by transformations 3 and 5
    #[arg(long)]
    pub overlay: String,

    /// Echo every external command before running it
    #[arg(long)]
    pub debug: bool,

    /// Only display error messages
    #[arg(long)]
    pub quiet: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Run options with `~` expanded in every path.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            source: expand_path(&self.source),
            destination: expand_path(&self.destpath),
            passphrase: self.passphrase.clone(),
            message: self.message.clone(),
            overlay: expand_path(&self.overlay),
        }
    }

    pub fn config_path(&self) -> Option<PathBuf> {
        self.config
            .as_deref()
            .map(|p| expand_path(&p.to_string_lossy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn destpath_defaults_to_current_directory() {
        let cli = Cli::parse_from([
            "watersteg",
            "--source",
            "img/*.jpg",
            "--passphrase",
            "secret phrase",
            "--message",
            "Hello !",
            "--overlay",
            "overlay.png",
        ]);
        let options = cli.run_options();
        assert_eq!(options.destination, PathBuf::from("."));
        assert_eq!(options.source, PathBuf::from("img/*.jpg"));
        assert_eq!(options.passphrase, "secret phrase");
        assert!(!cli.debug);
        assert!(!cli.quiet);
    }

    #[test]
    fn missing_required_flag_is_rejected() {
        let result = Cli::try_parse_from(["watersteg", "--source", "a.jpg", "--message", "m"]);
        assert!(result.is_err());
    }
}
