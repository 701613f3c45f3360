use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "zipstream")]
#[command(version)]
#[command(about = "A streaming zip utility for pipes and files", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipstream -o out.zip a.txt b.txt       archive two files into out.zip\n  \
  zipstream -p src/main.rs | ssh host 'cat > out.zip'   stream an archive over a pipe\n  \
  zipstream -r -o site.zip public/       archive a directory tree")]
pub struct Cli {
    /// Files or directories to add
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Write archive to FILE
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write archive to stdout, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Recurse into directories
    #[arg(short = 'r')]
    pub recurse: bool,

    /// Junk paths (store file names only)
    #[arg(short = 'j')]
    pub junk_paths: bool,

    /// Compression level (0-9)
    #[arg(short = 'c', long = "level", default_value_t = 6,
          value_parser = clap::value_parser!(u32).range(0..=9))]
    pub level: u32,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }
}
