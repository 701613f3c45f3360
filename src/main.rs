//! Main entry point for the zipstream CLI application.
//!
//! This binary provides a command-line interface for creating ZIP
//! archives, streaming the output to a local file or to stdout.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWrite;
use walkdir::WalkDir;

use flate2::Compression;
use zipstream::{Cli, ReaderSource, ZipStreamWriter};

/// Application entry point.
///
/// Parses command-line arguments and streams the archive to the
/// appropriate sink: a file (`-o`) or stdout (`-p`).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let inputs = collect_inputs(&cli)?;
    if inputs.is_empty() {
        bail!("nothing to archive");
    }

    let total = if cli.pipe {
        // Stream the archive to stdout; messages go to stderr only
        write_archive(tokio::io::stdout(), &inputs, &cli).await?
    } else {
        let output = cli
            .output
            .as_ref()
            .ok_or_else(|| anyhow!("specify an output file with -o, or stream to stdout with -p"))?;
        let file = fs::File::create(output)
            .await
            .with_context(|| format!("cannot create {}", output.display()))?;
        write_archive(file, &inputs, &cli).await?
    };

    // Display the final archive size
    if !cli.is_quiet() {
        eprintln!("\nArchive size: {}", format_size(total));
    }

    Ok(())
}

/// Expand the command-line FILES into the list of files to archive.
///
/// Directories are walked recursively with `-r` (in a deterministic
/// name-sorted order); without `-r` they are skipped with a warning.
fn collect_inputs(cli: &Cli) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    for path in &cli.files {
        if path.is_dir() {
            if cli.recurse {
                for dir_entry in WalkDir::new(path).sort_by_file_name() {
                    let dir_entry =
                        dir_entry.with_context(|| format!("cannot walk {}", path.display()))?;
                    if dir_entry.file_type().is_file() {
                        inputs.push(dir_entry.into_path());
                    }
                }
            } else if !cli.is_very_quiet() {
                eprintln!("Skipping directory: {} (use -r to recurse)", path.display());
            }
        } else {
            inputs.push(path.clone());
        }
    }

    Ok(inputs)
}

/// Stream all inputs into one ZIP archive written to `sink`.
///
/// Each file's content is read in chunks and compressed on the fly;
/// nothing is buffered beyond a single compressor output block.
///
/// # Arguments
///
/// * `sink` - Destination for the archive bytes
/// * `inputs` - Files to add, in order
/// * `cli` - Parsed command-line arguments
///
/// # Returns
///
/// The total number of bytes written to the sink.
async fn write_archive<W: AsyncWrite + Unpin>(
    sink: W,
    inputs: &[PathBuf],
    cli: &Cli,
) -> Result<u64> {
    let mut writer = ZipStreamWriter::with_compression(sink, Compression::new(cli.level));

    for path in inputs {
        let Some(name) = archive_entry_name(path, cli.junk_paths) else {
            if !cli.is_very_quiet() {
                eprintln!("Skipping: {} (no usable entry name)", path.display());
            }
            continue;
        };

        if !cli.is_quiet() {
            println!("   adding: {}", name);
        }

        let file = fs::File::open(path)
            .await
            .with_context(|| format!("cannot open {}", path.display()))?;
        writer
            .add_file(&name, ReaderSource::new(file))
            .await
            .with_context(|| format!("failed to add {} to the archive", name))?;
    }

    writer
        .finalize()
        .await
        .context("failed to finalize the archive")?;

    Ok(writer.bytes_emitted())
}

/// Derive the archive entry name for an input path.
///
/// With `-j` only the base file name is kept. Otherwise the path's
/// normal components are joined with `/`, which drops root and `.`/`..`
/// components so entries never escape the extraction directory.
///
/// # Returns
///
/// The entry name, or `None` if nothing usable remains (e.g. `/` or `..`).
fn archive_entry_name(path: &Path, junk_paths: bool) -> Option<String> {
    if junk_paths {
        return path.file_name().map(|s| s.to_string_lossy().into_owned());
    }

    let parts: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(1048576), "1.00 MB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
