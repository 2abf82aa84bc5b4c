use std::path::{Path, PathBuf};

use nib_format::{Archive, DecodeOptions};
use rayon::prelude::*;

use crate::error::{Error, Result};

const NIB_EXTENSION: &str = "nib";

fn collect_archives(paths: Vec<PathBuf>, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut out = vec![];

    for path in paths.into_iter() {
        if !path.is_dir() {
            out.push(path);
            continue;
        }

        if !recursive {
            return Err(Error::IsDirectory { path });
        }

        for entry in jwalk::WalkDir::new(&path).sort(true) {
            let entry = entry.map_err(|e| Error::WalkDirectory {
                path: path.clone(),
                message: e.to_string(),
            })?;
            let entry_path = entry.path();
            if entry_path.is_file()
                && entry_path.extension().and_then(|x| x.to_str()) == Some(NIB_EXTENSION)
            {
                out.push(entry_path);
            }
        }
    }

    Ok(out)
}

/// Decode, re-encode and compare. Returns the archive size on success.
fn validate_one(path: &Path, options: &DecodeOptions) -> Result<usize> {
    let original = std::fs::read(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let archive =
        Archive::decode_with_options(&original[..], options).map_err(|source| {
            Error::OpenArchive {
                path: path.to_path_buf(),
                source,
            }
        })?;

    let encoded = archive.encode().map_err(|source| Error::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    if encoded != original {
        let offset = encoded
            .iter()
            .zip(original.iter())
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| encoded.len().min(original.len()));
        return Err(Error::Mismatch {
            path: path.to_path_buf(),
            offset,
        });
    }

    Ok(original.len())
}

pub fn run(
    paths: Vec<PathBuf>,
    recursive: bool,
    verbose: bool,
    options: &DecodeOptions,
) -> Result<()> {
    let archives = collect_archives(paths, recursive)?;
    if archives.is_empty() {
        return Err(Error::NothingToValidate);
    }

    let results: Vec<(&PathBuf, Result<usize>)> = archives
        .par_iter()
        .map(|path| (path, validate_one(path, options)))
        .collect();

    let mut failed = 0;
    for (path, result) in results.iter() {
        match result {
            Ok(len) => {
                if verbose {
                    println!("ok      {} ({} bytes)", path.display(), len);
                }
            }
            Err(e) => {
                failed += 1;
                println!("FAILED  {}", path.display());
                let mut source: Option<&dyn std::error::Error> = Some(e);
                while let Some(err) = source {
                    println!("        {}", err);
                    source = err.source();
                }
            }
        }
    }

    tracing::info!(total = archives.len(), failed, "validation finished");

    if failed > 0 {
        return Err(Error::ValidationFailed {
            failed,
            total: archives.len(),
        });
    }

    println!("{} archives OK", archives.len());
    Ok(())
}
