use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use humansize::{file_size_opts as size_opts, FileSize};
use nib_format::{Archive, DecodeOptions};

use crate::error::{Error, Result};

pub fn run(path: PathBuf, options: &DecodeOptions) -> Result<()> {
    let file = File::open(&path).map_err(|source| Error::ReadFile {
        path: path.clone(),
        source,
    })?;
    let len = file
        .metadata()
        .map_err(|source| Error::ReadFile {
            path: path.clone(),
            source,
        })?
        .len();

    let header = Archive::read_header(BufReader::new(file), options).map_err(|source| {
        Error::OpenArchive {
            path: path.clone(),
            source,
        }
    })?;

    let size = len
        .file_size(size_opts::BINARY)
        .unwrap_or_else(|_| format!("{} B", len));

    println!("Archive:  {}", path.display());
    println!("Version:  {}", header.version);
    println!("Size:     {} ({} bytes)", size, len);
    println!();
    println!("Section       Count     Offset");
    println!("------------  --------  ----------");
    for (section, info) in header.toc.iter() {
        println!(
            "{:12}  {:>8}  {:#010x}",
            section.to_string(),
            info.count,
            info.offset
        );
    }

    Ok(())
}
