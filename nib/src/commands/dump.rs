use std::path::PathBuf;

use nib_format::{Archive, DecodeOptions};

use crate::error::{Error, Result};

pub fn run(path: PathBuf, json: bool, options: &DecodeOptions) -> Result<()> {
    let archive =
        Archive::open_with_options(&path, options).map_err(|source| Error::OpenArchive {
            path: path.clone(),
            source,
        })?;

    if json {
        let out = serde_json::to_string_pretty(&archive.to_json())
            .map_err(|source| Error::Json { source })?;
        println!("{}", out);
        return Ok(());
    }

    println!(
        "NIBArchive {}: {} objects, {} keys, {} entries, {} class names",
        archive.version,
        archive.objects.len(),
        archive.keys.len(),
        archive.entries.len(),
        archive.class_names.len()
    );

    for (index, object) in archive.objects.iter().enumerate() {
        match archive.class_name(object) {
            Some(class_name) => println!("@{} {}", index, class_name.as_str()),
            None => println!("@{} <class #{}>", index, object.class_name_index),
        }

        let entries = match archive.object_entries(object) {
            Some(entries) => entries,
            None => {
                println!(
                    "    <entries {}+{} out of range>",
                    object.values_start_index, object.values_count
                );
                continue;
            }
        };

        for entry in entries {
            match archive.key(entry) {
                Some(key) => println!("    {} = {}", key, entry.value),
                None => println!("    <key #{}> = {}", entry.key_index, entry.value),
            }
        }
    }

    Ok(())
}
