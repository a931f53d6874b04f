// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to handle reading and writing files.

pub mod write;

use std::path::{Path, PathBuf};

use log::{trace, warn};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileWriteError {
    #[error("Cannot write to the specified file '{file}'. Do you have write permissions set?")]
    FileNotWritable { file: String },

    #[error(
        "Couldn't create directory '{0}' for output files. Do you have write permissions set?"
    )]
    NewDirectory(PathBuf),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

/// Test whether a file can be written to, creating any missing parent
/// directories. A file that doesn't already exist isn't left behind.
pub(crate) fn can_write_to_file(file: &Path) -> Result<(), FileWriteError> {
    trace!("Testing whether we can write to {}", file.display());
    let file_exists = file.exists();

    // Make the directories leading up to the file; if this fails, then we
    // can't write the file anyway.
    if let Some(p) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        match std::fs::DirBuilder::new()
            .recursive(true)
            .create(p)
            .map_err(|e| e.kind())
        {
            Ok(()) => (),
            Err(std::io::ErrorKind::PermissionDenied) => {
                return Err(FileWriteError::NewDirectory(p.to_path_buf()))
            }
            Err(e) => return Err(FileWriteError::IO(e.into())),
        }
    }

    match std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(file)
        .map_err(|e| e.kind())
    {
        Ok(_) => {
            if file_exists {
                warn!("Will overwrite the existing file '{}'", file.display());
            } else {
                std::fs::remove_file(file)?;
            }
            Ok(())
        }

        Err(std::io::ErrorKind::PermissionDenied) => Err(FileWriteError::FileNotWritable {
            file: file.display().to_string(),
        }),

        Err(e) => Err(FileWriteError::IO(e.into())),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn writable_files_are_not_left_behind() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("new").join("dirs").join("image.txt");
        can_write_to_file(&file).unwrap();
        assert!(file.parent().unwrap().exists());
        assert!(!file.exists());

        std::fs::write(&file, "keep").unwrap();
        can_write_to_file(&file).unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "keep");
    }
}
