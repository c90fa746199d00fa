#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use entradas_admin::domain::uploads::Upload;

use crate::args::PasswordArgs;
use crate::client::CliError;

pub fn read_opt_value(
    val: Option<String>,
    file: Option<PathBuf>,
) -> Result<Option<String>, CliError> {
    if let Some(path) = file {
        let data = fs::read_to_string(&path).map_err(|source| CliError::InputFile {
            path: path.display().to_string(),
            source,
        })?;
        return Ok(Some(data));
    }
    Ok(val)
}

/// The file wins over the environment. A trailing newline in the file is
/// dropped; other whitespace is kept.
pub fn read_password(args: &PasswordArgs) -> Result<String, CliError> {
    if let Some(path) = &args.password_file {
        let data = fs::read_to_string(path).map_err(CliError::PasswordFile)?;
        return Ok(data.trim_end_matches(['\r', '\n']).to_string());
    }
    args.password_env.clone().ok_or(CliError::MissingPassword)
}

pub fn read_upload(path: Option<&Path>) -> Result<Option<Upload>, CliError> {
    path.map(Upload::from_path).transpose().map_err(Into::into)
}
