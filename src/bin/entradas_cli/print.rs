#![deny(clippy::all, clippy::pedantic)]

use entradas_admin::application::notice::Notice;
use serde::Serialize;

use crate::client::CliError;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value).map_err(|e| CliError::Output(e.to_string()))?;
    println!("{out}");
    Ok(())
}

/// Notices go to stderr so stdout stays parseable.
pub fn print_notice(notice: Option<&Notice>) {
    if let Some(notice) = notice {
        eprintln!("{}", notice.message());
    }
}
