use std::io::{self, Write};

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::app::HarvestResult;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Plain,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_result(result: &HarvestResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_paths(paths: &[Utf8PathBuf]) -> io::Result<()> {
        Self::print_json(&paths)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub struct PlainOutput;

impl PlainOutput {
    pub fn print_paths(paths: &[Utf8PathBuf]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        for path in paths {
            writeln!(stdout, "{path}")?;
        }
        Ok(())
    }
}
