// src/bin/split_sectors.rs
use std::process::ExitCode;

use chart_split::{cli, config::{Job, consts::SECTOR_DIR}};

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    chart_split::log::init();

    let dir = cli::input_dir(SECTOR_DIR)?;
    cli::run(Job::sector_groups(dir))
}
