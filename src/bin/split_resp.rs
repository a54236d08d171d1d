// src/bin/split_resp.rs
use std::process::ExitCode;

use chart_split::{cli, config::{Job, consts::RESP_DIR}};

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    chart_split::log::init();

    let dir = cli::input_dir(RESP_DIR)?;
    cli::run(Job::resp_actors(dir))
}
