mod app;
mod cli;
mod commands;
mod output;

use std::fs::File;

use clap::Parser;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use crate::app::App;
use crate::cli::Cli;

fn init_logging(debug: bool) {
    freight_desk::paths::rotate_logs();
    let Some(path) = freight_desk::paths::log_file() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Failed to create log directory {}: {}", dir.display(), e);
            return;
        }
    }
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(level, Config::default(), file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file {}: {}", path.display(), e),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut app = match App::bootstrap(cli.api_url).await {
        Ok(app) => app,
        Err(e) => {
            log::error!("[cli] startup failed: {:#}", e);
            eprintln!("Ошибка: {:#}", e);
            std::process::exit(1);
        }
    };

    let result = commands::run(&mut app, cli.command).await;
    if let Err(e) = app.finish().await {
        log::error!("[cli] failed to end expired session: {:#}", e);
    }
    if let Err(e) = result {
        log::error!("[cli] {:#}", e);
        eprintln!("Ошибка: {}", e);
        std::process::exit(1);
    }
}
