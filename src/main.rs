use std::env;
use std::process;

use lootledger::cli;
use lootledger::config::AppConfig;
use lootledger::logging;

fn main() {
    let config = AppConfig::from_env();
    logging::init(&config);

    let args: Vec<String> = env::args().collect();
    process::exit(cli::run_with_config(&args, &config));
}
