use clap::Parser;
use wbxml_tool::cli::{run_cli, Cli};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    if let Err(err) = run_cli(cli) {
        eprintln!("wbxml: {err:#}");
        std::process::exit(1);
    }
}
