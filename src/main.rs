use clap::Parser;

fn main() {
    let cli = proxy_from_env::cli::Cli::parse();
    if let Err(e) = proxy_from_env::cmd::dispatch(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
