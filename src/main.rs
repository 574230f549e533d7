fn main() {
    hkit_resilience::env_loader::load_dotenv();
    if let Err(err) = hkit_resilience::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
