use map_subset::{Settings, run, setup_logging};

fn main() {
    setup_logging();
    let settings = Settings::from_cli();

    if let Err(e) = run(&settings) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
