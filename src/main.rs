use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let demo = std::env::args().nth(1).unwrap_or_default();
    match demo.as_str() {
        "cell_sorting" => cellular_potts_rs::examples::cell_sorting::run(),
        "migration" => cellular_potts_rs::examples::migration::run(),
        _ => {
            eprintln!("usage: cellular-potts-rs <cell_sorting|migration>");
            std::process::exit(2);
        }
    }
}
