use sheet_calc::{Character, Engine, EngineConfig};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

/// Reads a character as JSON from the file named on the command line (or
/// stdin) and prints the computed sheet as JSON.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "sheet_calc=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            buf
        }
    };

    let character: Character = serde_json::from_str(&input)?;
    let engine = Engine::new(EngineConfig::from_env());
    tracing::debug!(config = ?engine.config(), "computing sheet");

    match engine.compute(&character) {
        Ok(sheet) => println!("{}", serde_json::to_string_pretty(&sheet)?),
        Err(why) => {
            eprintln!("Error: {}", why);
            std::process::exit(1);
        }
    }
    Ok(())
}
