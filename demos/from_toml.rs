use declargs::{Result, Schema};
use tracing_subscriber::{EnvFilter, fmt};

const SCHEMA_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/server.toml");

fn run() -> Result<()> {
    let schema = Schema::from_toml_file(SCHEMA_PATH)?;
    let parsed = schema.parse(std::env::args().skip(1))?;

    let mut names: Vec<&str> = parsed.iter().map(|(name, _)| name).collect();
    names.sort_unstable();
    for name in names {
        let values: Vec<String> = parsed
            .get(name)
            .unwrap_or_default()
            .iter()
            .map(|v| v.to_string())
            .collect();
        println!("{} = [{}]", name, values.join(", "));
    }

    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    fmt().with_env_filter(filter).with_target(false).compact().init();

    if let Err(e) = run() {
        e.exit();
    }
}
