use declargs::{Result, Schema, flag, kv, pos, schema};
use tracing_subscriber::{EnvFilter, fmt};

fn server_schema() -> Result<Schema> {
    let schema = schema()
        .arg(kv("host").short("-H").long("--host").string().default("0.0.0.0"))
        .arg(kv("port").short("-p").long("--port").number().default(8080))
        .arg(kv("workers").short("-w").long("--workers").number().default(4))
        .arg(flag("verbose").short("-v").long("--verbose"))
        .arg(flag("quiet").short("-q").long("--quiet"))
        .arg(kv("log-file").short("-l").long("--log-file").string())
        .arg(kv("feature").short("-f").long("--feature").string())
        .arg(flag("tls").long("--tls"))
        .arg(kv("cert").long("--cert").string())
        .arg(kv("key").long("--key").string())
        .arg(pos("root").string().optional().default("."))
        .build()?;
    Ok(schema)
}

fn run() -> Result<()> {
    let schema = server_schema()?;
    let parsed = schema.parse(std::env::args().skip(1))?;

    // -vvv is not a thing here; each -v is its own occurrence
    let verbosity = parsed.bools("verbose").into_iter().filter(|v| *v).count();

    if parsed.flag("quiet") {
        return Ok(());
    }

    println!("Server Configuration:");
    println!("  Root: {}", parsed.get_string("root").unwrap_or("."));
    println!("  Host: {}", parsed.get_string("host").unwrap_or("0.0.0.0"));
    println!("  Port: {}", parsed.last("port").map(|v| v.to_string()).unwrap_or_default());
    println!("  Workers: {}", parsed.last("workers").map(|v| v.to_string()).unwrap_or_default());
    println!("  Verbosity: {}", verbosity);

    if let Some(f) = parsed.get_string("log-file") {
        println!("  Log file: {}", f);
    }

    let features = parsed.strings("feature");
    if !features.is_empty() {
        println!("  Features: {}", features.join(", "));
    }

    if parsed.flag("tls") {
        println!("  TLS: enabled");
        if let Some(cert) = parsed.get_string("cert") {
            println!("    Certificate: {}", cert);
        }
        if let Some(key) = parsed.get_string("key") {
            println!("    Private key: {}", key);
        }
    }

    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).compact().init();

    if let Err(e) = run() {
        e.exit();
    }
}
