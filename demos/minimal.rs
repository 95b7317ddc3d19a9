use declargs::{Error, Parser, flag, kv, pos, schema};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).compact().init();

    let schema = schema()
        .arg(kv("output").short("-o").long("--output").string().default("out.txt"))
        .arg(flag("verbose").short("-v").long("--verbose"))
        .arg(kv("count").short("-n").long("--count").number().default(10))
        .arg(pos("input").string())
        .build()
        .unwrap_or_else(|e| Error::from(e).exit());

    let parsed = Parser::new(&schema)
        .parse(std::env::args().skip(1))
        .unwrap_or_else(|e| Error::from(e).exit());

    println!("Input:   {}", parsed.strings("input").join(", "));
    println!("Output:  {}", parsed.get_string("output").unwrap_or_default());
    println!("Verbose: {}", parsed.flag("verbose"));
    println!("Count:   {}", parsed.get_number("count").unwrap_or_default());
}
