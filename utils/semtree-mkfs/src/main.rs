use clap::Parser;
use semtree::{Engine, EngineOptions};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the container file to create
    #[arg(short, long)]
    device: String,

    /// Enable the write-back block cache
    #[arg(long)]
    cache: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let device = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&args.device)?;

    let options = EngineOptions { cache: args.cache };
    let engine = Engine::format(device, options)
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    engine.close().map_err(|err| std::io::Error::other(err.to_string()))?;

    println!("formatted {}", args.device);

    Ok(())
}
