use clap::Parser;
use semtree::{Engine, EngineOptions, TOP_LEVEL};

#[derive(Parser, Debug)]
struct Args {
    /// Path to the container file to inspect
    device: String,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let device = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(&args.device)?;

    let mut engine = Engine::open(device, EngineOptions::default())
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    println!("Version: {:#06x}", engine.version());
    println!("Root index: {}", engine.root());
    println!("Max size: {} blocks", engine.max_size());
    println!("Free head: {}", engine.free_head());
    println!(
        "Free blocks: {}",
        engine
            .free_list_len()
            .map_err(|err| std::io::Error::other(err.to_string()))?
    );
    println!(
        "Top-level keys: {}",
        engine
            .count_keys(TOP_LEVEL)
            .map_err(|err| std::io::Error::other(err.to_string()))?
    );
    println!(
        "Top-level depth: {}",
        engine
            .depth(TOP_LEVEL)
            .map_err(|err| std::io::Error::other(err.to_string()))?
    );

    Ok(())
}
