//! File compression example.
//!
//! Run with:
//!     cargo run --example gzip_file -- /path/to/file [level]

use std::env;
use std::fs::File;
use std::io::BufWriter;

use gzstream::{WriterConfig, compress};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());
    let level = match env::args().nth(2) {
        Some(level) => level.parse()?,
        None => 9,
    };
    let target = format!("{}.gz", path);

    println!("Compressing file: {} -> {}\n", path, target);

    let source = File::open(&path)?;
    let metadata = source.metadata()?;
    println!("File size: {} bytes", metadata.len());

    // Custom config for a smaller staging buffer
    let config = WriterConfig::new(level, 64 * 1024)?;

    let sink = BufWriter::new(File::create(&target)?);
    let total_in = compress(source, sink, &config)?;
    let total_out = File::open(&target)?.metadata()?.len();

    println!("Compressed size: {} bytes (level {})", total_out, level);
    if total_in > 0 {
        println!("Ratio: {:.1}%", total_out as f64 * 100.0 / total_in as f64);
    }

    Ok(())
}
