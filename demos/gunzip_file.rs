//! File decompression example.
//!
//! Run with:
//!     cargo run --example gunzip_file -- /path/to/file.gz

use std::env;
use std::fs::File;
use std::io::Write;

use gzstream::{Reader, version};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .ok_or("usage: gunzip_file <file.gz>")?;
    let target = path
        .strip_suffix(".gz")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.out", path));

    println!("Decompressing file: {} -> {} ({})\n", path, target, version());

    let mut reader = Reader::with_buffer_size(File::open(&path)?, 128 * 1024)?;
    let mut sink = File::create(&target)?;
    let mut buf = vec![0u8; 32 * 1024];
    let mut reads = 0;

    loop {
        let progress = reader.read_stream(&mut buf)?;
        sink.write_all(&buf[..progress.written])?;
        reads += 1;
        if progress.finished {
            break;
        }
    }
    let (total_in, total_out) = (reader.total_in(), reader.total_out());
    reader.close()?;
    sink.flush()?;

    println!(
        "Total: {} compressed bytes -> {} bytes in {} reads",
        total_in, total_out, reads
    );

    Ok(())
}
