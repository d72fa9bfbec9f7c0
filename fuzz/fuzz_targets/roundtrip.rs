#![no_main]

use std::io::Write;

use libfuzzer_sys::fuzz_target;
use gzstream::{Format, Reader, ReaderConfig, Writer, WriterConfig};

fuzz_target!(|data: Vec<u8>| {
    // Use the first byte to vary level, format and buffer sizes
    let seed = data.first().copied().unwrap_or(0) as usize;
    let level = (seed % 10) as i32;
    let format = [Format::Gzip, Format::Zlib, Format::Raw][seed % 3];
    let write_size = 1 + seed * 7;
    let read_size = 1 + (255 - seed) * 5;

    let config = WriterConfig::new(level, write_size).unwrap().with_format(format);
    let mut writer = Writer::with_config(Vec::new(), config).unwrap();
    for piece in data.chunks(1 + seed % 61) {
        writer.write_all(piece).unwrap();
        if seed % 5 == 0 {
            writer.sync().unwrap();
        }
    }
    let packed = writer.finish().unwrap();

    let config = ReaderConfig::new(read_size).unwrap().with_format(format);
    let mut reader = Reader::with_config(&packed[..], config).unwrap();
    let mut out = Vec::new();
    let mut buf = [0u8; 97];
    loop {
        let progress = reader.read_stream(&mut buf).unwrap();
        out.extend_from_slice(&buf[..progress.written]);
        if progress.finished {
            break;
        }
    }
    reader.close().unwrap();

    // Verify: output matches input exactly
    assert_eq!(out, data);
});
