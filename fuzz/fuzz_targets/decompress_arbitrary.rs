#![no_main]

use libfuzzer_sys::fuzz_target;
use gzstream::{Error, Format, Reader, ReaderConfig};

fuzz_target!(|data: Vec<u8>| {
    for format in [Format::Gzip, Format::Zlib, Format::Raw] {
        for buffer_size in [1, 16, 4096] {
            let config = ReaderConfig::new(buffer_size).unwrap().with_format(format);
            let mut reader = Reader::with_config(&data[..], config).unwrap();
            let mut buf = [0u8; 31];
            let mut total = 0u64;

            // Arbitrary input must end cleanly or with an error, never hang or panic
            let failure = loop {
                match reader.read_stream(&mut buf) {
                    Ok(progress) => {
                        total += progress.written as u64;
                        if progress.finished {
                            break None;
                        }
                    }
                    Err(e) => break Some(e),
                }
            };

            // Verify: errors are sticky and close reports them
            match failure {
                Some(first) => {
                    assert!(!matches!(first, Error::Io(_)));
                    let again = reader.read_stream(&mut buf).unwrap_err();
                    assert_eq!(first.to_string(), again.to_string());
                    assert!(reader.close().is_err());
                }
                None => {
                    assert_eq!(reader.total_out(), total);
                    assert!(reader.close().is_ok());
                }
            }
        }
    }
});
