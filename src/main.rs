use std::env;

use rustycw::tracing_init::init_tracing;
use rustycw::{decode_signal, read_wav_file, DecoderConfig};

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <recording.wav>", args[0]);
        std::process::exit(1);
    }
    let path: &str = &args[1];

    let buffer = match read_wav_file(path) {
        Ok(buffer) => buffer,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    let result = decode_signal(&buffer.samples, buffer.sample_rate, &DecoderConfig::default());

    match serde_json::to_string(&result) {
        Ok(json) => println!("{json}"),
        Err(error) => {
            eprintln!("failed to serialize result: {error}");
            std::process::exit(1);
        }
    }
}
