//! Manual smoke-test harness: decode one file and print its header.
//! Not part of the crate's contract — a development aid only.

use std::env;
use std::fs::File;

fn main() {
    env_logger::init();

    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "decode_png".to_string());
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: {program} <path-to-png>");
            std::process::exit(1);
        }
    };

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("failed to open {path}: {err}");
            std::process::exit(1);
        }
    };

    match png_decoder::decode_reader(file) {
        Ok(image) => {
            println!(
                "{path}: {}x{} {:?}, {} bytes, has_gama={}",
                image.width,
                image.height,
                image.pixel_format,
                image.pixels.len(),
                image.has_gama
            );
        }
        Err(err) => {
            eprintln!("failed to decode {path}: {err}");
            std::process::exit(1);
        }
    }
}
