//! Check pigsty files: load each one and report the first error with its location.
//!
//! Usage:
//!   pigsty_check [OPTIONS] [FILE.pigsty ...]
//!   pigsty_check < file.pigsty
//!
//! Options:
//!   --dump, -d     Print the loaded entries back in pigsty syntax
//!   --strict, -s   Reject text outside of blocks
//!
//! If no files are given, reads from stdin. Exit code 1 if any file fails to load.

use pigsty::dump::to_pigsty_text;
use pigsty::{load_with, LoadOptions};
use std::io::{self, Read};

fn take_flag(args: &mut Vec<String>, long: &str, short: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == long || a == short) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn check(name: &str, src: &[u8], options: &LoadOptions, dump: bool) -> bool {
    match load_with(src, options) {
        Ok(pigsty) => {
            eprintln!("{}: {} entries", name, pigsty.len());
            if !dump {
                return true;
            }
            match to_pigsty_text(&pigsty) {
                Ok(text) => {
                    print!("{}", text);
                    true
                }
                Err(e) => {
                    eprintln!("{}: dump error: {}", name, e);
                    false
                }
            }
        }
        Err(e) => {
            eprintln!("{}: error: {}", name, e);
            false
        }
    }
}

fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let dump = take_flag(&mut args, "--dump", "-d");
    let options = LoadOptions {
        allow_stray_text: !take_flag(&mut args, "--strict", "-s"),
        ..LoadOptions::default()
    };

    let mut failed = 0usize;
    if args.is_empty() {
        let mut src = Vec::new();
        io::stdin().read_to_end(&mut src)?;
        if !check("<stdin>", &src, &options, dump) {
            failed += 1;
        }
    } else {
        for path in &args {
            let src = match std::fs::read(path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("{}: {}", path, e);
                    failed += 1;
                    continue;
                }
            };
            if !check(path, &src, &options, dump) {
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("pigsty_check: {} file(s) rejected", failed);
        std::process::exit(1);
    }
    Ok(())
}
