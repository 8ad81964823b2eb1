//! Loader fuzz target: feed arbitrary bytes to the pigsty loader.
//! The loader must not panic; it returns Ok(Pigsty) or Err(LoadError).
//! When it succeeds, dumping and reloading must give the same entries.
//! Build with: cargo fuzz run load_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    if let Ok(p) = pigsty::load(data) {
        let text = pigsty::dump::to_pigsty_text(&p).expect("loaded entries must dump");
        let again = pigsty::load(text.as_bytes()).expect("dump output must load");
        assert_eq!(p, again);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run load_fuzz");
}
