//! Allocation accounting: loading (successfully or not) and dropping a pigsty
//! must return every byte it allocated.

use pigsty::{load, FieldIndex, Pigsty};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

struct Counting;

thread_local! {
    static LIVE: Cell<isize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let p = System.alloc(layout);
        if !p.is_null() {
            let _ = LIVE.try_with(|n| n.set(n.get() + layout.size() as isize));
        }
        p
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        let _ = LIVE.try_with(|n| n.set(n.get() - layout.size() as isize));
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

fn live() -> isize {
    LIVE.with(|n| n.get())
}

/// Bytes still allocated on this thread after running `f`.
fn leaked<F: FnOnce()>(f: F) -> isize {
    let before = live();
    f();
    live() - before
}

const VALID: &[u8] = br#"
< signature = "valid signature", ip.version = 4, ip.tos = 5, ip.src = 127.0.0.1 >
< signature = "second", ip.payload = "\x00\x01\x02", ip.tlen = 0x14 >
"#;

const INVALID_LATE: &[u8] = br#"
< signature = "valid signature", ip.version = 4, ip.tos = 5, ip.src = 127.0.0.1 >
< signature = "second", ip.version = 4, ip.tlen = 20a >
"#;

// Single test so no other test thread skews the counters.
#[test]
fn no_bytes_retained() {
    // Warm up lazily initialised state (pest, log) before measuring.
    let _ = load(VALID);
    let _ = load(INVALID_LATE);

    assert_eq!(
        leaked(|| {
            let p = load(VALID).expect("load");
            assert_eq!(p.len(), 2);
            drop(p);
        }),
        0
    );

    assert_eq!(
        leaked(|| {
            assert!(load(INVALID_LATE).is_err());
        }),
        0
    );

    assert_eq!(
        leaked(|| {
            assert!(load(b"< ip.version = 4, < >").is_err());
        }),
        0
    );

    assert_eq!(
        leaked(|| {
            let mut p = Pigsty::new();
            p.append_entry("oink").append_field(FieldIndex::IpVersion, b"abc");
            p.append_entry("roc!").append_field(FieldIndex::IpTos, b"xyz.");
            p.clear();
            assert!(p.is_empty());
            drop(p);
        }),
        0
    );

    assert_eq!(leaked(|| drop(Pigsty::new())), 0);
}
