#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate pfs_core;

fuzz_target!(|data: &[u8]| {
    if let Ok(archive) = pfs_core::Archive::parse(data) {
        for entry in archive.entries() {
            let _ = archive.entry_data(entry);
        }
        let _ = archive.recover_key();
    }

    // Random bytes are not a PNG, but recovery must still terminate cleanly
    let _ = pfs_core::recover(data);
});
