#![no_main]

use libfuzzer_sys::fuzz_target;
use nskv::{ShardedStore, Snapshot};

fuzz_target!(|data: &[u8]| {
    // Snapshot files are read back on every start, so arbitrary bytes must
    // either parse or produce an error, and a parsed snapshot must restore
    // into a store without panicking.
    if let Ok(snapshot) = Snapshot::from_bytes(data) {
        let expected = snapshot.len();
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(async {
            let store = ShardedStore::from_entries(4, snapshot.data).await;
            assert_eq!(store.len().await, expected);
        });
    }
});
