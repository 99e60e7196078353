#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Persisted ledgers are read back with bincode; malformed bytes must be
    // rejected without panicking.
    if let Ok(account) = bincode::deserialize::<gauge_twab::Account>(data) {
        if account.is_consistent() {
            let now = gauge_types::Timestamp::new(u32::MAX);
            let _ = account.balance_at(gauge_types::Timestamp::EPOCH, now);
            let _ = account.average_balance_between(gauge_types::Timestamp::EPOCH, now, now);
        }
    }
    let _ = bincode::deserialize::<gauge_twab::Checkpoint>(data);
    let _ = bincode::deserialize::<gauge_types::Timestamp>(data);
});
