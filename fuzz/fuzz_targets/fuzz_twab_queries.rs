#![no_main]

use libfuzzer_sys::fuzz_target;

use gauge_twab::Account;
use gauge_types::Timestamp;

// Drive arbitrary balance changes and window queries through the TWAB engine.
// Balance changes may fail (underflow, overflow, out-of-order time); queries
// must never panic and averages must stay within the live u128 range.
fuzz_target!(|data: &[u8]| {
    if data.len() < 13 {
        return;
    }

    let capacity = u32::from(data[0]) + 1;
    let start = u32::from_le_bytes([data[1], data[2], data[3], data[4]]);
    let end = u32::from_le_bytes([data[5], data[6], data[7], data[8]]);
    let now = u32::from_le_bytes([data[9], data[10], data[11], data[12]]);

    let mut account = Account::new(capacity);
    let mut t = 0u32;

    for chunk in data[13..].chunks_exact(21) {
        let increase = chunk[0] & 1 == 1;
        let gap = u32::from_le_bytes([chunk[1], chunk[2], chunk[3], chunk[4]]);
        let mut amount_bytes = [0u8; 16];
        amount_bytes.copy_from_slice(&chunk[5..21]);
        let amount = u128::from_le_bytes(amount_bytes);

        t = t.saturating_add(gap % 100_000);
        let at = Timestamp::new(t);
        let savepoint = account.savepoint();
        let before = (chunk[0] & 2 == 2).then(|| account.clone());
        let _ = if increase {
            account.increase_balance(amount, at)
        } else {
            account.decrease_balance(amount, "fuzz underflow", at)
        };
        if let Some(before) = before {
            account.rollback(savepoint);
            assert_eq!(account, before);
        }
        assert!(account.is_consistent());
    }

    let now = Timestamp::new(now);
    let _ = account.balance_at(Timestamp::new(start), now);
    let _ = account.average_balance_between(Timestamp::new(start), Timestamp::new(end), now);
    let _ = account.average_balance_between(Timestamp::new(end), Timestamp::new(start), now);
});
