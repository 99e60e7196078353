use proptest::prelude::*;

use gauge_types::{checked_mul_fixed, Address, Timestamp, FIXED_POINT_ONE};

proptest! {
    /// Address display output parses back to the same address.
    #[test]
    fn address_display_parses_back(bytes in prop::array::uniform20(0u8..)) {
        let addr = Address::new(bytes);
        let parsed: Address = addr.to_string().parse().unwrap();
        prop_assert_eq!(parsed, addr);
    }

    /// Address::is_zero is true only for all-zero bytes.
    #[test]
    fn address_is_zero_correct(bytes in prop::array::uniform20(0u8..)) {
        prop_assert_eq!(Address::new(bytes).is_zero(), bytes == [0u8; 20]);
    }

    /// Timestamp ordering matches the underlying seconds.
    #[test]
    fn timestamp_ordering_matches_secs(a in any::<u32>(), b in any::<u32>()) {
        prop_assert_eq!(Timestamp::new(a) < Timestamp::new(b), a < b);
    }

    /// Timestamp survives a bincode round trip (it is persisted inside checkpoints).
    #[test]
    fn timestamp_bincode_roundtrip(secs in any::<u32>()) {
        let ts = Timestamp::new(secs);
        let encoded = bincode::serialize(&ts).unwrap();
        let decoded: Timestamp = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, ts);
    }

    /// Scaling by a factor no greater than 1.0 never increases an amount.
    #[test]
    fn fixed_scale_at_most_one_never_grows(amount in any::<u128>(), factor in 0u128..=FIXED_POINT_ONE) {
        let scaled = checked_mul_fixed(amount, factor).unwrap();
        prop_assert!(scaled <= amount);
    }
}
