use proptest::prelude::*;

use claimdrop_types::{CampaignStats, NormalizedIdentity, Signature, WalletAddress};

proptest! {
    /// Normalizing an already-normalized identity without a leading marker is a no-op.
    #[test]
    fn normalize_is_stable(raw in "[A-Za-z0-9_]{1,15}") {
        let once = NormalizedIdentity::normalize(&raw).unwrap();
        let twice = NormalizedIdentity::normalize(once.as_str()).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Marker, case and padding never change which identity a handle maps to.
    #[test]
    fn decorations_map_to_same_identity(
        raw in "[a-z0-9_]{1,15}",
        pad_left in " {0,3}",
        pad_right in " {0,3}",
        marker in proptest::bool::ANY,
    ) {
        let decorated = format!(
            "{pad_left}{}{}{pad_right}",
            if marker { "@" } else { "" },
            raw.to_uppercase()
        );
        let a = NormalizedIdentity::normalize(&raw).unwrap();
        let b = NormalizedIdentity::normalize(&decorated).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Normalized identities never carry surrounding whitespace or uppercase letters.
    #[test]
    fn normalized_form_is_canonical(raw in "[ @A-Za-z0-9_\\t]{1,24}") {
        if let Ok(id) = NormalizedIdentity::normalize(&raw) {
            prop_assert_eq!(id.as_str().trim(), id.as_str());
            prop_assert_eq!(id.as_str().to_lowercase(), id.as_str());
            prop_assert!(!id.as_str().is_empty());
        }
    }

    /// Wallet parsing only strips surrounding whitespace.
    #[test]
    fn wallet_parse_preserves_body(body in "[1-9A-HJ-NP-Za-km-z]{32,44}") {
        let padded = format!("  {body}\n");
        let wallet = WalletAddress::parse(&padded).unwrap();
        prop_assert_eq!(wallet.as_str(), body.as_str());
    }

    /// Signature hex encoding roundtrips.
    #[test]
    fn signature_hex_roundtrip(bytes in prop::collection::vec(0u8.., 64)) {
        let mut arr = [0u8; 64];
        arr.copy_from_slice(&bytes);
        let sig = Signature(arr);
        let parsed: Signature = sig.to_hex().parse().unwrap();
        prop_assert_eq!(parsed, sig);
    }

    /// `remaining` never underflows and always complements `claimed`.
    #[test]
    fn stats_remaining_complements_claimed(capacity in 1u64..10_000, claimed in 0u64..10_000) {
        let stats = CampaignStats::new(capacity, claimed);
        if claimed <= capacity {
            prop_assert_eq!(stats.claimed + stats.remaining, capacity);
        } else {
            prop_assert_eq!(stats.remaining, 0);
        }
    }
}
