use md5::{Digest, Md5};
use uuid::Uuid;

/// Prefix the game server hashes in front of a player name in offline mode.
pub const OFFLINE_PREFIX: &str = "OfflinePlayer:";

/// Derive the offline-mode UUID for `name`.
///
/// The payload is the UTF-8 of `OfflinePlayer:<name>` with no namespace
/// UUID in front of it, so this matches Java's `UUID.nameUUIDFromBytes`
/// rather than RFC 4122 `new_v3`.
pub fn offline_uuid(name: &str) -> Uuid {
    let mut hasher = Md5::new();
    hasher.update(OFFLINE_PREFIX.as_bytes());
    hasher.update(name.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hasher.finalize());
    Uuid::from_bytes(stamp_version_3(bytes))
}

/// Canonical lowercase hyphenated form used in on-disk file names.
pub fn offline_uuid_string(name: &str) -> String {
    format_uuid(&offline_uuid(name))
}

pub fn format_uuid(id: &Uuid) -> String {
    id.hyphenated().to_string()
}

fn stamp_version_3(mut bytes: [u8; 16]) -> [u8; 16] {
    bytes[6] = (bytes[6] & 0x0f) | 0x30;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors_match_reference_md5() {
        assert_eq!(
            offline_uuid_string("TNTbros101"),
            "32965ceb-5084-3608-b1c8-0bd04a9a83af"
        );
        assert_eq!(
            offline_uuid_string("Cartorson"),
            "a582e4fb-c7ae-3cfd-84e6-9f123b8baa3a"
        );
        assert_eq!(
            offline_uuid_string("MinecraftWiki"),
            "ba6309b1-aa7e-301c-9010-23623f1e76a0"
        );
    }

    #[test]
    fn version_and_variant_bits_are_fixed() {
        for name in ["", "a", "PhantomEnergy", "Jöns", "x y z", "ITTABD"] {
            let bytes = *offline_uuid(name).as_bytes();
            assert_eq!(bytes[6] >> 4, 0x3, "version nibble for {name:?}");
            assert_eq!(bytes[8] >> 6, 0b10, "variant bits for {name:?}");
        }
    }

    #[test]
    fn stamping_preserves_untouched_bits() {
        // raw md5 of "OfflinePlayer:TNTbros101"
        let raw: [u8; 16] = [
            0x32, 0x96, 0x5c, 0xeb, 0x50, 0x84, 0x66, 0x08, 0x31, 0xc8, 0x0b, 0xd0, 0x4a, 0x9a,
            0x83, 0xaf,
        ];
        let stamped = stamp_version_3(raw);
        assert_eq!(stamped[6], 0x36);
        assert_eq!(stamped[8], 0xb1);
        for i in (0..16).filter(|i| *i != 6 && *i != 8) {
            assert_eq!(stamped[i], raw[i]);
        }
    }

    #[test]
    fn derivation_is_deterministic_and_name_sensitive() {
        assert_eq!(offline_uuid("Cartorson"), offline_uuid("Cartorson"));
        assert_ne!(offline_uuid("Cartorson"), offline_uuid("cartorson"));
    }

    #[test]
    fn utf8_names_hash_their_encoded_bytes() {
        assert_eq!(
            offline_uuid_string("Jöns"),
            "a152b1c9-8161-3efe-8559-7ce6f85b5bd3"
        );
        assert_eq!(
            offline_uuid_string(""),
            "fc5bc365-aedf-30a8-8b89-04e462e29bde"
        );
    }
}
