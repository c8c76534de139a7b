//! Known types: types written as a 20-byte fingerprint instead of their name.
//!
//! Both ends must register the same known types.

use core::any::TypeId;

use sha2::{Digest, Sha256};
use tg_utils::TypeIdMap;
use tg_utils::hash::HashMap;

/// Length of a type fingerprint.
pub const FINGERPRINT_LEN: usize = 20;

/// The first 20 bytes of the SHA-256 digest of a type path.
///
/// ```
/// let a = tg_codec::fingerprint("shop::Order");
/// assert_eq!(a, tg_codec::fingerprint("shop::Order"));
/// assert_ne!(a, tg_codec::fingerprint("shop::Line"));
/// ```
pub fn fingerprint(type_path: &str) -> [u8; FINGERPRINT_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(type_path.as_bytes());
    let digest = hasher.finalize();

    let mut out = [0_u8; FINGERPRINT_LEN];
    out.copy_from_slice(&digest[..FINGERPRINT_LEN]);
    out
}

/// The known types of one codec.
#[derive(Default, Debug)]
pub(crate) struct KnownTypes {
    by_fingerprint: HashMap<[u8; FINGERPRINT_LEN], TypeId>,
    by_type: TypeIdMap<[u8; FINGERPRINT_LEN]>,
}

impl KnownTypes {
    pub fn insert(&mut self, type_id: TypeId, type_path: &str) {
        let print = fingerprint(type_path);
        if let Some(previous) = self.by_fingerprint.insert(print, type_id)
            && previous != type_id
        {
            log::warn!("known type `{type_path}` replaces a type with the same fingerprint");
            self.by_type.remove(&previous);
        }
        self.by_type.insert(type_id, print);
    }

    #[inline]
    pub fn fingerprint_of(&self, type_id: TypeId) -> Option<&[u8; FINGERPRINT_LEN]> {
        self.by_type.get(&type_id)
    }

    #[inline]
    pub fn resolve(&self, print: &[u8; FINGERPRINT_LEN]) -> Option<TypeId> {
        self.by_fingerprint.get(print).copied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}
