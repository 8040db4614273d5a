use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Per-call switches for `apply_customization`.
    ///
    /// The engine acts on `SKIP_CACHE` and `SKIP_CROSS_DOMAIN`; the preview and
    /// persistence flags ride along on published events for outbound collaborators.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct ApplyOptions: u32 {
        const SKIP_CACHE = 1 << 0;
        const SKIP_PREVIEW = 1 << 1;
        const SKIP_PERSIST = 1 << 2;
        const SKIP_CROSS_DOMAIN = 1 << 3;
    }
}

impl From<&str> for ApplyOptions {
    fn from(s: &str) -> Self {
        match s {
            "skipCache" | "skip-cache" => Self::SKIP_CACHE,
            "skipPreview" | "skip-preview" => Self::SKIP_PREVIEW,
            "skipPersist" | "skip-persist" => Self::SKIP_PERSIST,
            "skipCrossDomain" | "skip-cross-domain" => Self::SKIP_CROSS_DOMAIN,
            _ => Self::empty(),
        }
    }
}

impl Serialize for ApplyOptions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for ApplyOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}
