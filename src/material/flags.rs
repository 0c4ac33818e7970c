use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderFlag {
    DoubleSided = 0x01,
    RecalculateNormals = 0x04,
    ZFillOnly = 0x08,
    ColorFillOnly = 0x10,
    NotLit = 0x20,
    DisableZ = 0x40,
    LinearFiltering = 0x80,
}

impl RenderFlag {
    pub const ALL: [Self; 7] = [
        Self::DoubleSided,
        Self::RecalculateNormals,
        Self::ZFillOnly,
        Self::ColorFillOnly,
        Self::NotLit,
        Self::DisableZ,
        Self::LinearFiltering,
    ];

    /// Matches a bare material keyword against the flag table.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "double" => Some(Self::DoubleSided),
            "linearfiltering" => Some(Self::LinearFiltering),
            "recalculatenormals" => Some(Self::RecalculateNormals),
            "zfillonly" => Some(Self::ZFillOnly),
            "colorfillonly" => Some(Self::ColorFillOnly),
            "notlit" => Some(Self::NotLit),
            "disablez" => Some(Self::DisableZ),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DoubleSided => "DoubleSided",
            Self::RecalculateNormals => "RecalculateNormals",
            Self::ZFillOnly => "ZFillOnly",
            Self::ColorFillOnly => "ColorFillOnly",
            Self::NotLit => "NotLit",
            Self::DisableZ => "DisableZ",
            Self::LinearFiltering => "LinearFiltering",
        }
    }
}

/// Bitset of [`RenderFlag`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderFlags(pub u8);

impl RenderFlags {
    pub fn insert(&mut self, flag: RenderFlag) {
        self.0 |= flag as u8;
    }

    pub fn contains(&self, flag: RenderFlag) -> bool {
        self.0 & flag as u8 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Get all flags present in the bitfield
    pub fn flags(&self) -> Vec<RenderFlag> {
        RenderFlag::ALL
            .iter()
            .copied()
            .filter(|f| self.contains(*f))
            .collect()
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}
