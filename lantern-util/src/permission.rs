use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Operator permission level of a command source.
///
/// Levels gate access to built-in server commands; `Zero` is a regular
/// player, `Four` a full server operator. Serialized as the bare integer so
/// config files read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum PermissionLvl {
    #[default]
    Zero = 0,
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl PermissionLvl {
    /// Builds a level from its numeric form, clamping values above four.
    #[must_use]
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Zero,
            1 => Self::One,
            2 => Self::Two,
            3 => Self::Three,
            _ => Self::Four,
        }
    }
}

impl Serialize for PermissionLvl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for PermissionLvl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        if value > 4 {
            return Err(de::Error::custom(format!(
                "invalid permission level: {value}"
            )));
        }
        Ok(Self::from_u8(value))
    }
}
