use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque user identifier (ULID string)
pub type UserId = String;

/// Handle for one live transport connection, allocated by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

pub const ADMINISTRATOR_ROLE: &str = "administrator";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Participant,
    Administrator,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        *self == Role::Administrator
    }
}

/// Fixed avatar catalog. Labels and artwork live in the front-end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Avatar {
    PixelAstronaut,
    PixelRobot,
    PixelFox,
    PixelOctopus,
    PixelDragon,
    PixelUnicorn,
}

impl Avatar {
    pub const ALL: [Avatar; 6] = [
        Avatar::PixelAstronaut,
        Avatar::PixelRobot,
        Avatar::PixelFox,
        Avatar::PixelOctopus,
        Avatar::PixelDragon,
        Avatar::PixelUnicorn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Avatar::PixelAstronaut => "pixel-astronaut",
            Avatar::PixelRobot => "pixel-robot",
            Avatar::PixelFox => "pixel-fox",
            Avatar::PixelOctopus => "pixel-octopus",
            Avatar::PixelDragon => "pixel-dragon",
            Avatar::PixelUnicorn => "pixel-unicorn",
        }
    }
}

impl FromStr for Avatar {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Avatar::ALL
            .into_iter()
            .find(|avatar| avatar.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color: {0:?}")]
pub struct InvalidColor(pub String);

/// Canonical `#rrggbb` color, always lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Trim and lowercase `input`, accepting only `#` followed by 6 hex digits
    pub fn parse(input: &str) -> Result<Self, InvalidColor> {
        let compact = input.trim().to_ascii_lowercase();
        let valid = compact.len() == 7
            && compact.starts_with('#')
            && compact[1..].bytes().all(|b| b.is_ascii_hexdigit());

        if valid {
            Ok(Self(compact))
        } else {
            Err(InvalidColor(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Blank-cell color used when none is configured
pub const DEFAULT_COLOR: &str = "#f8fafc";

impl Default for HexColor {
    fn default() -> Self {
        Self(DEFAULT_COLOR.to_string())
    }
}

impl TryFrom<String> for HexColor {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HexColor::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered identity, immutable once accepted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub avatar: Avatar,
}

/// Value copy of the painter stored on a cell
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PixelOwner {
    pub name: String,
    pub avatar: Avatar,
}

impl From<&User> for PixelOwner {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            avatar: user.avatar,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PixelBroadcast {
    pub x: usize,
    pub y: usize,
    pub color: HexColor,
    pub owner: PixelOwner,
}

pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_NAME_CHARS: usize = 24;

/// Trim a requested display name and check its length and printability
pub fn sanitize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let chars = trimmed.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&chars) {
        return None;
    }
    if trimmed.chars().any(char::is_control) {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_is_canonicalized() {
        let color = HexColor::parse("  #ABCdef ").unwrap();
        assert_eq!(color.as_str(), "#abcdef");
    }

    #[test]
    fn test_color_rejects_malformed_input() {
        for bad in ["", "abcdef", "#abcde", "#abcdefa", "#ghijkl", "#12345 ", "##12345"] {
            assert!(HexColor::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_default_color_is_canonical() {
        assert_eq!(HexColor::parse(DEFAULT_COLOR), Ok(HexColor::default()));
    }

    #[test]
    fn test_color_deserialize_validates() {
        let ok: HexColor = serde_json::from_str("\"#00FF00\"").unwrap();
        assert_eq!(ok.as_str(), "#00ff00");
        assert!(serde_json::from_str::<HexColor>("\"red\"").is_err());
    }

    #[test]
    fn test_avatar_catalog_lookup() {
        assert_eq!("pixel-fox".parse::<Avatar>(), Ok(Avatar::PixelFox));
        assert!("pixel-cat".parse::<Avatar>().is_err());
        assert!("Pixel-Fox".parse::<Avatar>().is_err());

        for avatar in Avatar::ALL {
            let json = serde_json::to_string(&avatar).unwrap();
            assert_eq!(json, format!("\"{}\"", avatar.as_str()));
        }
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(
            serde_json::to_string(&Role::Administrator).unwrap(),
            "\"administrator\""
        );
        assert_eq!(
            serde_json::to_string(&Role::Participant).unwrap(),
            "\"participant\""
        );
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("  Ada  "), Some("Ada".to_string()));
        assert_eq!(sanitize_name("Al"), Some("Al".to_string()));
        assert_eq!(sanitize_name(" A "), None);
        assert_eq!(sanitize_name(&"x".repeat(24)), Some("x".repeat(24)));
        assert_eq!(sanitize_name(&"x".repeat(25)), None);
        assert_eq!(sanitize_name("Ad\u{0007}a"), None);
        // Multi-byte names are measured in characters
        assert_eq!(sanitize_name("Zoë"), Some("Zoë".to_string()));
    }
}
