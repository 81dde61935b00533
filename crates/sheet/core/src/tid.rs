//! Kind-tagged identifiers.
//!
//! A [`Tid`] is a random key prefixed by one character naming the entity kind.
//! The kind character also encodes container-ness: upper case for leaves, lower
//! case for containers of the same family (`T`/`t` traits, `M`/`m` trait
//! modifiers, `N`/`n` notes). Converting a node between its leaf and container
//! forms only flips that bit; the key is untouched.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Family of entity kinds sharing one leaf/container pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum KindFamily {
    Trait,
    TraitModifier,
    Note,
}

impl KindFamily {
    /// Per-row `type` key used by older files.
    pub const fn type_key(self) -> &'static str {
        match self {
            Self::Trait => "trait",
            Self::TraitModifier => "modifier",
            Self::Note => "note",
        }
    }

    /// Row `type` keys written before traits were renamed from advantages.
    pub const fn legacy_type_key(self) -> Option<&'static str> {
        match self {
            Self::Trait => Some("advantage"),
            Self::TraitModifier | Self::Note => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Trait => "Trait",
            Self::TraitModifier => "Trait Modifier",
            Self::Note => "Note",
        }
    }
}

/// Leaf or container kind of a family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
pub enum EntityKind {
    Trait,
    TraitContainer,
    TraitModifier,
    TraitModifierContainer,
    Note,
    NoteContainer,
}

impl EntityKind {
    pub const fn new(family: KindFamily, container: bool) -> Self {
        match (family, container) {
            (KindFamily::Trait, false) => Self::Trait,
            (KindFamily::Trait, true) => Self::TraitContainer,
            (KindFamily::TraitModifier, false) => Self::TraitModifier,
            (KindFamily::TraitModifier, true) => Self::TraitModifierContainer,
            (KindFamily::Note, false) => Self::Note,
            (KindFamily::Note, true) => Self::NoteContainer,
        }
    }

    pub const fn family(self) -> KindFamily {
        match self {
            Self::Trait | Self::TraitContainer => KindFamily::Trait,
            Self::TraitModifier | Self::TraitModifierContainer => KindFamily::TraitModifier,
            Self::Note | Self::NoteContainer => KindFamily::Note,
        }
    }

    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::TraitContainer | Self::TraitModifierContainer | Self::NoteContainer
        )
    }

    pub const fn to_container(self) -> Self {
        Self::new(self.family(), true)
    }

    pub const fn to_leaf(self) -> Self {
        Self::new(self.family(), false)
    }

    /// Default display name for a freshly created node of this kind.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Trait => "Trait",
            Self::TraitContainer => "Trait Container",
            Self::TraitModifier => "Trait Modifier",
            Self::TraitModifierContainer => "Trait Modifier Container",
            Self::Note => "Note",
            Self::NoteContainer => "Note Container",
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::Trait => 'T',
            Self::TraitContainer => 't',
            Self::TraitModifier => 'M',
            Self::TraitModifierContainer => 'm',
            Self::Note => 'N',
            Self::NoteContainer => 'n',
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'T' => Some(Self::Trait),
            't' => Some(Self::TraitContainer),
            'M' => Some(Self::TraitModifier),
            'm' => Some(Self::TraitModifierContainer),
            'N' => Some(Self::Note),
            'n' => Some(Self::NoteContainer),
            _ => None,
        }
    }
}

/// Number of random characters following the kind character.
pub const TID_KEY_LEN: usize = 16;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Why a string is not a valid [`Tid`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TidError {
    #[error("identifier '{0}' has an unknown kind")]
    UnknownKind(String),
    #[error("identifier '{0}' is malformed")]
    Malformed(String),
}

/// Kind-tagged unique identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tid {
    kind: EntityKind,
    key: [u8; TID_KEY_LEN],
}

impl Tid {
    /// Mints a fresh identifier of the given kind.
    pub fn new(kind: EntityKind) -> Self {
        let mut rng = rand::thread_rng();
        let mut key = [0u8; TID_KEY_LEN];
        for slot in &mut key {
            *slot = ALPHABET[rng.gen_range(0..ALPHABET.len())];
        }
        Self { kind, key }
    }

    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    pub const fn family(&self) -> KindFamily {
        self.kind.family()
    }

    pub const fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// Same key, container kind of the same family.
    pub const fn to_container(self) -> Self {
        Self {
            kind: self.kind.to_container(),
            key: self.key,
        }
    }

    /// Same key, leaf kind of the same family.
    pub const fn to_leaf(self) -> Self {
        Self {
            kind: self.kind.to_leaf(),
            key: self.key,
        }
    }

    /// Returns the identifier if `text` parses and belongs to `family`.
    pub fn parse_for(text: &str, family: KindFamily) -> Option<Self> {
        text.parse::<Self>().ok().filter(|tid| tid.family() == family)
    }

    /// True if `text` is a kind-tagged id of `family`.
    pub fn is_valid_for(text: &str, family: KindFamily) -> bool {
        Self::parse_for(text, family).is_some()
    }
}

impl FromStr for Tid {
    type Err = TidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let kind = chars
            .next()
            .and_then(EntityKind::from_char)
            .ok_or_else(|| TidError::UnknownKind(s.to_string()))?;
        let rest = chars.as_str().as_bytes();
        if rest.len() != TID_KEY_LEN || !rest.iter().all(|b| ALPHABET.contains(b)) {
            return Err(TidError::Malformed(s.to_string()));
        }
        let mut key = [0u8; TID_KEY_LEN];
        key.copy_from_slice(rest);
        Ok(Self { kind, key })
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.as_char())?;
        for b in self.key {
            write!(f, "{}", char::from(b))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tid({self})")
    }
}

impl Serialize for Tid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn fresh_ids_round_trip_through_text() {
        for kind in EntityKind::iter() {
            let tid = Tid::new(kind);
            let text = tid.to_string();
            assert_eq!(text.len(), 1 + TID_KEY_LEN);
            assert_eq!(text.parse::<Tid>(), Ok(tid));
        }
    }

    #[test]
    fn container_conversion_keeps_family_and_key() {
        let leaf = Tid::new(EntityKind::TraitModifier);
        let container = leaf.to_container();
        assert_eq!(container.kind(), EntityKind::TraitModifierContainer);
        assert_eq!(container.family(), KindFamily::TraitModifier);
        assert_eq!(&container.to_string()[1..], &leaf.to_string()[1..]);
        assert_eq!(container.to_leaf(), leaf);
    }

    #[test]
    fn rejects_foreign_and_malformed_ids() {
        // Old files used UUIDs.
        let uuid = "0b6e3c4e-5b2a-4c53-9a55-1b7a0f2d7c11";
        assert!(uuid.parse::<Tid>().is_err());
        let leaf_like = "T0b6e3c4e-5b2a-4c53-9a55-1b7a0f2d7c11";
        assert!(matches!(leaf_like.parse::<Tid>(), Err(TidError::Malformed(_))));
        assert!(matches!("Xabcdefghijklmnop".parse::<Tid>(), Err(TidError::UnknownKind(_))));
        assert!("Tabc".parse::<Tid>().is_err());

        let note = Tid::new(EntityKind::NoteContainer).to_string();
        assert!(Tid::parse_for(&note, KindFamily::Note).is_some());
        assert!(Tid::parse_for(&note, KindFamily::Trait).is_none());
    }
}
