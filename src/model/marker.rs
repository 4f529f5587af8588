//! Change markers: the mixed boundary / changed-fragment sequence.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Fragment;

/// The JSON sentinel the interchange format uses for a boundary.
const BOUNDARY_SENTINEL: &str = "*";

/// One entry in the ordered change sequence.
///
/// A `Boundary` denotes a point where both documents' text streams are in
/// sync; a `Changed` fragment is a region deemed visually different. On the
/// wire a boundary is the bare JSON string `"*"`, so (de)serialization is
/// hand-written rather than derived.
#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    /// The two documents are textually synchronized at this point.
    Boundary,
    /// A fragment with visually different content.
    Changed(Fragment),
}

impl Marker {
    pub fn is_boundary(&self) -> bool {
        matches!(self, Marker::Boundary)
    }

    /// The changed fragment, if this marker is one.
    pub fn as_changed(&self) -> Option<&Fragment> {
        match self {
            Marker::Boundary => None,
            Marker::Changed(f) => Some(f),
        }
    }
}

impl From<Fragment> for Marker {
    fn from(f: Fragment) -> Self {
        Marker::Changed(f)
    }
}

impl Serialize for Marker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Marker::Boundary => serializer.serialize_str(BOUNDARY_SENTINEL),
            Marker::Changed(f) => f.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Marker {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Sentinel(String),
            Fragment(Fragment),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Sentinel(s) if s == BOUNDARY_SENTINEL => Ok(Marker::Boundary),
            Repr::Sentinel(s) => Err(D::Error::custom(format!(
                "unknown change-list sentinel {s:?}, expected \"*\""
            ))),
            Repr::Fragment(f) => Ok(Marker::Changed(f)),
        }
    }
}
