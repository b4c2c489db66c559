use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Raw tag mapping keyed by numeric tag identifier.
pub type TagMap = BTreeMap<u16, TagValue>;

/// A numerator/denominator pair as stored in EXIF rational fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub num: i64,
    pub denom: i64,
}

impl Rational {
    pub fn new(num: i64, denom: i64) -> Self {
        Self { num, denom }
    }

    /// Floating-point value of the fraction. A zero denominator yields `0.0`.
    pub fn to_f64(self) -> f64 {
        if self.denom == 0 {
            0.0
        } else {
            self.num as f64 / self.denom as f64
        }
    }
}

/// A raw metadata value, independent of the decoder it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Text(String),
    Bytes(Vec<u8>),
    Integers(Vec<i64>),
    Rationals(Vec<Rational>),
    Floats(Vec<f64>),
    /// Nested tag block (the GPS sub-IFD).
    Map(TagMap),
    Unknown,
}

impl TagValue {
    pub fn as_map(&self) -> Option<&TagMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn first_integer(&self) -> Option<i64> {
        match self {
            Self::Integers(v) => v.first().copied(),
            Self::Bytes(v) => v.first().map(|b| i64::from(*b)),
            _ => None,
        }
    }

    /// `true` when the value carries nothing usable (blank text, no elements).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Bytes(v) => v.is_empty(),
            Self::Integers(v) => v.is_empty(),
            Self::Rationals(v) => v.is_empty(),
            Self::Floats(v) => v.is_empty(),
            Self::Map(m) => m.is_empty(),
            Self::Unknown => true,
        }
    }

    /// Per-element numeric conversion.
    ///
    /// Returns `None` when the value is not a sequence at all. Elements that
    /// cannot be converted come back as `None` inside the vector.
    pub fn components(&self) -> Option<Vec<Option<f64>>> {
        match self {
            Self::Integers(v) => Some(v.iter().map(|n| Some(*n as f64)).collect()),
            Self::Rationals(v) => Some(v.iter().map(|r| Some(r.to_f64())).collect()),
            Self::Floats(v) => Some(v.iter().map(|f| Some(*f)).collect()),
            Self::Bytes(v) => Some(v.iter().map(|b| Some(f64::from(*b))).collect()),
            Self::Text(s) => Some(vec![s.trim().parse::<f64>().ok()]),
            Self::Map(_) | Self::Unknown => None,
        }
    }
}

fn write_list<T, F>(f: &mut fmt::Formatter<'_>, items: &[T], mut each: F) -> fmt::Result
where
    F: FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
{
    if let [single] = items {
        return each(f, single);
    }
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        each(f, item)?;
    }
    f.write_str(")")
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Bytes(v) => write_list(f, v, |f, b| write!(f, "{b}")),
            Self::Integers(v) => write_list(f, v, |f, n| write!(f, "{n}")),
            Self::Rationals(v) => write_list(f, v, |f, r| write!(f, "{:?}", r.to_f64())),
            Self::Floats(v) => write_list(f, v, |f, x| write!(f, "{x:?}")),
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (id, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{id}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

fn serialize_numbers<S, T>(serializer: S, items: &[T]) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    if let [single] = items {
        return single.serialize(serializer);
    }
    let mut seq = serializer.serialize_seq(Some(items.len()))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.end()
}

impl Serialize for TagValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Bytes(v) => serializer.serialize_str(&STANDARD.encode(v)),
            Self::Integers(v) => serialize_numbers(serializer, v),
            Self::Rationals(v) => {
                let floats: Vec<f64> = v.iter().map(|r| r.to_f64()).collect();
                serialize_numbers(serializer, &floats)
            }
            Self::Floats(v) => serialize_numbers(serializer, v),
            Self::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (id, value) in map {
                    out.serialize_entry(&id.to_string(), value)?;
                }
                out.end()
            }
            Self::Unknown => serializer.serialize_none(),
        }
    }
}
