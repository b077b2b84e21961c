//! Resource amounts for CPU and memory.
//!
//! Accepts the plain numbers historically stored in catalog files as well
//! as Kubernetes-style strings: `"500m"`, `"1.5"`, `"2Gi"`, `"16G"`.
//! Values are held internally in milli-units so CPU millicores and byte
//! counts share one representation.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use schemars::gen::SchemaGenerator;
use schemars::schema::{Schema, SchemaObject};
use schemars::JsonSchema;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

const MILLI: u128 = 1_000;
const MAX_FRACTION_DIGITS: usize = 30;

#[derive(Debug, Clone)]
pub struct Quantity {
    milli: u128,
    repr: Repr,
}

/// How the quantity was written, so encoding reproduces the input form.
#[derive(Debug, Clone)]
enum Repr {
    Integer(u64),
    /// A bare fractional number such as `0.5`; encoded back as a number.
    Decimal(f64),
    Text(String),
}

impl Quantity {
    pub fn from_integer(value: u64) -> Self {
        Self {
            milli: u128::from(value) * MILLI,
            repr: Repr::Integer(value),
        }
    }

    /// Amount in thousandths of the base unit (millicores, millibytes).
    pub fn milli_value(&self) -> u128 {
        self.milli
    }

    /// Amount in whole base units, rounded up.
    pub fn value(&self) -> u128 {
        self.milli.div_ceil(MILLI)
    }

    /// The integer when the quantity was written as a bare JSON/YAML number.
    pub fn as_integer(&self) -> Option<u64> {
        match self.repr {
            Repr::Integer(n) => Some(n),
            Repr::Decimal(_) | Repr::Text(_) => None,
        }
    }

    /// Byte count, treating a bare number as a count of `unit` bytes.
    ///
    /// Catalog files store memory as a bare number of GiB; strings are
    /// already byte amounts.
    pub fn bytes_with_default_unit(&self, unit: u128) -> u128 {
        match self.repr {
            Repr::Integer(n) => u128::from(n).saturating_mul(unit),
            Repr::Decimal(_) => self.milli.saturating_mul(unit).div_ceil(MILLI),
            Repr::Text(_) => self.value(),
        }
    }

    /// `value` must be finite and non-negative.
    fn from_f64(value: f64) -> Result<Self> {
        Ok(Self {
            milli: parse_milli(&value.to_string())?,
            repr: Repr::Decimal(value),
        })
    }
}

impl FromStr for Quantity {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let milli = parse_milli(input)?;
        Ok(Self {
            milli,
            repr: Repr::Text(input.trim().to_string()),
        })
    }
}

fn invalid(input: &str, reason: &'static str) -> Error {
    Error::InvalidQuantity {
        input: input.to_string(),
        reason,
    }
}

fn suffix_multiplier(suffix: &str) -> Option<u128> {
    let m = match suffix {
        "m" => 1,
        "" => MILLI,
        "k" => MILLI * 10u128.pow(3),
        "M" => MILLI * 10u128.pow(6),
        "G" => MILLI * 10u128.pow(9),
        "T" => MILLI * 10u128.pow(12),
        "P" => MILLI * 10u128.pow(15),
        "E" => MILLI * 10u128.pow(18),
        "Ki" => MILLI << 10,
        "Mi" => MILLI << 20,
        "Gi" => MILLI << 30,
        "Ti" => MILLI << 40,
        "Pi" => MILLI << 50,
        "Ei" => MILLI << 60,
        _ => return None,
    };
    Some(m)
}

fn parse_milli(input: &str) -> Result<u128> {
    let s = input.trim();
    if s.is_empty() {
        return Err(invalid(input, "empty quantity"));
    }
    if s.starts_with(['-', '+']) {
        return Err(invalid(input, "signed quantities are not supported"));
    }

    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, suffix) = s.split_at(split);
    let multiplier = suffix_multiplier(suffix).ok_or_else(|| invalid(input, "unknown suffix"))?;

    let (whole, fraction) = match number.split_once('.') {
        Some((w, f)) => (w, f),
        None => (number, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid(input, "missing number"));
    }
    if fraction.contains('.') {
        return Err(invalid(input, "more than one decimal point"));
    }
    if fraction.len() > MAX_FRACTION_DIGITS {
        return Err(invalid(input, "too many fractional digits"));
    }

    let overflow = || invalid(input, "quantity out of range");

    let whole_value = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| overflow())?
    };
    let mut milli = whole_value.checked_mul(multiplier).ok_or_else(overflow)?;

    if !fraction.is_empty() {
        let digits = fraction.parse::<u128>().map_err(|_| overflow())?;
        let scale = 10u128.pow(fraction.len() as u32);
        let scaled = digits.checked_mul(multiplier).ok_or_else(overflow)?;
        // sub-milli precision rounds up, as the API server does
        milli = milli.checked_add(scaled.div_ceil(scale)).ok_or_else(overflow)?;
    }

    Ok(milli)
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Integer(n) => write!(f, "{n}"),
            Repr::Decimal(v) => write!(f, "{v}"),
            Repr::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self::from_integer(value)
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.milli == other.milli
    }
}

impl Eq for Quantity {}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.milli.hash(state);
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.milli.cmp(&other.milli)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.repr {
            Repr::Integer(n) => serializer.serialize_u64(*n),
            Repr::Decimal(v) => serializer.serialize_f64(*v),
            Repr::Text(s) => serializer.serialize_str(s),
        }
    }
}

struct QuantityVisitor;

impl<'de> Visitor<'de> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a quantity string such as \"500m\" or \"2Gi\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Quantity, E> {
        Ok(Quantity::from_integer(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Quantity, E> {
        u64::try_from(v)
            .map(Quantity::from_integer)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Quantity, E> {
        if !v.is_finite() || v < 0.0 {
            return Err(E::invalid_value(de::Unexpected::Float(v), &self));
        }
        Quantity::from_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Quantity, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}

impl JsonSchema for Quantity {
    fn schema_name() -> String {
        "Quantity".to_string()
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        let mut schema = SchemaObject::default();
        schema
            .extensions
            .insert("x-kubernetes-int-or-string".to_string(), true.into());
        Schema::Object(schema)
    }
}
