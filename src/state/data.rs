/// Shared data structures for the inventory
///
/// These structs represent the data model that flows between
/// the database layer and the UI layer.
use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

/// Clothing category. The label set is fixed; the database stores the
/// label text verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Bodysuits,
    Pants,
    Tops,
    Dresses,
    Jackets,
    Knitwear,
    Jumpers,
    Accessories,
    Shoes,
    Sleepwear,
    Sets,
    Home,
    FoodPrep,
    Dungarees,
}

impl Category {
    /// All categories, in the order the Add form presents them
    pub const ALL: [Category; 14] = [
        Category::Bodysuits,
        Category::Pants,
        Category::Tops,
        Category::Dresses,
        Category::Jackets,
        Category::Knitwear,
        Category::Jumpers,
        Category::Accessories,
        Category::Shoes,
        Category::Sleepwear,
        Category::Sets,
        Category::Home,
        Category::FoodPrep,
        Category::Dungarees,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bodysuits => "Bodysuits",
            Category::Pants => "Pants",
            Category::Tops => "Tops",
            Category::Dresses => "Dresses",
            Category::Jackets => "Jackets",
            Category::Knitwear => "Knitwear",
            Category::Jumpers => "Jumpers",
            Category::Accessories => "Accessories",
            Category::Shoes => "Shoes",
            Category::Sleepwear => "Sleepwear",
            Category::Sets => "Sets",
            Category::Home => "Home",
            Category::FoodPrep => "Food Prep",
            Category::Dungarees => "Dungarees",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {s:?}"))
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Category> for String {
    fn from(c: Category) -> String {
        c.as_str().to_string()
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// Age bucket an item fits. Labels use en-dashes, matching the
/// historical data, so parsing must match them byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AgeRange {
    M0to3,
    M3to6,
    M6to9,
    M9to12,
    M12to18,
    M18to24,
    M24to36,
    Y3to4,
    Y4to5,
    Y5to6,
    NoAge,
}

impl AgeRange {
    /// All age buckets, youngest first
    pub const ALL: [AgeRange; 11] = [
        AgeRange::M0to3,
        AgeRange::M3to6,
        AgeRange::M6to9,
        AgeRange::M9to12,
        AgeRange::M12to18,
        AgeRange::M18to24,
        AgeRange::M24to36,
        AgeRange::Y3to4,
        AgeRange::Y4to5,
        AgeRange::Y5to6,
        AgeRange::NoAge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeRange::M0to3 => "0–3 months",
            AgeRange::M3to6 => "3–6 months",
            AgeRange::M6to9 => "6–9 months",
            AgeRange::M9to12 => "9–12 months",
            AgeRange::M12to18 => "12–18 months",
            AgeRange::M18to24 => "18–24 months",
            AgeRange::M24to36 => "24–36 months",
            AgeRange::Y3to4 => "3–4 years",
            AgeRange::Y4to5 => "4–5 years",
            AgeRange::Y5to6 => "5–6 years",
            AgeRange::NoAge => "No age",
        }
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeRange::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown age range: {s:?}"))
    }
}

impl TryFrom<String> for AgeRange {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AgeRange> for String {
    fn from(a: AgeRange) -> String {
        a.as_str().to_string()
    }
}

impl ToSql for AgeRange {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AgeRange {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// Represents a single item in the inventory
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Unique database ID, assigned on insert and immutable
    pub id: i64,
    pub category: Category,
    pub age_range: AgeRange,
    /// Where the photo currently lives: an absolute remote URL once the
    /// mirror has succeeded, otherwise a bare local filename
    pub photo_reference: String,
    pub description: String,
}

/// The id-less shape the Add form submits. The photo reference is filled
/// in by the sync orchestrator, never by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub category: Category,
    pub age_range: AgeRange,
    pub description: String,
}

/// Photo bytes handed to an Add, tagged with how they were produced
#[derive(Debug, Clone)]
pub enum PhotoSource {
    /// Live camera capture; a filename is synthesized from the capture time
    Captured { bytes: Vec<u8> },
    /// File upload; the supplied filename is kept verbatim, and a collision
    /// with an existing blob is treated as an intentional overwrite
    Uploaded { bytes: Vec<u8>, filename: String },
}

/// Whether a stored reference points at the remote mirror.
///
/// Anything with a leading URL scheme is remote; everything else is
/// treated as a bare or path-embedded local filename.
pub fn is_remote_reference(reference: &str) -> bool {
    match reference.split_once("://") {
        Some((scheme, rest)) => {
            !scheme.is_empty()
                && !rest.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
