//! Two line orbital element sets
use sgp4::chrono::{Datelike, Timelike};

use crate::{error::Error, prelude::Epoch};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Two line orbital element set, with its name.
///
/// Lines are validated (line numbers, length, checksums, matching
/// catalog numbers) and parsed once, by [sgp4::Elements::from_tle], on construction:
/// a [OrbitalElementSet] can only be obtained through [OrbitalElementSet::new]
/// or [ElementCatalog::parse].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "ElementLines", into = "ElementLines")
)]
pub struct OrbitalElementSet {
    name: String,
    line1: String,
    line2: String,
    elements: sgp4::Elements,
}

/// Serialized form of an [OrbitalElementSet]
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct ElementLines {
    name: String,
    line1: String,
    line2: String,
}

#[cfg(feature = "serde")]
impl TryFrom<ElementLines> for OrbitalElementSet {
    type Error = Error;
    fn try_from(lines: ElementLines) -> Result<Self, Self::Error> {
        Self::new(&lines.name, &lines.line1, &lines.line2)
    }
}

#[cfg(feature = "serde")]
impl From<OrbitalElementSet> for ElementLines {
    fn from(set: OrbitalElementSet) -> Self {
        Self {
            name: set.name,
            line1: set.line1,
            line2: set.line2,
        }
    }
}

impl OrbitalElementSet {
    /// Builds a new [OrbitalElementSet]. Trailing whitespaces are ignored.
    pub fn new(name: &str, line1: &str, line2: &str) -> Result<Self, Error> {
        let line1 = line1.trim_end();
        let line2 = line2.trim_end();
        let name = name.trim();

        let elements = sgp4::Elements::from_tle(
            Some(name.to_string()),
            line1.as_bytes(),
            line2.as_bytes(),
        )
        .map_err(|e| Error::InvalidElements(e.to_string()))?;

        let s = Self {
            name: name.to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
            elements,
        };

        s.epoch()?;
        Ok(s)
    }

    /// Builds a new [OrbitalElementSet] without name line:
    /// it is then named after its catalog number.
    pub fn from_lines(line1: &str, line2: &str) -> Result<Self, Error> {
        let mut s = Self::new("", line1, line2)?;
        s.name = s.catalog_number().to_string();
        s.elements.object_name = Some(s.name.clone());
        Ok(s)
    }

    /// Object name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line1(&self) -> &str {
        &self.line1
    }

    pub fn line2(&self) -> &str {
        &self.line2
    }

    /// NORAD catalog number
    pub fn catalog_number(&self) -> u64 {
        self.elements.norad_id
    }

    /// Reference [Epoch] of these elements (UTC)
    pub fn epoch(&self) -> Result<Epoch, Error> {
        let dt = &self.elements.datetime;
        Epoch::maybe_from_gregorian_utc(
            dt.year(),
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            dt.nanosecond(),
        )
        .map_err(|e| Error::InvalidElements(format!("invalid epoch: {}", e)))
    }

    /// Parsed elements, handed over to the propagation model
    pub(crate) fn elements(&self) -> &sgp4::Elements {
        &self.elements
    }
}

impl std::fmt::Display for OrbitalElementSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}\n{}\n{}", self.name, self.line1, self.line2)
    }
}

/// Collection of [OrbitalElementSet]s parsed from a bulk element feed
/// (three line format, or plain two lines format), searchable by name
/// or by catalog number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementCatalog {
    sets: Vec<OrbitalElementSet>,
}

impl ElementCatalog {
    /// Parses a bulk element feed. Any malformed set fails the whole feed.
    /// Sets without a name line are named after their catalog number.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let lines = content
            .lines()
            .map(|line| line.trim_end())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();

        let mut sets = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            if lines[i].starts_with("1 ") && lines.get(i + 1).is_some_and(|l| l.starts_with("2 ")) {
                sets.push(OrbitalElementSet::from_lines(lines[i], lines[i + 1])?);
                i += 2;
            } else {
                match (lines.get(i + 1), lines.get(i + 2)) {
                    (Some(line1), Some(line2)) => {
                        sets.push(OrbitalElementSet::new(lines[i], line1, line2)?);
                    },
                    _ => {
                        return Err(Error::InvalidElements(format!(
                            "truncated element set \"{}\"",
                            lines[i].trim()
                        )))
                    },
                }
                i += 3;
            }
        }

        Ok(Self { sets })
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrbitalElementSet> {
        self.sets.iter()
    }

    /// Case insensitive lookup by object name
    pub fn by_name(&self, name: &str) -> Option<&OrbitalElementSet> {
        let name = name.trim();
        self.sets
            .iter()
            .find(|set| set.name.eq_ignore_ascii_case(name))
    }

    /// Lookup by NORAD catalog number
    pub fn by_catalog_number(&self, number: u64) -> Option<&OrbitalElementSet> {
        self.sets
            .iter()
            .find(|set| set.catalog_number() == number)
    }
}
