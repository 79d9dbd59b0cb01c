use std::fmt;

use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;

/// A two-line element set together with the SGP4 state derived from it.
///
/// The parsed elements and constants are computed once on construction and
/// never change afterwards.
#[derive(Clone)]
pub struct ElementSet {
    elements: Elements,
    constants: Constants,
}

impl ElementSet {
    pub fn from_lines(
        name: Option<String>,
        line1: &str,
        line2: &str,
    ) -> Result<Self, PredictError> {
        let line1 = line1.trim();
        let line2 = line2.trim();
        let elements = Elements::from_tle(name, line1.as_bytes(), line2.as_bytes())?;
        let constants = Constants::from_elements(&elements)?;

        Ok(Self {
            elements,
            constants,
        })
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }
}

impl fmt::Debug for ElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementSet")
            .field("norad_id", &self.elements.norad_id)
            .field("name", &self.elements.object_name)
            .field("epoch", &self.elements.datetime)
            .finish()
    }
}

/// One record found in a multi-satellite TLE file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TleRecord<'a> {
    pub name: Option<&'a str>,
    pub line1: &'a str,
    pub line2: &'a str,
}

/// Scans TLE file content for 2- and 3-line records. Lines that belong to no
/// record (comments, headers, truncated entries) are skipped.
pub fn parse_multi_tle(content: &str) -> Vec<TleRecord<'_>> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut records = Vec::new();
    let mut rest = lines.as_slice();
    loop {
        rest = match rest {
            [l1, l2, tail @ ..] if is_tle_line(l1, b'1') && is_tle_line(l2, b'2') => {
                records.push(TleRecord {
                    name: None,
                    line1: *l1,
                    line2: *l2,
                });
                tail
            }
            [name, l1, l2, tail @ ..] if is_tle_line(l1, b'1') && is_tle_line(l2, b'2') => {
                records.push(TleRecord {
                    name: Some(*name),
                    line1: *l1,
                    line2: *l2,
                });
                tail
            }
            [_, tail @ ..] => tail,
            [] => break,
        };
    }
    records
}

fn is_tle_line(line: &str, number: u8) -> bool {
    line.as_bytes().starts_with(&[number, b' '])
}
