use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::core::errors::SearchError;

/// Outward + inward UK postcode grammar, applied after whitespace stripping.
/// The inward part is optional so outward-only lookups ("SW1A", "M1") pass.
static POSTCODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z]{1,2}[0-9][A-Z0-9]?)([0-9][A-Z]{2})?$").expect("postcode grammar regex")
});

/// Postcode areas covered by the Scottish courts service.
const SCOTLAND_AREAS: &[&str] = &[
    "AB", "DD", "DG", "EH", "FK", "G", "HS", "IV", "KA", "KW", "KY", "ML", "PA", "PH", "TD", "ZE",
];

/// Districts inside an otherwise Scottish area that sit on the English side
/// of the border (Berwick-upon-Tweed and Cornhill-on-Tweed).
const SCOTLAND_DISTRICT_EXCEPTIONS: &[&str] = &["TD12", "TD15"];

const NORTHERN_IRELAND_AREAS: &[&str] = &["BT"];

/// Isle of Man, Jersey and Guernsey.
const CROWN_DEPENDENCY_AREAS: &[&str] = &["IM", "JE", "GY"];

/// Region a grammatically valid postcode belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    EnglandWales,
    Scotland,
    NorthernIreland,
    CrownDependencies,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EnglandWales => "England and Wales",
            Self::Scotland => "Scotland",
            Self::NorthernIreland => "Northern Ireland",
            Self::CrownDependencies => "the Channel Islands and Isle of Man",
        };
        f.write_str(name)
    }
}

/// A normalized postcode with its region classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPostcode {
    /// Uppercase, one space before the final three characters for full
    /// postcodes, no space for outward-only forms
    pub normalized: String,
    /// The outward part only, e.g. "SW1A"
    pub outward: String,
    pub region: Region,
}

impl ClassifiedPostcode {
    /// Only England and Wales is searchable; other regions are rejected with
    /// the specific excluded-region reason.
    pub fn ensure_searchable(&self) -> Result<(), SearchError> {
        if self.region == Region::EnglandWales {
            Ok(())
        } else {
            Err(SearchError::UnsupportedRegion {
                postcode: self.normalized.clone(),
                region: self.region,
            })
        }
    }
}

/// Validate and classify a raw postcode string.
///
/// Tolerant of case and of missing or extra internal whitespace. The literal
/// "GIR 0AA" is accepted as a historical special case.
pub fn classify(raw: &str) -> Result<ClassifiedPostcode, SearchError> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if compact.is_empty() {
        return Err(SearchError::InvalidPostcode(raw.trim().to_string()));
    }

    if compact == "GIR0AA" {
        return Ok(ClassifiedPostcode {
            normalized: "GIR 0AA".to_string(),
            outward: "GIR".to_string(),
            region: Region::EnglandWales,
        });
    }

    let caps = POSTCODE_RE
        .captures(&compact)
        .ok_or_else(|| SearchError::InvalidPostcode(raw.trim().to_string()))?;

    let outward = caps
        .get(1)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| SearchError::InvalidPostcode(raw.trim().to_string()))?;

    let normalized = match caps.get(2) {
        Some(inward) => format!("{} {}", outward, inward.as_str()),
        None => outward.clone(),
    };

    let region = classify_outward(&outward);

    Ok(ClassifiedPostcode {
        normalized,
        outward,
        region,
    })
}

fn classify_outward(outward: &str) -> Region {
    if SCOTLAND_DISTRICT_EXCEPTIONS.contains(&outward) {
        return Region::EnglandWales;
    }

    let area: String = outward
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    if SCOTLAND_AREAS.contains(&area.as_str()) {
        Region::Scotland
    } else if NORTHERN_IRELAND_AREAS.contains(&area.as_str()) {
        Region::NorthernIreland
    } else if CROWN_DEPENDENCY_AREAS.contains(&area.as_str()) {
        Region::CrownDependencies
    } else {
        Region::EnglandWales
    }
}
