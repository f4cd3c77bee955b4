use serde::{Deserialize, Serialize};
use std::fmt;

/// Shift row label. Labels outside the known set are kept verbatim (uppercased)
/// so that no roster data is dropped, and the parser reports them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ShiftType {
    Call,
    Post,
    Off,
    Vacation,
    Other(String),
}

impl ShiftType {
    pub const KNOWN: [ShiftType; 4] = [
        ShiftType::Call,
        ShiftType::Post,
        ShiftType::Off,
        ShiftType::Vacation,
    ];

    /// Trim and uppercase a free-text label. Returns `None` for a blank label.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label.trim().to_uppercase();
        if normalized.is_empty() {
            return None;
        }
        Some(match normalized.as_str() {
            "CALL" => ShiftType::Call,
            "POST" => ShiftType::Post,
            "OFF" => ShiftType::Off,
            "VACATION" => ShiftType::Vacation,
            _ => ShiftType::Other(normalized),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            ShiftType::Call => "CALL",
            ShiftType::Post => "POST",
            ShiftType::Off => "OFF",
            ShiftType::Vacation => "VACATION",
            ShiftType::Other(label) => label.as_str(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ShiftType::Other(_))
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ShiftType {
    type Error = BlankShiftLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ShiftType::parse(&value).ok_or(BlankShiftLabel)
    }
}

impl From<ShiftType> for String {
    fn from(value: ShiftType) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankShiftLabel;

impl fmt::Display for BlankShiftLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("shift label must not be blank")
    }
}

impl std::error::Error for BlankShiftLabel {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPerson(pub String);

impl fmt::Display for InvalidPerson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid person identifier", self.0)
    }
}

impl std::error::Error for InvalidPerson {}

/// Case-normalized person identifier as it appears in roster cells.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonId(String);

impl PersonId {
    pub fn new(name: &str) -> Result<Self, InvalidPerson> {
        let normalized = name.trim().to_uppercase();
        if normalized.is_empty() || normalized.contains(',') {
            return Err(InvalidPerson(name.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a cell on commas into person identifiers, dropping empty tokens.
    pub fn split_cell(cell: &str) -> Vec<PersonId> {
        cell.split(',')
            .filter_map(|token| PersonId::new(token).ok())
            .collect()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PersonId {
    type Error = InvalidPerson;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PersonId::new(&value)
    }
}

impl From<PersonId> for String {
    fn from(value: PersonId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_labels_are_case_normalized() {
        assert_eq!(ShiftType::parse(" call "), Some(ShiftType::Call));
        assert_eq!(ShiftType::parse("Vacation"), Some(ShiftType::Vacation));
        assert_eq!(
            ShiftType::parse("clinic"),
            Some(ShiftType::Other("CLINIC".into()))
        );
        assert_eq!(ShiftType::parse("   "), None);
        assert!(!ShiftType::parse("clinic").unwrap().is_recognized());
    }

    #[test]
    fn split_cell_trims_uppercases_and_drops_empty_tokens() {
        let people = PersonId::split_cell("A, b ,C,, ");
        let names: Vec<&str> = people.iter().map(PersonId::as_str).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn blank_person_is_rejected() {
        assert!(PersonId::new("  ").is_err());
        assert!(PersonId::new("A,B").is_err());
        assert_eq!(PersonId::new(" kass ").unwrap().as_str(), "KASS");
    }

    #[test]
    fn shift_serializes_as_label() {
        let json = serde_json::to_string(&ShiftType::Post).unwrap();
        assert_eq!(json, "\"POST\"");
        let back: ShiftType = serde_json::from_str("\"off\"").unwrap();
        assert_eq!(back, ShiftType::Off);
    }
}
