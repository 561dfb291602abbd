//! Candidate domain models.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Server-assigned candidate identifier.
pub type CandidateId = i64;

/// Pipeline stage a candidate occupies.
///
/// The set is closed and shared with the server: the same lowercase names are
/// used as column identifiers by the UI and in the persistence payload.
/// Deserialization goes through [`Stage::from_str`], so fetched data with an
/// unknown status is rejected at ingress.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Stage {
    New,
    Interview,
    Hired,
    Rejected,
}

impl Stage {
    /// All stages in board display order.
    pub const ALL: [Stage; 4] = [Stage::New, Stage::Interview, Stage::Hired, Stage::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::New => "new",
            Stage::Interview => "interview",
            Stage::Hired => "hired",
            Stage::Rejected => "rejected",
        }
    }

    /// Returns true if `raw` names a recognised stage.
    pub fn is_stage(raw: &str) -> bool {
        Stage::ALL.iter().any(|stage| stage.as_str() == raw)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == raw)
            .ok_or_else(|| Error::UnrecognizedStage(raw.to_string()))
    }
}

impl TryFrom<String> for Stage {
    type Error = Error;

    fn try_from(raw: String) -> Result<Self> {
        raw.parse()
    }
}

/// A candidate card on a job board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub email: String,
    pub status: Stage,
    /// Zero-based rank within the `status` column.
    pub position: u32,
}

impl Candidate {
    pub fn new(id: CandidateId, email: impl Into<String>, status: Stage, position: u32) -> Self {
        Self {
            id,
            email: email.into(),
            status,
            position,
        }
    }

    /// Whether the card currently sits at `(status, position)`.
    pub fn is_at(&self, status: Stage, position: u32) -> bool {
        self.status == status && self.position == position
    }

    /// Copy of this card with a different position.
    pub fn with_position(&self, position: u32) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    /// Copy of this card placed in another column.
    pub fn moved_to(&self, status: Stage, position: u32) -> Self {
        Self {
            status,
            position,
            ..self.clone()
        }
    }
}

/// Persistence payload for a single move: exactly the moved card's new slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMove {
    pub id: CandidateId,
    pub status: Stage,
    pub position: u32,
}

impl From<&Candidate> for CandidateMove {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id,
            status: candidate.status,
            position: candidate.position,
        }
    }
}

/// A collection grouped into stage columns, each sorted by position.
///
/// Every stage has an entry, empty or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumns {
    columns: BTreeMap<Stage, Vec<Candidate>>,
}

impl BoardColumns {
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        let mut columns: BTreeMap<Stage, Vec<Candidate>> =
            Stage::ALL.into_iter().map(|stage| (stage, Vec::new())).collect();

        for candidate in candidates {
            columns
                .entry(candidate.status)
                .or_default()
                .push(candidate.clone());
        }
        for column in columns.values_mut() {
            column.sort_by_key(|c| (c.position, c.id));
        }

        Self { columns }
    }

    /// Cards of one column in position order.
    pub fn column(&self, stage: Stage) -> &[Candidate] {
        self.columns.get(&stage).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Columns in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, &[Candidate])> {
        self.columns
            .iter()
            .map(|(stage, cards)| (*stage, cards.as_slice()))
    }

    /// Total number of cards on the board.
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Verifies that ids are unique and that every column's positions are
/// exactly `0..n`.
pub fn check_density(candidates: &[Candidate]) -> Result<()> {
    let mut seen = HashSet::with_capacity(candidates.len());
    for candidate in candidates {
        if !seen.insert(candidate.id) {
            return Err(Error::DataIntegrity(format!(
                "candidate {} appears more than once",
                candidate.id
            )));
        }
    }

    let columns = BoardColumns::from_candidates(candidates);
    for (stage, cards) in columns.iter() {
        for (expected, card) in cards.iter().enumerate() {
            if card.position as usize != expected {
                return Err(Error::DataIntegrity(format!(
                    "column '{}' expected position {} but candidate {} has {}",
                    stage, expected, card.id, card.position
                )));
            }
        }
    }
    Ok(())
}
