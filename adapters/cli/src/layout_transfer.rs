use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use delve_core::{Room, Settings};
use delve_world::Layout;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "dungeon";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "dungeon:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Shareable description of a generated layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LayoutSnapshot {
    /// Width of the tile grid.
    pub(crate) columns: u32,
    /// Height of the tile grid.
    pub(crate) rows: u32,
    /// Seed the layout was generated from.
    pub(crate) seed: u64,
    /// Settings the layout was generated from.
    pub(crate) settings: Settings,
    /// Normalized rooms in creation order.
    pub(crate) rooms: Vec<Room>,
}

impl LayoutSnapshot {
    /// Captures the parts of a layout needed to reproduce and verify it.
    #[must_use]
    pub(crate) fn from_layout(layout: &Layout) -> Self {
        Self {
            columns: layout.tiles().columns(),
            rows: layout.tiles().rows(),
            seed: layout.seed(),
            settings: layout.settings().clone(),
            rooms: layout.rooms().to_vec(),
        }
    }

    /// Encodes the snapshot into a single-line string.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = Payload {
            seed: self.seed,
            settings: self.settings.clone(),
            rooms: self.rooms.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("layout snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SNAPSHOT_HEADER}:{}x{}:{encoded}", self.columns, self.rows)
    }

    /// Decodes a snapshot from its string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts
            .next()
            .ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let decoded: Payload = serde_json::from_slice(&bytes)?;

        Ok(Self {
            columns,
            rows,
            seed: decoded.seed,
            settings: decoded.settings,
            rooms: decoded.rooms,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct Payload {
    seed: u64,
    settings: Settings,
    rooms: Vec<Room>,
}

/// Errors that can occur while decoding layout strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The grid dimensions were missing.
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    /// The payload segment was missing.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The prefix segment named another format.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version segment is not understood.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The decoded payload was not a valid layout.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 {
        return Err(invalid());
    }
    Ok((columns, rows))
}
