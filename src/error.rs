//! Error types for map loading, agents and sessions.

use thiserror::Error;

use crate::game::ColonyId;

/// Fatal problems in map text. A session cannot start from a bad map.
#[derive(Debug, Error)]
pub enum MapError {
    /// A required header line is absent.
    #[error("missing `{0}` header")]
    MissingHeader(&'static str),
    /// A header value is not a valid number.
    #[error("invalid `{key}` header value `{value}`")]
    InvalidHeader {
        /// Header key.
        key: &'static str,
        /// Offending value.
        value: String,
    },
    /// The declared player count is outside `1..=10`.
    #[error("player count {0} outside 1..=10")]
    InvalidPlayerCount(usize),
    /// Rows or columns are zero or too large.
    #[error("invalid map size {cols}x{rows}")]
    InvalidSize {
        /// Declared columns.
        cols: usize,
        /// Declared rows.
        rows: usize,
    },
    /// A map row has the wrong number of cells.
    #[error("row {row} has {found} cells, expected {expected}")]
    RowLength {
        /// Zero-based row index.
        row: usize,
        /// Declared column count.
        expected: usize,
        /// Actual cell count.
        found: usize,
    },
    /// The number of `m` lines does not match `rows`.
    #[error("map has {found} rows, expected {expected}")]
    RowCount {
        /// Declared row count.
        expected: usize,
        /// Actual row count.
        found: usize,
    },
    /// A cell character is not part of the map alphabet.
    #[error("unknown symbol `{symbol}` at row {row}, col {col}")]
    UnknownSymbol {
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        col: usize,
        /// The character found.
        symbol: char,
    },
    /// A hill or ant names a colony beyond the player count.
    #[error("colony {colony} at row {row}, col {col} exceeds player count {players}")]
    ColonyOutOfRange {
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        col: usize,
        /// Colony named by the symbol.
        colony: ColonyId,
        /// Declared player count.
        players: usize,
    },
}

/// Problems launching or talking to an agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The agent command line was empty.
    #[error("empty agent command")]
    EmptyCommand,
    /// The agent process could not be started.
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        /// Command line that failed.
        command: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The setup describes an empty map.
    #[error("invalid agent setup for a {cols}x{rows} map")]
    InvalidSetup {
        /// Map rows.
        rows: u16,
        /// Map columns.
        cols: u16,
    },
    /// A pipe to the agent could not be set up.
    #[error("agent pipe unavailable: {0}")]
    Pipe(&'static str),
    /// I/O with the agent failed.
    #[error("agent I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems setting up a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The map could not be loaded.
    #[error(transparent)]
    Map(#[from] MapError),
    /// More agents were supplied than the map has colonies.
    #[error("map has {expected} colonies but {found} agents were given")]
    AgentCount {
        /// Colonies on the map.
        expected: usize,
        /// Agents supplied.
        found: usize,
    },
    /// An agent for a colony could not be created.
    #[error("agent for colony {colony}: {source}")]
    Agent {
        /// Colony the agent was for.
        colony: ColonyId,
        /// Underlying error.
        source: AgentError,
    },
}
