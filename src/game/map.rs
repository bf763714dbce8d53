//! The line-oriented map text format.
//!
//! ```text
//! players 2
//! rows 3
//! cols 6
//! m a..%.1
//! m ..*%..
//! m 0.%..b
//! ```
//!
//! Header lines may appear in any order before or between rows. Lines
//! that are neither headers nor rows are ignored.

use std::fmt;

use crate::error::MapError;
use crate::game::{Coord, Grid, MapSymbol, Torus, MAX_COLONIES};

/// A parsed map: the declared colony count plus one symbol per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapText {
    colonies: usize,
    symbols: Grid<MapSymbol>,
}

impl MapText {
    /// Build from already-classified cells.
    #[must_use]
    pub fn from_parts(colonies: usize, symbols: Grid<MapSymbol>) -> Self {
        Self { colonies, symbols }
    }

    /// Declared number of colonies.
    #[must_use]
    pub const fn colonies(&self) -> usize {
        self.colonies
    }

    /// Map dimensions.
    #[must_use]
    pub const fn torus(&self) -> Torus {
        self.symbols.torus()
    }

    /// One symbol per cell.
    #[must_use]
    pub const fn symbols(&self) -> &Grid<MapSymbol> {
        &self.symbols
    }

    /// Parse map text.
    ///
    /// # Errors
    ///
    /// Returns a [`MapError`] if a header is missing or unparsable, the
    /// rows do not match the declared size, a character is not part of
    /// the alphabet, or a symbol names a colony beyond `players`.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut players = None;
        let mut rows = None;
        let mut cols = None;
        let mut body: Vec<Vec<char>> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            let (key, value) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            match key {
                "players" => players = Some(parse_header("players", value)?),
                "rows" => rows = Some(parse_header("rows", value)?),
                "cols" => cols = Some(parse_header("cols", value)?),
                "m" => body.push(value.trim().chars().collect()),
                _ => {}
            }
        }

        let players = players.ok_or(MapError::MissingHeader("players"))?;
        let rows = rows.ok_or(MapError::MissingHeader("rows"))?;
        let cols = cols.ok_or(MapError::MissingHeader("cols"))?;

        if players == 0 || players > MAX_COLONIES {
            return Err(MapError::InvalidPlayerCount(players));
        }
        let torus = u16::try_from(cols)
            .ok()
            .zip(u16::try_from(rows).ok())
            .and_then(|(w, h)| Torus::new(w, h))
            .ok_or(MapError::InvalidSize { cols, rows })?;
        if body.len() != rows {
            return Err(MapError::RowCount {
                expected: rows,
                found: body.len(),
            });
        }

        let mut symbols = Grid::filled(torus, MapSymbol::Land);
        for (row, chars) in body.iter().enumerate() {
            if chars.len() != cols {
                return Err(MapError::RowLength {
                    row,
                    expected: cols,
                    found: chars.len(),
                });
            }
            for (col, &c) in chars.iter().enumerate() {
                let symbol = MapSymbol::from_char(c)
                    .ok_or(MapError::UnknownSymbol { row, col, symbol: c })?;
                if let MapSymbol::Hill(colony) | MapSymbol::Ant(colony) | MapSymbol::AntOnHill(colony) =
                    symbol
                    && colony.index() >= players
                {
                    return Err(MapError::ColonyOutOfRange {
                        row,
                        col,
                        colony,
                        players,
                    });
                }
                // Both fit in u16 because the torus was built from them
                #[allow(clippy::cast_possible_truncation)]
                let coord = Coord::new(col as u16, row as u16);
                symbols[coord] = symbol;
            }
        }

        Ok(Self {
            colonies: players,
            symbols,
        })
    }
}

fn parse_header(key: &'static str, value: &str) -> Result<usize, MapError> {
    value.trim().parse().map_err(|_| MapError::InvalidHeader {
        key,
        value: value.trim().to_string(),
    })
}

impl fmt::Display for MapText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let torus = self.torus();
        writeln!(f, "rows {}", torus.height())?;
        writeln!(f, "cols {}", torus.width())?;
        writeln!(f, "players {}", self.colonies)?;
        for y in 0..torus.height() {
            f.write_str("m ")?;
            for x in 0..torus.width() {
                write!(f, "{}", self.symbols.at(x, y).to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
