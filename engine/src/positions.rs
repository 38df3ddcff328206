// Manually tracked FX positions, persisted as a JSON book
use crate::error::EngineError;
use chrono::Utc;
use serde::Serialize;
use shared::models::{Position, PositionSide, PositionStatus};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use uuid::Uuid;

/// Units of the base currency in one standard lot.
pub const STANDARD_LOT_SIZE: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PnL {
    /// Quote-currency profit converted at the exit rate.
    pub usd: f64,
    /// Profit in the quote currency.
    pub clp: f64,
}

/// Profit of `position` at its close price, or at `current_rate` while it is
/// still open.
pub fn pnl(position: &Position, current_rate: f64) -> PnL {
    let exit = position.close_price.unwrap_or(current_rate);
    let lot_value = position.lot_size * STANDARD_LOT_SIZE;

    let clp = match position.direction {
        PositionSide::Buy => (exit - position.entry_price) * lot_value,
        PositionSide::Sell => (position.entry_price - exit) * lot_value,
    };
    let usd = if exit != 0.0 { clp / exit } else { 0.0 };
    PnL { usd, clp }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PositionBook {
    positions: Vec<Position>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the book at `path`; a missing file is an empty book.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No position book on disk, starting empty");
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };
        let positions: Vec<Position> = serde_json::from_str(&raw)?;
        tracing::debug!(path = %path.display(), count = positions.len(), "Loaded position book");
        Ok(Self { positions })
    }

    /// Writes the book to `path`. An empty book removes the file instead.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        if self.positions.is_empty() {
            match fs::remove_file(path) {
                Ok(()) => tracing::debug!(path = %path.display(), "Removed empty position book"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            return Ok(());
        }
        fs::write(path, serde_json::to_string_pretty(&self.positions)?)?;
        Ok(())
    }

    pub fn open(&mut self, direction: PositionSide, entry_price: f64, lot_size: f64) -> Result<&Position, EngineError> {
        if !entry_price.is_finite() || entry_price <= 0.0 {
            return Err(EngineError::PositionError(format!(
                "Entry price must be positive, got {}",
                entry_price
            )));
        }
        if !lot_size.is_finite() || lot_size <= 0.0 {
            return Err(EngineError::PositionError(format!(
                "Lot size must be positive, got {}",
                lot_size
            )));
        }

        let position = Position {
            id: Uuid::new_v4().to_string(),
            direction,
            entry_price,
            lot_size,
            open_date: Utc::now(),
            status: PositionStatus::Open,
            close_price: None,
            close_date: None,
        };
        tracing::info!(id = %position.id, ?direction, entry_price, lot_size, "Opened position");
        self.positions.push(position);
        Ok(&self.positions[self.positions.len() - 1])
    }

    /// Closes an open position at `close_price`.
    pub fn close(&mut self, id: &str, close_price: f64) -> Result<&Position, EngineError> {
        if !close_price.is_finite() || close_price <= 0.0 {
            return Err(EngineError::PositionError(format!(
                "Close price must be positive, got {}",
                close_price
            )));
        }
        let position = self
            .positions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        if !position.is_open() {
            return Err(EngineError::PositionError(format!("Position '{}' is already closed", id)));
        }

        position.status = PositionStatus::Closed;
        position.close_price = Some(close_price);
        position.close_date = Some(Utc::now());
        tracing::info!(id = %id, close_price, "Closed position");
        Ok(position)
    }

    pub fn remove(&mut self, id: &str) -> Result<Position, EngineError> {
        let idx = self
            .positions
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        tracing::info!(id = %id, "Removed position");
        Ok(self.positions.remove(idx))
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn open_positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter().filter(|p| p.is_open())
    }

    pub fn closed_positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter().filter(|p| !p.is_open())
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn not_found(id: &str) -> EngineError {
    EngineError::PositionError(format!("No position with id '{}'", id))
}
