//! Selection token (de)serialization
//!
//! Tokens are compact JSON and travel to the engine with every request and to
//! other users through presence.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::geometry::{is_valid_coord, Pos, UNBOUNDED};
use crate::model::sheet::SheetId;

use super::{CellRange, Selection};

#[derive(Serialize, Deserialize)]
struct SelectionToken {
    sheet_id: SheetId,
    cursor: Pos,
    anchor: Pos,
    active: usize,
    ranges: Vec<CellRange>,
}

impl Selection {
    /// Serialize to a token string
    pub fn save(&self) -> String {
        let token = SelectionToken {
            sheet_id: self.sheet_id.clone(),
            cursor: self.cursor,
            anchor: self.anchor,
            active: self.active,
            ranges: self.ranges.clone(),
        };
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string(&token).unwrap_or_default()
    }

    /// Parse and validate a token produced by [`save`](Self::save)
    pub fn load(token: &str) -> Result<Selection> {
        let parsed: SelectionToken =
            serde_json::from_str(token).context("malformed selection token")?;

        if parsed.ranges.is_empty() {
            bail!("selection token has no ranges");
        }
        if parsed.active >= parsed.ranges.len() {
            bail!(
                "active range {} out of bounds ({} ranges)",
                parsed.active,
                parsed.ranges.len()
            );
        }
        if !parsed.cursor.is_valid() || !parsed.anchor.is_valid() {
            bail!("cursor or anchor is not a valid cell");
        }
        for range in &parsed.ranges {
            validate_range(range)?;
        }
        // An open-ended "rect" is really a line or whole-sheet range
        let ranges = parsed
            .ranges
            .into_iter()
            .map(|range| match range {
                CellRange::Rect(rect) if !rect.is_finite() => CellRange::from_rect(rect),
                other => other,
            })
            .collect();

        Ok(Selection {
            sheet_id: parsed.sheet_id,
            ranges,
            active: parsed.active,
            anchor: parsed.anchor,
            cursor: parsed.cursor,
        })
    }
}

fn validate_range(range: &CellRange) -> Result<()> {
    let rect = range.to_rect();
    if !is_valid_coord(rect.min.x) || !is_valid_coord(rect.min.y) {
        bail!("range {range:?} starts outside the sheet");
    }
    let max_ok = |v: i64| v == UNBOUNDED || is_valid_coord(v);
    if !max_ok(rect.max.x) || !max_ok(rect.max.y) {
        bail!("range {range:?} ends outside the sheet");
    }
    if rect.min.x > rect.max.x || rect.min.y > rect.max.y {
        bail!("range {range:?} has reversed bounds");
    }
    Ok(())
}
