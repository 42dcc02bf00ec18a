//! Column/row insert and delete
//!
//! The request goes to the engine, and the local offsets and selection are
//! shifted right away so the grid does not jump while the reply is in flight.

use crate::commands::Cmd;
use crate::engine::EngineRequest;
use crate::events::Event;
use crate::messages::StructuralMsg;
use crate::model::AppModel;
use crate::structural::{plan_delete, plan_insert};

pub fn update_structural(model: &mut AppModel, msg: StructuralMsg) -> Option<Cmd> {
    let restricted = model.is_restricted();
    let entry = model.current_mut()?;

    let cmd = match msg {
        StructuralMsg::Insert { axis, before } => {
            let plan = match plan_insert(entry.cursor.selection(), &entry.sheet, axis, before, restricted) {
                Ok(plan) => plan,
                Err(reason) => {
                    tracing::debug!(axis = axis.name(), %reason, "insert unavailable");
                    return None;
                }
            };
            let cmd = Cmd::engine(
                entry.cursor.selection(),
                EngineRequest::InsertLines {
                    axis,
                    at: plan.at,
                    count: plan.count,
                },
            );
            entry.sheet.offsets.axis_mut(axis).insert(plan.at, plan.count);
            entry.cursor.inserted_lines(axis, plan.at, plan.count);
            cmd
        }
        StructuralMsg::Delete { axis } => {
            let plan = match plan_delete(entry.cursor.selection(), axis, restricted) {
                Ok(plan) => plan,
                Err(reason) => {
                    tracing::debug!(axis = axis.name(), %reason, "delete unavailable");
                    return None;
                }
            };
            let cmd = Cmd::engine(
                entry.cursor.selection(),
                EngineRequest::DeleteLines {
                    axis,
                    indices: plan.indices.clone(),
                },
            );
            // Highest first so earlier indices stay put
            for &index in plan.indices.iter().rev() {
                entry.sheet.offsets.axis_mut(axis).remove(index, 1);
                entry.cursor.removed_lines(axis, index, 1);
            }
            cmd
        }
    };

    let sheet = entry.sheet.id.clone();
    model.dirty.mark_all();
    model.events.emit(&Event::OffsetsChanged { sheet });
    Some(Cmd::batch(vec![cmd, Cmd::Redraw]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::geometry::{Axis, Pos};
    use crate::model::SheetInfo;
    use crate::theme::Theme;

    fn model() -> AppModel {
        let mut model = AppModel::new(800.0, 600.0, GridConfig::default(), Theme::default());
        model.sheets.upsert(SheetInfo::new("s1", "Sheet 1"));
        model.ready = true;
        model
    }

    #[test]
    fn test_insert_before_shifts_sizes_and_cursor() {
        let mut model = model();
        if let Some(entry) = model.current_mut() {
            entry.sheet.offsets.columns.set_size(3, 55.0);
            entry.cursor.move_to(3, 2, false);
        }
        let cmd = update_structural(
            &mut model,
            StructuralMsg::Insert {
                axis: Axis::Column,
                before: true,
            },
        )
        .expect("cmd");
        assert_eq!(
            cmd.engine_calls()[0].request,
            EngineRequest::InsertLines {
                axis: Axis::Column,
                at: 3,
                count: 1
            }
        );
        let entry = model.current().expect("sheet");
        assert_eq!(entry.sheet.offsets.columns.size(4), 55.0);
        assert_eq!(entry.cursor.position(), Pos::new(4, 2));
    }

    #[test]
    fn test_delete_selected_rows() {
        let mut model = model();
        if let Some(entry) = model.current_mut() {
            entry.sheet.offsets.rows.set_size(6, 40.0);
            entry.cursor.select_row(2, false, false, None);
            entry.cursor.select_row(3, false, true, None);
        }
        let cmd = update_structural(&mut model, StructuralMsg::Delete { axis: Axis::Row }).expect("cmd");
        assert_eq!(
            cmd.engine_calls()[0].request,
            EngineRequest::DeleteLines {
                axis: Axis::Row,
                indices: vec![2, 3]
            }
        );
        assert_eq!(model.current().expect("sheet").sheet.offsets.rows.size(4), 40.0);
    }

    #[test]
    fn test_restricted_mode_does_nothing() {
        let mut model = model();
        model.config.restricted = true;
        assert_eq!(
            update_structural(
                &mut model,
                StructuralMsg::Insert {
                    axis: Axis::Row,
                    before: false
                }
            ),
            None
        );
    }
}
