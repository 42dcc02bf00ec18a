//! Edits on the table under the cursor

use crate::commands::Cmd;
use crate::engine::EngineRequest;
use crate::messages::TableMsg;
use crate::model::AppModel;

pub fn update_table(model: &mut AppModel, msg: TableMsg) -> Option<Cmd> {
    if model.is_restricted() {
        tracing::debug!(?msg, "table edits are disabled");
        return None;
    }
    let entry = model.current()?;
    let selection = entry.cursor.selection();

    if msg == TableMsg::Convert {
        let Some(rect) = selection.single_rect() else {
            tracing::debug!("convert needs a single finite rectangle");
            return None;
        };
        if entry.sheet.tables.intersecting(&rect).next().is_some() {
            tracing::debug!(?rect, "convert would overlap a table");
            return None;
        }
        return Some(Cmd::engine(selection, EngineRequest::ConvertToTable { rect }));
    }

    let Some(table) = entry.sheet.tables.at(selection.cursor()) else {
        tracing::debug!(?msg, "cursor is not on a table");
        return None;
    };
    let name = table.name.clone();
    let columns = table.column_count();

    let request = match msg {
        TableMsg::Flatten => EngineRequest::FlattenTable { name },
        TableMsg::InsertColumn { index } => {
            if table.is_read_only() || index > columns {
                tracing::debug!(table = %name, index, "cannot insert table column");
                return None;
            }
            EngineRequest::TableInsertColumn { name, index }
        }
        TableMsg::RemoveColumn { index } => {
            // A table keeps at least one column
            if table.is_read_only() || index >= columns || columns <= 1 {
                tracing::debug!(table = %name, index, "cannot remove table column");
                return None;
            }
            EngineRequest::TableRemoveColumn { name, index }
        }
        TableMsg::Sort { column, ascending } => {
            if column >= columns {
                return None;
            }
            EngineRequest::SortTable {
                name,
                column,
                ascending,
            }
        }
        TableMsg::Convert => return None,
    };
    Some(Cmd::engine(selection, request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::geometry::Rect;
    use crate::model::{SheetInfo, TableKind, TableMap, TableRegion};
    use crate::theme::Theme;

    fn model_with(table: TableRegion) -> AppModel {
        let mut model = AppModel::new(800.0, 600.0, GridConfig::default(), Theme::default());
        let mut info = SheetInfo::new("s1", "Sheet 1");
        info.tables = TableMap::new(vec![table]);
        model.sheets.upsert(info);
        model.ready = true;
        model
    }

    fn request(cmd: Option<Cmd>) -> Option<EngineRequest> {
        cmd.and_then(|c| c.engine_calls().first().map(|call| call.request.clone()))
    }

    #[test]
    fn test_insert_and_remove_column_on_import_table() {
        let mut model = model_with(TableRegion::new("T", Rect::new(1, 1, 3, 5), TableKind::Import));
        assert_eq!(
            request(update_table(&mut model, TableMsg::InsertColumn { index: 3 })),
            Some(EngineRequest::TableInsertColumn {
                name: "T".to_string(),
                index: 3
            })
        );
        assert_eq!(request(update_table(&mut model, TableMsg::InsertColumn { index: 4 })), None);
        assert_eq!(request(update_table(&mut model, TableMsg::RemoveColumn { index: 3 })), None);
        assert!(update_table(&mut model, TableMsg::RemoveColumn { index: 0 }).is_some());
    }

    #[test]
    fn test_code_table_columns_are_fixed() {
        let mut model = model_with(TableRegion::new("Out", Rect::new(1, 1, 3, 5), TableKind::Code));
        assert_eq!(update_table(&mut model, TableMsg::InsertColumn { index: 0 }), None);
        assert!(update_table(&mut model, TableMsg::Flatten).is_some());
        assert!(update_table(&mut model, TableMsg::Sort { column: 2, ascending: false }).is_some());
    }

    #[test]
    fn test_convert_rejects_overlap() {
        let mut model = model_with(TableRegion::new("T", Rect::new(5, 5, 6, 6), TableKind::Import));
        if let Some(entry) = model.current_mut() {
            entry.cursor.select_rect(Rect::new(1, 1, 5, 5), false);
        }
        assert_eq!(update_table(&mut model, TableMsg::Convert), None);
        if let Some(entry) = model.current_mut() {
            entry.cursor.select_rect(Rect::new(1, 1, 4, 4), false);
        }
        assert_eq!(
            request(update_table(&mut model, TableMsg::Convert)),
            Some(EngineRequest::ConvertToTable {
                rect: Rect::new(1, 1, 4, 4)
            })
        );
    }

    #[test]
    fn test_off_table_and_restricted() {
        let mut model = model_with(TableRegion::new("T", Rect::new(5, 5, 6, 6), TableKind::Import));
        assert_eq!(update_table(&mut model, TableMsg::Flatten), None);
        model.config.restricted = true;
        assert_eq!(update_table(&mut model, TableMsg::Convert), None);
    }
}
