//! editor.rs
//!
//! Локальное состояние редактора схемы мест шаблона.
//!
//! Каждое место получает стабильный клиентский идентификатор (uuid) в момент
//! загрузки или создания, и все операции редактора матчат места только по нему.
//! Это убирает двусмысленность "identity против (row, col, code)" из исходной
//! реализации: два места никогда не склеиваются, даже если во время
//! редактирования временно совпали по позиции.
//!
//! Сохранение - полный batch upsert; валидация "всё или ничего" до отправки.
//! Удаление несохранённого места не трогает сеть; удаление сохранённого
//! подтверждается вызывающим кодом только после успешного запроса.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::seat::{SeatClass, SeatTemplateBundle, TemplateSeat};
use crate::seatmap::{GridLayout, LayoutError, MergedSeat, SeatGrid};

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("cell ({row},{col}) is outside the {rows}x{cols} grid")]
    OutOfGrid { row: u32, col: u32, rows: u32, cols: u32 },
    #[error("no seat is selected")]
    NoSelection,
    #[error("unknown seat reference")]
    UnknownSeat,
    #[error("seat \"{seat_code}\" is not persisted yet; use bulk save first")]
    NotPersisted { seat_code: String },
}

/// Поле, провалившее валидацию перед сохранением.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatField {
    SeatCode,
    BasePrice,
    PosRow,
    PosCol,
}

impl SeatField {
    fn describe(&self) -> &'static str {
        match self {
            SeatField::SeatCode => "seat_code must not be empty",
            SeatField::BasePrice => "base_price must not be negative",
            SeatField::PosRow => "pos_row must be within the grid",
            SeatField::PosCol => "pos_col must be within the grid",
        }
    }
}

/// Валидация именует и место и поле; сохранение при этом не выполняется вовсе.
#[derive(Debug, thiserror::Error)]
#[error("seat #{} (\"{seat_code}\" at {row},{col}): {}", index + 1, field.describe())]
pub struct SeatValidationError {
    /// Нулевая позиция в списке редактора; в сообщении нумеруем с единицы.
    pub index: usize,
    pub seat_code: String,
    pub row: u32,
    pub col: u32,
    pub field: SeatField,
}

/// Место в локальном состоянии редактора. `id` есть только у сохранённых.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSeat {
    pub local_id: Uuid,
    pub id: Option<i64>,
    pub seat_code: String,
    pub seat_class: SeatClass,
    pub base_price: f64,
    pub pos_row: u32,
    pub pos_col: u32,
}

impl EditorSeat {
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Правки из формы, применяемые к выбранному месту.
#[derive(Debug, Clone)]
pub struct SeatEdit {
    pub seat_code: String,
    pub seat_class: SeatClass,
    pub base_price: f64,
    pub pos_row: u32,
    pub pos_col: u32,
}

/// Элемент batch upsert; id сериализуем только для сохранённых мест.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatUpsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub seat_code: String,
    pub seat_class: SeatClass,
    pub base_price: f64,
    pub pos_row: u32,
    pub pos_col: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Клик по занятой ячейке: место выбрано для редактирования.
    Selected(Uuid),
    /// Клик по пустой ячейке: создано новое место (только в локальном состоянии).
    Created(Uuid),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemovalOutcome {
    /// Место не было сохранено - выброшено из локального состояния, сети не было.
    Dropped,
    /// Место сохранено: вызывающий код обязан сначала удалить его на бэкенде,
    /// затем вызвать `confirm_removed`.
    NeedsDelete { id: i64 },
}

pub struct SeatMapEditor {
    layout: GridLayout,
    seats: Vec<EditorSeat>,
    selected: Option<Uuid>,
    default_price: f64,
}

impl SeatMapEditor {
    pub fn from_bundle(bundle: &SeatTemplateBundle, default_price: f64) -> Result<Self, LayoutError> {
        let layout = GridLayout::from_meta(bundle.template.meta_json.as_ref())?;
        Ok(Self::new(layout, &bundle.seats, default_price))
    }

    pub fn new(layout: GridLayout, seats: &[TemplateSeat], default_price: f64) -> Self {
        let seats = seats
            .iter()
            .map(|s| EditorSeat {
                local_id: Uuid::new_v4(),
                id: s.id,
                seat_code: s.seat_code.clone(),
                seat_class: s.seat_class,
                base_price: s.base_price,
                pos_row: s.pos_row,
                pos_col: s.pos_col,
            })
            .collect();
        Self {
            layout,
            seats,
            selected: None,
            default_price,
        }
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn seats(&self) -> &[EditorSeat] {
        &self.seats
    }

    pub fn selected_seat(&self) -> Option<&EditorSeat> {
        let id = self.selected?;
        self.seats.iter().find(|s| s.local_id == id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // Пространственный индекс; при дубликате позиции побеждает последнее место.
    fn seat_at(&self, row: u32, col: u32) -> Option<&EditorSeat> {
        let mut index: HashMap<(u32, u32), &EditorSeat> = HashMap::new();
        for seat in &self.seats {
            index.insert((seat.pos_row, seat.pos_col), seat);
        }
        index.remove(&(row, col))
    }

    /// Клик по ячейке: занятая выбирается, пустая порождает новое место
    /// с кодом `S{row}{col}`, классом standard и ценой по умолчанию.
    pub fn click_cell(&mut self, row: u32, col: u32) -> Result<ClickOutcome, EditorError> {
        if !self.layout.contains(row, col) {
            return Err(EditorError::OutOfGrid {
                row,
                col,
                rows: self.layout.rows,
                cols: self.layout.cols,
            });
        }
        if let Some(existing) = self.seat_at(row, col) {
            let id = existing.local_id;
            self.selected = Some(id);
            return Ok(ClickOutcome::Selected(id));
        }
        let seat = EditorSeat {
            local_id: Uuid::new_v4(),
            id: None,
            seat_code: format!("S{row}{col}"),
            seat_class: SeatClass::Standard,
            base_price: self.default_price,
            pos_row: row,
            pos_col: col,
        };
        let id = seat.local_id;
        self.seats.push(seat);
        self.selected = Some(id);
        Ok(ClickOutcome::Created(id))
    }

    /// Правки формы применяются к выбранному месту, матчинг только по identity.
    pub fn apply_edit(&mut self, edit: SeatEdit) -> Result<(), EditorError> {
        let selected = self.selected.ok_or(EditorError::NoSelection)?;
        let seat = self
            .seats
            .iter_mut()
            .find(|s| s.local_id == selected)
            .ok_or(EditorError::UnknownSeat)?;
        seat.seat_code = edit.seat_code;
        seat.seat_class = edit.seat_class;
        seat.base_price = edit.base_price;
        seat.pos_row = edit.pos_row;
        seat.pos_col = edit.pos_col;
        Ok(())
    }

    pub fn remove_seat(&mut self, local_id: Uuid) -> Result<RemovalOutcome, EditorError> {
        let seat = self
            .seats
            .iter()
            .find(|s| s.local_id == local_id)
            .ok_or(EditorError::UnknownSeat)?;
        match seat.id {
            // Сохранённое место остаётся видимым до успешного удаления на бэкенде.
            Some(id) => Ok(RemovalOutcome::NeedsDelete { id }),
            None => {
                self.drop_local(local_id);
                Ok(RemovalOutcome::Dropped)
            }
        }
    }

    /// Вызывается после успешного DELETE на бэкенде.
    pub fn confirm_removed(&mut self, local_id: Uuid) {
        self.drop_local(local_id);
    }

    fn drop_local(&mut self, local_id: Uuid) {
        self.seats.retain(|s| s.local_id != local_id);
        if self.selected == Some(local_id) {
            self.selected = None;
        }
    }

    /// Валидация всех мест перед batch upsert. Всё или ничего: первая
    /// ошибка прерывает сохранение целиком.
    pub fn validate_for_save(&self) -> Result<Vec<SeatUpsert>, SeatValidationError> {
        let mut payload = Vec::with_capacity(self.seats.len());
        for (index, seat) in self.seats.iter().enumerate() {
            let fail = |field| SeatValidationError {
                index,
                seat_code: seat.seat_code.clone(),
                row: seat.pos_row,
                col: seat.pos_col,
                field,
            };
            if seat.seat_code.trim().is_empty() {
                return Err(fail(SeatField::SeatCode));
            }
            if seat.base_price < 0.0 {
                return Err(fail(SeatField::BasePrice));
            }
            if seat.pos_row == 0 || seat.pos_row > self.layout.rows {
                return Err(fail(SeatField::PosRow));
            }
            if seat.pos_col == 0 || seat.pos_col > self.layout.cols {
                return Err(fail(SeatField::PosCol));
            }
            payload.push(SeatUpsert {
                id: seat.id,
                seat_code: seat.seat_code.trim().to_string(),
                seat_class: seat.seat_class,
                base_price: seat.base_price,
                pos_row: seat.pos_row,
                pos_col: seat.pos_col,
            });
        }
        Ok(payload)
    }

    /// Сетка для рендеринга текущего локального состояния.
    pub fn grid(&self) -> SeatGrid {
        let merged: Vec<MergedSeat> = self
            .seats
            .iter()
            .map(|s| MergedSeat {
                seat_code: s.seat_code.clone(),
                row: s.pos_row,
                col: s.pos_col,
                class: s.seat_class,
                price: s.base_price,
                status: crate::seatmap::SaleStatus::Available,
            })
            .collect();
        SeatGrid::build(self.layout, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(code: &str, id: Option<i64>, row: u32, col: u32) -> TemplateSeat {
        TemplateSeat {
            id,
            seat_code: code.to_string(),
            seat_class: SeatClass::Standard,
            base_price: 100.0,
            pos_row: row,
            pos_col: col,
        }
    }

    fn editor(rows: u32, cols: u32, seats: &[TemplateSeat]) -> SeatMapEditor {
        SeatMapEditor::new(GridLayout::new(rows, cols).unwrap(), seats, 300_000.0)
    }

    #[test]
    fn click_on_empty_cell_creates_defaulted_seat() {
        let mut ed = editor(2, 2, &[]);
        let outcome = ed.click_cell(1, 2).unwrap();
        assert!(matches!(outcome, ClickOutcome::Created(_)));

        let created = ed.selected_seat().unwrap();
        assert_eq!(created.seat_code, "S12");
        assert_eq!(created.seat_class, SeatClass::Standard);
        assert_eq!(created.base_price, 300_000.0);
        assert_eq!((created.pos_row, created.pos_col), (1, 2));
        assert!(!created.is_persisted());
    }

    #[test]
    fn click_on_occupied_cell_selects_it() {
        let mut ed = editor(2, 2, &[seat("A1", Some(5), 1, 1)]);
        let outcome = ed.click_cell(1, 1).unwrap();
        assert!(matches!(outcome, ClickOutcome::Selected(_)));
        assert_eq!(ed.selected_seat().unwrap().seat_code, "A1");
        assert_eq!(ed.seats().len(), 1);
    }

    #[test]
    fn click_outside_grid_is_rejected() {
        let mut ed = editor(2, 2, &[]);
        assert!(matches!(
            ed.click_cell(3, 1),
            Err(EditorError::OutOfGrid { .. })
        ));
    }

    #[test]
    fn edits_follow_identity_not_position() {
        let mut ed = editor(3, 3, &[seat("A1", Some(1), 1, 1), seat("A2", Some(2), 1, 2)]);
        ed.click_cell(1, 1).unwrap();
        // Двигаем A1 на позицию A2: временно две записи на (1,2).
        ed.apply_edit(SeatEdit {
            seat_code: "A1".into(),
            seat_class: SeatClass::Vip,
            base_price: 1.0,
            pos_row: 1,
            pos_col: 2,
        })
        .unwrap();

        let a1 = ed.seats().iter().find(|s| s.seat_code == "A1").unwrap();
        let a2 = ed.seats().iter().find(|s| s.seat_code == "A2").unwrap();
        assert_eq!((a1.pos_row, a1.pos_col), (1, 2));
        assert_eq!(a1.seat_class, SeatClass::Vip);
        // Второе место не затронуто, хотя делит позицию.
        assert_eq!((a2.pos_row, a2.pos_col), (1, 2));
        assert_eq!(a2.seat_class, SeatClass::Standard);
    }

    #[test]
    fn apply_edit_without_selection_fails() {
        let mut ed = editor(2, 2, &[seat("A1", None, 1, 1)]);
        let result = ed.apply_edit(SeatEdit {
            seat_code: "A1".into(),
            seat_class: SeatClass::Standard,
            base_price: 1.0,
            pos_row: 1,
            pos_col: 1,
        });
        assert!(matches!(result, Err(EditorError::NoSelection)));
    }

    #[test]
    fn removing_unpersisted_seat_drops_immediately() {
        let mut ed = editor(2, 2, &[]);
        ed.click_cell(1, 1).unwrap();
        let local_id = ed.selected_seat().unwrap().local_id;

        let outcome = ed.remove_seat(local_id).unwrap();
        assert_eq!(outcome, RemovalOutcome::Dropped);
        assert!(ed.seats().is_empty());
        assert!(ed.selected_seat().is_none());
    }

    #[test]
    fn removing_persisted_seat_waits_for_backend() {
        let mut ed = editor(2, 2, &[seat("A1", Some(42), 1, 1)]);
        let local_id = ed.seats()[0].local_id;

        let outcome = ed.remove_seat(local_id).unwrap();
        assert_eq!(outcome, RemovalOutcome::NeedsDelete { id: 42 });
        // Место всё ещё видно - удаление не оптимистичное.
        assert_eq!(ed.seats().len(), 1);

        ed.confirm_removed(local_id);
        assert!(ed.seats().is_empty());
    }

    #[test]
    fn validation_is_all_or_nothing_and_names_the_field() {
        let mut seats = vec![
            seat("A1", Some(1), 1, 1),
            seat("A2", Some(2), 1, 2),
            seat("A3", Some(3), 2, 1),
        ];
        seats[2].base_price = -5.0;
        let ed = editor(2, 2, &seats);

        let err = ed.validate_for_save().unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.seat_code, "A3");
        assert_eq!(err.field, SeatField::BasePrice);
        // Третье место из пяти - "seat #3", не "#2".
        assert!(err.to_string().starts_with("seat #3"));
        assert!(err.to_string().contains("A3"));
        assert!(err.to_string().contains("base_price"));
    }

    #[test]
    fn validation_rejects_blank_code_and_out_of_grid_position() {
        let ed = editor(2, 2, &[seat("  ", None, 1, 1)]);
        assert_eq!(ed.validate_for_save().unwrap_err().field, SeatField::SeatCode);

        let ed = editor(2, 2, &[seat("A1", None, 3, 1)]);
        assert_eq!(ed.validate_for_save().unwrap_err().field, SeatField::PosRow);

        let ed = editor(2, 2, &[seat("A1", None, 1, 0)]);
        assert_eq!(ed.validate_for_save().unwrap_err().field, SeatField::PosCol);
    }

    #[test]
    fn upsert_payload_keeps_id_only_for_persisted_seats() {
        let mut ed = editor(2, 2, &[seat("A1", Some(7), 1, 1)]);
        ed.click_cell(2, 2).unwrap();

        let payload = ed.validate_for_save().unwrap();
        assert_eq!(payload.len(), 2);
        assert_eq!(payload[0].id, Some(7));
        assert_eq!(payload[1].id, None);

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json[0].get("id").is_some());
        assert!(json[1].get("id").is_none());
    }

    #[test]
    fn save_then_reload_preserves_seat_tuples() {
        let mut ed = editor(3, 3, &[seat("A1", Some(1), 1, 1), seat("A2", Some(2), 1, 2)]);
        ed.click_cell(3, 3).unwrap();

        let payload = ed.validate_for_save().unwrap();
        // Ответ бэкенда после batch save: те же места, все с id.
        let reloaded: Vec<TemplateSeat> = payload
            .iter()
            .enumerate()
            .map(|(i, u)| TemplateSeat {
                id: Some(u.id.unwrap_or(100 + i as i64)),
                seat_code: u.seat_code.clone(),
                seat_class: u.seat_class,
                base_price: u.base_price,
                pos_row: u.pos_row,
                pos_col: u.pos_col,
            })
            .collect();
        let ed2 = editor(3, 3, &reloaded);

        let tuple = |s: &EditorSeat| {
            (
                s.seat_code.clone(),
                s.pos_row,
                s.pos_col,
                s.seat_class,
                s.base_price.to_bits(),
            )
        };
        let before: Vec<_> = ed.seats().iter().map(tuple).collect();
        let after: Vec<_> = ed2.seats().iter().map(tuple).collect();
        assert_eq!(before, after);
        assert!(ed2.seats().iter().all(EditorSeat::is_persisted));
    }

    #[test]
    fn grid_reflects_local_edits() {
        let mut ed = editor(2, 2, &[]);
        ed.click_cell(2, 1).unwrap();
        let grid = ed.grid();
        assert_eq!(grid.cells().len(), 4);
        assert!(!grid.cell(2, 1).unwrap().is_empty());
    }
}
