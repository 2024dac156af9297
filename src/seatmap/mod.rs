//! seatmap.rs
//!
//! Этот модуль реализует примирение разреженного списка мест с плотной сеткой рендеринга.
//!
//! Ключевые компоненты:
//! 1.  **GridLayout**: объявленная форма сетки шаблона (rows x cols). Нулевые или
//!     отсутствующие размеры означают "layout не настроен" - рендерить нельзя.
//! 2.  **derive_sale_status**: чистая функция, сводящая разнородные сигналы бэкенда
//!     (флаг sold, ссылка на позицию заказа, метка времени, строковый статус,
//!     числовой код) к закрытому множеству {Available, Sold}. Таблица решений,
//!     а не проверки на truthiness - порядок приоритетов виден и тестируем.
//! 3.  **merge_trip_seats**: соединение TemplateSeat (геометрия/класс/цена) с
//!     TripSeat (продажное состояние) по seat_code.
//! 4.  **SeatGrid**: плотная адресуемая модель ровно из rows*cols ячеек; при
//!     дубликате позиции детерминированно побеждает последнее место по порядку.

pub mod editor;

use std::collections::HashMap;

use serde::Serialize;

use crate::models::seat::{SeatClass, TemplateMeta, TemplateSeat, TripSeatRecord};

/// Строковые статусы, означающие что место недоступно для продажи.
pub const UNAVAILABLE_STATUSES: [&str; 5] = ["sold", "held", "reserved", "occupied", "unavailable"];

/// Числовые коды статуса от этого значения и выше считаются проданными.
pub const SOLD_STATUS_CODE: i64 = 2;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("template layout (rows/cols) is not configured")]
    NotConfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Available,
    Sold,
}

/// Таблица решений для продажного состояния. Первый сработавший сигнал побеждает;
/// если не сработал ни один - место доступно.
pub fn derive_sale_status(record: &TripSeatRecord) -> SaleStatus {
    if record.sold == Some(true) {
        return SaleStatus::Sold;
    }
    if record.order_item_id.is_some() {
        return SaleStatus::Sold;
    }
    if record.sold_at.is_some() {
        return SaleStatus::Sold;
    }
    if let Some(text) = record.status_text() {
        let lowered = text.to_ascii_lowercase();
        if UNAVAILABLE_STATUSES.contains(&lowered.as_str()) {
            return SaleStatus::Sold;
        }
    }
    if let Some(code) = record.status_code() {
        if code >= SOLD_STATUS_CODE {
            return SaleStatus::Sold;
        }
    }
    SaleStatus::Available
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: u32,
    pub cols: u32,
}

impl GridLayout {
    pub fn new(rows: u32, cols: u32) -> Result<Self, LayoutError> {
        if rows == 0 || cols == 0 {
            return Err(LayoutError::NotConfigured);
        }
        Ok(Self { rows, cols })
    }

    /// Размеры из meta_json шаблона; отсутствующее поле равносильно нулю.
    pub fn from_meta(meta: Option<&TemplateMeta>) -> Result<Self, LayoutError> {
        let meta = meta.ok_or(LayoutError::NotConfigured)?;
        Self::new(meta.rows.unwrap_or(0), meta.cols.unwrap_or(0))
    }

    pub fn cell_count(&self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (1..=self.rows).contains(&row) && (1..=self.cols).contains(&col)
    }
}

/// Место после слияния геометрии шаблона с состоянием рейса.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSeat {
    pub seat_code: String,
    pub row: u32,
    pub col: u32,
    pub class: SeatClass,
    pub price: f64,
    pub status: SaleStatus,
}

impl MergedSeat {
    pub fn is_sold(&self) -> bool {
        self.status == SaleStatus::Sold
    }

    /// Место шаблона без продажного состояния (редактор, превью).
    pub fn from_template(seat: &TemplateSeat) -> Self {
        Self {
            seat_code: seat.seat_code.clone(),
            row: seat.pos_row,
            col: seat.pos_col,
            class: seat.seat_class,
            price: seat.base_price,
            status: SaleStatus::Available,
        }
    }
}

/// Джойн по seat_code: шаблон авторитетен для позиции/класса/цены,
/// TripSeat - только для продажного состояния.
pub fn merge_trip_seats(
    template_seats: &[TemplateSeat],
    trip_seats: &[TripSeatRecord],
) -> Vec<MergedSeat> {
    let by_code: HashMap<&str, &TripSeatRecord> = trip_seats
        .iter()
        .map(|s| (s.seat_code.as_str(), s))
        .collect();

    template_seats
        .iter()
        .map(|ts| {
            let status = by_code
                .get(ts.seat_code.as_str())
                .map(|record| derive_sale_status(record))
                .unwrap_or(SaleStatus::Available);
            MergedSeat {
                seat_code: ts.seat_code.clone(),
                row: ts.pos_row,
                col: ts.pos_col,
                class: ts.seat_class,
                price: ts.base_price,
                status,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridCell {
    Seat(MergedSeat),
    Empty { row: u32, col: u32 },
}

impl GridCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, GridCell::Empty { .. })
    }
}

/// Плотная адресуемая сетка: ровно rows*cols ячеек в row-major порядке.
#[derive(Debug, Clone)]
pub struct SeatGrid {
    pub layout: GridLayout,
    cells: Vec<GridCell>,
}

impl SeatGrid {
    pub fn build(layout: GridLayout, seats: &[MergedSeat]) -> Self {
        // Индекс (row, col) -> место; позиции вне сетки не попадают в ячейки,
        // при совпадении позиций побеждает последнее место по порядку.
        let mut index: HashMap<(u32, u32), &MergedSeat> = HashMap::new();
        for seat in seats {
            if layout.contains(seat.row, seat.col) {
                index.insert((seat.row, seat.col), seat);
            }
        }

        let mut cells = Vec::with_capacity(layout.cell_count());
        for row in 1..=layout.rows {
            for col in 1..=layout.cols {
                cells.push(match index.get(&(row, col)) {
                    Some(seat) => GridCell::Seat((*seat).clone()),
                    None => GridCell::Empty { row, col },
                });
            }
        }
        Self { layout, cells }
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Ячейка по 1-индексированной позиции.
    pub fn cell(&self, row: u32, col: u32) -> Option<&GridCell> {
        if !self.layout.contains(row, col) {
            return None;
        }
        let idx = (row - 1) as usize * self.layout.cols as usize + (col - 1) as usize;
        self.cells.get(idx)
    }

    /// Текстовый рендер для терминала: код места, `*` для проданных,
    /// `··` для пустых кликабельных ячеек.
    pub fn render_text(&self) -> String {
        // Ширина в символах, не в байтах: коды мест не обязаны быть ASCII.
        let width = self
            .cells
            .iter()
            .filter_map(|c| match c {
                GridCell::Seat(s) => Some(s.seat_code.chars().count() + 1),
                GridCell::Empty { .. } => None,
            })
            .max()
            .unwrap_or(2)
            .max(2);

        let mut out = String::new();
        for row in 1..=self.layout.rows {
            for col in 1..=self.layout.cols {
                let text = match self.cell(row, col) {
                    Some(GridCell::Seat(seat)) if seat.is_sold() => {
                        format!("{}*", seat.seat_code)
                    }
                    Some(GridCell::Seat(seat)) => seat.seat_code.clone(),
                    _ => "··".to_string(),
                };
                out.push_str(&format!("{text:<width$} "));
            }
            out.push('\n');
        }
        out
    }
}

/// Сводка для панели статистики экрана рейса.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridSummary {
    pub total: usize,
    pub sold: usize,
    pub available: usize,
    pub vip: usize,
}

pub fn summarize(seats: &[MergedSeat]) -> GridSummary {
    let sold = seats.iter().filter(|s| s.is_sold()).count();
    GridSummary {
        total: seats.len(),
        sold,
        available: seats.len() - sold,
        vip: seats.iter().filter(|s| s.class == SeatClass::Vip).count(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassFilter {
    All,
    Only(SeatClass),
}

pub fn filter_class(seats: &[MergedSeat], filter: ClassFilter) -> Vec<MergedSeat> {
    match filter {
        ClassFilter::All => seats.to_vec(),
        ClassFilter::Only(class) => seats.iter().filter(|s| s.class == class).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seat::StatusValue;
    use proptest::prelude::*;

    fn template_seat(code: &str, row: u32, col: u32, class: SeatClass, price: f64) -> TemplateSeat {
        TemplateSeat {
            id: None,
            seat_code: code.to_string(),
            seat_class: class,
            base_price: price,
            pos_row: row,
            pos_col: col,
        }
    }

    fn record(code: &str) -> TripSeatRecord {
        TripSeatRecord {
            seat_code: code.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn layout_rejects_unset_dimensions() {
        assert!(GridLayout::new(0, 4).is_err());
        assert!(GridLayout::new(4, 0).is_err());
        assert!(GridLayout::from_meta(None).is_err());
        assert!(GridLayout::from_meta(Some(&TemplateMeta::default())).is_err());
        assert!(GridLayout::from_meta(Some(&TemplateMeta {
            rows: Some(2),
            cols: Some(3),
        }))
        .is_ok());
    }

    #[test]
    fn no_signals_means_available() {
        assert_eq!(derive_sale_status(&record("A1")), SaleStatus::Available);
    }

    #[test]
    fn each_signal_alone_means_sold() {
        let mut r = record("A1");
        r.sold = Some(true);
        assert_eq!(derive_sale_status(&r), SaleStatus::Sold);

        let mut r = record("A1");
        r.order_item_id = Some(77);
        assert_eq!(derive_sale_status(&r), SaleStatus::Sold);

        let mut r = record("A1");
        r.sold_at = Some("2025-01-01T00:00:00Z".into());
        assert_eq!(derive_sale_status(&r), SaleStatus::Sold);

        for status in UNAVAILABLE_STATUSES {
            let mut r = record("A1");
            r.status = Some(StatusValue::Text(status.to_uppercase()));
            assert_eq!(derive_sale_status(&r), SaleStatus::Sold, "status {status}");
        }

        let mut r = record("A1");
        r.status = Some(StatusValue::Code(SOLD_STATUS_CODE));
        assert_eq!(derive_sale_status(&r), SaleStatus::Sold);

        let mut r = record("A1");
        r.status_id = Some(9);
        assert_eq!(derive_sale_status(&r), SaleStatus::Sold);
    }

    #[test]
    fn weak_signals_stay_available() {
        let mut r = record("A1");
        r.sold = Some(false);
        r.status = Some(StatusValue::Text("free".into()));
        r.status_id = Some(1);
        assert_eq!(derive_sale_status(&r), SaleStatus::Available);
    }

    #[test]
    fn status_text_falls_back_through_state_and_seat_status() {
        let mut r = record("A1");
        r.state = Some("held".into());
        assert_eq!(derive_sale_status(&r), SaleStatus::Sold);

        let mut r = record("A1");
        r.seat_status = Some("occupied".into());
        assert_eq!(derive_sale_status(&r), SaleStatus::Sold);
    }

    #[test]
    fn merge_template_is_authoritative_for_geometry() {
        let template = vec![template_seat("A1", 1, 1, SeatClass::Vip, 500_000.0)];
        let mut trip = record("A1");
        trip.sold = Some(true);
        let merged = merge_trip_seats(&template, &[trip]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].row, 1);
        assert_eq!(merged[0].col, 1);
        assert_eq!(merged[0].class, SeatClass::Vip);
        assert_eq!(merged[0].price, 500_000.0);
        assert_eq!(merged[0].status, SaleStatus::Sold);
    }

    #[test]
    fn merge_without_trip_record_is_available() {
        let template = vec![template_seat("B2", 2, 2, SeatClass::Standard, 100.0)];
        let merged = merge_trip_seats(&template, &[]);
        assert_eq!(merged[0].status, SaleStatus::Available);
    }

    // Сценарий из спецификации поведения: шаблон 2x2 с одним VIP местом A1.
    #[test]
    fn two_by_two_with_single_vip_seat() {
        let layout = GridLayout::new(2, 2).unwrap();
        let seats = merge_trip_seats(
            &[template_seat("A1", 1, 1, SeatClass::Vip, 500_000.0)],
            &[],
        );
        let grid = SeatGrid::build(layout, &seats);

        assert_eq!(grid.cells().len(), 4);
        match grid.cell(1, 1) {
            Some(GridCell::Seat(seat)) => {
                assert_eq!(seat.seat_code, "A1");
                assert_eq!(seat.class, SeatClass::Vip);
                assert_eq!(seat.status, SaleStatus::Available);
            }
            other => panic!("expected seat at (1,1), got {other:?}"),
        }
        for (r, c) in [(1, 2), (2, 1), (2, 2)] {
            assert!(grid.cell(r, c).unwrap().is_empty(), "({r},{c})");
        }
    }

    #[test]
    fn duplicate_position_later_seat_wins() {
        let layout = GridLayout::new(1, 1).unwrap();
        let seats = vec![
            MergedSeat::from_template(&template_seat("A1", 1, 1, SeatClass::Standard, 1.0)),
            MergedSeat::from_template(&template_seat("B1", 1, 1, SeatClass::Vip, 2.0)),
        ];
        let grid = SeatGrid::build(layout, &seats);
        match grid.cell(1, 1) {
            Some(GridCell::Seat(seat)) => assert_eq!(seat.seat_code, "B1"),
            other => panic!("expected seat, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_seats_do_not_land_in_cells() {
        let layout = GridLayout::new(2, 2).unwrap();
        let seats = vec![MergedSeat::from_template(&template_seat(
            "Z9",
            5,
            5,
            SeatClass::Standard,
            1.0,
        ))];
        let grid = SeatGrid::build(layout, &seats);
        assert!(grid.cells().iter().all(GridCell::is_empty));
    }

    #[test]
    fn summary_counts_sold_and_vip() {
        let mut seats = merge_trip_seats(
            &[
                template_seat("A1", 1, 1, SeatClass::Vip, 10.0),
                template_seat("A2", 1, 2, SeatClass::Standard, 5.0),
            ],
            &[],
        );
        seats[0].status = SaleStatus::Sold;
        let summary = summarize(&seats);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.sold, 1);
        assert_eq!(summary.available, 1);
        assert_eq!(summary.vip, 1);
    }

    #[test]
    fn class_filter_keeps_only_requested_class() {
        let seats = merge_trip_seats(
            &[
                template_seat("A1", 1, 1, SeatClass::Vip, 10.0),
                template_seat("A2", 1, 2, SeatClass::Standard, 5.0),
            ],
            &[],
        );
        let vip = filter_class(&seats, ClassFilter::Only(SeatClass::Vip));
        assert_eq!(vip.len(), 1);
        assert_eq!(vip[0].seat_code, "A1");
        assert_eq!(filter_class(&seats, ClassFilter::All).len(), 2);
    }

    #[test]
    fn render_text_marks_sold_and_empty_cells() {
        let layout = GridLayout::new(1, 2).unwrap();
        let mut seat = MergedSeat::from_template(&template_seat("A1", 1, 1, SeatClass::Vip, 1.0));
        seat.status = SaleStatus::Sold;
        let grid = SeatGrid::build(layout, &[seat]);
        let text = grid.render_text();
        assert!(text.contains("A1*"));
        assert!(text.contains("··"));
    }

    #[test]
    fn render_text_aligns_non_ascii_seat_codes() {
        let layout = GridLayout::new(2, 2).unwrap();
        let seats = vec![
            MergedSeat::from_template(&template_seat("Ж10", 1, 1, SeatClass::Standard, 1.0)),
            MergedSeat::from_template(&template_seat("A1", 2, 2, SeatClass::Standard, 1.0)),
        ];
        let grid = SeatGrid::build(layout, &seats);
        let text = grid.render_text();
        let widths: Vec<usize> = text.lines().map(|l| l.chars().count()).collect();
        assert_eq!(widths.len(), 2);
        assert_eq!(widths[0], widths[1]);
    }

    proptest! {
        // Сетка всегда содержит ровно rows*cols ячеек, каждая либо место либо пустая.
        #[test]
        fn grid_always_dense(rows in 1u32..8, cols in 1u32..8, positions in proptest::collection::vec((1u32..10, 1u32..10), 0..20)) {
            let layout = GridLayout::new(rows, cols).unwrap();
            let seats: Vec<MergedSeat> = positions
                .iter()
                .enumerate()
                .map(|(i, (r, c))| MergedSeat::from_template(&template_seat(&format!("S{i}"), *r, *c, SeatClass::Standard, 1.0)))
                .collect();
            let grid = SeatGrid::build(layout, &seats);
            prop_assert_eq!(grid.cells().len(), layout.cell_count());
        }

        // Монотонность: любой сработавший сигнал означает Sold.
        #[test]
        fn fusion_is_monotonic(sold in proptest::option::of(any::<bool>()),
                               order_item in proptest::option::of(1i64..1000),
                               code in proptest::option::of(0i64..10)) {
            let record = TripSeatRecord {
                seat_code: "A1".into(),
                sold,
                status_id: code,
                order_item_id: order_item,
                ..Default::default()
            };
            let any_signal = sold == Some(true)
                || order_item.is_some()
                || code.map(|c| c >= SOLD_STATUS_CODE).unwrap_or(false);
            let expected = if any_signal { SaleStatus::Sold } else { SaleStatus::Available };
            prop_assert_eq!(derive_sale_status(&record), expected);
        }
    }
}
