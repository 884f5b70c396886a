use chrono::NaiveDate;
use dam_core::store::MemoryStore;
use dam_core::{CalibrationContext, CalibrationTable, Field, RawReading};
use dam_data::{aggregate, AggregateError, Logbook, ViewFilter};
use dam_utils::dates::YearMonth;

const SURFACE_CURVE: &str = "\
Cote;Surface (ha)
104,00;1150,0
105,00;1200,5
";

const VOLUME_CURVE: &str = "\
Cote,Volume
104.00,290.0
105.00,300.750
";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn context() -> CalibrationContext {
    CalibrationContext::new(
        CalibrationTable::load(SURFACE_CURVE),
        CalibrationTable::load(VOLUME_CURVE),
    )
}

fn reference_store() -> MemoryStore {
    MemoryStore::with_records(vec![
        RawReading::new(date(2024, 3, 2))
            .with(Field::Cote, "105")
            .with(Field::LectureBac, "8")
            .with(Field::Vdf, "1.2")
            .with(Field::Dvr, "0.3")
            .with(Field::Fuites, "0.05")
            .with(Field::Transfert, "0")
            .with(Field::Pluie, "0"),
        RawReading::new(date(2024, 3, 1)).with(Field::Cote, "104"),
    ])
}

#[test]
fn reference_day_end_to_end() {
    let book = Logbook::new(reference_store(), context());
    let m = book.derive_for_record(date(2024, 3, 2)).unwrap();
    assert!(close(m.surface, 1200.5));
    assert!(close(m.volume, 300.75));
    assert!(close(m.gains, 10.75));
    assert!(close(m.evaporation, 7.49112));
    assert!(close(m.defluent, 9.04112));
    assert!(close(m.affluent, 19.79112));
    assert!((m.taux - 300.75 * 100.0 / 880.139).abs() < 1e-12);
    assert!(m.taux > 34.17 && m.taux < 34.18);
}

#[test]
fn level_outside_calibration() {
    let store = MemoryStore::with_records(vec![RawReading::new(date(2024, 3, 2))
        .with(Field::Cote, "999.99")
        .with(Field::LectureBac, "8")
        .with(Field::Vdf, "1.2")
        .with(Field::Dvr, "0.3")
        .with(Field::Fuites, "0.05")]);
    let book = Logbook::new(store, context());
    let m = book.derive_for_record(date(2024, 3, 2)).unwrap();
    assert_eq!(m.surface, 0.0);
    assert_eq!(m.volume, 0.0);
    assert_eq!(m.evaporation, 0.0);
    assert_eq!(m.gains, 0.0);
    assert!(close(m.defluent, 1.55));
    assert!(!m.is_fully_calibrated());
}

#[test]
fn filtering_never_changes_a_days_metrics() {
    let book = Logbook::new(reference_store(), context());
    let full = book.derive_view(&ViewFilter::All).unwrap();
    let single = book.derive_view(&ViewFilter::Day(date(2024, 3, 2))).unwrap();
    let month = book
        .derive_view(&ViewFilter::Month(YearMonth::parse("2024-03").unwrap()))
        .unwrap();
    let page = book.page(&ViewFilter::Day(date(2024, 3, 2)), 1).unwrap();

    let from_full = full.iter().find(|m| m.date == date(2024, 3, 2)).unwrap();
    assert_eq!(&single[0], from_full);
    assert_eq!(&month[1], from_full);
    assert_eq!(&page.items[0], from_full);
}

#[test]
fn gains_are_zero_without_the_previous_day() {
    let store = MemoryStore::with_records(vec![
        RawReading::new(date(2024, 2, 28)).with(Field::Cote, "104"),
        RawReading::new(date(2024, 3, 1)).with(Field::Cote, "105"),
    ]);
    let book = Logbook::new(store, context());
    let rows = book.derive_view(&ViewFilter::All).unwrap();
    assert!(rows.iter().all(|m| m.gains == 0.0));
    assert!(rows.iter().all(|m| m.affluent == m.gains + m.defluent));
}

#[test]
fn totals_equal_the_sum_of_rows() {
    let book = Logbook::new(reference_store(), context());
    let summary = book.summarize(&ViewFilter::All).unwrap();
    let rows = &summary.rows;
    assert_eq!(summary.aggregate.count, 2);
    assert_eq!(rows[0].date, date(2024, 3, 1));

    let expected_affluent: f64 = rows.iter().map(|m| m.affluent).fold(0.0, |a, b| a + b);
    let expected_evaporation: f64 = rows.iter().map(|m| m.evaporation).fold(0.0, |a, b| a + b);
    assert_eq!(summary.aggregate.sum.affluent, expected_affluent);
    assert_eq!(summary.aggregate.sum.evaporation, expected_evaporation);
    assert!(close(
        summary.aggregate.average.affluent,
        expected_affluent / 2.0
    ));
}

#[test]
fn single_day_average_equals_the_day() {
    let book = Logbook::new(reference_store(), context());
    let day = book.derive_for_record(date(2024, 3, 2)).unwrap();
    let agg = aggregate(std::slice::from_ref(&day)).unwrap();
    assert_eq!(agg.average.gains, day.gains);
    assert_eq!(agg.average.defluent, day.defluent);
    assert_eq!(agg.average.pluie, day.pluie);
}

#[test]
fn empty_aggregation_fails_loudly() {
    let none: &[dam_data::DailyMetrics] = &[];
    assert_eq!(aggregate(none).unwrap_err(), AggregateError::EmptySequence);
}

#[test]
fn derived_rows_serialize_for_hosts() {
    let book = Logbook::new(reference_store(), context());
    let m = book.derive_for_record(date(2024, 3, 2)).unwrap();
    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(json["date"], "2024-03-02");
    assert_eq!(json["volume_found"], true);
}
