//! Selecting and paging readings for display.
//!
//! Filters only choose which rows are shown. Metrics for those rows are
//! always derived against the full [`RecordIndex`](crate::index::RecordIndex).

use chrono::NaiveDate;
use dam_core::RawReading;
use dam_utils::dates::{format_date_fr, YearMonth};
use serde::Serialize;

/// The logbook's search modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFilter {
    All,
    /// A single day
    Day(NaiveDate),
    /// A calendar month
    Month(YearMonth),
    /// An inclusive date range
    Period { start: NaiveDate, end: NaiveDate },
}

impl ViewFilter {
    pub fn matches(&self, reading: &RawReading) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::Day(date) => reading.date == *date,
            ViewFilter::Month(month) => month.contains(&reading.date),
            ViewFilter::Period { start, end } => *start <= reading.date && reading.date <= *end,
        }
    }

    /// Readings matching this filter, oldest first.
    pub fn select<'a, I>(&self, readings: I) -> Vec<&'a RawReading>
    where
        I: IntoIterator<Item = &'a RawReading>,
    {
        let mut selected: Vec<&RawReading> =
            readings.into_iter().filter(|r| self.matches(r)).collect();
        selected.sort_by_key(|r| r.date);
        selected
    }

    /// Title used on the printed table.
    pub fn print_title(&self) -> String {
        match self {
            ViewFilter::All => "Tableau des Données Journalières".to_string(),
            ViewFilter::Day(date) => format!("Tableau de remplissage du {}", format_date_fr(date)),
            ViewFilter::Month(month) => {
                format!("Tableau de remplissage du mois {}", month.format_fr())
            }
            ViewFilter::Period { start, end } => format!(
                "Tableau de remplissage de la période du {} au {}",
                format_date_fr(start),
                format_date_fr(end)
            ),
        }
    }
}

/// One page of rows.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served
    pub page: usize,
    /// 0 when there are no rows at all
    pub total_pages: usize,
    pub total_items: usize,
}

/// Cut `items` into pages of `page_size` and return the requested one.
///
/// Out-of-range requests are clamped to the first or last page. A
/// `page_size` of 0 is treated as 1.
pub fn paginate<T>(items: Vec<T>, requested: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    let page = requested.clamp(1, total_pages.max(1));
    let items = items
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();
    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(y: i32, m: u32, d: u32) -> RawReading {
        RawReading::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn store() -> Vec<RawReading> {
        vec![
            reading(2024, 3, 2),
            reading(2024, 2, 29),
            reading(2024, 3, 1),
            reading(2024, 4, 1),
        ]
    }

    #[test]
    fn test_day_filter() {
        let store = store();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let rows = ViewFilter::Day(date).select(&store);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, date);
    }

    #[test]
    fn test_month_filter_sorted_oldest_first() {
        let store = store();
        let month = YearMonth::parse("2024-03").unwrap();
        let rows = ViewFilter::Month(month).select(&store);
        let dates: Vec<String> = rows.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-03-02"]);
    }

    #[test]
    fn test_period_filter_is_inclusive() {
        let store = store();
        let filter = ViewFilter::Period {
            start: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        };
        assert_eq!(filter.select(&store).len(), 3);
        assert_eq!(ViewFilter::All.select(&store).len(), 4);
    }

    #[test]
    fn test_print_titles() {
        let month = YearMonth::parse("2024-03").unwrap();
        assert_eq!(
            ViewFilter::Month(month).print_title(),
            "Tableau de remplissage du mois 03/2024"
        );
        let filter = ViewFilter::Period {
            start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        };
        assert_eq!(
            filter.print_title(),
            "Tableau de remplissage de la période du 01/03/2024 au 31/03/2024"
        );
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=120).collect();
        let first = paginate(items.clone(), 1, 50);
        assert_eq!(first.items.len(), 50);
        assert_eq!(first.total_pages, 3);
        let last = paginate(items.clone(), 3, 50);
        assert_eq!(last.items, (101..=120).collect::<Vec<_>>());
        let clamped = paginate(items, 9, 50);
        assert_eq!(clamped.page, 3);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(Vec::<u32>::new(), 0, 50);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }
}
