use finviewer::data::filter::{FilterAxis, FilterPatch};
use finviewer::data::sort::{SortDirection, SortKey};
use finviewer::data::view::FetchDisposition;
use finviewer::error::RetrievalError;
use finviewer::{Record, ViewController, ViewStatus};

fn three_years() -> Vec<Record> {
    vec![
        Record::new("2020-01-01", 100.0, 10.0),
        Record::new("2021-01-01", 50.0, 5.0),
        Record::new("2019-01-01", 200.0, 20.0),
    ]
}

fn revenues(vc: &ViewController) -> Vec<f64> {
    vc.current_view()
        .records()
        .expect("view should be ready")
        .iter()
        .filter_map(|r| r.revenue)
        .collect()
}

#[test]
fn start_year_then_revenue_ascending() {
    let mut vc = ViewController::new();
    vc.set_raw_data(three_years());
    vc.set_filter(&FilterPatch::new().set(FilterAxis::StartYear, 2020));
    vc.set_sort(SortKey::Revenue);

    assert_eq!(vc.sort().direction, SortDirection::Ascending);
    assert_eq!(revenues(&vc), [50.0, 100.0]);
}

#[test]
fn impossible_minimum_is_empty_not_pending() {
    let mut vc = ViewController::new();
    vc.set_raw_data(three_years());
    vc.set_filter(&FilterPatch::new().set(FilterAxis::MinRevenue, 1000));

    assert!(!vc.is_pending());
    assert_eq!(vc.current_view(), ViewStatus::Ready(&[]));
}

#[test]
fn date_clicks_from_default_descending() {
    let mut vc = ViewController::new();
    vc.set_raw_data(three_years());
    assert_eq!(vc.sort().direction, SortDirection::Descending);

    vc.set_sort(SortKey::Date);
    assert_eq!(vc.sort().direction, SortDirection::Ascending);
    assert_eq!(revenues(&vc), [200.0, 100.0, 50.0]);

    vc.set_sort(SortKey::Date);
    assert_eq!(vc.sort().direction, SortDirection::Descending);
    assert_eq!(revenues(&vc), [50.0, 100.0, 200.0]);
}

#[test]
fn settings_made_while_pending_apply_on_arrival() {
    let mut vc = ViewController::new();
    vc.set_filter(
        &FilterPatch::new()
            .set(FilterAxis::MinNetIncome, 6)
            .set(FilterAxis::MaxNetIncome, 25),
    );
    vc.set_sort(SortKey::NetIncome);
    assert_eq!(vc.current_view(), ViewStatus::Pending);

    let ticket = vc.begin_fetch();
    assert_eq!(vc.complete_fetch(ticket, Ok(three_years())), FetchDisposition::Applied);
    assert_eq!(revenues(&vc), [100.0, 200.0]);
}

#[test]
fn only_latest_retrieval_populates_data() {
    let mut vc = ViewController::new();
    let slow = vc.begin_fetch();
    let retry = vc.begin_fetch();

    // The retry fails first; the older request then succeeds but is stale.
    assert_eq!(
        vc.complete_fetch(retry, Err(RetrievalError::Status(502))),
        FetchDisposition::Failed
    );
    assert_eq!(vc.complete_fetch(slow, Ok(three_years())), FetchDisposition::Stale);
    assert!(vc.is_pending());
}

#[test]
fn degraded_records_survive_unrelated_bounds() {
    let mut vc = ViewController::new();
    let mut records = three_years();
    records.push(Record {
        date: "2022-01-01".into(),
        revenue: Some(75.0),
        net_income: None,
        ..Default::default()
    });
    vc.set_raw_data(records);

    vc.set_bound(FilterAxis::StartYear, Some(2021));
    assert_eq!(revenues(&vc), [75.0, 50.0]);

    vc.set_bound(FilterAxis::MinNetIncome, Some(0));
    assert_eq!(revenues(&vc), [50.0]);
}
