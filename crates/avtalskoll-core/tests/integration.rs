//! Integration tests for check_workbook() end-to-end.
//!
//! Uses a MockReader that returns a pre-built Dataset, so most tests never
//! touch xlsx bytes. The last tests go through the real reader and writer.

use avtalskoll_core::checks::{self, CheckKind, CheckOutcome, FractionVariant, REASON};
use avtalskoll_core::config::builtin::load_default;
use avtalskoll_core::error::AvtalskollError;
use avtalskoll_core::input::{TableReader, XlsxReader};
use avtalskoll_core::model::{CellValue, Dataset};
use avtalskoll_core::report::write_report_to_buffer;
use avtalskoll_core::{check_dataset, check_workbook};
use rust_decimal_macros::dec;

struct MockReader {
    dataset: Dataset,
}

impl TableReader for MockReader {
    fn read(&self, _bytes: &[u8]) -> Result<Dataset, AvtalskollError> {
        Ok(self.dataset.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn table(columns: &[&str], rows: &[&[&str]]) -> Dataset {
    let mut ds = Dataset::new(columns.iter().copied());
    for row in rows {
        ds.push_row(row.iter().map(|c| CellValue::from(*c)).collect())
            .unwrap();
    }
    ds
}

fn run(kind: CheckKind, dataset: Dataset) -> Result<CheckOutcome, AvtalskollError> {
    let config = load_default().unwrap();
    check_workbook(&[], &MockReader { dataset }, kind, &config)
}

fn reasons(outcome: &CheckOutcome) -> Vec<String> {
    outcome
        .report
        .deviations
        .iter()
        .map(|d| d.get(REASON).unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Fixtures: one valid export per check, each with at least one deviation
// ---------------------------------------------------------------------------
fn fraction_dataset() -> Dataset {
    table(
        checks::required_columns(CheckKind::FractionFrequency(FractionVariant::MaxExceeds)),
        &[
            &["SEVAB", "K1", "P1", "Storg 1", "Matavfall", "1 gång i veckan", "T1"],
            &["SEVAB", "K1", "P1", "Storg 1", "Restavfall", "varannan vecka", "T2"],
            &["SEVAB", "K2", "P2", "Storg 2", "Matavfall", "varannan vecka", "T3"],
            &["SEVAB", "K2", "P2", "Storg 2", "Restavfall nollvision", "1 gång i veckan", "T4"],
        ],
    )
}

fn billing_dataset() -> Dataset {
    table(
        checks::required_columns(CheckKind::BillingGroup),
        &[
            &["SEVAB Avfall", "K1", "A1", "Kvartal", "", "Aktivt"],
            &["SEVAB Avfall", "K2", "A2", "Halvår", "", "Aktivt"],
            &["EEM", "K3", "A3", "Månad", "ÅVM Fritidshus", "Aktivt"],
        ],
    )
}

fn count_dataset(references: &[&str]) -> Dataset {
    let columns = checks::required_columns(CheckKind::ContainerCount);
    let mut ds = Dataset::new(columns.iter().copied());
    for reference in references {
        ds.push_row(vec![
            "SEVAB".into(),
            "Aktiv".into(),
            "Storgatan 1".into(),
            "X".into(),
            "Restavfall".into(),
            "Kärl 190".into(),
            (*reference).into(),
            CellValue::Number(dec!(4)),
        ])
        .unwrap();
    }
    ds
}

fn door_addon_dataset() -> Dataset {
    table(
        checks::required_columns(CheckKind::DoorAddon),
        &[
            &["SEVAB", "K1", "P1", "Storg 1", "T1", "kärl", "Typ", "1 gång i veckan"],
            &["SEVAB", "K1", "P1", "Storg 1", "T2", "tillägg", "Typ", "varannan vecka"],
            &["SEVAB", "K2", "P2", "Storg 2", "T3", "tillägg", "Typ", "1 gång i veckan"],
        ],
    )
}

fn price_component_dataset() -> Dataset {
    table(
        checks::required_columns(CheckKind::PriceComponent),
        &[
            &[
                "EEM",
                "K1",
                "A1",
                "Storgatan 1",
                "T1",
                "2 gånger i veckan",
                "Hämtning 2 gånger i veckan, helg",
                "Aktiv",
            ],
            &[
                "EEM",
                "K2",
                "A2",
                "Storgatan 2",
                "T2",
                "2 gånger i veckan",
                "Hämtning varje vecka",
                "Aktiv",
            ],
        ],
    )
}

fn sludge_dataset() -> Dataset {
    table(
        checks::required_columns(CheckKind::SludgeFacility),
        &[
            &[
                "SEVAB",
                "K1",
                "Skogsv 1",
                "S1",
                "Slam",
                "Brunn",
                "Norr",
                "Syd",
                "2 ggr/år",
                "Slam vecka 20",
                "Slamtur vecka 20",
            ],
            &[
                "SEVAB",
                "K2",
                "Skogsv 2",
                "S2",
                "Slam",
                "Brunn",
                "Norr",
                "Norr",
                "1 ggr/år",
                "Slam vecka 30",
                "Slamtur vecka 30",
            ],
        ],
    )
}

/// Every check with a dataset that satisfies its column contract.
fn all_checks_with_data() -> Vec<(CheckKind, Dataset)> {
    vec![
        (
            CheckKind::FractionFrequency(FractionVariant::MaxExceeds),
            fraction_dataset(),
        ),
        (
            CheckKind::FractionFrequency(FractionVariant::DistinctSet),
            fraction_dataset(),
        ),
        (CheckKind::BillingGroup, billing_dataset()),
        (CheckKind::ContainerCount, count_dataset(&["R1", "R2", "R3"])),
        (CheckKind::DoorAddon, door_addon_dataset()),
        (CheckKind::PriceComponent, price_component_dataset()),
        (CheckKind::SludgeFacility, sludge_dataset()),
    ]
}

// ---------------------------------------------------------------------------
// Column contract
// ---------------------------------------------------------------------------
#[test]
fn every_check_reports_all_missing_columns() {
    for (kind, _) in all_checks_with_data() {
        let required = checks::required_columns(kind);
        // Keep the first required column, drop the rest.
        let dataset = Dataset::new([required[0], "Övrigt"]);
        match run(kind, dataset) {
            Err(AvtalskollError::Schema { missing }) => {
                let expected: Vec<String> =
                    required[1..].iter().map(|s| s.to_string()).collect();
                assert_eq!(missing, expected, "{kind}");
            }
            other => panic!("{kind}: expected schema error, got {other:?}"),
        }
    }
}

#[test]
fn schema_error_message_lists_names() {
    let err = run(CheckKind::BillingGroup, Dataset::new(["Affärsenhet"])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "missing columns: Kundnummer, Avtalsnummer, Debiteringsgrupp, Prislista, Avtalsstatus"
    );
}

// ---------------------------------------------------------------------------
// Fraction comparison
// ---------------------------------------------------------------------------
#[test]
fn food_waste_collected_more_often_is_flagged() {
    let kind = CheckKind::FractionFrequency(FractionVariant::MaxExceeds);
    let outcome = run(kind, fraction_dataset()).unwrap();
    assert_eq!(outcome.deviation_count, 1);
    assert_eq!(
        outcome.report.deviations[0].get("Flexplats"),
        Some(&CellValue::text("P1"))
    );
    assert!(outcome.summary.starts_with("1 flexplatser"));
}

#[test]
fn distinct_set_variant_flags_any_difference() {
    let ds = table(
        checks::required_columns(CheckKind::FractionFrequency(FractionVariant::MaxExceeds)),
        &[
            &["SEVAB", "K2", "P2", "Storg 2", "Matavfall", "varannan vecka", "T3"],
            &["SEVAB", "K2", "P2", "Storg 2", "Restavfall", "1 gång i veckan", "T4"],
        ],
    );
    let lenient_kind = CheckKind::FractionFrequency(FractionVariant::MaxExceeds);
    let lenient = run(lenient_kind, ds.clone()).unwrap();
    assert_eq!(lenient.deviation_count, 0);
    assert_eq!(lenient.summary, "Inga avvikelser hittades.");

    let strict_kind = CheckKind::FractionFrequency(FractionVariant::DistinctSet);
    let strict = run(strict_kind, ds).unwrap();
    assert_eq!(strict.deviation_count, 1);
}

// ---------------------------------------------------------------------------
// Billing group
// ---------------------------------------------------------------------------
#[test]
fn billing_group_ignored_groups_pass() {
    let outcome = run(CheckKind::BillingGroup, billing_dataset()).unwrap();
    assert_eq!(outcome.deviation_count, 2);
    assert_eq!(
        outcome.report.deviations[0].get("Avtalsnummer"),
        Some(&CellValue::text("A2"))
    );
}

// ---------------------------------------------------------------------------
// Count consistency
// ---------------------------------------------------------------------------
#[test]
fn container_count_against_references() {
    let short = run(CheckKind::ContainerCount, count_dataset(&["R1", "R2", "R3"])).unwrap();
    assert_eq!(short.deviation_count, 1);
    let d = &short.report.deviations[0];
    assert_eq!(
        d.get("Antal på flextjänsten"),
        Some(&CellValue::Number(dec!(4)))
    );
    assert_eq!(
        d.get("Antal aktiva individer"),
        Some(&CellValue::Number(dec!(3)))
    );

    let exact = run(
        CheckKind::ContainerCount,
        count_dataset(&["R1", "R2", "R3", "R4"]),
    )
    .unwrap();
    assert_eq!(exact.deviation_count, 0);
}

// ---------------------------------------------------------------------------
// Door addon
// ---------------------------------------------------------------------------
#[test]
fn door_addon_containers_only_produce_nothing() {
    let ds = table(
        checks::required_columns(CheckKind::DoorAddon),
        &[
            &["SEVAB", "K1", "P1", "Storg 1", "T1", "kärl", "Typ", "1 gång i veckan"],
            &["SEVAB", "K1", "P1", "Storg 1", "T2", "kärl", "Typ", "varannan vecka"],
        ],
    );
    assert_eq!(run(CheckKind::DoorAddon, ds).unwrap().deviation_count, 0);
}

#[test]
fn door_addon_mismatch_and_lonely_addon() {
    let outcome = run(CheckKind::DoorAddon, door_addon_dataset()).unwrap();
    let services: Vec<String> = outcome
        .report
        .deviations
        .iter()
        .map(|d| d.get("Flextjänst").unwrap().to_string())
        .collect();
    assert_eq!(services, vec!["T2", "T3"]);
}

// ---------------------------------------------------------------------------
// Price component
// ---------------------------------------------------------------------------
#[test]
fn price_component_membership() {
    let outcome = run(CheckKind::PriceComponent, price_component_dataset()).unwrap();
    assert_eq!(outcome.deviation_count, 1);
    assert_eq!(
        outcome.report.deviations[0].get("Kundnummer"),
        Some(&CellValue::text("K2"))
    );
}

// ---------------------------------------------------------------------------
// Sludge facilities
// ---------------------------------------------------------------------------
#[test]
fn sludge_facility_row_and_count_checks() {
    let outcome = run(CheckKind::SludgeFacility, sludge_dataset()).unwrap();
    assert_eq!(
        reasons(&outcome),
        vec![
            "Utförandeområde flextjänst ≠ Utförandeområde flexplats".to_string(),
            "Flextjänstnr förekommer 1 gånger men förväntat 2 enligt Hämtfrekvens".to_string(),
        ]
    );
}

// ---------------------------------------------------------------------------
// Whole pipeline
// ---------------------------------------------------------------------------
#[test]
fn running_twice_gives_identical_reports() {
    let config = load_default().unwrap();
    for (kind, ds) in all_checks_with_data() {
        let first = check_dataset(&ds, kind, &config).unwrap();
        let second = check_dataset(&ds, kind, &config).unwrap();
        assert!(first.deviation_count > 0, "{kind}: fixture finds nothing");
        assert_eq!(first.report, second.report, "{kind}");
        assert_eq!(first.summary, second.summary, "{kind}");
    }
}

#[test]
fn xlsx_round_trip_through_reader_and_writer() {
    let config = load_default().unwrap();
    let kind = CheckKind::ContainerCount;
    let first = check_dataset(&count_dataset(&["R1"]), kind, &config).unwrap();
    // The deviation workbook is itself a valid input table.
    let bytes = write_report_to_buffer(&first.report).unwrap();

    let reread = XlsxReader::new().read(&bytes).unwrap();
    assert_eq!(reread.columns(), first.report.columns.as_slice());
    assert_eq!(reread.len(), 1);
    let row = reread.row(0).unwrap();
    assert_eq!(row.get("Flextjänstnr"), &CellValue::text("X"));
    assert_eq!(
        row.get("Antal aktiva individer"),
        &CellValue::Number(dec!(1))
    );
}

#[test]
fn garbage_workbook_is_parse_error() {
    let config = load_default().unwrap();
    let err = check_workbook(b"PK-nope", &XlsxReader::new(), CheckKind::DoorAddon, &config)
        .unwrap_err();
    assert!(matches!(err, AvtalskollError::ParseError(_)));
}
