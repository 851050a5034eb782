//! End-to-end tests of the job store against real files.

mod common;

use jewelflow::{
    JobKind, JobQuery, JobStore, NewJob, PaidFilter, PersistenceError, Stage, StoreError,
    StoreOptions,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::TestHarness;

const HEADER: &str = "id,kind,customer_name,stage,total_price,deposit_amount,balance_due,created_at,updated_at,item,repair_type,assigned_to,due_date,notes";

#[test]
fn test_custom_job_walkthrough() {
    let harness = TestHarness::new();
    let mut store = harness.open();

    let job = store
        .create(JobKind::Custom, "Jane Doe", dec!(1000.00), dec!(200.00))
        .unwrap();
    assert_eq!(job.stage, Stage::Consultation);
    assert_eq!(job.balance_due(), dec!(800.00));

    for _ in 0..3 {
        store.advance_status(&job.id).unwrap();
    }
    assert_eq!(store.get(&job.id).unwrap().stage, Stage::Pickup);

    let paid = store.record_payment(&job.id, dec!(800.00)).unwrap();
    assert_eq!(paid.deposit_amount, dec!(1000.00));
    assert_eq!(paid.balance_due(), dec!(0.00));
    assert!(paid.is_paid());
}

#[test]
fn test_advancing_through_every_stage() {
    for kind in [JobKind::Custom, JobKind::Repair] {
        let harness = TestHarness::new();
        let mut store = harness.open();
        let id = store
            .create(kind, "Sam Lee", dec!(50), dec!(0))
            .unwrap()
            .id;

        let advances = kind.stages().len() - 1;
        for _ in 0..advances {
            store.advance_status(&id).unwrap();
        }
        assert_eq!(store.get(&id).unwrap().stage, Stage::Completed, "{}", kind);

        let err = store.advance_status(&id).unwrap_err();
        assert!(
            matches!(err, StoreError::InvalidTransition { stage: Stage::Completed, .. }),
            "{}: {:?}",
            kind,
            err
        );
    }
}

#[test]
fn test_created_job_is_listed_exactly_once() {
    let harness = TestHarness::new();
    let mut store = harness.open();
    store
        .create(JobKind::Repair, "Sam Lee", dec!(80), dec!(0))
        .unwrap();
    let job = store
        .create(JobKind::Custom, "Jane Doe", dec!(900), dec!(100))
        .unwrap();

    let listed = store.list(None, None);
    assert_eq!(listed.iter().filter(|j| j.id == job.id).count(), 1);
    assert_eq!(listed.len(), 2);

    let customs = store.list(Some(Stage::Consultation), Some(JobKind::Custom));
    assert_eq!(customs, vec![job]);
}

#[test]
fn test_payments_keep_balance_non_negative_and_deposit_monotonic() {
    let harness = TestHarness::new();
    let mut store = harness.open();
    let id = store
        .create(JobKind::Custom, "Jane Doe", dec!(500), dec!(50))
        .unwrap()
        .id;

    let attempts = [
        dec!(100),
        dec!(0),
        dec!(-20),
        dec!(400),
        dec!(0.01),
        dec!(349.99),
        dec!(0.5),
    ];

    let mut last_deposit = dec!(50);
    for amount in attempts {
        let result = store.record_payment(&id, amount);
        let job = store.get(&id).unwrap();

        assert!(job.balance_due() >= Decimal::ZERO, "after {}", amount);
        assert!(job.deposit_amount >= last_deposit, "after {}", amount);
        if result.is_err() {
            assert_eq!(job.deposit_amount, last_deposit, "rejected {}", amount);
        }
        last_deposit = job.deposit_amount;
    }

    let job = store.get(&id).unwrap();
    assert_eq!(job.deposit_amount, dec!(500));
    assert!(job.is_paid());
}

#[test]
fn test_overpayment_is_rejected() {
    let harness = TestHarness::new();
    let mut store = harness.open();
    let id = store
        .create(JobKind::Repair, "Sam Lee", dec!(60), dec!(10))
        .unwrap()
        .id;

    let err = store.record_payment(&id, dec!(50.01)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
    assert_eq!(store.get(&id).unwrap().deposit_amount, dec!(10));
}

#[test]
fn test_invalid_intake_is_rejected_without_side_effects() {
    let harness = TestHarness::new();
    let mut store = harness.open();

    let cases: Vec<(&str, NewJob)> = vec![
        (
            "blank customer",
            NewJob::new(JobKind::Custom, "   ", dec!(100), dec!(0)),
        ),
        (
            "negative total",
            NewJob::new(JobKind::Custom, "Jane", dec!(-1), dec!(0)),
        ),
        (
            "negative deposit",
            NewJob::new(JobKind::Custom, "Jane", dec!(100), dec!(-1)),
        ),
        (
            "deposit above total",
            NewJob::new(JobKind::Repair, "Jane", dec!(100), dec!(101)),
        ),
        (
            "repair type on custom job",
            NewJob::new(JobKind::Custom, "Jane", dec!(100), dec!(0)).repair_type("Resizing"),
        ),
    ];

    for (name, new_job) in cases {
        let err = store.create_job(new_job).unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)), "case '{}'", name);
    }
    assert!(store.is_empty());
    assert!(!harness.jobs_path.exists());
}

#[test]
fn test_unknown_id() {
    let harness = TestHarness::new();
    let mut store = harness.open();

    assert!(store.get("C-4242").is_none());
    assert!(matches!(
        store.advance_status("C-4242"),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.record_payment("C-4242", dec!(10)),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_reload_yields_identical_jobs() {
    let harness = TestHarness::new();
    let mut store = harness.open();

    store
        .create_job(
            NewJob::new(JobKind::Custom, "Jane Doe", dec!(1234.56), dec!(234.56))
                .item("Engagement ring, 1.2ct")
                .assigned_to("CAD Team")
                .due_date(chrono::NaiveDate::from_ymd_opt(2026, 12, 24).unwrap())
                .notes("Customer wants \"vintage\" milgrain\nCall before casting"),
        )
        .unwrap();
    let repair = store
        .create_job(
            NewJob::new(JobKind::Repair, "Sam Lee", dec!(45), dec!(0))
                .item("Chain")
                .repair_type("Solder"),
        )
        .unwrap();
    store.advance_status(&repair.id).unwrap();
    store.record_payment(&repair.id, dec!(20)).unwrap();

    let reopened = harness.open();
    assert_eq!(reopened.all(), store.all());
}

#[test]
fn test_ids_continue_after_reopen() {
    let harness = TestHarness::new();
    {
        let mut store = harness.open();
        store.create(JobKind::Custom, "A", dec!(1), dec!(0)).unwrap();
        store.create(JobKind::Custom, "B", dec!(1), dec!(0)).unwrap();
        store.create(JobKind::Repair, "C", dec!(1), dec!(0)).unwrap();
    }

    let mut store = harness.open();
    let custom = store.create(JobKind::Custom, "D", dec!(1), dec!(0)).unwrap();
    let repair = store.create(JobKind::Repair, "E", dec!(1), dec!(0)).unwrap();
    assert_eq!(custom.id, "C-1003");
    assert_eq!(repair.id, "R-2002");
}

#[test]
fn test_highest_possible_ticket_is_never_reissued() {
    let harness = TestHarness::new();
    harness.write_jobs_file(&format!(
        "{}\nC-4294967295,custom,Jane,consultation,5,0,5,2026-01-05T10:00:00Z,2026-01-05T10:00:00Z,,,,,\n",
        HEADER
    ));

    let mut store = harness.open();
    let err = store
        .create_job(NewJob::new(JobKind::Custom, "Sam", dec!(5), dec!(0)))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));

    let reopened = harness.open();
    assert_eq!(reopened.len(), 1);
}

#[test]
fn test_failed_write_leaves_store_unchanged() {
    let harness = TestHarness::new();
    let blocker = harness.write_file("blocker", "not a directory");
    let mut store = JobStore::open(blocker.join("jobs.csv")).unwrap();

    let err = store
        .create(JobKind::Custom, "Jane Doe", dec!(100), dec!(0))
        .unwrap_err();
    assert!(matches!(err, StoreError::Persistence(_)));
    assert!(store.is_empty());
}

#[test]
fn test_corrupt_rows_report_their_line() {
    let good = "C-1001,custom,Jane,consultation,100,0,100,2026-01-05T10:00:00Z,2026-01-05T10:00:00Z,,,,,";
    let cases = [
        (
            "stage from the other kind",
            "R-2001,repair,Sam,cad,10,0,10,2026-01-05T10:00:00Z,2026-01-05T10:00:00Z,,,,,",
        ),
        (
            "deposit above total",
            "R-2001,repair,Sam,intake,10,20,-10,2026-01-05T10:00:00Z,2026-01-05T10:00:00Z,,,,,",
        ),
        (
            "bad amount",
            "R-2001,repair,Sam,intake,ten,0,10,2026-01-05T10:00:00Z,2026-01-05T10:00:00Z,,,,,",
        ),
        (
            "duplicate id",
            good,
        ),
    ];

    for (name, bad) in cases {
        let harness = TestHarness::new();
        harness.write_jobs_file(&format!("{}\n{}\n{}\n", HEADER, good, bad));

        match JobStore::open(&harness.jobs_path) {
            Err(StoreError::Persistence(PersistenceError::Corrupt { line, .. })) => {
                assert_eq!(line, 3, "case '{}'", name);
            }
            other => panic!("case '{}': expected corrupt row, got {:?}", name, other),
        }
    }
}

#[test]
fn test_demo_seed_and_reset() {
    let harness = TestHarness::new();
    let mut store = harness.open_with(StoreOptions {
        seed_demo_data: true,
        ..StoreOptions::default()
    });
    assert_eq!(store.len(), 2);
    assert!(harness.jobs_path.exists());

    store.reset(false).unwrap();
    assert!(store.is_empty());
    assert_eq!(harness.read_jobs_file().trim(), HEADER);

    // An existing, empty file is not seeded again.
    let reopened = harness.open_with(StoreOptions {
        seed_demo_data: true,
        ..StoreOptions::default()
    });
    assert!(reopened.is_empty());
}

#[test]
fn test_store_from_config() {
    let harness = TestHarness::new();
    let mut config = harness.config();
    config.team = vec!["Bench-1".to_string()];

    let mut store = JobStore::from_config(&config).unwrap();
    assert_eq!(store.path(), harness.jobs_path.as_path());

    store
        .create_job(NewJob::new(JobKind::Repair, "Sam", dec!(10), dec!(0)).assigned_to("Bench-1"))
        .unwrap();
    let err = store
        .create_job(NewJob::new(JobKind::Repair, "Sam", dec!(10), dec!(0)).assigned_to("Bench-2"))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[test]
fn test_query_unpaid_repairs() {
    let harness = TestHarness::new();
    let mut store = harness.open();
    store.create(JobKind::Repair, "Paid", dec!(10), dec!(10)).unwrap();
    store.create(JobKind::Repair, "Owing", dec!(10), dec!(5)).unwrap();
    store.create(JobKind::Custom, "Owing too", dec!(10), dec!(5)).unwrap();

    let jobs = store.query(
        &JobQuery::new()
            .kind(JobKind::Repair)
            .paid(PaidFilter::Unpaid),
    );
    let names: Vec<&str> = jobs.iter().map(|j| j.customer_name.as_str()).collect();
    assert_eq!(names, vec!["Owing"]);
}
