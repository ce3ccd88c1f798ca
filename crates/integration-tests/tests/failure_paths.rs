//! Failure taxonomy surfaced to the scheduler

mod common;

use common::*;
use jobwire_core::application::BusJobFactory;
use jobwire_core::domain::{BindError, JobDataMap};
use jobwire_core::port::message_bus::mocks::RecordingBus;
use jobwire_core::port::JobFactory;
use jobwire_core::FactoryError;
use serde_json::json;
use std::error::Error as _;
use std::sync::Arc;

fn factory() -> BusJobFactory {
    BusJobFactory::new(Arc::new(RecordingBus::default()), registry())
}

#[test]
fn test_invalid_uri_is_an_instantiation_failure() {
    let err = factory()
        .new_job(
            &bundle(
                REMINDER_JOB,
                data(&[("Destination", json!("definitely not a uri"))]),
                JobDataMap::new(),
            ),
            &JobDataMap::new(),
        )
        .err()
        .unwrap();

    assert!(err.to_string().contains(REMINDER_JOB));
    match &err {
        FactoryError::Instantiation { type_name, source } => {
            assert_eq!(type_name, REMINDER_JOB);
            assert!(matches!(source, BindError::InvalidUri { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.source().is_some());
    assert!(!err.is_retryable());
}

#[test]
fn test_type_mismatch_is_an_instantiation_failure() {
    let err = factory()
        .new_job(
            &bundle(REMINDER_JOB, data(&[("Enabled", json!([1, 2]))]), JobDataMap::new()),
            &JobDataMap::new(),
        )
        .err()
        .unwrap();

    assert!(matches!(
        err,
        FactoryError::Instantiation {
            source: BindError::TypeMismatch { .. },
            ..
        }
    ));
}

#[test]
fn test_missing_constructor_fails_on_every_resolution_attempt() {
    let factory = factory();

    for _ in 0..3 {
        let err = factory
            .new_job(
                &bundle(NO_CONSTRUCTOR_JOB, JobDataMap::new(), JobDataMap::new()),
                &JobDataMap::new(),
            )
            .err()
            .unwrap();
        match err {
            FactoryError::UnsupportedConstruction { type_name } => {
                assert_eq!(type_name, NO_CONSTRUCTOR_JOB)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
    assert!(factory.cached_types().is_empty());
}

#[test]
fn test_missing_job_detail_is_rejected() {
    let mut fired = bundle(REMINDER_JOB, JobDataMap::new(), JobDataMap::new());
    fired.job_detail = None;

    let err = factory().new_job(&fired, &JobDataMap::new()).err().unwrap();
    assert!(matches!(err, FactoryError::MissingJobDetail));
    assert!(err.type_name().is_none());
}

#[test]
fn test_unregistered_job_type() {
    let err = factory()
        .new_job(
            &bundle("NotRegistered", JobDataMap::new(), JobDataMap::new()),
            &JobDataMap::new(),
        )
        .err()
        .unwrap();

    assert!(matches!(err, FactoryError::UnregisteredJobType(_)));
    assert_eq!(err.type_name(), Some("NotRegistered"));
}

#[test]
fn test_failed_binding_does_not_poison_later_firings() {
    let factory = factory();
    let bad = bundle(
        REMINDER_JOB,
        data(&[("Attempts", json!("many"))]),
        JobDataMap::new(),
    );
    let good = bundle(REMINDER_JOB, data(&[("Attempts", json!(2))]), JobDataMap::new());

    assert!(factory.new_job(&bad, &JobDataMap::new()).is_err());
    let job = factory.new_job(&good, &JobDataMap::new()).unwrap();
    assert_eq!(job.downcast_ref::<ReminderJob>().unwrap().attempts, 2);
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let result = registry_builder().register(reminder_descriptor()).build();
    assert!(matches!(result, Err(FactoryError::DuplicateRegistration(_))));
}
