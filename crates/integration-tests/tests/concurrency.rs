//! Instantiator cache convergence under concurrent first use

mod common;

use common::*;
use jobwire_core::application::{BusJobFactory, JobRegistration};
use jobwire_core::domain::{JobDataMap, JobTypeKey};
use jobwire_core::port::message_bus::mocks::RecordingBus;
use jobwire_core::port::{JobFactory, MessageBus};
use jobwire_core::Result;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 16;

/// Registration that counts how often its instantiator is compiled
struct CountingRegistration {
    inner: Arc<dyn JobRegistration>,
    compiles: Arc<AtomicUsize>,
}

impl JobRegistration for CountingRegistration {
    fn job_type(&self) -> &JobTypeKey {
        self.inner.job_type()
    }

    fn compile(&self, bus: Arc<dyn MessageBus>) -> Result<Arc<dyn JobFactory>> {
        self.compiles.fetch_add(1, Ordering::SeqCst);
        // Widen the race window for concurrent first use
        thread::sleep(std::time::Duration::from_millis(5));
        self.inner.compile(bus)
    }
}

fn counting_factory() -> (Arc<BusJobFactory>, Arc<AtomicUsize>) {
    let compiles = Arc::new(AtomicUsize::new(0));
    let registry = jobwire_core::application::JobRegistry::builder()
        .register_registration(Arc::new(CountingRegistration {
            inner: Arc::new(reminder_descriptor()),
            compiles: Arc::clone(&compiles),
        }))
        .build()
        .unwrap();
    let factory = Arc::new(BusJobFactory::new(Arc::new(RecordingBus::default()), registry));
    (factory, compiles)
}

#[test]
fn test_concurrent_first_use_compiles_once() {
    let (factory, compiles) = counting_factory();
    let barrier = Arc::new(Barrier::new(THREADS));
    let key = JobTypeKey::new(REMINDER_JOB);

    let instantiators: Vec<Arc<dyn JobFactory>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let factory = Arc::clone(&factory);
                let barrier = Arc::clone(&barrier);
                let key = key.clone();
                scope.spawn(move || {
                    barrier.wait();
                    factory.instantiator(&key).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(compiles.load(Ordering::SeqCst), 1);
    for instantiator in &instantiators[1..] {
        assert!(Arc::ptr_eq(&instantiators[0], instantiator));
    }
    assert_eq!(factory.cached_types(), vec![key]);
}

#[test]
fn test_sequential_resolution_reuses_instantiator() {
    let (factory, compiles) = counting_factory();
    let key = JobTypeKey::new(REMINDER_JOB);

    let first = factory.instantiator(&key).unwrap();
    let second = factory.instantiator(&key).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(compiles.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_firings_share_bus_and_keep_their_own_data() {
    let bus: Arc<dyn MessageBus> = Arc::new(RecordingBus::default());
    let factory = Arc::new(BusJobFactory::new(Arc::clone(&bus), registry()));
    let barrier = Arc::new(Barrier::new(THREADS));

    thread::scope(|scope| {
        for i in 0..THREADS {
            let factory = Arc::clone(&factory);
            let barrier = Arc::clone(&barrier);
            let bus = Arc::clone(&bus);
            scope.spawn(move || {
                barrier.wait();
                let fired = bundle(
                    REMINDER_JOB,
                    data(&[("Attempts", json!(i))]),
                    JobDataMap::new(),
                );
                let job = factory.new_job(&fired, &JobDataMap::new()).unwrap();
                let reminder = job.downcast_ref::<ReminderJob>().unwrap();
                assert!(Arc::ptr_eq(&reminder.bus, &bus));
                assert_eq!(reminder.attempts, i as i64);
            });
        }
    });

    assert_eq!(factory.cached_types().len(), 1);
}

#[test]
fn test_different_types_resolve_independently() {
    let factory = BusJobFactory::new(Arc::new(RecordingBus::default()), registry());

    let reminder = factory.instantiator(&JobTypeKey::new(REMINDER_JOB)).unwrap();
    let plain = factory.instantiator(&JobTypeKey::new(PLAIN_JOB)).unwrap();

    assert!(!Arc::ptr_eq(&reminder, &plain));
    assert_eq!(
        factory.cached_types(),
        vec![JobTypeKey::new(PLAIN_JOB), JobTypeKey::new(REMINDER_JOB)]
    );
}
