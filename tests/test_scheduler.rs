//! Scheduler behaviour under failing, panicking and slow jobs
//!
//! All tests run on a paused clock so intervals are exact.

use anyhow::anyhow;
use qbittorrent_exporter::{PeriodicTaskOptions, Scheduler};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time;

fn every(secs: u64) -> Option<PeriodicTaskOptions> {
    Some(PeriodicTaskOptions::every(Duration::from_secs(secs)))
}

#[tokio::test(start_paused = true)]
async fn test_failing_job_keeps_ticking() {
    let scheduler = Scheduler::new();
    let attempts = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&attempts);
    scheduler.register("failing", every(10), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("remote unreachable"))
        }
    });

    time::sleep(Duration::from_secs(35)).await;
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_job_keeps_ticking() {
    let scheduler = Scheduler::new();
    let attempts = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&attempts);
    scheduler.register("panicking", every(10), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            panic!("bad snapshot");
        }
    });

    time::sleep(Duration::from_secs(25)).await;
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert_eq!(scheduler.running(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_job_never_overlaps() {
    let scheduler = Scheduler::new();
    let active = Arc::new(AtomicUsize::new(0));
    let max_active = Arc::new(AtomicUsize::new(0));
    let runs = Arc::new(AtomicUsize::new(0));

    let (a, m, r) = (Arc::clone(&active), Arc::clone(&max_active), Arc::clone(&runs));
    scheduler.register(
        "slow",
        Some(PeriodicTaskOptions::every(Duration::from_secs(1)).immediately()),
        move || {
            let (a, m, r) = (Arc::clone(&a), Arc::clone(&m), Arc::clone(&r));
            async move {
                let now = a.fetch_add(1, Ordering::SeqCst) + 1;
                m.fetch_max(now, Ordering::SeqCst);
                time::sleep(Duration::from_millis(3500)).await;
                a.fetch_sub(1, Ordering::SeqCst);
                r.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        },
    );

    time::sleep(Duration::from_secs(20)).await;
    assert_eq!(max_active.load(Ordering::SeqCst), 1);
    assert!(runs.load(Ordering::SeqCst) >= 3);
}

#[tokio::test(start_paused = true)]
async fn test_slow_job_does_not_delay_others() {
    let scheduler = Scheduler::new();
    let fast_runs = Arc::new(AtomicUsize::new(0));

    scheduler.register(
        "stuck",
        Some(PeriodicTaskOptions::every(Duration::from_secs(1)).immediately()),
        || async {
            time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        },
    );

    let counter = Arc::clone(&fast_runs);
    scheduler.register("fast", every(5), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    time::sleep(Duration::from_secs(26)).await;
    assert_eq!(fast_runs.load(Ordering::SeqCst), 5);
}

#[tokio::test(start_paused = true)]
async fn test_wait_returns_after_shutdown() {
    let scheduler = Scheduler::new();
    scheduler.register("a", every(1), || async { Ok(()) });
    scheduler.register("b", every(2), || async { Ok(()) });
    assert_eq!(scheduler.running(), 2);

    scheduler
        .wait(async {
            time::sleep(Duration::from_secs(5)).await;
        })
        .await;

    assert_eq!(scheduler.running(), 0);
    assert!(scheduler.cancellation_token().is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_aborts_in_flight_execution() {
    let scheduler = Scheduler::new();
    let finished = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&finished);
    scheduler.register(
        "long",
        Some(PeriodicTaskOptions::every(Duration::from_secs(1)).immediately()),
        move || {
            let counter = Arc::clone(&counter);
            async move {
                time::sleep(Duration::from_secs(3600)).await;
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        },
    );

    scheduler.wait(time::sleep(Duration::from_secs(2))).await;
    assert_eq!(finished.load(Ordering::SeqCst), 0);
    assert_eq!(scheduler.running(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_spawn_receives_shutdown_token() {
    let scheduler = Scheduler::new();
    let stopped = Arc::new(AtomicUsize::new(0));

    let flag = Arc::clone(&stopped);
    scheduler.spawn("server", move |shutdown| async move {
        shutdown.cancelled().await;
        flag.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    assert_eq!(scheduler.running(), 1);

    scheduler.wait(time::sleep(Duration::from_secs(1))).await;
    assert_eq!(stopped.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_spawn_does_not_stop_jobs() {
    let scheduler = Scheduler::new();
    let runs = Arc::new(AtomicUsize::new(0));

    scheduler.spawn("bind", |_| async { Err(anyhow!("address in use")) });

    let counter = Arc::clone(&runs);
    scheduler.register("poll", every(10), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    time::sleep(Duration::from_secs(21)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(scheduler.running(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_external_cancellation_ends_wait() {
    let token = tokio_util::sync::CancellationToken::new();
    let scheduler = Scheduler::with_cancellation(token.clone());
    scheduler.register("job", every(1), || async { Ok(()) });

    let canceller = tokio::spawn(async move {
        time::sleep(Duration::from_secs(3)).await;
        token.cancel();
    });

    scheduler.wait(std::future::pending()).await;
    canceller.await.unwrap();
    assert_eq!(scheduler.running(), 0);
}
