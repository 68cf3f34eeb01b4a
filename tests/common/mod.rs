//! Runs async tests on an embassy std executor, one thread per test.

use std::future::Future;
use std::panic;
use std::pin::Pin;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use embassy_executor::Executor;

const TEST_TIMEOUT: Duration = Duration::from_secs(30);

type TestFuture = Pin<Box<dyn Future<Output = ()>>>;

#[embassy_executor::task(pool_size = 8)]
async fn test_task(test: TestFuture, done: mpsc::Sender<()>) {
    test.await;
    let _ = done.send(());
}

/// Builds the future on a fresh executor thread and blocks until it has run to
/// the end. A panic in the future fails the calling test with the same message.
pub fn run_on_executor<F, Fut>(build: F)
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let (done, finished) = mpsc::channel();
    let runner: thread::JoinHandle<()> = thread::spawn(move || {
        let executor: &'static mut Executor = Box::leak(Box::new(Executor::new()));
        executor.run(move |spawner| {
            let test: TestFuture = Box::pin(build());
            spawner.must_spawn(test_task(test, done));
        })
    });

    let give_up = Instant::now() + TEST_TIMEOUT;
    loop {
        match finished.recv_timeout(Duration::from_millis(20)) {
            Ok(()) => return,
            // The executor thread never returns, it can only have panicked.
            Err(_) if runner.is_finished() => match runner.join() {
                Err(cause) => panic::resume_unwind(cause),
                Ok(()) => panic!("executor stopped"),
            },
            Err(RecvTimeoutError::Timeout) => {
                assert!(Instant::now() < give_up, "test did not finish in {TEST_TIMEOUT:?}")
            }
            Err(RecvTimeoutError::Disconnected) => panic!("test task dropped"),
        }
    }
}
