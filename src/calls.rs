use std::cell::RefCell;
use std::future::Future;

use splitscope::{CallTree, CallTreeListener, Monitors, Split, Stopwatch};

// One call tree per request task; the task-local is the execution context.
tokio::task_local! {
    static CALL_TREE: RefCell<CallTree>;
}

/// Run `fut` with its own call tree. Calls timed inside it nest under the
/// first one; calls left open when the future is dropped die with the scope.
pub async fn scope<F: Future>(fut: F) -> F::Output {
    CALL_TREE.scope(RefCell::new(CallTree::new()), fut).await
}

/// Time `fut` as a call named `name`: record the split on its monitor and
/// on the current call tree, if any.
pub async fn timed<F: Future>(monitors: &Monitors, name: &str, fut: F) -> (F::Output, Split) {
    enter(name);
    let running = Stopwatch::start();
    let output = fut.await;
    let split = running.stop();
    exit(monitors, name, split);
    (output, split)
}

/// Synchronous counterpart of [`timed`].
pub fn timed_sync<R>(monitors: &Monitors, name: &str, f: impl FnOnce() -> R) -> R {
    enter(name);
    let running = Stopwatch::start();
    let output = f();
    exit(monitors, name, running.stop());
    output
}

fn enter(name: &str) {
    let _ = CALL_TREE.try_with(|tree| tree.borrow_mut().start(name));
}

fn exit(monitors: &Monitors, name: &str, split: Split) {
    monitors.record(name, split);
    match CALL_TREE.try_with(|tree| tree.borrow_mut().stop(split)) {
        Ok(Ok(Some(root))) => monitors.alert.on_root_stop(&root, &split),
        Ok(Ok(None)) | Err(_) => {}
        Ok(Err(e)) => tracing::warn!(monitor = name, error = %e, "unbalanced call"),
    }
}
