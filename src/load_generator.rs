use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use splitscope::Monitors;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::calls;
use crate::mock_data::{NUM_PRODUCTS, NUM_USERS};
use crate::store::{Fields, Store};

/// A validated load run.
#[derive(Debug, Clone, Copy)]
pub struct LoadPlan {
    pub concurrency: u32,
    pub duration_secs: u64,
    pub read_pct: u8,
}

impl fmt::Display for LoadPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} workers × {}s, {}% reads / {}% writes",
            self.concurrency,
            self.duration_secs,
            self.read_pct,
            100u8.saturating_sub(self.read_pct),
        )
    }
}

// ─── Public entry point ──────────────────────────────────────────

/// Spawns `plan.concurrency` tasks that exercise the store through the
/// same instrumentation as the HTTP handlers, until the deadline or until
/// `running` is cleared.
pub async fn run(
    plan: LoadPlan,
    running: Arc<AtomicBool>,
    monitors: Arc<Monitors>,
    store: Arc<Store>,
) {
    let deadline = Instant::now() + Duration::from_secs(plan.duration_secs);

    let handles: Vec<_> = (0..plan.concurrency)
        .map(|worker_id| {
            let running = running.clone();
            let monitors = monitors.clone();
            let store = store.clone();
            tokio::spawn(async move {
                worker(worker_id, &running, &monitors, &store, deadline, plan.read_pct).await;
            })
        })
        .collect();

    for h in handles {
        let _ = h.await;
    }

    running.store(false, Ordering::SeqCst);
    tracing::info!("load run finished");
}

// ─── Worker loop ─────────────────────────────────────────────────

async fn worker(
    id: u32,
    running: &AtomicBool,
    monitors: &Monitors,
    store: &Store,
    deadline: Instant,
    read_pct: u8,
) {
    // Each worker gets its own deterministic RNG seeded uniquely.
    let mut rng = StdRng::seed_from_u64(1000 + u64::from(id));

    while running.load(Ordering::Relaxed) && Instant::now() < deadline {
        let op = Operation::pick(&mut rng, read_pct);
        calls::scope(async {
            calls::timed(monitors, op.name(), op.execute(monitors, store)).await;
        })
        .await;
    }
}

// ─── Operations ──────────────────────────────────────────────────

enum Operation {
    ReadUser(String),
    ReadProduct(String),
    WriteUser(String, Fields),
}

impl Operation {
    fn pick(rng: &mut StdRng, read_pct: u8) -> Self {
        if rng.gen_range(0u8..100) < read_pct {
            // 60 % user lookups, 40 % product lookups
            if rng.gen_bool(0.6) {
                let id = rng.gen_range(1..=NUM_USERS);
                Self::ReadUser(format!("user:usr_{id:08}"))
            } else {
                let id = rng.gen_range(1..=NUM_PRODUCTS);
                Self::ReadProduct(format!("product:prod_{id:04}"))
            }
        } else {
            let i = rng.gen_range(10_001..=99_999u32);
            let id = format!("usr_{i:08}");
            let fields = [
                ("id", id.clone()),
                ("name", "Load User".to_string()),
                ("email", format!("load{i}@test.com")),
                ("role", "viewer".to_string()),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
            Self::WriteUser(format!("user:{id}"), fields)
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::ReadUser(_) => "load.users.get",
            Self::ReadProduct(_) => "load.products.get",
            Self::WriteUser(..) => "load.users.create",
        }
    }

    async fn execute(self, monitors: &Monitors, store: &Store) {
        match self {
            Self::ReadUser(key) | Self::ReadProduct(key) => {
                calls::timed(monitors, "store.hgetall", store.hgetall(&key)).await;
            }
            Self::WriteUser(key, fields) => {
                calls::timed(monitors, "store.hset", store.hset(&key, fields)).await;
            }
        }
    }
}
