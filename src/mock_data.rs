use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::time::Instant;

use crate::store::{Fields, Store};

// ─── Constants ───────────────────────────────────────────────────

pub const NUM_USERS: usize = 10_000;
pub const NUM_PRODUCTS: usize = 500;

// ─── Name pools ──────────────────────────────────────────────────

static FIRST: &[&str] = &[
    "Ada", "Bram", "Chen", "Dara", "Emeka", "Freya", "Goran", "Hana", "Ines", "Joss",
    "Kofi", "Lena", "Mateo", "Nadia", "Oren", "Priya", "Quinn", "Rui", "Sana", "Tomas",
];

static LAST: &[&str] = &[
    "Abara", "Berg", "Costa", "Dvorak", "Eriksen", "Fischer", "Guzman", "Haddad",
    "Ito", "Jansen", "Kowalski", "Lind", "Moreau", "Novak", "Okafor", "Petrov",
];

static ROLES: &[&str] = &["admin", "operator", "auditor", "viewer"];

static ADJ: &[&str] = &[
    "Rugged", "Silent", "Low-Latency", "Fanless", "Rackmount", "Modular",
    "Hot-Swap", "Redundant", "Edge", "Industrial",
];

static NOUN: &[&str] = &[
    "Switch", "Gateway", "Probe", "Sensor", "Timer", "Controller", "Bridge",
    "Appliance", "Collector", "Relay",
];

static CAT: &[&str] = &["networking", "telemetry", "storage", "power", "monitoring"];

// ─── Public entry point ──────────────────────────────────────────

pub fn seed(store: &Store) {
    let start = Instant::now();
    tracing::info!(
        users = NUM_USERS,
        products = NUM_PRODUCTS,
        "seeding catalog"
    );

    // Deterministic RNG so re-runs produce the same data.
    let mut rng = StdRng::seed_from_u64(42);

    seed_users(store, &mut rng);
    seed_products(store, &mut rng);

    tracing::info!(
        records = store.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "seed complete"
    );
}

fn fields<const N: usize>(pairs: [(&str, String); N]) -> Fields {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

// ─── Users ───────────────────────────────────────────────────────

fn seed_users(store: &Store, rng: &mut StdRng) {
    for i in 0..NUM_USERS {
        let id = format!("usr_{:08}", i + 1);

        let first = FIRST[rng.gen_range(0..FIRST.len())];
        let last = LAST[rng.gen_range(0..LAST.len())];
        let email = format!(
            "{}.{}{}@ops.example",
            first.to_lowercase(),
            last.to_lowercase(),
            i + 1,
        );
        let role = ROLES[rng.gen_range(0..ROLES.len())];
        let alerts = rng.gen_bool(0.7);
        let prefs = format!(r#"{{"alerts":{alerts},"tz":"UTC"}}"#);

        store.hset_now(
            &format!("user:{id}"),
            fields([
                ("id", id.clone()),
                ("name", format!("{first} {last}")),
                ("email", email),
                ("role", role.to_string()),
                ("prefs", prefs),
                ("created_at", "2026-03-02T08:00:00Z".to_string()),
            ]),
        );
    }
}

// ─── Products ────────────────────────────────────────────────────

fn seed_products(store: &Store, rng: &mut StdRng) {
    for i in 0..NUM_PRODUCTS {
        let id = format!("prod_{:04}", i + 1);

        let adj = ADJ[rng.gen_range(0..ADJ.len())];
        let noun = NOUN[rng.gen_range(0..NOUN.len())];
        let category = CAT[rng.gen_range(0..CAT.len())];
        let price = rng.gen_range(999..=99_999u64); // cents
        let stock = rng.gen_range(0..=1000u32);
        let desc = format!("{adj} {} for {category} deployments.", noun.to_lowercase());

        store.hset_now(
            &format!("product:{id}"),
            fields([
                ("id", id.clone()),
                ("title", format!("{adj} {noun}")),
                ("price", price.to_string()),
                ("stock", stock.to_string()),
                ("category", category.to_string()),
                ("description", desc),
            ]),
        );
    }
}
