//! Benchmark for disorder serialization using a synthetic order book.
//!
//! Builds a batch of nested records, then measures typed and dynamic
//! encode/decode and compares the encoded size against JSON.
//!
//! Usage: `bench-records [COUNT]` (default 50000). `RUST_LOG=debug` shows
//! metadata builds.

use std::collections::BTreeMap;
use std::time::Instant;

use disorder::{Codec, Timestamp, Value, enumeration, record};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

enumeration! {
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
    pub enum Status {
        #[default]
        Pending => "pending",
        Paid => "paid",
        Shipped => "shipped",
        Cancelled => "cancelled",
    }
}

record! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct LineItem {
        pub sku: String => "sku",
        pub quantity: u16 => "quantity",
        pub unit_price: f64 => "unit_price",
        pub discount: f32 => "discount,omitempty",
    }
}

record! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct Order {
        pub id: u64 => "id",
        pub customer: String => "customer",
        pub status: Status => "status",
        pub created_at: Timestamp => "created_at",
        pub items: Vec<LineItem> => "items",
        pub attributes: BTreeMap<String, String> => "attributes,omitempty",
        pub note: Option<String> => "note,omitempty",
        pub priority: i8 => "priority,omitempty",
    }
}

/// Deterministic xorshift generator so runs are comparable.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

const CUSTOMERS: &[&str] = &["alice", "bob", "carol", "dave", "erin", "frank", "grace"];
const STATUSES: [Status; 4] = [Status::Pending, Status::Paid, Status::Shipped, Status::Cancelled];

fn make_order(id: u64, rng: &mut Rng) -> Order {
    let items = (0..1 + rng.below(5))
        .map(|i| LineItem {
            sku: format!("SKU-{:05}-{}", rng.below(100_000), i),
            quantity: 1 + rng.below(20) as u16,
            unit_price: (rng.below(100_000) as f64) / 100.0,
            discount: if rng.below(4) == 0 { 0.1 } else { 0.0 },
        })
        .collect();

    let mut attributes = BTreeMap::new();
    if rng.below(3) == 0 {
        attributes.insert("channel".to_string(), "web".to_string());
    }
    if rng.below(5) == 0 {
        attributes.insert("coupon".to_string(), format!("C{}", rng.below(1000)));
    }

    Order {
        id,
        customer: CUSTOMERS[rng.below(CUSTOMERS.len() as u64) as usize].to_string(),
        status: STATUSES[rng.below(4) as usize],
        created_at: Timestamp::from_unix_seconds(1_700_000_000 + rng.below(10_000_000) as i64),
        items,
        attributes,
        note: (rng.below(10) == 0).then(|| "leave at the door".to_string()),
        priority: rng.below(3) as i8,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let count: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(50_000);

    let codec = Codec::new();
    let mut rng = Rng(0x9e37_79b9_7f4a_7c15);

    let build_start = Instant::now();
    let orders: Vec<Order> = (0..count).map(|id| make_order(id, &mut rng)).collect();
    info!(orders = orders.len(), elapsed = ?build_start.elapsed(), "built dataset");

    // Typed encode
    let encode_start = Instant::now();
    let encoded = codec.encode(&orders).expect("encode");
    let encode_time = encode_start.elapsed();
    println!(
        "Typed encode:   {:>10} bytes in {:?} ({:.1} MB/s)",
        encoded.len(),
        encode_time,
        mb_per_sec(encoded.len(), encode_time.as_secs_f64())
    );

    // Typed decode
    let decode_start = Instant::now();
    let decoded: Vec<Order> = codec.decode(&encoded).expect("decode");
    let decode_time = decode_start.elapsed();
    println!(
        "Typed decode:   {:>10} orders in {:?} ({:.1} MB/s)",
        decoded.len(),
        decode_time,
        mb_per_sec(encoded.len(), decode_time.as_secs_f64())
    );
    assert_eq!(decoded, orders, "typed round trip mismatch");

    // Dynamic decode
    let dynamic_start = Instant::now();
    let value: Value = codec.decode(&encoded).expect("dynamic decode");
    let dynamic_time = dynamic_start.elapsed();
    println!(
        "Dynamic decode: {:>10} values in {:?}",
        value.as_array().map_or(0, |a| a.len()),
        dynamic_time
    );

    // Dynamic re-encode, then back into the typed model
    let reencode_start = Instant::now();
    let reencoded = codec.encode(&value).expect("dynamic encode");
    let reencode_time = reencode_start.elapsed();
    println!("Dynamic encode: {:>10} bytes in {:?}", reencoded.len(), reencode_time);
    let parity: Vec<Order> = codec.decode(&reencoded).expect("parity decode");
    assert_eq!(parity, orders, "dynamic round trip mismatch");

    // JSON comparison
    let json_start = Instant::now();
    let json = serde_json::to_vec(&orders).expect("json");
    let json_time = json_start.elapsed();
    println!("JSON encode:    {:>10} bytes in {:?}", json.len(), json_time);

    println!("\n=== Summary ===");
    println!("Orders: {}", orders.len());
    println!(
        "Items: {}",
        orders.iter().map(|o| o.items.len()).sum::<usize>()
    );
    println!(
        "Size vs JSON: {:.1}%",
        encoded.len() as f64 / json.len() as f64 * 100.0
    );
    println!("Record types described: {}", codec.registry().len());
}

fn mb_per_sec(bytes: usize, secs: f64) -> f64 {
    if secs == 0.0 {
        return 0.0;
    }
    bytes as f64 / (1024.0 * 1024.0) / secs
}
