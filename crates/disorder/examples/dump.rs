//! Simple decoder to inspect disorder files.
//!
//! Decodes every top-level value in a file without a schema and prints the
//! value tree.
//!
//! Usage: `cargo run --example dump -- <FILE>`

use std::fs::File;
use std::io::BufReader;

use disorder::{Codec, Value};

fn format_scalar(v: &Value) -> String {
    match v {
        Value::String(s) => {
            let preview: String = s.chars().take(80).collect();
            if s.chars().count() > 80 {
                format!("\"{}...\"", preview)
            } else {
                format!("\"{}\"", preview)
            }
        }
        Value::Bool(b) => format!("{}", b),
        Value::I8(x) => format!("{}i8", x),
        Value::U8(x) => format!("{}u8", x),
        Value::I16(x) => format!("{}i16", x),
        Value::U16(x) => format!("{}u16", x),
        Value::I32(x) => format!("{}i32", x),
        Value::U32(x) => format!("{}u32", x),
        Value::I64(x) => format!("{}i64", x),
        Value::U64(x) => format!("{}u64", x),
        Value::F32(x) => format!("{}f32", x),
        Value::F64(x) => format!("{}f64", x),
        Value::Timestamp(t) => format!("TIMESTAMP({})", t),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(entries) => format!("{{{} entries}}", entries.len()),
    }
}

fn print_value(v: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match v {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                println!("{}- [{}] {}", pad, i, format_scalar(item));
                if matches!(item, Value::Array(_) | Value::Object(_)) {
                    print_value(item, indent + 1);
                }
            }
        }
        Value::Object(entries) => {
            for (key, value) in entries {
                println!("{}{}: {}", pad, key, format_scalar(value));
                if matches!(value, Value::Array(_) | Value::Object(_)) {
                    print_value(value, indent + 1);
                }
            }
        }
        scalar => println!("{}{}", pad, format_scalar(scalar)),
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data.disorder".to_string());

    println!("Reading: {}", path);

    let file = File::open(&path).expect("Failed to open file");
    let mut decoder = Codec::new().stream_decoder(BufReader::new(file));

    let mut index = 0;
    loop {
        match decoder.decode::<Value>() {
            Ok(Some(value)) => {
                println!("\n=== Value {} ({}) ===", index, format_scalar(&value));
                if matches!(value, Value::Array(_) | Value::Object(_)) {
                    print_value(&value, 1);
                }
                index += 1;
            }
            Ok(None) => break,
            Err(e) => {
                eprintln!("Decode failed after {} bytes: {} [{}]", decoder.position(), e, e.kind().code());
                std::process::exit(1);
            }
        }
    }

    println!("\n=== Summary ===");
    println!("Values: {}", index);
    println!("Bytes:  {}", decoder.position());
}
