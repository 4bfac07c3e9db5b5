//! Lay out one course of an event file and print its GeoJSON features.
//!
//! ```text
//! RUST_LOG=coursekit=trace cargo run --example layout_course --features tracing -- event.json 1
//! ```

use coursekit::{LayoutTarget, layout_event_json};
use miette::IntoDiagnostic;

const SAMPLE: &str = r#"{
    "name": "Sample",
    "map": { "scale": 15000 },
    "courses": [{
        "id": 1,
        "name": "Short",
        "printScale": 10000,
        "controls": [
            { "id": 1, "kind": "start", "coordinates": [10, 10] },
            { "id": 2, "kind": "normal", "code": 31, "coordinates": [60, 25] },
            { "id": 3, "kind": "normal", "code": 32, "coordinates": [40, 70] },
            { "id": 4, "kind": "finish", "coordinates": [15, 45] }
        ]
    }]
}"#;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let source = match args.next() {
        Some(path) => std::fs::read_to_string(&path).into_diagnostic()?,
        None => SAMPLE.to_string(),
    };
    let course_id = match args.next() {
        Some(id) => id.parse().into_diagnostic()?,
        None => 1,
    };

    let features = layout_event_json(&source, course_id, LayoutTarget::Print)?;
    println!("{}", serde_json::to_string_pretty(&features).into_diagnostic()?);
    Ok(())
}
