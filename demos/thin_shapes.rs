#![allow(clippy::cast_precision_loss)]
//! Demo thinning a few synthetic shapes with both schemes.
//!
//! Run with `RUST_LOG=info` to see the per-round removal counts. An optional
//! JSON file with [`voxthin::ThinningOptions`] selects the scheme for the
//! torus:
//!
//! ```text
//! cargo run --example thin_shapes -- options.json
//! ```

use std::ops::ControlFlow;

use voxthin::{
    skeletonize, DigitalObject, DigitalTopology, IVec3, IsthmusMode, ThinningOptions,
    ThinningSession, Threshold, VoxelDomain,
};

/// Samples a signed function on a cubic grid: negative values are inside.
fn sample(size: i32, f: impl Fn(glam::Vec3) -> f32) -> (VoxelDomain, Vec<f32>) {
    let domain = VoxelDomain::from_size(IVec3::splat(size)).expect("domain");
    let half = size as f32 / 2.0;
    let values = domain
        .points()
        .map(|p| -f(p.as_vec3() - glam::Vec3::splat(half - 0.5)))
        .collect();
    (domain, values)
}

fn ball(size: i32) -> DigitalObject {
    let radius = size as f32 / 2.0 - 2.0;
    let (domain, values) = sample(size, |p| p.length() - radius);
    DigitalObject::from_threshold(
        domain,
        DigitalTopology::Adj26_6,
        &values,
        Threshold::new(0.0, f64::MAX),
    )
    .expect("ball")
}

fn torus(size: i32) -> DigitalObject {
    let major = size as f32 / 4.0;
    let minor = size as f32 / 8.0;
    let (domain, values) = sample(size, |p| {
        let ring = glam::Vec2::new(p.x, p.y).length() - major;
        glam::Vec2::new(ring, p.z).length() - minor
    });
    DigitalObject::from_threshold(
        domain,
        DigitalTopology::Adj26_6,
        &values,
        Threshold::new(0.0, f64::MAX),
    )
    .expect("torus")
}

fn main() {
    let _ = env_logger::try_init();

    let options = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).expect("Failed to read options file");
            ThinningOptions::from_json_str(&json).expect("Invalid options")
        }
        None => ThinningOptions::critical_kernel(IsthmusMode::OneIsthmus, 3),
    };

    // Step through the ball round by round, then start over with a kernel.
    let mut session = ThinningSession::new(ball(16));
    println!("ball: {} points", session.original().len());
    loop {
        let round = session.step().expect("step");
        println!(
            "  round {}: removed {} / remaining {}",
            round.round, round.removed, round.remaining
        );
        if round.finished {
            break;
        }
    }
    println!("  basic skeleton: {} points", session.current().len());

    session.reset();
    let report = session
        .critical_kernel(IsthmusMode::Full, 2)
        .expect("critical kernel");
    println!(
        "  surface kernel: {} points after {} rounds",
        report.remaining, report.rounds
    );

    // The torus keeps its hole whatever the scheme.
    let mut object = torus(24);
    let before = object.len();
    let report = skeletonize(&mut object, &options).expect("skeletonize");
    println!(
        "torus: {before} -> {} points in {} rounds, {} component(s)",
        report.remaining,
        report.rounds,
        object.connected_components()
    );
    println!(
        "  report: {}",
        serde_json::to_string(&report).expect("report serializes")
    );

    // Stop a run from the outside after three rounds.
    let mut object = ball(20);
    let mut scheme = voxthin::ThinningScheme::basic(voxthin::GeometricSimplicity::default());
    let report = scheme
        .run_with(&mut object, |round| {
            if round.round >= 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .expect("run");
    println!(
        "ball(20): stopped={} after {} rounds, {} points left",
        report.stopped, report.rounds, report.remaining
    );
}
