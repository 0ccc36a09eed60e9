use std::time::Instant;
use crate::kinematics::orientation::orientation_split;
use crate::kinematics::states::{NVec3, ParticleSet};
use crate::pipeline::runner::{analyze_galaxy, Galaxy, Parameters};

/// Helper to build a synthetic disc galaxy of size `n`
fn make_galaxy(n: usize) -> Galaxy {
    let mut position = Vec::with_capacity(n);
    let mut velocity = Vec::with_capacity(n);
    let mut mass = Vec::with_capacity(n);
    let mut binding_energy = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        // deterministic disc layout, no rand needed
        let radius = 0.5 + 14.5 * ((i_f * 0.61).sin() * 0.5 + 0.5);
        let phi = i_f * 2.399963; // golden angle spiral around the disc
        let height = 0.3 * (i_f * 0.17).sin();

        position.push(NVec3::new(radius * phi.cos(), radius * phi.sin(), height));
        // flat rotation curve at 200 km/s
        velocity.push(NVec3::new(-200.0 * phi.sin(), 200.0 * phi.cos(), 0.0));
        mass.push(1.0e6);
        binding_energy.push(-1.0e5 / radius);
    }

    Galaxy {
        name: format!("bench_{n}"),
        centre: NVec3::zeros(),
        particles: ParticleSet {
            position,
            velocity,
            mass,
            binding_energy: Some(binding_energy),
        },
    }
}

/// Time the orientation map build alone for a range of galaxy sizes
pub fn bench_map() {
    let ns = [1000, 4000, 16000, 64000, 256000];

    for n in ns {
        let galaxy = make_galaxy(n);
        let params = Parameters::default();

        // Warm up
        let _ = orientation_split(&galaxy.particles, params.nside, params.disc_opening);

        let t0 = Instant::now();
        let split = orientation_split(&galaxy.particles, params.nside, params.disc_opening);
        let dt = t0.elapsed().as_secs_f64();

        let disc = split.map(|s| s.disc_fraction).unwrap_or(f64::NAN);
        println!("N = {n:6}, map = {dt:8.6} s, disc fraction = {disc:.3}");
    }
}

/// Time the full per-galaxy analysis for a range of galaxy sizes
/// Paste output directly into a spreadsheet to graph
pub fn bench_diagnostics() {
    println!("N,analysis_ms");

    for n in (1000..=64000).step_by(3000) {
        let galaxy = make_galaxy(n);
        let params = Parameters::default();

        // Small n: average over a few runs to smooth noise
        let runs = if n <= 10000 { 5 } else { 1 };

        // Warm up
        let _ = analyze_galaxy(&galaxy, &params);

        let t0 = Instant::now();
        for _ in 0..runs {
            let _ = analyze_galaxy(&galaxy, &params);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / runs as f64;

        println!("{n},{ms:.6}");
    }
}
