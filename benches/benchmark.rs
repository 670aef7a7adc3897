use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::distributions::{Distribution, Uniform};
use strainlife::energy::{EnergyModel, EnergySettings, InversionMethod};
use strainlife::material::{MaterialConstants, StrainLifeParams};
use strainlife::strain_life::{ReversalSettings, StrainLifeModel};

fn reference_energy_model() -> EnergyModel {
    EnergyModel::new(&MaterialConstants::default(), &EnergySettings::default()).unwrap()
}

fn random_strain_targets(count: usize) -> Vec<f64> {
    // strains between the elastic range and well past ultimate
    let step = Uniform::new(1e-4, 0.2);
    let mut rng = rand::thread_rng();
    step.sample_iter(&mut rng).take(count).collect()
}

fn bench_inversion(c: &mut Criterion) {
    let model = reference_energy_model();
    let targets = random_strain_targets(100);

    c.bench_function("stress from strain, dense scan", |b| {
        b.iter(|| {
            for &t in &targets {
                black_box(model.stress_from_strain_with(black_box(t), InversionMethod::Scan).unwrap());
            }
        });
    });
    c.bench_function("stress from strain, bisection", |b| {
        b.iter(|| {
            for &t in &targets {
                black_box(model.stress_from_strain_with(black_box(t), InversionMethod::Bisection).unwrap());
            }
        });
    });
}

fn bench_models(c: &mut Criterion) {
    let energy = reference_energy_model();
    c.bench_function("energy method calibrate and sweep", |b| {
        b.iter(|| black_box(energy.run().unwrap()));
    });

    let strain_life = StrainLifeModel::new(&StrainLifeParams::default(), &ReversalSettings::default()).unwrap();
    c.bench_function("strain-life curve, 1000 reversals", |b| {
        b.iter(|| black_box(strain_life.curve().unwrap()));
    });
}

criterion_group!(benches, bench_inversion, bench_models);
criterion_main!(benches);
