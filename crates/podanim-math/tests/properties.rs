use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use approx::{assert_abs_diff_eq, assert_relative_eq};
use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};
use podanim_math::{
    cloud::gaussian_cloud,
    covariance::{decompose, empirical_covariance, pod_covariance},
    energy::{self, EnergyMeter},
    gradient::{numerical_gradient, Landscape, ScalarField, DEFAULT_STEP},
    interp::{lerp_matrix, lerp_path, smooth_step},
    iter::linspace,
    num::unsigned_angle_distance,
};

fn init() {
    env_logger::builder().is_test(true).try_init().ok();
}

fn random_symmetric(rng: &mut fastrand::Rng, dim: usize) -> nalgebra::DMatrix<f64> {
    let m = nalgebra::DMatrix::from_fn(dim, dim, |_, _| rng.f64() * 4.0 - 2.0);
    &m + m.transpose()
}

#[test]
fn energy_peaks_at_model_angle() {
    init();
    let mut rng = fastrand::Rng::with_seed(0xC0FFEE);
    for _ in 0..10 {
        let theta = rng.f64() * 2.0 * PI;
        let lambda2 = 0.2 + rng.f64();
        let lambda1 = lambda2 + 1.0 + 3.0 * rng.f64();
        let points = gaussian_cloud(&mut rng, &pod_covariance(theta, lambda1, lambda2), 4000);

        let scanned = energy::max_energy_angle(&points, 720);
        assert!(
            unsigned_angle_distance(scanned, theta) < 0.1,
            "scan found {scanned}, expected {theta} mod π"
        );
        let exact = energy::principal_angle(&points);
        assert!(unsigned_angle_distance(exact, scanned) <= PI / 720.0 + 1e-12);
    }
}

#[test]
fn eigenvectors_are_orthonormal() {
    let mut rng = fastrand::Rng::with_seed(2);
    for dim in [2, 3] {
        for _ in 0..50 {
            let modes = decompose(&random_symmetric(&mut rng, dim));
            for (i, a) in modes.iter().enumerate() {
                assert_relative_eq!(a.direction().norm(), 1.0, epsilon = 1e-9);
                for b in modes.iter().skip(i + 1) {
                    assert_abs_diff_eq!(a.direction().dot(b.direction()), 0.0, epsilon = 1e-9);
                }
            }
        }
    }
}

#[test]
fn eigenvalues_are_descending() {
    let mut rng = fastrand::Rng::with_seed(3);
    for dim in [2, 3] {
        for _ in 0..50 {
            let modes = decompose(&random_symmetric(&mut rng, dim));
            let energies = modes.iter().map(|m| m.energy()).collect::<Vec<_>>();
            assert!(energies.windows(2).all(|w| w[0] >= w[1]), "{energies:?}");
        }
    }
}

#[test]
fn ratio_is_bounded() {
    let mut rng = fastrand::Rng::with_seed(4);
    let (lambda1, lambda2) = (4.0, 1.0);
    let points = gaussian_cloud(&mut rng, &pod_covariance(0.9, lambda1, lambda2), 10_000);
    let meter = EnergyMeter::new(&points);
    for theta in linspace(-10.0, 10.0, 401) {
        let ratio = meter.ratio(theta);
        assert!((0.0..=1.0).contains(&ratio), "ratio {ratio} at {theta}");
    }
    let best = meter.ratio(energy::principal_angle(&points));
    assert_abs_diff_eq!(best, lambda1 / (lambda1 + lambda2), epsilon = 0.03);

    assert_eq!(EnergyMeter::new(&[]).ratio(1.0), 0.0);
    assert_eq!(EnergyMeter::new(&[Vector2::zeros()]).ratio(1.0), 0.0);
}

#[test]
fn interpolation_endpoints_are_exact() {
    let wavy = |t: f64| Vector3::new(3.0 * t.cos() + 0.3 * (3.0 * t).sin(), 1.8 * t.sin(), 0.0);
    let circle = |t: f64| Vector3::new(2.5 * t.cos(), 2.5 * t.sin(), 0.0);
    let start = lerp_path(wavy, circle, 0.0);
    let end = lerp_path(wavy, circle, 1.0);
    for t in linspace(0.0, 2.0 * PI, 97) {
        assert_eq!(start(t), wavy(t));
        assert_eq!(end(t), circle(t));
    }

    let a = pod_covariance(FRAC_PI_4, 4.0, 1.0);
    let b = Matrix2::identity() * 0.16;
    assert_eq!(lerp_matrix(&a, &b, 0.0), a);
    assert_eq!(lerp_matrix(&a, &b, 1.0), b);
}

#[test]
fn smooth_step_clamps() {
    let (edge0, edge1) = (-1.5, 2.0);
    assert_eq!(smooth_step(edge0, edge0, edge1), 0.0);
    assert_eq!(smooth_step(edge1, edge0, edge1), 1.0);
    let mut prev = 0.0;
    for t in linspace(-5.0, 5.0, 1001) {
        let s = smooth_step(t, edge0, edge1);
        assert!(s >= prev);
        if t <= edge0 {
            assert_eq!(s, 0.0);
        }
        if t >= edge1 {
            assert_eq!(s, 1.0);
        }
        prev = s;
    }
}

#[test]
fn pi_over_4_scan() {
    init();
    let cov = pod_covariance(FRAC_PI_4, 4.0, 1.0);
    let points = gaussian_cloud(&mut fastrand::Rng::with_seed(42), &cov, 5000);
    let scan = energy::scan(&points, 360);

    let (peak, _) = scan
        .iter()
        .copied()
        .fold((0.0, f64::NEG_INFINITY), |best, s| if s.1 > best.1 { s } else { best });
    let (trough, _) = scan
        .iter()
        .copied()
        .fold((0.0, f64::INFINITY), |best, s| if s.1 < best.1 { s } else { best });
    assert!(unsigned_angle_distance(peak, FRAC_PI_4) < 0.1, "peak at {peak}");
    assert!(
        unsigned_angle_distance(trough, FRAC_PI_4 + FRAC_PI_2) < 0.1,
        "trough at {trough}"
    );
    // the peak repeats half a turn later
    assert_relative_eq!(
        energy::projected_energy(&points, peak),
        energy::projected_energy(&points, peak + PI),
        max_relative = 1e-12
    );
}

#[test]
fn sampled_covariance_approaches_model() {
    #[rustfmt::skip]
    let cov = Matrix3::new(
        3.0, 2.5, 0.5,
        2.5, 3.0, 0.5,
        0.5, 0.5, 1.0,
    );
    let points = gaussian_cloud(&mut fastrand::Rng::with_seed(123), &cov, 50_000);
    let sampled = decompose(&empirical_covariance(&points));
    let model = decompose(&cov);
    for (s, m) in sampled.iter().zip(model.iter()) {
        assert_relative_eq!(s.energy(), m.energy(), max_relative = 0.05);
        assert!(s.direction().dot(m.direction()).abs() > 0.99);
    }
}

#[test]
fn landscape_gradients_agree() {
    let landscape = Landscape::default();
    let mut rng = fastrand::Rng::with_seed(9);
    for _ in 0..200 {
        let x = rng.f64() * 10.0 - 5.0;
        let y = rng.f64() * 8.0 - 4.0;
        let numerical = numerical_gradient(|x, y| landscape.value(x, y), x, y, DEFAULT_STEP);
        assert_abs_diff_eq!(landscape.gradient(x, y), numerical, epsilon = 1e-4);
    }
}
