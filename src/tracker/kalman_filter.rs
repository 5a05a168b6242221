//! Constant-velocity Kalman filter for face centroid tracking.
//!
//! State is `[x, y, vx, vy]`, measurement is `[x, y]`, one frame per time
//! step. Uses ndarray for state/covariance and a nalgebra-based 2x2 inverse.

use ndarray::{Array1, Array2};

/// Process noise magnitude applied uniformly to the state covariance.
const PROCESS_NOISE: f64 = 0.03;
/// Measurement noise magnitude for the observed centroid.
const MEASUREMENT_NOISE: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    motion_mat: Array2<f64>,
    update_mat: Array2<f64>,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl KalmanFilter {
    pub fn new() -> Self {
        let ndim = 2;
        let mut motion_mat = Array2::eye(2 * ndim);
        for i in 0..ndim {
            motion_mat[[i, ndim + i]] = 1.0;
        }

        let mut update_mat = Array2::zeros((ndim, 2 * ndim));
        for i in 0..ndim {
            update_mat[[i, i]] = 1.0;
        }

        Self {
            motion_mat,
            update_mat,
        }
    }

    /// Initialize mean and covariance from a first observed centroid.
    /// Velocity starts at zero.
    pub fn initiate(&self, measurement: [f64; 2]) -> (Array1<f64>, Array2<f64>) {
        let mut mean = Array1::zeros(4);
        mean[0] = measurement[0];
        mean[1] = measurement[1];

        let cov = Array2::eye(4);
        (mean, cov)
    }

    /// Advance the state one frame using the constant-velocity model.
    pub fn predict(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
    ) -> (Array1<f64>, Array2<f64>) {
        let motion_cov: Array2<f64> = Array2::eye(4) * PROCESS_NOISE;

        let new_mean = self.motion_mat.dot(mean);
        let new_covariance = self.motion_mat.dot(covariance).dot(&self.motion_mat.t()) + motion_cov;

        (new_mean, new_covariance)
    }

    /// Project the state distribution onto measurement space.
    pub fn project(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
    ) -> (Array1<f64>, Array2<f64>) {
        let innovation_cov: Array2<f64> = Array2::eye(2) * MEASUREMENT_NOISE;

        let mean_proj = self.update_mat.dot(mean);
        let covariance_proj =
            self.update_mat.dot(covariance).dot(&self.update_mat.t()) + innovation_cov;

        (mean_proj, covariance_proj)
    }

    /// Fold an observed centroid into the state estimate.
    pub fn update(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
        measurement: [f64; 2],
    ) -> (Array1<f64>, Array2<f64>) {
        let (projected_mean, projected_cov) = self.project(mean, covariance);

        let measurement_arr = Array1::from_vec(measurement.to_vec());
        let innovation = measurement_arr - projected_mean;

        // K = P * H^T * S^-1
        // Since H is [I 0], P * H^T is the first 2 columns of P (4x2).
        // S is projected_cov (2x2).

        // We use nalgebra internally for 2x2 inversion to avoid BLAS/LAPACK.
        let s_inv = match self.invert_2x2(&projected_cov) {
            Some(inv) => inv,
            // Degenerate innovation covariance: keep the prior untouched.
            None => return (mean.clone(), covariance.clone()),
        };

        let pht = covariance.dot(&self.update_mat.t()); // 4x2
        let kalman_gain = pht.dot(&s_inv); // 4x2

        let new_mean = mean + kalman_gain.dot(&innovation);
        let new_covariance = covariance - kalman_gain.dot(&projected_cov).dot(&kalman_gain.t());

        (new_mean, new_covariance)
    }

    /// Helper to invert a 2x2 matrix using nalgebra (pure Rust).
    fn invert_2x2(&self, m: &Array2<f64>) -> Option<Array2<f64>> {
        let nm = nalgebra::Matrix2::new(m[[0, 0]], m[[0, 1]], m[[1, 0]], m[[1, 1]]);
        let inv = nm.try_inverse()?;
        let mut res = Array2::zeros((2, 2));
        for i in 0..2 {
            for j in 0..2 {
                res[[i, j]] = inv[(i, j)];
            }
        }
        Some(res)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_initiate() {
        let kf = KalmanFilter::new();
        let (mean, cov) = kf.initiate([100.0, 200.0]);
        assert_eq!(mean[0], 100.0);
        assert_eq!(mean[1], 200.0);
        assert_eq!(mean[2], 0.0);
        assert_eq!(cov[[0, 0]], 1.0);
    }

    #[test]
    fn test_predict_applies_velocity() {
        let kf = KalmanFilter::new();
        let (mut mean, cov) = kf.initiate([10.0, 20.0]);
        mean[2] = 3.0;
        mean[3] = -1.0;

        let (predicted, _) = kf.predict(&mean, &cov);
        assert_eq!(predicted[0], 13.0);
        assert_eq!(predicted[1], 19.0);
    }

    #[test]
    fn test_update_pulls_toward_measurement() {
        let kf = KalmanFilter::new();
        let (mean, cov) = kf.initiate([0.0, 0.0]);
        let (mean, cov) = kf.predict(&mean, &cov);
        let (updated, _) = kf.update(&mean, &cov, [10.0, 10.0]);

        assert!(updated[0] > 0.0 && updated[0] < 10.0);
        assert!(updated[1] > 0.0 && updated[1] < 10.0);
    }

    #[test]
    fn test_repeated_updates_converge() {
        let kf = KalmanFilter::new();
        let (mut mean, mut cov) = kf.initiate([0.0, 0.0]);

        for i in 1..=30 {
            let (m, c) = kf.predict(&mean, &cov);
            let target = [i as f64 * 2.0, i as f64];
            let (m, c) = kf.update(&m, &c, target);
            mean = m;
            cov = c;
        }

        // Tracking a steady motion should settle near the last measurement
        // with a matching velocity estimate.
        assert_abs_diff_eq!(mean[0], 60.0, epsilon = 2.0);
        assert_abs_diff_eq!(mean[1], 30.0, epsilon = 1.0);
        assert_abs_diff_eq!(mean[2], 2.0, epsilon = 0.5);
    }
}
