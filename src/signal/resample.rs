use rustfft::{FftPlanner, num_complex::Complex};

/// Band-limited resampling of a real signal to `num` samples.
///
/// The positive half of the input spectrum is copied into a spectrum of
/// the new length (zero padded or truncated) and transformed back. An
/// even-length Nyquist bin is doubled when downsampling and halved when
/// upsampling so its energy is split or joined correctly. The signal is
/// treated as periodic.
pub fn resample_fft(input: &[f64], num: usize) -> Vec<f64> {
    let nx = input.len();
    if nx == 0 || num == 0 {
        return Vec::new();
    }
    if num == nx {
        return input.to_vec();
    }

    let mut planner = FftPlanner::<f64>::new();

    let mut spectrum: Vec<Complex<f64>> = input
        .iter()
        .map(|&x| Complex::new(x, 0.0))
        .collect();
    planner
        .plan_fft_forward(nx)
        .process(&mut spectrum);

    // Half spectrum of the output, rfft layout
    let half_len = num / 2 + 1;
    let mut half = vec![Complex::new(0.0, 0.0); half_len];
    let n = num.min(nx);
    let nyq = n / 2 + 1;
    half[..nyq].copy_from_slice(&spectrum[..nyq]);

    if n % 2 == 0 {
        if num < nx {
            half[n / 2] *= 2.0;
        } else {
            half[n / 2] *= 0.5;
        }
    }

    // Hermitian extension so the inverse is real
    let mut full = vec![Complex::new(0.0, 0.0); num];
    full[..half_len].copy_from_slice(&half);
    for k in 1..half_len {
        let mirror = num - k;
        if mirror > k {
            full[mirror] = half[k].conj();
        }
    }

    planner
        .plan_fft_inverse(num)
        .process(&mut full);

    // rustfft leaves the inverse unnormalised: 1/num, then num/nx
    let scale = 1.0 / nx as f64;
    full.iter()
        .map(|c| c.re * scale)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(len: usize, cycles: f64) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * cycles * i as f64 / len as f64).sin())
            .collect()
    }

    #[test]
    fn output_has_requested_length() {
        let x = tone(100, 3.0);
        assert_eq!(resample_fft(&x, 37).len(), 37);
        assert_eq!(resample_fft(&x, 250).len(), 250);
        assert!(resample_fft(&x, 0).is_empty());
        assert!(resample_fft(&[], 10).is_empty());
    }

    #[test]
    fn upsampling_a_periodic_tone_is_exact() {
        let x = tone(64, 4.0);
        let y = resample_fft(&x, 256);
        let expected = tone(256, 4.0);
        for (a, b) in y.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn downsampling_keeps_low_frequencies() {
        let x = tone(300, 2.0);
        let y = resample_fft(&x, 75);
        let expected = tone(75, 2.0);
        for (a, b) in y.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn dc_level_is_preserved() {
        let x = vec![5.0; 33];
        for num in [10, 33, 64, 101] {
            let y = resample_fft(&x, num);
            assert!(y.iter().all(|v| (v - 5.0).abs() < 1e-9));
        }
    }

    #[test]
    fn odd_lengths_round_trip_through_identity() {
        let x: Vec<f64> = (0..31).map(|i| (i * i % 17) as f64).collect();
        assert_eq!(resample_fft(&x, 31), x);
    }
}
