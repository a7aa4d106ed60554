/// Minimal 3D vector helpers for discretized chain configurations
pub type Point3 = [f64; 3];

pub fn sub(a: &Point3, b: &Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn dot(a: &Point3, b: &Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: &Point3, b: &Point3) -> Point3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn norm(a: &Point3) -> f64 {
    dot(a, a).sqrt()
}

/// Unit vector along `a`, or `None` for a (numerically) zero vector
pub fn normalized(a: &Point3) -> Option<Point3> {
    let n = norm(a);
    if n <= f64::EPSILON {
        return None;
    }
    Some([a[0] / n, a[1] / n, a[2] / n])
}

/// Mean distance between consecutive points, rounded to 8 decimals
///
/// Returns `None` for configurations with fewer than two points.
pub fn disc_len(conf: &[Point3]) -> Option<f64> {
    if conf.len() < 2 {
        return None;
    }
    let total: f64 = conf.windows(2).map(|w| norm(&sub(&w[1], &w[0]))).sum();
    let mean = total / (conf.len() - 1) as f64;
    Some((mean * 1e8).round() / 1e8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disc_len_unit_spacing() {
        let conf: Vec<Point3> = (0..10).map(|i| [i as f64, 0.0, 0.0]).collect();
        assert_eq!(disc_len(&conf), Some(1.0));
    }

    #[test]
    fn test_disc_len_diagonal_steps() {
        let conf: Vec<Point3> = (0..5).map(|i| [i as f64, i as f64, 0.0]).collect();
        let d = disc_len(&conf).unwrap();
        assert!((d - 2f64.sqrt()).abs() < 1e-8);
    }

    #[test]
    fn test_disc_len_too_short() {
        assert_eq!(disc_len(&[[0.0, 0.0, 0.0]]), None);
        assert_eq!(disc_len(&[]), None);
    }

    #[test]
    fn test_cross_is_orthogonal() {
        let a = [1.0, 2.0, 3.0];
        let b = [-2.0, 0.5, 4.0];
        let c = cross(&a, &b);
        assert!(dot(&a, &c).abs() < 1e-12);
        assert!(dot(&b, &c).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_zero_vector() {
        assert!(normalized(&[0.0, 0.0, 0.0]).is_none());
        let u = normalized(&[3.0, 0.0, 4.0]).unwrap();
        assert!((norm(&u) - 1.0).abs() < 1e-12);
    }
}
