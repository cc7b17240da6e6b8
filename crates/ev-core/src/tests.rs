//! Unit tests for ev-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId, SegmentId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId::from_index(42);
        assert_eq!(id, NodeId(42));
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert!(!EdgeId::default().is_valid());
        assert!(SegmentId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "node#7");
        assert_eq!(EdgeId::INVALID.to_string(), "edge#-");
    }
}

#[cfg(test)]
mod geo {
    use crate::{normalize, CoordKey, Coordinate};

    #[test]
    fn normalize_rounds_both_axes() {
        let c = normalize(Coordinate::new(121.1117803, 14.7018384), 5);
        assert!((c.lon - 121.11178).abs() < 1e-9);
        assert!((c.lat - 14.70184).abs() < 1e-9);
    }

    #[test]
    fn noisy_endpoints_share_a_key() {
        // Two digitizations of the same junction, 2 cm apart.
        let a = Coordinate::new(121.1117803, 14.7018384);
        let b = Coordinate::new(121.1117801, 14.7018386);
        assert_eq!(a.key(5), b.key(5));
        assert_ne!(a.key(7), b.key(7));
    }

    #[test]
    fn key_of_normalized_is_stable() {
        let raw = Coordinate::new(-88.0431249, 30.6944451);
        for p in [0, 3, 5, 6, 9] {
            let n = raw.normalized(p);
            assert_eq!(n.key(p), raw.key(p), "precision {p}");
            assert_eq!(CoordKey::new(raw, p).to_coordinate(p), n);
        }
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(Coordinate::new(0.5, -0.5).key(0), CoordKey { lon: 1, lat: -1 });
    }

    #[test]
    fn zero_distance() {
        let p = Coordinate::new(121.11, 14.70);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = Coordinate::new(121.0, 14.0);
        let b = Coordinate::new(121.0, 15.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn non_finite_detected() {
        assert!(Coordinate::new(1.0, 2.0).is_finite());
        assert!(!Coordinate::new(f64::NAN, 2.0).is_finite());
        assert!(!Coordinate::new(1.0, f64::INFINITY).is_finite());
    }
}

#[cfg(test)]
mod hazard {
    use crate::{PenaltyTable, Severity, SeverityThresholds};

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("Medium".parse::<Severity>().unwrap(), Severity::Medium);
        assert_eq!(" high ".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!("".parse::<Severity>().unwrap(), Severity::None);
        assert!("extreme".parse::<Severity>().is_err());
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::None < Severity::Low);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn thresholds_classify() {
        let t = SeverityThresholds { medium: 0.3, high: 0.7 };
        assert_eq!(t.classify(0.1), Severity::Low);
        assert_eq!(t.classify(0.3), Severity::Medium);
        assert_eq!(t.classify(0.7), Severity::High);
        assert_eq!(t.classify(f64::NAN), Severity::Low);
    }

    #[test]
    fn inverted_thresholds_rejected() {
        assert!(SeverityThresholds { medium: 0.8, high: 0.2 }.validate().is_err());
    }

    #[test]
    fn flooded_multiplier_dominates() {
        let p = PenaltyTable::default();
        assert_eq!(p.multiplier(Severity::Low, false), 1.0);
        assert_eq!(p.multiplier(Severity::Low, true), 100.0);
        assert_eq!(p.multiplier(Severity::Medium, false), 5.0);
    }

    #[test]
    fn penalty_table_must_be_monotonic_and_finite() {
        assert!(PenaltyTable::default().validate().is_ok());
        let zero = PenaltyTable { flooded: 0.0, ..PenaltyTable::default() };
        assert!(zero.validate().is_err());
        let inf = PenaltyTable { flooded: f64::INFINITY, ..PenaltyTable::default() };
        assert!(inf.validate().is_err());
        let inverted = PenaltyTable { medium: 200.0, ..PenaltyTable::default() };
        assert!(inverted.validate().is_err());
    }
}

#[cfg(test)]
mod config {
    use crate::{NetworkConfig, PenaltyTable};

    #[test]
    fn defaults_are_valid() {
        let c = NetworkConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.precision, 5);
        assert_eq!(c.hazard_join_max_m, 200.0);
        assert_eq!(c.densify_k, 4);
        assert_eq!(c.snap_max_m, 50.0);
        assert!(c.densify_enabled());
    }

    #[test]
    fn rejects_bad_values() {
        let c = NetworkConfig { precision: 12, ..NetworkConfig::default() };
        assert!(c.validate().is_err());
        let c = NetworkConfig { snap_max_m: -1.0, ..NetworkConfig::default() };
        assert!(c.validate().is_err());
        let c = NetworkConfig { densify_max_m: Some(f64::NAN), ..NetworkConfig::default() };
        assert!(c.validate().is_err());
        let c = NetworkConfig {
            penalties: PenaltyTable { low: 0.5, ..PenaltyTable::default() },
            ..NetworkConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn densify_disabled_below_two() {
        let c = NetworkConfig { densify_k: 1, ..NetworkConfig::default() };
        assert!(!c.densify_enabled());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let c: NetworkConfig =
            serde_json::from_str(r#"{ "precision": 6, "penalties": { "flooded": 250.0 } }"#).unwrap();
        assert_eq!(c.precision, 6);
        assert_eq!(c.penalties.flooded, 250.0);
        assert_eq!(c.penalties.medium, 5.0);
        assert_eq!(c.snap_max_m, 50.0);
    }
}
