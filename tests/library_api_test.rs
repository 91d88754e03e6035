//! Integration tests for the probe library API

#[cfg(test)]
mod library_api_tests {
    use mapprobe::{
        run_report, Check, DuplicatePolicy, IterationOrder, LanguageProfile, Lookup,
        MapSemanticsProbe, MissPolicy, ProbeConfig, ProbeError, ValueType, Verdict,
    };

    const HAL: [(&str, &str); 2] = [("Green Lantern", "John Stewart"), ("Green Lantern", "Hal Jordan")];

    fn probe_with(policy: DuplicatePolicy) -> MapSemanticsProbe {
        MapSemanticsProbe::new(ProbeConfig::new().with_duplicate_policy(policy))
    }

    #[test]
    fn test_last_wins() {
        let map = probe_with(DuplicatePolicy::LastWins).build_with_duplicates(HAL).unwrap();
        assert_eq!(map.get(&"Green Lantern"), Some(&"Hal Jordan"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_first_wins() {
        let map = probe_with(DuplicatePolicy::FirstWins).build_with_duplicates(HAL).unwrap();
        assert_eq!(map.get(&"Green Lantern"), Some(&"John Stewart"));
    }

    #[test]
    fn test_reject() {
        let err = probe_with(DuplicatePolicy::Reject)
            .build_with_duplicates(HAL)
            .unwrap_err();
        assert_eq!(
            err,
            ProbeError::DuplicateKeyAtConstruction { key: "\"Green Lantern\"".to_string() }
        );
    }

    #[test]
    fn test_missing_key_zero_for_each_value_type() {
        let probe = MapSemanticsProbe::new(ProbeConfig::new().with_miss_policy(MissPolicy::DefaultOnMiss));
        for vt in [ValueType::Int, ValueType::Float, ValueType::Bool, ValueType::String] {
            let map = probe.container::<String, _>(vt.zero());
            let lookup = probe.query_missing_key(&map, &"nobody".to_string());
            assert_eq!(lookup, Lookup::Zero(&vt.zero()));
        }
    }

    #[test]
    fn test_missing_key_explicit_signal() {
        let probe = MapSemanticsProbe::new(ProbeConfig::new().with_miss_policy(MissPolicy::ExplicitSignal));
        let mut map = probe.container::<String, String>(String::new());
        map.insert("Flash".to_string(), "Barry Allen".to_string());
        assert!(probe.query_missing_key(&map, &"Batman".to_string()).is_not_found());
        assert_eq!(
            probe.query_missing_key(&map, &"Flash".to_string()),
            Lookup::Found(&"Barry Allen".to_string())
        );
    }

    #[test]
    fn test_stability_reproducible_within_run() {
        for order in [
            IterationOrder::Hashed,
            IterationOrder::Insertion,
            IterationOrder::Sorted,
            IterationOrder::Randomized,
        ] {
            let run = || {
                let probe = MapSemanticsProbe::new(ProbeConfig::new().with_order(order).with_seed(5));
                let map = probe.build_with_duplicates((0..24).map(|i| (i, i))).unwrap();
                probe.iteration_stability(&map, 5).unwrap()
            };
            assert_eq!(run(), run(), "order {}", order);
        }
    }

    #[test]
    fn test_deterministic_orders_are_stable() {
        for order in [IterationOrder::Hashed, IterationOrder::Insertion, IterationOrder::Sorted] {
            let probe = MapSemanticsProbe::new(ProbeConfig::new().with_order(order));
            let map = probe.build_with_duplicates((0..24).map(|i| (i, i))).unwrap();
            assert_eq!(probe.iteration_stability(&map, 5), Ok(true), "order {}", order);
        }
    }

    #[test]
    fn test_stability_needs_two_passes() {
        let probe = MapSemanticsProbe::default();
        let map = probe.build_with_duplicates([(1, 1)]).unwrap();
        assert_eq!(
            probe.iteration_stability(&map, 0).unwrap_err().code(),
            "invalid-pass-count"
        );
        assert!(probe.iteration_stability(&map, 2).is_ok());
    }

    #[test]
    fn test_go_report() {
        let results = run_report(LanguageProfile::Go, &ProbeConfig::new()).unwrap();
        let dup = results.iter().find(|r| r.check == Check::Duplicates).unwrap();
        assert_eq!(dup.observed, "duplicate-key-at-construction");
        assert_eq!(dup.verdict, Verdict::Pass);
        let miss = results.iter().find(|r| r.check == Check::MissingKey).unwrap();
        assert_eq!(miss.observed, "0");
    }

    #[test]
    fn test_python_report() {
        let results = run_report(LanguageProfile::Python, &ProbeConfig::new()).unwrap();
        assert!(results.iter().all(|r| r.verdict == Verdict::Pass));
        let order = results.iter().find(|r| r.check == Check::IterationStability).unwrap();
        assert_eq!(order.subject, "insertion");
        assert_eq!(order.observed, "stable");
    }
}
