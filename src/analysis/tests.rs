use super::*;
use crate::preprocessing::NormalizationMode;

fn seeded(seed: u64) -> AnalysisConfig {
    AnalysisConfig::default().with_seed(seed)
}

#[test]
fn test_model_seed_offsets_base() {
    assert_eq!(model_seed(None, 3), None);
    assert_eq!(model_seed(Some(10), 3), Some(13));
    assert_eq!(model_seed(Some(u64::MAX), 2), Some(1));
}

#[test]
fn test_classification_result() {
    let result = run_classification(&seeded(1)).expect("classification");
    assert!(result.class <= 1);
    assert_eq!(result.label, if result.class == 1 { BUY_NOW } else { WAIT });
    assert!((0.5..=1.0).contains(&result.confidence));
    assert!(result.training_accuracy >= 0.8);
    assert_eq!(result.features.len(), 5);
    assert_eq!(result.features["area"], 1500.0);
    assert_eq!(result.features["price"], 52.0);
}

#[test]
fn test_classification_per_call_query_is_buy_now() {
    // A single query standardizes to zeros, leaving only the positive bias.
    let result = run_classification(&AnalysisConfig::default()).expect("classification");
    assert_eq!(result.label, BUY_NOW);
}

#[test]
fn test_regression_result() {
    let result = run_regression(&seeded(1)).expect("regression");
    assert!(result.prediction.is_finite());
    let keys: Vec<&str> = result.feature_importance.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["area", "infrastructure", "location", "property_type"]);
    let total: f64 = result.feature_importance.values().sum();
    assert!((total - 1.0).abs() < 1e-6);
    assert!(result.training_r2 > 0.9);
}

#[test]
fn test_clustering_result() {
    let result = run_clustering(&seeded(5)).expect("clustering");
    assert!(result.cluster < 3);
    assert!(result.iterations >= 1);
    assert!(result.inertia >= 0.0);
    assert_eq!(result.features["infrastructure_score"], 0.83);
}

#[test]
fn test_ensemble_result() {
    let result = run_ensemble(&seeded(9)).expect("ensemble");
    assert!((35.0..=120.0).contains(&result.prediction));
    assert_eq!(result.feature_importance.len(), 5);
    assert!(result.feature_importance.contains_key("age"));
    let total: f64 = result.feature_importance.values().sum();
    assert!((total - 1.0).abs() < 1e-6);
}

#[test]
fn test_parallel_and_sequential_reports_match() {
    let parallel = run_all_analyses_with(&seeded(42)).expect("parallel");
    let sequential = run_all_analyses_with(&seeded(42).with_parallel(false)).expect("sequential");
    assert_eq!(parallel, sequential);
}

#[test]
fn test_unseeded_run_is_well_formed() {
    let report = run_all_analyses().expect("report");
    assert!(report.clustering.cluster < 3);
    assert!((35.0..=120.0).contains(&report.ensemble.prediction));
    assert!(report.regression.prediction.is_finite());
}

#[test]
fn test_fit_statistics_mode_runs() {
    let config = seeded(3).with_normalization(NormalizationMode::FitStatistics);
    let report = run_all_analyses_with(&config).expect("report");
    assert!(report.clustering.cluster < 3);
    assert!(report.regression.prediction.is_finite());
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = AnalysisConfig::default();
    config.clustering.k = 0;
    assert!(run_all_analyses_with(&config).is_err());

    // Valid as configuration, but more clusters than listings.
    let mut config = AnalysisConfig::default();
    config.clustering.k = 6;
    assert!(run_all_analyses_with(&config).is_err());
}

#[test]
fn test_report_serializes_with_named_sections() {
    let report = run_all_analyses_with(&seeded(0)).expect("report");
    let json = serde_json::to_value(&report).expect("serialize");
    for section in ["classification", "regression", "clustering", "ensemble"] {
        assert!(json.get(section).is_some(), "missing {section}");
    }
    assert!(json["regression"]["feature_importance"]["area"].is_number());
}

#[test]
fn test_report_display_mentions_every_section() {
    let text = run_all_analyses_with(&seeded(0)).expect("report").to_string();
    for heading in ["Classification", "Linear regression", "Random forest", "Clustering"] {
        assert!(text.contains(heading), "missing {heading}");
    }
}

#[test]
fn test_segment_names() {
    assert_eq!(segment_name(0), "Premium");
    assert_eq!(segment_name(1), "Mid-Range");
    assert_eq!(segment_name(2), "Budget");
    assert_eq!(segment_name(7), "Budget");

    let result = run_clustering(&seeded(5)).expect("clustering");
    assert_eq!(result.segment, segment_name(result.cluster));
}

#[test]
fn test_regression_reports_training_mae() {
    for result in [
        run_regression(&seeded(1)).expect("regression"),
        run_ensemble(&seeded(1)).expect("ensemble"),
    ] {
        assert!(result.training_mae >= 0.0);
        // MAE never exceeds RMSE.
        assert!(result.training_mae <= result.training_mse.sqrt() + 1e-9);
    }
}

#[test]
fn test_display_flags_negative_importance() {
    let mut report = run_all_analyses_with(&seeded(0)).expect("report");
    report.ensemble.feature_importance = [("area", 1.05), ("location", -0.05)]
        .into_iter()
        .map(|(name, share)| (name.to_string(), share))
        .collect();

    let text = report.to_string();
    let forest = &text[text.find("Random forest").expect("forest section")..];
    let location = forest
        .lines()
        .find(|line| line.contains("location") && line.contains('%'))
        .expect("location row");
    assert!(location.contains("-5.0%"));
    assert!(location.contains("lowers error when scrambled"));
    let area = forest
        .lines()
        .find(|line| line.contains("area") && line.contains("105.0%"))
        .expect("area row");
    assert!(!area.contains("lowers error"));
}
