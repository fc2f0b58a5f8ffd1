//! End-to-end scenarios over the cohort scoring pipeline.

use chrono::{Duration, NaiveDate, Weekday};
use pace_outliers::core::{CohortSet, Observation, TimeSliceKey};
use pace_outliers::detection::{LocalOutlierFactor, MahalanobisConfig, LOF_K_VALUES};
use pace_outliers::pipeline::{dispatch, merge_results, score_cohorts};
use pace_outliers::OutlierError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn obs(date: NaiveDate, hour: u8, weekday: Weekday, values: &[f64]) -> Observation {
    Observation::new(TimeSliceKey::new(date, hour, weekday), values.to_vec())
}

/// Wednesday 17h: D1 (1,1), D2 (1,1), D3 (10,10). Thursday 17h: D4 (2,2).
fn two_cohort_input() -> (Vec<Observation>, [TimeSliceKey; 4]) {
    let d1 = date(2012, 3, 7);
    let d2 = date(2012, 3, 14);
    let d3 = date(2012, 3, 21);
    let d4 = date(2012, 3, 8);
    let input = vec![
        obs(d1, 17, Weekday::Wed, &[1.0, 1.0]),
        obs(d2, 17, Weekday::Wed, &[1.0, 1.0]),
        obs(d4, 17, Weekday::Thu, &[2.0, 2.0]),
        obs(d3, 17, Weekday::Wed, &[10.0, 10.0]),
    ];
    let keys = [
        TimeSliceKey::new(d1, 17, Weekday::Wed),
        TimeSliceKey::new(d2, 17, Weekday::Wed),
        TimeSliceKey::new(d3, 17, Weekday::Wed),
        TimeSliceKey::new(d4, 17, Weekday::Thu),
    ];
    (input, keys)
}

#[test]
fn two_cohorts_merge_into_four_keys() {
    let (input, [k1, k2, k3, k4]) = two_cohort_input();
    let set = CohortSet::from_observations(2, input).unwrap();
    assert_eq!(set.len(), 2);

    for config in [MahalanobisConfig::full(), MahalanobisConfig::independent()] {
        let merged = score_cohorts(&set, &config, 2).unwrap();
        assert_eq!(merged.len(), 4);
        let keys: Vec<_> = merged.scores().keys().copied().collect();
        assert_eq!(keys, vec![k1, k4, k2, k3]);

        let d1 = merged.scores()[&k1];
        let d2 = merged.scores()[&k2];
        let d3 = merged.scores()[&k3];
        assert!(d3.distance > d1.distance);
        assert!(d3.distance > d2.distance);
        assert_eq!(d1.distance, d2.distance);
        // With k = 1 the far point's only neighbor sits in a dense pair
        assert!(d3.lof_at(1).unwrap() > d1.lof_at(1).unwrap());

        // Lone Thursday observation gets the sentinel values
        let d4 = merged.scores()[&k4];
        assert_eq!(d4.distance, 0.0);
        assert_eq!(d4.lof, [1.0; LOF_K_VALUES.len()]);
        assert_eq!(merged.standardized()[&k4], vec![0.0, 0.0]);
    }
}

#[test]
fn k_beyond_cohort_size_uses_every_other_point() {
    let vectors = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![4.0, 4.0]];
    let lof = LocalOutlierFactor::fit(&vectors).unwrap();
    let k50 = lof.scores(50).unwrap();
    assert_eq!(k50.len(), 3);
    assert_eq!(k50, lof.scores(2).unwrap());
    assert!(k50.iter().all(|s| s.is_finite()));
}

#[test]
fn merge_is_independent_of_cohort_order() {
    let start = date(2013, 1, 7);
    let mut input = Vec::new();
    for week in 0..10 {
        let monday = start + Duration::weeks(week);
        for hour in [7u8, 8, 17] {
            let x = 1.0 + 0.1 * ((week as f64) * (hour as f64)).sin();
            input.push(obs(monday, hour, Weekday::Mon, &[x, x * 1.5, 2.0 - x]));
        }
    }
    let set = CohortSet::from_observations(3, input).unwrap();
    let cohorts = set.clone().into_cohorts();
    let outputs = dispatch(&cohorts, &MahalanobisConfig::full(), 3).unwrap();

    let forward = merge_results(outputs.clone()).unwrap();
    let mut reversed = outputs;
    reversed.reverse();
    let backward = merge_results(reversed).unwrap();
    assert_eq!(forward, backward);
    assert_eq!(forward.len(), 30);
}

#[test]
fn repeated_date_in_input_is_detected() {
    let d = date(2012, 3, 7);
    let input = vec![
        obs(d, 17, Weekday::Wed, &[1.0]),
        obs(d, 17, Weekday::Wed, &[2.0]),
        obs(date(2012, 3, 14), 17, Weekday::Wed, &[3.0]),
    ];
    let set = CohortSet::from_observations(1, input).unwrap();
    let err = score_cohorts(&set, &MahalanobisConfig::full(), 1).unwrap_err();
    match err {
        OutlierError::CohortFailed { source, .. } => {
            assert_eq!(
                *source,
                OutlierError::DuplicateKey(TimeSliceKey::new(d, 17, Weekday::Wed))
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn identical_cohort_gets_degenerate_scores() {
    let start = date(2012, 3, 7);
    let input: Vec<_> = (0..8)
        .map(|w| obs(start + Duration::weeks(w), 9, Weekday::Wed, &[0.3, 0.7, 1.1]))
        .collect();
    let set = CohortSet::from_observations(3, input).unwrap();
    let merged = score_cohorts(&set, &MahalanobisConfig::full(), 2).unwrap();
    for record in merged.scores().values() {
        assert_eq!(record.distance, 0.0);
        assert!(record.lof.iter().all(|&s| s == 1.0));
    }
    assert!(merged.standardized().values().flatten().all(|&z| z == 0.0));
}

#[test]
fn scoring_twice_gives_identical_results() {
    let (input, _) = two_cohort_input();
    let set = CohortSet::from_observations(2, input).unwrap();
    let first = score_cohorts(&set, &MahalanobisConfig::full(), 4).unwrap();
    let second = score_cohorts(&set, &MahalanobisConfig::full(), 1).unwrap();
    assert_eq!(first, second);
}
