use rand::prelude::*;
use sobol_indices::estimators::{first_order, total_order};
use sobol_indices::partition::{split, BlockLayout};
use sobol_indices::{analyze, Problem, SensitivityIndices, SobolAnalyzer, SobolError};

/// Evaluate `model` on a radial A/B design and return outputs in block order.
fn radial_design<F>(model: F, num_params: usize, num_samples: usize, seed: u64) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let mut output = Vec::with_capacity(num_samples * (num_params + 2));
    for _ in 0..num_samples {
        let a: Vec<f64> = (0..num_params).map(|_| rng.random::<f64>()).collect();
        let b: Vec<f64> = (0..num_params).map(|_| rng.random::<f64>()).collect();
        output.push(model(&a));
        for i in 0..num_params {
            let mut ab = a.clone();
            ab[i] = b[i];
            output.push(model(&ab));
        }
        output.push(model(&b));
    }
    output
}

#[test]
fn estimators_match_hand_computation_on_raw_values() {
    // A = [1, 4, 0], B = [3, 2, 6], AB_0 = [2, 3.5, 1.5]
    // V = var([1, 4, 0, 3, 2, 6]) = 35/9
    // S  = mean([3, -1, 9]) / V        = (11/3) / (35/9) = 33/35
    // ST = 0.5 * mean([1, .25, 2.25]) / V = (7/12) / (35/9) = 0.15
    let a = [1.0, 4.0, 0.0];
    let b = [3.0, 2.0, 6.0];
    let ab0 = [2.0, 3.5, 1.5];
    assert!((first_order(&a, &ab0, &b) - 33.0 / 35.0).abs() < 1e-12);
    assert!((total_order(&a, &ab0, &b) - 0.15).abs() < 1e-12);
}

#[test]
fn partition_feeds_estimators_in_parameter_order() {
    let output = [
        1.0, 2.0, 0.5, 3.0, //
        4.0, 3.5, 5.0, 2.0, //
        0.0, 1.5, -1.0, 6.0,
    ];
    let p = split(&output, 3, 2).unwrap();
    assert_eq!(p.ab_column(1), &[0.5, 5.0, -1.0]);
    // S_1 = mean([-1.5, 2, -6]) / (35/9) = -99/210
    let s1 = first_order(p.a(), p.ab_column(1), p.b());
    assert!((s1 - (-99.0 / 210.0)).abs() < 1e-12, "S_1 = {s1}");
}

#[test]
fn block_layout_for_three_params() {
    let l = BlockLayout::new(3);
    assert_eq!(l.stride(), 5);
    assert_eq!(l.b_offset(), 4);
    assert_eq!(l.ab_offset(2), 3);
}

#[test]
fn additive_model_recovers_analytic_indices() {
    // y = x0 + 2 x1 with independent U(0, 1) inputs:
    // Var = 1/12 + 4/12, so S = ST = [0.2, 0.8].
    let output = radial_design(|x| x[0] + 2.0 * x[1], 2, 8192, 7);
    let problem = Problem::new(2, 8192).unwrap();
    let si = analyze(&problem, &output).unwrap();

    let expected = [0.2, 0.8];
    for i in 0..2 {
        assert!((si.firstorder[i] - expected[i]).abs() < 0.06, "S_{i} = {}", si.firstorder[i]);
        assert!((si.totalorder[i] - expected[i]).abs() < 0.06, "ST_{i} = {}", si.totalorder[i]);
    }
    assert_eq!(si.ranking(), vec![1, 0]);
}

#[test]
fn unused_parameter_has_zero_indices() {
    // x2 never enters the model, so every AB_2 evaluation equals the A evaluation.
    let output = radial_design(|x| x[0] * x[1] + x[0], 3, 64, 11);
    let problem = Problem::new(3, 64).unwrap();
    let si = analyze(&problem, &output).unwrap();
    assert!(si.firstorder[2].abs() < 1e-12);
    assert!(si.totalorder[2].abs() < 1e-12);
    assert!(si.totalorder[0] > si.totalorder[2]);
}

#[test]
fn dimension_mismatch_returns_no_result() {
    let problem = Problem::new(2, 3).unwrap();
    let err = analyze(&problem, &[1.0; 11]).unwrap_err();
    assert_eq!(
        err,
        SobolError::DimensionMismatch {
            len: 11,
            stride: 4,
            expected: 12
        }
    );
    assert_eq!(
        err.to_string(),
        "output length 11 does not match the sample design (block stride 4, expected length 12)"
    );
}

#[test]
fn degenerate_output_is_reported() {
    let problem = Problem::new(1, 2).unwrap();
    let err = SobolAnalyzer::new()
        .analyze(&problem, &[2.5; 6])
        .unwrap_err();
    assert_eq!(err, SobolError::DegenerateInput);
}

#[test]
fn integer_valued_outputs_are_accepted() {
    let raw: [i32; 6] = [1, 4, 2, 7, 3, 5];
    let output: Vec<f64> = raw.iter().map(|&v| f64::from(v)).collect();
    let problem = Problem::from_output_len(1, output.len()).unwrap();
    assert_eq!(problem.num_samples(), 2);
    let si = analyze(&problem, &output).unwrap();
    assert_eq!(si.num_params(), 1);
}

#[cfg(feature = "serde")]
#[test]
fn result_serializes_as_two_keyed_mapping() {
    let si = SensitivityIndices {
        firstorder: vec![0.25, 0.5],
        totalorder: vec![0.5, 0.75],
    };
    let json = serde_json::to_value(&si).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "firstorder": [0.25, 0.5], "totalorder": [0.5, 0.75] })
    );
    let back: SensitivityIndices = serde_json::from_value(json).unwrap();
    assert_eq!(back, si);
}

#[cfg(feature = "serde")]
#[test]
fn partition_deserialization_is_validated() {
    use sobol_indices::partition::Partition;

    let empty = r#"{"num_samples":0,"num_params":1,"a":[],"b":[],"ab":[]}"#;
    assert!(serde_json::from_str::<Partition>(empty).is_err());

    let short_ab = r#"{"num_samples":2,"num_params":2,"a":[1,2],"b":[3,4],"ab":[5,6,7]}"#;
    assert!(serde_json::from_str::<Partition>(short_ab).is_err());

    let p = split(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 1).unwrap();
    let json = serde_json::to_string(&p).unwrap();
    let back: Partition = serde_json::from_str(&json).unwrap();
    assert_eq!(back, p);
    assert_eq!(back.ab_columns().count(), 1);
}

#[test]
fn labeled_results_use_problem_names() {
    let problem = Problem::new(2, 3)
        .unwrap()
        .with_names(vec!["porosity".to_string(), "recharge".to_string()]);
    let output = [
        1.0, 2.0, 0.5, 3.0, //
        4.0, 3.5, 5.0, 2.0, //
        0.0, 1.5, -1.0, 6.0,
    ];
    let si: SensitivityIndices = analyze(&problem, &output).unwrap();
    let names: Vec<&str> = si.labeled(&problem).iter().map(|(n, _, _)| *n).collect();
    assert_eq!(names, vec!["porosity", "recharge"]);
}
