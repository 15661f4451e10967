use scm_engine::{
    build_matrix, generate, run, Axis, GenerateConfig, LabelOrder, MatrixError, MatrixType,
    Observations, OutputFormat,
};

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn actual() -> Vec<String> {
    strings(&["a", "a", "b", "b", "a", "b", "c", "c", "c", "c"])
}

fn predicted() -> Vec<String> {
    strings(&["a", "c", "b", "a", "a", "b", "a", "b", "c", "c"])
}

fn grid(rendered: &scm_engine::RenderedMatrix) -> Vec<Vec<&str>> {
    rendered
        .cells
        .iter()
        .map(|row| row.iter().map(|c| c.as_str()).collect())
        .collect()
}

// -------------------------------------------------------------------------
// Counts
// -------------------------------------------------------------------------

#[test]
fn inferred_labels_counts() {
    let m = build_matrix(&actual(), &predicted(), None, None).unwrap();
    assert_eq!(m.labels().as_slice(), strings(&["a", "b", "c"]).as_slice());

    let r = generate(&m, MatrixType::Counts, 3, "a: ", "p: ", "x").unwrap();
    assert_eq!(
        grid(&r),
        vec![vec!["2", "0", "1"], vec!["1", "2", "0"], vec!["1", "1", "2"]]
    );
    assert_eq!(r.column_headers, strings(&["p: a", "p: b", "p: c"]));
    assert_eq!(r.row_headers, strings(&["a: a", "a: b", "a: c"]));
    assert_eq!(r.corner, "x");
}

#[test]
fn explicit_labels_reorder_axes() {
    let labels = strings(&["c", "b", "a"]);
    let m = build_matrix(&actual(), &predicted(), None, Some(&labels)).unwrap();
    let r = generate(&m, MatrixType::Counts, 3, "a: ", "p: ", "x").unwrap();
    assert_eq!(
        grid(&r),
        vec![vec!["2", "1", "1"], vec!["0", "2", "1"], vec!["1", "0", "2"]]
    );
    assert_eq!(r.column_headers, strings(&["p: c", "p: b", "p: a"]));
    assert_eq!(r.row_headers, strings(&["a: c", "a: b", "a: a"]));
}

#[test]
fn counts_as_delimited_text() {
    let m = build_matrix(&actual(), &predicted(), None, None).unwrap();
    let r = generate(&m, MatrixType::Counts, 3, "a: ", "p: ", "x").unwrap();
    assert_eq!(
        r.to_delimited(b',', b'"').unwrap(),
        "x,p: a,p: b,p: c\na: a,2,0,1\na: b,1,2,0\na: c,1,1,2\n"
    );
}

#[test]
fn counts_as_plain_text() {
    let m = build_matrix(&actual(), &predicted(), None, None).unwrap();
    let r = generate(&m, MatrixType::Counts, 3, "a: ", "p: ", "x").unwrap();
    assert_eq!(
        r.to_text(),
        "x    p: a p: b p: c\na: a    2    0    1\na: b    1    2    0\na: c    1    1    2\n"
    );
}

// -------------------------------------------------------------------------
// Percentages
// -------------------------------------------------------------------------

#[test]
fn global_percentages() {
    let m = build_matrix(&actual(), &predicted(), None, None).unwrap();
    let r = generate(&m, MatrixType::Percentages, 3, "a: ", "p: ", "x").unwrap();
    assert_eq!(r.cells[0][0], "0.200");
    assert_eq!(r.cells[0][1], "0.000");
    assert_eq!(r.cells[0][2], "0.100");

    let sum: f64 = r.cells.iter().flatten().map(|c| c.parse::<f64>().unwrap()).sum();
    assert!((sum - 1.0).abs() < 1e-9, "sum = {sum}");
}

#[test]
fn per_row_percentages() {
    let m = build_matrix(&actual(), &predicted(), None, None).unwrap();
    let r = generate(&m, MatrixType::PercentagesPerRow, 2, "a: ", "p: ", "x").unwrap();
    assert_eq!(r.cells[0], strings(&["0.67", "0.00", "0.33"]));
    assert_eq!(r.cells[2], strings(&["0.25", "0.25", "0.50"]));

    for row in &r.cells {
        let sum: f64 = row.iter().map(|c| c.parse::<f64>().unwrap()).sum();
        assert!((sum - 1.0).abs() <= 0.01 + 1e-9, "row sum = {sum}");
    }
}

#[test]
fn per_row_percentages_zero_row() {
    let labels = strings(&["a", "b", "c", "unused"]);
    let m = build_matrix(&actual(), &predicted(), None, Some(&labels)).unwrap();
    let r = generate(&m, MatrixType::PercentagesPerRow, 2, "", "", "").unwrap();
    assert_eq!(r.cells[3], strings(&["0.00", "0.00", "0.00", "0.00"]));
    assert_eq!(r.cells[0][3], "0.00");
}

// -------------------------------------------------------------------------
// Weights
// -------------------------------------------------------------------------

#[test]
fn weighted_counts_render_decimals() {
    let weights = [0.5, 1.0, 0.25, 0.75];
    let m = build_matrix(&["a", "a", "b", "b"], &["a", "a", "b", "a"], Some(&weights[..]), None).unwrap();
    assert_eq!(m.total(), 2.5);
    let r = generate(&m, MatrixType::Counts, 2, "a: ", "p: ", "x").unwrap();
    assert_eq!(grid(&r), vec![vec!["1.50", "0.00"], vec!["0.75", "0.25"]]);
}

#[test]
fn whole_weighted_sums_still_render_decimals() {
    let weights = [0.5, 0.5, 2.0];
    let m = build_matrix(&["a", "a", "b"], &["a", "a", "b"], Some(&weights[..]), None).unwrap();
    let r = generate(&m, MatrixType::Counts, 3, "", "", "").unwrap();
    assert_eq!(grid(&r), vec![vec!["1.000", "0.000"], vec!["0.000", "2.000"]]);
}

#[test]
fn unit_weights_render_as_integers() {
    let weights = [1.0, 1.0, 1.0];
    let m = build_matrix(&["a", "a", "b"], &["a", "b", "b"], Some(&weights[..]), None).unwrap();
    let r = generate(&m, MatrixType::Counts, 3, "", "", "").unwrap();
    assert_eq!(grid(&r), vec![vec!["1", "1"], vec!["0", "1"]]);
}

#[test]
fn run_reports_input_line_of_unknown_label() {
    let config = GenerateConfig {
        labels: Some(strings(&["a", "b"])),
        ..GenerateConfig::default()
    };
    let input = Observations {
        actual: strings(&["a", "b", "z"]),
        predicted: strings(&["a", "b", "a"]),
        weights: None,
        lines: vec![2, 3, 4],
    };
    let err = run(&config, &input).unwrap_err();
    assert!(matches!(err, MatrixError::UnknownLabel { index: 2, line: Some(4), .. }));
    assert_eq!(err.to_string(), "actual label 'z' at line 4 is not in the label set");
}

// -------------------------------------------------------------------------
// Errors
// -------------------------------------------------------------------------

#[test]
fn unknown_actual_label() {
    let labels = strings(&["c", "b", "a"]);
    let mut actual = actual();
    actual[4] = "z".into();
    let err = build_matrix(&actual, &predicted(), None, Some(&labels)).unwrap_err();
    assert_eq!(
        err,
        MatrixError::UnknownLabel {
            label: "z".into(),
            axis: Axis::Actual,
            index: 4,
            line: None
        }
    );
    assert!(err.to_string().contains("'z'"));
}

#[test]
fn empty_input() {
    let empty: Vec<String> = Vec::new();
    let err = build_matrix(&empty, &empty, None, None).unwrap_err();
    assert_eq!(err, MatrixError::EmptyLabels);
}

#[test]
fn empty_input_with_explicit_labels_is_all_zero() {
    let empty: Vec<String> = Vec::new();
    let labels = strings(&["a", "b"]);
    let m = build_matrix(&empty, &empty, None, Some(&labels)).unwrap();
    let r = generate(&m, MatrixType::Percentages, 1, "", "", "").unwrap();
    assert_eq!(grid(&r), vec![vec!["0.0", "0.0"], vec!["0.0", "0.0"]]);
}

#[test]
fn invalid_max_decimals() {
    let m = build_matrix(&actual(), &predicted(), None, None).unwrap();
    let err = generate(&m, MatrixType::Counts, -5, "", "", "").unwrap_err();
    assert!(err.is_config());
}

// -------------------------------------------------------------------------
// run()
// -------------------------------------------------------------------------

#[test]
fn run_with_config() {
    let config = GenerateConfig {
        labels: Some(strings(&["c", "b", "a"])),
        matrix_type: MatrixType::Percentages,
        max_decimals: 1,
        corner: "act\\pred".into(),
        output_format: OutputFormat::Text,
        ..GenerateConfig::default()
    };
    let input = Observations {
        actual: actual(),
        predicted: predicted(),
        weights: None,
        lines: Vec::new(),
    };
    let r = run(&config, &input).unwrap();
    assert_eq!(r.corner, "act\\pred");
    assert_eq!(r.cells[0], strings(&["0.2", "0.1", "0.1"]));
}

#[test]
fn run_sorted_label_order() {
    let config = GenerateConfig {
        label_order: LabelOrder::Sorted,
        ..GenerateConfig::default()
    };
    let input = Observations {
        actual: strings(&["zebra", "ant"]),
        predicted: strings(&["moth", "ant"]),
        weights: None,
        lines: Vec::new(),
    };
    let r = run(&config, &input).unwrap();
    assert_eq!(r.column_headers, strings(&["p: ant", "p: moth", "p: zebra"]));
}

#[test]
fn run_rejects_duplicate_labels_before_accumulating() {
    let config = GenerateConfig {
        labels: Some(strings(&["a", "a"])),
        ..GenerateConfig::default()
    };
    let err = run(&config, &Observations::default()).unwrap_err();
    assert_eq!(err, MatrixError::DuplicateLabel("a".into()));
}

#[test]
fn rendering_is_deterministic() {
    let first = {
        let m = build_matrix(&actual(), &predicted(), None, None).unwrap();
        generate(&m, MatrixType::Counts, 3, "a: ", "p: ", "x").unwrap()
    };
    let second = {
        let m = build_matrix(&actual(), &predicted(), None, None).unwrap();
        generate(&m, MatrixType::Counts, 3, "a: ", "p: ", "x").unwrap()
    };
    assert_eq!(first, second);
    assert_eq!(first.to_text(), second.to_text());
}
