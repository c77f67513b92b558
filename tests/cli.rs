use std::path::Path;
use std::process::{Command, Output};

use gravsim::Matrix;

fn gravsim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gravsim"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch gravsim")
}

/// Two bodies, columns [m, x, y, z, vx, vy, vz]
fn write_input(path: &Path) {
    let input = Matrix::from_vec(
        2,
        7,
        vec![
            1.0e20, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
            2.0e20, 1.0e6, 0.0, 0.0, 0.0, 10.0, 0.0,
        ],
    )
    .unwrap();
    input.to_npy_path(path).unwrap();
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn writes_trajectory() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.npy");
    let output = dir.path().join("output.npy");
    write_input(&input);

    let out = gravsim(&["1", "10", "3", arg(&input), arg(&output), "2"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).trim_end().ends_with("secs"));

    let traj = Matrix::from_npy_path(&output).unwrap();
    assert_eq!((traj.rows(), traj.cols()), (4, 6));
    assert_eq!(traj.row(0), &[0.0, 0.0, 0.0, 1.0e6, 0.0, 0.0]);
    assert!(traj.row(3)[4] > 0.0, "second body should have moved along +y");
}

#[test]
fn accepts_yaml_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scenario.yaml");
    let output = dir.path().join("output.npy");
    std::fs::write(
        &input,
        "bodies:\n  - m: 1.0\n    x: [1.0, 2.0, 3.0]\n    v: [1.0, 0.0, 0.0]\n",
    )
    .unwrap();

    let out = gravsim(&["0.5", "2", "4", arg(&input), arg(&output)]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let traj = Matrix::from_npy_path(&output).unwrap();
    assert_eq!((traj.rows(), traj.cols()), (4, 3));
    assert_eq!(traj.row(0), &[1.0, 2.0, 3.0]);
    // 3 steps of 0.5 s at 1 m/s
    assert!((traj.row(3)[0] - 2.5).abs() < 1e-12);
}

#[test]
fn argument_errors_exit_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.npy");
    let output = dir.path().join("output.npy");
    write_input(&input);

    let cases: Vec<Vec<&str>> = vec![
        vec![],
        vec!["1", "10", "3", arg(&input)],
        vec!["0", "10", "3", arg(&input), arg(&output)],
        vec!["-1", "10", "3", arg(&input), arg(&output)],
        vec!["20", "10", "3", arg(&input), arg(&output)],
        vec!["1", "10", "0", arg(&input), arg(&output)],
        vec!["1", "10", "3", arg(&input), arg(&output), "0"],
        vec!["1", "10", "3", arg(&input), arg(&output), "--softening", "0"],
        vec!["abc", "10", "3", arg(&input), arg(&output)],
    ];

    for args in cases {
        let out = gravsim(&args);
        assert_eq!(out.status.code(), Some(1), "args {args:?}");
        assert!(!out.stderr.is_empty(), "no message for {args:?}");
        assert!(!output.exists(), "output written for {args:?}");
    }
}

#[test]
fn input_errors_exit_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.npy");

    let missing = dir.path().join("missing.npy");
    let out = gravsim(&["1", "10", "3", arg(&missing), arg(&output)]);
    assert_eq!(out.status.code(), Some(1));

    let wrong_cols = dir.path().join("six.npy");
    Matrix::create(3, 6).unwrap().to_npy_path(&wrong_cols).unwrap();
    let out = gravsim(&["1", "10", "3", arg(&wrong_cols), arg(&output)]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("7 columns"));

    let empty = dir.path().join("empty.npy");
    Matrix::create(0, 7).unwrap().to_npy_path(&empty).unwrap();
    let out = gravsim(&["1", "10", "3", arg(&empty), arg(&output)]);
    assert_eq!(out.status.code(), Some(1));

    let garbage = dir.path().join("garbage.npy");
    std::fs::write(&garbage, b"definitely not numpy").unwrap();
    let out = gravsim(&["1", "10", "3", arg(&garbage), arg(&output)]);
    assert_eq!(out.status.code(), Some(1));

    assert!(!output.exists());
}
