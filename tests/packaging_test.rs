//! End-to-end packaging scenarios against a real project directory layout

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tempfile::TempDir;

use servir::config::{Metadata, ProjectPaths};
use servir::contract::{text, DataType, ModelContract, ModelField, ModelSignature, TensorShape};
use servir::package::{assemble_model, pack_model};

const SERVING_YAML: &str = r#"
model:
  name: iris
  model_type: scikit-learn
  contract: contract.protobin
  payload:
    - model.pkl
    - utils
local_deployment:
  name: iris-local
  runtime: serving/runtime-python:latest
  port: 8080
"#;

fn iris_contract() -> ModelContract {
    ModelContract {
        model_name: "iris".to_string(),
        signatures: vec![ModelSignature {
            signature_name: "predict".to_string(),
            inputs: vec![ModelField {
                name: "features".to_string(),
                shape: Some(TensorShape { dims: vec![-1, 4] }),
                dtype: DataType::Float64 as i32,
            }],
            outputs: vec![ModelField {
                name: "species".to_string(),
                shape: None,
                dtype: DataType::String as i32,
            }],
        }],
    }
}

/// Lay out the iris example project: pickled model, a utils package, and a
/// binary contract.
fn iris_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    std::fs::write(root.join("serving.yaml"), SERVING_YAML).unwrap();
    std::fs::write(root.join("model.pkl"), b"pickled iris classifier").unwrap();
    std::fs::create_dir_all(root.join("utils/preprocessing")).unwrap();
    std::fs::write(root.join("utils/__init__.py"), b"").unwrap();
    std::fs::write(root.join("utils/features.py"), b"FEATURES = 4\n").unwrap();
    std::fs::write(
        root.join("utils/preprocessing/scale.py"),
        b"def scale(x):\n    return x\n",
    )
    .unwrap();
    std::fs::write(root.join("contract.protobin"), iris_contract().to_binary()).unwrap();

    dir
}

fn load_model(dir: &TempDir) -> (servir::Model, ProjectPaths) {
    let metadata = Metadata::from_directory(dir.path()).unwrap().unwrap();
    (metadata.model, ProjectPaths::new(dir.path()))
}

fn relative_files(root: &Path) -> BTreeSet<PathBuf> {
    fn walk(dir: &Path, root: &Path, out: &mut BTreeSet<PathBuf>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, out);
            } else {
                out.insert(path.strip_prefix(root).unwrap().to_path_buf());
            }
        }
    }
    let mut out = BTreeSet::new();
    walk(root, root, &mut out);
    out
}

#[test]
fn pack_mirrors_every_descendant_path() {
    let dir = iris_project();
    let (model, paths) = load_model(&dir);

    let report = pack_model(&model, &paths).unwrap();

    let staged = relative_files(&paths.staging_dir());
    let expected: BTreeSet<PathBuf> = [
        "files/model.pkl",
        "files/utils/__init__.py",
        "files/utils/features.py",
        "files/utils/preprocessing/scale.py",
        "contract.protobin",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    assert_eq!(staged, expected);
    assert_eq!(report.copied.len(), 4);
}

#[test]
fn staged_contract_round_trips_from_binary_source() {
    let dir = iris_project();
    let (model, paths) = load_model(&dir);

    pack_model(&model, &paths).unwrap();

    let staged = std::fs::read(paths.contract_path()).unwrap();
    let decoded = ModelContract::from_binary(&staged).unwrap();
    assert_eq!(decoded, iris_contract());
}

#[test]
fn staged_contract_round_trips_from_text_source() {
    let dir = iris_project();
    let root = dir.path();

    // switch the project to the text encoding of the same contract
    std::fs::write(root.join("contract.prototxt"), text::render(&iris_contract())).unwrap();
    std::fs::write(
        root.join("serving.yaml"),
        SERVING_YAML.replace("contract.protobin", "contract.prototxt"),
    )
    .unwrap();

    let (model, paths) = load_model(&dir);
    pack_model(&model, &paths).unwrap();

    // packing always normalizes to the binary encoding
    let staged = std::fs::read(paths.contract_path()).unwrap();
    let decoded = ModelContract::from_binary(&staged).unwrap();
    assert_eq!(decoded, iris_contract());
}

#[test]
fn stale_staging_files_survive_repacking() {
    let dir = iris_project();
    let (model, paths) = load_model(&dir);

    pack_model(&model, &paths).unwrap();

    // a file left over from some earlier payload declaration
    let stale = paths.files_dir().join("old_weights.bin");
    std::fs::write(&stale, b"stale").unwrap();

    pack_model(&model, &paths).unwrap();
    assert!(stale.exists(), "packing must not clean the staging area");
}

#[test]
fn assembled_archive_matches_staging_exactly() {
    let dir = iris_project();
    let (model, paths) = load_model(&dir);

    let archive = assemble_model(&model, &paths).unwrap();
    assert_eq!(archive, paths.archive_path("iris"));

    let file = std::fs::File::open(&archive).unwrap();
    let mut tar = tar::Archive::new(GzDecoder::new(file));

    let mut members = BTreeSet::new();
    for entry in tar.entries().unwrap() {
        let entry = entry.unwrap();
        let path = entry.path().unwrap().to_path_buf();
        assert!(path.is_relative(), "absolute member {path:?}");
        assert!(
            !path.components().any(|c| c.as_os_str() == ".."),
            "traversal in {path:?}"
        );
        if !entry.header().entry_type().is_dir() {
            members.insert(path);
        }
    }

    let staged = relative_files(&paths.staging_dir());
    assert_eq!(members, staged);
}

#[test]
fn unpacked_archive_reproduces_payload_bytes() {
    let dir = iris_project();
    let (model, paths) = load_model(&dir);

    let archive = assemble_model(&model, &paths).unwrap();

    let unpack = TempDir::new().unwrap();
    let file = std::fs::File::open(&archive).unwrap();
    tar::Archive::new(GzDecoder::new(file))
        .unpack(unpack.path())
        .unwrap();

    assert_eq!(
        std::fs::read(unpack.path().join("files/model.pkl")).unwrap(),
        b"pickled iris classifier"
    );
    let contract = std::fs::read(unpack.path().join("contract.protobin")).unwrap();
    assert_eq!(ModelContract::from_binary(&contract).unwrap(), iris_contract());
}

#[test]
fn unsupported_contract_extension_aborts_without_contract_output() {
    let dir = iris_project();
    let root = dir.path();

    std::fs::write(root.join("contract.json"), "{}").unwrap();
    std::fs::write(
        root.join("serving.yaml"),
        SERVING_YAML.replace("contract.protobin", "contract.json"),
    )
    .unwrap();

    let (model, paths) = load_model(&dir);
    let err = assemble_model(&model, &paths).unwrap_err();
    assert!(err.to_string().contains("unsupported contract extension"));

    assert!(!paths.contract_path().exists());
    assert!(!paths.archive_path("iris").exists());
}
