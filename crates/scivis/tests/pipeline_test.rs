//! End-to-end tests: dataset files on disk through to a prepared scene.

use std::path::PathBuf;

use mini_scivis::*;

/// A scratch directory removed on drop.
struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("mini_scivis_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }

    fn file(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }

    fn write(&self, name: &str, bytes: &[u8]) -> String {
        let path = self.file(name);
        std::fs::write(&path, bytes).unwrap();
        path.to_str().unwrap().to_string()
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// `n` samples with value equal to their index, native byte order.
fn sample_bytes(voxel_type: VoxelType, n: usize) -> Vec<u8> {
    (0..n)
        .flat_map(|i| match voxel_type {
            VoxelType::Uint8 => vec![i as u8],
            VoxelType::Uint16 => (i as u16).to_ne_bytes().to_vec(),
            VoxelType::Float32 => (i as f32).to_ne_bytes().to_vec(),
            VoxelType::Float64 => (i as f64).to_ne_bytes().to_vec(),
        })
        .collect()
}

fn config_json(raw_name: &str, voxel_type: &str, dims: [u32; 3]) -> String {
    format!(
        r#"{{
            "name": "test volume",
            "url": "http://example.org/volumes/{raw_name}",
            "type": "{voxel_type}",
            "size": [{}, {}, {}],
            "spacing": [1.0, 1.0, 1.0]
        }}"#,
        dims[0], dims[1], dims[2]
    )
}

#[test]
fn test_raw_volume_every_type() {
    let dir = TempDir::new("raw_types");
    let dims = [2, 3, 4];
    let n = 24;

    for voxel_type in VoxelType::ALL {
        let raw_name = format!("exact_{voxel_type}.raw");
        dir.write(&raw_name, &sample_bytes(voxel_type, n));
        let config = dir.write(
            &format!("exact_{voxel_type}.json"),
            config_json(&raw_name, voxel_type.as_str(), dims).as_bytes(),
        );

        let dataset = load_dataset(&config, None).unwrap();
        assert_eq!(dataset.kind, DatasetKind::Structured);
        let data = dataset.brick.voxel_data().unwrap();
        assert_eq!(data.voxel_type(), voxel_type);
        assert_eq!(data.byte_len(), n * voxel_type.size_bytes());
        assert_eq!(data.value(n - 1), Some((n - 1) as f64));
        assert_eq!(dataset.brick.dims(), UVec3::new(2, 3, 4));
    }
}

#[test]
fn test_raw_volume_one_byte_short() {
    let dir = TempDir::new("raw_short");
    for voxel_type in VoxelType::ALL {
        let mut bytes = sample_bytes(voxel_type, 24);
        bytes.pop();
        let raw_name = format!("short_{voxel_type}.raw");
        dir.write(&raw_name, &bytes);
        let config = dir.write(
            &format!("short_{voxel_type}.json"),
            config_json(&raw_name, voxel_type.as_str(), [2, 3, 4]).as_bytes(),
        );

        match load_dataset(&config, None) {
            Err(ScivisError::Io { path, .. }) => assert_eq!(path, dir.file(&raw_name)),
            other => panic!("{voxel_type}: expected an I/O error, got {other:?}"),
        }
    }
}

#[test]
fn test_unknown_type_fails_before_io() {
    let dir = TempDir::new("bad_type");
    for bad in ["int32", "float16", "UINT8", ""] {
        // The raw file does not exist, so reaching I/O would give an Io error
        let config = dir.write("bad.json", config_json("missing.raw", bad, [2, 2, 2]).as_bytes());
        assert!(
            matches!(load_dataset(&config, None), Err(ScivisError::Format(_))),
            "type '{bad}' should be a format error"
        );
    }
}

#[test]
fn test_explicit_isosurfaces_in_scene() {
    let dir = TempDir::new("explicit");
    // Value equals the x index on a 4x4x4 grid
    let bytes: Vec<u8> = (0..64_u32).flat_map(|i| ((i % 4) as f32).to_ne_bytes()).collect();
    dir.write("ramp.raw", &bytes);
    let config = dir.write("ramp.json", config_json("ramp.raw", "float32", [4, 4, 4]).as_bytes());

    let mut dataset = load_dataset(&config, None).unwrap();
    let options = SceneOptions {
        isovalues: vec![1.5, 10.0],
        extraction_mode: ExtractionMode::Explicit,
        ..SceneOptions::default()
    };
    let scene = prepare_scene(&mut dataset, &options).unwrap();

    assert_eq!(scene.value_range, ValueRange::new(0.0, 3.0));
    assert_eq!(scene.isosurfaces.len(), 1);
    assert_eq!(scene.empty_isovalues, vec![10.0]);
    let IsoGeometry::Mesh(mesh) = &scene.isosurfaces[0] else {
        panic!("expected a triangle mesh");
    };
    assert!((mesh.isovalue - 1.5).abs() < f32::EPSILON);
    assert_eq!(mesh.vertices.len(), mesh.num_triangles() * 3);
    assert!(mesh.vertices.iter().all(|p| (p.x - 1.5).abs() < 1e-5));

    assert_eq!(scene.lights.len(), 3);
    assert_eq!(scene.lights[0], Light::Ambient { intensity: 0.3 });
    assert_eq!(scene.camera, default_camera(&scene.bounds));
}

#[test]
fn test_implicit_scene_with_value_range_override() {
    let dir = TempDir::new("implicit");
    dir.write("vol.raw", &sample_bytes(VoxelType::Uint16, 8));
    let config = dir.write("vol.json", config_json("vol.raw", "uint16", [2, 2, 2]).as_bytes());

    let mut dataset = load_dataset(&config, None).unwrap();
    let options = SceneOptions {
        value_range: Some(Vec2::new(-1.0, 100.0)),
        isovalues: vec![3.0],
        ..SceneOptions::default()
    };
    let scene = prepare_scene(&mut dataset, &options).unwrap();

    assert_eq!(scene.value_range, ValueRange::new(-1.0, 100.0));
    assert_eq!(dataset.brick.value_range(), Some(ValueRange::new(-1.0, 100.0)));
    assert!(matches!(&scene.isosurfaces[..], [IsoGeometry::Implicit(iso)] if iso.isovalues == vec![3.0]));
}

#[test]
fn test_tetrahedral_dataset() {
    let dir = TempDir::new("tets");
    // The second tet is inverted in the file
    let path = dir.write(
        "mesh.off",
        b"5 2\n0 0 0 0\n1 0 0 1\n0 1 0 2\n0 0 1 3\n1 1 1 4\n0 1 2 3\n1 3 2 4\n",
    );

    let mut dataset = load_dataset(&path, None).unwrap();
    assert_eq!(dataset.kind, DatasetKind::Tetrahedral);
    assert_eq!(dataset.brick.value_range(), Some(ValueRange::new(0.0, 4.0)));
    assert_eq!(dataset.brick.bounds(), Bounds::new(Vec3::ZERO, Vec3::ONE));

    let EngineVolume::Unstructured(volume) = dataset.brick.volume() else {
        panic!("expected an unstructured volume");
    };
    assert_eq!(volume.cell_index, vec![0, 4]);
    for i in 0..volume.num_cells() {
        let tet = volume.cell(i).unwrap();
        assert!(signed_volume(&volume.vertex_positions, tet).unwrap() >= 0.0);
    }

    let scene = prepare_scene(&mut dataset, &SceneOptions::default()).unwrap();
    assert!(scene.isosurfaces.is_empty());
    assert_eq!(scene.value_range, ValueRange::new(0.0, 4.0));
}

#[test]
fn test_empty_tetrahedral_dataset_has_finite_camera() {
    let dir = TempDir::new("empty_tets");
    let path = dir.write("empty.off", b"0 0\n");

    let mut dataset = load_dataset(&path, None).unwrap();
    let scene = prepare_scene(&mut dataset, &SceneOptions::default()).unwrap();
    assert!(scene.camera.eye.is_finite());
    assert!(scene.camera.at.is_finite());
}

struct FlatBackend;

struct FlatDataset;

impl IdxDataset for FlatDataset {
    fn logic_box(&self) -> LogicBox {
        LogicBox {
            p1: [0; 3],
            p2: [3, 2, 2],
        }
    }

    fn max_resolution(&self) -> u32 {
        4
    }

    fn execute_box_query(
        &self,
        _logic_box: &LogicBox,
        _resolution: std::ops::RangeInclusive<u32>,
    ) -> Result<IdxQueryResult> {
        Ok(IdxQueryResult {
            dims: UVec3::new(3, 2, 2),
            dtype: IdxDtype::Float64,
            bytes: sample_bytes(VoxelType::Float64, 12),
        })
    }
}

impl IdxBackend for FlatBackend {
    fn name(&self) -> &str {
        "flat"
    }

    fn open(&self, _uri: &str) -> Result<Box<dyn IdxDataset>> {
        Ok(Box::new(FlatDataset))
    }
}

#[test]
fn test_indexed_dataset_back_fills_config() {
    let dataset = load_dataset("http://host/mod_visus?dataset=flat", Some(&FlatBackend)).unwrap();
    assert_eq!(dataset.kind, DatasetKind::Indexed);
    assert_eq!(dataset.config.dims().unwrap(), dataset.brick.dims());
    assert_eq!(
        dataset.config.voxel_type().unwrap(),
        dataset.brick.voxel_type().unwrap()
    );
    assert_eq!(dataset.config.spacing(), Vec3::ONE);

    let json: serde_json::Value =
        serde_json::from_str(&dataset.config.to_json_pretty().unwrap()).unwrap();
    assert_eq!(json["dims"], serde_json::json!([3, 2, 2]));
    assert_eq!(json["type"], "float64");
}

#[test]
fn test_scene_options_file() {
    let dir = TempDir::new("options");
    let path = dir.write(
        "options.json",
        br#"{"isovalues": [0.5], "density_scale": 2.0, "renderer": "pathtracer"}"#,
    );
    let options = load_scene_options(&path).unwrap();
    assert_eq!(options.isovalues, vec![0.5]);
    assert_eq!(options.renderer, "pathtracer");
    assert_eq!(options.output_image, "mini_scivis.jpg");
    assert!(matches!(
        load_scene_options(dir.file("missing.json")),
        Err(ScivisError::Io { .. })
    ));
}
