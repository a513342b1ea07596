//! End-to-end loading of OBJ/MTL/texture fixtures from disk.

use std::fs;
use std::path::Path;

use image::{Rgba, RgbaImage};
use wf3d_core::{load_obj, IlluminationModel, ObjError, TriFace};

/// 2x2 RGBA PNG: top row red, bottom row blue.
fn write_test_png(path: &Path) {
    let img = RgbaImage::from_fn(2, 2, |_, y| {
        if y == 0 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });
    img.save(path).unwrap();
}

#[test]
fn load_model_with_materials_and_texture() {
    let dir = tempfile::tempdir().unwrap();
    write_test_png(&dir.path().join("tex.png"));

    fs::write(
        dir.path().join("scene.mtl"),
        "newmtl stone\n\
         Ka 0.1 0.1 0.1\n\
         Kd 0.8 0.7 0.6\n\
         Ks 0.2 0.2 0.2\n\
         Ns 16\n\
         illum 2\n\
         map_Kd tex.png\n\
         newmtl flat\n\
         Kd 1 0 0\n",
    )
    .unwrap();

    fs::write(
        dir.path().join("scene.obj"),
        "mtllib scene.mtl\n\
         v 0 0 0\n\
         v 1 0 0\n\
         v 1 1 0\n\
         v 0 1 0\n\
         vt 0 0 0\n\
         vt 1 0 0\n\
         vt 1 1 0\n\
         vt 0 1 0\n\
         vn 0 0 1\n\
         usemtl stone\n\
         f 1/1/1 2/2/1 3/3/1 4/4/1\n\
         usemtl flat\n\
         f 1 3 4\n",
    )
    .unwrap();

    let model = load_obj(dir.path().join("scene.obj")).unwrap();

    assert_eq!(model.positions.len(), 4);
    assert_eq!(model.texcoords.len(), 4);
    assert_eq!(model.normals.len(), 1);

    // The quad fans into two triangles, the final face adds a third.
    assert_eq!(
        model.position_faces,
        vec![
            TriFace::new(1, 2, 3),
            TriFace::new(1, 3, 4),
            TriFace::new(1, 3, 4)
        ]
    );
    assert_eq!(model.texcoord_faces.len(), 2);
    assert_eq!(model.normal_faces.len(), 2);

    // Each triangle remembers the material active when it was emitted.
    assert_eq!(model.face_materials, vec![0, 0, 1]);

    let stone = model.materials.get("stone").unwrap();
    assert_eq!(stone.ambient, [0.1, 0.1, 0.1]);
    assert_eq!(stone.diffuse, [0.8, 0.7, 0.6]);
    assert_eq!(stone.specular_exponent, 16.0);
    assert_eq!(stone.illum, IlluminationModel::Highlight);

    // The decoder's top-left origin becomes bottom-left: the blue source
    // bottom row is stored first.
    let map = stone.diffuse_map.as_ref().unwrap();
    assert_eq!((map.width, map.height), (2, 2));
    assert_eq!(&map.pixels[0..4], &[0, 0, 255, 255]);
    assert_eq!(&map.pixels[8..12], &[255, 0, 0, 255]);

    let flat = model.materials.get("flat").unwrap();
    assert_eq!(flat.diffuse, [1.0, 0.0, 0.0]);
    assert!(flat.diffuse_map.is_none());
}

#[test]
fn triangle_buffers_from_full_model() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("tri.obj"),
        "v 0 0 0\n\
         v 1 0 0\n\
         v 0 1 0\n\
         vt 0 0 0\n\
         vt 1 0 0\n\
         vt 0 1 0\n\
         vn 0 0 1\n\
         f 1/1/1 2/2/1 3/3/1\n",
    )
    .unwrap();

    let model = load_obj(dir.path().join("tri.obj")).unwrap();
    let buffers = model.triangle_buffers().unwrap();
    assert_eq!(buffers.triangle_count, 1);
    assert_eq!(buffers.positions.len(), 9);
    assert_eq!(buffers.texcoords.len(), 9);
    // All three corners share the single normal.
    assert_eq!(buffers.normals, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn usemtl_before_definition_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("lib.mtl"), "newmtl real\n").unwrap();
    fs::write(
        dir.path().join("bad.obj"),
        "mtllib lib.mtl\nusemtl imaginary\n",
    )
    .unwrap();

    let err = load_obj(dir.path().join("bad.obj")).unwrap_err();
    match err {
        ObjError::UnknownMaterial { name, .. } => assert_eq!(name, "imaginary"),
        other => panic!("expected UnknownMaterial, got {other}"),
    }
}

#[test]
fn missing_mtllib_fails_the_read() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("orphan.obj"), "mtllib nowhere.mtl\n").unwrap();

    let err = load_obj(dir.path().join("orphan.obj")).unwrap_err();
    assert!(matches!(err, ObjError::FileNotFound { .. }));
}

#[test]
fn missing_obj_file() {
    let err = load_obj("no_such_model_98765.obj").unwrap_err();
    if let ObjError::FileNotFound { path } = err {
        assert!(path.to_string_lossy().contains("no_such_model"));
    } else {
        panic!("expected FileNotFound");
    }
}

#[test]
fn missing_texture_fails_the_read() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("lib.mtl"),
        "newmtl m\nmap_Ka gone.png\n",
    )
    .unwrap();
    fs::write(dir.path().join("model.obj"), "mtllib lib.mtl\n").unwrap();

    let err = load_obj(dir.path().join("model.obj")).unwrap_err();
    assert!(matches!(err, ObjError::Image { .. }));
}
