//! OBJ mesh parser.
//!
//! Streams a Wavefront OBJ file line by line into an [`ObjModel`]. The
//! supported directive subset is `v`, `vn`, `vt`, `f`, `mtllib`, and
//! `usemtl`; every other line is ignored. Polygonal faces are decomposed
//! into triangle fans as they are read, so the face tables only ever hold
//! triangles.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use nom::{
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{all_consuming, map_res, opt, verify},
    multi::separated_list1,
    sequence::{delimited, preceded},
    IResult,
};
use tracing::debug;

use crate::error::{ObjError, ObjResult};
use crate::geometry::{ObjModel, TriFace, Vertex};
use crate::mtl;

/// Load a model from an OBJ file.
///
/// `mtllib` references are resolved relative to the file's directory, and a
/// failure anywhere (I/O, grammar, an unknown material, a missing texture)
/// fails the whole read.
pub fn load_obj<P: AsRef<Path>>(path: P) -> ObjResult<ObjModel> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ObjError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ObjError::Io(e)
        }
    })?;
    debug!(path = %path.display(), "reading OBJ");
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    read_obj(BufReader::new(file), base_dir)
}

/// Parse a model from OBJ text; `base_dir` anchors `mtllib` references.
pub fn parse_obj(text: &str, base_dir: &Path) -> ObjResult<ObjModel> {
    read_obj(Cursor::new(text), base_dir)
}

fn read_obj<R: BufRead>(reader: R, base_dir: &Path) -> ObjResult<ObjModel> {
    let mut model = ObjModel::new();
    let mut active_material: Option<usize> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let line = line.trim_end();

        if let Some(rest) = line.strip_prefix("v ") {
            model.positions.push(float_triple(rest, line_no)?);
        } else if let Some(rest) = line.strip_prefix("vn ") {
            model.normals.push(float_triple(rest, line_no)?);
        } else if let Some(rest) = line.strip_prefix("vt ") {
            model.texcoords.push(float_triple(rest, line_no)?);
        } else if let Some(rest) = line.strip_prefix("f ") {
            parse_face_line(rest, line_no, active_material, &mut model)?;
        } else if let Some(rest) = line.strip_prefix("mtllib ") {
            let name = rest.split_whitespace().next().ok_or_else(|| {
                ObjError::malformed_directive(line_no, "mtllib without a filename")
            })?;
            mtl::read_mtl_file(&mut model.materials, &base_dir.join(name))?;
        } else if let Some(rest) = line.strip_prefix("usemtl ") {
            let name = rest.split_whitespace().next().ok_or_else(|| {
                ObjError::malformed_directive(line_no, "usemtl without a name")
            })?;
            // Only materials already parsed can be selected; forward
            // references fail the read.
            let index = model.materials.index_of(name).ok_or_else(|| {
                ObjError::UnknownMaterial {
                    line: line_no,
                    name: name.to_string(),
                }
            })?;
            active_material = Some(index);
        }
        // Comments and unsupported directives are ignored.
    }

    Ok(model)
}

fn float_triple(rest: &str, line: usize) -> ObjResult<Vertex> {
    let mut fields = rest.split_whitespace();
    let mut next = |component: &str| -> ObjResult<f32> {
        fields
            .next()
            .ok_or_else(|| {
                ObjError::malformed_directive(line, format!("missing {component} component"))
            })?
            .parse()
            .map_err(|_| {
                ObjError::malformed_directive(line, format!("bad {component} component"))
            })
    };
    Ok(Vertex::new(next("x")?, next("y")?, next("z")?))
}

/// One corner of a face record: `v`, `v/t`, `v//n`, or `v/t/n`.
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: u32,
    texcoord: Option<u32>,
    normal: Option<u32>,
}

/// A positive 1-based index. Zero and negative (relative) references are
/// rejected by the grammar.
fn face_index(input: &str) -> IResult<&str, u32> {
    verify(map_res(digit1, str::parse::<u32>), |&v| v >= 1)(input)
}

fn face_corner(input: &str) -> IResult<&str, Corner> {
    let (input, position) = face_index(input)?;
    // A slash with no digits after it marks the component as omitted for
    // this corner ("v//n").
    let (input, texcoord) = opt(preceded(char('/'), opt(face_index)))(input)?;
    let (input, normal) = opt(preceded(char('/'), opt(face_index)))(input)?;
    Ok((
        input,
        Corner {
            position,
            texcoord: texcoord.flatten(),
            normal: normal.flatten(),
        },
    ))
}

fn face_corners(input: &str) -> IResult<&str, Vec<Corner>> {
    all_consuming(delimited(
        multispace0,
        separated_list1(multispace1, face_corner),
        multispace0,
    ))(input)
}

fn parse_face_line(
    rest: &str,
    line: usize,
    active_material: Option<usize>,
    model: &mut ObjModel,
) -> ObjResult<()> {
    // '#' terminates the face record.
    let rest = rest.split('#').next().unwrap_or("");

    let (_, corners) = face_corners(rest)
        .map_err(|_| ObjError::malformed_face(line, "unparseable corner"))?;

    if corners.len() < 3 {
        return Err(ObjError::malformed_face(line, "fewer than three corners"));
    }

    // The first corner fixes the face shape; every later corner must match.
    let has_texcoords = corners[0].texcoord.is_some();
    let has_normals = corners[0].normal.is_some();
    for corner in &corners[1..] {
        if corner.texcoord.is_some() != has_texcoords || corner.normal.is_some() != has_normals {
            return Err(ObjError::malformed_face(line, "inconsistent corner format"));
        }
    }

    // Triangle fan: (c0, c1, c2), (c0, c2, c3), ...
    for i in 1..corners.len() - 1 {
        let (a, b, c) = (corners[0], corners[i], corners[i + 1]);

        model
            .position_faces
            .push(TriFace::new(a.position, b.position, c.position));
        if let (Some(at), Some(bt), Some(ct)) = (a.texcoord, b.texcoord, c.texcoord) {
            model.texcoord_faces.push(TriFace::new(at, bt, ct));
        }
        if let (Some(an), Some(bn), Some(cn)) = (a.normal, b.normal, c.normal) {
            model.normal_faces.push(TriFace::new(an, bn, cn));
        }
        if let Some(material) = active_material {
            model.face_materials.push(material);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ObjResult<ObjModel> {
        parse_obj(text, Path::new("."))
    }

    const THREE_VERTICES: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";

    #[test]
    fn test_single_triangle() {
        let model = parse(&format!("{THREE_VERTICES}f 1 2 3\n")).unwrap();
        assert_eq!(model.positions.len(), 3);
        assert_eq!(model.position_faces, vec![TriFace::new(1, 2, 3)]);
        assert!(model.texcoord_faces.is_empty());
        assert!(model.normal_faces.is_empty());
        assert!(model.face_materials.is_empty());
    }

    #[test]
    fn test_vertex_components() {
        let model = parse("v 1.5 -2.25 3e2\n").unwrap();
        assert_eq!(model.positions[0], Vertex::new(1.5, -2.25, 300.0));
    }

    #[test]
    fn test_quad_fan_triangulation() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
        assert_eq!(
            model.position_faces,
            vec![TriFace::new(1, 2, 3), TriFace::new(1, 3, 4)]
        );
    }

    #[test]
    fn test_pentagon_fan_triangulation() {
        let model = parse("f 1 2 3 4 5\n").unwrap();
        assert_eq!(
            model.position_faces,
            vec![
                TriFace::new(1, 2, 3),
                TriFace::new(1, 3, 4),
                TriFace::new(1, 4, 5)
            ]
        );
    }

    #[test]
    fn test_full_corner_shape() {
        let model = parse("f 1/4/7 2/5/8 3/6/9\n").unwrap();
        assert_eq!(model.position_faces, vec![TriFace::new(1, 2, 3)]);
        assert_eq!(model.texcoord_faces, vec![TriFace::new(4, 5, 6)]);
        assert_eq!(model.normal_faces, vec![TriFace::new(7, 8, 9)]);
    }

    #[test]
    fn test_position_and_normal_shape() {
        let model = parse("f 1//7 2//8 3//9\n").unwrap();
        assert_eq!(model.position_faces, vec![TriFace::new(1, 2, 3)]);
        assert!(model.texcoord_faces.is_empty());
        assert_eq!(model.normal_faces, vec![TriFace::new(7, 8, 9)]);
        // Consumers rely on the vertex and normal tables staying parallel.
        assert_eq!(model.position_faces.len(), model.normal_faces.len());
    }

    #[test]
    fn test_position_and_texcoord_shape() {
        let model = parse("f 1/4 2/5 3/6\n").unwrap();
        assert_eq!(model.texcoord_faces, vec![TriFace::new(4, 5, 6)]);
        assert!(model.normal_faces.is_empty());
    }

    #[test]
    fn test_inconsistent_corner_shape_rejected() {
        let err = parse("f 1/1 2 3\n").unwrap_err();
        assert!(matches!(err, ObjError::MalformedFace { line: 1, .. }));
    }

    #[test]
    fn test_zero_index_rejected() {
        let err = parse("f 0 1 2\n").unwrap_err();
        assert!(matches!(err, ObjError::MalformedFace { .. }));
    }

    #[test]
    fn test_negative_index_rejected() {
        let err = parse("f -1 2 3\n").unwrap_err();
        assert!(matches!(err, ObjError::MalformedFace { .. }));
    }

    #[test]
    fn test_too_few_corners_rejected() {
        let err = parse("f 1 2\n").unwrap_err();
        assert!(matches!(err, ObjError::MalformedFace { .. }));
    }

    #[test]
    fn test_face_trailing_comment() {
        let model = parse("f 1 2 3 # a triangle\n").unwrap();
        assert_eq!(model.position_faces, vec![TriFace::new(1, 2, 3)]);
    }

    #[test]
    fn test_unsupported_lines_ignored() {
        let model = parse("# header\no thing\ns off\ng group\n\nv 1 2 3\n").unwrap();
        assert_eq!(model.positions.len(), 1);
    }

    #[test]
    fn test_malformed_vertex_rejected() {
        let err = parse("v 1.0 oops 3.0\n").unwrap_err();
        assert!(matches!(err, ObjError::MalformedDirective { line: 1, .. }));
    }

    #[test]
    fn test_short_texcoord_rejected() {
        let err = parse("vt 0.5 0.5\n").unwrap_err();
        assert!(matches!(err, ObjError::MalformedDirective { .. }));
    }

    #[test]
    fn test_usemtl_unknown_material() {
        let err = parse("usemtl missing\n").unwrap_err();
        assert!(matches!(err, ObjError::UnknownMaterial { line: 1, .. }));
    }

    #[test]
    fn test_normals_and_texcoords_tables() {
        let model = parse("vn 0 0 1\nvt 0.5 0.5 0\n").unwrap();
        assert_eq!(model.normals, vec![Vertex::new(0.0, 0.0, 1.0)]);
        assert_eq!(model.texcoords, vec![Vertex::new(0.5, 0.5, 0.0)]);
    }

    #[test]
    fn test_crlf_lines() {
        let model = parse("v 0 0 0\r\nv 1 0 0\r\nv 0 1 0\r\nf 1 2 3\r\n").unwrap();
        assert_eq!(model.position_faces, vec![TriFace::new(1, 2, 3)]);
    }
}
