//! MTL material library parser.
//!
//! Parses the subset of the Wavefront MTL format the OBJ loader consumes:
//! `newmtl`, the `Ka`/`Kd`/`Ks` color triples, `illum`, `Ns`, and the
//! `map_Ka`/`map_Kd`/`map_Ks` texture references. Texture images are decoded
//! when their directive is encountered, relative to the MTL file's
//! directory.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use tracing::debug;

use crate::error::{ObjError, ObjResult};

/// MTL illumination models, values 0 through 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IlluminationModel {
    #[default]
    Color = 0,
    ColorAmbient,
    Highlight,
    ReflectionRayTrace,
    GlassRayTrace,
    FresnelRayTrace,
    RefractionRayTrace,
    RefractionFresnelRayTrace,
    Reflection,
    Glass,
    Shadows,
}

impl IlluminationModel {
    /// The model for a directive value, or `None` outside 0-10.
    pub fn from_value(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::Color,
            1 => Self::ColorAmbient,
            2 => Self::Highlight,
            3 => Self::ReflectionRayTrace,
            4 => Self::GlassRayTrace,
            5 => Self::FresnelRayTrace,
            6 => Self::RefractionRayTrace,
            7 => Self::RefractionFresnelRayTrace,
            8 => Self::Reflection,
            9 => Self::Glass,
            10 => Self::Shadows,
            _ => return None,
        })
    }
}

/// A decoded texture map: RGBA8 pixels with rows stored bottom-to-top, the
/// origin convention OpenGL expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

/// One named material record.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Unique name within its library.
    pub name: String,
    /// Ambient color (`Ka`).
    pub ambient: [f32; 3],
    /// Diffuse color (`Kd`).
    pub diffuse: [f32; 3],
    /// Specular color (`Ks`).
    pub specular: [f32; 3],
    /// Illumination model (`illum`).
    pub illum: IlluminationModel,
    /// Specular exponent (`Ns`).
    pub specular_exponent: f32,
    /// Ambient texture map (`map_Ka`).
    pub ambient_map: Option<TextureImage>,
    /// Diffuse texture map (`map_Kd`).
    pub diffuse_map: Option<TextureImage>,
    /// Specular texture map (`map_Ks`).
    pub specular_map: Option<TextureImage>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: [0.0; 3],
            diffuse: [0.0; 3],
            specular: [0.0; 3],
            illum: IlluminationModel::default(),
            specular_exponent: 0.0,
            ambient_map: None,
            diffuse_map: None,
            specular_map: None,
        }
    }
}

/// An ordered collection of materials, declaration order preserved.
#[derive(Debug, Default)]
pub struct MtlLibrary {
    pub materials: Vec<Material>,
}

impl MtlLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Index of the material with exactly this name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.materials.iter().position(|m| m.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.index_of(name).map(|i| &self.materials[i])
    }
}

/// Load a material library from an MTL file.
///
/// Texture map paths are resolved relative to the file's directory.
pub fn load_mtl<P: AsRef<Path>>(path: P) -> ObjResult<MtlLibrary> {
    let mut library = MtlLibrary::new();
    read_mtl_file(&mut library, path.as_ref())?;
    Ok(library)
}

/// Parse material definitions from a string; `base_dir` anchors texture map
/// paths.
pub fn parse_mtl(text: &str, base_dir: &Path) -> ObjResult<MtlLibrary> {
    let mut library = MtlLibrary::new();
    read_mtl(&mut library, Cursor::new(text), base_dir)?;
    Ok(library)
}

/// Append material definitions from `path` into `library`.
pub(crate) fn read_mtl_file(library: &mut MtlLibrary, path: &Path) -> ObjResult<()> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ObjError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ObjError::Io(e)
        }
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    debug!(path = %path.display(), "reading material library");
    read_mtl(library, BufReader::new(file), base_dir)
}

fn read_mtl<R: BufRead>(library: &mut MtlLibrary, reader: R, base_dir: &Path) -> ObjResult<()> {
    let mut current: Option<Material> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let line = line.trim();

        if let Some(rest) = line.strip_prefix("newmtl ") {
            if let Some(done) = current.take() {
                library.materials.push(done);
            }
            let name = rest.split_whitespace().next().ok_or_else(|| {
                ObjError::malformed_directive(line_no, "newmtl without a name")
            })?;
            current = Some(Material::new(name));
        } else if let Some(rest) = line.strip_prefix("Ka ") {
            let mtl = current_material(&mut current, line_no, "Ka")?;
            mtl.ambient = color_triple(rest, line_no)?;
        } else if let Some(rest) = line.strip_prefix("Kd ") {
            let mtl = current_material(&mut current, line_no, "Kd")?;
            mtl.diffuse = color_triple(rest, line_no)?;
        } else if let Some(rest) = line.strip_prefix("Ks ") {
            let mtl = current_material(&mut current, line_no, "Ks")?;
            mtl.specular = color_triple(rest, line_no)?;
        } else if let Some(rest) = line.strip_prefix("illum ") {
            let mtl = current_material(&mut current, line_no, "illum")?;
            let value: u32 = first_field(rest, line_no, "illum")?;
            mtl.illum = IlluminationModel::from_value(value)
                .ok_or(ObjError::UnknownIlluminationModel { line: line_no, value })?;
        } else if let Some(rest) = line.strip_prefix("Ns ") {
            let mtl = current_material(&mut current, line_no, "Ns")?;
            mtl.specular_exponent = first_field(rest, line_no, "Ns")?;
        } else if let Some(rest) = line.strip_prefix("map_Ka ") {
            let mtl = current_material(&mut current, line_no, "map_Ka")?;
            mtl.ambient_map = Some(load_texture(base_dir, rest, line_no)?);
        } else if let Some(rest) = line.strip_prefix("map_Kd ") {
            let mtl = current_material(&mut current, line_no, "map_Kd")?;
            mtl.diffuse_map = Some(load_texture(base_dir, rest, line_no)?);
        } else if let Some(rest) = line.strip_prefix("map_Ks ") {
            let mtl = current_material(&mut current, line_no, "map_Ks")?;
            mtl.specular_map = Some(load_texture(base_dir, rest, line_no)?);
        }
        // Comments and unsupported directives are ignored.
    }

    if let Some(done) = current.take() {
        library.materials.push(done);
    }

    Ok(())
}

fn current_material<'a>(
    current: &'a mut Option<Material>,
    line: usize,
    directive: &str,
) -> ObjResult<&'a mut Material> {
    current.as_mut().ok_or_else(|| ObjError::OrphanDirective {
        line,
        directive: directive.to_string(),
    })
}

fn color_triple(rest: &str, line: usize) -> ObjResult<[f32; 3]> {
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
    Ok([next("r")?, next("g")?, next("b")?])
}

fn first_field<T: std::str::FromStr>(rest: &str, line: usize, directive: &str) -> ObjResult<T> {
    rest.split_whitespace()
        .next()
        .ok_or_else(|| ObjError::malformed_directive(line, format!("{directive} without a value")))?
        .parse()
        .map_err(|_| ObjError::malformed_directive(line, format!("bad {directive} value")))
}

/// Decode a texture map and flip it to a bottom-left origin.
///
/// Any channel layout the decoder understands is normalized to RGBA8;
/// sources without an alpha channel come out fully opaque.
fn load_texture(base_dir: &Path, rest: &str, line: usize) -> ObjResult<TextureImage> {
    let name = rest
        .split_whitespace()
        .next()
        .ok_or_else(|| ObjError::malformed_directive(line, "texture map without a path"))?;
    let path = base_dir.join(name);

    let decoded = image::open(&path).map_err(|source| ObjError::Image {
        path: path.clone(),
        source,
    })?;
    let mut rgba = decoded.to_rgba8();
    // Image decoders put the origin at the top left; OpenGL samples with the
    // origin at the bottom left.
    image::imageops::flip_vertical_in_place(&mut rgba);

    let (width, height) = rgba.dimensions();
    debug!(path = %path.display(), width, height, "loaded texture map");

    Ok(TextureImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}
